/// Binary per-pixel selection, row-major like the buffer it was made from.
/// `true` means the pixel is selected for erasure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// A mask with nothing selected
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Builds a mask from row-major bits. Returns `None` if the length is wrong.
    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> Option<Self> {
        if bits.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub(crate) fn set_index(&mut self, i: usize, selected: bool) {
        self.bits[i] = selected;
    }

    #[inline]
    pub fn is_set(&self, i: usize) -> bool {
        self.bits[i]
    }

    /// Number of selected pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// True if every pixel selected in `other` is also selected here
    pub fn contains(&self, other: &Mask) -> bool {
        self.bits.len() == other.bits.len()
            && self.bits.iter().zip(&other.bits).all(|(&a, &b)| a || !b)
    }

    /// Bounds of the selected region as (x, y, width, height)
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let w = self.width as usize;
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        let mut any = false;
        for (i, _) in self.bits.iter().enumerate().filter(|(_, b)| **b) {
            let (x, y) = ((i % w) as u32, (i / w) as u32);
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
            any = true;
        }
        any.then(|| (min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_and_count() {
        let mut mask = Mask::empty(4, 3);
        assert!(mask.is_empty());
        assert_eq!(mask.bounds(), None);

        mask.set_index(5, true); // (1, 1)
        mask.set_index(11, true); // (3, 2)
        assert_eq!(mask.count(), 2);
        assert!(mask.get(1, 1));
        assert!(!mask.get(9, 9));
        assert_eq!(mask.bounds(), Some((1, 1, 3, 2)));
    }

    #[test]
    fn test_contains() {
        let small = Mask::from_bits(2, 1, vec![true, false]).unwrap();
        let big = Mask::from_bits(2, 1, vec![true, true]).unwrap();
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
        assert!(Mask::from_bits(2, 2, vec![true]).is_none());
    }
}
