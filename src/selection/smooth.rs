//! Mask smoothing.
//!
//! A separable box blur over the binary mask followed by a 0.5 threshold.
//! The result stays strictly binary: jagged flood-fill edges are rounded off,
//! thin peninsulas and pinholes near the threshold disappear.

use rayon::prelude::*;

use super::Mask;

/// Blur radius used for a smoothness setting
pub fn smoothing_radius(smoothness: u8) -> usize {
    smoothness as usize / 2 + 1
}

/// Smooth a mask. `smoothness == 0` returns the mask unchanged.
///
/// Both passes average over a window clipped to the image, dividing by the
/// number of in-bounds samples so edges are not darkened. The horizontal pass
/// is fully written to its own buffer before the vertical pass reads it.
pub fn smooth(mask: &Mask, smoothness: u8) -> Mask {
    if smoothness == 0 {
        return mask.clone();
    }

    let (w, h) = (mask.width() as usize, mask.height() as usize);
    if w == 0 || h == 0 {
        return mask.clone();
    }
    let r = smoothing_radius(smoothness);
    let bits = mask.bits();

    // Horizontal pass. Window sums of 0/1 values are exact, so a prefix sum
    // gives the same result as summing the window directly.
    let mut horizontal = vec![0.0f32; w * h];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            let row = &bits[y * w..(y + 1) * w];
            let mut prefix = Vec::with_capacity(w + 1);
            prefix.push(0u32);
            for &b in row {
                let last = prefix[prefix.len() - 1];
                prefix.push(last + b as u32);
            }
            for (x, value) in out.iter_mut().enumerate() {
                let lo = x.saturating_sub(r);
                let hi = (x + r).min(w - 1);
                let sum = prefix[hi + 1] - prefix[lo];
                let count = (hi - lo + 1) as f64;
                *value = (sum as f64 / count) as f32;
            }
        });

    // Vertical pass + threshold. Sums run top to bottom per column.
    let mut result = vec![false; w * h];
    result
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            let lo = y.saturating_sub(r);
            let hi = (y + r).min(h - 1);
            let count = (hi - lo + 1) as f64;

            let mut sums = vec![0.0f64; w];
            for row in horizontal[lo * w..(hi + 1) * w].chunks_exact(w) {
                for (sum, &v) in sums.iter_mut().zip(row) {
                    *sum += v as f64;
                }
            }
            for (bit, sum) in out.iter_mut().zip(sums) {
                *bit = sum / count > 0.5;
            }
        });

    Mask::from_bits(mask.width(), mask.height(), result).unwrap_or_else(|| mask.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straightforward clipped-window average, used as the reference.
    fn smooth_direct(mask: &Mask, smoothness: u8) -> Mask {
        let (w, h) = (mask.width() as i64, mask.height() as i64);
        let r = smoothing_radius(smoothness) as i64;
        let mut tmp = vec![0.0f32; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                let (mut sum, mut count) = (0.0f64, 0.0f64);
                for k in -r..=r {
                    let nx = x + k;
                    if nx >= 0 && nx < w {
                        sum += mask.bits()[(y * w + nx) as usize] as u8 as f64;
                        count += 1.0;
                    }
                }
                tmp[(y * w + x) as usize] = (sum / count) as f32;
            }
        }
        let mut bits = vec![false; (w * h) as usize];
        for x in 0..w {
            for y in 0..h {
                let (mut sum, mut count) = (0.0f64, 0.0f64);
                for k in -r..=r {
                    let ny = y + k;
                    if ny >= 0 && ny < h {
                        sum += tmp[(ny * w + x) as usize] as f64;
                        count += 1.0;
                    }
                }
                bits[(y * w + x) as usize] = sum / count > 0.5;
            }
        }
        Mask::from_bits(mask.width(), mask.height(), bits).unwrap()
    }

    fn pattern(w: u32, h: u32, f: impl Fn(u32, u32) -> bool) -> Mask {
        let bits = (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).map(|(x, y)| f(x, y)).collect();
        Mask::from_bits(w, h, bits).unwrap()
    }

    #[test]
    fn test_zero_smoothness_is_identity() {
        let mask = pattern(7, 5, |x, y| (x * 3 + y) % 4 == 0);
        assert_eq!(smooth(&mask, 0), mask);
    }

    #[test]
    fn test_matches_direct_window_average() {
        let masks = [
            pattern(17, 11, |x, y| (x * 7 + y * 13) % 5 < 2),
            pattern(9, 23, |x, y| x > 2 && y < 15 && (x + y) % 6 != 0),
            pattern(1, 8, |_, y| y % 3 == 0),
        ];
        for mask in &masks {
            for smoothness in [1, 2, 5, 10, 40] {
                assert_eq!(smooth(mask, smoothness), smooth_direct(mask, smoothness));
            }
        }
    }

    #[test]
    fn test_removes_isolated_pixel() {
        let mask = pattern(9, 9, |x, y| x == 4 && y == 4);
        assert!(smooth(&mask, 2).is_empty());
    }

    #[test]
    fn test_keeps_solid_region() {
        let mask = pattern(6, 6, |_, _| true);
        assert_eq!(smooth(&mask, 20).count(), 36);
    }

    #[test]
    fn test_radius() {
        assert_eq!(smoothing_radius(1), 1);
        assert_eq!(smoothing_radius(4), 3);
        assert_eq!(smoothing_radius(100), 51);
    }
}
