//! Magic wand selection using flood fill.
//!
//! Selects the 4-connected region around a seed whose colors stay within a
//! tolerance of the *seed* color. Comparing against the seed rather than the
//! discovering neighbor keeps the fill from creeping along gradients.

use std::collections::VecDeque;

use super::Mask;
use crate::buffer::{PixelBuffer, Rgba};
use crate::error::{EditError, EditResult};

/// Largest possible Euclidean distance between two RGB colors
pub fn max_distance() -> f64 {
    (3.0 * 255.0 * 255.0f64).sqrt()
}

/// Grow a selection from `(seed_x, seed_y)`.
///
/// # Arguments
/// * `base` - Source buffer, not modified
/// * `seed_x`, `seed_y` - Seed pixel, must lie inside `base`
/// * `tolerance` - Percentage (0-100) of [`max_distance`] a pixel may differ
///   from the seed color over R, G and B. Alpha is not compared.
///
/// # Returns
/// The selection mask. A fully transparent seed yields an empty mask.
pub fn grow(base: &PixelBuffer, seed_x: u32, seed_y: u32, tolerance: u8) -> EditResult<Mask> {
    let (width, height) = (base.width(), base.height());
    if !base.contains(seed_x, seed_y) {
        return Err(EditError::SeedOutOfBounds {
            x: seed_x,
            y: seed_y,
            width,
            height,
        });
    }

    let mut mask = Mask::empty(width, height);
    let seed_idx = base.index_of(seed_x, seed_y);
    let seed = base.pixel(seed_idx);
    if seed[3] == 0 {
        return Ok(mask);
    }

    let allowed = tolerance.min(100) as f64 / 100.0 * max_distance();
    let (w, h) = (width as usize, height as usize);

    // Each pixel is compared at most once, when it is first reached.
    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();
    visited[seed_idx] = true;
    mask.set_index(seed_idx, true);
    queue.push_back(seed_idx);

    while let Some(idx) = queue.pop_front() {
        let (x, y) = (idx % w, idx / w);

        let neighbors = [
            (x + 1 < w).then(|| idx + 1),
            (x > 0).then(|| idx - 1),
            (y + 1 < h).then(|| idx + w),
            (y > 0).then(|| idx - w),
        ];

        for nidx in neighbors.into_iter().flatten() {
            if visited[nidx] {
                continue;
            }
            visited[nidx] = true;
            if color_distance(base.pixel(nidx), seed) <= allowed {
                mask.set_index(nidx, true);
                queue.push_back(nidx);
            }
        }
    }

    Ok(mask)
}

/// Euclidean distance over R, G and B
#[inline]
fn color_distance(a: Rgba, b: Rgba) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;

    (dr * dr + dg * dg + db * db).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from(width: u32, height: u32, colors: &[Rgba]) -> PixelBuffer {
        let data = colors.iter().flat_map(|c| c.iter().copied()).collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_single_color_fill() {
        let image = PixelBuffer::filled(5, 5, [255, 0, 0, 255]).unwrap();

        let mask = grow(&image, 2, 2, 0).unwrap();

        assert_eq!(mask.count(), 25);
    }

    #[test]
    fn test_two_regions() {
        // 4x4 image: left half red, right half blue
        let colors: Vec<Rgba> = (0..16)
            .map(|i| if i % 4 < 2 { [255, 0, 0, 255] } else { [0, 0, 255, 255] })
            .collect();
        let image = buffer_from(4, 4, &colors);

        let mask = grow(&image, 0, 0, 0).unwrap();

        assert_eq!(mask.count(), 8);
        assert!(mask.get(1, 3));
        assert!(!mask.get(2, 0));
    }

    #[test]
    fn test_compares_against_seed_not_neighbor() {
        // Gradient in steps of 10 along red. Each step is small, but the far
        // end drifts well away from the seed.
        let colors: Vec<Rgba> = (0..10).map(|i| [i * 10, 0, 0, 255]).collect();
        let image = buffer_from(10, 1, &colors);

        // 5% of ~441.7 is ~22, so only red values 0, 10 and 20 qualify
        let mask = grow(&image, 0, 0, 5).unwrap();

        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_alpha_is_ignored_for_neighbors() {
        let image = buffer_from(2, 1, &[[10, 10, 10, 255], [10, 10, 10, 0]]);
        let mask = grow(&image, 0, 0, 0).unwrap();
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_transparent_seed_gives_empty_mask() {
        let image = PixelBuffer::filled(3, 3, [0, 0, 0, 0]).unwrap();
        let mask = grow(&image, 1, 1, 100).unwrap();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_seed_out_of_bounds() {
        let image = PixelBuffer::filled(3, 3, [1, 1, 1, 255]).unwrap();
        assert!(matches!(
            grow(&image, 3, 0, 10),
            Err(EditError::SeedOutOfBounds { x: 3, y: 0, .. })
        ));
    }
}
