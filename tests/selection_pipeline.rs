use eframe_eraser::selection::{Mask, grow, smooth};
use eframe_eraser::{EditError, PixelBuffer, SelectionParams, composite, erase_region};

const RED: [u8; 4] = [255, 0, 0, 255];

// Horizontal ramp: pixel x has red = x * step, full alpha
fn ramp(width: u32, height: u32, step: u8) -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(width, height, [0, 0, 0, 255]).unwrap();
    for y in 0..height {
        for x in 0..width {
            buffer.set(x, y, [x as u8 * step, 0, 0, 255]).unwrap();
        }
    }
    buffer
}

#[test]
fn test_uniform_buffer_fully_selected() {
    let buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    let mask = grow(&buffer, 0, 0, 100).unwrap();
    assert_eq!(mask.count(), 16);
}

#[test]
fn test_zero_tolerance_excludes_different_corner() {
    let mut buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    buffer.set(3, 3, [0, 0, 255, 255]).unwrap();

    let mask = grow(&buffer, 0, 0, 0).unwrap();

    assert!(!mask.get(3, 3));
    assert_eq!(mask.count(), 15);
}

#[test]
fn test_zero_tolerance_excludes_pixels_reachable_only_through_barrier() {
    // Blue wall at x = 2 cuts the right column off from the seed
    let mut buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    for y in 0..4 {
        buffer.set(2, y, [0, 0, 255, 255]).unwrap();
    }

    let mask = grow(&buffer, 0, 0, 0).unwrap();

    assert_eq!(mask.count(), 8);
    for y in 0..4 {
        assert!(!mask.get(2, y));
        assert!(!mask.get(3, y));
    }
}

#[test]
fn test_growth_is_monotonic_in_tolerance() {
    let buffer = ramp(32, 3, 8);
    let mut previous: Option<Mask> = None;
    for tolerance in (0..=100).step_by(5) {
        let mask = grow(&buffer, 0, 1, tolerance).unwrap();
        if let Some(previous) = &previous {
            assert!(mask.contains(previous), "tolerance {} lost pixels", tolerance);
        }
        previous = Some(mask);
    }
}

#[test]
fn test_composite_identity_and_full_erase() {
    let buffer = ramp(8, 8, 30);
    let mask = grow(&buffer, 0, 0, 20).unwrap();
    assert!(!mask.is_empty());

    assert_eq!(composite(&buffer, &mask, 0.0).unwrap(), buffer);

    let erased = composite(&buffer, &mask, 1.0).unwrap();
    for i in 0..buffer.pixel_count() {
        if mask.is_set(i) {
            assert_eq!(erased.alpha(i), 0);
        } else {
            assert_eq!(erased.pixel(i), buffer.pixel(i));
        }
    }
}

#[test]
fn test_composite_rejects_mismatched_mask() {
    let buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    let mask = Mask::empty(3, 4);
    let err = composite(&buffer, &mask, 1.0).unwrap_err();
    assert_eq!(
        err,
        EditError::MaskSizeMismatch {
            width: 4,
            height: 4,
            mask_width: 3,
            mask_height: 4
        }
    );
    assert_eq!(err.to_string(), "Mask is 3x4 pixels but the image is 4x4");
}

#[test]
fn test_smooth_identity_and_binary_output() {
    let buffer = ramp(16, 16, 12);
    let mask = grow(&buffer, 0, 0, 25).unwrap();

    assert_eq!(smooth(&mask, 0), mask);

    let full = Mask::from_bits(16, 16, vec![true; 256]).unwrap();
    let empty = Mask::empty(16, 16);
    for smoothness in [1, 4, 10, 50, 100] {
        assert_eq!(smooth(&full, smoothness), full);
        assert_eq!(smooth(&empty, smoothness), empty);

        let smoothed = smooth(&mask, smoothness);
        assert_eq!((smoothed.width(), smoothed.height()), (mask.width(), mask.height()));
    }
}

#[test]
fn test_erase_region_does_not_touch_base() {
    let buffer = PixelBuffer::filled(6, 6, RED).unwrap();
    let before = buffer.clone();

    let result = erase_region(&buffer, 2, 2, &SelectionParams::new(10, 1.0, 0)).unwrap();

    assert_eq!(buffer, before);
    assert!((0..result.pixel_count()).all(|i| result.alpha(i) == 0));
}

#[test]
fn test_erase_region_is_deterministic() {
    let buffer = ramp(24, 24, 10);
    let params = SelectionParams::new(30, 0.6, 8);

    let first = erase_region(&buffer, 0, 0, &params).unwrap();
    let second = erase_region(&buffer, 0, 0, &params).unwrap();

    assert_eq!(first.data(), second.data());
}

#[test]
fn test_transparent_seed_is_a_noop() {
    let mut buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    buffer.set(1, 1, [255, 0, 0, 0]).unwrap();

    let result = erase_region(&buffer, 1, 1, &SelectionParams::default()).unwrap();

    assert_eq!(result, buffer);
}

#[test]
fn test_seed_out_of_bounds() {
    let buffer = PixelBuffer::filled(4, 4, RED).unwrap();
    assert_eq!(
        erase_region(&buffer, 4, 0, &SelectionParams::default()),
        Err(EditError::SeedOutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 4
        })
    );
}
