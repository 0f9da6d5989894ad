//! Alpha erasure.
//!
//! Both tools remove background the same way: the alpha of an affected pixel
//! is scaled by `1 - strength` and floored. The magic wand uses a binary mask
//! with a single strength (the opacity); the brush computes a strength per
//! pixel from a radial falloff.

use crate::buffer::PixelBuffer;
use crate::error::{EditError, EditResult};
use crate::selection::Mask;
use crate::settings::BrushSettings;

#[inline]
fn reduce_alpha(alpha: u8, strength: f32) -> u8 {
    (alpha as f64 * (1.0 - strength as f64)).floor().clamp(0.0, 255.0) as u8
}

/// Apply `mask` to `base`, producing a new buffer.
///
/// Selected pixels get `alpha = floor(alpha * (1 - opacity))`, everything else
/// is copied unchanged. `opacity` 0 is a no-op, 1 clears selected pixels.
pub fn composite(base: &PixelBuffer, mask: &Mask, opacity: f32) -> EditResult<PixelBuffer> {
    if mask.width() != base.width() || mask.height() != base.height() {
        return Err(EditError::MaskSizeMismatch {
            width: base.width(),
            height: base.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    let opacity = opacity.clamp(0.0, 1.0);
    let mut out = base.clone();
    if opacity == 0.0 {
        return Ok(out);
    }
    for (i, _) in mask.bits().iter().enumerate().filter(|(_, b)| **b) {
        let alpha = out.alpha(i);
        out.set_alpha(i, reduce_alpha(alpha, opacity));
    }
    Ok(out)
}

/// Erase strength of the brush at `distance` from the tip centre.
///
/// Full `opacity` inside `radius * (1 - feather)`, falling linearly to zero at
/// `radius`. Zero outside the tip.
pub fn dab_strength(distance: f32, brush: &BrushSettings) -> f32 {
    let radius = brush.radius();
    if distance > radius || radius <= 0.0 {
        return 0.0;
    }
    let inner = radius * (1.0 - brush.feather);
    if brush.feather <= 0.0 || distance <= inner {
        return brush.opacity;
    }
    brush.opacity * ((radius - distance) / (radius - inner)).clamp(0.0, 1.0)
}

/// Erase one round brush dab centred at (`cx`, `cy`) in image coordinates.
///
/// Works in place: callers own `buffer` exclusively while a stroke is in
/// progress. Pixels are sampled at their centres.
pub fn erase_dab(buffer: &mut PixelBuffer, cx: f32, cy: f32, brush: &BrushSettings) {
    let radius = brush.radius();
    if radius <= 0.0 || brush.opacity <= 0.0 {
        return;
    }

    let (w, h) = (buffer.width() as f32, buffer.height() as f32);
    let x0 = (cx - radius).floor().clamp(0.0, w) as u32;
    let x1 = (cx + radius).ceil().clamp(0.0, w) as u32;
    let y0 = (cy - radius).floor().clamp(0.0, h) as u32;
    let y1 = (cy + radius).ceil().clamp(0.0, h) as u32;

    for y in y0..y1 {
        let dy = y as f32 + 0.5 - cy;
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let strength = dab_strength((dx * dx + dy * dy).sqrt(), brush);
            if strength <= 0.0 {
                continue;
            }
            let i = buffer.index_of(x, y);
            let alpha = buffer.alpha(i);
            buffer.set_alpha(i, reduce_alpha(alpha, strength));
        }
    }
}

/// Non-mutating form of [`erase_dab`]
pub fn composite_dab(base: &PixelBuffer, cx: f32, cy: f32, brush: &BrushSettings) -> PixelBuffer {
    let mut out = base.clone();
    erase_dab(&mut out, cx, cy, brush);
    out
}
