//! User-tunable parameters for the two erase tools.

use serde::{Deserialize, Serialize};

pub const MAX_TOLERANCE: u8 = 100;
pub const MAX_SMOOTHNESS: u8 = 100;
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 200;

/// The active erase tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    /// Manual eraser with a soft round tip
    #[default]
    Brush,
    /// Region-growing selection erase
    MagicWand,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::MagicWand => "Magic Wand",
        }
    }
}

/// Magic wand parameters. Re-applying the same params to the same seed and
/// base buffer always gives the same result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    /// Percentage of the largest possible RGB distance, 0..=100
    pub tolerance: u8,
    /// How much alpha is removed from selected pixels, 0.0..=1.0
    pub opacity: f32,
    /// Box blur control for the selection edge, 0..=100
    pub smoothness: u8,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            tolerance: 20,
            opacity: 1.0,
            smoothness: 0,
        }
    }
}

impl SelectionParams {
    pub fn new(tolerance: u8, opacity: f32, smoothness: u8) -> Self {
        Self {
            tolerance,
            opacity,
            smoothness,
        }
        .clamped()
    }

    /// Forces every field into its valid range
    pub fn clamped(self) -> Self {
        Self {
            tolerance: self.tolerance.min(MAX_TOLERANCE),
            opacity: clamp_unit(self.opacity),
            smoothness: self.smoothness.min(MAX_SMOOTHNESS),
        }
    }
}

/// Manual brush parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Tip diameter in image pixels
    pub size: u32,
    /// Fraction of the radius that fades out, 0.0..=1.0
    pub feather: f32,
    /// Strength at the centre of the tip, 0.0..=1.0
    pub opacity: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 50,
            feather: 0.5,
            opacity: 1.0,
        }
    }
}

impl BrushSettings {
    pub fn clamped(self) -> Self {
        Self {
            size: self.size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE),
            feather: clamp_unit(self.feather),
            opacity: clamp_unit(self.opacity),
        }
    }

    pub fn radius(&self) -> f32 {
        self.size as f32 / 2.0
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_clamped() {
        let params = SelectionParams::new(250, 1.5, 101);
        assert_eq!(params.tolerance, 100);
        assert_eq!(params.opacity, 1.0);
        assert_eq!(params.smoothness, 100);

        let brush = BrushSettings {
            size: 0,
            feather: -0.2,
            opacity: f32::NAN,
        }
        .clamped();
        assert_eq!(brush.size, MIN_BRUSH_SIZE);
        assert_eq!(brush.feather, 0.0);
        assert_eq!(brush.opacity, 0.0);
    }
}
