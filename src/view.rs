use egui::{Pos2, Rect, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;
pub const ZOOM_STEP: f32 = 0.1;
/// Margin kept around the image by fit-to-screen, in points
pub const FIT_PADDING: f32 = 40.0;

/// Pan and zoom of the image on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Screen points per image pixel
    pub scale: f32,
    /// Pan of the image centre away from the canvas centre, in points
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Largest scale that fits the image with padding, never enlarging it
    pub fn fit(&mut self, image_size: Vec2, available: Vec2) {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            return;
        }
        let scale_w = (available.x - FIT_PADDING) / image_size.x;
        let scale_h = (available.y - FIT_PADDING) / image_size.y;
        self.scale = scale_w.min(scale_h).min(1.0).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = Vec2::ZERO;
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }

    /// Where the image is drawn inside `canvas`
    pub fn image_rect(&self, canvas: Rect, image_size: Vec2) -> Rect {
        Rect::from_center_size(canvas.center() + self.offset, image_size * self.scale)
    }

    /// Map a screen position to image pixel coordinates (may be outside the image)
    pub fn screen_to_image(&self, pos: Pos2, image_rect: Rect) -> Pos2 {
        let local = (pos - image_rect.min) / self.scale;
        Pos2::new(local.x, local.y)
    }
}
