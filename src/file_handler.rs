use std::path::Path;

use eframe::egui;
use image::ImageEncoder;

use crate::buffer::PixelBuffer;
use crate::error::{ExportError, LoadError};

/// File name suggested for the exported result
pub const DEFAULT_EXPORT_NAME: &str = "background-removed.png";

/// Check if a path looks like an image we can decode, by extension
pub fn is_supported_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

/// Decode an encoded image into an RGBA buffer
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, LoadError> {
    let img = image::load_from_memory(bytes)?;
    log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw()).map_err(|err| {
        log::error!("Decoded image rejected: {}", err);
        LoadError::Empty
    })
}

/// Read and decode an image file
pub fn load_image_file(path: &Path) -> Result<PixelBuffer, LoadError> {
    if !is_supported_image_path(path) {
        return Err(LoadError::NotAnImage(path.display().to_string()));
    }
    log::info!("Processing image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Encode a buffer as PNG
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes).write_image(
        buffer.data(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encode a buffer as PNG and write it to `path`
pub fn export_png(buffer: &PixelBuffer, path: &Path) -> Result<(), ExportError> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes)?;
    log::info!("Exported {}x{} image to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}

/// Picks up images dropped onto the window
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check for newly dropped files. Returns true if any arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the first dropped file. Drops are only taken while `accept` is
    /// true (no image loaded); otherwise they are discarded.
    pub fn take_dropped_image(&mut self, accept: bool) -> Option<Result<PixelBuffer, LoadError>> {
        let files = std::mem::take(&mut self.dropped_files);
        if !accept {
            if !files.is_empty() {
                log::warn!("Ignoring dropped files while an image is open");
            }
            return None;
        }
        let file = files.into_iter().next()?;
        Some(Self::decode_dropped(&file))
    }

    fn decode_dropped(file: &egui::DroppedFile) -> Result<PixelBuffer, LoadError> {
        let file_name = if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        };

        if !file.mime.is_empty() && !file.mime.starts_with("image/") {
            return Err(LoadError::NotAnImage(file_name));
        }

        if let Some(bytes) = &file.bytes {
            log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
            decode_image(bytes)
        } else if let Some(path) = &file.path {
            load_image_file(path)
        } else {
            log::warn!("Dropped file has no accessible data: {}", file_name);
            Err(LoadError::NotAnImage(file_name))
        }
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop image to start",
            egui::FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}
