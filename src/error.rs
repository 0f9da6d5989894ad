use thiserror::Error;

/// Errors raised by editing operations on the current image.
///
/// Every operation that returns one of these leaves the session untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("No image is loaded")]
    NoImage,

    #[error("Seed ({x}, {y}) lies outside the {width}x{height} image")]
    SeedOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Mask is {mask_width}x{mask_height} pixels but the image is {width}x{height}")]
    MaskSizeMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Result type for editing operations
pub type EditResult<T> = Result<T, EditError>;

/// Errors that can occur while turning a file into a pixel buffer
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a supported image file: {0}")]
    NotAnImage(String),

    #[error("Image has no pixels")]
    Empty,
}

/// Errors that can occur while writing the edited image out
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No image is loaded")]
    NoImage,

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}
