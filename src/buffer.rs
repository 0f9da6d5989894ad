use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{EditError, EditResult};

// Static counter for generating unique buffer IDs
static NEXT_BUFFER_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id() -> usize {
    NEXT_BUFFER_ID.fetch_add(1, Ordering::SeqCst)
}

/// One RGBA sample
pub type Rgba = [u8; 4];

/// An RGBA8 raster, row-major, four bytes per pixel.
///
/// Buffers shared through a [`BufferRef`] are never mutated; edits always
/// happen on an owned copy and produce a new buffer. Every buffer carries a
/// unique id so the display side can tell when it needs a new texture.
pub struct PixelBuffer {
    id: usize,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Reference-counted, immutable pixel buffer (history snapshots, live selection bases)
pub type BufferRef = Arc<PixelBuffer>;

impl PixelBuffer {
    /// Wraps raw RGBA bytes. Fails unless `data.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> EditResult<Self> {
        if width == 0 || height == 0 {
            return Err(EditError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(EditError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            id: next_id(),
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> EditResult<Self> {
        let len = width as usize * height as usize;
        let data = color.iter().copied().cycle().take(len * 4).collect();
        Self::from_raw(width, height, data)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns true if (x, y) addresses a pixel of this buffer
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Index of pixel (x, y) in row-major order. Caller checks bounds.
    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.pixel(self.index_of(x, y)))
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> EditResult<()> {
        if !self.contains(x, y) {
            return Err(EditError::SeedOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let offset = self.index_of(x, y) * 4;
        self.data[offset..offset + 4].copy_from_slice(&color);
        Ok(())
    }

    /// Pixel at row-major index `i`
    #[inline]
    pub fn pixel(&self, i: usize) -> Rgba {
        let o = i * 4;
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    #[inline]
    pub fn alpha(&self, i: usize) -> u8 {
        self.data[i * 4 + 3]
    }

    #[inline]
    pub(crate) fn set_alpha(&mut self, i: usize, alpha: u8) {
        self.data[i * 4 + 3] = alpha;
    }

    /// Whether both buffers have the same width and height
    pub fn same_size(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub fn into_ref(self) -> BufferRef {
        Arc::new(self)
    }
}

// A clone is a distinct buffer and gets its own id
impl Clone for PixelBuffer {
    fn clone(&self) -> Self {
        Self {
            id: next_id(),
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }
}

// Ids are identity, not content
impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl Eq for PixelBuffer {}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
