use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::buffer::PixelBuffer;

/// Uploads pixel buffers as textures, keyed by buffer id.
///
/// Buffers never change after they are shared, so an id seen before can reuse
/// its texture. The in-progress brush canvas is the exception and is uploaded
/// through [`TextureManager::upload_live`] instead.
pub struct TextureManager {
    texture_cache: HashMap<usize, TextureHandle>,
    /// Frame in which each texture was last used
    last_used: HashMap<usize, u64>,
    current_frame: u64,
    max_cache_size: usize,
    /// Texture reused for the stroke canvas while drawing
    live: Option<TextureHandle>,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
            live: None,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    fn to_color_image(buffer: &PixelBuffer) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [buffer.width() as usize, buffer.height() as usize],
            buffer.data(),
        )
    }

    /// Gets or creates the texture for an immutable buffer
    pub fn get_or_create_texture(&mut self, buffer: &PixelBuffer, ctx: &Context) -> TextureId {
        let key = buffer.id();
        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return handle.id();
        }

        let name = format!("buffer_{}", key);
        let handle = ctx.load_texture(&name, Self::to_color_image(buffer), TextureOptions::NEAREST);
        let id = handle.id();
        self.texture_cache.insert(key, handle);
        self.last_used.insert(key, self.current_frame);
        self.prune_cache_if_needed();
        id
    }

    /// Re-upload a buffer that is still being modified
    pub fn upload_live(&mut self, buffer: &PixelBuffer, ctx: &Context) -> TextureId {
        let image = Self::to_color_image(buffer);
        match &mut self.live {
            Some(handle) if handle.size() == image.size => {
                handle.set(image, TextureOptions::NEAREST);
                handle.id()
            }
            _ => {
                let handle = ctx.load_texture("live_canvas", image, TextureOptions::NEAREST);
                let id = handle.id();
                self.live = Some(handle);
                id
            }
        }
    }

    /// Evicts least recently used textures beyond the maximum size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(usize, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    /// Clears all textures from the cache
    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
        self.live = None;
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> PixelBuffer {
        PixelBuffer::filled(4, 4, [255, 255, 255, 255]).unwrap()
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let b = buffer();

        let first = manager.get_or_create_texture(&b, &ctx);
        let second = manager.get_or_create_texture(&b, &ctx);

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (buffer(), buffer(), buffer());

        manager.get_or_create_texture(&a, &ctx);
        manager.begin_frame();
        manager.get_or_create_texture(&b, &ctx);
        manager.begin_frame();
        manager.get_or_create_texture(&c, &ctx);

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.texture_cache.contains_key(&a.id()));
        assert!(manager.texture_cache.contains_key(&c.id()));
    }

    #[test]
    fn test_clear() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        manager.get_or_create_texture(&buffer(), &ctx);
        manager.upload_live(&buffer(), &ctx);
        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
    }
}
