use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::decode_image;
use crate::foundation::error::{QuadmorphError, QuadmorphResult};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap already-premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> QuadmorphResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(QuadmorphError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiplied pixel at integer coordinates; callers keep them in range.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decoded images, keyed by the `imageUrl` string elements refer to.
///
/// Decoding happens up front; the renderer only ever reads from the store.
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, PreparedImage>,
}

impl ImageStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes` and register the result under `url`, replacing any previous entry.
    pub fn insert_encoded(&mut self, url: impl Into<String>, bytes: &[u8]) -> QuadmorphResult<()> {
        let url = url.into();
        let img = decode_image(bytes).map_err(|e| {
            QuadmorphError::validation(format!("failed to decode image '{url}': {e}"))
        })?;
        tracing::debug!(url = %url, width = img.width, height = img.height, "image registered");
        self.images.insert(url, img);
        Ok(())
    }

    /// Register an already decoded image under `url`.
    pub fn insert(&mut self, url: impl Into<String>, image: PreparedImage) {
        self.images.insert(url.into(), image);
    }

    /// Image registered under `url`, if any.
    pub fn get(&self, url: &str) -> Option<&PreparedImage> {
        self.images.get(url)
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// No images registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
