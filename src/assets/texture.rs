//! Texture decoding

use std::sync::atomic::{AtomicU64, Ordering};

use image::{DynamicImage, GenericImageView};

use crate::error::{AssetError, AssetResult};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a decoded texture.
///
/// Two handles compare equal only if they come from the same decode, which
/// is what materials built from a texture are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Decoded RGBA8 image
#[derive(Debug)]
pub struct TextureImage {
    pub id: TextureId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureImage {
    /// Decode an encoded image (PNG, JPEG, ...) fetched from `path`
    pub fn decode(bytes: &[u8], path: &str) -> AssetResult<Self> {
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Image {
            path: path.to_string(),
            source,
        })?;
        Ok(Self::from_image(img, texture_name(path)))
    }

    fn from_image(img: DynamicImage, name: &str) -> Self {
        let (width, height) = img.dimensions();
        let data = img.to_rgba8().into_raw();

        Self {
            id: TextureId::next(),
            name: name.to_string(),
            width,
            height,
            data,
        }
    }

    /// RGBA value of the texel at (x, y), if inside the image
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(offset..offset + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

fn texture_name(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("unknown")
}
