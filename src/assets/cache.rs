//! Per-path cache of decoded assets

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::AssetResult;

use super::gltf_import::import_room_asset;
use super::source::{normalize_path, AssetSource};
use super::texture::TextureImage;
use super::types::RoomAsset;

/// Loads models and textures once per path and shares them.
///
/// Entries live as long as the cache unless explicitly invalidated. Failed
/// loads are not cached, so the next request fetches again. Two requests for
/// the same path that are in flight at the same time both fetch; the host
/// drives composition from a single cooperative loop.
pub struct AssetCache {
    source: Arc<dyn AssetSource>,
    models: Mutex<HashMap<String, Arc<RoomAsset>>>,
    textures: Mutex<HashMap<String, Arc<TextureImage>>>,
}

impl AssetCache {
    pub fn new(source: impl AssetSource) -> Self {
        Self::from_shared(Arc::new(source))
    }

    pub fn from_shared(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            models: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
        }
    }

    /// The room model at `path`, fetched and imported on first use.
    pub async fn model(&self, path: &str) -> AssetResult<Arc<RoomAsset>> {
        let key = normalize_path(path)?;
        if let Some(asset) = self.models.lock().get(&key) {
            log::debug!("Model cache hit: {}", key);
            return Ok(Arc::clone(asset));
        }

        log::info!("Loading model {}", key);
        let bytes = self.source.read(&key).await?;
        let asset = Arc::new(import_room_asset(&bytes, &key)?);
        log::info!(
            "Loaded model {} ({} surface groups, {} materials)",
            key,
            asset.group_count(),
            asset.material_count()
        );

        let mut models = self.models.lock();
        Ok(Arc::clone(models.entry(key).or_insert(asset)))
    }

    /// The texture at `path`, fetched and decoded on first use.
    pub async fn texture(&self, path: &str) -> AssetResult<Arc<TextureImage>> {
        let key = normalize_path(path)?;
        if let Some(texture) = self.textures.lock().get(&key) {
            log::debug!("Texture cache hit: {}", key);
            return Ok(Arc::clone(texture));
        }

        log::info!("Loading texture {}", key);
        let bytes = self.source.read(&key).await?;
        let texture = Arc::new(TextureImage::decode(&bytes, &key)?);
        log::debug!(
            "Decoded texture {} ({}x{})",
            key,
            texture.width,
            texture.height
        );

        let mut textures = self.textures.lock();
        Ok(Arc::clone(textures.entry(key).or_insert(texture)))
    }

    /// Fetch a model ahead of its first use.
    pub async fn preload(&self, path: &str) -> AssetResult<()> {
        self.model(path).await.map(|_| ())
    }

    pub fn is_cached(&self, path: &str) -> bool {
        let Ok(key) = normalize_path(path) else {
            return false;
        };
        self.models.lock().contains_key(&key) || self.textures.lock().contains_key(&key)
    }

    /// Drop the cached model or texture at `path`. Returns whether anything
    /// was cached there.
    ///
    /// Holders of the previous `Arc` keep it; the next request refetches.
    pub fn invalidate(&self, path: &str) -> bool {
        let Ok(key) = normalize_path(path) else {
            return false;
        };
        let removed_model = self.models.lock().remove(&key).is_some();
        let removed_texture = self.textures.lock().remove(&key).is_some();
        if !(removed_model || removed_texture) {
            log::warn!("Invalidated {} but nothing was cached", key);
        }
        removed_model || removed_texture
    }

    pub fn clear(&self) {
        self.models.lock().clear();
        self.textures.lock().clear();
    }
}
