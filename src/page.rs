//! Startup sequence of the page hosting the room

use std::sync::Arc;

use crate::assets::{AssetCache, AssetSource};
use crate::error::SceneResult;
use crate::scene::{Placement, RenderGroup, RoomScene};
use crate::ShowcaseConfig;

/// The page's view of the room: one asset cache and one mounted scene.
///
/// Construction performs the warm-up, so the model is already cached by
/// the time the first [`render`](ShowcasePage::render) runs.
pub struct ShowcasePage {
    config: ShowcaseConfig,
    assets: Arc<AssetCache>,
    room: RoomScene,
}

impl ShowcasePage {
    pub async fn startup(source: impl AssetSource, config: ShowcaseConfig) -> SceneResult<Self> {
        Self::with_cache(Arc::new(AssetCache::new(source)), config).await
    }

    /// Start up against an existing cache, e.g. one shared with other pages.
    pub async fn with_cache(assets: Arc<AssetCache>, config: ShowcaseConfig) -> SceneResult<Self> {
        RoomScene::warm_up(&assets, &config).await?;
        let room = RoomScene::new(&config);
        log::info!("Showcase page ready");
        Ok(Self {
            config,
            assets,
            room,
        })
    }

    pub async fn render(&mut self, placement: Placement) -> SceneResult<RenderGroup> {
        self.room.compose(&self.assets, placement).await
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn assets(&self) -> &Arc<AssetCache> {
        &self.assets
    }

    pub fn room(&self) -> &RoomScene {
        &self.room
    }
}
