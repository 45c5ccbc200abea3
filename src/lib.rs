//! Room Showcase - the 3D room scene of a portfolio page
//!
//! Loads a pre-built room model, binds its surface groups to a fixed palette
//! of baked materials, and declares a bloom pass restricted to the monitor
//! screens. The crate never renders anything itself: it produces a
//! [`RenderGroup`] that a host renderer draws.
//!
//! # Features
//! - glTF/GLB import keyed by sanitized node names
//! - Per-path asset cache shared across scene instances
//! - Material cache that rebuilds only when its inputs change
//! - Selective bloom keyed by a stable surface handle

pub mod assets;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod resources;
pub mod scene;

#[cfg(test)]
mod test_fixtures;

pub use assets::{AssetCache, AssetSource, FileSystemSource, MemorySource};
pub use error::{AssetError, SceneError};
pub use page::ShowcasePage;
pub use pipeline::postprocess::{BloomSettings, SelectiveBloom};
pub use scene::{Placement, RenderGroup, RoomScene};

/// Configuration of the room scene
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseConfig {
    /// Path of the room model, relative to the asset root
    pub model_path: String,
    /// Path of the body texture
    pub texture_path: String,
    pub bloom: BloomSettings,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            model_path: "/models/optimized-room.glb".to_string(),
            texture_path: "/images/textures/mat1.png".to_string(),
            bloom: BloomSettings::default(),
        }
    }
}
