//! Asset loading
//!
//! Fetches the room model and its textures from an [`AssetSource`], decodes
//! them once, and shares the results through the [`AssetCache`].

mod cache;
mod gltf_import;
mod source;
mod texture;
mod types;

pub use cache::AssetCache;
pub use gltf_import::{import_room_asset, sanitize_node_name};
pub use source::{normalize_path, AssetFuture, AssetSource, FileSystemSource, MemorySource};
pub use texture::{TextureId, TextureImage};
pub use types::*;
