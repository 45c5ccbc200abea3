//! Data types produced by model loading.

use std::collections::HashMap;
use std::sync::Arc;

/// CPU-side geometry of one surface group.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// Vertex positions (always present).
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, if the primitive has them.
    pub normals: Option<Vec<[f32; 3]>>,
    /// First UV set, if the primitive has one.
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Triangle indices; `None` means non-indexed drawing.
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices, or vertices for non-indexed geometry.
    pub fn element_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), |indices| indices.len())
    }
}

/// Material stored inside the model file.
///
/// Only the factors a renderer needs to reproduce the baked look are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedMaterial {
    pub name: String,
    /// Base color factor (linear RGBA).
    pub base_color_factor: [f32; 4],
    /// Emissive factor (linear RGB).
    pub emissive_factor: [f32; 3],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub double_sided: bool,
    /// Whether the material samples a base color texture.
    pub has_base_color_texture: bool,
}

impl EmbeddedMaterial {
    pub fn is_emissive(&self) -> bool {
        self.emissive_factor.iter().any(|&c| c > 0.0)
    }
}

/// A named subset of the model's geometry.
#[derive(Debug, Clone)]
pub struct SurfaceGroup {
    pub name: String,
    pub geometry: Arc<Geometry>,
    /// Name of the embedded material the primitive was authored with.
    pub material: Option<String>,
}

/// A loaded model: surface groups and embedded materials by name.
///
/// Immutable once built; shared as `Arc<RoomAsset>` by every consumer of
/// the same path.
#[derive(Debug, Default)]
pub struct RoomAsset {
    pub(crate) groups: HashMap<String, SurfaceGroup>,
    pub(crate) materials: HashMap<String, Arc<EmbeddedMaterial>>,
}

impl RoomAsset {
    pub fn group(&self, name: &str) -> Option<&SurfaceGroup> {
        self.groups.get(name)
    }

    pub fn material(&self, name: &str) -> Option<&Arc<EmbeddedMaterial>> {
        self.materials.get(name)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Surface group names, sorted.
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
