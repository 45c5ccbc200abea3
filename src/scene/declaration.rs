//! Declarations the room emits for the host renderer
//!
//! A [`RenderGroup`] is pure data: surfaces with their geometry and
//! material, plus the post-processing stages that apply to them. The host
//! turns it into draw calls each frame.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::assets::{EmbeddedMaterial, Geometry};
use crate::pipeline::postprocess::SelectiveBloom;
use crate::resources::MaterialDefinition;

use super::transform::Placement;

static NEXT_SURFACE_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Stable, renderer-visible reference to one emitted surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    /// Allocate a handle no other surface carries
    pub fn new() -> Self {
        Self(NEXT_SURFACE_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Material a surface is drawn with
#[derive(Debug, Clone)]
pub enum SurfaceMaterial {
    /// One of the scene's own material definitions
    Defined(Arc<MaterialDefinition>),
    /// The material stored in the model file
    Embedded(Arc<EmbeddedMaterial>),
}

impl SurfaceMaterial {
    pub fn name(&self) -> &str {
        match self {
            SurfaceMaterial::Defined(material) => &material.name,
            SurfaceMaterial::Embedded(material) => &material.name,
        }
    }

    pub fn as_defined(&self) -> Option<&Arc<MaterialDefinition>> {
        match self {
            SurfaceMaterial::Defined(material) => Some(material),
            SurfaceMaterial::Embedded(_) => None,
        }
    }
}

/// One renderable surface: a surface group's geometry with its material
#[derive(Debug, Clone)]
pub struct Surface {
    pub group: String,
    pub geometry: Arc<Geometry>,
    pub material: SurfaceMaterial,
    pub handle: Option<SurfaceHandle>,
}

/// A post-processing effect
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SelectiveBloom(SelectiveBloom),
}

/// Ordered post-processing stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectComposer {
    pub effects: Vec<Effect>,
}

impl EffectComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn selective_blooms(&self) -> impl Iterator<Item = &SelectiveBloom> {
        self.effects.iter().map(|effect| match effect {
            Effect::SelectiveBloom(bloom) => bloom,
        })
    }
}

/// Everything the room hands to the renderer for one render
#[derive(Debug, Clone)]
pub struct RenderGroup {
    pub placement: Placement,
    pub surfaces: Vec<Surface>,
    pub effects: EffectComposer,
}

impl RenderGroup {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            surfaces: Vec::new(),
            effects: EffectComposer::new(),
        }
    }

    pub fn add_surface(&mut self, surface: Surface) -> usize {
        let index = self.surfaces.len();
        self.surfaces.push(surface);
        index
    }

    pub fn surface(&self, group: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|surface| surface.group == group)
    }

    /// Number of surfaces carrying `handle`
    pub fn count_handle(&self, handle: SurfaceHandle) -> usize {
        self.surfaces
            .iter()
            .filter(|surface| surface.handle == Some(handle))
            .count()
    }

    /// The surface carrying `handle`, if exactly one does
    pub fn resolve(&self, handle: SurfaceHandle) -> Option<&Surface> {
        let mut matches = self
            .surfaces
            .iter()
            .filter(|surface| surface.handle == Some(handle));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }
}
