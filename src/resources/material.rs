//! Material definitions for the baked room look

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use crate::assets::{TextureId, TextureImage};

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    pub fn to_hex(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Linear RGB, as the shader consumes it
    pub fn to_linear(self) -> Vec3 {
        fn channel(c: u8) -> f32 {
            let c = f32::from(c) / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Vec3::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Shading models the room uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadingModel {
    /// Glossy-reflective Blinn-Phong
    #[default]
    Phong,
    /// Diffuse only
    Lambert,
    /// Metallic-roughness PBR
    Standard,
}

impl ShadingModel {
    fn gpu_index(self) -> u32 {
        match self {
            ShadingModel::Phong => 0,
            ShadingModel::Lambert => 1,
            ShadingModel::Standard => 2,
        }
    }
}

/// Where a material's base color comes from
#[derive(Debug, Clone)]
pub enum ColorSource {
    Rgb(Color),
    Texture(Arc<TextureImage>),
}

/// The inputs a material is constructed from.
///
/// Textures are keyed by identity, not by content: a re-decoded texture is
/// a new input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    Rgb(Color, ShadingModel),
    Texture(TextureId, ShadingModel),
}

/// A named shading configuration shared by one or more surface groups
#[derive(Debug, Clone)]
pub struct MaterialDefinition {
    pub name: String,
    pub color: ColorSource,
    pub shading: ShadingModel,
}

impl MaterialDefinition {
    pub fn phong(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color: ColorSource::Rgb(color),
            shading: ShadingModel::Phong,
        }
    }

    pub fn phong_textured(name: &str, texture: Arc<TextureImage>) -> Self {
        Self {
            name: name.to_string(),
            color: ColorSource::Texture(texture),
            shading: ShadingModel::Phong,
        }
    }

    pub fn key(&self) -> MaterialKey {
        match &self.color {
            ColorSource::Rgb(color) => MaterialKey::Rgb(*color, self.shading),
            ColorSource::Texture(texture) => MaterialKey::Texture(texture.id, self.shading),
        }
    }

    pub fn texture(&self) -> Option<&Arc<TextureImage>> {
        match &self.color {
            ColorSource::Texture(texture) => Some(texture),
            ColorSource::Rgb(_) => None,
        }
    }

    /// Create a uniform data struct for GPU
    ///
    /// Textured materials use white as base color; the map supplies the color.
    pub fn uniform_data(&self) -> MaterialUniformData {
        let (base_color, textured) = match &self.color {
            ColorSource::Rgb(color) => (color.to_linear().extend(1.0), 0),
            ColorSource::Texture(_) => (Vec4::ONE, 1),
        };
        MaterialUniformData {
            base_color,
            flags: [self.shading.gpu_index(), textured, 0, 0],
        }
    }
}

/// Material uniform data for GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniformData {
    pub base_color: Vec4,
    pub flags: [u32; 4], // x=shading model, y=has color map, zw=padding
}

struct CacheEntry {
    key: MaterialKey,
    material: Arc<MaterialDefinition>,
}

/// Material instances keyed on their constructor inputs.
///
/// Each slot holds the material built from the most recent key it was asked
/// for. Asking again with the same key returns the same `Arc`; a different
/// key rebuilds and replaces the slot's entry.
pub struct MaterialCache<S> {
    entries: HashMap<S, CacheEntry>,
    constructed: usize,
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> MaterialCache<S> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            constructed: 0,
        }
    }

    /// Material for `slot`, built with `build` only when `key` changed.
    pub fn get_or_create(
        &mut self,
        slot: S,
        key: MaterialKey,
        build: impl FnOnce() -> MaterialDefinition,
    ) -> Arc<MaterialDefinition> {
        if let Some(entry) = self.entries.get(&slot) {
            if entry.key == key {
                return Arc::clone(&entry.material);
            }
            log::debug!("Material inputs for {:?} changed, rebuilding", slot);
        }

        let material = Arc::new(build());
        debug_assert_eq!(material.key(), key, "material built from a different key");
        log::debug!("Constructed material '{}' for {:?}", material.name, slot);
        self.constructed += 1;
        self.entries.insert(
            slot,
            CacheEntry {
                key,
                material: Arc::clone(&material),
            },
        );
        material
    }

    pub fn get(&self, slot: S) -> Option<&Arc<MaterialDefinition>> {
        self.entries.get(&slot).map(|entry| &entry.material)
    }

    /// Total number of materials ever constructed by this cache
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<S: Copy + Eq + Hash + std::fmt::Debug> Default for MaterialCache<S> {
    fn default() -> Self {
        Self::new()
    }
}
