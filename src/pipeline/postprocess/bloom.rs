//! Selective bloom post-processing effect
//!
//! Bloom restricted to a selection of surfaces: only the selected surfaces
//! are drawn into the luminance mask, so everything else in the frame stays
//! untouched no matter how bright it is.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::FULLSCREEN_VERTEX_SHADER;
use crate::scene::SurfaceHandle;

/// How an effect's output is combined with the frame underneath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendFunction {
    /// Effect output is discarded
    Skip,
    /// Effect output replaces the frame, weighted by opacity
    Normal,
    /// Effect output is added to the frame
    #[default]
    Add,
    /// Inverse multiply; brightens without exceeding 1.0
    Screen,
}

impl BlendFunction {
    pub fn blend(self, base: Vec3, layer: Vec3, opacity: f32) -> Vec3 {
        match self {
            BlendFunction::Skip => base,
            BlendFunction::Normal => base.lerp(layer, opacity),
            BlendFunction::Add => base + layer * opacity,
            BlendFunction::Screen => {
                let screened = Vec3::ONE - (Vec3::ONE - base) * (Vec3::ONE - layer);
                base.lerp(screened, opacity)
            }
        }
    }

    fn gpu_index(self) -> u32 {
        match self {
            BlendFunction::Skip => 0,
            BlendFunction::Normal => 1,
            BlendFunction::Add => 2,
            BlendFunction::Screen => 3,
        }
    }
}

/// Tunables of the bloom pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub intensity: f32,
    /// Luminance below which nothing blooms
    pub luminance_threshold: f32,
    /// Width of the ramp above the threshold
    pub luminance_smoothing: f32,
    pub blend: BlendFunction,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            intensity: 1.2,
            luminance_threshold: 0.2,
            luminance_smoothing: 0.8,
            blend: BlendFunction::Add,
        }
    }
}

/// Relative luminance (Rec. 709)
pub fn luminance(color: Vec3) -> f32 {
    color.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bloom restricted to one selected surface
#[derive(Debug, Clone, PartialEq)]
pub struct SelectiveBloom {
    pub settings: BloomSettings,
    pub selection: SurfaceHandle,
}

impl SelectiveBloom {
    pub fn new(settings: BloomSettings, selection: SurfaceHandle) -> Self {
        Self {
            settings,
            selection,
        }
    }

    pub fn is_selected(&self, handle: SurfaceHandle) -> bool {
        self.selection == handle
    }

    /// Mask weight for a texel of the given luminance
    pub fn bloom_weight(&self, luminance: f32) -> f32 {
        let threshold = self.settings.luminance_threshold;
        smoothstep(
            threshold,
            threshold + self.settings.luminance_smoothing,
            luminance,
        )
    }

    /// Bright-pass output of a texel drawn by `surface`
    pub fn bright_pass(&self, surface: Option<SurfaceHandle>, color: Vec3) -> Vec3 {
        match surface {
            Some(handle) if self.is_selected(handle) => color * self.bloom_weight(luminance(color)),
            _ => Vec3::ZERO,
        }
    }

    /// Final color of a texel given the blurred bloom texture
    pub fn composite(&self, base: Vec3, blurred: Vec3) -> Vec3 {
        self.settings
            .blend
            .blend(base, blurred * self.settings.intensity, 1.0)
    }

    pub fn params(&self) -> SelectiveBloomParams {
        SelectiveBloomParams {
            threshold: self.settings.luminance_threshold,
            smoothing: self.settings.luminance_smoothing,
            intensity: self.settings.intensity,
            blend: self.settings.blend.gpu_index(),
        }
    }

    /// WGSL source of the luminance mask pass
    pub fn shader_source() -> String {
        format!("{FULLSCREEN_VERTEX_SHADER}{SELECTIVE_BLOOM_MASK_FRAGMENT}")
    }
}

/// Uniform block of the mask pass
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SelectiveBloomParams {
    pub threshold: f32,
    pub smoothing: f32,
    pub intensity: f32,
    pub blend: u32,
}

/// Mask fragment stage: `selection_texture` holds 1.0 where a selected
/// surface was drawn, 0.0 elsewhere.
pub const SELECTIVE_BLOOM_MASK_FRAGMENT: &str = r#"
struct SelectiveBloomParams {
    threshold: f32,
    smoothing: f32,
    intensity: f32,
    blend: u32,
}

@group(0) @binding(0) var hdr_texture: texture_2d<f32>;
@group(0) @binding(1) var selection_texture: texture_2d<f32>;
@group(0) @binding(2) var linear_sampler: sampler;
@group(0) @binding(3) var<uniform> params: SelectiveBloomParams;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(hdr_texture, linear_sampler, input.uv).rgb;
    let selected = textureSample(selection_texture, linear_sampler, input.uv).r;
    let l = dot(color, vec3<f32>(0.2126, 0.7152, 0.0722));
    let weight = smoothstep(params.threshold, params.threshold + params.smoothing, l);
    return vec4<f32>(color * weight * selected, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bloom() -> (SelectiveBloom, SurfaceHandle) {
        let handle = SurfaceHandle::new();
        (SelectiveBloom::new(BloomSettings::default(), handle), handle)
    }

    #[test]
    fn test_default_settings() {
        let settings = BloomSettings::default();
        assert_eq!(settings.intensity, 1.2);
        assert_eq!(settings.luminance_threshold, 0.2);
        assert_eq!(settings.luminance_smoothing, 0.8);
        assert_eq!(settings.blend, BlendFunction::Add);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.2, 0.0)]
    #[case(0.6, 0.5)]
    #[case(1.0, 1.0)]
    #[case(4.0, 1.0)]
    fn test_bloom_weight(#[case] luminance: f32, #[case] expected: f32) {
        let (bloom, _) = bloom();
        assert!((bloom.bloom_weight(luminance) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_bright_pass_only_for_selection() {
        let (bloom, screens) = bloom();
        let other = SurfaceHandle::new();
        let hot = Vec3::splat(2.0);

        assert_eq!(bloom.bright_pass(Some(screens), hot), hot);
        assert_eq!(bloom.bright_pass(Some(other), hot), Vec3::ZERO);
        assert_eq!(bloom.bright_pass(None, hot), Vec3::ZERO);
        assert_eq!(bloom.bright_pass(Some(screens), Vec3::splat(0.1)), Vec3::ZERO);
    }

    #[test]
    fn test_additive_composite() {
        let (bloom, _) = bloom();
        let out = bloom.composite(Vec3::splat(0.1), Vec3::splat(0.5));
        assert!((out - Vec3::splat(0.7)).abs().max_element() < 1e-6);
    }

    #[rstest]
    #[case(BlendFunction::Skip, Vec3::splat(0.25))]
    #[case(BlendFunction::Normal, Vec3::splat(0.5))]
    #[case(BlendFunction::Add, Vec3::splat(0.75))]
    #[case(BlendFunction::Screen, Vec3::splat(0.625))]
    fn test_blend_functions(#[case] blend: BlendFunction, #[case] expected: Vec3) {
        let out = blend.blend(Vec3::splat(0.25), Vec3::splat(0.5), 1.0);
        assert!((out - expected).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_params_and_shader() {
        let (bloom, _) = bloom();
        let params = bloom.params();
        assert_eq!(params.blend, 2);
        assert_eq!(bytemuck::bytes_of(&params).len(), 16);

        let source = SelectiveBloom::shader_source();
        assert!(source.contains("fn vs_main"));
        assert!(source.contains("fn fs_main"));
    }
}
