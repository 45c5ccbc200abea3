//! The room scene shown in the portfolio's hero section

use std::sync::Arc;

use crate::assets::{AssetCache, EmbeddedMaterial, RoomAsset, TextureImage};
use crate::error::{SceneError, SceneResult};
use crate::pipeline::postprocess::{BloomSettings, SelectiveBloom};
use crate::resources::{MaterialCache, MaterialDefinition, MaterialKey, ShadingModel};
use crate::ShowcaseConfig;

use super::binding::{
    missing_groups, missing_materials, Binding, MaterialSlot, ROOM_BINDINGS, SCREENS_GROUP,
    SCREENS_MATERIAL,
};
use super::declaration::{
    Effect, EffectComposer, RenderGroup, Surface, SurfaceHandle, SurfaceMaterial,
};
use super::transform::Placement;

/// Composes the room model, its baked materials and the screen glow.
///
/// Owns the material cache and the screens handle, so repeated calls to
/// [`compose`](RoomScene::compose) reuse the same material instances and
/// select the same surface for bloom. Assets themselves are owned by the
/// shared [`AssetCache`]; dropping the scene leaves them cached.
pub struct RoomScene {
    model_path: String,
    texture_path: String,
    bloom: BloomSettings,
    materials: MaterialCache<MaterialSlot>,
    screens: SurfaceHandle,
}

impl RoomScene {
    pub fn new(config: &ShowcaseConfig) -> Self {
        Self {
            model_path: config.model_path.clone(),
            texture_path: config.texture_path.clone(),
            bloom: config.bloom,
            materials: MaterialCache::new(),
            screens: SurfaceHandle::new(),
        }
    }

    /// Fetch the room model ahead of the first composition.
    ///
    /// Called from the page's startup sequence so the first render does not
    /// wait on the model download.
    pub async fn warm_up(assets: &AssetCache, config: &ShowcaseConfig) -> SceneResult<()> {
        log::info!("Warming up room model {}", config.model_path);
        assets.preload(&config.model_path).await?;
        Ok(())
    }

    /// Handle of the surface the bloom is restricted to
    pub fn screens_handle(&self) -> SurfaceHandle {
        self.screens
    }

    pub fn materials(&self) -> &MaterialCache<MaterialSlot> {
        &self.materials
    }

    /// Build the render group for the current assets.
    ///
    /// Suspends while the model or texture is being fetched. Any missing
    /// asset, surface group or embedded material fails the whole scene.
    pub async fn compose(
        &mut self,
        assets: &AssetCache,
        placement: Placement,
    ) -> SceneResult<RenderGroup> {
        let asset = assets.model(&self.model_path).await?;
        let body_texture = assets.texture(&self.texture_path).await?;
        validate(&asset)?;

        let mut group = RenderGroup::new(placement);

        for (name, binding) in ROOM_BINDINGS {
            let material = match *binding {
                Binding::Palette(slot) => {
                    SurfaceMaterial::Defined(self.material(slot, &body_texture))
                }
                Binding::Embedded(material) => {
                    SurfaceMaterial::Embedded(embedded_material(&asset, material)?)
                }
            };
            group.add_surface(surface(&asset, name, material, None)?);
        }

        let screens_material =
            SurfaceMaterial::Embedded(embedded_material(&asset, SCREENS_MATERIAL)?);
        group.add_surface(surface(
            &asset,
            SCREENS_GROUP,
            screens_material,
            Some(self.screens),
        )?);

        group.effects = EffectComposer::new().with_effect(Effect::SelectiveBloom(
            SelectiveBloom::new(self.bloom, self.screens),
        ));

        log::debug!(
            "Composed room: {} surfaces, {} materials constructed so far",
            group.surfaces.len(),
            self.materials.constructed()
        );
        Ok(group)
    }

    fn material(
        &mut self,
        slot: MaterialSlot,
        body_texture: &Arc<TextureImage>,
    ) -> Arc<MaterialDefinition> {
        let key = match slot.color() {
            Some(color) => MaterialKey::Rgb(color, ShadingModel::Phong),
            None => MaterialKey::Texture(body_texture.id, ShadingModel::Phong),
        };
        self.materials.get_or_create(slot, key, || {
            slot.flat_definition().unwrap_or_else(|| {
                MaterialDefinition::phong_textured(slot.name(), Arc::clone(body_texture))
            })
        })
    }
}

fn validate(asset: &RoomAsset) -> SceneResult<()> {
    let groups = missing_groups(asset);
    if let Some(first) = groups.first() {
        log::error!("Room model is missing surface groups: {:?}", groups);
        return Err(SceneError::UnknownSurfaceGroup(first.to_string()));
    }
    let materials = missing_materials(asset);
    if let Some(first) = materials.first() {
        log::error!("Room model is missing embedded materials: {:?}", materials);
        return Err(SceneError::UnknownMaterial(first.to_string()));
    }
    Ok(())
}

fn embedded_material(
    asset: &RoomAsset,
    name: &str,
) -> SceneResult<Arc<EmbeddedMaterial>> {
    asset
        .material(name)
        .cloned()
        .ok_or_else(|| SceneError::UnknownMaterial(name.to_string()))
}

fn surface(
    asset: &RoomAsset,
    name: &str,
    material: SurfaceMaterial,
    handle: Option<SurfaceHandle>,
) -> SceneResult<Surface> {
    let group = asset
        .group(name)
        .ok_or_else(|| SceneError::UnknownSurfaceGroup(name.to_string()))?;
    Ok(Surface {
        group: name.to_string(),
        geometry: Arc::clone(&group.geometry),
        material,
        handle,
    })
}
