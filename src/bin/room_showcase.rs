//! Command line host for the room scene
//!
//! Serves assets from a directory, runs the page startup sequence and
//! composes the scene a number of times, printing what a renderer would
//! receive.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use room_showcase::scene::{Placement, RenderGroup, SurfaceMaterial};
use room_showcase::{BloomSettings, FileSystemSource, ShowcaseConfig, ShowcasePage};

/// Room showcase scene composer.
#[derive(Parser, Debug)]
#[command(
    name = "room_showcase",
    about = "Compose the portfolio's 3D room scene from a local asset directory"
)]
struct Args {
    /// Directory the asset paths are resolved against.
    #[arg(long, default_value = "public")]
    assets_root: PathBuf,

    /// Path of the room model under the asset root.
    #[arg(long, default_value = "/models/optimized-room.glb")]
    model: String,

    /// Path of the body texture under the asset root.
    #[arg(long, default_value = "/images/textures/mat1.png")]
    texture: String,

    /// How many times to compose the scene.
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    renders: u32,

    /// Uniform scale of the room.
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Rotation around the vertical axis, in radians.
    #[arg(long, default_value = "0.0")]
    rotation_y: f32,
}

impl Args {
    fn config(&self) -> ShowcaseConfig {
        ShowcaseConfig {
            model_path: self.model.clone(),
            texture_path: self.texture.clone(),
            bloom: BloomSettings::default(),
        }
    }

    fn placement(&self) -> Placement {
        Placement::new()
            .with_rotation(Vec3::new(0.0, self.rotation_y, 0.0))
            .with_scale(Vec3::splat(self.scale))
    }
}

fn print_summary(group: &RenderGroup) {
    println!("surfaces: {}", group.surfaces.len());
    for surface in &group.surfaces {
        let kind = match &surface.material {
            SurfaceMaterial::Defined(_) => "defined",
            SurfaceMaterial::Embedded(_) => "embedded",
        };
        let marker = if surface.handle.is_some() { " [bloom]" } else { "" };
        println!(
            "  {:<28} {:<10} {:<8} {} vertices{}",
            surface.group,
            surface.material.name(),
            kind,
            surface.geometry.vertex_count(),
            marker
        );
    }
    for bloom in group.effects.selective_blooms() {
        let settings = &bloom.settings;
        println!(
            "selective bloom: intensity {} threshold {} smoothing {} blend {:?}",
            settings.intensity,
            settings.luminance_threshold,
            settings.luminance_smoothing,
            settings.blend
        );
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting room showcase (assets: {})", args.assets_root.display());

    let source = FileSystemSource::new(args.assets_root.clone());
    let result = pollster::block_on(async {
        let mut page = ShowcasePage::startup(source, args.config()).await?;
        let mut group = page.render(args.placement()).await?;
        for _ in 1..args.renders {
            group = page.render(args.placement()).await?;
        }
        log::info!(
            "Composed {} time(s), {} materials constructed",
            args.renders,
            page.room().materials().constructed()
        );
        Ok::<_, room_showcase::SceneError>(group)
    });

    match result {
        Ok(group) => {
            print_summary(&group);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Room scene failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
