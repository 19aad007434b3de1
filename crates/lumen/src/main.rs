use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::SceneDescription;
use lumen_renderer::{build_world, render_parallel, save_image, Camera, ImageBuffer, RenderOutcome, RenderSettings};

mod cli;
mod scenes;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let mut scene = match &args.scene_file {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene file {}", path.display()))?,
        None => {
            log::info!("Using built-in scene {:?}", args.scene);
            scenes::builtin(args.scene)
        }
    };

    apply_overrides(&mut scene, &args);
    scene.validate().context("Invalid scene after command line overrides")?;

    if let Some(path) = &args.dump_scene {
        let json = serde_json::to_string_pretty(&scene)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote scene description to {}", path.display());
        return Ok(());
    }

    let world = build_world(&scene).context("Failed to build scene")?;
    let camera = Camera::initialize(&scene.camera);

    let settings = RenderSettings::default()
        .with_threads(args.threads)
        .with_bucket_size(args.bucket_size)
        .with_seed(args.seed);

    let mut image = ImageBuffer::new(camera.image_width(), camera.image_height());
    match render_parallel(&camera, &world, &settings, &mut image)? {
        RenderOutcome::Completed => {}
        RenderOutcome::Cancelled {
            buckets_done,
            buckets_total,
        } => log::warn!("Render stopped early: {}/{} buckets", buckets_done, buckets_total),
    }

    save_image(&image, &args.output).with_context(|| format!("Failed to save {}", args.output.display()))?;

    Ok(())
}

fn apply_overrides(scene: &mut SceneDescription, args: &Args) {
    if let Some(width) = args.width {
        scene.camera.image_width = width;
    }
    if let Some(spp) = args.spp {
        scene.camera.samples_per_pixel = spp;
    }
    if let Some(depth) = args.depth {
        scene.camera.max_depth = depth;
    }
}
