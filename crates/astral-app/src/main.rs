//! Binary entry point: config, logging, registry, then the world loop.
//!
//! Runs headless when no GPU adapter is available; chunks still generate,
//! mesh, and persist, they just never reach the upload stage.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};

use astral_config::{CliArgs, Config, default_data_dir};
use astral_render::acquire_headless_context;
use astral_voxel::{BlockRegistry, load_definitions_dir};
use astral_world::{World, WorldSettings};

/// How long the demo loop runs before shutting down.
const RUN_SECONDS: u64 = 10;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(|| dirs::config_dir().map(|dir| dir.join("astral")))
        .unwrap_or_else(|| PathBuf::from("."));
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config unavailable ({err}), using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    astral_log::init_logging(None, cfg!(debug_assertions), Some(&config));

    run(config);
}

fn build_registry(config: &Config) -> Arc<BlockRegistry> {
    let mut registry = BlockRegistry::with_defaults();
    if let Some(dir) = &config.world.definitions_dir {
        let loaded = load_definitions_dir(&mut registry, dir);
        info!(dir = %dir.display(), loaded, "block definitions loaded");
    }
    registry.log_summary();
    Arc::new(registry)
}

fn run(config: Config) {
    let registry = build_registry(&config);

    let settings = WorldSettings {
        name: config.world.name.clone(),
        data_dir: config.world.data_dir.clone().or_else(default_data_dir),
        render_distance: config.streaming.render_distance,
        max_chunks_per_frame: config.streaming.max_chunks_per_frame,
        generation_threads: config.streaming.generation_threads,
        mesh_threads: config.streaming.mesh_threads,
        atlas_columns: config.render.atlas_columns,
    };
    let mut world = World::new(Arc::clone(&registry), settings);

    let radius = config.world.planet_radius;
    world.add_planet("earth", Vec3::ZERO, radius, config.world.seed);

    let gpu = acquire_headless_context();
    if gpu.is_none() {
        warn!("running headless: chunks will generate and mesh but not upload");
    }

    // Orbit the camera just above the surface so streaming keeps working.
    let start = Instant::now();
    let mut frame = 0u64;
    while start.elapsed().as_secs() < RUN_SECONDS {
        let angle = frame as f32 * 0.002;
        let camera = Vec3::new(angle.cos(), 0.1, angle.sin()) * (radius + 4.0);

        world.update(camera);
        world.process_main_thread_tasks(gpu.as_ref());

        if frame % 60 == 0 {
            let counters = world.counters();
            info!(
                frame,
                generated = counters.generated,
                meshed = counters.meshed,
                uploaded = counters.uploaded,
                evicted = counters.evicted,
                visible = world.visible_meshes(camera).len(),
                "pipeline status"
            );
        }

        frame += 1;
        std::thread::sleep(FRAME_TIME);
    }

    world.shutdown();
    info!(?frame, counters = ?world.counters(), "run complete");
}
