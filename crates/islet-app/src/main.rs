//! The binary entry point: runs the configured number of frames headless.

use std::process::ExitCode;

use clap::Parser;
use islet_app::{FrameError, FrameOrchestrator, HeadlessBackend};
use islet_config::{CliArgs, Config, ConfigError, default_config_dir};
use islet_terrain::FbmParams;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    islet_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), AppError> {
    let noise = &config.terrain.noise;
    let mut backend = HeadlessBackend::new(FbmParams {
        seed: noise.seed,
        octaves: noise.octaves,
        lacunarity: noise.lacunarity,
        persistence: noise.persistence,
        base_frequency: noise.base_frequency,
    });
    let mut orchestrator = FrameOrchestrator::new(config)?;
    orchestrator.set_viewport(config.window.width, config.window.height);

    let frame_time = f64::from(config.simulation.frame_time);
    let mut rebuilds = 0u32;
    for _ in 0..config.simulation.frames {
        if orchestrator.frame(&mut backend, frame_time)?.mesh_rebuilt {
            rebuilds += 1;
        }
    }

    if let Some(mesh) = orchestrator.mesh() {
        tracing::info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            rebuilds,
            "terrain"
        );
    }
    let hierarchy = orchestrator.hierarchy();
    for id in hierarchy.ids() {
        let p = hierarchy.translation(id);
        tracing::info!(
            actor = %hierarchy.actor(id).name,
            x = p.x,
            y = p.y,
            z = p.z,
            "final position"
        );
    }
    let stats = backend.stats();
    tracing::info!(
        frames = config.simulation.frames,
        sim_time = orchestrator.clock().sim_time(),
        shadow_passes = stats.shadow_passes,
        main_passes = stats.main_passes,
        uniform_bytes = stats.uniform_bytes,
        "{} finished",
        config.window.title
    );
    Ok(())
}
