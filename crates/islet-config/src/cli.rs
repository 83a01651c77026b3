//! Command-line argument parsing for Islet.

use std::path::PathBuf;

use clap::Parser;
use islet_lighting::LightViewStrategy;

use crate::Config;

/// Islet command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "islet", about = "Procedural island terrain with orbiting actors")]
pub struct CliArgs {
    /// Framebuffer width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Framebuffer height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Terrain grid resolution (samples per side).
    #[arg(long)]
    pub grid: Option<usize>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Shadow camera strategy (orbit, direct).
    #[arg(long)]
    pub light_strategy: Option<LightViewStrategy>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(grid) = args.grid {
            self.terrain.grid_width = grid;
            self.terrain.grid_height = grid;
        }
        if let Some(frames) = args.frames {
            self.simulation.frames = frames;
        }
        if let Some(strategy) = args.light_strategy {
            self.light.strategy = strategy;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
