/*
 * Boids Flocking Simulation
 *
 * Boids steer by cohesion, separation and alignment with the boids they can
 * see, avoid the window edges and flee the mouse cursor. Parameters come from
 * an optional TOML file, then from the command line, and can be tuned live in
 * the control panel.
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use flocking::app::{self, Startup, WindowOptions};
use flocking::{Config, EdgeMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Boids flocking simulation", long_about = None)]
struct Args {
    /// Number of boids [default: 150]
    #[arg(short = 'n', long, alias = "n_boids")]
    n_boids: Option<usize>,

    /// Simulation ticks per second [default: 60]
    #[arg(long)]
    fps: Option<f32>,

    /// Show the FPS counter
    #[arg(long, alias = "show_fps")]
    show_fps: bool,

    /// Open the window fullscreen
    #[arg(long)]
    fullscreen: bool,

    /// Wrap around the window edges instead of steering away from them
    #[arg(long)]
    wrap: bool,

    /// Window width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Background colour
    #[arg(long, alias = "bg_col", num_args = 3, value_names = ["R", "G", "B"])]
    bg_col: Option<Vec<u8>>,

    /// Boid colour; every boid gets a random hue when omitted
    #[arg(long, alias = "boid_col", num_args = 3, value_names = ["R", "G", "B"])]
    boid_col: Option<Vec<u8>>,

    /// Maximum boid speed in pixels per tick [default: 15]
    #[arg(short = 's', long)]
    speed: Option<f32>,

    /// Seed for a reproducible spawn
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with simulation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the mouse predator
    #[arg(long)]
    no_predator: bool,

    /// Enable debug logging and the debug overlay
    #[arg(short, long)]
    debug: bool,
}

fn rgb(values: Option<Vec<u8>>) -> Option<[u8; 3]> {
    values.and_then(|v| <[u8; 3]>::try_from(v.as_slice()).ok())
}

impl Args {
    // Command line flags win over the config file
    fn into_startup(self, mut config: Config) -> Startup {
        if let Some(n_boids) = self.n_boids {
            config.controls.num_boids = n_boids;
        }
        if let Some(fps) = self.fps {
            config.controls.ticks_per_second = fps;
        }
        if let Some(speed) = self.speed {
            config.params.max_speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.wrap {
            config.params.edge_mode = EdgeMode::Wrap;
        }
        if self.no_predator {
            config.controls.enable_predator = false;
        }
        config.controls.show_fps |= self.show_fps;
        config.controls.show_debug |= self.debug;
        config.params.width = self.width as f32;
        config.params.height = self.height as f32;

        Startup {
            config,
            window: WindowOptions {
                width: self.width,
                height: self.height,
                fullscreen: self.fullscreen,
            },
            background: rgb(self.bg_col).unwrap_or([0, 0, 0]),
            boid_color: rgb(self.boid_col),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let startup = args.into_startup(config);
    startup
        .config
        .validate()
        .context("Invalid simulation parameters")?;

    log::info!(
        "Starting with {} boids, max speed {}, {:?} edges",
        startup.config.controls.num_boids,
        startup.config.params.max_speed,
        startup.config.params.edge_mode
    );

    app::run(startup).context("Simulation stopped")?;
    Ok(())
}
