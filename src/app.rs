/*
 * Application Module
 *
 * This module defines the main application model and logic for the flocking
 * simulation. It owns the window, the flock and the UI state, and drives the
 * core at a fixed tick rate:
 * - the window size is the world size, synced every frame
 * - the mouse cursor is the predator while it is inside the window
 * - ticks run from a time accumulator, capped per frame
 */

use std::sync::Mutex;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::debug::DebugInfo;
use crate::error::Result;
use crate::flock::Flock;
use crate::input::{self, Pointer};
use crate::params::{Config, RunControls, SimulationParams};
use crate::renderer::{self, BoidColors};
use crate::ui;

// Ticks beyond this per frame are dropped instead of spiralling
const MAX_TICKS_PER_FRAME: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct WindowOptions {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            fullscreen: false,
        }
    }
}

/// Everything the binary decides before the window opens.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Startup {
    pub config: Config,
    pub window: WindowOptions,
    pub background: [u8; 3],
    /// `None` gives every boid a random hue.
    pub boid_color: Option<[u8; 3]>,
}

// nannou's model function cannot capture, so the startup options wait here
static STARTUP: Mutex<Option<Startup>> = Mutex::new(None);

/// Open the window and run until it is closed.
pub fn run(startup: Startup) -> Result<()> {
    startup.config.validate()?;

    match STARTUP.lock() {
        Ok(mut slot) => *slot = Some(startup),
        Err(poisoned) => *poisoned.into_inner() = Some(startup),
    }

    nannou::app(model).update(update).run();
    Ok(())
}

fn take_startup() -> Startup {
    let taken = match STARTUP.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    taken.unwrap_or_default()
}

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub params: SimulationParams,
    pub controls: RunControls,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub pointer: Pointer,
    pub colors: BoidColors,
    pub background: Rgb<u8>,
    pub color_rng: StdRng,
    // Fixed tick rate
    pub tick_accumulator: Duration,
    pub last_update_time: Instant,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let startup = take_startup();
    let Startup {
        config,
        window: window_options,
        background,
        boid_color,
    } = startup;

    let mut builder = app
        .new_window()
        .title("Boids")
        .size(window_options.width, window_options.height)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_exited(input::mouse_exited)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event);
    if window_options.fullscreen {
        builder = builder.fullscreen();
    }

    let window_id = match builder.build() {
        Ok(id) => id,
        Err(err) => {
            log::error!("Failed to open window: {:?}", err);
            std::process::exit(1);
        }
    };
    let Some(window) = app.window(window_id) else {
        log::error!("Window {:?} vanished after creation", window_id);
        std::process::exit(1);
    };

    // Create the UI
    let egui = Egui::from_window(&window);

    // The world is the window
    let mut params = config.params;
    let rect = window.rect();
    if rect.w() > 0.0 && rect.h() > 0.0 {
        params.width = rect.w();
        params.height = rect.h();
    }

    let controls = config.controls;
    let flock = match Flock::new(controls.num_boids, &params, config.seed) {
        Ok(flock) => flock,
        Err(err) => {
            log::error!("Failed to spawn flock: {}", err);
            std::process::exit(1);
        }
    };

    let mut color_rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let colors = match boid_color {
        Some([r, g, b]) => BoidColors::Fixed(rgb(r, g, b)),
        None => BoidColors::random_hues(flock.len(), &mut color_rng),
    };
    let [r, g, b] = background;

    log::info!(
        "Window {}x{}{}, {} boids at {} ticks/s",
        params.width,
        params.height,
        if window_options.fullscreen { " (fullscreen)" } else { "" },
        flock.len(),
        controls.ticks_per_second
    );

    Model {
        flock,
        params,
        controls,
        egui,
        debug_info: DebugInfo::default(),
        pointer: Pointer::default(),
        colors,
        background: rgb(r, g, b),
        color_rng,
        tick_accumulator: Duration::ZERO,
        last_update_time: Instant::now(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    sync_world_size(app.window_rect(), &mut model.params);

    model.egui.set_elapsed_time(update.since_start);
    let response = ui::update_ui(&mut model.egui, &mut model.params, &mut model.controls, &model.debug_info);
    if response.params_changed {
        log::debug!("Parameters changed: {:?}", model.params);
    }
    if needs_respawn(&response) {
        reset_flock(model);
    }

    let now = Instant::now();
    let elapsed = now.duration_since(model.last_update_time);
    model.last_update_time = now;

    if model.controls.pause_simulation {
        model.tick_accumulator = Duration::ZERO;
        model.debug_info.ticks_per_frame = 0;
        return;
    }

    let tick = Duration::from_secs_f32(1.0 / model.controls.ticks_per_second.max(1.0));
    model.tick_accumulator += elapsed;

    let mut ticks_this_frame = 0;
    while model.tick_accumulator >= tick && ticks_this_frame < MAX_TICKS_PER_FRAME {
        model.tick_accumulator -= tick;

        model.pointer.tick();
        let predator = if model.controls.enable_predator {
            model.pointer.predator()
        } else {
            None
        };
        model.flock.set_predator(predator);

        if let Err(err) = model.flock.step(&model.params) {
            log::warn!("Tick rejected, pausing: {}", err);
            model.controls.pause_simulation = true;
            break;
        }
        ticks_this_frame += 1;
    }

    // Drop the backlog after a stall
    if ticks_this_frame == MAX_TICKS_PER_FRAME {
        model.tick_accumulator = Duration::ZERO;
    }

    model.debug_info.ticks_per_frame = ticks_this_frame;
    model.debug_info.total_ticks = model.flock.ticks();
    model.debug_info.predator_active = !model.flock.predators().is_empty();
    model.debug_info.record_flock(model.flock.boids());
}

// Follow window resizes; a minimised window keeps the last size
fn sync_world_size(window_rect: Rect, params: &mut SimulationParams) {
    let (width, height) = (window_rect.w(), window_rect.h());
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    if width != params.width || height != params.height {
        log::info!("World resized to {:.0}x{:.0}", width, height);
        params.width = width;
        params.height = height;
    }
}

/// Respawn the flock with the current boid count.
pub fn reset_flock(model: &mut Model) {
    match model.flock.reset(model.controls.num_boids, &model.params) {
        Ok(()) => {
            model.colors.match_len(model.flock.len(), &mut model.color_rng);
            model.pointer = Pointer::default();
        }
        Err(err) => log::warn!("Reset rejected: {}", err),
    }
}

// The boid count only changes through a fresh array
fn needs_respawn(response: &ui::UiResponse) -> bool {
    response.reset_requested || response.num_boids_changed
}
