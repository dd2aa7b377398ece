/*
 * Boids Flocking Simulation - Module Definitions
 *
 * The core (boid, perception, rules, spatial_grid, physics, flock) is pure
 * and has no windowing dependency in its logic. The driver modules (app,
 * input, renderer, ui, debug) wrap it in a nannou window with an egui panel.
 */

// Re-export key components for easier access
pub use boid::{Boid, Predator};
pub use error::{FlockError, Result};
pub use flock::Flock;
pub use params::{Config, EdgeMode, RunControls, SimulationParams};
pub use perception::{Metric, NeighborPolicy, PerceivedNeighbor};
pub use physics::{next_tick, update_boids};
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod app;
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod input;
pub mod params;
pub mod perception;
pub mod physics;
pub mod renderer;
pub mod rules;
pub mod spatial_grid;
pub mod ui;

// Half length of a boid sprite in pixels
pub const BOID_SIZE: f32 = 7.0;
