/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that carries every number
 * the update step reads: radii, max speed, rule factors, edge margin and the
 * world size. It is passed explicitly into each tick; nothing is global.
 *
 * RunControls holds what the driver needs around the core (boid count, tick
 * rate, pause, overlays). Both can be loaded from a TOML file and are edited
 * live through the UI.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlockError, Result};
use crate::perception::{Metric, NeighborPolicy};

/// How the world boundary behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// Edges are walls; boids are nudged back by edge avoidance.
    #[default]
    Avoid,
    /// The world is a torus; boids leaving one side enter the opposite one.
    Wrap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub perception: f32,
    pub predator_perception: f32,
    pub safe_space: f32,
    pub max_speed: f32,
    pub cohesion_factor: f32,
    pub separation_factor: f32,
    pub alignment_factor: f32,
    pub edge_avoid_factor: f32,
    pub predator_avoid_factor: f32,
    pub margin: f32,
    pub width: f32,
    pub height: f32,
    pub edge_mode: EdgeMode,
    pub neighbor_policy: NeighborPolicy,
    // Performance settings
    pub enable_parallel: bool,
    pub enable_spatial_grid: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            perception: 75.0,
            predator_perception: 150.0,
            safe_space: 20.0,
            max_speed: 15.0,
            cohesion_factor: 0.0005,
            separation_factor: 0.05,
            alignment_factor: 0.05,
            edge_avoid_factor: 1.0,
            predator_avoid_factor: 0.1,
            margin: 50.0,
            width: 1200.0,
            height: 800.0,
            edge_mode: EdgeMode::Avoid,
            neighbor_policy: NeighborPolicy::ExcludeSelf,
            enable_parallel: true,
            enable_spatial_grid: true,
        }
    }
}

fn invalid(name: &'static str, value: f32, reason: &'static str) -> FlockError {
    FlockError::InvalidParameter { name, value, reason }
}

fn check_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "must be finite"))
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(name, value, "must not be negative"));
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value <= 0.0 {
        return Err(invalid(name, value, "must be positive"));
    }
    Ok(())
}

impl SimulationParams {
    // Radii may be zero (blind boids); negative or non-finite values are rejected
    pub fn validate(&self) -> Result<()> {
        check_non_negative("perception", self.perception)?;
        check_non_negative("predator_perception", self.predator_perception)?;
        check_non_negative("safe_space", self.safe_space)?;
        check_non_negative("margin", self.margin)?;
        check_positive("max_speed", self.max_speed)?;
        check_positive("width", self.width)?;
        check_positive("height", self.height)?;
        check_finite("cohesion_factor", self.cohesion_factor)?;
        check_finite("separation_factor", self.separation_factor)?;
        check_finite("alignment_factor", self.alignment_factor)?;
        check_finite("edge_avoid_factor", self.edge_avoid_factor)?;
        check_finite("predator_avoid_factor", self.predator_avoid_factor)?;
        Ok(())
    }

    pub fn metric(&self) -> Metric {
        match self.edge_mode {
            EdgeMode::Avoid => Metric::Euclidean,
            EdgeMode::Wrap => Metric::Toroidal {
                width: self.width,
                height: self.height,
            },
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_radius_range() -> RangeInclusive<f32> {
        0.0..=300.0
    }

    pub fn get_max_speed_range() -> RangeInclusive<f32> {
        1.0..=50.0
    }

    pub fn get_cohesion_range() -> RangeInclusive<f32> {
        0.0..=0.01
    }

    pub fn get_factor_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_edge_factor_range() -> RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn get_margin_range() -> RangeInclusive<f32> {
        0.0..=200.0
    }
}

/// Driver-side settings around the core parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunControls {
    pub num_boids: usize,
    pub ticks_per_second: f32,
    pub pause_simulation: bool,
    pub show_debug: bool,
    pub show_fps: bool,
    pub enable_predator: bool,
}

impl Default for RunControls {
    fn default() -> Self {
        Self {
            num_boids: 150,
            ticks_per_second: 60.0,
            pause_simulation: false,
            show_debug: false,
            show_fps: false,
            enable_predator: true,
        }
    }
}

impl RunControls {
    pub fn validate(&self) -> Result<()> {
        if self.num_boids == 0 {
            return Err(FlockError::EmptyFlock);
        }
        check_positive("ticks_per_second", self.ticks_per_second)
    }

    pub fn get_num_boids_range() -> RangeInclusive<usize> {
        1..=5000
    }

    pub fn get_ticks_per_second_range() -> RangeInclusive<f32> {
        1.0..=240.0
    }
}

/// Contents of a TOML config file; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: Option<u64>,
    pub controls: RunControls,
    pub params: SimulationParams,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        self.controls.validate()
    }
}
