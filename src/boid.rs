/*
 * Boid Module
 *
 * This module defines the Boid struct: a position and a velocity in 2D.
 * Predators share the same shape. Rendering lives in the renderer module,
 * the flocking rules in the rules module.
 */

use nannou::prelude::*;
use rand::Rng;
use rand_distr::StandardNormal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Predators are plain agents with the boid layout `(x, y, vx, vy)`.
pub type Predator = Boid;

impl Boid {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            position: vec2(x, y),
            velocity: vec2(vx, vy),
        }
    }

    pub fn from_parts(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    // Spawn inside [margin, dimension - margin] on both axes, with each velocity
    // component drawn from a standard normal scaled by `speed`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, margin: f32, speed: f32) -> Self {
        let x = sample_coordinate(rng, width, margin);
        let y = sample_coordinate(rng, height, margin);

        let vx: f32 = rng.sample(StandardNormal);
        let vy: f32 = rng.sample(StandardNormal);

        Self::new(x, y, vx * speed, vy * speed)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    // Angle of the velocity in world space (y grows downwards)
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    // Wrap the boid around the world edges
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        self.position.x = wrap_coordinate(self.position.x, width);
        self.position.y = wrap_coordinate(self.position.y, height);
    }
}

fn sample_coordinate<R: Rng + ?Sized>(rng: &mut R, extent: f32, margin: f32) -> f32 {
    // Worlds narrower than two margins spawn over the whole extent
    if extent - margin > margin {
        rng.gen_range(margin..(extent - margin))
    } else {
        rng.gen_range(0.0..=extent)
    }
}

fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round tiny negatives up to `extent` itself
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}
