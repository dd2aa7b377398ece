/*
 * Rules Module
 *
 * The steering rules. Each one maps a boid and what it perceives to an
 * acceleration contribution, scaled by its factor:
 * 1. Cohesion: steer towards the centre of the seen boids
 * 2. Separation: push away from boids inside the safe space
 * 3. Alignment: match the average velocity of the seen boids
 * 4. Edge avoidance: constant nudge back inside the margins
 * 5. Predator avoidance: flee the position and heading of seen predators
 *
 * All rules are pure. An empty neighbour set yields the zero vector.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::perception::PerceivedNeighbor;

fn mean_position(seen: &[PerceivedNeighbor]) -> Vec2 {
    seen.iter().fold(Vec2::ZERO, |acc, n| acc + n.agent.position) / seen.len() as f32
}

fn mean_velocity(seen: &[PerceivedNeighbor]) -> Vec2 {
    seen.iter().fold(Vec2::ZERO, |acc, n| acc + n.agent.velocity) / seen.len() as f32
}

/// `factor * (mean neighbour position - own position)`
pub fn cohesion(boid: &Boid, seen: &[PerceivedNeighbor], factor: f32) -> Vec2 {
    if seen.is_empty() {
        return Vec2::ZERO;
    }
    (mean_position(seen) - boid.position) * factor
}

/// Sum of `own - neighbour` over neighbours no further than `safe_space`.
pub fn separation(boid: &Boid, seen: &[PerceivedNeighbor], factor: f32, safe_space: f32) -> Vec2 {
    let safe_space_squared = safe_space * safe_space;

    seen.iter()
        .filter(|n| n.distance_squared <= safe_space_squared)
        .fold(Vec2::ZERO, |acc, n| acc + (boid.position - n.agent.position))
        * factor
}

/// `factor * (mean neighbour velocity - own velocity)`
pub fn alignment(boid: &Boid, seen: &[PerceivedNeighbor], factor: f32) -> Vec2 {
    if seen.is_empty() {
        return Vec2::ZERO;
    }
    (mean_velocity(seen) - boid.velocity) * factor
}

// +1 below the margin, -1 beyond extent - margin, per axis
fn edge_nudge(coordinate: f32, margin: f32, extent: f32) -> f32 {
    let mut nudge = 0.0;
    if coordinate < margin {
        nudge += 1.0;
    }
    if coordinate > extent - margin {
        nudge -= 1.0;
    }
    nudge
}

pub fn edge_avoidance(boid: &Boid, margin: f32, width: f32, height: f32, factor: f32) -> Vec2 {
    vec2(
        edge_nudge(boid.position.x, margin, width),
        edge_nudge(boid.position.y, margin, height),
    ) * factor
}

// Edge avoidance for the whole flock in one pass
pub fn avoid_edges(boids: &[Boid], margin: f32, width: f32, height: f32, factor: f32) -> Vec<Vec2> {
    boids
        .iter()
        .map(|boid| edge_avoidance(boid, margin, width, height, factor))
        .collect()
}

/// Half away from the predators' mean position, half away from their mean velocity.
pub fn avoid_predators(boid: &Boid, seen: &[PerceivedNeighbor], factor: f32) -> Vec2 {
    if seen.is_empty() {
        return Vec2::ZERO;
    }
    let away = (boid.position - mean_position(seen)) * 0.5;
    let against = (boid.velocity - mean_velocity(seen)) * 0.5;
    (away + against) * factor
}
