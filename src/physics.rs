/*
 * Physics Module
 *
 * This module advances the flock by one tick. Every boid reads the state of
 * the flock as it was at the start of the tick (a frozen snapshot) and writes
 * only its own slot, so the update is simultaneous regardless of iteration
 * order and can run in parallel.
 *
 * Per boid:
 * - edge avoidance (batched over the whole flock first)
 * - cohesion, separation and alignment over the boids it sees
 * - predator avoidance over the predators it sees
 * - velocity += acceleration, capped at max speed
 * - position += velocity
 */

use nannou::prelude::*;
use rayon::prelude::*;

use crate::boid::{Boid, Predator};
use crate::error::{FlockError, Result};
use crate::params::{EdgeMode, SimulationParams};
use crate::perception;
use crate::rules;
use crate::spatial_grid::SpatialGrid;

/// Advance `boids` by one tick in place.
///
/// Parameters and the flock are validated first; on error no boid is touched.
pub fn update_boids(boids: &mut [Boid], predators: &[Predator], params: &SimulationParams) -> Result<()> {
    params.validate()?;
    if boids.is_empty() {
        return Err(FlockError::EmptyFlock);
    }

    let next = next_tick(boids, predators, params);
    boids.copy_from_slice(&next);

    log::trace!("advanced {} boids ({} predators)", boids.len(), predators.len());
    Ok(())
}

/// The flock after one tick, computed from `snapshot` alone.
///
/// Assumes `params` has been validated.
pub fn next_tick(snapshot: &[Boid], predators: &[Predator], params: &SimulationParams) -> Vec<Boid> {
    let edge_acceleration = match params.edge_mode {
        EdgeMode::Avoid => rules::avoid_edges(
            snapshot,
            params.margin,
            params.width,
            params.height,
            params.edge_avoid_factor,
        ),
        EdgeMode::Wrap => vec![Vec2::ZERO; snapshot.len()],
    };

    let grid = params.enable_spatial_grid.then(|| {
        SpatialGrid::build(
            snapshot,
            params.perception,
            params.width,
            params.height,
            params.edge_mode == EdgeMode::Wrap,
        )
    });

    let advance = |i: usize| {
        let acceleration = edge_acceleration[i] + steering(i, snapshot, predators, grid.as_ref(), params);
        let mut boid = integrate(snapshot[i], acceleration, params.max_speed);
        if params.edge_mode == EdgeMode::Wrap {
            boid.wrap_edges(params.width, params.height);
        }
        boid
    };

    if params.enable_parallel {
        (0..snapshot.len()).into_par_iter().map(advance).collect()
    } else {
        (0..snapshot.len()).map(advance).collect()
    }
}

// Flocking and predator-avoidance acceleration of boid `i`
fn steering(
    i: usize,
    snapshot: &[Boid],
    predators: &[Predator],
    grid: Option<&SpatialGrid>,
    params: &SimulationParams,
) -> Vec2 {
    let boid = &snapshot[i];
    let metric = params.metric();
    let mut acceleration = Vec2::ZERO;

    let seen_boids = match grid {
        Some(grid) => grid.seen_boids(i, snapshot, params.perception, params.neighbor_policy, metric),
        None => perception::seen_boids(i, snapshot, params.perception, params.neighbor_policy, metric),
    };
    if !seen_boids.is_empty() {
        acceleration += rules::cohesion(boid, &seen_boids, params.cohesion_factor);
        acceleration += rules::separation(boid, &seen_boids, params.separation_factor, params.safe_space);
        acceleration += rules::alignment(boid, &seen_boids, params.alignment_factor);
    }

    if !predators.is_empty() {
        let seen_predators = perception::seen_predators(boid, predators, params.predator_perception, metric);
        if !seen_predators.is_empty() {
            acceleration += rules::avoid_predators(boid, &seen_predators, params.predator_avoid_factor);
        }
    }

    acceleration
}

/// Cap the speed at `max_speed`, keeping the direction.
///
/// A zero velocity is left as is.
pub fn limit_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    let speed_squared = velocity.length_squared();
    if speed_squared > 0.0 && speed_squared > max_speed * max_speed {
        velocity * (max_speed / speed_squared.sqrt())
    } else {
        velocity
    }
}

// Apply acceleration, limit speed, move
pub fn integrate(mut boid: Boid, acceleration: Vec2, max_speed: f32) -> Boid {
    boid.velocity = limit_speed(boid.velocity + acceleration, max_speed);
    boid.position += boid.velocity;
    boid
}
