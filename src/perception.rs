/*
 * Perception Module
 *
 * Neighbour queries: which agents does a boid see? An agent is seen when its
 * squared distance to the boid is strictly less than the squared perception
 * radius. Results carry the agent's state and that squared distance so the
 * force rules never recompute it.
 *
 * On a toroidal world the distance is measured to the nearest periodic image
 * of the other agent, and the returned position is that image.
 */

use nannou::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boid::{Boid, Predator};

/// An agent seen by a boid during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerceivedNeighbor {
    pub agent: Boid,
    pub distance_squared: f32,
}

/// Whether a boid counts itself among the boids it sees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPolicy {
    #[default]
    ExcludeSelf,
    // The boid sees itself at distance 0, pulling cohesion and alignment
    // means towards its own state
    IncludeSelf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Metric {
    Euclidean,
    Toroidal { width: f32, height: f32 },
}

impl Metric {
    // The other agent as seen from `from`, with its squared distance
    pub fn perceive(&self, from: Vec2, other: &Boid) -> PerceivedNeighbor {
        match *self {
            Metric::Euclidean => PerceivedNeighbor {
                agent: *other,
                distance_squared: from.distance_squared(other.position),
            },
            Metric::Toroidal { width, height } => {
                let offset = other.position - from;
                let offset = vec2(
                    nearest_image(offset.x, width),
                    nearest_image(offset.y, height),
                );
                PerceivedNeighbor {
                    agent: Boid::from_parts(from + offset, other.velocity),
                    distance_squared: offset.length_squared(),
                }
            }
        }
    }
}

fn nearest_image(delta: f32, extent: f32) -> f32 {
    delta - extent * (delta / extent).round()
}

/// All boids seen by `boids[index]` within `radius`.
pub fn seen_boids(
    index: usize,
    boids: &[Boid],
    radius: f32,
    policy: NeighborPolicy,
    metric: Metric,
) -> Vec<PerceivedNeighbor> {
    seen_among(index, boids, 0..boids.len(), radius, policy, metric)
}

// Same query restricted to candidate indices (e.g. from a spatial grid)
pub fn seen_among<I>(
    index: usize,
    boids: &[Boid],
    candidates: I,
    radius: f32,
    policy: NeighborPolicy,
    metric: Metric,
) -> Vec<PerceivedNeighbor>
where
    I: IntoIterator<Item = usize>,
{
    let position = boids[index].position;
    let radius_squared = radius * radius;

    candidates
        .into_iter()
        .filter(|&other| other != index || policy == NeighborPolicy::IncludeSelf)
        .map(|other| metric.perceive(position, &boids[other]))
        .filter(|seen| seen.distance_squared < radius_squared)
        .collect()
}

/// Predators within `radius` of `boid`. No self-exclusion applies.
pub fn seen_predators(
    boid: &Boid,
    predators: &[Predator],
    radius: f32,
    metric: Metric,
) -> Vec<PerceivedNeighbor> {
    let radius_squared = radius * radius;

    predators
        .iter()
        .map(|predator| metric.perceive(boid.position, predator))
        .filter(|seen| seen.distance_squared < radius_squared)
        .collect()
}
