/*
 * Flock Module
 *
 * The Flock owns the boid array, the predator set and the random number
 * generator used for spawning. The number of boids stays fixed between
 * resets; a reset replaces the whole array.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::boid::{Boid, Predator};
use crate::error::{FlockError, Result};
use crate::params::SimulationParams;
use crate::physics;

pub struct Flock {
    boids: Vec<Boid>,
    predators: Vec<Predator>,
    rng: StdRng,
    ticks: u64,
}

impl Flock {
    /// Spawn `num_boids` boids; a seed makes the spawn reproducible.
    pub fn new(num_boids: usize, params: &SimulationParams, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut flock = Self {
            boids: Vec::new(),
            predators: Vec::new(),
            rng,
            ticks: 0,
        };
        flock.reset(num_boids, params)?;
        Ok(flock)
    }

    pub fn from_boids(boids: Vec<Boid>) -> Result<Self> {
        if boids.is_empty() {
            return Err(FlockError::EmptyFlock);
        }
        Ok(Self {
            boids,
            predators: Vec::new(),
            rng: StdRng::from_entropy(),
            ticks: 0,
        })
    }

    // Replace every boid with a freshly spawned one
    pub fn reset(&mut self, num_boids: usize, params: &SimulationParams) -> Result<()> {
        if num_boids == 0 {
            return Err(FlockError::EmptyFlock);
        }
        params.validate()?;

        let rng = &mut self.rng;
        self.boids = (0..num_boids)
            .map(|_| Boid::random(rng, params.width, params.height, params.margin, params.max_speed))
            .collect();
        self.ticks = 0;

        log::info!(
            "Spawned {} boids in a {:.0}x{:.0} world",
            num_boids,
            params.width,
            params.height
        );
        Ok(())
    }

    // Advance one tick
    pub fn step(&mut self, params: &SimulationParams) -> Result<()> {
        physics::update_boids(&mut self.boids, &self.predators, params)?;
        self.ticks += 1;
        Ok(())
    }

    pub fn set_predator(&mut self, predator: Option<Predator>) {
        self.predators.clear();
        self.predators.extend(predator);
    }

    pub fn set_predators(&mut self, predators: Vec<Predator>) {
        self.predators = predators;
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn predators(&self) -> &[Predator] {
        &self.predators
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    // Never true for a constructed flock, kept for clippy's len/is_empty pairing
    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flock_creation() {
        let params = SimulationParams::default();
        let flock = Flock::new(50, &params, Some(1)).unwrap();

        assert_eq!(flock.len(), 50);
        assert!(flock.predators().is_empty());
        assert_eq!(flock.ticks(), 0);
    }

    #[test]
    fn test_seeded_flocks_match() {
        let params = SimulationParams::default();
        let a = Flock::new(20, &params, Some(99)).unwrap();
        let b = Flock::new(20, &params, Some(99)).unwrap();
        assert_eq!(a.boids(), b.boids());
    }

    #[test]
    fn test_zero_boids_rejected() {
        let params = SimulationParams::default();
        assert!(matches!(Flock::new(0, &params, None), Err(FlockError::EmptyFlock)));
        assert!(matches!(Flock::from_boids(Vec::new()), Err(FlockError::EmptyFlock)));
    }

    #[test]
    fn test_reset_replaces_array() {
        let params = SimulationParams::default();
        let mut flock = Flock::new(10, &params, Some(5)).unwrap();
        let before = flock.boids().to_vec();
        flock.step(&params).unwrap();

        flock.reset(25, &params).unwrap();
        assert_eq!(flock.len(), 25);
        assert_eq!(flock.ticks(), 0);
        assert_ne!(&flock.boids()[..10], &before[..]);
    }

    #[test]
    fn test_new_count_spawns_a_fresh_array() {
        let params = SimulationParams::default();
        let mut flock = Flock::new(10, &params, Some(8)).unwrap();
        let before = flock.boids().to_vec();
        flock.step(&params).unwrap();
        let stepped = flock.boids().to_vec();

        flock.reset(15, &params).unwrap();
        assert_eq!(flock.len(), 15);
        assert_eq!(flock.ticks(), 0);
        // no survivor from the previous array
        assert!(flock.boids().iter().all(|b| !before.contains(b) && !stepped.contains(b)));

        assert!(matches!(flock.reset(0, &params), Err(FlockError::EmptyFlock)));
        assert_eq!(flock.len(), 15);
    }

    #[test]
    fn test_step_counts_ticks_and_keeps_speed() {
        let params = SimulationParams::default();
        let mut flock = Flock::new(100, &params, Some(3)).unwrap();
        for _ in 0..20 {
            flock.step(&params).unwrap();
        }
        assert_eq!(flock.ticks(), 20);
        assert!(flock.boids().iter().all(|b| b.speed() <= params.max_speed + 1e-3));
    }

    #[test]
    fn test_set_predator() {
        let params = SimulationParams::default();
        let mut flock = Flock::new(5, &params, Some(2)).unwrap();

        flock.set_predator(Some(Boid::new(1.0, 1.0, 0.0, 0.0)));
        assert_eq!(flock.predators().len(), 1);

        flock.set_predator(None);
        assert!(flock.predators().is_empty());

        flock.set_predators(vec![Boid::new(0.0, 0.0, 0.0, 0.0); 3]);
        assert_eq!(flock.predators().len(), 3);
    }

    #[test]
    fn test_failed_step_keeps_tick_count() {
        let params = SimulationParams::default();
        let mut flock = Flock::new(5, &params, Some(4)).unwrap();
        let bad = SimulationParams { max_speed: -1.0, ..params };
        assert!(flock.step(&bad).is_err());
        assert_eq!(flock.ticks(), 0);
    }
}
