use flocking::perception::{self, Metric, NeighborPolicy};
use flocking::{rules, update_boids, Boid, Config, EdgeMode, Flock, FlockError, SimulationParams};
use nannou::prelude::*;

fn quiet_params() -> SimulationParams {
    SimulationParams {
        perception: 20.0,
        predator_perception: 0.0,
        safe_space: 0.0,
        max_speed: 1000.0,
        cohesion_factor: 0.0,
        separation_factor: 0.0,
        alignment_factor: 0.0,
        edge_avoid_factor: 0.0,
        predator_avoid_factor: 0.0,
        enable_parallel: false,
        enable_spatial_grid: false,
        ..SimulationParams::default()
    }
}

#[test]
fn two_boids_pull_together() {
    let params = SimulationParams {
        cohesion_factor: 1.0,
        ..quiet_params()
    };
    let mut boids = vec![Boid::new(0.0, 0.0, 0.0, 0.0), Boid::new(10.0, 0.0, 0.0, 0.0)];
    update_boids(&mut boids, &[], &params).unwrap();

    assert_eq!(boids[0], Boid::new(10.0, 0.0, 10.0, 0.0));
    assert_eq!(boids[1], Boid::new(0.0, 0.0, -10.0, 0.0));
}

#[test]
fn boid_with_no_neighbours_gets_no_flocking_force() {
    let boid = Boid::new(500.0, 500.0, 1.0, 1.0);
    let seen = perception::seen_boids(0, &[boid], 75.0, NeighborPolicy::ExcludeSelf, Metric::Euclidean);
    assert!(seen.is_empty());

    assert_eq!(rules::cohesion(&boid, &seen, 1.0), Vec2::ZERO);
    assert_eq!(rules::separation(&boid, &seen, 1.0, 20.0), Vec2::ZERO);
    assert_eq!(rules::alignment(&boid, &seen, 1.0), Vec2::ZERO);
    assert_eq!(rules::avoid_predators(&boid, &seen, 1.0), Vec2::ZERO);
}

#[test]
fn crowded_boids_separate() {
    let params = SimulationParams {
        perception: 50.0,
        safe_space: 10.0,
        separation_factor: 0.5,
        ..quiet_params()
    };
    let mut boids = vec![Boid::new(100.0, 100.0, 0.0, 0.0), Boid::new(104.0, 100.0, 0.0, 0.0)];
    update_boids(&mut boids, &[], &params).unwrap();

    // 0.5 * (100 - 104)
    assert_eq!(boids[0].velocity, vec2(-2.0, 0.0));
    assert_eq!(boids[1].velocity, vec2(2.0, 0.0));
}

#[test]
fn neighbours_align_velocities() {
    let params = SimulationParams {
        alignment_factor: 0.5,
        ..quiet_params()
    };
    let mut boids = vec![Boid::new(100.0, 100.0, 2.0, 0.0), Boid::new(110.0, 100.0, 0.0, 2.0)];
    update_boids(&mut boids, &[], &params).unwrap();

    assert_eq!(boids[0].velocity, vec2(1.0, 1.0));
    assert_eq!(boids[1].velocity, vec2(1.0, 1.0));
}

#[test]
fn predator_scatters_flock() {
    let params = SimulationParams {
        predator_perception: 100.0,
        predator_avoid_factor: 0.1,
        ..quiet_params()
    };
    let mut flock = Flock::from_boids(vec![
        Boid::new(550.0, 400.0, 0.0, 0.0),
        Boid::new(650.0, 400.0, 0.0, 0.0),
    ])
    .unwrap();
    flock.set_predator(Some(Boid::new(600.0, 400.0, 0.0, 0.0)));
    flock.step(&params).unwrap();

    assert!(flock.boids()[0].velocity.x < 0.0);
    assert!(flock.boids()[1].velocity.x > 0.0);
}

#[test]
fn walls_turn_boids_back() {
    let params = SimulationParams {
        edge_avoid_factor: 1.0,
        max_speed: 15.0,
        ..quiet_params()
    };
    let mut boids = vec![Boid::new(1190.0, 400.0, 5.0, 0.0)];
    for _ in 0..30 {
        update_boids(&mut boids, &[], &params).unwrap();
    }
    assert!(boids[0].velocity.x < 0.0);
}

#[test]
fn torus_neighbours_across_the_seam() {
    let params = SimulationParams {
        edge_mode: EdgeMode::Wrap,
        cohesion_factor: 1.0,
        ..quiet_params()
    };
    let mut boids = vec![Boid::new(1195.0, 400.0, 0.0, 0.0), Boid::new(5.0, 400.0, 0.0, 0.0)];
    update_boids(&mut boids, &[], &params).unwrap();

    // each sees the other 10 pixels away through the seam
    assert!((boids[0].velocity - vec2(10.0, 0.0)).length() < 1e-3);
    assert!((boids[1].velocity - vec2(-10.0, 0.0)).length() < 1e-3);
}

#[test]
fn invalid_parameters_are_reported() {
    let mut boids = vec![Boid::new(0.0, 0.0, 1.0, 1.0)];
    let params = SimulationParams {
        safe_space: f32::NAN,
        ..SimulationParams::default()
    };
    let err = update_boids(&mut boids, &[], &params).unwrap_err();
    assert!(matches!(err, FlockError::InvalidParameter { name: "safe_space", .. }));
    assert!(err.to_string().contains("safe_space"));
}

#[test]
fn config_file_drives_a_flock() {
    let config = Config::from_toml(
        r#"
        seed = 3

        [controls]
        num_boids = 40

        [params]
        edge_mode = "wrap"
        max_speed = 4.0
        "#,
    )
    .unwrap();

    let mut flock = Flock::new(config.controls.num_boids, &config.params, config.seed).unwrap();
    for _ in 0..10 {
        flock.step(&config.params).unwrap();
    }
    assert_eq!(flock.len(), 40);
    assert!(flock.boids().iter().all(|b| b.speed() <= 4.0 + 1e-4));
}
