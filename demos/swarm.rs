//! Boids flock statistics under a circling predator.
//!
//! Runs the flocking engine headless and prints cohesion and speed
//! statistics once per simulated second.
//!
//! Run with: cargo run --example swarm

use fluxsim::prelude::*;

fn main() {
    env_logger::init();

    let mut sim = Simulation::new()
        .with_active(ActiveSim::Flock)
        .with_seed(42);

    let mut surface = NullSurface;
    for tick in 0..600 {
        sim.tick(&mut surface);

        if tick % 60 == 59 {
            let boids = sim.flock().boids();
            let center: Vec3 =
                boids.iter().map(|b| b.position).sum::<Vec3>() / boids.len() as f32;
            let spread = boids
                .iter()
                .map(|b| b.position.distance(center))
                .sum::<f32>()
                / boids.len() as f32;
            let mean_speed = boids
                .iter()
                .map(|b| b.velocity.length())
                .sum::<f32>()
                / boids.len() as f32;
            println!(
                "t={:>3}s  spread={spread:>6.2}  mean speed={mean_speed:.3}",
                (tick + 1) / 60
            );
        }
    }
}
