//! Two-wall thermodynamic gas stepper.
//!
//! A fixed-count set of non-interacting particles in a cubic box. The
//! X-axis walls are the thermodynamic pair: the hot wall (+X) injects
//! kinetic energy on contact, scaled by the externally supplied `heat`
//! level, and the cold wall (-X) drains a fixed fraction. The Y and Z
//! walls reflect elastically. With heat forcing, energy flows in at +X
//! and out at -X - the asymmetry the metrics aggregator turns into a
//! temperature gradient and an entropy-production estimate.
//!
//! Per-tick energy exchange is tracked in `energy_in` / `energy_out`
//! accumulators (kinetic energy measured as speed^2, the same unit the
//! temperature gradient uses). Both reset at the start of every step
//! and are only meaningful to the aggregator reading them in the same
//! tick.

use crate::spawn::SpawnContext;
use glam::Vec3;

/// Full side length of the cubic domain. Positions stay within
/// [-BOX_SIZE/2, BOX_SIZE/2] on every axis.
pub const BOX_SIZE: f32 = 10.0;

/// Velocity kick added to the wall-normal component per hot-wall hit,
/// per unit of heat.
pub const HOT_WALL_KICK: f32 = 0.5;

/// Per-unit-of-heat velocity gain on a hot-wall hit. The gain factor is
/// `1 + heat * HOT_WALL_GAIN`, so zero heat injects nothing.
pub const HOT_WALL_GAIN: f32 = 0.05;

/// Velocity retained on a cold-wall hit.
pub const COLD_WALL_DAMP: f32 = 0.998;

/// Hard speed cap. Keeps every reachable heat level finite.
pub const MAX_GAS_SPEED: f32 = 50.0;

/// One gas particle. Plain data; all behavior lives in the stepper.
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Cosmetic render size; the stepper never reads it.
    pub size: f32,
}

/// The gas particle set and its per-tick energy accumulators.
pub struct GasSim {
    particles: Vec<Particle>,
    /// Kinetic energy added at the hot wall this tick (speed^2 units).
    energy_in: f32,
    /// Kinetic energy removed at the cold wall this tick.
    energy_out: f32,
    seed: Option<u64>,
}

impl GasSim {
    /// Spawn `count` particles with run-dependent randomness.
    pub fn new(count: u32) -> Self {
        let mut sim = Self {
            particles: Vec::new(),
            energy_in: 0.0,
            energy_out: 0.0,
            seed: None,
        };
        sim.resize(count);
        sim
    }

    /// Spawn deterministically from a base seed.
    pub fn with_seed(count: u32, seed: u64) -> Self {
        let mut sim = Self {
            particles: Vec::new(),
            energy_in: 0.0,
            energy_out: 0.0,
            seed: Some(seed),
        };
        sim.resize(count);
        sim
    }

    /// Re-spawn the whole set at a new count.
    ///
    /// Particles are never added or removed individually; a count change
    /// replaces the collection.
    pub fn resize(&mut self, count: u32) {
        let half = BOX_SIZE * 0.5;
        self.particles = (0..count)
            .map(|i| {
                let mut ctx = match self.seed {
                    Some(seed) => SpawnContext::with_seed(i, count, half, seed),
                    None => SpawnContext::new(i, count, half),
                };
                Particle {
                    position: ctx.random_in_box(0.95),
                    velocity: ctx.random_velocity(2.0),
                    size: ctx.random_range(0.5..1.5),
                }
            })
            .collect();
        self.energy_in = 0.0;
        self.energy_out = 0.0;
    }

    /// Advance every particle by `dt` normalized tick units.
    ///
    /// `heat >= 0` scales hot-wall injection; at zero the box is a plain
    /// damped billiard and kinetic energy decays toward zero.
    pub fn step(&mut self, heat: f32, dt: f32) {
        let half = BOX_SIZE * 0.5;
        self.energy_in = 0.0;
        self.energy_out = 0.0;

        for p in &mut self.particles {
            p.position += p.velocity * dt;

            // Hot/cold pair on X
            if p.position.x > half {
                p.position.x = half;
                p.velocity.x = -p.velocity.x.abs();
                if heat > 0.0 {
                    let before = p.velocity.length_squared();
                    p.velocity.x += p.velocity.x.signum() * heat * HOT_WALL_KICK;
                    p.velocity *= 1.0 + heat * HOT_WALL_GAIN;
                    p.velocity = p.velocity.clamp_length_max(MAX_GAS_SPEED);
                    self.energy_in += (p.velocity.length_squared() - before).max(0.0);
                }
            } else if p.position.x < -half {
                p.position.x = -half;
                p.velocity.x = p.velocity.x.abs();
                let before = p.velocity.length_squared();
                p.velocity *= COLD_WALL_DAMP;
                self.energy_out += (before - p.velocity.length_squared()).max(0.0);
            }

            // Elastic reflection on Y and Z
            if p.position.y > half {
                p.position.y = half;
                p.velocity.y = -p.velocity.y.abs();
            } else if p.position.y < -half {
                p.position.y = -half;
                p.velocity.y = p.velocity.y.abs();
            }
            if p.position.z > half {
                p.position.z = half;
                p.velocity.z = -p.velocity.z.abs();
            } else if p.position.z < -half {
                p.position.z = -half;
                p.velocity.z = p.velocity.z.abs();
            }
        }
    }

    /// The particle set after the most recent step.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Kinetic energy injected at the hot wall during the last step.
    #[inline]
    pub fn energy_in(&self) -> f32 {
        self.energy_in
    }

    /// Kinetic energy removed at the cold wall during the last step.
    #[inline]
    pub fn energy_out(&self) -> f32 {
        self.energy_out
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
