//! Spawn context for particle and boid initialization.
//!
//! Provides helper methods to reduce boilerplate when populating a
//! particle set. Each spawned element gets its own context, seeded from
//! its index so a run is internally reproducible; pass an explicit base
//! seed for fully deterministic sets (the scenario tests do).

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Context provided per spawned element with helpers for common patterns.
///
/// ```ignore
/// let particles: Vec<Particle> = (0..count)
///     .map(|i| {
///         let mut ctx = SpawnContext::new(i, count, half_extent);
///         Particle {
///             position: ctx.random_in_box(0.95),
///             velocity: ctx.random_velocity(2.0),
///             size: ctx.random_range(0.5..1.5),
///         }
///     })
///     .collect();
/// ```
pub struct SpawnContext {
    /// Index of the element being spawned (0 to count-1).
    pub index: u32,
    /// Total number of elements being spawned.
    pub count: u32,
    /// Half-extent of the spawn domain (cube from -bounds to +bounds).
    pub bounds: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context salted with wall-clock time, so sets differ
    /// between program runs but stay reproducible within one.
    pub fn new(index: u32, count: u32, bounds: f32) -> Self {
        let salt = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(index, count, bounds, salt)
    }

    /// Create a deterministic context from an explicit base seed.
    pub fn with_seed(index: u32, count: u32, bounds: f32, seed: u64) -> Self {
        Self {
            index,
            count,
            bounds,
            rng: SmallRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9e3779b97f4a7c15)),
        }
    }

    /// Normalized progress through the spawn (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.index as f32 / self.count.max(1) as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, range: std::ops::Range<f32>) -> f32 {
        self.rng.gen_range(range)
    }

    /// Random position inside the bounded cube, scaled by `margin`
    /// (1.0 fills the domain, 0.5 the inner half).
    pub fn random_in_box(&mut self, margin: f32) -> Vec3 {
        let extent = self.bounds * margin;
        Vec3::new(
            self.rng.gen_range(-extent..extent),
            self.rng.gen_range(-extent..extent),
            self.rng.gen_range(-extent..extent),
        )
    }

    /// Random velocity with each component in `-max_component..max_component`.
    pub fn random_velocity(&mut self, max_component: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-max_component..max_component),
            self.rng.gen_range(-max_component..max_component),
            self.rng.gen_range(-max_component..max_component),
        )
    }

    /// Random unit direction.
    pub fn random_direction(&mut self) -> Vec3 {
        // Rejection-free: normalize a random cube sample, falling back to +Y
        // for the degenerate near-zero draw.
        let v = self.random_velocity(1.0);
        if v.length_squared() < 1e-6 {
            Vec3::Y
        } else {
            v.normalize()
        }
    }
}
