//! Boids flocking stepper.
//!
//! Each boid is a plain data record; the stepper owns all behavior.
//! Per tick, three neighbor forces (separation, alignment, cohesion)
//! plus a predator flee force accumulate into the boid's transient
//! acceleration, then integration clamps speed, wraps position at the
//! domain boundary (toroidal, not reflecting) and zeroes the
//! accumulator. Neighbor queries run through the uniform spatial grid,
//! keeping a tick near O(n) instead of the naive O(n^2) scan.

use crate::spatial::{SpatialConfig, SpatialGrid};
use crate::spawn::SpawnContext;
use glam::Vec3;

/// Full side length of the wrapping domain. Positions stay within
/// [-BOUNDS/2, BOUNDS/2] on every axis.
pub const BOUNDS: f32 = 40.0;

/// Speed cap applied after force integration.
pub const MAX_SPEED: f32 = 0.5;

/// Cap on each steering force's magnitude.
pub const MAX_FORCE: f32 = 0.03;

/// Radius within which neighbors influence alignment and cohesion.
pub const PERCEPTION_RADIUS: f32 = 5.0;

/// Radius within which neighbors repel.
pub const SEPARATION_DISTANCE: f32 = 2.5;

/// Radius within which the predator triggers fleeing.
pub const PREDATOR_RADIUS: f32 = 8.0;

const SEPARATION_WEIGHT: f32 = 1.5;
const ALIGNMENT_WEIGHT: f32 = 1.2;
const COHESION_WEIGHT: f32 = 1.0;
const PREDATOR_WEIGHT: f32 = 2.5;

/// One boid. Plain data record; `acceleration` is the per-tick force
/// accumulator and is zero between ticks.
#[derive(Clone, Debug)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Cosmetic render color; the stepper never reads it.
    pub color: Vec3,
}

/// The flock and its spatial index.
pub struct FlockSim {
    boids: Vec<Boid>,
    grid: SpatialGrid,
    /// Position scratch for index rebuilds.
    positions: Vec<Vec3>,
}

impl FlockSim {
    /// Spawn `count` boids with run-dependent randomness.
    pub fn new(count: u32) -> Self {
        Self::spawn(count, None)
    }

    /// Spawn deterministically from a base seed.
    pub fn with_seed(count: u32, seed: u64) -> Self {
        Self::spawn(count, Some(seed))
    }

    fn spawn(count: u32, seed: Option<u64>) -> Self {
        let half = BOUNDS * 0.5;
        let boids = (0..count)
            .map(|i| {
                let mut ctx = match seed {
                    Some(seed) => SpawnContext::with_seed(i, count, half, seed),
                    None => SpawnContext::new(i, count, half),
                };
                let hue = ctx.progress();
                Boid {
                    position: ctx.random_in_box(0.9),
                    velocity: ctx.random_direction() * ctx.random_range(0.2..MAX_SPEED),
                    acceleration: Vec3::ZERO,
                    color: Vec3::new(0.4 + 0.6 * hue, 0.5, 1.0 - 0.6 * hue),
                }
            })
            .collect();
        Self {
            boids,
            grid: SpatialGrid::new(SpatialConfig::new(PERCEPTION_RADIUS, 16)),
            positions: Vec::with_capacity(count as usize),
        }
    }

    /// Advance the flock by one tick.
    ///
    /// `predator` is the current position of the single moving predator
    /// point; boids within [`PREDATOR_RADIUS`] steer away from it.
    pub fn step(&mut self, predator: Vec3) {
        self.positions.clear();
        self.positions.extend(self.boids.iter().map(|b| b.position));
        self.grid.rebuild(&self.positions);

        // Force pass: read-only over the flock, writes go to the
        // accumulators afterwards so no boid sees a half-updated neighbor.
        let accelerations: Vec<Vec3> = (0..self.boids.len())
            .map(|i| self.flock_forces(i, predator))
            .collect();

        // Integration pass
        let half = BOUNDS * 0.5;
        for (boid, acceleration) in self.boids.iter_mut().zip(accelerations) {
            boid.acceleration = acceleration;
            boid.velocity += boid.acceleration;
            boid.velocity = boid.velocity.clamp_length_max(MAX_SPEED);
            boid.position += boid.velocity;
            boid.acceleration = Vec3::ZERO;

            // Toroidal wrap: exit one side, enter the opposite side
            for axis in 0..3 {
                if boid.position[axis] < -half {
                    boid.position[axis] += BOUNDS;
                } else if boid.position[axis] > half {
                    boid.position[axis] -= BOUNDS;
                }
            }
        }
    }

    /// Accumulated steering force for boid `i`.
    fn flock_forces(&self, i: usize, predator: Vec3) -> Vec3 {
        let boid = &self.boids[i];

        let mut separation_sum = Vec3::ZERO;
        let mut velocity_sum = Vec3::ZERO;
        let mut position_sum = Vec3::ZERO;
        let mut neighbor_count = 0u32;

        self.grid.for_each_neighbor(boid.position, |j| {
            let j = j as usize;
            if j == i {
                return;
            }
            let other = &self.boids[j];
            let distance = boid.position.distance(other.position);
            if distance <= 0.0 || distance >= PERCEPTION_RADIUS {
                return;
            }
            velocity_sum += other.velocity;
            position_sum += other.position;
            neighbor_count += 1;
            if distance < SEPARATION_DISTANCE {
                // Distance-weighted repulsion: closer neighbors push harder
                separation_sum += (boid.position - other.position) / distance;
            }
        });

        let mut acceleration = Vec3::ZERO;

        if separation_sum != Vec3::ZERO {
            acceleration += steer(separation_sum, boid.velocity) * SEPARATION_WEIGHT;
        }
        if neighbor_count > 0 {
            let average_velocity = velocity_sum / neighbor_count as f32;
            acceleration += steer(average_velocity, boid.velocity) * ALIGNMENT_WEIGHT;

            let center = position_sum / neighbor_count as f32;
            acceleration += steer(center - boid.position, boid.velocity) * COHESION_WEIGHT;
        }

        let to_predator = boid.position - predator;
        if to_predator.length() < PREDATOR_RADIUS {
            acceleration += steer(to_predator, boid.velocity) * PREDATOR_WEIGHT;
        }

        acceleration
    }

    /// The flock after the most recent step.
    #[inline]
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// Number of boids.
    #[inline]
    pub fn len(&self) -> usize {
        self.boids.len()
    }

    /// Whether the flock is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}

/// Reynolds steering: desire full speed along `direction`, then cap the
/// correction against the current velocity at [`MAX_FORCE`].
fn steer(direction: Vec3, velocity: Vec3) -> Vec3 {
    if direction.length_squared() < 1e-12 {
        return Vec3::ZERO;
    }
    (direction.normalize() * MAX_SPEED - velocity).clamp_length_max(MAX_FORCE)
}
