//! Derived metrics for the thermodynamic gas.
//!
//! Reads the post-step particle set plus the stepper's per-tick energy
//! accumulators and produces the [`SimulationData`] record consumed by
//! the on-screen chart and the explanation-request payload. The record
//! is rebuilt from scratch every tick, is total (no partial fields for
//! any input, including an empty particle set), and is deterministic
//! for identical inputs.
//!
//! The entropy-production estimate is a heuristic proxy for
//! irreversibility derived from asymmetric wall energy exchange, not a
//! statistical-mechanics quantity; its arithmetic is kept exactly as
//! the visualization defined it.

use crate::field::Grid;
use crate::gas::{Particle, BOX_SIZE};
use serde::Serialize;
use std::fmt;

/// Number of equal-width X slices in the temperature gradient.
pub const GRADIENT_SLICES: usize = 10;

/// Hot-slice fallback when the hottest slice is empty or at rest.
const TEMP_HOT_FALLBACK: f32 = 1.0;

/// Cold-slice fallback when the coldest slice is empty or at rest.
const TEMP_COLD_FALLBACK: f32 = 0.1;

/// Forcing below this level counts as negligible.
const NEAR_EQUILIBRIUM_HEAT: f32 = 0.001;

/// Coarse qualitative classification of the gas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SystemState {
    /// No samples yet (empty particle set).
    #[serde(rename = "Initializing")]
    Initializing,
    /// Negligible forcing; the box relaxes toward uniform rest.
    #[serde(rename = "Near Equilibrium")]
    NearEquilibrium,
    /// Sustained gradient with ongoing entropy production.
    #[serde(rename = "Steady State")]
    SteadyState,
    /// Forced but without a settled gradient.
    #[serde(rename = "Chaotic")]
    Chaotic,
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SystemState::Initializing => "Initializing",
            SystemState::NearEquilibrium => "Near Equilibrium",
            SystemState::SteadyState => "Steady State",
            SystemState::Chaotic => "Chaotic",
        };
        f.write_str(label)
    }
}

/// One tick's derived metrics.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationData {
    /// Mean kinetic energy (speed^2) per X slice, ordered cold -> hot.
    /// Always exactly [`GRADIENT_SLICES`] entries; empty slices read 0.
    pub temperature_gradient: Vec<f32>,
    /// Non-negative irreversibility estimate for this tick.
    pub entropy_production: f32,
    /// Qualitative classification.
    pub system_state: SystemState,
}

impl SimulationData {
    /// A record for a simulation that has not produced samples yet.
    pub fn initializing() -> Self {
        Self {
            temperature_gradient: vec![0.0; GRADIENT_SLICES],
            entropy_production: 0.0,
            system_state: SystemState::Initializing,
        }
    }
}

/// Aggregate one tick of gas output into a [`SimulationData`] record.
///
/// `energy_in` / `energy_out` are the stepper's same-tick accumulators;
/// `heat` is the forcing level the tick ran with.
pub fn aggregate(particles: &[Particle], energy_in: f32, energy_out: f32, heat: f32) -> SimulationData {
    if particles.is_empty() {
        return SimulationData::initializing();
    }

    let gradient = temperature_gradient(particles);

    let last = gradient[GRADIENT_SLICES - 1];
    let temp_hot = if last > 0.0 { last } else { TEMP_HOT_FALLBACK };
    let first = gradient[0];
    let temp_cold = if first > 0.0 { first } else { TEMP_COLD_FALLBACK };

    let entropy_production =
        (energy_in / temp_hot.max(0.1) - energy_out / temp_cold.max(0.1)).max(0.0);

    let system_state = if heat < NEAR_EQUILIBRIUM_HEAT {
        SystemState::NearEquilibrium
    } else {
        let midpoint = (temp_hot + temp_cold) * 0.5;
        let variance = gradient
            .iter()
            .map(|g| {
                let d = g - midpoint;
                d * d
            })
            .sum::<f32>()
            / GRADIENT_SLICES as f32;
        if variance.sqrt() > 0.01 && entropy_production.abs() > 0.01 {
            SystemState::SteadyState
        } else {
            SystemState::Chaotic
        }
    };

    SimulationData {
        temperature_gradient: gradient,
        entropy_production,
        system_state,
    }
}

/// Mean speed^2 per X slice, ordered from the cold (-X) wall to the
/// hot (+X) wall. Empty slices read 0.
pub fn temperature_gradient(particles: &[Particle]) -> Vec<f32> {
    let half = BOX_SIZE * 0.5;
    let slice_width = BOX_SIZE / GRADIENT_SLICES as f32;

    let mut sums = [0.0f32; GRADIENT_SLICES];
    let mut counts = [0u32; GRADIENT_SLICES];

    for p in particles {
        let slice = (((p.position.x + half) / slice_width) as usize).min(GRADIENT_SLICES - 1);
        sums[slice] += p.velocity.length_squared();
        counts[slice] += 1;
    }

    sums.iter()
        .zip(counts)
        .map(|(&sum, count)| if count > 0 { sum / count as f32 } else { 0.0 })
        .collect()
}

/// Chart-ready profile of a concentration grid: the mean v-channel
/// value per column, left to right.
pub fn field_profile(grid: &Grid) -> Vec<f32> {
    let (width, height) = (grid.width(), grid.height());
    (0..width)
        .map(|x| {
            let sum: f32 = (0..height).map(|y| grid.cell(x, y).v).sum();
            sum / height as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn particle_at(x: f32, speed: f32) -> Particle {
        Particle {
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::new(speed, 0.0, 0.0),
            size: 1.0,
        }
    }

    // ========== Gradient Tests ==========

    #[test]
    fn test_gradient_has_fixed_length() {
        assert_eq!(temperature_gradient(&[]).len(), GRADIENT_SLICES);
        let particles = vec![particle_at(0.0, 1.0)];
        assert_eq!(temperature_gradient(&particles).len(), GRADIENT_SLICES);
    }

    #[test]
    fn test_gradient_orders_cold_to_hot() {
        let particles = vec![
            particle_at(-4.9, 1.0), // coldest slice
            particle_at(4.9, 3.0),  // hottest slice
        ];
        let gradient = temperature_gradient(&particles);
        assert!((gradient[0] - 1.0).abs() < 1e-6);
        assert!((gradient[GRADIENT_SLICES - 1] - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_slices_read_zero() {
        let particles = vec![particle_at(0.1, 2.0)];
        let gradient = temperature_gradient(&particles);
        let occupied = gradient.iter().filter(|g| **g > 0.0).count();
        assert_eq!(occupied, 1);
    }

    #[test]
    fn test_slice_means_average_members() {
        let particles = vec![particle_at(4.9, 2.0), particle_at(4.8, 4.0)];
        let gradient = temperature_gradient(&particles);
        // mean of 4 and 16
        assert!((gradient[GRADIENT_SLICES - 1] - 10.0).abs() < 1e-5);
    }

    // ========== Aggregation Tests ==========

    #[test]
    fn test_empty_set_yields_initializing_record() {
        let data = aggregate(&[], 0.0, 0.0, 0.5);
        assert_eq!(data.system_state, SystemState::Initializing);
        assert_eq!(data.temperature_gradient.len(), GRADIENT_SLICES);
        assert_eq!(data.entropy_production, 0.0);
    }

    #[test]
    fn test_entropy_production_is_never_negative() {
        let particles = vec![particle_at(-4.9, 1.0), particle_at(4.9, 1.0)];
        // Outflow dominating inflow clamps at zero
        let data = aggregate(&particles, 0.0, 100.0, 0.5);
        assert_eq!(data.entropy_production, 0.0);
    }

    #[test]
    fn test_entropy_production_arithmetic() {
        let particles = vec![particle_at(-4.9, 2.0), particle_at(4.9, 4.0)];
        // temp_cold = 4, temp_hot = 16
        let data = aggregate(&particles, 8.0, 2.0, 0.5);
        let expected: f32 = 8.0 / 16.0 - 2.0 / 4.0;
        assert!((data.entropy_production - expected.max(0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_hot_slice_fallback() {
        // No particle in the hottest slice: temp_hot falls back to 1
        let particles = vec![particle_at(-4.9, 2.0)];
        let data = aggregate(&particles, 3.0, 0.0, 0.5);
        assert!((data.entropy_production - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_cold_slice_fallback() {
        // No particle in the coldest slice: temp_cold falls back to 0.1,
        // and the entropy divisor floors at 0.1
        let particles = vec![particle_at(4.9, 1.0)];
        let data = aggregate(&particles, 0.0, 1.0, 0.5);
        assert_eq!(data.entropy_production, 0.0);
    }

    // ========== Classification Tests ==========

    #[test]
    fn test_negligible_heat_wins_over_everything() {
        // Large gradient variance and entropy, but heat below threshold
        let particles = vec![particle_at(-4.9, 0.5), particle_at(4.9, 10.0)];
        let data = aggregate(&particles, 50.0, 0.0, 0.0005);
        assert_eq!(data.system_state, SystemState::NearEquilibrium);
    }

    #[test]
    fn test_steady_state_needs_gradient_and_entropy() {
        let particles = vec![particle_at(-4.9, 1.0), particle_at(4.9, 3.0)];
        let data = aggregate(&particles, 9.0, 0.0, 0.5);
        assert!(data.entropy_production > 0.01);
        assert_eq!(data.system_state, SystemState::SteadyState);
    }

    #[test]
    fn test_forced_system_without_entropy_is_chaotic() {
        let particles = vec![particle_at(-4.9, 1.0), particle_at(4.9, 3.0)];
        let data = aggregate(&particles, 0.0, 0.0, 0.5);
        assert_eq!(data.entropy_production, 0.0);
        assert_eq!(data.system_state, SystemState::Chaotic);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(SystemState::NearEquilibrium.to_string(), "Near Equilibrium");
        assert_eq!(SystemState::SteadyState.to_string(), "Steady State");
        assert_eq!(SystemState::Chaotic.to_string(), "Chaotic");
        assert_eq!(SystemState::Initializing.to_string(), "Initializing");
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let particles = vec![particle_at(-2.0, 1.5), particle_at(3.0, 2.5)];
        let a = aggregate(&particles, 4.0, 1.0, 0.3);
        let b = aggregate(&particles, 4.0, 1.0, 0.3);
        assert_eq!(a.temperature_gradient, b.temperature_gradient);
        assert_eq!(a.entropy_production, b.entropy_production);
        assert_eq!(a.system_state, b.system_state);
    }

    // ========== Field Profile Tests ==========

    #[test]
    fn test_field_profile_length_matches_width() {
        let grid = Grid::new(24, 12);
        assert_eq!(field_profile(&grid).len(), 24);
    }

    #[test]
    fn test_field_profile_averages_columns() {
        use crate::field::Cell;
        let mut grid = Grid::new(4, 4);
        for y in 0..4 {
            grid.set_cell(2, y, Cell { u: 1.0, v: 0.8 });
        }
        let profile = field_profile(&grid);
        assert!((profile[2] - 0.8).abs() < 1e-6);
        assert_eq!(profile[0], 0.0);
    }
}
