//! Noise-driven convection surface.
//!
//! A procedural stand-in for Rayleigh-Benard convection cells: each
//! surface point's height is a gradient-noise sample of (x, z, scaled
//! time), and its vertical velocity is a finite difference against a
//! slightly earlier time sample. There is no feedback state and no
//! buffer; every point is an independent pure function of (x, z, t),
//! so the surface can be evaluated at any resolution per tick.

use crate::noise::noise3;
use glam::Vec3;

/// Spatial frequency of the convection cells.
pub const NOISE_SCALE: f32 = 0.35;

/// How fast the cell pattern churns.
pub const TIME_SCALE: f32 = 0.25;

/// Time offset (seconds) used for the velocity finite difference.
pub const VELOCITY_DT: f32 = 0.1;

/// One sampled surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvectionSample {
    /// Surface height in roughly [-1, 1].
    pub height: f32,
    /// Vertical velocity, the rate of height change.
    pub velocity: f32,
}

/// Sample the convection field at world position (x, z) and time t.
pub fn sample(x: f32, z: f32, t: f32) -> ConvectionSample {
    let height = height_at(x, z, t);
    let earlier = height_at(x, z, t - VELOCITY_DT);
    ConvectionSample {
        height,
        velocity: (height - earlier) / VELOCITY_DT,
    }
}

#[inline]
fn height_at(x: f32, z: f32, t: f32) -> f32 {
    noise3(Vec3::new(x * NOISE_SCALE, z * NOISE_SCALE, t * TIME_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample(1.5, -2.5, 3.0), sample(1.5, -2.5, 3.0));
    }

    #[test]
    fn test_height_stays_in_range() {
        for ix in -10..10 {
            for iz in -10..10 {
                let s = sample(ix as f32, iz as f32, 2.7);
                assert!(s.height.is_finite() && s.height.abs() <= 1.1);
                assert!(s.velocity.is_finite());
            }
        }
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let (x, z, t) = (0.8, -1.3, 5.0);
        let s = sample(x, z, t);
        let expected = (height_at(x, z, t) - height_at(x, z, t - VELOCITY_DT)) / VELOCITY_DT;
        assert!((s.velocity - expected).abs() < 1e-6);
    }

    #[test]
    fn test_surface_varies_over_time() {
        let a = sample(0.5, 0.5, 0.0).height;
        let b = sample(0.5, 0.5, 10.0).height;
        assert!((a - b).abs() > 1e-5);
    }
}
