//! # fluxsim - Dissipative Systems Simulation Engine
//!
//! Real-time particle and field simulations with a simple, host-driven
//! tick API. fluxsim owns the numerical state-update rules and derived
//! metrics so a rendering front-end can focus on drawing: the host calls
//! one tick per presented frame and receives GPU-uploadable buffers back.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fluxsim::prelude::*;
//!
//! fn main() {
//!     let mut sim = Simulation::new()
//!         .with_params(SimulationParams::default().with_particle_count(2_000).with_heat(0.5))
//!         .with_active(ActiveSim::Gas);
//!
//!     let mut surface = NullSurface; // or your renderer
//!     loop {
//!         sim.tick(&mut surface);
//!         let data = sim.latest_data();
//!         println!("{} | entropy {:.4}", data.system_state, data.entropy_production);
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Engines
//!
//! Five independent engines share one pattern: keep a state buffer,
//! apply a discrete update rule per tick, derive summary metrics,
//! expose buffers and metrics to the presentation layer.
//!
//! | Engine | State | Update rule |
//! |--------|-------|-------------|
//! | [`gas::GasSim`] | particle set | wall reflection + asymmetric heat exchange |
//! | [`reaction::GrayScott`] | (u, v) grid | Gray-Scott reaction-diffusion |
//! | [`reaction::ExcitableMedium`] | (u, v) grid | fixed-regime waves + excite pulses |
//! | [`flock::FlockSim`] | boid set | separation / alignment / cohesion / flee |
//! | [`convection`] | none | pure noise function of (x, z, t) |
//!
//! ### Ticks
//!
//! The host invokes [`Simulation::tick`] once per frame. Parameters are
//! snapshotted at tick start, so UI writes land between ticks and never
//! mid-tick. Steps are pure CPU transforms: no blocking, no I/O.
//!
//! ### Metrics
//!
//! Every gas tick produces a [`metrics::SimulationData`] record: a
//! 10-slice temperature gradient, an entropy-production estimate and a
//! qualitative state label. The record feeds the on-screen chart and
//! the explanation prompt.
//!
//! ### Explanations
//!
//! [`explain::ExplainClient`] turns the metrics record into a
//! natural-language analysis prompt for a generative-language API. It
//! is the only fallible, potentially slow call in the crate and runs
//! off the tick loop; without a configured key it degrades to a fixed
//! advisory string and never touches the network.

pub mod convection;
pub mod error;
pub mod explain;
pub mod field;
pub mod flock;
pub mod gas;
pub mod metrics;
pub mod noise;
pub mod params;
pub mod reaction;
mod simulation;
pub mod spatial;
pub mod spawn;
pub mod time;

pub use bytemuck;
pub use error::ExplainError;
pub use explain::{ExplainClient, ExplainConfig};
pub use field::{Cell, Grid};
pub use flock::{Boid, FlockSim};
pub use gas::{GasSim, Particle};
pub use glam::{Vec2, Vec3, Vec4};
pub use metrics::{SimulationData, SystemState};
pub use params::{ActiveSim, ReactionDiffusionParams, SimulationParams};
pub use reaction::{ExcitableMedium, GrayScott};
pub use simulation::{
    FrameData, NullSurface, ParticleInstance, RenderSurface, Simulation, SurfaceVertex,
};
pub use spatial::{SpatialConfig, SpatialGrid};
pub use spawn::SpawnContext;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use fluxsim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::ExplainError;
    pub use crate::explain::{ExplainClient, ExplainConfig};
    pub use crate::field::{Cell, Grid};
    pub use crate::flock::{Boid, FlockSim};
    pub use crate::gas::{GasSim, Particle};
    pub use crate::metrics::{SimulationData, SystemState};
    pub use crate::params::{ActiveSim, ReactionDiffusionParams, SimulationParams};
    pub use crate::reaction::{ExcitableMedium, GrayScott};
    pub use crate::simulation::{
        FrameData, NullSurface, ParticleInstance, RenderSurface, Simulation, SurfaceVertex,
    };
    pub use crate::spawn::SpawnContext;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3, Vec4};
}
