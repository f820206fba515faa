//! Configuration snapshots read at tick start.
//!
//! The UI collaborator owns the authoritative parameter values and may
//! rewrite them between ticks; the simulation copies a snapshot at the
//! start of every tick and never observes a change mid-tick. Parameters
//! are plain `Copy` structs with builder-style setters rather than
//! closures capturing UI state, so every tick's inputs are explicit.

/// Which simulation engine the host is currently driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSim {
    /// Two-wall thermodynamic gas.
    #[default]
    Gas,
    /// Gray-Scott reaction-diffusion grid.
    GrayScott,
    /// Excitable-medium variant with tap-to-excite pulses.
    Excitable,
    /// Boids flocking swarm.
    Flock,
    /// Noise-driven convection surface.
    Convection,
}

/// Parameters for the gas simulation and the tick loop as a whole.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    /// Number of gas particles. Changing this re-spawns the particle set
    /// at the start of the next tick.
    pub particle_count: u32,
    /// Heat injected at the hot wall, >= 0. Zero means no forcing.
    pub heat: f32,
    /// When set, ticks present the latest buffers but do not advance.
    pub paused: bool,
}

impl SimulationParams {
    /// Set the particle count.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the heat level. Negative values are clamped to zero.
    pub fn with_heat(mut self, heat: f32) -> Self {
        self.heat = heat.max(0.0);
        self
    }

    /// Set the pause flag.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            particle_count: 500,
            heat: 0.5,
            paused: false,
        }
    }
}

/// Parameters for the Gray-Scott stepper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionDiffusionParams {
    /// Feed rate (F). Typical patterns live in 0.02..0.08.
    pub feed: f32,
    /// Kill rate (k). Typical patterns live in 0.05..0.07.
    pub kill: f32,
    /// Grid sub-steps per presented frame (1..=8). More sub-steps reach
    /// a developed pattern sooner without changing its shape.
    pub substeps: u32,
}

impl ReactionDiffusionParams {
    /// Set the feed rate.
    pub fn with_feed(mut self, feed: f32) -> Self {
        self.feed = feed.clamp(0.0, 1.0);
        self
    }

    /// Set the kill rate.
    pub fn with_kill(mut self, kill: f32) -> Self {
        self.kill = kill.clamp(0.0, 1.0);
        self
    }

    /// Set the sub-step count, clamped to 1..=8.
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps.clamp(1, 8);
        self
    }
}

impl Default for ReactionDiffusionParams {
    fn default() -> Self {
        Self {
            feed: 0.055,
            kill: 0.062,
            substeps: 4,
        }
    }
}
