//! Simulation orchestrator and host-facing surface contract.
//!
//! The rendering host owns the frame loop and calls [`Simulation::tick`]
//! exactly once per presented frame. A tick snapshots the parameters,
//! advances the active engine, refreshes the metrics record (gas only)
//! and hands the latest buffers to the [`RenderSurface`] collaborator
//! exactly once. Ticks never block and never perform I/O.
//!
//! Buffers cross the surface boundary as `bytemuck`-Pod structs so a
//! GPU-backed host can upload them without conversion; a headless host
//! can just read them.
//!
//! # Example
//!
//! ```ignore
//! use fluxsim::prelude::*;
//!
//! let mut sim = Simulation::new()
//!     .with_params(SimulationParams::default().with_particle_count(2_000))
//!     .with_active(ActiveSim::Gas);
//!
//! let mut surface = NullSurface;
//! loop {
//!     sim.tick(&mut surface);
//!     println!("state: {}", sim.latest_data().system_state);
//! }
//! ```

use crate::field::Cell;
use crate::flock::{self, FlockSim};
use crate::gas::GasSim;
use crate::metrics::{self, SimulationData};
use crate::params::{ActiveSim, ReactionDiffusionParams, SimulationParams};
use crate::reaction::{ExcitableMedium, GrayScott};
use crate::time::Time;
use crate::{convection, Vec3};
use bytemuck::{Pod, Zeroable};
use log::info;

/// Default side length of the reaction-diffusion grids.
pub const DEFAULT_GRID_SIZE: usize = 256;

/// Default sampling resolution of the convection surface.
pub const DEFAULT_CONVECTION_RESOLUTION: u32 = 64;

/// Half-extent of the sampled convection surface in world units.
pub const CONVECTION_EXTENT: f32 = 10.0;

/// One particle or boid, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub speed: f32,
}

/// One convection surface point, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SurfaceVertex {
    /// World position: x, height, z.
    pub position: [f32; 3],
    /// Vertical velocity at this point.
    pub velocity: f32,
}

/// The buffers one tick hands to the render surface.
pub enum FrameData<'a> {
    /// Gas particles or boids.
    Particles(&'a [ParticleInstance]),
    /// A concentration grid, row-major.
    Field {
        width: u32,
        height: u32,
        cells: &'a [Cell],
    },
    /// The sampled convection surface, row-major resolution x resolution.
    Surface {
        resolution: u32,
        vertices: &'a [SurfaceVertex],
    },
}

/// Drawable surface collaborator.
///
/// Receives the latest buffers once per tick. Implementations must not
/// block; expensive uploads belong on the host's render thread.
pub trait RenderSurface {
    fn present_frame(&mut self, frame: FrameData<'_>);
}

/// Surface that discards every frame (headless runs, tests).
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn present_frame(&mut self, _frame: FrameData<'_>) {}
}

/// Owner of all five engines, the clock, and the parameter snapshots.
pub struct Simulation {
    params: SimulationParams,
    rd_params: ReactionDiffusionParams,
    active: ActiveSim,
    time: Time,

    gas: GasSim,
    flock: FlockSim,
    gray_scott: GrayScott,
    excitable: ExcitableMedium,

    convection_resolution: u32,
    latest_data: SimulationData,

    particle_scratch: Vec<ParticleInstance>,
    surface_scratch: Vec<SurfaceVertex>,
}

impl Simulation {
    /// Create a simulation with default parameters and engine sizes.
    pub fn new() -> Self {
        let params = SimulationParams::default();
        Self {
            params,
            rd_params: ReactionDiffusionParams::default(),
            active: ActiveSim::default(),
            time: Time::new(),
            gas: GasSim::new(params.particle_count),
            flock: FlockSim::new(600),
            gray_scott: GrayScott::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE),
            excitable: ExcitableMedium::new(DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE, 7),
            convection_resolution: DEFAULT_CONVECTION_RESOLUTION,
            latest_data: SimulationData::initializing(),
            particle_scratch: Vec::new(),
            surface_scratch: Vec::new(),
        }
    }

    /// Replace the gas/tick parameters.
    pub fn with_params(mut self, params: SimulationParams) -> Self {
        self.params = params;
        self.gas = GasSim::new(params.particle_count);
        self
    }

    /// Replace the reaction-diffusion parameters.
    pub fn with_reaction_params(mut self, params: ReactionDiffusionParams) -> Self {
        self.rd_params = params;
        self
    }

    /// Select the engine driven each tick.
    pub fn with_active(mut self, active: ActiveSim) -> Self {
        self.active = active;
        self
    }

    /// Re-create both grids at the given square size.
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.gray_scott = GrayScott::new(size, size);
        self.excitable = ExcitableMedium::new(size, size, 7);
        self
    }

    /// Seed the particle engines deterministically and step with a fixed
    /// 60 Hz delta. Used by scenario tests and reproducible captures.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.gas = GasSim::with_seed(self.params.particle_count, seed);
        self.flock = FlockSim::with_seed(self.flock.len() as u32, seed);
        self.excitable = ExcitableMedium::new(
            self.excitable.grid().width(),
            self.excitable.grid().height(),
            seed,
        );
        self.time.set_fixed_delta(Some(1.0 / 60.0));
        self
    }

    /// Set the convection surface sampling resolution.
    pub fn with_convection_resolution(mut self, resolution: u32) -> Self {
        self.convection_resolution = resolution.max(2);
        self
    }

    /// UI-side mutator: replace the parameter snapshot read at the next
    /// tick. The core never calls this itself.
    pub fn set_params(&mut self, params: SimulationParams) {
        self.params = params;
    }

    /// UI-side mutator for the reaction-diffusion parameters.
    pub fn set_reaction_params(&mut self, params: ReactionDiffusionParams) {
        self.rd_params = params;
    }

    /// Switch the active engine. Engine state is retained across switches.
    pub fn set_active(&mut self, active: ActiveSim) {
        self.active = active;
    }

    /// Queue an excitation pulse for the excitable medium, in grid
    /// coordinates. Applied at the start of its next step.
    pub fn excite(&mut self, x: f32, y: f32) {
        self.excitable.excite(x, y);
    }

    /// Advance one frame and present the resulting buffers.
    pub fn tick(&mut self, surface: &mut dyn RenderSurface) {
        // Snapshot: parameter writes land between ticks, never mid-tick.
        let params = self.params;
        let rd = self.rd_params;

        if params.paused != self.time.is_paused() {
            if params.paused {
                self.time.pause();
            } else {
                self.time.resume();
            }
        }
        self.time.update();

        let advancing = !params.paused;
        let dt = self.time.tick_delta();

        match self.active {
            ActiveSim::Gas => {
                if self.gas.len() != params.particle_count as usize {
                    info!(
                        "re-spawning gas particle set: {} -> {}",
                        self.gas.len(),
                        params.particle_count
                    );
                    self.gas.resize(params.particle_count);
                }
                if advancing {
                    self.gas.step(params.heat, dt);
                    let data = metrics::aggregate(
                        self.gas.particles(),
                        self.gas.energy_in(),
                        self.gas.energy_out(),
                        params.heat,
                    );
                    if data.system_state != self.latest_data.system_state {
                        info!(
                            "system state: {} -> {}",
                            self.latest_data.system_state, data.system_state
                        );
                    }
                    self.latest_data = data;
                }

                self.particle_scratch.clear();
                self.particle_scratch
                    .extend(self.gas.particles().iter().map(|p| {
                        let speed = p.velocity.length();
                        let warmth = (speed / 10.0).min(1.0);
                        ParticleInstance {
                            position: p.position.to_array(),
                            size: p.size,
                            color: [warmth, 0.3, 1.0 - warmth],
                            speed,
                        }
                    }));
                surface.present_frame(FrameData::Particles(&self.particle_scratch));
            }

            ActiveSim::GrayScott => {
                if advancing {
                    self.gray_scott.step_n(rd.feed, rd.kill, rd.substeps);
                }
                let grid = self.gray_scott.grid();
                surface.present_frame(FrameData::Field {
                    width: grid.width() as u32,
                    height: grid.height() as u32,
                    cells: grid.cells(),
                });
            }

            ActiveSim::Excitable => {
                if advancing {
                    self.excitable.step_n(rd.substeps);
                }
                let grid = self.excitable.grid();
                surface.present_frame(FrameData::Field {
                    width: grid.width() as u32,
                    height: grid.height() as u32,
                    cells: grid.cells(),
                });
            }

            ActiveSim::Flock => {
                if advancing {
                    self.flock.step(predator_position(self.time.elapsed()));
                }
                self.particle_scratch.clear();
                self.particle_scratch
                    .extend(self.flock.boids().iter().map(|b| ParticleInstance {
                        position: b.position.to_array(),
                        size: 1.0,
                        color: b.color.to_array(),
                        speed: b.velocity.length(),
                    }));
                surface.present_frame(FrameData::Particles(&self.particle_scratch));
            }

            ActiveSim::Convection => {
                self.sample_convection(self.time.elapsed());
                surface.present_frame(FrameData::Surface {
                    resolution: self.convection_resolution,
                    vertices: &self.surface_scratch,
                });
            }
        }
    }

    fn sample_convection(&mut self, t: f32) {
        let res = self.convection_resolution;
        self.surface_scratch.clear();
        self.surface_scratch.reserve((res * res) as usize);
        for iz in 0..res {
            for ix in 0..res {
                let x = ((ix as f32 / (res - 1) as f32) * 2.0 - 1.0) * CONVECTION_EXTENT;
                let z = ((iz as f32 / (res - 1) as f32) * 2.0 - 1.0) * CONVECTION_EXTENT;
                let sample = convection::sample(x, z, t);
                self.surface_scratch.push(SurfaceVertex {
                    position: [x, sample.height, z],
                    velocity: sample.velocity,
                });
            }
        }
    }

    /// The metrics record from the most recent gas tick.
    #[inline]
    pub fn latest_data(&self) -> &SimulationData {
        &self.latest_data
    }

    /// The current parameter snapshot.
    #[inline]
    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// The currently active engine.
    #[inline]
    pub fn active(&self) -> ActiveSim {
        self.active
    }

    /// The tick clock.
    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// The gas engine.
    #[inline]
    pub fn gas(&self) -> &GasSim {
        &self.gas
    }

    /// The flocking engine.
    #[inline]
    pub fn flock(&self) -> &FlockSim {
        &self.flock
    }

    /// The Gray-Scott engine.
    #[inline]
    pub fn gray_scott(&self) -> &GrayScott {
        &self.gray_scott
    }

    /// The excitable-medium engine.
    #[inline]
    pub fn excitable(&self) -> &ExcitableMedium {
        &self.excitable
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// The predator loops through the flock domain on a slow Lissajous path.
fn predator_position(t: f32) -> Vec3 {
    let radius = flock::BOUNDS * 0.35;
    Vec3::new(
        (t * 0.31).sin() * radius,
        (t * 0.17).sin() * radius * 0.4,
        (t * 0.23).cos() * radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface that records what it was handed.
    struct RecordingSurface {
        frames: u32,
        particles: usize,
        field_cells: usize,
        surface_vertices: usize,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                frames: 0,
                particles: 0,
                field_cells: 0,
                surface_vertices: 0,
            }
        }
    }

    impl RenderSurface for RecordingSurface {
        fn present_frame(&mut self, frame: FrameData<'_>) {
            self.frames += 1;
            match frame {
                FrameData::Particles(p) => self.particles = p.len(),
                FrameData::Field { cells, .. } => self.field_cells = cells.len(),
                FrameData::Surface { vertices, .. } => self.surface_vertices = vertices.len(),
            }
        }
    }

    fn small_sim(active: ActiveSim) -> Simulation {
        Simulation::new()
            .with_params(SimulationParams::default().with_particle_count(50))
            .with_grid_size(32)
            .with_active(active)
            .with_seed(42)
    }

    #[test]
    fn test_tick_presents_exactly_once() {
        let mut sim = small_sim(ActiveSim::Gas);
        let mut surface = RecordingSurface::new();
        sim.tick(&mut surface);
        assert_eq!(surface.frames, 1);
        assert_eq!(surface.particles, 50);
    }

    #[test]
    fn test_gas_tick_refreshes_metrics() {
        let mut sim = small_sim(ActiveSim::Gas);
        let mut surface = NullSurface;
        assert_eq!(
            sim.latest_data().system_state,
            crate::metrics::SystemState::Initializing
        );
        sim.tick(&mut surface);
        assert_ne!(
            sim.latest_data().system_state,
            crate::metrics::SystemState::Initializing
        );
        assert_eq!(sim.latest_data().temperature_gradient.len(), 10);
    }

    #[test]
    fn test_particle_count_change_respawns_next_tick() {
        let mut sim = small_sim(ActiveSim::Gas);
        let mut surface = NullSurface;
        sim.tick(&mut surface);

        sim.set_params(sim.params().with_particle_count(80));
        assert_eq!(sim.gas().len(), 50);
        sim.tick(&mut surface);
        assert_eq!(sim.gas().len(), 80);
    }

    #[test]
    fn test_paused_tick_does_not_advance() {
        let mut sim = small_sim(ActiveSim::Gas);
        let mut surface = RecordingSurface::new();
        sim.tick(&mut surface);

        sim.set_params(sim.params().with_paused(true));
        sim.tick(&mut surface);
        let positions_a: Vec<_> = sim.gas().particles().iter().map(|p| p.position).collect();
        sim.tick(&mut surface);
        let positions_b: Vec<_> = sim.gas().particles().iter().map(|p| p.position).collect();

        assert_eq!(positions_a, positions_b);
        // Frames still presented while paused
        assert_eq!(surface.frames, 3);
    }

    #[test]
    fn test_field_frame_carries_whole_grid() {
        let mut sim = small_sim(ActiveSim::GrayScott);
        let mut surface = RecordingSurface::new();
        sim.tick(&mut surface);
        assert_eq!(surface.field_cells, 32 * 32);
    }

    #[test]
    fn test_convection_frame_carries_sampled_surface() {
        let mut sim = small_sim(ActiveSim::Convection).with_convection_resolution(16);
        let mut surface = RecordingSurface::new();
        sim.tick(&mut surface);
        assert_eq!(surface.surface_vertices, 16 * 16);
    }

    #[test]
    fn test_engine_switch_retains_state() {
        let mut sim = small_sim(ActiveSim::Gas);
        let mut surface = NullSurface;
        sim.tick(&mut surface);
        let gradient = sim.latest_data().temperature_gradient.clone();

        sim.set_active(ActiveSim::Flock);
        sim.tick(&mut surface);
        // Gas metrics survive while another engine runs
        assert_eq!(sim.latest_data().temperature_gradient, gradient);

        sim.set_active(ActiveSim::Gas);
        sim.tick(&mut surface);
        assert_eq!(sim.gas().len(), 50);
    }

    #[test]
    fn test_pod_layouts_are_castable() {
        let instance = ParticleInstance {
            position: [1.0, 2.0, 3.0],
            size: 0.5,
            color: [0.1, 0.2, 0.3],
            speed: 4.0,
        };
        let bytes: &[u8] = bytemuck::bytes_of(&instance);
        assert_eq!(bytes.len(), 32);

        let vertex = SurfaceVertex {
            position: [0.0; 3],
            velocity: 0.0,
        };
        assert_eq!(bytemuck::bytes_of(&vertex).len(), 16);
    }
}
