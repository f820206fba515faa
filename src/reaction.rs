//! Gray-Scott reaction-diffusion stepping.
//!
//! One step applies the two-species Gray-Scott law to every cell of a
//! [`Grid`](crate::field::Grid):
//!
//! ```text
//! reaction = u * v^2
//! u' = clamp01(u + (Du * Lap(u) - reaction + feed * (1 - u)) * dt)
//! v' = clamp01(v + (Dv * Lap(v) + reaction - (feed + kill) * v) * dt)
//! ```
//!
//! with the weighted Moore-neighborhood Laplacian from the grid module.
//! Feed and kill select the pattern regime (spots, stripes, maze, waves);
//! diffusion constants are fixed. Several sub-steps may run per presented
//! frame purely to reach a developed pattern sooner - the count changes
//! time-to-pattern, never correctness.
//!
//! [`ExcitableMedium`] is the same stepper pinned to a wave-friendly
//! feed/kill regime, plus a user-triggered excitation pulse: cells near
//! the excite point are forced to full substance-A concentration before
//! the next step.

use crate::field::{Cell, Grid};

/// Diffusion rate of substance A (u channel).
pub const DIFFUSION_U: f32 = 0.16;

/// Diffusion rate of substance B (v channel).
pub const DIFFUSION_V: f32 = 0.08;

/// Integration step per grid sub-step.
pub const REACTION_DT: f32 = 1.0;

/// Fixed feed rate for the excitable-medium variant.
pub const EXCITABLE_FEED: f32 = 0.029;

/// Fixed kill rate for the excitable-medium variant.
pub const EXCITABLE_KILL: f32 = 0.057;

/// Radius, in cells, of an excitation pulse.
pub const EXCITE_RADIUS: f32 = 5.0;

#[inline]
fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Advance the grid by one Gray-Scott step.
///
/// All neighbor reads observe the pre-step buffer; the swap at the end
/// publishes the new state.
pub fn step(grid: &mut Grid, feed: f32, kill: f32) {
    let (width, height) = (grid.width(), grid.height());
    for y in 0..height {
        for x in 0..width {
            let Cell { u, v } = grid.cell(x, y);
            let (lap_u, lap_v) = grid.laplacian(x, y);

            let reaction = u * v * v;
            let du = DIFFUSION_U * lap_u - reaction + feed * (1.0 - u);
            let dv = DIFFUSION_V * lap_v + reaction - (feed + kill) * v;

            grid.set_next(
                x,
                y,
                Cell {
                    u: clamp01(u + du * REACTION_DT),
                    v: clamp01(v + dv * REACTION_DT),
                },
            );
        }
    }
    grid.swap();
}

/// Gray-Scott simulation with externally configurable feed/kill rates.
pub struct GrayScott {
    grid: Grid,
}

impl GrayScott {
    /// Default seed square side for a fresh grid.
    pub const SEED_SIZE: usize = 20;

    /// Create a grid seeded with a centered square of substance B.
    pub fn new(width: usize, height: usize) -> Self {
        let mut grid = Grid::new(width, height);
        grid.seed_center(Self::SEED_SIZE.min(width / 4).max(2));
        Self { grid }
    }

    /// Advance by `substeps` Gray-Scott steps.
    pub fn step_n(&mut self, feed: f32, kill: f32, substeps: u32) {
        for _ in 0..substeps {
            step(&mut self.grid, feed, kill);
        }
    }

    /// The published grid state.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for re-seeding.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

/// Excitable-medium simulation (Belousov-Zhabotinsky-style waves).
///
/// Feed/kill are fixed in the traveling-wave regime; interaction happens
/// through [`excite`](Self::excite) pulses instead of parameter changes.
pub struct ExcitableMedium {
    grid: Grid,
    pending_excite: Option<(f32, f32)>,
}

impl ExcitableMedium {
    /// Create a grid seeded with scattered substance-B discs.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let mut grid = Grid::new(width, height);
        grid.seed_scattered(8, 3, seed);
        Self {
            grid,
            pending_excite: None,
        }
    }

    /// Queue an excitation pulse at grid coordinates (x, y).
    ///
    /// Applied once, immediately before the next step. A second call
    /// before that step replaces the pending pulse.
    pub fn excite(&mut self, x: f32, y: f32) {
        self.pending_excite = Some((x, y));
    }

    /// Advance by `substeps` steps, applying any pending excitation first.
    pub fn step_n(&mut self, substeps: u32) {
        if let Some((x, y)) = self.pending_excite.take() {
            excite_disc(&mut self.grid, x, y, EXCITE_RADIUS);
        }
        for _ in 0..substeps {
            step(&mut self.grid, EXCITABLE_FEED, EXCITABLE_KILL);
        }
    }

    /// The published grid state.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for re-seeding.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

/// Force u = 1 within `radius` of (cx, cy), leaving v untouched.
fn excite_disc(grid: &mut Grid, cx: f32, cy: f32, radius: f32) {
    let r2 = radius * radius;
    let x_lo = (cx - radius).floor().max(0.0) as usize;
    let x_hi = ((cx + radius).ceil() as usize).min(grid.width() - 1);
    let y_lo = (cy - radius).floor().max(0.0) as usize;
    let y_hi = ((cy + radius).ceil() as usize).min(grid.height() - 1);
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                let mut cell = grid.cell(x, y);
                cell.u = 1.0;
                grid.set_cell(x, y, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Update Law Tests ==========

    #[test]
    fn test_base_state_is_a_fixed_point() {
        // u = 1, v = 0: zero Laplacian, zero reaction, zero feed term
        let mut grid = Grid::new(16, 16);
        step(&mut grid, 0.055, 0.062);
        for cell in grid.cells() {
            assert_eq!(cell.u, 1.0);
            assert_eq!(cell.v, 0.0);
        }
    }

    #[test]
    fn test_uniform_grid_changes_only_by_feed_relaxation() {
        // On a uniform grid the Laplacian vanishes, so with v = 0 the only
        // active term is feed * (1 - u): every cell must move by exactly
        // that amount, in lockstep.
        let mut grid = Grid::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                grid.set_cell(x, y, Cell { u: 0.4, v: 0.0 });
            }
        }
        let feed = 0.055;
        step(&mut grid, feed, 0.062);

        let expected = 0.4 + feed * (1.0 - 0.4) * REACTION_DT;
        for cell in grid.cells() {
            assert!((cell.u - expected).abs() < 1e-6);
            assert_eq!(cell.v, 0.0);
        }
    }

    #[test]
    fn test_neighbor_reads_use_pre_step_values() {
        // An impulse must diffuse symmetrically. In-place sweeps (the bug
        // double-buffering prevents) leak updated values into cells later
        // in scan order and skew the response toward one corner.
        let mut grid = Grid::new(17, 17);
        grid.set_cell(8, 8, Cell { u: 1.0, v: 1.0 });
        step(&mut grid, 0.055, 0.062);

        let left = grid.cell(7, 8);
        let right = grid.cell(9, 8);
        let up = grid.cell(8, 7);
        let down = grid.cell(8, 9);
        assert!((left.v - right.v).abs() < 1e-6);
        assert!((up.v - down.v).abs() < 1e-6);
        assert!((left.v - up.v).abs() < 1e-6);
    }

    #[test]
    fn test_concentrations_stay_clamped() {
        let mut sim = GrayScott::new(32, 32);
        sim.step_n(0.09, 0.05, 50);
        for cell in sim.grid().cells() {
            assert!((0.0..=1.0).contains(&cell.u));
            assert!((0.0..=1.0).contains(&cell.v));
        }
    }

    // ========== Simulation Wrapper Tests ==========

    #[test]
    fn test_seeded_grid_develops_structure() {
        let mut sim = GrayScott::new(64, 64);
        sim.step_n(0.055, 0.062, 100);
        let (_, variance) = sim.grid().v_stats();
        assert!(variance > 1e-5, "v variance {variance} - pattern decayed");
    }

    #[test]
    fn test_substep_count_only_changes_pace() {
        let mut a = GrayScott::new(24, 24);
        let mut b = GrayScott::new(24, 24);
        a.step_n(0.055, 0.062, 8);
        for _ in 0..8 {
            b.step_n(0.055, 0.062, 1);
        }
        for (ca, cb) in a.grid().cells().iter().zip(b.grid().cells()) {
            assert_eq!(ca, cb);
        }
    }

    // ========== Excitable Medium Tests ==========

    #[test]
    fn test_excite_pulse_forces_full_u_and_leaves_v() {
        let mut sim = ExcitableMedium::new(64, 64, 3);
        sim.grid_mut().set_cell(32, 32, Cell { u: 0.2, v: 0.3 });
        sim.excite(32.0, 32.0);
        // Zero sub-steps: just the pulse application
        sim.step_n(0);
        let cell = sim.grid().cell(32, 32);
        assert_eq!(cell.u, 1.0);
        assert!((cell.v - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_excite_radius_is_local() {
        let mut sim = ExcitableMedium::new(64, 64, 3);
        let far = sim.grid().cell(5, 5);
        sim.grid_mut().set_cell(32, 32, Cell { u: 0.2, v: 0.0 });
        sim.excite(32.0, 32.0);
        sim.step_n(0);
        assert_eq!(sim.grid().cell(5, 5), far);
    }

    #[test]
    fn test_excite_applies_once() {
        let mut sim = ExcitableMedium::new(32, 32, 3);
        sim.grid_mut().set_cell(16, 16, Cell { u: 0.2, v: 0.4 });
        sim.excite(16.0, 16.0);
        sim.step_n(1);
        let after_first = sim.grid().cell(16, 16);
        sim.step_n(1);
        // No second pulse: the cell keeps reacting instead of snapping back
        let after_second = sim.grid().cell(16, 16);
        assert!(after_second.u < 1.0 || (after_second.u - after_first.u).abs() < 1e-6);
    }
}
