//! Double-buffered concentration grid for reaction-diffusion stepping.
//!
//! A fixed-size 2D grid of two-channel cells (u, v) with explicit
//! current/next buffers. Every cell of a step reads neighbor values
//! from the current buffer and writes into the next buffer; a role
//! swap after the full sweep publishes the step. Updating in place
//! would let late cells observe half-stepped neighbors, which skews
//! patterns directionally - the swap is the whole point.
//!
//! Neighbor sampling wraps at the edges (periodic boundary), in both
//! buffers, always. The boundary rule visibly shapes long-run patterns,
//! so it must never differ between the two buffers.

use bytemuck::{Pod, Zeroable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// One grid cell: two chemical concentrations, both kept in [0, 1].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Cell {
    /// Substance A concentration.
    pub u: f32,
    /// Substance B concentration.
    pub v: f32,
}

/// Fixed-size 2D concentration grid with ping-pong buffers.
pub struct Grid {
    width: usize,
    height: usize,
    current: Vec<Cell>,
    next: Vec<Cell>,
}

impl Grid {
    /// Create a grid with the base state: u = 1, v = 0 everywhere.
    ///
    /// Dimensions must be at least 3 so every cell has a full Moore
    /// neighborhood of distinct cells.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width >= 3, "Grid width must be at least 3");
        assert!(height >= 3, "Grid height must be at least 3");
        let base = Cell { u: 1.0, v: 0.0 };
        Self {
            width,
            height,
            current: vec![base; width * height],
            next: vec![base; width * height],
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The published (current) cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.current
    }

    /// Read one published cell.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.current[y * self.width + x]
    }

    /// Overwrite one published cell (seeding and excitation pulses).
    #[inline]
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.current[y * self.width + x] = cell;
    }

    /// Write one cell of the in-progress step.
    #[inline]
    pub fn set_next(&mut self, x: usize, y: usize, cell: Cell) {
        self.next[y * self.width + x] = cell;
    }

    /// Publish the in-progress step by swapping buffer roles.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Weighted Moore-neighborhood Laplacian of the published buffer.
    ///
    /// Weights: 0.2 for the 4 orthogonal neighbors, 0.05 for the 4
    /// diagonals, -1 for the center (a normalized blur-minus-center
    /// operator). Neighbors wrap periodically.
    pub fn laplacian(&self, x: usize, y: usize) -> (f32, f32) {
        let xm = if x == 0 { self.width - 1 } else { x - 1 };
        let xp = if x + 1 == self.width { 0 } else { x + 1 };
        let ym = if y == 0 { self.height - 1 } else { y - 1 };
        let yp = if y + 1 == self.height { 0 } else { y + 1 };

        let at = |x: usize, y: usize| self.current[y * self.width + x];

        let center = at(x, y);
        let orth = [at(xm, y), at(xp, y), at(x, ym), at(x, yp)];
        let diag = [at(xm, ym), at(xp, ym), at(xm, yp), at(xp, yp)];

        let mut lap_u = -center.u;
        let mut lap_v = -center.v;
        for c in orth {
            lap_u += 0.2 * c.u;
            lap_v += 0.2 * c.v;
        }
        for c in diag {
            lap_u += 0.05 * c.u;
            lap_v += 0.05 * c.v;
        }
        (lap_u, lap_v)
    }

    /// Seed a centered square region with v = 1.
    pub fn seed_center(&mut self, size: usize) {
        let size = size.min(self.width).min(self.height);
        let x0 = (self.width - size) / 2;
        let y0 = (self.height - size) / 2;
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                self.set_cell(x, y, Cell { u: 1.0, v: 1.0 });
            }
        }
    }

    /// Seed `count` randomly scattered discs of the given radius with v = 1.
    pub fn seed_scattered(&mut self, count: usize, radius: usize, seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..count {
            let cx = rng.gen_range(0..self.width);
            let cy = rng.gen_range(0..self.height);
            self.fill_disc(cx as f32, cy as f32, radius as f32, Cell { u: 1.0, v: 1.0 });
        }
    }

    /// Overwrite all published cells within `radius` of (cx, cy).
    pub fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, cell: Cell) {
        let r2 = radius * radius;
        let x_lo = (cx - radius).floor().max(0.0) as usize;
        let x_hi = ((cx + radius).ceil() as usize).min(self.width - 1);
        let y_lo = (cy - radius).floor().max(0.0) as usize;
        let y_hi = ((cy + radius).ceil() as usize).min(self.height - 1);
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.set_cell(x, y, cell);
                }
            }
        }
    }

    /// Mean and variance of the v channel across the published buffer.
    pub fn v_stats(&self) -> (f32, f32) {
        let n = self.current.len() as f32;
        let mean = self.current.iter().map(|c| c.v).sum::<f32>() / n;
        let variance = self
            .current
            .iter()
            .map(|c| {
                let d = c.v - mean;
                d * d
            })
            .sum::<f32>()
            / n;
        (mean, variance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Construction Tests ==========

    #[test]
    fn test_grid_starts_at_base_state() {
        let grid = Grid::new(16, 16);
        for cell in grid.cells() {
            assert_eq!(cell.u, 1.0);
            assert_eq!(cell.v, 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "width must be at least 3")]
    fn test_grid_rejects_tiny_width() {
        Grid::new(2, 16);
    }

    // ========== Laplacian Tests ==========

    #[test]
    fn test_laplacian_of_uniform_grid_is_zero() {
        let grid = Grid::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let (lu, lv) = grid.laplacian(x, y);
                assert!(lu.abs() < 1e-6, "lap_u at ({x},{y}) = {lu}");
                assert!(lv.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_laplacian_weights_sum_against_impulse() {
        let mut grid = Grid::new(9, 9);
        grid.set_cell(4, 4, Cell { u: 1.0, v: 1.0 });

        // At the impulse: v neighbors are all 0, center 1
        let (_, lv) = grid.laplacian(4, 4);
        assert!((lv - -1.0).abs() < 1e-6);

        // Orthogonal neighbor sees weight 0.2, diagonal 0.05
        let (_, lv_orth) = grid.laplacian(5, 4);
        assert!((lv_orth - 0.2).abs() < 1e-6);
        let (_, lv_diag) = grid.laplacian(5, 5);
        assert!((lv_diag - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_laplacian_wraps_at_edges() {
        let mut grid = Grid::new(8, 8);
        grid.set_cell(0, 0, Cell { u: 1.0, v: 1.0 });

        // Opposite corner is a diagonal neighbor under periodic wrap
        let (_, lv) = grid.laplacian(7, 7);
        assert!((lv - 0.05).abs() < 1e-6);
        // Opposite edge midpoints are orthogonal neighbors
        let (_, lv) = grid.laplacian(7, 0);
        assert!((lv - 0.2).abs() < 1e-6);
    }

    // ========== Buffer Tests ==========

    #[test]
    fn test_swap_publishes_next_buffer() {
        let mut grid = Grid::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                grid.set_next(x, y, Cell { u: 0.25, v: 0.75 });
            }
        }
        // Published buffer untouched until the swap
        assert_eq!(grid.cell(2, 2).v, 0.0);
        grid.swap();
        assert_eq!(grid.cell(2, 2), Cell { u: 0.25, v: 0.75 });
    }

    // ========== Seeding Tests ==========

    #[test]
    fn test_seed_center_marks_square() {
        let mut grid = Grid::new(32, 32);
        grid.seed_center(4);
        assert_eq!(grid.cell(15, 15).v, 1.0);
        assert_eq!(grid.cell(0, 0).v, 0.0);
    }

    #[test]
    fn test_seed_scattered_marks_some_cells() {
        let mut grid = Grid::new(64, 64);
        grid.seed_scattered(5, 3, 11);
        let seeded = grid.cells().iter().filter(|c| c.v > 0.0).count();
        assert!(seeded > 0);
    }

    #[test]
    fn test_v_stats_on_half_filled_grid() {
        let mut grid = Grid::new(4, 2);
        for x in 0..4 {
            grid.set_cell(x, 0, Cell { u: 1.0, v: 1.0 });
        }
        let (mean, variance) = grid.v_stats();
        assert!((mean - 0.5).abs() < 1e-6);
        assert!((variance - 0.25).abs() < 1e-6);
    }
}
