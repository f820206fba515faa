//! Uniform-grid spatial index for neighbor queries.
//!
//! Neighbor-based stepping (flocking) is O(n^2) when every element
//! scans every other. The index buckets positions into a fixed grid of
//! cells and restricts each query to the 27-cell neighborhood around
//! the query point, which keeps per-tick cost near O(n) as long as
//! `cell_size` is at least the largest interaction radius.
//!
//! The index holds no positions of its own: rebuild it from the
//! authoritative set each tick, then query while the set is unchanged.

use glam::Vec3;

/// Configuration for the uniform grid.
#[derive(Clone, Copy, Debug)]
pub struct SpatialConfig {
    /// Size of each cell in world units. Should be >= the largest
    /// interaction radius queried against the index.
    pub cell_size: f32,
    /// Number of cells per dimension (grid is resolution^3, centered
    /// on the origin).
    pub grid_resolution: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.1,
            grid_resolution: 64,
        }
    }
}

impl SpatialConfig {
    pub fn new(cell_size: f32, grid_resolution: u32) -> Self {
        assert!(
            grid_resolution.is_power_of_two(),
            "Grid resolution must be power of 2"
        );
        assert!(
            grid_resolution <= 256,
            "Grid resolution must be <= 256 to keep the cell table bounded"
        );
        assert!(cell_size > 0.0, "Cell size must be positive");
        Self {
            cell_size,
            grid_resolution,
        }
    }

    /// Total number of cells in the grid.
    pub fn total_cells(&self) -> u32 {
        self.grid_resolution * self.grid_resolution * self.grid_resolution
    }
}

/// Uniform grid of member indices, rebuilt once per tick.
pub struct SpatialGrid {
    config: SpatialConfig,
    /// Flattened cell table; each cell holds the indices binned into it.
    cells: Vec<Vec<u32>>,
}

impl SpatialGrid {
    pub fn new(config: SpatialConfig) -> Self {
        Self {
            cells: vec![Vec::new(); config.total_cells() as usize],
            config,
        }
    }

    /// Map a world position to clamped cell coordinates.
    fn cell_coords(&self, pos: Vec3) -> [u32; 3] {
        let res = self.config.grid_resolution;
        let half_grid = res as f32 * self.config.cell_size * 0.5;
        let mut coords = [0u32; 3];
        for (c, p) in coords.iter_mut().zip([pos.x, pos.y, pos.z]) {
            let normalized = (p + half_grid) / self.config.cell_size;
            *c = (normalized.clamp(0.0, (res - 1) as f32)) as u32;
        }
        coords
    }

    #[inline]
    fn cell_index(&self, [x, y, z]: [u32; 3]) -> usize {
        let res = self.config.grid_resolution;
        (x + y * res + z * res * res) as usize
    }

    /// Re-bin all positions. Call once per tick before querying.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (i, &pos) in positions.iter().enumerate() {
            let idx = self.cell_index(self.cell_coords(pos));
            self.cells[idx].push(i as u32);
        }
    }

    /// Visit every member binned within one cell of `pos` (the 27-cell
    /// Moore neighborhood), including the query element itself if it was
    /// part of the rebuild.
    pub fn for_each_neighbor(&self, pos: Vec3, mut visit: impl FnMut(u32)) {
        let res = self.config.grid_resolution as i32;
        let [cx, cy, cz] = self.cell_coords(pos);
        for dz in -1i32..=1 {
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let x = cx as i32 + dx;
                    let y = cy as i32 + dy;
                    let z = cz as i32 + dz;
                    if x < 0 || y < 0 || z < 0 || x >= res || y >= res || z >= res {
                        continue;
                    }
                    let idx = self.cell_index([x as u32, y as u32, z as u32]);
                    for &member in &self.cells[idx] {
                        visit(member);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_neighbors(grid: &SpatialGrid, pos: Vec3) -> Vec<u32> {
        let mut out = Vec::new();
        grid.for_each_neighbor(pos, |i| out.push(i));
        out.sort_unstable();
        out
    }

    #[test]
    fn test_config_defaults() {
        let config = SpatialConfig::default();
        assert_eq!(config.grid_resolution, 64);
        assert_eq!(config.total_cells(), 64 * 64 * 64);
    }

    #[test]
    #[should_panic(expected = "power of 2")]
    fn test_config_rejects_non_power_of_two() {
        SpatialConfig::new(0.1, 48);
    }

    #[test]
    fn test_nearby_positions_are_found() {
        let mut grid = SpatialGrid::new(SpatialConfig::new(1.0, 16));
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 0.9, 0.0),
        ];
        grid.rebuild(&positions);

        let found = collect_neighbors(&grid, positions[0]);
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn test_distant_positions_are_skipped() {
        let mut grid = SpatialGrid::new(SpatialConfig::new(1.0, 16));
        let positions = vec![Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0)];
        grid.rebuild(&positions);

        let found = collect_neighbors(&grid, Vec3::ZERO);
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn test_matches_naive_scan_within_radius() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(17);
        let positions: Vec<Vec3> = (0..200)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-7.0..7.0),
                    rng.gen_range(-7.0..7.0),
                    rng.gen_range(-7.0..7.0),
                )
            })
            .collect();

        let radius = 1.0;
        let mut grid = SpatialGrid::new(SpatialConfig::new(radius, 16));
        grid.rebuild(&positions);

        for (i, &p) in positions.iter().enumerate() {
            let naive: Vec<u32> = positions
                .iter()
                .enumerate()
                .filter(|(j, q)| *j != i && p.distance(**q) < radius)
                .map(|(j, _)| j as u32)
                .collect();

            let mut indexed = Vec::new();
            grid.for_each_neighbor(p, |j| {
                if j as usize != i && p.distance(positions[j as usize]) < radius {
                    indexed.push(j);
                }
            });
            indexed.sort_unstable();

            let mut naive = naive;
            naive.sort_unstable();
            assert_eq!(indexed, naive, "mismatch for element {i}");
        }
    }

    #[test]
    fn test_rebuild_clears_previous_bins() {
        let mut grid = SpatialGrid::new(SpatialConfig::new(1.0, 16));
        grid.rebuild(&[Vec3::ZERO]);
        grid.rebuild(&[Vec3::new(4.0, 4.0, 4.0)]);

        let found = collect_neighbors(&grid, Vec3::ZERO);
        assert!(found.is_empty());
    }
}
