//! Connected-region counting by flood fill.
//!
//! Regions are maximal sets of same-terrain cells joined through shared
//! edges (4-connectivity). Diagonal contact never joins two regions.

use crate::schema::{RegionCounts, TerrainType};

use super::Grid;

/// Counts connected regions of a terrain.
///
/// Holds its visited map and stack so repeated calls on same-sized grids do
/// not reallocate.
#[derive(Debug, Default)]
pub struct RegionCounter {
    visited: Vec<bool>,
    stack: Vec<usize>,
}

impl RegionCounter {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of 4-connected regions of `terrain` in `grid`.
    ///
    /// Each cell is pushed at most once, so the work is linear in the grid
    /// size. A grid without `terrain` has zero regions.
    pub fn count(&mut self, grid: &Grid, terrain: TerrainType) -> usize {
        self.visited.clear();
        self.visited.resize(grid.len(), false);
        self.stack.clear();

        let cells = grid.cells();
        let mut regions = 0;

        for start in 0..cells.len() {
            if self.visited[start] || cells[start] != terrain {
                continue;
            }

            regions += 1;
            self.visited[start] = true;
            self.stack.push(start);

            while let Some(idx) = self.stack.pop() {
                for next in grid.neighbors(idx) {
                    if !self.visited[next] && cells[next] == terrain {
                        self.visited[next] = true;
                        self.stack.push(next);
                    }
                }
            }
        }

        regions
    }

    /// Region counts for every terrain.
    pub fn count_all(&mut self, grid: &Grid) -> RegionCounts {
        let mut counts = RegionCounts::default();
        for terrain in TerrainType::ALL {
            counts.set(terrain, self.count(grid, terrain));
        }
        counts
    }
}

/// Number of 4-connected regions of `terrain` in `grid`.
pub fn count_regions(grid: &Grid, terrain: TerrainType) -> usize {
    RegionCounter::new().count(grid, terrain)
}
