//! Initial population: bordered grassland maps with one random lake.

use rand::Rng;

use crate::compute::Grid;
use crate::schema::{EvolutionConfig, GridConfig, LakeConfig, TerrainType};

/// Placement of the River rectangle in an initial map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lake {
    pub top: usize,
    pub left: usize,
    pub height: usize,
    pub width: usize,
}

impl Lake {
    /// Draw a lake: side lengths uniform in the configured bounds, top-left
    /// corner uniform over the whole grid. The lake may extend past the edge.
    pub fn random<R: Rng + ?Sized>(grid: &GridConfig, lake: &LakeConfig, rng: &mut R) -> Self {
        let height = rng.gen_range(lake.min_size..=lake.max_size);
        let width = rng.gen_range(lake.min_size..=lake.max_size);
        let top = rng.gen_range(0..grid.rows);
        let left = rng.gen_range(0..grid.cols);
        Self {
            top,
            left,
            height,
            width,
        }
    }
}

/// Build an initial map: Grass everywhere, a Mountain border, then the lake.
///
/// The lake is painted last and is clipped to the grid, so it can replace
/// border cells.
pub fn initial_grid(config: &GridConfig, lake: Lake) -> Grid {
    let mut grid = Grid::filled(config.rows, config.cols, TerrainType::Grass);
    grid.paint_border(config.border, TerrainType::Mountain);
    grid.paint_rect(
        lake.top as isize,
        lake.left as isize,
        lake.height,
        lake.width,
        TerrainType::River,
    );
    grid
}

/// Create `population.size` initial maps, each with its own lake.
pub fn initialize_population<R: Rng + ?Sized>(config: &EvolutionConfig, rng: &mut R) -> Vec<Grid> {
    (0..config.population.size)
        .map(|_| {
            let lake = Lake::random(&config.grid, &config.lake, rng);
            initial_grid(&config.grid, lake)
        })
        .collect()
}
