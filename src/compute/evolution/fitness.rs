//! Fitness function for terrain maps.
//!
//! A map scores well when every terrain forms a single connected region and
//! river and mountain are both well represented.

use crate::compute::{Grid, RegionCounter};
use crate::schema::{FitnessConfig, FitnessReport, TerrainType};

/// Scores maps. Stateless apart from its weights, so one evaluator can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(config: FitnessConfig) -> Self {
        Self { config }
    }

    /// Score only.
    pub fn score(&self, grid: &Grid) -> i64 {
        self.evaluate(grid).score
    }

    /// Evaluate a map and return the score with its breakdown.
    pub fn evaluate(&self, grid: &Grid) -> FitnessReport {
        let regions = RegionCounter::new().count_all(grid);

        let contiguity: i64 = TerrainType::ALL
            .iter()
            .map(|&terrain| match regions.get(terrain) {
                1 => self.config.contiguity_bonus,
                n => -self.config.fragmentation_penalty * n as i64,
            })
            .sum();

        let river_cells = grid.count(TerrainType::River);
        let mountain_cells = grid.count(TerrainType::Mountain);
        let balance = self.config.balance_weight * river_cells.min(mountain_cells) as i64;

        FitnessReport {
            score: contiguity + balance,
            regions,
            contiguity,
            balance,
            river_cells,
            mountain_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::population::{Lake, initial_grid};
    use crate::schema::GridConfig;

    fn evaluator() -> FitnessEvaluator {
        FitnessEvaluator::new(FitnessConfig::default())
    }

    #[test]
    fn test_three_contiguous_terrains() {
        let grid = Grid::parse(
            "
            3333
            3113
            3223
            ",
        )
        .unwrap();
        let report = evaluator().evaluate(&grid);

        assert_eq!(report.contiguity, 150);
        assert!(report.score >= 150);
        assert_eq!(report.river_cells, 2);
        assert_eq!(report.mountain_cells, 8);
        assert_eq!(report.balance, 4);
        assert_eq!(report.score, 154);
    }

    #[test]
    fn test_fragmentation_lowers_score() {
        let whole = Grid::parse(
            "
            333333
            311113
            322113
            333333
            ",
        )
        .unwrap();
        // Same cell counts, river split in two.
        let split = Grid::parse(
            "
            333333
            311113
            321123
            333333
            ",
        )
        .unwrap();

        let eval = evaluator();
        let whole_report = eval.evaluate(&whole);
        let split_report = eval.evaluate(&split);
        assert_eq!(whole_report.balance, split_report.balance);
        assert_eq!(whole_report.regions.river, 1);
        assert_eq!(split_report.regions.river, 2);
        assert_eq!(split_report.regions.grass, 1);
        // +50 becomes -40.
        assert_eq!(whole_report.score - split_report.score, 90);
        assert!(whole_report.score - split_report.score >= 20);
    }

    #[test]
    fn test_missing_terrain_costs_nothing() {
        let grid = Grid::filled(4, 4, TerrainType::Grass);
        let report = evaluator().evaluate(&grid);
        assert_eq!(report.regions.river, 0);
        assert_eq!(report.regions.mountain, 0);
        assert_eq!(report.contiguity, 50);
        assert_eq!(report.balance, 0);
        assert_eq!(report.score, 50);
    }

    #[test]
    fn test_heavy_fragmentation_goes_negative() {
        let grid = Grid::parse(
            "
            123123
            231231
            312312
            ",
        )
        .unwrap();
        let report = evaluator().evaluate(&grid);
        // Every cell is its own region.
        assert_eq!(report.regions.grass, 6);
        assert_eq!(report.regions.river, 6);
        assert_eq!(report.regions.mountain, 6);
        assert_eq!(report.contiguity, -360);
        assert_eq!(report.score, -360 + 2 * 6);
    }

    #[test]
    fn test_initial_map_score() {
        let grid = initial_grid(
            &GridConfig::default(),
            Lake {
                top: 10,
                left: 10,
                height: 3,
                width: 4,
            },
        );
        // Three single regions plus 2 * 12 river cells.
        assert_eq!(evaluator().score(&grid), 150 + 24);
    }

    #[test]
    fn test_custom_weights() {
        let grid = Grid::parse("2233").unwrap();
        let eval = FitnessEvaluator::new(FitnessConfig {
            contiguity_bonus: 10,
            fragmentation_penalty: 1,
            balance_weight: 5,
        });
        // grass absent: 0; river 10; mountain 10; balance 5 * 2.
        assert_eq!(eval.score(&grid), 30);
    }
}
