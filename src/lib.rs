//! Terrain Evolve - Evolving grass/river/mountain maps with a genetic algorithm.
//!
//! Maps are rectangular grids of terrain cells. A population of maps, each
//! starting as grassland inside a mountain border with one random lake, is
//! improved by fitness-proportionate selection and region-growth mutation.
//! The fitness rewards a single connected region per terrain and a good
//! balance of river and mountain.
//!
//! # Architecture
//!
//! - `schema`: Terrain types, configuration and result records
//! - `compute`: Grid, region counting and the evolutionary search
//! - `export`: Plain-text map files and tile-image rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use terrain_evolve::{EvolutionConfig, EvolutionEngine, export};
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let mut engine = EvolutionEngine::new(config).unwrap();
//! let result = engine.run();
//!
//! println!("Best fitness: {}", result.best.fitness);
//! export::save_map(&result.best.grid, "map1.txt").unwrap();
//! ```

pub mod compute;
pub mod export;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, FitnessEvaluator, MutationOperator};
pub use compute::{Grid, RegionCounter, count_regions};
pub use schema::{EvolutionConfig, EvolutionResult, FitnessReport, TerrainType};
