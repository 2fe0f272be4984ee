//! Mutation-only genetic algorithm over terrain maps.
//!
//! # Overview
//!
//! - **Population** (`population`): bordered grassland maps with a random lake
//! - **Fitness** (`fitness`): contiguity of each terrain plus river/mountain balance
//! - **Mutation** (`mutation`): probabilistic region growth from random seeds
//! - **Selection** (`selection`): roulette wheel with uniform fallback
//! - **Search** (`search`): the generational loop
//!
//! # Example
//!
//! ```rust,no_run
//! use terrain_evolve::compute::evolution::EvolutionEngine;
//! use terrain_evolve::schema::EvolutionConfig;
//!
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default()).unwrap();
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {}",
//!         progress.generation, progress.generation_best);
//! });
//!
//! println!("Best map fitness: {}", result.best.fitness);
//! ```

mod fitness;
mod mutation;
mod population;
mod search;
mod selection;

pub use fitness::FitnessEvaluator;
pub use mutation::{GrowthPlan, MutationOperator};
pub use population::{Lake, initial_grid, initialize_population};
pub use search::{Candidate, EvolutionEngine};
pub use selection::{RouletteWheel, select_parents};
