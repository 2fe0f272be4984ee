//! Evolution configuration types for terrain map search.
//!
//! This module provides the parameters of the mutation-only genetic algorithm
//! together with the progress and result types it reports.

use serde::{Deserialize, Serialize};

use super::{GridConfig, TerrainType};
use crate::compute::Grid;

/// Top-level configuration for an evolutionary map search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Map dimensions and border thickness.
    #[serde(default)]
    pub grid: GridConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Region-growth mutation settings.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Lake placed in every initial map.
    #[serde(default)]
    pub lake: LakeConfig,
    /// Fitness weights.
    #[serde(default)]
    pub fitness: FitnessConfig,
    /// Parent selection settings.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Population size and run length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of maps per generation.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generations to run. There is no early exit.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            max_generations: default_max_generations(),
        }
    }
}

fn default_population_size() -> usize {
    20
}
fn default_max_generations() -> usize {
    30
}

/// Region-growth mutation parameters.
///
/// A probability is the chance that a visited cell of that terrain spreads
/// into its neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    #[serde(default = "default_grass_probability")]
    pub grass: f64,
    #[serde(default = "default_river_probability")]
    pub river: f64,
    #[serde(default = "default_mountain_probability")]
    pub mountain: f64,
    /// Growth passes per mutation.
    #[serde(default = "default_seeds")]
    pub seeds: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            grass: default_grass_probability(),
            river: default_river_probability(),
            mountain: default_mountain_probability(),
            seeds: default_seeds(),
        }
    }
}

impl MutationConfig {
    /// Same probability for every terrain.
    pub fn uniform(probability: f64, seeds: usize) -> Self {
        Self {
            grass: probability,
            river: probability,
            mountain: probability,
            seeds,
        }
    }

    /// Spread probability for a terrain.
    #[inline]
    pub fn probability(&self, terrain: TerrainType) -> f64 {
        match terrain {
            TerrainType::Grass => self.grass,
            TerrainType::River => self.river,
            TerrainType::Mountain => self.mountain,
        }
    }
}

fn default_grass_probability() -> f64 {
    0.3
}
fn default_river_probability() -> f64 {
    0.7
}
fn default_mountain_probability() -> f64 {
    0.5
}
fn default_seeds() -> usize {
    5
}

/// Bounds for the rectangular River lake of an initial map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LakeConfig {
    /// Smallest lake side length (inclusive).
    #[serde(default = "default_lake_min")]
    pub min_size: usize,
    /// Largest lake side length (inclusive).
    #[serde(default = "default_lake_max")]
    pub max_size: usize,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            min_size: default_lake_min(),
            max_size: default_lake_max(),
        }
    }
}

fn default_lake_min() -> usize {
    3
}
fn default_lake_max() -> usize {
    6
}

/// Fitness weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Added for each terrain that forms exactly one region.
    #[serde(default = "default_contiguity_bonus")]
    pub contiguity_bonus: i64,
    /// Subtracted per region for each fragmented terrain.
    #[serde(default = "default_fragmentation_penalty")]
    pub fragmentation_penalty: i64,
    /// Multiplier on min(river cells, mountain cells).
    #[serde(default = "default_balance_weight")]
    pub balance_weight: i64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            contiguity_bonus: default_contiguity_bonus(),
            fragmentation_penalty: default_fragmentation_penalty(),
            balance_weight: default_balance_weight(),
        }
    }
}

fn default_contiguity_bonus() -> i64 {
    50
}
fn default_fragmentation_penalty() -> i64 {
    20
}
fn default_balance_weight() -> i64 {
    2
}

/// Roulette-wheel selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// How fitness scores become wheel weights.
    #[serde(default)]
    pub scaling: ScoreScaling,
}

/// Mapping from signed fitness scores to non-negative wheel weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreScaling {
    /// Negative scores weigh zero; non-negative scores are used as-is.
    #[default]
    Clamp,
    /// Every score is shifted by the population minimum.
    Shift,
}

// ============================================================================
// Fitness reports
// ============================================================================

/// Region counts per terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionCounts {
    pub grass: usize,
    pub river: usize,
    pub mountain: usize,
}

impl RegionCounts {
    /// Regions of one terrain.
    pub fn get(&self, terrain: TerrainType) -> usize {
        match terrain {
            TerrainType::Grass => self.grass,
            TerrainType::River => self.river,
            TerrainType::Mountain => self.mountain,
        }
    }

    /// Set the region count of one terrain.
    pub fn set(&mut self, terrain: TerrainType, count: usize) {
        match terrain {
            TerrainType::Grass => self.grass = count,
            TerrainType::River => self.river = count,
            TerrainType::Mountain => self.mountain = count,
        }
    }
}

/// Breakdown of a fitness evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessReport {
    /// Final score.
    pub score: i64,
    /// Connected regions per terrain.
    pub regions: RegionCounts,
    /// Contribution of the contiguity term.
    pub contiguity: i64,
    /// Contribution of the river/mountain balance term.
    pub balance: i64,
    /// River cell count.
    pub river_cells: usize,
    /// Mountain cell count.
    pub mountain_cells: usize,
}

// ============================================================================
// Progress and Result Types
// ============================================================================

/// Progress update emitted once per generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Current generation number (1-based).
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Best fitness this generation.
    pub generation_best: i64,
    /// Best fitness seen so far.
    pub best_fitness: i64,
    /// Average fitness of current population.
    pub avg_fitness: f64,
    /// Current phase of the algorithm.
    pub phase: EvolutionPhase,
    /// Statistics history.
    pub history: EvolutionHistory,
}

/// Snapshot of a candidate for reporting and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// Unique identifier.
    pub id: u64,
    /// Fitness score.
    pub fitness: i64,
    /// Fitness breakdown.
    pub report: FitnessReport,
    /// Generation this candidate was created.
    pub generation: usize,
    /// Parent ID, absent for the initial population.
    pub parent: Option<u64>,
    /// The map.
    pub grid: Grid,
}

/// Evolution history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<i64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Standard deviation per generation.
    pub fitness_std: Vec<f64>,
}

/// Current phase of evolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the initial population.
    #[default]
    Initializing,
    /// Scoring candidates.
    Evaluating,
    /// Drawing parents.
    Selecting,
    /// Producing children.
    Mutating,
    /// Generation limit reached.
    Terminated,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best candidate of the final evaluated generation.
    pub best: CandidateSnapshot,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Total evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness seen in any evaluated generation.
    pub best_fitness: i64,
    /// Best fitness of the final population.
    pub final_best_fitness: i64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be at least 1")]
    EmptyPopulation,
    #[error("Mutation probability for {terrain} must be within [0, 1], got {value}")]
    InvalidProbability { terrain: TerrainType, value: f64 },
    #[error("Mutation must use at least one growth seed")]
    NoSeeds,
    #[error("Invalid lake bounds: {0}")]
    InvalidLake(String),
    #[error("Grid config validation failed: {0}")]
    GridConfigError(#[from] super::ConfigError),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        self.grid.validate()?;

        if self.population.size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }

        for terrain in TerrainType::ALL {
            let value = self.mutation.probability(terrain);
            if !(0.0..=1.0).contains(&value) {
                return Err(EvolutionConfigError::InvalidProbability { terrain, value });
            }
        }

        if self.mutation.seeds == 0 {
            return Err(EvolutionConfigError::NoSeeds);
        }

        if self.lake.min_size == 0 {
            return Err(EvolutionConfigError::InvalidLake(
                "min_size must be non-zero".to_string(),
            ));
        }
        if self.lake.min_size > self.lake.max_size {
            return Err(EvolutionConfigError::InvalidLake(format!(
                "min_size ({}) > max_size ({})",
                self.lake.min_size, self.lake.max_size
            )));
        }

        Ok(())
    }
}
