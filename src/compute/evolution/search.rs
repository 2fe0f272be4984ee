//! Generational loop of the mutation-only genetic algorithm.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::compute::Grid;
use crate::schema::{
    CandidateSnapshot, EvolutionConfig, EvolutionConfigError, EvolutionHistory, EvolutionPhase,
    EvolutionProgress, EvolutionResult, EvolutionStats, FitnessReport,
};

use super::fitness::FitnessEvaluator;
use super::mutation::MutationOperator;
use super::population::initialize_population;
use super::selection::select_parents;

/// A map in the population.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Unique identifier.
    pub id: u64,
    /// The map.
    pub grid: Grid,
    /// Fitness score.
    pub fitness: i64,
    /// Fitness breakdown.
    pub report: FitnessReport,
    /// Generation created.
    pub generation: usize,
    /// Parent ID.
    pub parent: Option<u64>,
}

impl Candidate {
    /// Convert to snapshot for serialization.
    pub fn to_snapshot(&self) -> CandidateSnapshot {
        CandidateSnapshot {
            id: self.id,
            fitness: self.fitness,
            report: self.report.clone(),
            generation: self.generation,
            parent: self.parent,
            grid: self.grid.clone(),
        }
    }
}

/// Evolution engine that runs the search.
///
/// Every random draw (initial lakes, parent selection, mutation) comes from
/// the engine's `rng`, so a seeded source reproduces a run.
pub struct EvolutionEngine<R: Rng = StdRng> {
    config: EvolutionConfig,
    rng: R,
    evaluator: FitnessEvaluator,
    mutator: MutationOperator,
    population: Vec<Candidate>,
    history: EvolutionHistory,
    generation: usize,
    best_fitness: i64,
    phase: EvolutionPhase,
    next_id: u64,
}

impl EvolutionEngine<StdRng> {
    /// Create a new evolution engine, seeded from `config.random_seed` or
    /// from entropy.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionConfigError> {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> EvolutionEngine<R> {
    /// Create an engine drawing from the given randomness source.
    pub fn with_rng(config: EvolutionConfig, rng: R) -> Result<Self, EvolutionConfigError> {
        config.validate()?;

        let evaluator = FitnessEvaluator::new(config.fitness.clone());
        let mutator = MutationOperator::new(config.mutation.clone());

        Ok(Self {
            config,
            rng,
            evaluator,
            mutator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            best_fitness: i64::MIN,
            phase: EvolutionPhase::Initializing,
            next_id: 0,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population.
    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    /// Current phase.
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build the starting population.
    pub fn initialize(&mut self) {
        self.phase = EvolutionPhase::Initializing;
        self.population.clear();
        self.history = EvolutionHistory::default();
        self.generation = 0;
        self.best_fitness = i64::MIN;

        let grids = initialize_population(&self.config, &mut self.rng);
        for grid in grids {
            let id = self.next_id();
            self.population.push(Candidate {
                id,
                grid,
                fitness: 0,
                report: FitnessReport::default(),
                generation: 0,
                parent: None,
            });
        }

        debug!(
            "Initialized {} maps of {}x{}",
            self.population.len(),
            self.config.grid.rows,
            self.config.grid.cols
        );
    }

    /// Score every candidate in parallel.
    pub fn evaluate_population(&mut self) {
        self.phase = EvolutionPhase::Evaluating;
        let evaluator = &self.evaluator;

        self.population.par_iter_mut().for_each(|candidate| {
            let report = evaluator.evaluate(&candidate.grid);
            candidate.fitness = report.score;
            candidate.report = report;
        });

        if let Some(best) = self.population.iter().map(|c| c.fitness).max() {
            self.best_fitness = self.best_fitness.max(best);
        }
    }

    /// Draw parent indices for the next generation.
    fn select(&mut self) -> Vec<usize> {
        self.phase = EvolutionPhase::Selecting;
        let scores: Vec<i64> = self.population.iter().map(|c| c.fitness).collect();
        select_parents(
            &scores,
            self.config.population.size,
            self.config.selection.scaling,
            &mut self.rng,
        )
    }

    /// Replace the population with mutated children of `parents`.
    fn reproduce(&mut self, parents: &[usize]) {
        self.phase = EvolutionPhase::Mutating;
        let mut next_gen = Vec::with_capacity(parents.len());

        for &idx in parents {
            let parent = &self.population[idx];
            let grid = self.mutator.mutate(&parent.grid, &mut self.rng);
            let parent_id = parent.id;
            let id = self.next_id();

            next_gen.push(Candidate {
                id,
                grid,
                fitness: 0,
                report: FitnessReport::default(),
                generation: self.generation + 1,
                parent: Some(parent_id),
            });
        }

        self.population = next_gen;
    }

    /// Evaluate, select and mutate once.
    pub fn step_generation(&mut self) -> EvolutionProgress {
        self.evaluate_population();
        self.record_history();
        let progress = self.progress();
        info!(
            "Generation {}: best fitness = {}",
            progress.generation, progress.generation_best
        );

        let parents = self.select();
        self.reproduce(&parents);
        self.generation += 1;

        progress
    }

    fn record_history(&mut self) {
        let (avg, std) = fitness_moments(&self.population);
        self.history.best_fitness.push(self.generation_best());
        self.history.avg_fitness.push(avg);
        self.history.fitness_std.push(std);
    }

    fn generation_best(&self) -> i64 {
        self.population
            .iter()
            .map(|c| c.fitness)
            .max()
            .unwrap_or(i64::MIN)
    }

    /// Index of the best candidate; the first one on ties.
    fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, candidate) in self.population.iter().enumerate() {
            match best {
                Some(b) if self.population[b].fitness >= candidate.fitness => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Progress of the currently evaluated generation.
    pub fn progress(&self) -> EvolutionProgress {
        let (avg_fitness, _) = fitness_moments(&self.population);
        EvolutionProgress {
            generation: self.generation + 1,
            total_generations: self.config.population.max_generations,
            generation_best: self.generation_best(),
            best_fitness: self.best_fitness,
            avg_fitness,
            phase: self.phase,
            history: self.history.clone(),
        }
    }

    /// Run evolution with progress callback.
    ///
    /// Runs exactly `population.max_generations` generations, then evaluates
    /// the final population and returns its best map.
    pub fn run_with_callback<F>(&mut self, callback: F) -> EvolutionResult
    where
        F: Fn(&EvolutionProgress),
    {
        let start_time = std::time::Instant::now();

        self.initialize();

        for _ in 0..self.config.population.max_generations {
            let progress = self.step_generation();
            callback(&progress);
        }

        self.evaluate_population();
        self.phase = EvolutionPhase::Terminated;

        let elapsed = start_time.elapsed().as_secs_f64();
        let total_evaluations = (self.generation + 1) as u64 * self.population.len() as u64;

        // Validation guarantees a non-empty population.
        let best = self
            .best_index()
            .map(|i| self.population[i].to_snapshot())
            .expect("population is never empty");
        let (final_avg_fitness, _) = fitness_moments(&self.population);

        info!(
            "Finished {} generations: final best fitness = {}",
            self.generation, best.fitness
        );

        EvolutionResult {
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations,
                best_fitness: self.best_fitness,
                final_best_fitness: best.fitness,
                final_avg_fitness,
                elapsed_seconds: elapsed,
                evaluations_per_second: total_evaluations as f64 / elapsed.max(1e-9),
            },
            best,
            history: self.history.clone(),
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}

/// Mean and standard deviation of the population's fitness.
fn fitness_moments(population: &[Candidate]) -> (f64, f64) {
    if population.is_empty() {
        return (0.0, 0.0);
    }
    let n = population.len() as f64;
    let mean = population.iter().map(|c| c.fitness as f64).sum::<f64>() / n;
    let variance = population
        .iter()
        .map(|c| (c.fitness as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::population::{Lake, initial_grid};
    use crate::schema::{MutationConfig, PopulationConfig, TerrainType};
    use rand::RngCore;
    use rand::rngs::mock::StepRng;
    use std::cell::RefCell;

    /// Replays a fixed list of raw draws.
    struct ScriptedRng(std::vec::IntoIter<u64>);

    impl ScriptedRng {
        fn new(draws: &[u64]) -> Self {
            Self(draws.to_vec().into_iter())
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0.next().expect("script ran out of draws")
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand_core::impls::fill_bytes_via_next(self, dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn small_config(size: usize, generations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population: PopulationConfig {
                size,
                max_generations: generations,
            },
            random_seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let mut engine = EvolutionEngine::new(small_config(10, 5)).unwrap();
        assert_eq!(engine.phase(), EvolutionPhase::Initializing);
        engine.initialize();
        assert_eq!(engine.population().len(), 10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config(10, 5);
        config.grid.cols = 3;
        assert!(matches!(
            EvolutionEngine::new(config),
            Err(EvolutionConfigError::GridConfigError(_))
        ));
    }

    #[test]
    fn test_evolution_run() {
        let mut engine = EvolutionEngine::new(small_config(8, 4)).unwrap();
        let lines = RefCell::new(Vec::new());
        let result = engine.run_with_callback(|p| lines.borrow_mut().push(p.generation));

        assert_eq!(*lines.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(result.stats.generations, 4);
        assert_eq!(result.stats.total_evaluations, 5 * 8);
        assert_eq!(result.history.best_fitness.len(), 4);
        assert_eq!(engine.phase(), EvolutionPhase::Terminated);
        assert_eq!(result.best.grid.rows(), 30);
        assert_eq!(result.best.grid.cols(), 40);
        assert!(result.stats.best_fitness >= result.stats.final_best_fitness);

        // Returned map is the best of the final population.
        let max = engine.population().iter().map(|c| c.fitness).max().unwrap();
        assert_eq!(result.best.fitness, max);
        assert_eq!(FitnessEvaluator::default().score(&result.best.grid), max);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let a = EvolutionEngine::new(small_config(6, 3)).unwrap().run();
        let b = EvolutionEngine::new(small_config(6, 3)).unwrap().run();
        assert_eq!(a.best.grid, b.best.grid);
        assert_eq!(a.history.best_fitness, b.history.best_fitness);
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let mut engine = EvolutionEngine::new(small_config(5, 0)).unwrap();
        let result = engine.run();
        assert_eq!(result.stats.generations, 0);
        assert!(result.history.best_fitness.is_empty());
        assert_eq!(result.best.generation, 0);
        assert_eq!(result.best.parent, None);
    }

    #[test]
    fn test_children_record_parents() {
        let mut engine = EvolutionEngine::new(small_config(4, 1)).unwrap();
        engine.initialize();
        let parent_ids: Vec<u64> = engine.population().iter().map(|c| c.id).collect();
        engine.step_generation();

        assert_eq!(engine.generation(), 1);
        for child in engine.population() {
            assert_eq!(child.generation, 1);
            assert!(parent_ids.contains(&child.parent.unwrap()));
            assert!(!parent_ids.contains(&child.id));
        }
    }

    #[test]
    fn test_mocked_randomness_one_generation() {
        // With every draw zero, each map gets a 3x3 lake at the origin, the
        // wheel always picks the first map, and every growth pass starts at
        // the origin where every roll succeeds. Each visited cell restores
        // its own terrain, so the child equals its parent.
        //
        // Score by hand: grass, river and mountain each form one region
        // (+150); the lake covers 8 border cells and 1 interior cell, so
        // there are 9 river cells and 264 - 8 = 256 mountain cells
        // (+2 * 9). Total 168.
        let config = EvolutionConfig {
            population: PopulationConfig {
                size: 20,
                max_generations: 1,
            },
            ..Default::default()
        };
        let mut engine = EvolutionEngine::with_rng(config.clone(), StepRng::new(0, 0)).unwrap();
        let generation_bests = RefCell::new(Vec::new());
        let result =
            engine.run_with_callback(|p| generation_bests.borrow_mut().push(p.generation_best));

        let expected = initial_grid(
            &config.grid,
            Lake {
                top: 0,
                left: 0,
                height: 3,
                width: 3,
            },
        );
        assert_eq!(result.best.grid, expected);
        assert_eq!(result.best.grid.count(TerrainType::River), 9);
        assert_eq!(result.best.grid.count(TerrainType::Mountain), 256);
        assert_eq!(result.best.grid.count(TerrainType::Grass), 935);
        assert_eq!(*generation_bests.borrow(), vec![168]);
        assert_eq!(result.best.fitness, 168);
        assert_eq!(result.best.report.balance, 18);
        assert_eq!(result.best.report.contiguity, 150);
        // Every child descends from the first map.
        assert!(engine.population().iter().all(|c| c.parent == Some(0)));
        assert_eq!(result.best.id, 20);
    }

    #[test]
    fn test_scripted_randomness_paints_child() {
        // 5x5 map, 1-cell border, 1x1 lake. A raw draw of 0 gives the low
        // end of any range and a roll of 0.0 (spread); u64::MAX gives a roll
        // just below 1.0 (no spread).
        const PASS: u64 = 0;
        const FAIL: u64 = u64::MAX;
        let draws = [
            // Lake: height, width, top, left -> River at (0, 0).
            0, 0, 0, 0, //
            // Roulette spin over the single map.
            0, //
            // Growth seed row and column -> (0, 0).
            0, 0, //
            // Pops: (0,0) river spreads and paints (1,0) and (0,1) river;
            // (0,1) fails; (1,0) spreads mountain onto (2,0) and (1,1);
            // (1,1) and (2,0) fail.
            PASS, FAIL, PASS, FAIL, FAIL,
        ];
        let config = EvolutionConfig {
            grid: crate::schema::GridConfig {
                rows: 5,
                cols: 5,
                border: 1,
            },
            population: PopulationConfig {
                size: 1,
                max_generations: 1,
            },
            mutation: MutationConfig {
                seeds: 1,
                ..Default::default()
            },
            lake: crate::schema::LakeConfig {
                min_size: 1,
                max_size: 1,
            },
            ..Default::default()
        };
        let mut engine = EvolutionEngine::with_rng(config, ScriptedRng::new(&draws)).unwrap();
        let generation_bests = RefCell::new(Vec::new());
        let result =
            engine.run_with_callback(|p| generation_bests.borrow_mut().push(p.generation_best));

        // Initial map: three single regions plus 2 * min(1, 15).
        assert_eq!(*generation_bests.borrow(), vec![152]);

        let expected = Grid::parse(
            "
            22333
            33113
            31113
            31113
            33333
            ",
        )
        .unwrap();
        assert_eq!(result.best.grid, expected);
        assert_eq!(result.best.id, 1);
        assert_eq!(result.best.parent, Some(0));
        assert_eq!(result.best.report.regions.river, 1);
        assert_eq!(result.best.report.regions.mountain, 1);
        assert_eq!(result.best.report.river_cells, 2);
        assert_eq!(result.best.report.mountain_cells, 15);
        // Three single regions plus 2 * min(2, 15).
        assert_eq!(result.best.fitness, 154);
        assert_eq!(result.stats.best_fitness, 154);
    }

    #[test]
    fn test_selection_pressure_direction() {
        // Starting from contiguous maps keeps the best score at least as
        // high as starting from fragmented ones.
        let contiguous = initial_grid(
            &crate::schema::GridConfig::default(),
            Lake {
                top: 10,
                left: 10,
                height: 6,
                width: 6,
            },
        );
        let mut fragmented = contiguous.clone();
        for row in (3..27).step_by(3) {
            for col in (3..37).step_by(3) {
                fragmented.set(row, col, TerrainType::River);
            }
        }

        let run_from = |seed_grid: &Grid| {
            let mut engine = EvolutionEngine::new(small_config(10, 5)).unwrap();
            engine.initialize();
            for candidate in &mut engine.population {
                candidate.grid = seed_grid.clone();
            }
            for _ in 0..5 {
                engine.step_generation();
            }
            engine.evaluate_population();
            engine.best_fitness
        };

        let evaluator = FitnessEvaluator::default();
        assert!(evaluator.score(&contiguous) > evaluator.score(&fragmented));
        assert!(run_from(&contiguous) >= run_from(&fragmented));
    }

    #[test]
    fn test_frozen_mutation_keeps_population() {
        let mut config = small_config(6, 3);
        config.mutation = MutationConfig::uniform(0.0, 5);
        let mut engine = EvolutionEngine::new(config).unwrap();
        engine.initialize();
        let initial: Vec<Grid> = engine.population().iter().map(|c| c.grid.clone()).collect();

        for _ in 0..3 {
            engine.step_generation();
        }
        for candidate in engine.population() {
            assert!(initial.contains(&candidate.grid));
        }
    }
}
