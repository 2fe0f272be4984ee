//! Region-growth mutation.
//!
//! A mutation runs several growth passes from random seed cells. Each pass
//! walks the map with an explicit stack; a visited cell whose spread roll
//! succeeds keeps its own terrain and paints that terrain onto every
//! unvisited neighbor before the neighbor is processed. Neighbors whose own
//! roll later fails keep the painted terrain, which is how regions grow.
//!
//! The walk only reads the parent. Terrain assignments are collected in a
//! [`GrowthPlan`] and written onto a copy of the parent afterwards.

use rand::Rng;

use crate::compute::Grid;
use crate::schema::{MutationConfig, TerrainType};

/// Produces children from parents by region growth.
#[derive(Debug, Clone, Default)]
pub struct MutationOperator {
    config: MutationConfig,
}

impl MutationOperator {
    /// Create a new mutation operator.
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    /// The operator's parameters.
    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Produce a child map. The parent is left untouched.
    pub fn mutate<R: Rng + ?Sized>(&self, parent: &Grid, rng: &mut R) -> Grid {
        self.plan(parent, rng).apply(parent)
    }

    /// Run every growth pass and return the resulting assignments.
    ///
    /// All passes share one visited map, so a later pass cannot spread into
    /// cells an earlier pass already claimed.
    pub fn plan<R: Rng + ?Sized>(&self, parent: &Grid, rng: &mut R) -> GrowthPlan {
        let mut plan = GrowthPlan::new(parent.len());
        if parent.is_empty() {
            return plan;
        }

        for _ in 0..self.config.seeds {
            let row = rng.gen_range(0..parent.rows());
            let col = rng.gen_range(0..parent.cols());
            self.grow(parent, parent.idx(row, col), &mut plan, rng);
        }

        plan
    }

    /// One growth pass from `seed`.
    pub(crate) fn grow<R: Rng + ?Sized>(
        &self,
        parent: &Grid,
        seed: usize,
        plan: &mut GrowthPlan,
        rng: &mut R,
    ) {
        let cells = parent.cells();
        plan.stack.push(seed);

        while let Some(idx) = plan.stack.pop() {
            // Marked on pop: a cell pushed by several neighbors is rolled
            // once per push.
            plan.visited[idx] = true;
            let terrain = cells[idx];

            if rng.r#gen::<f64>() < self.config.probability(terrain) {
                plan.assignments[idx] = Some(terrain);

                for next in parent.neighbors(idx) {
                    if !plan.visited[next] {
                        plan.assignments[next] = Some(terrain);
                        plan.stack.push(next);
                    }
                }
            }
        }
    }
}

/// Terrain assignments decided by the growth passes of one mutation.
#[derive(Debug, Clone)]
pub struct GrowthPlan {
    /// Last terrain written to each cell, if any.
    assignments: Vec<Option<TerrainType>>,
    /// Cells popped by any pass.
    visited: Vec<bool>,
    stack: Vec<usize>,
}

impl GrowthPlan {
    fn new(len: usize) -> Self {
        Self {
            assignments: vec![None; len],
            visited: vec![false; len],
            stack: Vec::new(),
        }
    }

    /// Number of cells visited by any pass.
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    /// Whether the cell at `idx` was visited.
    pub fn is_visited(&self, idx: usize) -> bool {
        self.visited[idx]
    }

    /// Terrain assigned to the cell at `idx`, if any.
    pub fn assignment(&self, idx: usize) -> Option<TerrainType> {
        self.assignments[idx]
    }

    /// Copy `parent` and write the assignments onto the copy.
    pub fn apply(&self, parent: &Grid) -> Grid {
        let mut child = parent.clone();
        for (cell, assigned) in child.cells_mut().iter_mut().zip(&self.assignments) {
            if let Some(terrain) = assigned {
                *cell = *terrain;
            }
        }
        child
    }
}
