//! Compute module - Grid operations and the evolutionary search.

mod grid;
mod regions;

pub mod evolution;

pub use grid::*;
pub use regions::*;
