//! Schema module - Configuration, terrain and report types for map evolution.

mod config;
mod evolution;
mod terrain;

pub use config::*;
pub use evolution::*;
pub use terrain::*;
