//! Configuration types for map dimensions.

use serde::{Deserialize, Serialize};

fn default_border() -> usize {
    2
}

/// Map grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Thickness of the Mountain border painted on every side.
    #[serde(default = "default_border")]
    pub border: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 40,
            border: default_border(),
        }
    }
}

impl GridConfig {
    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate configuration parameters.
    ///
    /// Each axis must leave at least one interior cell inside the border.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.border == 0 {
            return Err(ConfigError::InvalidBorder);
        }
        let min = 2 * self.border;
        if self.rows <= min || self.cols <= min {
            return Err(ConfigError::GridTooSmall {
                rows: self.rows,
                cols: self.cols,
                border: self.border,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid {rows}x{cols} is too small for a border of thickness {border}")]
    GridTooSmall {
        rows: usize,
        cols: usize,
        border: usize,
    },
    #[error("Border thickness must be non-zero")]
    InvalidBorder,
}
