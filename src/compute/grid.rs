//! Fixed-size terrain grid.

use serde::{Deserialize, Serialize};

use crate::schema::{TerrainType, UnknownTerrainCode};

/// Row and column offsets of the 4-connected neighbors: up, down, left, right.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A `rows x cols` map of terrain tiles.
///
/// Cells are stored row-major: index = row * cols + col. Serializes as
/// rows of integer terrain codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<TerrainType>>", try_from = "Vec<Vec<TerrainType>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<TerrainType>,
}

impl Grid {
    /// Create a grid with every cell set to `terrain`.
    pub fn filled(rows: usize, cols: usize, terrain: TerrainType) -> Self {
        Self {
            rows,
            cols,
            cells: vec![terrain; rows * cols],
        }
    }

    /// Build a grid from rows of terrain.
    pub fn from_rows(rows: Vec<Vec<TerrainType>>) -> Result<Self, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        let height = rows.len();
        let mut cells = Vec::with_capacity(height * cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(GridError::RaggedRow {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self {
            rows: height,
            cols,
            cells,
        })
    }

    /// Build a grid from rows of integer terrain codes.
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| TerrainType::try_from(code))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Parse a grid from compact text: one line per row, one digit per cell.
    ///
    /// Whitespace inside a line is ignored and blank lines are skipped, so
    /// tests can lay grids out visually.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| {
                        let code = c.to_digit(10).map_or(u8::MAX, |d| d as u8);
                        TerrainType::try_from(code)
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (row, col) to flat index.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Convert a flat index back to (row, col).
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.cols, idx % self.cols)
    }

    /// Terrain at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> TerrainType {
        self.cells[self.idx(row, col)]
    }

    /// Set terrain at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, terrain: TerrainType) {
        let idx = self.idx(row, col);
        self.cells[idx] = terrain;
    }

    /// Row-major cell slice.
    #[inline]
    pub fn cells(&self) -> &[TerrainType] {
        &self.cells
    }

    /// Mutable row-major cell slice.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [TerrainType] {
        &mut self.cells
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[TerrainType]> {
        // chunks_exact panics on zero; an empty grid has no rows anyway.
        self.cells.chunks_exact(self.cols.max(1))
    }

    /// Flat index of a signed coordinate, `None` when outside the grid.
    #[inline]
    fn checked_idx(&self, row: isize, col: isize) -> Option<usize> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then(|| self.idx(row, col))
    }

    /// Flat indices of the in-bounds 4-connected neighbors of `idx`,
    /// in up, down, left, right order.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let (row, col) = self.coords(idx);
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            self.checked_idx(row as isize + dr, col as isize + dc)
        })
    }

    /// Number of cells holding `terrain`.
    pub fn count(&self, terrain: TerrainType) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    /// Paint `thickness` rings of `terrain` around the edge.
    pub fn paint_border(&mut self, thickness: usize, terrain: TerrainType) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let edge = row
                    .min(col)
                    .min(self.rows - 1 - row)
                    .min(self.cols - 1 - col);
                if edge < thickness {
                    self.set(row, col, terrain);
                }
            }
        }
    }

    /// Paint a rectangle of `terrain` with its top-left corner at
    /// (top, left). Cells outside the grid are skipped.
    pub fn paint_rect(
        &mut self,
        top: isize,
        left: isize,
        height: usize,
        width: usize,
        terrain: TerrainType,
    ) {
        for row in top..top + height as isize {
            for col in left..left + width as isize {
                if let Some(idx) = self.checked_idx(row, col) {
                    self.cells[idx] = terrain;
                }
            }
        }
    }

    /// Rows of integer terrain codes.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.iter_rows()
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }
}

impl From<Grid> for Vec<Vec<TerrainType>> {
    fn from(grid: Grid) -> Self {
        grid.iter_rows().map(<[TerrainType]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<TerrainType>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<TerrainType>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

/// Errors building a grid from external data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    UnknownCode(#[from] UnknownTerrainCode),
}
