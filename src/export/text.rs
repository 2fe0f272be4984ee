//! Plain-text map reader and writer.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::compute::{Grid, GridError};
use crate::schema::TerrainType;

/// Errors reading a map file.
#[derive(Debug, thiserror::Error)]
pub enum MapFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: invalid terrain code {token:?}")]
    InvalidCode { line: usize, token: String },
    #[error("Line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Map file contains no rows")]
    Empty,
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Write `grid` as text: one line per row, codes separated by spaces.
pub fn write_map<W: Write>(grid: &Grid, writer: &mut W) -> io::Result<()> {
    for row in grid.iter_rows() {
        let mut first = true;
        for terrain in row {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{}", terrain.code())?;
            first = false;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Save `grid` to a file.
pub fn save_map<P: AsRef<Path>>(grid: &Grid, path: P) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_map(grid, &mut writer)?;
    writer.flush()
}

/// Read a map written by [`write_map`].
///
/// Codes may be separated by any whitespace. Blank lines are ignored.
pub fn read_map<R: BufRead>(reader: R) -> Result<Grid, MapFileError> {
    let mut rows: Vec<Vec<TerrainType>> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<u8>()
                    .ok()
                    .and_then(TerrainType::from_code)
                    .ok_or_else(|| MapFileError::InvalidCode {
                        line: line_no,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first()
            && row.len() != first.len()
        {
            return Err(MapFileError::RaggedRow {
                line: line_no,
                expected: first.len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(MapFileError::Empty);
    }

    Ok(Grid::from_rows(rows)?)
}

/// Load a map from a file.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<Grid, MapFileError> {
    let file = File::open(path)?;
    read_map(BufReader::new(file))
}
