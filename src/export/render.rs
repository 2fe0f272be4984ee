//! Tile-based map rendering.
//!
//! Every cell is drawn as its terrain's tile image, so a `rows x cols` map
//! becomes an image of `cols * tile_width` by `rows * tile_height` pixels.

use std::io;
use std::path::{Path, PathBuf};

use image::{ImageError, ImageReader, RgbaImage};
use log::debug;

use crate::compute::Grid;
use crate::schema::TerrainType;

/// Errors loading tiles or writing a rendered map.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to open tile {}: {source}", .path.display())]
    TileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode tile {}: {source}", .path.display())]
    TileDecode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("The {terrain} tile has no pixels")]
    EmptyTile { terrain: TerrainType },
    #[error("The {terrain} tile is {}x{}, expected {}x{}", .found.0, .found.1, .expected.0, .expected.1)]
    TileSizeMismatch {
        terrain: TerrainType,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("Failed to write map image: {0}")]
    Write(#[from] ImageError),
}

/// One tile image per terrain, all of the same size.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: [RgbaImage; 3],
}

impl TileSet {
    /// Build a tile set from tiles in [`TerrainType::ALL`] order.
    ///
    /// The grass tile fixes the tile size; the others must match it.
    pub fn new(tiles: [RgbaImage; 3]) -> Result<Self, RenderError> {
        let expected = tiles[0].dimensions();
        for (terrain, tile) in TerrainType::ALL.iter().zip(&tiles) {
            let found = tile.dimensions();
            if found.0 == 0 || found.1 == 0 {
                return Err(RenderError::EmptyTile { terrain: *terrain });
            }
            if found != expected {
                return Err(RenderError::TileSizeMismatch {
                    terrain: *terrain,
                    expected,
                    found,
                });
            }
        }
        Ok(Self { tiles })
    }

    /// Load `grass.png`, `river.png` and `mountain.png` from `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let [grass, river, mountain] =
            TerrainType::ALL.map(|terrain| dir.join(format!("{}.png", terrain)));
        Self::new([load_tile(grass)?, load_tile(river)?, load_tile(mountain)?])
    }

    /// Tile drawn for `terrain`.
    #[inline]
    pub fn tile(&self, terrain: TerrainType) -> &RgbaImage {
        &self.tiles[terrain.index()]
    }

    /// Width and height of every tile.
    pub fn tile_size(&self) -> (u32, u32) {
        self.tiles[0].dimensions()
    }
}

fn load_tile(path: PathBuf) -> Result<RgbaImage, RenderError> {
    let reader = match ImageReader::open(&path) {
        Ok(reader) => reader,
        Err(source) => return Err(RenderError::TileIo { path, source }),
    };
    match reader.decode() {
        Ok(decoded) => Ok(decoded.to_rgba8()),
        Err(source) => Err(RenderError::TileDecode { path, source }),
    }
}

/// Draw `grid` with one tile per cell; cell (row, col) lands at pixel
/// (col * tile_width, row * tile_height).
pub fn render_map(grid: &Grid, tiles: &TileSet) -> RgbaImage {
    let (tile_width, tile_height) = tiles.tile_size();
    let mut canvas = RgbaImage::new(
        grid.cols() as u32 * tile_width,
        grid.rows() as u32 * tile_height,
    );

    for (row, cells) in grid.iter_rows().enumerate() {
        for (col, &terrain) in cells.iter().enumerate() {
            copy_tile(
                tiles.tile(terrain),
                &mut canvas,
                col as u32 * tile_width,
                row as u32 * tile_height,
            );
        }
    }

    debug!(
        "Rendered {}x{} map to {}x{} image",
        grid.rows(),
        grid.cols(),
        canvas.width(),
        canvas.height()
    );
    canvas
}

/// Render `grid` and save it. The format follows the file extension.
pub fn save_rendered_map<P: AsRef<Path>>(
    grid: &Grid,
    tiles: &TileSet,
    path: P,
) -> Result<(), RenderError> {
    render_map(grid, tiles).save(path)?;
    Ok(())
}

fn copy_tile(src: &RgbaImage, dst: &mut RgbaImage, x: u32, y: u32) {
    for yy in 0..src.height() {
        for xx in 0..src.width() {
            dst.put_pixel(x + xx, y + yy, *src.get_pixel(xx, yy));
        }
    }
}
