//! Map export for evolved terrain.
//!
//! # File Format
//!
//! Maps are stored as plain text, one grid row per line, terrain codes
//! separated by single spaces:
//!
//! ```text
//! 3 3 3 3 3
//! 3 1 1 2 3
//! 3 3 3 3 3
//! ```
//!
//! Codes: 1 = grass, 2 = river, 3 = mountain.
//!
//! # Images
//!
//! [`render_map`] draws a map with one tile image per cell. Tiles are read
//! from a directory holding `grass.png`, `river.png` and `mountain.png`.

mod render;
mod text;

pub use render::*;
pub use text::*;
