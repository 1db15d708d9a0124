//! Cutting fixed-size board rasters into an ordered grid of square tiles.
//!
//! Tiles are enumerated row-major: `index = row * N + col`, both counted
//! from the top-left corner of the board.

pub mod cutter;
pub mod error;

pub use cutter::{ChessBoardCutter, GridCutter, RGBA_CHANNELS, Shape};
pub use error::CutError;
