use thiserror::Error;

use crate::cutter::Shape;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CutError {
    #[error("board has shape {found}, expected {expected} (RGBA)")]
    Shape { expected: Shape, found: Shape },
    #[error("tile has shape {found}, expected {expected}")]
    TileShape { expected: Shape, found: Shape },
    #[error("got {found} tiles, expected {expected}")]
    TileCount { expected: usize, found: usize },
}
