//! Labeled chess square images for training a piece classifier.
//!
//! Board images are cut into cached empty squares, then piece sprites are
//! composited onto randomly drawn squares. One seeded generator drives all
//! draws, so a run is reproducible byte for byte.

pub mod composite;
pub mod config;
pub mod error;
pub mod generator;
pub mod io;
pub mod labels;
pub mod pipeline;
pub mod record;
pub mod styles;

pub use composite::{AlphaMode, composite};
pub use config::GenCfg;
pub use error::GenError;
pub use generator::{DatasetGenerator, Draw, LabelCounts, draw_item};
pub use labels::{Label, Piece, PieceKind, Side};
pub use pipeline::{Pipeline, build_square_cache};
pub use styles::{Mode, StylePools};
