use std::fmt;

use image::{DynamicImage, RgbaImage, imageops};
use log::debug;

use crate::error::CutError;

pub const RGBA_CHANNELS: usize = 4;

/// Pixel dimensions plus channel count of a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl Shape {
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    pub fn rgba(width: u32, height: u32) -> Self {
        Self::new(width, height, RGBA_CHANNELS)
    }

    fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Splits a `SIDE`×`SIDE` RGBA board into an `N`×`N` grid of tiles.
///
/// `SIDE` must be a multiple of `N`. The cutter holds no state; it exists
/// to carry the geometry in its type.
pub struct GridCutter<const SIDE: u32, const N: u32>;

/// 400×400 board, 8×8 squares of 50×50 pixels.
pub type ChessBoardCutter = GridCutter<400, 8>;

impl<const SIDE: u32, const N: u32> GridCutter<SIDE, N> {
    /// Side of one tile in pixels.
    pub const TILE: u32 = SIDE / N;
    /// Number of tiles produced per board.
    pub const TILE_COUNT: usize = (N * N) as usize;

    pub fn board_shape() -> Shape {
        Shape::rgba(SIDE, SIDE)
    }

    pub fn tile_shape() -> Shape {
        Shape::rgba(Self::TILE, Self::TILE)
    }

    pub fn tile_index(row: u32, col: u32) -> usize {
        debug_assert!(row < N && col < N);
        (row * N + col) as usize
    }

    /// Top-left pixel `(x, y)` of the tile at `index`.
    pub fn tile_origin(index: usize) -> (u32, u32) {
        debug_assert!(index < Self::TILE_COUNT);
        let i = index as u32;
        ((i % N) * Self::TILE, (i / N) * Self::TILE)
    }

    /// Converts any decoded image to RGBA and splits it.
    pub fn split(board: &DynamicImage) -> Result<Vec<RgbaImage>, CutError> {
        Self::split_rgba(&board.to_rgba8())
    }

    pub fn split_rgba(board: &RgbaImage) -> Result<Vec<RgbaImage>, CutError> {
        let found = Shape::rgba(board.width(), board.height());
        Self::check_board(found)?;
        Ok(Self::cut(board))
    }

    /// Splits a tightly packed interleaved buffer of `channels` bytes per pixel.
    pub fn split_raw(
        width: u32,
        height: u32,
        channels: usize,
        data: &[u8],
    ) -> Result<Vec<RgbaImage>, CutError> {
        let found = Shape::new(width, height, channels);
        Self::check_board(found)?;
        if data.len() != found.byte_len() {
            return Err(CutError::Shape {
                expected: Self::board_shape(),
                found,
            });
        }

        let board = RgbaImage::from_raw(width, height, data.to_vec()).ok_or(CutError::Shape {
            expected: Self::board_shape(),
            found,
        })?;
        Ok(Self::cut(&board))
    }

    /// Inverse of [`split_rgba`](Self::split_rgba).
    pub fn assemble(tiles: &[RgbaImage]) -> Result<RgbaImage, CutError> {
        if tiles.len() != Self::TILE_COUNT {
            return Err(CutError::TileCount {
                expected: Self::TILE_COUNT,
                found: tiles.len(),
            });
        }

        let mut board = RgbaImage::new(SIDE, SIDE);
        for (i, tile) in tiles.iter().enumerate() {
            let found = Shape::rgba(tile.width(), tile.height());
            if found != Self::tile_shape() {
                return Err(CutError::TileShape {
                    expected: Self::tile_shape(),
                    found,
                });
            }
            let (x, y) = Self::tile_origin(i);
            imageops::replace(&mut board, tile, x as i64, y as i64);
        }
        Ok(board)
    }

    fn check_board(found: Shape) -> Result<(), CutError> {
        debug_assert_eq!(SIDE % N, 0);
        if found != Self::board_shape() {
            return Err(CutError::Shape {
                expected: Self::board_shape(),
                found,
            });
        }
        Ok(())
    }

    // Row bands top to bottom, tiles left to right inside each band.
    fn cut(board: &RgbaImage) -> Vec<RgbaImage> {
        let tiles: Vec<RgbaImage> = (0..N)
            .flat_map(|row| (0..N).map(move |col| (row, col)))
            .map(|(row, col)| {
                imageops::crop_imm(
                    board,
                    col * Self::TILE,
                    row * Self::TILE,
                    Self::TILE,
                    Self::TILE,
                )
                .to_image()
            })
            .collect();
        debug!("cut {}x{} board into {} tiles", SIDE, SIDE, tiles.len());
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    type Tiny = GridCutter<4, 2>;

    #[test]
    fn chess_geometry() {
        assert_eq!(ChessBoardCutter::TILE, 50);
        assert_eq!(ChessBoardCutter::TILE_COUNT, 64);
        assert_eq!(ChessBoardCutter::tile_index(0, 4), 4);
        assert_eq!(ChessBoardCutter::tile_index(7, 7), 63);
        assert_eq!(ChessBoardCutter::tile_origin(4), (200, 0));
        assert_eq!(ChessBoardCutter::tile_origin(9), (50, 50));
    }

    #[test]
    fn tiles_come_out_row_major() {
        // each 2x2 quadrant painted with its own index
        let board = RgbaImage::from_fn(4, 4, |x, y| {
            let idx = (y / 2) * 2 + x / 2;
            Rgba([idx as u8, 0, 0, 255])
        });

        let tiles = Tiny::split_rgba(&board).unwrap();
        assert_eq!(tiles.len(), 4);
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.dimensions(), (2, 2));
            assert!(tile.pixels().all(|p| p.0[0] == i as u8));
        }
    }

    #[test]
    fn rejects_wrong_channel_count() {
        let rgb = vec![0u8; 4 * 4 * 3];
        let err = Tiny::split_raw(4, 4, 3, &rgb).unwrap_err();
        assert_eq!(
            err,
            CutError::Shape {
                expected: Shape::rgba(4, 4),
                found: Shape::new(4, 4, 3),
            }
        );
    }

    #[test]
    fn rejects_short_buffer() {
        let short = vec![0u8; 10];
        assert!(Tiny::split_raw(4, 4, 4, &short).is_err());
    }

    #[test]
    fn shape_error_names_expected_shape() {
        let err = ChessBoardCutter::split_rgba(&RgbaImage::new(401, 400)).unwrap_err();
        assert!(err.to_string().contains("400x400x4"), "{err}");
    }

    #[test]
    fn assemble_checks_tile_count() {
        let err = Tiny::assemble(&[RgbaImage::new(2, 2)]).unwrap_err();
        assert_eq!(
            err,
            CutError::TileCount {
                expected: 4,
                found: 1
            }
        );
    }
}
