use std::{
    collections::{HashMap, hash_map::Entry},
    fs::File,
    io::BufWriter,
    path::PathBuf,
};

use grid_cutter::ChessBoardCutter;
use image::RgbaImage;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    composite::composite,
    config::GenCfg,
    error::{GenError, Result},
    io::load_rgba,
    labels::{Label, Piece},
    styles::StylePools,
};

/// Squares per cached board style, named `1.png..=64.png`.
pub const SQUARES_PER_BOARD: u32 = ChessBoardCutter::TILE_COUNT as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceDraw {
    /// Index into `StylePools::piece_sets`.
    pub set: usize,
    pub piece: Piece,
}

/// Random choices for one output image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Draw {
    pub index: u32,
    /// Index into `StylePools::boards`.
    pub board: usize,
    /// 1-based square file number.
    pub square: u32,
    pub piece: Option<PieceDraw>,
}

impl Draw {
    pub fn label(&self) -> Label {
        match self.piece {
            Some(p) => Label::Piece(p.piece),
            None => Label::Empty,
        }
    }
}

/// Draws one item. The order of draws is fixed:
/// board, square, decider, then set and piece for non-empty items.
///
/// The decider is uniform in `[0, 1)` scaled by the class count; only the
/// first of the 13 bins yields an empty square.
pub fn draw_item<R: Rng + ?Sized>(rng: &mut R, index: u32, boards: usize, sets: usize) -> Draw {
    debug_assert!(boards > 0 && sets > 0);
    let board = rng.random_range(0..boards);
    let square = rng.random_range(1..=SQUARES_PER_BOARD);
    let decider = rng.random::<f64>() * Label::COUNT as f64;

    let piece = if decider >= 1.0 {
        let set = rng.random_range(0..sets);
        let piece = Piece::ALL[rng.random_range(0..Piece::ALL.len())];
        Some(PieceDraw { set, piece })
    } else {
        None
    };

    Draw {
        index,
        board,
        square,
        piece,
    }
}

/// Number of generated images per label, indexed by `Label::index`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelCounts([u32; Label::COUNT]);

impl LabelCounts {
    pub fn add(&mut self, label: Label) {
        self.0[label.index()] += 1;
    }

    pub fn get(&self, label: Label) -> u32 {
        self.0[label.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, u32)> + '_ {
        Label::all().zip(self.0.iter().copied())
    }
}

pub struct DatasetGenerator<'a> {
    pub config: &'a GenCfg,
    pub pools: StylePools,
    rng: Xoshiro256PlusPlus,
    sprites: HashMap<(usize, Piece), RgbaImage>,
    pub(crate) writer: Option<BufWriter<File>>,
}

impl<'a> DatasetGenerator<'a> {
    pub fn new(config: &'a GenCfg, pools: StylePools) -> Self {
        Self {
            config,
            pools,
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            sprites: HashMap::new(),
            writer: None,
        }
    }

    pub fn square_path(&self, board: usize, square: u32) -> PathBuf {
        self.config
            .cache_dir
            .join(&self.pools.boards[board])
            .join(format!("{square}.png"))
    }

    pub fn sprite_path(&self, set: usize, piece: Piece) -> PathBuf {
        self.config
            .pieces_dir
            .join(&self.pools.piece_sets[set])
            .join(piece.sprite_file())
    }

    /// Fails if any square or sprite a draw could reference is missing.
    pub fn preflight(&self) -> Result<()> {
        for board in 0..self.pools.boards.len() {
            for square in 1..=SQUARES_PER_BOARD {
                let path = self.square_path(board, square);
                if !path.is_file() {
                    return Err(GenError::NotFound {
                        what: "cached square",
                        path,
                    });
                }
            }
        }
        for set in 0..self.pools.piece_sets.len() {
            for piece in Piece::ALL {
                let path = self.sprite_path(set, piece);
                if !path.is_file() {
                    return Err(GenError::NotFound {
                        what: "piece sprite",
                        path,
                    });
                }
            }
        }
        Ok(())
    }

    /// Advances the generator by `count` items. Indices continue from `start`.
    pub fn plan(&mut self, start: u32, count: u32) -> Vec<Draw> {
        let (boards, sets) = (self.pools.boards.len(), self.pools.piece_sets.len());
        (start..start + count)
            .map(|i| draw_item(&mut self.rng, i, boards, sets))
            .collect()
    }

    pub fn render(&mut self, draw: &Draw) -> Result<RgbaImage> {
        let mut img = load_rgba(&self.square_path(draw.board, draw.square), "cached square")?;
        if let Some(p) = draw.piece {
            let alpha = self.config.alpha;
            let sprite = self.sprite(p.set, p.piece)?;
            composite(&mut img, sprite, alpha);
        }
        Ok(img)
    }

    fn sprite(&mut self, set: usize, piece: Piece) -> Result<&RgbaImage> {
        let path = self.sprite_path(set, piece);
        match self.sprites.entry((set, piece)) {
            Entry::Occupied(e) => Ok(&*e.into_mut()),
            Entry::Vacant(e) => Ok(&*e.insert(load_rgba(&path, "piece sprite")?)),
        }
    }

    /// Draws, renders and writes `count` images plus the manifest.
    pub fn generate(&mut self, count: u32) -> Result<LabelCounts> {
        self.preflight()?;
        let draws = self.plan(0, count);
        self.init_output()?;

        let mut counts = LabelCounts::default();
        for draw in &draws {
            let img = self.render(draw)?;
            let label = draw.label();
            self.save_png(&img, label, draw.index)?;
            if self.config.manifest {
                self.write_record(draw)?;
            }
            counts.add(label);
            debug!(
                "#{} {} from board {} square {}",
                draw.index, label, self.pools.boards[draw.board], draw.square
            );
        }
        self.finalize_output()
            .map_err(|e| GenError::io(&self.config.out_dir, e))?;

        info!(
            "generated {} images from {} board styles and {} piece sets",
            counts.total(),
            self.pools.boards.len(),
            self.pools.piece_sets.len()
        );
        Ok(counts)
    }
}

impl Drop for DatasetGenerator<'_> {
    fn drop(&mut self) {
        let _ = self.finalize_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(35);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(35);
        for i in 0..1000 {
            assert_eq!(draw_item(&mut a, i, 7, 16), draw_item(&mut b, i, 7, 16));
        }
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for i in 0..10_000 {
            let d = draw_item(&mut rng, i, 3, 5);
            assert_eq!(d.index, i);
            assert!(d.board < 3);
            assert!((1..=64).contains(&d.square));
            if let Some(p) = d.piece {
                assert!(p.set < 5);
            }
        }
    }

    #[test]
    fn labels_are_uniform() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(35);
        let n = 130_000u32;
        let mut counts = LabelCounts::default();
        for i in 0..n {
            counts.add(draw_item(&mut rng, i, 4, 16).label());
        }
        assert_eq!(counts.total(), n);

        let expected = n as f64 / Label::COUNT as f64;
        // ~5 standard deviations of a binomial(130000, 1/13)
        let tol = 5.0 * (n as f64 * (1.0 / 13.0) * (12.0 / 13.0)).sqrt();
        for (label, c) in counts.iter() {
            assert!(
                (c as f64 - expected).abs() < tol,
                "{label}: {c} vs {expected:.0}"
            );
        }
    }

    #[test]
    fn draw_order_is_fixed() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(35);
        let mut shadow = rng.clone();
        let d = draw_item(&mut rng, 0, 2, 2);
        let _ = shadow.random_range(0..2usize);
        let _ = shadow.random_range(1..=SQUARES_PER_BOARD);
        let _ = shadow.random::<f64>();
        if d.piece.is_some() {
            let _ = shadow.random_range(0..2usize);
            let _ = shadow.random_range(0..Piece::ALL.len());
        }
        assert_eq!(rng.random::<u64>(), shadow.random::<u64>());
    }
}
