use std::{fs, path::Path, time::Instant};

use grid_cutter::ChessBoardCutter;
use image::RgbaImage;
use log::{debug, info};

use crate::{
    config::GenCfg,
    error::{GenError, Result},
    generator::{DatasetGenerator, LabelCounts},
    io::{create_dir, create_label_dirs, load_image, save_rgba},
    styles::{Mode, StylePools, list_board_files, list_cache_styles},
};

/// Runs `f` and logs how long it took.
pub fn timed<T>(phase: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let out = f()?;
    info!("{phase} done in {:.2?}", start.elapsed());
    Ok(out)
}

/// Splits every board in `boards_dir` and rewrites `cache_dir` as
/// `<style>/<square>.png`, styles numbered from 1 in board file order.
///
/// Every board is decoded and validated before the cache is touched.
pub fn build_square_cache(boards_dir: &Path, cache_dir: &Path) -> Result<usize> {
    let files = list_board_files(boards_dir)?;
    if files.is_empty() {
        return Err(GenError::NotFound {
            what: "board image",
            path: boards_dir.to_path_buf(),
        });
    }

    let mut styles: Vec<Vec<RgbaImage>> = Vec::with_capacity(files.len());
    for path in &files {
        let board = load_image(path, "board image")?;
        let squares = ChessBoardCutter::split(&board).map_err(|source| GenError::Shape {
            path: path.clone(),
            source,
        })?;
        debug!("split {}", path.display());
        styles.push(squares);
    }

    clear_style_dirs(cache_dir)?;
    for (i, squares) in styles.iter().enumerate() {
        let style_dir = cache_dir.join((i + 1).to_string());
        create_dir(&style_dir)?;
        for (j, square) in squares.iter().enumerate() {
            save_rgba(square, &style_dir.join(format!("{}.png", j + 1)))?;
        }
    }

    info!(
        "cached {} squares for {} board styles in {}",
        styles.len() * ChessBoardCutter::TILE_COUNT,
        styles.len(),
        cache_dir.display()
    );
    Ok(styles.len())
}

/// Removes the numbered style directories of a previous cache. Anything else
/// under `cache_dir` is left alone.
fn clear_style_dirs(cache_dir: &Path) -> Result<()> {
    if !cache_dir.is_dir() {
        return Ok(());
    }
    for style in list_cache_styles(cache_dir)? {
        let dir = cache_dir.join(&style);
        fs::remove_dir_all(&dir).map_err(|e| GenError::io(&dir, e))?;
    }
    Ok(())
}

/// Validated configuration plus the steps of a dataset run.
pub struct Pipeline {
    cfg: GenCfg,
    mode: Mode,
}

impl Pipeline {
    /// Fails on an unknown mode or a zero count without touching the filesystem.
    pub fn new(cfg: GenCfg) -> Result<Self> {
        let mode = cfg.validate()?;
        Ok(Self { cfg, mode })
    }

    /// True when the square cache holds at least one board style.
    pub fn cache_ready(&self) -> bool {
        list_cache_styles(&self.cfg.cache_dir).is_ok_and(|styles| !styles.is_empty())
    }

    pub fn split_boards(&self) -> Result<usize> {
        build_square_cache(&self.cfg.boards_dir, &self.cfg.cache_dir)
    }

    pub fn ensure_layout(&self) -> Result<()> {
        create_label_dirs(&self.cfg.out_dir)
    }

    pub fn generate(&self) -> Result<LabelCounts> {
        let pools = StylePools::discover(&self.cfg.cache_dir, &self.cfg.pieces_dir, self.mode)?;
        info!(
            "generating {} images, mode {:?}, seed {}",
            self.cfg.count, self.mode, self.cfg.seed
        );
        let mut generator = DatasetGenerator::new(&self.cfg, pools);
        generator.generate(self.cfg.count)
    }

    /// Splits boards if the cache is missing, creates the label tree, generates.
    pub fn run(&self) -> Result<LabelCounts> {
        if self.cache_ready() {
            info!("using square cache in {}", self.cfg.cache_dir.display());
        } else {
            timed("board split", || self.split_boards())?;
        }
        timed("layout", || self.ensure_layout())?;
        timed("generation", || self.generate())
    }
}
