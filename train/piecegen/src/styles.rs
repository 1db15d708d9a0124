//! Discovery and ordering of board styles and piece style sets.

use std::{
    fs::read_dir,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::warn;

use crate::error::{GenError, Result};

/// Which piece style sets a generation run may draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// First half of the sorted sets.
    Train,
    /// Second half of the sorted sets.
    Test,
    /// Every set; also spelled `mixed`.
    All,
}

impl FromStr for Mode {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Mode::Train),
            "test" => Ok(Mode::Test),
            "all" | "mixed" => Ok(Mode::All),
            _ => Err(GenError::InvalidMode(s.to_string())),
        }
    }
}

impl Mode {
    /// Slice of `sorted` eligible under this mode. An odd count leaves the
    /// extra set in the test half.
    pub fn select<T>(self, sorted: &[T]) -> &[T] {
        let half = sorted.len() / 2;
        match self {
            Mode::Train => &sorted[..half],
            Mode::Test => &sorted[half..],
            Mode::All => sorted,
        }
    }
}

/// Names of the subdirectories of `dir` in plain string order, so `10`
/// sorts before `2`. Train/test halves are cut from this order.
pub fn list_style_dirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in read_dir(dir).map_err(|e| not_found_or_io(dir, "style directory", e))? {
        let entry = entry.map_err(|e| GenError::io(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => {
                if name.parse::<u64>().is_err() {
                    warn!("non-numeric style directory {}", path.display());
                }
                names.push(name.to_string());
            }
            None => warn!("skipping non UTF-8 directory {}", path.display()),
        }
    }
    names.sort();
    Ok(names)
}

/// Numbered style directories of a square cache; other entries are ignored.
pub fn list_cache_styles(cache_dir: &Path) -> Result<Vec<String>> {
    let mut styles = list_style_dirs(cache_dir)?;
    styles.retain(|name| name.parse::<u64>().is_ok());
    Ok(styles)
}

/// PNG files directly inside `dir`, sorted by file name.
pub fn list_board_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in read_dir(dir).map_err(|e| not_found_or_io(dir, "boards directory", e))? {
        let path = entry.map_err(|e| GenError::io(dir, e))?.path();
        let is_png = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn not_found_or_io(path: &Path, what: &'static str, e: std::io::Error) -> GenError {
    if e.kind() == std::io::ErrorKind::NotFound {
        GenError::NotFound {
            what,
            path: path.to_path_buf(),
        }
    } else {
        GenError::io(path, e)
    }
}

/// Board styles found in the square cache and piece sets allowed by the mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StylePools {
    pub boards: Vec<String>,
    pub piece_sets: Vec<String>,
}

impl StylePools {
    pub fn discover(cache_dir: &Path, pieces_dir: &Path, mode: Mode) -> Result<Self> {
        let boards = list_cache_styles(cache_dir)?;
        if boards.is_empty() {
            return Err(GenError::NotFound {
                what: "cached board style",
                path: cache_dir.to_path_buf(),
            });
        }

        let all_sets = list_style_dirs(pieces_dir)?;
        if all_sets.len() % 2 == 1 && mode != Mode::All {
            warn!(
                "{} piece sets found, train and test halves differ in size",
                all_sets.len()
            );
        }
        let piece_sets = mode.select(&all_sets).to_vec();
        if piece_sets.is_empty() {
            return Err(GenError::Config(format!(
                "no piece sets available for mode {mode:?} in {}",
                pieces_dir.display()
            )));
        }

        Ok(Self { boards, piece_sets })
    }
}
