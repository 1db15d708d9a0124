use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    composite::AlphaMode,
    error::{GenError, Result},
    styles::Mode,
};

/// Seed of the original datasets; keeps regenerated data comparable.
pub const DEFAULT_SEED: u64 = 35;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GenCfg {
    pub boards_dir: PathBuf, // one image per board style
    pub pieces_dir: PathBuf, // <set>/<code>.png
    pub cache_dir: PathBuf,  // <board style>/<1..=64>.png
    pub out_dir: PathBuf,    // <label>/<index>.png
    pub seed: u64,
    pub count: u32,
    pub mode: String,
    pub alpha: AlphaMode,
    pub manifest: bool, // write labels.jsonl next to the label dirs
}

impl Default for GenCfg {
    fn default() -> Self {
        Self {
            boards_dir: PathBuf::from("boards"),
            pieces_dir: PathBuf::from("pieces"),
            cache_dir: PathBuf::from("empty_squares"),
            out_dir: PathBuf::from("data"),
            seed: DEFAULT_SEED,
            count: 10_000,
            mode: "train".to_string(),
            alpha: AlphaMode::Overwrite,
            manifest: true,
        }
    }
}

impl GenCfg {
    /// Defaults with every directory placed under `root`.
    pub fn rooted(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let d = Self::default();
        Self {
            boards_dir: root.join(d.boards_dir),
            pieces_dir: root.join(d.pieces_dir),
            cache_dir: root.join(d.cache_dir),
            out_dir: root.join(d.out_dir),
            ..d
        }
    }

    /// Reads a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| GenError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<Mode> {
        let mode: Mode = self.mode.parse()?;
        if self.count == 0 {
            return Err(GenError::Config("count must be >= 1".to_string()));
        }
        Ok(mode)
    }
}
