use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use log::info;

use piecegen::{AlphaMode, GenCfg, Pipeline, pipeline::timed};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate labeled chess square images from board and piece sprites"
)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with one board image per style
    #[arg(long, global = true)]
    boards: Option<PathBuf>,
    /// Directory with one subdirectory per piece style set
    #[arg(long, global = true)]
    pieces: Option<PathBuf>,
    /// Empty square cache
    #[arg(long, global = true)]
    cache: Option<PathBuf>,
    /// Output root, one subdirectory per label
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the empty square cache from the board images
    Split,
    /// Create the output label directories
    Layout,
    /// Generate images from an existing square cache
    Generate(GenArgs),
    /// Split (if the cache is missing), lay out and generate
    Run(GenArgs),
}

#[derive(Args, Debug, Default)]
struct GenArgs {
    /// Number of images
    #[arg(short = 'n', long)]
    count: Option<u32>,
    /// train, test, all or mixed
    #[arg(short, long)]
    mode: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    alpha: Option<AlphaArg>,
    /// Skip writing labels.jsonl
    #[arg(long)]
    no_manifest: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlphaArg {
    Overwrite,
    Blend,
}

impl From<AlphaArg> for AlphaMode {
    fn from(a: AlphaArg) -> Self {
        match a {
            AlphaArg::Overwrite => AlphaMode::Overwrite,
            AlphaArg::Blend => AlphaMode::Blend,
        }
    }
}

impl Cli {
    fn load_config(&self) -> Result<GenCfg> {
        let mut cfg = match &self.config {
            Some(path) => GenCfg::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GenCfg::default(),
        };
        if let Some(p) = &self.boards {
            cfg.boards_dir = p.clone();
        }
        if let Some(p) = &self.pieces {
            cfg.pieces_dir = p.clone();
        }
        if let Some(p) = &self.cache {
            cfg.cache_dir = p.clone();
        }
        if let Some(p) = &self.out {
            cfg.out_dir = p.clone();
        }
        Ok(cfg)
    }
}

impl GenArgs {
    fn apply(&self, cfg: &mut GenCfg) {
        if let Some(n) = self.count {
            cfg.count = n;
        }
        if let Some(m) = &self.mode {
            cfg.mode = m.clone();
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(a) = self.alpha {
            cfg.alpha = a.into();
        }
        if self.no_manifest {
            cfg.manifest = false;
        }
    }
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut cfg = cli.load_config()?;
    let command = cli.command.unwrap_or(Command::Run(GenArgs::default()));
    if let Command::Generate(args) | Command::Run(args) = &command {
        args.apply(&mut cfg);
    }

    let pipeline = Pipeline::new(cfg)?;
    match command {
        Command::Split => {
            timed("board split", || pipeline.split_boards())?;
        }
        Command::Layout => {
            timed("layout", || pipeline.ensure_layout())?;
        }
        Command::Generate(_) => {
            let counts = timed("generation", || pipeline.generate())?;
            log_counts(&counts);
        }
        Command::Run(_) => {
            let counts = pipeline.run()?;
            log_counts(&counts);
        }
    }

    Ok(())
}

fn log_counts(counts: &piecegen::LabelCounts) {
    for (label, n) in counts.iter() {
        info!("{label:>5}: {n}");
    }
}
