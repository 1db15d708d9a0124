use std::{
    fs::{self, File},
    io::{BufWriter, Error, Write},
    path::Path,
};

use image::{DynamicImage, RgbaImage};

use crate::{
    error::{GenError, Result},
    generator::{DatasetGenerator, Draw},
    labels::Label,
    record::JsonRecord,
};

pub const MANIFEST_FILE: &str = "labels.jsonl";

pub fn load_image(path: &Path, what: &'static str) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(GenError::NotFound {
            what,
            path: path.to_path_buf(),
        });
    }
    image::open(path).map_err(|source| GenError::Image {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_rgba(path: &Path, what: &'static str) -> Result<RgbaImage> {
    load_image(path, what).map(DynamicImage::into_rgba8)
}

pub fn save_rgba(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save(path).map_err(|source| GenError::Image {
        path: path.to_path_buf(),
        source,
    })
}

pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| GenError::io(path, e))
}

/// One directory per label under `out_dir`.
pub fn create_label_dirs(out_dir: &Path) -> Result<()> {
    for label in Label::all() {
        create_dir(&out_dir.join(label.dir_name()))?;
    }
    Ok(())
}

impl DatasetGenerator<'_> {
    pub fn init_output(&mut self) -> Result<()> {
        let out_dir = &self.config.out_dir;
        create_label_dirs(out_dir)?;
        if self.config.manifest && self.writer.is_none() {
            let path = out_dir.join(MANIFEST_FILE);
            let file = File::create(&path).map_err(|e| GenError::io(&path, e))?;
            self.writer = Some(BufWriter::with_capacity(8 << 20, file));
        }
        Ok(())
    }

    pub fn write_record(&mut self, draw: &Draw) -> Result<()> {
        let label = draw.label();
        let rec = JsonRecord {
            schema: "v1",
            image: format!("{}/{}.png", label.dir_name(), draw.index),
            label: label.dir_name(),
            board_style: &self.pools.boards[draw.board],
            square: draw.square,
            piece_set: draw.piece.map(|p| self.pools.piece_sets[p.set].as_str()),
            seed: self.config.seed,
        };
        let json = serde_json::to_string(&rec)?;

        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", json)
                .map_err(|e| GenError::io(self.config.out_dir.join(MANIFEST_FILE), e))?;
        }
        Ok(())
    }

    pub fn finalize_output(&mut self) -> std::result::Result<(), Error> {
        if let Some(writer) = self.writer.take() {
            writer.into_inner()?.sync_all()?;
        }
        Ok(())
    }

    pub(crate) fn save_png(&self, img: &RgbaImage, label: Label, index: u32) -> Result<()> {
        let out_path = self
            .config
            .out_dir
            .join(label.dir_name())
            .join(format!("{index}.png"));
        save_rgba(img, &out_path)
    }
}
