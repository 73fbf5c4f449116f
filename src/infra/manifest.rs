// ============================================================
// Layer 6 - Placement Manifest
// ============================================================
// Records where every placed file came from, one CSV row per
// file, so a surprising image in the output tree can be traced
// back to its raw dataset.
//
// Example:
//   split,label,dataset,source,target
//   train,food,by_filename,raw/by_filename/training_food_174.jpg,out/train/food/training_food_174.jpg
//
// The file is rewritten on every run; rows follow discovery
// order, which is sorted, so identical input gives an identical
// manifest. The header is written up front so a run that
// places nothing still leaves a readable file.

use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use serde::Serialize;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::domain::entry::ClassifiedEntry;
use crate::domain::label::{Label, Split};

const HEADER: [&str; 5] = ["split", "label", "dataset", "source", "target"];

/// One manifest line. Paths must be valid UTF-8 to serialize.
#[derive(Debug, Serialize)]
struct ManifestRow<'a> {
    split:   Split,
    label:   Label,
    dataset: &'a str,
    source:  &'a Path,
    target:  &'a Path,
}

pub struct ManifestWriter {
    path: PathBuf,
    out:  Writer<File>,
    rows: usize,
}

impl ManifestWriter {
    /// Create (or truncate) the manifest and write the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let file = File::create(&path)
            .with_context(|| format!("Cannot create manifest '{}'", path.display()))?;
        let mut out = WriterBuilder::new().has_headers(false).from_writer(file);
        out.write_record(HEADER)?;

        tracing::debug!("Created manifest '{}'", path.display());
        Ok(Self { path, out, rows: 0 })
    }

    pub fn log(&mut self, c: &ClassifiedEntry, target: &Path) -> Result<()> {
        let row = ManifestRow {
            split:   c.classification.split,
            label:   c.classification.label,
            dataset: &c.entry.dataset,
            source:  &c.entry.path,
            target,
        };
        self.out
            .serialize(&row)
            .with_context(|| format!("Cannot record '{}' in manifest", c.entry.path.display()))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush buffered rows. Returns the number of rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.out
            .flush()
            .with_context(|| format!("Cannot write manifest '{}'", self.path.display()))?;
        Ok(self.rows)
    }
}
