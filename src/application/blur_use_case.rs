// ============================================================
// Layer 2 - BlurReviewUseCase
// ============================================================
// Moves blurry images out of a raw folder into a review folder
// so a human can decide whether to keep them.
//
//   Step 1: List images under src, skipping the review folder
//   Step 2: Score each with the Laplacian variance  (Layer 5)
//   Step 3: Move the ones below threshold into review_dir
//
// Files are moved, not copied: a flagged image should drop out
// of the raw set until someone puts it back. The image list is
// collected before anything moves so the walk never sees its
// own changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::data::discovery::find_image_files;
use crate::domain::entry::file_name_of;
use crate::domain::error::PrepError;
use crate::imaging::blur::{is_blurry, DEFAULT_BLUR_THRESHOLD};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlurConfig {
    pub src:        PathBuf,
    /// Defaults to <src>/blurry_review
    pub review_dir: Option<PathBuf>,
    pub threshold:  f64,
    pub dry_run:    bool,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            src:        PathBuf::from("data/raw"),
            review_dir: None,
            threshold:  DEFAULT_BLUR_THRESHOLD,
            dry_run:    false,
        }
    }
}

impl BlurConfig {
    pub fn review_dir(&self) -> PathBuf {
        self.review_dir
            .clone()
            .unwrap_or_else(|| self.src.join("blurry_review"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlurReport {
    pub scanned: usize,
    /// Original locations of the flagged images
    pub flagged: Vec<PathBuf>,
}

pub struct BlurReviewUseCase {
    config: BlurConfig,
}

impl BlurReviewUseCase {
    pub fn new(config: BlurConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<BlurReport> {
        let cfg        = &self.config;
        let review_dir = cfg.review_dir();

        tracing::info!(
            "Scanning '{}' for blur (threshold={})",
            cfg.src.display(),
            cfg.threshold
        );

        let images = find_image_files(&cfg.src, Some(review_dir.as_path()))
            .with_context(|| format!("Cannot scan '{}'", cfg.src.display()))?;

        let mut report = BlurReport { scanned: images.len(), ..Default::default() };

        if !cfg.dry_run {
            fs::create_dir_all(&review_dir)
                .with_context(|| format!("Cannot create '{}'", review_dir.display()))?;
        }

        for path in images {
            if !is_blurry(&path, cfg.threshold) {
                continue;
            }

            if !cfg.dry_run {
                move_into(&path, &review_dir)?;
            }
            tracing::info!("Flagged blurry: {}", path.display());
            report.flagged.push(path);
        }

        tracing::info!(
            "Done: {} of {} images flagged, review folder '{}'",
            report.flagged.len(),
            report.scanned,
            review_dir.display()
        );
        Ok(report)
    }
}

/// Move `path` into `dir`, refusing to overwrite.
fn move_into(path: &Path, dir: &Path) -> Result<PathBuf, PrepError> {
    let target = dir.join(file_name_of(path)?);
    if target.exists() {
        return Err(PrepError::DuplicateFile {
            target:   target.clone(),
            existing: target,
            incoming: path.to_path_buf(),
        });
    }

    match fs::rename(path, &target) {
        Ok(()) => {}
        Err(e) if needs_copy_fallback(&e) => {
            fs::copy(path, &target).map_err(|e| PrepError::io(path, e))?;
            if let Err(e) = fs::remove_file(path) {
                // Never leave the image in both places
                let _ = fs::remove_file(&target);
                return Err(PrepError::io(path, e));
            }
        }
        Err(e) => return Err(PrepError::io(path, e)),
    }
    Ok(target)
}

/// rename cannot cross filesystems; only that case is worth a copy.
fn needs_copy_fallback(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::CrossesDevices
}
