// ============================================================
// Layer 2 - DuplicateReviewUseCase
// ============================================================
// Finds visually similar images and copies each group into its
// own folder for manual review:
//
//   Step 1: List images under src, skipping the output folder
//   Step 2: Perceptual hash of every image           (Layer 5)
//   Step 3: Bucket by hash prefix                    (Layer 4)
//   Step 4: Group within buckets by Hamming distance (Layer 4)
//   Step 5: Copy group n into out/group_<n>/
//
// Duplicates often share a file name, so every copy is
// prefixed with its position in the group:
//
//   out/group_1/1_photo.png
//   out/group_1/2_photo.png
//
// group_<n> folders left by an earlier run are removed before
// copying; group numbers change whenever the image set does.
// Only copies live there. Sources are only read, and deciding
// which copy to keep is left to whoever reviews the folders.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::discovery::find_image_files;
use crate::data::grouping::{bucket_hashes, group_similar, HashedImage};
use crate::domain::entry::file_name_of;
use crate::domain::error::PrepError;
use crate::imaging::phash::phash_file;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConfig {
    pub src:         PathBuf,
    /// Defaults to <src>/duplicates
    pub out_dir:     Option<PathBuf>,
    /// Max Hamming distance for two images to count as similar
    pub threshold:   u32,
    /// Hash bits used as bucket key
    pub prefix_bits: u32,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            src:         PathBuf::from("data/raw"),
            out_dir:     None,
            threshold:   25,
            prefix_bits: 12,
        }
    }
}

impl DuplicateConfig {
    pub fn out_dir(&self) -> PathBuf {
        self.out_dir
            .clone()
            .unwrap_or_else(|| self.src.join("duplicates"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub scanned:     usize,
    pub undecodable: usize,
    pub groups:      Vec<Vec<PathBuf>>,
}

pub struct DuplicateReviewUseCase {
    config: DuplicateConfig,
}

impl DuplicateReviewUseCase {
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<DuplicateReport> {
        let cfg     = &self.config;
        let out_dir = cfg.out_dir();

        if cfg.prefix_bits > 64 {
            bail!("prefix_bits must be between 0 and 64, got {}", cfg.prefix_bits);
        }

        // ── Step 1: List images ───────────────────────────────────────────────
        tracing::info!("Scanning images in '{}'", cfg.src.display());
        let images = find_image_files(&cfg.src, Some(out_dir.as_path()))
            .with_context(|| format!("Cannot scan '{}'", cfg.src.display()))?;
        tracing::info!("Found {} images to process", images.len());

        // ── Step 2: Hash ──────────────────────────────────────────────────────
        let mut report = DuplicateReport { scanned: images.len(), ..Default::default() };
        let mut hashes: Vec<HashedImage> = Vec::with_capacity(images.len());

        for path in images {
            match phash_file(&path) {
                Ok(hash) => {
                    tracing::debug!("{} {}", hash, path.display());
                    hashes.push((path, hash));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable image '{}': {}", path.display(), e);
                    report.undecodable += 1;
                }
            }
        }

        // ── Steps 3-4: Bucket and group ───────────────────────────────────────
        let buckets = bucket_hashes(hashes, cfg.prefix_bits);
        report.groups = group_similar(&buckets, cfg.threshold);
        tracing::info!(
            "Identified {} groups of similar images across {} buckets",
            report.groups.len(),
            buckets.len()
        );

        // ── Step 5: Copy groups ───────────────────────────────────────────────
        copy_groups(&report.groups, &out_dir)?;

        Ok(report)
    }
}

/// Copy each group into `out_dir/group_<n>/`, numbering from 1.
/// Members are named `<i>_<file name>`, also from 1.
pub fn copy_groups(groups: &[Vec<PathBuf>], out_dir: &Path) -> Result<(), PrepError> {
    remove_stale_groups(out_dir)?;
    fs::create_dir_all(out_dir).map_err(|e| PrepError::io(out_dir, e))?;

    for (idx, group) in groups.iter().enumerate() {
        let group_dir = out_dir.join(format!("group_{}", idx + 1));
        fs::create_dir_all(&group_dir).map_err(|e| PrepError::io(&group_dir, e))?;

        for (member, path) in group.iter().enumerate() {
            let mut name = OsString::from(format!("{}_", member + 1));
            name.push(file_name_of(path)?);

            let target = group_dir.join(name);
            fs::copy(path, &target).map_err(|e| PrepError::io(path, e))?;
        }

        tracing::info!(
            "Group {}: {} images copied to '{}'",
            idx + 1,
            group.len(),
            group_dir.display()
        );
    }
    Ok(())
}

/// Delete `group_<n>` folders under `out_dir`. Anything else is left alone.
fn remove_stale_groups(out_dir: &Path) -> Result<(), PrepError> {
    if !out_dir.is_dir() {
        return Ok(());
    }

    let entries = fs::read_dir(out_dir).map_err(|e| PrepError::io(out_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PrepError::io(out_dir, e))?;
        let path  = entry.path();
        if path.is_dir() && is_group_dir_name(&entry.file_name()) {
            tracing::debug!("Removing stale '{}'", path.display());
            fs::remove_dir_all(&path).map_err(|e| PrepError::io(&path, e))?;
        }
    }
    Ok(())
}

fn is_group_dir_name(name: &std::ffi::OsStr) -> bool {
    name.to_str()
        .and_then(|n| n.strip_prefix("group_"))
        .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
