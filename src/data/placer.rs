// ============================================================
// Layer 4 - Output Placement
// ============================================================
// Copies classified files into the canonical output tree:
//
//   output/
//     train/       food/  non_food/
//     validation/  food/  non_food/
//     test/        food/  non_food/
//
// Exactly one directory per (split, label). Directories are
// created the first time a file lands in them; creating an
// existing one is not an error.
//
// Collisions
//   Two different source files with the same name in the same
//   bucket would silently overwrite each other with a plain
//   copy. We track every target written in this run and check
//   what is already on disk:
//
//   target written earlier this run      -> collision
//   target on disk, same bytes as source -> already placed
//                                           (resumed run)
//   target on disk, different bytes      -> collision
//
// A collision fails with DuplicateFile, or under the Skip
// policy is logged and counted while the first file wins.
//
// Source files are only ever read.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::entry::ClassifiedEntry;
use crate::domain::error::PrepError;
use crate::domain::label::{Label, Split};

/// What to do when two files map to the same output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Abort the run with DuplicateFile
    #[default]
    Fail,
    /// Keep the first file, warn, and carry on
    Skip,
}

/// Result of placing a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    Copied(PathBuf),
    /// Dry run: where the file would have gone
    WouldCopy(PathBuf),
    /// Identical file already at the target
    AlreadyPresent(PathBuf),
    CollisionSkipped(PathBuf),
}

/// The canonical output tree for one run.
pub struct OutputTree {
    root:    PathBuf,
    policy:  CollisionPolicy,
    dry_run: bool,

    /// target -> source, for everything placed during this run
    placed: HashMap<PathBuf, PathBuf>,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>, policy: CollisionPolicy, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            policy,
            dry_run,
            placed: HashMap::new(),
        }
    }

    /// Directory holding every file of one (split, label) pair
    pub fn bucket_dir(&self, split: Split, label: Label) -> PathBuf {
        self.root.join(split.as_dir()).join(label.as_dir())
    }

    /// Copy one classified entry into its bucket.
    pub fn place(&mut self, c: &ClassifiedEntry) -> Result<PlaceOutcome, PrepError> {
        let source = &c.entry.path;
        let name   = c.entry.file_name()?;
        let bucket = self.bucket_dir(c.classification.split, c.classification.label);
        let target = bucket.join(name);

        if let Some(existing) = self.placed.get(&target) {
            if existing == source {
                return Ok(PlaceOutcome::AlreadyPresent(target));
            }
            let existing = existing.clone();
            return self.collision(target, existing, source.clone());
        }

        if target.exists() {
            if files_identical(source, &target)? {
                tracing::debug!("Already placed: '{}'", target.display());
                self.placed.insert(target.clone(), source.clone());
                return Ok(PlaceOutcome::AlreadyPresent(target));
            }
            let existing = target.clone();
            return self.collision(target, existing, source.clone());
        }

        self.placed.insert(target.clone(), source.clone());

        if self.dry_run {
            return Ok(PlaceOutcome::WouldCopy(target));
        }

        // create_dir_all is a no-op when the bucket already exists
        fs::create_dir_all(&bucket).map_err(|e| PrepError::io(&bucket, e))?;
        fs::copy(source, &target).map_err(|e| PrepError::io(source, e))?;

        tracing::debug!("Copied '{}' -> '{}'", source.display(), target.display());
        Ok(PlaceOutcome::Copied(target))
    }

    fn collision(
        &self,
        target:   PathBuf,
        existing: PathBuf,
        incoming: PathBuf,
    ) -> Result<PlaceOutcome, PrepError> {
        match self.policy {
            CollisionPolicy::Fail => Err(PrepError::DuplicateFile { target, existing, incoming }),
            CollisionPolicy::Skip => {
                tracing::warn!(
                    "Collision on '{}': keeping '{}', skipping '{}'",
                    target.display(),
                    existing.display(),
                    incoming.display()
                );
                Ok(PlaceOutcome::CollisionSkipped(target))
            }
        }
    }
}

/// Byte-for-byte comparison, short-circuiting on length.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, PrepError> {
    let len_a = fs::metadata(a).map_err(|e| PrepError::io(a, e))?.len();
    let len_b = fs::metadata(b).map_err(|e| PrepError::io(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let bytes_a = fs::read(a).map_err(|e| PrepError::io(a, e))?;
    let bytes_b = fs::read(b).map_err(|e| PrepError::io(b, e))?;
    Ok(bytes_a == bytes_b)
}
