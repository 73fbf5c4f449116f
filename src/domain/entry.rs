// ============================================================
// Layer 3 - Raw File Entry
// ============================================================
// One image discovered under a dataset root, tagged with the
// dataset it came from. Entries live for a single run:
// discovered, classified, then either placed or dropped.
// Nothing here touches the filesystem.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::domain::convention::NamingConvention;
use crate::domain::error::PrepError;
use crate::domain::label::{Label, Split};

/// A discovered file plus its dataset-of-origin tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFileEntry {
    /// Where the file lives on disk
    pub path: PathBuf,

    /// Name of the dataset layout it was found under
    pub dataset: String,

    /// The rule set used to read split / label from `path`
    pub convention: NamingConvention,
}

impl RawFileEntry {
    pub fn new(
        path:       impl Into<PathBuf>,
        dataset:    impl Into<String>,
        convention: NamingConvention,
    ) -> Self {
        Self {
            path:    path.into(),
            dataset: dataset.into(),
            convention,
        }
    }

    /// Bare file name, or a naming error for paths like `..`.
    /// Not required to be UTF-8.
    pub fn file_name(&self) -> Result<&OsStr, PrepError> {
        file_name_of(&self.path)
    }

    /// Apply this entry's naming convention.
    pub fn classify(&self) -> Result<Classification, PrepError> {
        self.convention.classify(&self.path)
    }
}

/// What a naming convention says about one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub split:        Split,
    pub label:        Label,
    pub is_augmented: bool,
}

/// An entry together with its classification, ready to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub entry:          RawFileEntry,
    pub classification: Classification,
}

pub(crate) fn file_name_of(path: &Path) -> Result<&OsStr, PrepError> {
    path.file_name()
        .ok_or_else(|| PrepError::naming(path, "path has no file name"))
}
