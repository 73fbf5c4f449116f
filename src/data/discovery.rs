// ============================================================
// Layer 4 - Dataset Discovery
// ============================================================
// Walks a dataset root and yields every image file in it as a
// RawFileEntry tagged with the layout it was found under.
//
// The walk is:
//   - recursive       (walkdir)
//   - deterministic   (entries sorted by file name)
//   - lazy            (files are yielded as the walk reaches them)
//   - restartable     (each discover() call walks again)
//
// Only image extensions are yielded. Anything else (.DS_Store,
// README.txt, label CSVs) is logged at debug level and skipped.
// A missing dataset root is an IO error, not an empty dataset.
//
// Which dataset a file belongs to is decided by the layout we
// pass in, never by the current directory or a hardcoded path.

use serde::{Deserialize, Serialize};
use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::convention::NamingConvention;
use crate::domain::entry::RawFileEntry;
use crate::domain::error::PrepError;
use crate::domain::traits::{EntryIter, EntrySource};

/// Extensions treated as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Where one source dataset lives and how its files are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLayout {
    /// Tag carried by every entry from this dataset
    pub name: String,

    /// Dataset root, relative to the input root
    pub root: PathBuf,

    pub convention: NamingConvention,
}

impl DatasetLayout {
    pub fn new(
        name:       impl Into<String>,
        root:       impl Into<PathBuf>,
        convention: NamingConvention,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            convention,
        }
    }

    /// The two datasets this tool was written for:
    ///   by_directory/<split>/<label>/<file>
    ///   by_filename/<split>_<label>_<id>[_aug_<n>].<ext>
    pub fn defaults() -> Vec<DatasetLayout> {
        vec![
            DatasetLayout::new("by_directory", "by_directory", NamingConvention::DirectoryEncoded),
            DatasetLayout::new("by_filename",  "by_filename",  NamingConvention::FilenameEncoded),
        ]
    }
}

/// Discovers the files of one dataset under a given input root.
pub struct DatasetDiscovery {
    layout:       DatasetLayout,
    dataset_root: PathBuf,
}

impl DatasetDiscovery {
    pub fn new(input_root: &Path, layout: DatasetLayout) -> Self {
        let dataset_root = input_root.join(&layout.root);
        Self { layout, dataset_root }
    }

    pub fn dataset_root(&self) -> &Path {
        &self.dataset_root
    }
}

impl EntrySource for DatasetDiscovery {
    fn discover(&self) -> EntryIter<'_> {
        let name       = self.layout.name.clone();
        let convention = self.layout.convention;

        let iter = walk_image_files(&self.dataset_root, None)
            .map(move |res| res.map(|path| RawFileEntry::new(path, name.clone(), convention)));

        Box::new(iter)
    }
}

/// Lazily walk `root` yielding image file paths in sorted order.
/// Anything under `exclude` is pruned from the walk.
pub fn walk_image_files<'a>(
    root:    &Path,
    exclude: Option<&'a Path>,
) -> impl Iterator<Item = Result<PathBuf, PrepError>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| match exclude {
            Some(ex) => !e.path().starts_with(ex),
            None     => true,
        })
        .filter_map(|res| match res {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                if !is_image_file(entry.path()) {
                    tracing::debug!("Skipping non-image file '{}'", entry.path().display());
                    return None;
                }
                Some(Ok(entry.into_path()))
            }
            Err(e) => Some(Err(walk_error(e))),
        })
}

/// Collect every image under `src` (see walk_image_files).
pub fn find_image_files(src: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>, PrepError> {
    walk_image_files(src, exclude).collect()
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

/// Absolute form of `path` with `.`, `..` and symlinks resolved.
/// The path need not exist: the existing prefix is canonicalized
/// and the remaining components are applied lexically.
pub fn resolve_path(path: &Path) -> Result<PathBuf, PrepError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_err(|e| PrepError::io(path, e))?.join(path)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir    => {}
            Component::ParentDir => { out.pop(); }
            other => {
                out.push(other);
                if let Ok(real) = out.canonicalize() {
                    out = real;
                }
            }
        }
    }
    Ok(out)
}

fn walk_error(e: walkdir::Error) -> PrepError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
    let message = e.to_string();
    let source = e
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    PrepError::io(path, source)
}
