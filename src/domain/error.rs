// ============================================================
// Layer 3 - Domain Errors
// ============================================================
// The three ways a preparation pass can fail.
//
//   NamingConvention - a file's name or location matches no
//                      known dataset convention
//   Io               - a read, copy, move or mkdir failed
//   DuplicateFile    - two different files want the same
//                      output name
//
// Every failure aborts the run. Nothing here is retried and
// nothing is skipped silently: a mislabelled image is worse
// than a failed run because it poisons the classifier.
//
// The application layer wraps these in anyhow::Error with
// extra context, so the CLI prints the whole chain.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PrepError {
    #[error("naming convention error for '{path}': {reason}")]
    NamingConvention { path: PathBuf, reason: String },

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate file '{target}': '{incoming}' would overwrite '{existing}'")]
    DuplicateFile {
        target:   PathBuf,
        existing: PathBuf,
        incoming: PathBuf,
    },
}

impl PrepError {
    pub fn naming(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PrepError::NamingConvention {
            path:   path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io { path: path.into(), source }
    }
}
