// ============================================================
// Layer 6 - Run Report
// ============================================================
// Writes a run summary as pretty JSON.
//
// Reports carry counts only (no timestamps, no absolute
// durations) so two runs over the same input write the same
// bytes.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{fs, path::Path};

pub fn save_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;

    tracing::debug!("Saved report to '{}'", path.display());
    Ok(())
}
