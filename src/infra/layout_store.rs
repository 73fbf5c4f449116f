// ============================================================
// Layer 6 - Layout File Store
// ============================================================
// Loads dataset layouts from JSON, so a raw data drop
// with different folder names can be described without
// touching the code.
//
// File format:
//   [
//     { "name": "by_directory", "root": "by_directory",
//       "convention": "directory_encoded" },
//     { "name": "by_filename",  "root": "by_filename",
//       "convention": "filename_encoded" }
//   ]
//
// Loading validates the list: at least one layout, and no two
// layouts sharing a name (the name tags every entry).

use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::data::discovery::DatasetLayout;

pub fn load_layouts(path: &Path) -> Result<Vec<DatasetLayout>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read layout file '{}'", path.display()))?;

    let layouts: Vec<DatasetLayout> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid layout file '{}'", path.display()))?;

    validate(&layouts)?;
    tracing::debug!("Loaded {} dataset layouts from '{}'", layouts.len(), path.display());
    Ok(layouts)
}

pub fn validate(layouts: &[DatasetLayout]) -> Result<()> {
    if layouts.is_empty() {
        bail!("At least one dataset layout is required");
    }

    let mut seen = HashSet::new();
    for layout in layouts {
        if !seen.insert(layout.name.as_str()) {
            bail!("Dataset layout name '{}' is used more than once", layout.name);
        }
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::convention::NamingConvention;

    #[test]
    fn test_defaults_round_trip_through_file() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("layouts.json");

        let json = serde_json::to_string_pretty(&DatasetLayout::defaults()).unwrap();
        fs::write(&path, json).unwrap();
        assert_eq!(load_layouts(&path).unwrap(), DatasetLayout::defaults());
    }

    #[test]
    fn test_reads_hand_written_file() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("layouts.json");
        fs::write(
            &path,
            r#"[{"name": "food5k", "root": "Food-5K", "convention": "filename_encoded"}]"#,
        )
        .unwrap();

        let layouts = load_layouts(&path).unwrap();
        assert_eq!(layouts[0].convention, NamingConvention::FilenameEncoded);
        assert_eq!(layouts[0].root, Path::new("Food-5K"));
    }

    #[test]
    fn test_rejects_duplicate_names_and_empty_lists() {
        let dup = vec![
            DatasetLayout::new("a", "x", NamingConvention::DirectoryEncoded),
            DatasetLayout::new("a", "y", NamingConvention::FilenameEncoded),
        ];
        assert!(validate(&dup).is_err());
        assert!(validate(&[]).is_err());
    }

    #[test]
    fn test_unknown_convention_is_rejected() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("layouts.json");
        fs::write(&path, r#"[{"name": "a", "root": "a", "convention": "guess"}]"#).unwrap();
        assert!(load_layouts(&path).is_err());
    }
}
