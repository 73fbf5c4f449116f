// ============================================================
// Layer 2 - NormalizeUseCase
// ============================================================
// Runs the dataset normalization pass, one dataset layout at a
// time:
//
//   Step 1: Validate layouts and paths        (Layer 6 - infra)
//   Step 2: Discover image files              (Layer 4 - data)
//   Step 3: Classify by naming convention     (Layer 4 - data)
//   Step 4: Drop augmented copies             (Layer 4 - data)
//   Step 5: Copy into output/<split>/<label>  (Layer 4 - data)
//   Step 6: Write manifest and report         (Layer 6 - infra)
//
// Single forward pass, one file at a time. The first error
// aborts the run; whatever was already copied stays on disk
// and a rerun picks up where it stopped (identical files
// already in place are recognised and left alone).

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::data::{
    discovery::{resolve_path, DatasetDiscovery, DatasetLayout},
    filter::{classify_entries, filter_augmented},
    placer::{CollisionPolicy, OutputTree, PlaceOutcome},
};
use crate::domain::label::{Label, Split};
use crate::domain::traits::EntrySource;
use crate::infra::{layout_store, manifest::ManifestWriter, report::save_report};

// ─── Normalize Configuration ─────────────────────────────────────────────────
// Everything one run needs, passed in explicitly. Nothing is
// read from the current directory or the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    pub input_root:    PathBuf,
    pub output_root:   PathBuf,
    pub layouts:       Vec<DatasetLayout>,
    pub on_collision:  CollisionPolicy,
    pub dry_run:       bool,
    pub report_path:   Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input_root:    PathBuf::from("data/raw"),
            output_root:   PathBuf::from("data/processed"),
            layouts:       DatasetLayout::defaults(),
            on_collision:  CollisionPolicy::Fail,
            dry_run:       false,
            report_path:   None,
            manifest_path: None,
        }
    }
}

// ─── Normalize Report ────────────────────────────────────────────────────────
/// Per-dataset discovery counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub discovered:        usize,
    pub augmented_skipped: usize,
}

/// Summary of one run. Invariant:
///   placed + already_present + collisions_skipped
///     == discovered - augmented_skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub dry_run:            bool,
    pub discovered:         usize,
    pub augmented_skipped:  usize,
    pub placed:             usize,
    pub already_present:    usize,
    pub collisions_skipped: usize,
    pub datasets:           BTreeMap<String, DatasetCounts>,
    /// "split/label" -> files in that bucket after this run
    pub buckets:            BTreeMap<String, usize>,
}

impl NormalizeReport {
    fn new(dry_run: bool) -> Self {
        let mut buckets = BTreeMap::new();
        for split in Split::ALL {
            for label in Label::ALL {
                buckets.insert(bucket_key(split, label), 0);
            }
        }
        Self { dry_run, buckets, ..Default::default() }
    }

    fn count_bucket(&mut self, split: Split, label: Label) {
        *self.buckets.entry(bucket_key(split, label)).or_default() += 1;
    }
}

fn bucket_key(split: Split, label: Label) -> String {
    format!("{}/{}", split.as_dir(), label.as_dir())
}

// ─── NormalizeUseCase ─────────────────────────────────────────────────────────
pub struct NormalizeUseCase {
    config: NormalizeConfig,
}

impl NormalizeUseCase {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Run the full discover -> classify -> filter -> place pass.
    pub fn execute(&self) -> Result<NormalizeReport> {
        let cfg = &self.config;

        // ── Step 1: Validate configuration ────────────────────────────────────
        layout_store::validate(&cfg.layouts)?;
        let discoveries: Vec<(DatasetLayout, DatasetDiscovery)> = cfg
            .layouts
            .iter()
            .map(|l| (l.clone(), DatasetDiscovery::new(&cfg.input_root, l.clone())))
            .collect();

        // Output inside an input dataset would be rediscovered by the
        // walk. Compare resolved paths so "a/x/../b" spellings match.
        let output_real = resolve_path(&cfg.output_root)?;
        for (layout, discovery) in &discoveries {
            if output_real.starts_with(resolve_path(discovery.dataset_root())?) {
                bail!(
                    "Output '{}' lies inside dataset '{}' ('{}')",
                    cfg.output_root.display(),
                    layout.name,
                    discovery.dataset_root().display()
                );
            }
        }

        let mut tree     = OutputTree::new(&cfg.output_root, cfg.on_collision, cfg.dry_run);
        let mut report   = NormalizeReport::new(cfg.dry_run);
        let mut manifest = match &cfg.manifest_path {
            Some(path) if !cfg.dry_run => Some(ManifestWriter::create(path)?),
            _ => None,
        };

        if cfg.dry_run {
            tracing::info!("Dry run: nothing will be written under '{}'", cfg.output_root.display());
        }

        for (layout, discovery) in &discoveries {
            tracing::info!(
                "Normalizing dataset '{}' ({:?}) from '{}'",
                layout.name,
                layout.convention,
                discovery.dataset_root().display()
            );

            let mut counts = DatasetCounts::default();

            // ── Steps 2-4: Discover, classify, filter ─────────────────────────
            let kept = filter_augmented(classify_entries(discovery.discover()).inspect(|res| {
                if let Ok(c) = res {
                    counts.discovered += 1;
                    if c.classification.is_augmented {
                        counts.augmented_skipped += 1;
                    }
                }
            }));

            // ── Step 5: Place ─────────────────────────────────────────────────
            for res in kept {
                let c = res.with_context(|| format!("Dataset '{}'", layout.name))?;

                let outcome = tree
                    .place(&c)
                    .with_context(|| format!("Dataset '{}'", layout.name))?;

                match outcome {
                    PlaceOutcome::Copied(target) | PlaceOutcome::WouldCopy(target) => {
                        report.placed += 1;
                        report.count_bucket(c.classification.split, c.classification.label);
                        if let Some(m) = manifest.as_mut() {
                            m.log(&c, &target)?;
                        }
                    }
                    PlaceOutcome::AlreadyPresent(target) => {
                        report.already_present += 1;
                        report.count_bucket(c.classification.split, c.classification.label);
                        if let Some(m) = manifest.as_mut() {
                            m.log(&c, &target)?;
                        }
                    }
                    PlaceOutcome::CollisionSkipped(_) => {
                        report.collisions_skipped += 1;
                    }
                }
            }

            tracing::info!(
                "Dataset '{}': {} discovered, {} augmented skipped",
                layout.name,
                counts.discovered,
                counts.augmented_skipped
            );

            report.discovered        += counts.discovered;
            report.augmented_skipped += counts.augmented_skipped;
            report.datasets.insert(layout.name.clone(), counts);
        }

        // ── Step 6: Manifest and report ───────────────────────────────────────
        if let Some(m) = manifest {
            let rows = m.finish()?;
            tracing::info!("Manifest: {} rows", rows);
        }
        if let Some(path) = &cfg.report_path {
            save_report(path, &report)?;
        }

        tracing::info!(
            "Done: {} placed, {} already present, {} collisions skipped, {} augmented skipped",
            report.placed,
            report.already_present,
            report.collisions_skipped,
            report.augmented_skipped
        );

        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PrepError;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, bytes: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    /// Raw drop with both datasets:
    ///   by_directory: 3 files
    ///   by_filename:  4 files, one augmented, one non-image
    fn raw_drop(root: &Path) {
        let dir = root.join("by_directory");
        write(&dir.join("train/food/d1.jpg"),          b"d1");
        write(&dir.join("validation/non_food/d2.jpg"), b"d2");
        write(&dir.join("test/food/d3.png"),           b"d3");

        let names = root.join("by_filename");
        write(&names.join("training_food_174.jpg"),           b"f1");
        write(&names.join("training_non_food_12.jpg"),        b"f2");
        write(&names.join("training_non_food_12_aug_3.jpg"),  b"f3");
        write(&names.join("evaluation_food_9.jpg"),           b"f4");
        write(&names.join("notes.txt"),                       b"ignored");
    }

    fn config(input: &Path, output: &Path) -> NormalizeConfig {
        NormalizeConfig {
            input_root:  input.to_path_buf(),
            output_root: output.to_path_buf(),
            ..Default::default()
        }
    }

    /// Relative path -> bytes for every file under `root`
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        walkdir::WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_full_pass() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        let out = tmp.path().join("out");
        raw_drop(&raw);

        let report = NormalizeUseCase::new(config(&raw, &out)).execute().unwrap();

        assert_eq!(report.discovered, 7);
        assert_eq!(report.augmented_skipped, 1);
        assert_eq!(report.placed, 6);
        assert_eq!(report.buckets["train/food"], 2);
        assert_eq!(report.buckets["train/non_food"], 1);
        assert_eq!(report.buckets["test/food"], 2);
        assert_eq!(report.buckets["test/non_food"], 0);

        assert!(out.join("train/food/training_food_174.jpg").exists());
        assert!(out.join("test/food/evaluation_food_9.jpg").exists());
        assert!(!out.join("train/non_food/training_non_food_12_aug_3.jpg").exists());

        // Completeness
        assert_eq!(snapshot(&out).len(), report.discovered - report.augmented_skipped);
        // Sources untouched
        assert!(raw.join("by_filename/training_non_food_12_aug_3.jpg").exists());
    }

    #[test]
    fn test_two_runs_give_identical_trees() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);

        let out_a = tmp.path().join("out_a");
        let out_b = tmp.path().join("out_b");
        NormalizeUseCase::new(config(&raw, &out_a)).execute().unwrap();
        NormalizeUseCase::new(config(&raw, &out_b)).execute().unwrap();

        assert_eq!(snapshot(&out_a), snapshot(&out_b));
    }

    #[test]
    fn test_rerun_into_populated_output() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        let out = tmp.path().join("out");
        raw_drop(&raw);

        NormalizeUseCase::new(config(&raw, &out)).execute().unwrap();
        let second = NormalizeUseCase::new(config(&raw, &out)).execute().unwrap();

        assert_eq!(second.placed, 0);
        assert_eq!(second.already_present, 6);
    }

    #[test]
    fn test_malformed_name_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);
        write(&raw.join("by_filename/weird.jpg"), b"?");

        let err = NormalizeUseCase::new(config(&raw, &tmp.path().join("out")))
            .execute()
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::NamingConvention { .. })
        ));
    }

    #[test]
    fn test_cross_dataset_collision() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);
        // Same bucket and name as the filename-encoded dataset's file
        write(&raw.join("by_directory/train/food/training_food_174.jpg"), b"other");

        let err = NormalizeUseCase::new(config(&raw, &tmp.path().join("out")))
            .execute()
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::DuplicateFile { .. })));

        let mut cfg = config(&raw, &tmp.path().join("out_skip"));
        cfg.on_collision = CollisionPolicy::Skip;
        let report = NormalizeUseCase::new(cfg).execute().unwrap();

        assert_eq!(report.collisions_skipped, 1);
        assert_eq!(
            report.placed + report.collisions_skipped,
            report.discovered - report.augmented_skipped
        );
    }

    #[test]
    fn test_dry_run_and_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);

        let mut cfg = config(&raw, &tmp.path().join("out"));
        cfg.dry_run       = true;
        cfg.report_path   = Some(tmp.path().join("report.json"));
        cfg.manifest_path = Some(tmp.path().join("manifest.csv"));
        let report = NormalizeUseCase::new(cfg).execute().unwrap();

        assert_eq!(report.placed, 6);
        assert!(!tmp.path().join("out").exists());
        assert!(!tmp.path().join("manifest.csv").exists());

        let saved: NormalizeReport =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(saved, report);
    }

    #[test]
    fn test_manifest_lists_placed_files() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);

        let mut cfg = config(&raw, &tmp.path().join("out"));
        cfg.manifest_path = Some(tmp.path().join("manifest.csv"));
        NormalizeUseCase::new(cfg).execute().unwrap();

        let text = fs::read_to_string(tmp.path().join("manifest.csv")).unwrap();
        // Header plus one row per placed file
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("train,food,by_filename,"));
    }

    #[test]
    fn test_output_inside_dataset_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);

        let result = NormalizeUseCase::new(config(&raw, &raw.join("by_filename/out"))).execute();
        assert!(result.is_err());
    }

    #[test]
    fn test_output_inside_dataset_via_parent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        raw_drop(&raw);

        let sneaky = raw.join("x/../by_filename/out");
        let result = NormalizeUseCase::new(config(&raw, &sneaky)).execute();

        assert!(result.is_err());
        // Rejected before anything was copied
        assert!(!raw.join("by_filename/out").exists());
    }

    #[test]
    fn test_missing_dataset_root_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        write(&raw.join("by_directory/train/food/a.jpg"), b"a");

        let err = NormalizeUseCase::new(config(&raw, &tmp.path().join("out")))
            .execute()
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<PrepError>(), Some(PrepError::Io { .. })));
    }
}
