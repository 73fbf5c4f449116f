// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags:
//
//   normalize   merge the raw datasets into the canonical tree
//   blur        move blurry images aside for review
//   duplicates  copy near-duplicate groups aside for review
//
// clap's derive macros generate --help, error messages for
// missing args and string -> number/path conversion.
//
// Each Args struct converts into its application-layer config
// with From, so the application layer never sees clap types.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::blur_use_case::BlurConfig;
use crate::application::duplicate_use_case::DuplicateConfig;
use crate::application::normalize_use_case::NormalizeConfig;
use crate::data::discovery::DatasetLayout;
use crate::data::placer::CollisionPolicy;
use crate::imaging::blur::DEFAULT_BLUR_THRESHOLD;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge raw datasets into output/{train,validation,test}/{food,non_food}
    Normalize(NormalizeArgs),

    /// Move blurry images into a review folder
    Blur(BlurArgs),

    /// Copy groups of visually similar images into review folders
    Duplicates(DuplicateArgs),
}

/// What to do when two source files map to the same output file
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OnCollision {
    /// Abort the run
    Fail,
    /// Keep the first file and continue
    Skip,
}

impl From<OnCollision> for CollisionPolicy {
    fn from(c: OnCollision) -> Self {
        match c {
            OnCollision::Fail => CollisionPolicy::Fail,
            OnCollision::Skip => CollisionPolicy::Skip,
        }
    }
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Input root holding the raw dataset folders
    #[arg(long, default_value = "data/raw")]
    pub input: PathBuf,

    /// Output root for the canonical split/label tree
    #[arg(long, default_value = "data/processed")]
    pub output: PathBuf,

    /// JSON file describing the dataset layouts.
    /// Without it: by_directory (directory-encoded) and
    /// by_filename (filename-encoded) under the input root.
    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OnCollision::Fail)]
    pub on_collision: OnCollision,

    /// Classify and count only; write nothing to the output tree
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON summary of the run here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write a CSV of source -> target for every placed file here
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl NormalizeArgs {
    /// Layouts come in separately: resolving them may mean
    /// reading the --layout file, which can fail.
    pub fn into_config(self, layouts: Vec<DatasetLayout>) -> NormalizeConfig {
        NormalizeConfig {
            input_root:    self.input,
            output_root:   self.output,
            layouts,
            on_collision:  self.on_collision.into(),
            dry_run:       self.dry_run,
            report_path:   self.report,
            manifest_path: self.manifest,
        }
    }
}

#[derive(Args, Debug)]
pub struct BlurArgs {
    /// Folder to scan (recursively)
    #[arg(long)]
    pub src: PathBuf,

    /// Where flagged images go [default: <src>/blurry_review]
    #[arg(long)]
    pub review_dir: Option<PathBuf>,

    /// Laplacian variance below which an image counts as blurry.
    /// Higher flags more images.
    #[arg(long, default_value_t = DEFAULT_BLUR_THRESHOLD)]
    pub threshold: f64,

    /// List blurry images without moving them
    #[arg(long)]
    pub dry_run: bool,
}

impl From<BlurArgs> for BlurConfig {
    fn from(a: BlurArgs) -> Self {
        BlurConfig {
            src:        a.src,
            review_dir: a.review_dir,
            threshold:  a.threshold,
            dry_run:    a.dry_run,
        }
    }
}

#[derive(Args, Debug)]
pub struct DuplicateArgs {
    /// Folder to scan (recursively)
    #[arg(long)]
    pub src: PathBuf,

    /// Where group folders are written [default: <src>/duplicates]
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Max Hamming distance between hashes to count as similar
    #[arg(long, default_value_t = 25)]
    pub threshold: u32,

    /// Hash bits used for bucketing. More bits: faster, but
    /// more near duplicates missed across bucket edges.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(0..=64))]
    pub prefix_bits: u32,
}

impl From<DuplicateArgs> for DuplicateConfig {
    fn from(a: DuplicateArgs) -> Self {
        DuplicateConfig {
            src:         a.src,
            out_dir:     a.out,
            threshold:   a.threshold,
            prefix_bits: a.prefix_bits,
        }
    }
}
