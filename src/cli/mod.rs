// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands off to one use case per subcommand:
//
//   normalize   -> NormalizeUseCase
//   blur        -> BlurReviewUseCase
//   duplicates  -> DuplicateReviewUseCase
//
// This layer only routes and prints the final summary line.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BlurArgs, Commands, DuplicateArgs, NormalizeArgs};

use crate::data::discovery::DatasetLayout;
use crate::infra::layout_store;

#[derive(Parser, Debug)]
#[command(
    name = "food-dataset-prep",
    version,
    about = "Merge raw food / non-food image datasets into one split/label tree, and review raw images for blur and near duplicates."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Normalize(args)  => run_normalize(args),
            Commands::Blur(args)       => run_blur(args),
            Commands::Duplicates(args) => run_duplicates(args),
        }
    }
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    use crate::application::normalize_use_case::NormalizeUseCase;

    let layouts = match &args.layout {
        Some(path) => layout_store::load_layouts(path)?,
        None       => DatasetLayout::defaults(),
    };

    tracing::info!(
        "Normalizing '{}' into '{}'",
        args.input.display(),
        args.output.display()
    );

    let report = NormalizeUseCase::new(args.into_config(layouts)).execute()?;

    let verb = if report.dry_run { "Would place" } else { "Placed" };
    println!(
        "{} {} files ({} already present, {} augmented skipped, {} collisions skipped).",
        verb,
        report.placed,
        report.already_present,
        report.augmented_skipped,
        report.collisions_skipped
    );
    Ok(())
}

fn run_blur(args: BlurArgs) -> Result<()> {
    use crate::application::blur_use_case::BlurReviewUseCase;

    let dry_run = args.dry_run;
    let report  = BlurReviewUseCase::new(args.into()).execute()?;

    let verb = if dry_run { "would be moved" } else { "moved for review" };
    println!("{} of {} images {}.", report.flagged.len(), report.scanned, verb);
    Ok(())
}

fn run_duplicates(args: DuplicateArgs) -> Result<()> {
    use crate::application::duplicate_use_case::DuplicateReviewUseCase;

    let report = DuplicateReviewUseCase::new(args.into()).execute()?;

    println!(
        "{} groups of similar images found in {} images. Review the group folders.",
        report.groups.len(),
        report.scanned
    );
    Ok(())
}
