// ============================================================
// Layer 4 - Classify and Filter
// ============================================================
// Two iterator adapters that sit between discovery and
// placement:
//
//   discover()  ->  classify_entries()  ->  filter_augmented()  ->  place()
//
// Both are lazy and pass errors through untouched, so the
// first naming or IO error reaches the caller as soon as the
// walk hits it.
//
// Augmented copies are dropped because augmentation happens
// in the training pipeline, not on disk.

use crate::domain::entry::{ClassifiedEntry, RawFileEntry};
use crate::domain::error::PrepError;

/// Attach a classification to every discovered entry.
pub fn classify_entries<I>(entries: I) -> impl Iterator<Item = Result<ClassifiedEntry, PrepError>>
where
    I: Iterator<Item = Result<RawFileEntry, PrepError>>,
{
    entries.map(|res| {
        let entry          = res?;
        let classification = entry.classify()?;
        Ok(ClassifiedEntry { entry, classification })
    })
}

/// Drop entries classified as augmented.
pub fn filter_augmented<I>(entries: I) -> impl Iterator<Item = Result<ClassifiedEntry, PrepError>>
where
    I: Iterator<Item = Result<ClassifiedEntry, PrepError>>,
{
    entries.filter(|res| match res {
        Ok(c) if c.classification.is_augmented => {
            tracing::debug!("Skipping augmented copy '{}'", c.entry.path.display());
            false
        }
        _ => true,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::convention::NamingConvention;
    use crate::domain::traits::EntrySource;

    fn entry(name: &str) -> RawFileEntry {
        RawFileEntry::new(format!("raw/by_filename/{name}"), "by_filename", NamingConvention::FilenameEncoded)
    }

    #[test]
    fn test_augmented_entries_are_dropped() {
        let source = vec![
            entry("training_food_1.jpg"),
            entry("training_non_food_2_aug_1.jpg"),
            entry("test_non_food_3.jpg"),
        ];

        let kept: Vec<ClassifiedEntry> = filter_augmented(classify_entries(source.discover()))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|c| !c.classification.is_augmented));
    }

    #[test]
    fn test_naming_errors_pass_through() {
        let source = vec![entry("training_food_1.jpg"), entry("weird.jpg")];
        let results: Vec<_> = filter_augmented(classify_entries(source.discover())).collect();

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PrepError::NamingConvention { .. })));
    }
}
