// ============================================================
// Layer 3 - Dataset Naming Conventions
// ============================================================
// Each source dataset encodes split and label differently.
// A convention is a pure function:
//
//   path  ->  (split, label, is_augmented)
//
// DirectoryEncoded
//   <root>/<split>/<label>/<file>
//   e.g. by_directory/validation/non_food/img_0042.jpg
//   The two enclosing folder names carry split and label.
//   This dataset ships no augmented copies.
//
// FilenameEncoded
//   <split>_<label>_<id>[_aug_<n>].<ext>
//   e.g. training_food_174.jpg
//        training_non_food_12_aug_3.jpg
//   The file stem is split on '_'. Token 0 is the split, the
//   next token(s) the label ("non_food" spans two tokens), and
//   an "aug" token anywhere marks an augmented copy.
//
// Positions and the delimiter are fixed. A file that does not
// fit is an error, never a best guess.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::entry::{file_name_of, Classification};
use crate::domain::error::PrepError;
use crate::domain::label::{Label, Split};

const TOKEN_DELIMITER: char = '_';
const AUGMENTED_TOKEN: &str = "aug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    DirectoryEncoded,
    FilenameEncoded,
}

impl NamingConvention {
    pub fn classify(&self, path: &Path) -> Result<Classification, PrepError> {
        match self {
            NamingConvention::DirectoryEncoded => classify_by_directory(path),
            NamingConvention::FilenameEncoded  => classify_by_filename(path),
        }
    }
}

fn classify_by_directory(path: &Path) -> Result<Classification, PrepError> {
    let label_dir = path.parent();
    let split_dir = label_dir.and_then(Path::parent);

    let label_name = label_dir
        .and_then(|d| d.file_name())
        .and_then(|n| n.to_str())
        .ok_or_else(|| PrepError::naming(path, "no enclosing label directory"))?;

    let split_name = split_dir
        .and_then(|d| d.file_name())
        .and_then(|n| n.to_str())
        .ok_or_else(|| PrepError::naming(path, "no enclosing split directory"))?;

    let label = Label::parse(label_name).ok_or_else(|| {
        PrepError::naming(path, format!("unrecognised label directory '{label_name}'"))
    })?;
    let split = Split::parse(split_name).ok_or_else(|| {
        PrepError::naming(path, format!("unrecognised split directory '{split_name}'"))
    })?;

    Ok(Classification { split, label, is_augmented: false })
}

fn classify_by_filename(path: &Path) -> Result<Classification, PrepError> {
    let name = file_name_of(path)?
        .to_str()
        .ok_or_else(|| PrepError::naming(path, "file name is not valid UTF-8"))?;

    // Strip the extension only; ids may themselves contain dots
    let stem = match name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => name,
    };

    let tokens: Vec<&str> = stem.split(TOKEN_DELIMITER).collect();

    let split = Split::parse(tokens[0]).ok_or_else(|| {
        PrepError::naming(path, format!("unrecognised split token '{}'", tokens[0]))
    })?;

    let label = Label::parse_tokens(&tokens[1..]).ok_or_else(|| {
        PrepError::naming(path, format!("no label token after '{}'", tokens[0]))
    })?;

    let is_augmented = tokens
        .iter()
        .any(|t| t.eq_ignore_ascii_case(AUGMENTED_TOKEN));

    Ok(Classification { split, label, is_augmented })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn by_name(name: &str) -> Result<Classification, PrepError> {
        NamingConvention::FilenameEncoded.classify(&PathBuf::from("raw/by_filename").join(name))
    }

    #[test]
    fn test_plain_filename() {
        let c = by_name("training_food_174.jpg").unwrap();
        assert_eq!(c.split, Split::Train);
        assert_eq!(c.label, Label::Food);
        assert!(!c.is_augmented);
    }

    #[test]
    fn test_non_food_spans_two_tokens() {
        let c = by_name("validation_non_food_9.png").unwrap();
        assert_eq!(c.split, Split::Validation);
        assert_eq!(c.label, Label::NonFood);
        assert!(!c.is_augmented);
    }

    #[test]
    fn test_augmented_filenames() {
        for name in [
            "training_non_food_12_aug_3.jpg",
            "test_non_food_1_aug_0.jpeg",
            "training_food_5_AUG_1.jpg",
        ] {
            assert!(by_name(name).unwrap().is_augmented, "{name}");
        }
    }

    #[test]
    fn test_malformed_filename_is_an_error() {
        for name in ["weird.jpg", "training.jpg", "training_snack_1.jpg", "_food_1.jpg"] {
            match by_name(name) {
                Err(PrepError::NamingConvention { .. }) => {}
                other => panic!("{name}: expected naming error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_directory_encoded_food() {
        for split in ["train", "validation", "test"] {
            let path = PathBuf::from("raw/by_directory").join(split).join("food").join("x_aug_1.jpg");
            let c = NamingConvention::DirectoryEncoded.classify(&path).unwrap();
            assert_eq!(c.label, Label::Food);
            // Filename tokens mean nothing to this convention
            assert!(!c.is_augmented);
        }
    }

    #[test]
    fn test_directory_encoded_rejects_unknown_folders() {
        let bad_label = PathBuf::from("raw/by_directory/train/snacks/1.jpg");
        assert!(NamingConvention::DirectoryEncoded.classify(&bad_label).is_err());

        let bad_split = PathBuf::from("raw/by_directory/extra/food/1.jpg");
        assert!(NamingConvention::DirectoryEncoded.classify(&bad_split).is_err());

        let too_shallow = PathBuf::from("1.jpg");
        assert!(NamingConvention::DirectoryEncoded.classify(&too_shallow).is_err());
    }
}
