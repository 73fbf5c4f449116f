// ============================================================
// Layer 3 - Split and Label
// ============================================================
// The two coordinates of every image in the output tree:
//
//   output/<split>/<label>/<file>
//
// Split:  which training stage consumes the file
// Label:  the binary class the classifier learns
//
// Raw datasets spell these in different ways ("training" vs
// "train"), so parsing accepts a small fixed set of aliases.
// Output always uses the canonical spelling from as_dir().
// Anything outside the alias set is rejected by the caller
// as a naming convention error; we never guess.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Validation, Split::Test];

    /// Parse a raw directory name or filename token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "train" | "training"               => Some(Split::Train),
            "validation" | "valid" | "val"     => Some(Split::Validation),
            "test" | "testing" | "evaluation"  => Some(Split::Test),
            _ => None,
        }
    }

    /// Canonical directory name in the output tree
    pub fn as_dir(&self) -> &'static str {
        match self {
            Split::Train      => "train",
            Split::Validation => "validation",
            Split::Test       => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dir())
    }
}

/// Binary class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Food,
    NonFood,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Food, Label::NonFood];

    /// Parse a directory name. Only the canonical spellings are
    /// accepted here; filename tokens go through parse_tokens().
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "food"     => Some(Label::Food),
            "non_food" => Some(Label::NonFood),
            _ => None,
        }
    }

    /// Parse a label from the front of an underscore-split token list.
    ///
    /// "non_food" contains the delimiter, so it arrives as the two
    /// tokens ["non", "food"].
    pub fn parse_tokens(tokens: &[&str]) -> Option<Self> {
        let lower: Vec<String> = tokens
            .iter()
            .take(2)
            .map(|t| t.to_ascii_lowercase())
            .collect();

        match lower.as_slice() {
            [first, second] if first == "non" && second == "food" => Some(Label::NonFood),
            [first, ..] if first == "food" => Some(Label::Food),
            _ => None,
        }
    }

    pub fn as_dir(&self) -> &'static str {
        match self {
            Label::Food    => "food",
            Label::NonFood => "non_food",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dir())
    }
}
