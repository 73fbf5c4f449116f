// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing what a dataset file IS:
// its split, its label, which naming convention applies,
// and the ways classification or placement can fail.
//
// Rules for this layer:
//   - NO file I/O (paths are inspected, never opened)
//   - NO image decoding
//   - Only structs, enums, traits and pure functions
//
// Everything here is unit-testable without a filesystem.

/// Split and Label enums with their raw-name parsing
pub mod label;

/// Per-dataset classification rules
pub mod convention;

/// Raw file entries and their classification
pub mod entry;

/// Typed domain errors
pub mod error;

/// 64-bit perceptual hash value
pub mod hash;

/// Abstractions the data layer implements
pub mod traits;
