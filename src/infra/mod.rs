// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Files the tool reads or writes besides the images
// themselves:
//
//   layout_store.rs - JSON description of the raw dataset
//                     layouts (input side)
//
//   manifest.rs     - CSV with one row per placed image,
//                     source -> target (output side)
//
//   report.rs       - JSON summary counts of a run
//
// None of these are required: with no layout file the
// built-in layouts apply, and manifest and report are only
// written when asked for.

/// Dataset layout JSON loading
pub mod layout_store;

/// Placement manifest CSV writer
pub mod manifest;

/// Run summary JSON writer
pub mod report;
