// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between raw dataset folders and the normalized
// output tree. The normalize pass flows in this order:
//
//   dataset roots
//       │
//       ▼
//   DatasetDiscovery   → walks a root, tags each image with its layout
//       │
//       ▼
//   classify_entries   → applies the layout's naming convention
//       │
//       ▼
//   filter_augmented   → drops augmented copies
//       │
//       ▼
//   OutputTree         → copies into output/<split>/<label>/
//
// The review commands reuse discovery (find_image_files) and
// add grouping of perceptual hashes.
//
// Each module does one step and is tested on its own.

/// Walks dataset roots and finds image files
pub mod discovery;

/// Classification and augmentation filtering adapters
pub mod filter;

/// Canonical output tree with collision detection
pub mod placer;

/// Buckets and groups perceptual hashes
pub mod grouping;
