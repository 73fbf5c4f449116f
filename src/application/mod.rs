// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Each use case drives the lower layers through one command:
//
//   normalize   - merge raw datasets into output/<split>/<label>
//   blur        - move blurry images into a review folder
//   duplicates  - copy near-duplicate groups out for review
//
// Rules for this layer:
//   - No clap types (the CLI converts its args into configs)
//   - No naming rules or pixel math (Layers 3 and 5)
//   - Only workflow coordination and progress logging

/// The dataset normalization workflow
pub mod normalize_use_case;

/// Blurry image review workflow
pub mod blur_use_case;

/// Near-duplicate review workflow
pub mod duplicate_use_case;
