// ============================================================
// Layer 5 - Imaging Layer (image crate)
// ============================================================
// The only layer that decodes pixels. The normalize pass never
// opens an image; it only reads names and copies bytes. The two
// review commands need pixel data:
//
//   blur.rs   - Laplacian variance sharpness score
//   phash.rs  - DCT perceptual hash for near-duplicate search
//
// Keeping the image crate behind this layer means the rest of
// the pipeline stays testable with plain byte files.

/// Sharpness scoring and blur detection
pub mod blur;

/// Perceptual hashing
pub mod phash;
