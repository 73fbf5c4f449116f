// ============================================================
// Layer 5 - Perceptual Hashing (pHash)
// ============================================================
// Produces a 64-bit fingerprint that survives re-encoding,
// resizing and small edits, so near-identical photos hash to
// nearly identical bit patterns.
//
// Steps:
//   1. Convert to grayscale
//   2. Resize to 32x32 (Lanczos3)
//   3. 2-D DCT-II over the 32x32 block
//   4. Keep the top-left 8x8 coefficients (lowest frequencies)
//   5. Median of those 64 coefficients
//   6. Bit = coefficient > median, read row by row
//
// Only the low frequency block is computed; the rest of the
// DCT would be thrown away anyway.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageResult};
use std::f64::consts::PI;
use std::path::Path;

use crate::domain::hash::PerceptualHash;

const IMG_SIZE:  usize = 32;
const HASH_SIZE: usize = 8;

pub fn phash(img: &DynamicImage) -> PerceptualHash {
    let gray  = img.to_luma8();
    let small = imageops::resize(&gray, IMG_SIZE as u32, IMG_SIZE as u32, FilterType::Lanczos3);

    let pixels: Vec<f64> = small.pixels().map(|p| f64::from(p.0[0])).collect();

    // cos_table[k][n] = cos(pi * k * (2n + 1) / (2N))
    let cos_table: Vec<Vec<f64>> = (0..HASH_SIZE)
        .map(|k| {
            (0..IMG_SIZE)
                .map(|n| (PI * k as f64 * (2 * n + 1) as f64 / (2 * IMG_SIZE) as f64).cos())
                .collect()
        })
        .collect();

    let mut low_freq = Vec::with_capacity(HASH_SIZE * HASH_SIZE);
    for u in 0..HASH_SIZE {
        for v in 0..HASH_SIZE {
            let mut acc = 0.0;
            for row in 0..IMG_SIZE {
                let row_weight = cos_table[u][row];
                for col in 0..IMG_SIZE {
                    acc += pixels[row * IMG_SIZE + col] * row_weight * cos_table[v][col];
                }
            }
            low_freq.push(acc);
        }
    }

    let med = median(&low_freq);
    PerceptualHash::from_bits(low_freq.iter().map(|&c| c > med))
}

pub fn phash_file(path: &Path) -> ImageResult<PerceptualHash> {
    let img = image::open(path)?;
    Ok(phash(&img))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    // Smooth, non-separable scene defined on unit coordinates, so
    // the same scene can be rendered at any size.
    fn scene(w: u32, h: u32, invert: bool) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
            let u = x as f64 / w as f64;
            let t = y as f64 / h as f64;
            let v = 128.0
                + 60.0 * (2.0 * PI * u * 1.3 + 0.5).sin() * (2.0 * PI * t * 0.7).cos()
                + 40.0 * (2.0 * PI * (u + t) * 1.1).sin();
            let v = v.clamp(0.0, 255.0) as u8;
            Luma([if invert { 255 - v } else { v }])
        }))
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_same_image_same_hash() {
        assert_eq!(phash(&scene(64, 64, false)), phash(&scene(64, 64, false)));
    }

    #[test]
    fn test_resized_copy_stays_close() {
        let big   = phash(&scene(128, 128, false));
        let small = phash(&scene(96, 96, false));
        assert!(big.distance(&small) <= 10, "distance {}", big.distance(&small));
    }

    #[test]
    fn test_different_images_differ() {
        // Inverting flips the sign of every AC coefficient
        let a = phash(&scene(64, 64, false));
        let b = phash(&scene(64, 64, true));
        assert!(a.distance(&b) > 40, "distance {}", a.distance(&b));
    }

    #[test]
    fn test_hash_from_file() {
        let tmp  = tempfile::tempdir().unwrap();
        let path = tmp.path().join("g.png");
        scene(40, 40, false).save(&path).unwrap();

        assert_eq!(phash_file(&path).unwrap(), phash(&scene(40, 40, false)));
    }
}
