// ============================================================
// Layer 5 - Blur Detection
// ============================================================
// Scores image sharpness with the variance of the Laplacian.
//
// The Laplacian responds to edges. A sharp photo has strong,
// well defined edges, so its Laplacian response swings widely
// (high variance). A blurry photo has soft edges and the
// response stays close to zero (low variance).
//
//   kernel  [ 0  1  0 ]
//           [ 1 -4  1 ]
//           [ 0  1  0 ]
//
// Borders are handled by reflect-101 (mirror without repeating
// the edge pixel): index -1 reads 1, index n reads n-2.
//
// The threshold is dataset dependent. Higher flags more images.

use image::GrayImage;
use std::path::Path;

/// Threshold used when none is given
pub const DEFAULT_BLUR_THRESHOLD: f64 = 100.0;

/// Population variance of the Laplacian response of `img`.
pub fn laplacian_variance(img: &GrayImage) -> f64 {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }
    let (w, h) = (w as i64, h as i64);

    let px = |x: i64, y: i64| -> f64 {
        let x = reflect101(x, w);
        let y = reflect101(y, h);
        f64::from(img.get_pixel(x, y).0[0])
    };

    let count = (w * h) as f64;
    let mut sum    = 0.0;
    let mut sum_sq = 0.0;

    for y in 0..h {
        for x in 0..w {
            let lap = px(x, y - 1) + px(x - 1, y) + px(x + 1, y) + px(x, y + 1) - 4.0 * px(x, y);
            sum    += lap;
            sum_sq += lap * lap;
        }
    }

    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0)
}

/// True when the file decodes and its Laplacian variance is
/// below `threshold`. Unreadable files are never blurry.
pub fn is_blurry(path: &Path, threshold: f64) -> bool {
    match image::open(path) {
        Ok(img) => {
            let score = laplacian_variance(&img.to_luma8());
            tracing::debug!("Sharpness {:.2} for '{}'", score, path.display());
            score < threshold
        }
        Err(e) => {
            tracing::warn!("Skipping unreadable image '{}': {}", path.display(), e);
            false
        }
    }
}

fn reflect101(i: i64, n: i64) -> u32 {
    let idx = if n == 1 {
        0
    } else if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    };
    idx as u32
}
