//! Blank-page filter.
//!
//! A page is kept when the variance of its grayscale pixel intensities is
//! above [`BLANK_VARIANCE_THRESHOLD`]. Uniform (blank or near-blank) pages
//! score close to zero. This is a heuristic: scanner noise or a very small
//! rendering can push an empty page over the threshold.

use image::DynamicImage;

/// Variance (in squared 8-bit intensity units) a page must exceed to be kept.
pub const BLANK_VARIANCE_THRESHOLD: f64 = 100.0;

/// Population variance of the image's grayscale intensities.
///
/// Returns `0.0` for an image with no pixels.
pub fn pixel_variance(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let count = gray.as_raw().len();
    if count == 0 {
        return 0.0;
    }

    let n = count as f64;
    let mean = gray.as_raw().iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    gray.as_raw()
        .iter()
        .map(|&v| {
            let d = f64::from(v) - mean;
            d * d
        })
        .sum::<f64>()
        / n
}

/// Whether a rendered page carries visible content.
pub fn is_meaningful(image: &DynamicImage) -> bool {
    exceeds_threshold(pixel_variance(image))
}

/// Threshold test on an already computed variance.
pub fn exceeds_threshold(variance: f64) -> bool {
    variance > BLANK_VARIANCE_THRESHOLD
}
