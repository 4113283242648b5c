//! Label photo preprocessing for OCR
//!
//! Printed dates are often small, low-contrast and embossed. Before handing
//! a photo to the OCR engine we boost contrast, smooth sensor noise,
//! binarize and clear isolated specks.

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{equalize_histogram, otsu_level, threshold_mut, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::open;
use std::path::Path;
use tracing::{debug, info};

use crate::config::PreprocessSettings;

/// Result of preprocessing a label photo
pub struct PreprocessResult {
    /// Processed grayscale image
    pub image: GrayImage,
    /// Binarization level chosen by Otsu's method, if binarization ran
    pub threshold: Option<u8>,
}

/// Apply the preprocessing pipeline to a decoded image
pub fn preprocess_label(image: &DynamicImage, settings: &PreprocessSettings) -> PreprocessResult {
    let mut gray = image.to_luma8();

    if !settings.enabled {
        debug!("Label preprocessing disabled");
        return PreprocessResult {
            image: gray,
            threshold: None,
        };
    }

    debug!(
        "Label preprocessing: equalize={}, blur_sigma={}, open_radius={}",
        settings.equalize, settings.blur_sigma, settings.open_radius
    );

    if settings.equalize {
        gray = equalize_histogram(&gray);
    }

    // gaussian_blur_f32 panics on non-positive sigma
    if settings.blur_sigma > 0.01 {
        gray = gaussian_blur_f32(&gray, settings.blur_sigma);
    }

    let level = otsu_level(&gray);
    threshold_mut(&mut gray, level, ThresholdType::Binary);

    if settings.open_radius > 0 {
        gray = open(&gray, Norm::LInf, settings.open_radius);
    }

    PreprocessResult {
        image: gray,
        threshold: Some(level),
    }
}

/// Load `input`, preprocess it and write the result to `output`
pub fn preprocess_file(input: &Path, output: &Path, settings: &PreprocessSettings) -> Result<PreprocessResult> {
    let image = image::open(input)
        .with_context(|| format!("Failed to load label image: {:?}", input))?;

    let result = preprocess_label(&image, settings);

    result
        .image
        .save(output)
        .with_context(|| format!("Failed to write preprocessed image: {:?}", output))?;

    info!(
        "Preprocessed {:?} -> {:?} ({}x{}, threshold {:?})",
        input,
        output,
        result.image.width(),
        result.image.height(),
        result.threshold
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| Luma([(x * 255 / (width - 1)) as u8]));
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_disabled_returns_grayscale() {
        let settings = PreprocessSettings {
            enabled: false,
            ..PreprocessSettings::default()
        };
        let input = gradient(8, 4);

        let result = preprocess_label(&input, &settings);

        assert!(result.threshold.is_none());
        assert_eq!(result.image, input.to_luma8());
    }

    #[test]
    fn test_output_is_binary() {
        let result = preprocess_label(&gradient(16, 16), &PreprocessSettings::default());

        assert!(result.threshold.is_some());
        assert!(result.image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_dimensions_preserved() {
        let result = preprocess_label(&gradient(20, 10), &PreprocessSettings::default());
        assert_eq!(result.image.dimensions(), (20, 10));
    }

    #[test]
    fn test_color_input_accepted() {
        let rgb = image::RgbImage::from_fn(6, 6, |x, y| image::Rgb([(x * 40) as u8, (y * 40) as u8, 30]));
        let result = preprocess_label(&DynamicImage::ImageRgb8(rgb), &PreprocessSettings::default());
        assert_eq!(result.image.dimensions(), (6, 6));
    }

    #[test]
    fn test_binarize_splits_at_otsu_level() {
        let settings = PreprocessSettings {
            equalize: false,
            blur_sigma: 0.0,
            open_radius: 0,
            ..PreprocessSettings::default()
        };
        let input = gradient(16, 1);

        let result = preprocess_label(&input, &settings);
        let level = result.threshold.unwrap();

        for (src, dst) in input.to_luma8().pixels().zip(result.image.pixels()) {
            let expected = if src.0[0] > level { 255 } else { 0 };
            assert_eq!(dst.0[0], expected);
        }
    }

    #[test]
    fn test_preprocess_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("label.png");
        let output = dir.path().join("label_clean.png");
        gradient(12, 12).save(&input).unwrap();

        let result = preprocess_file(&input, &output, &PreprocessSettings::default()).unwrap();

        assert!(output.exists());
        let written = image::open(&output).unwrap().to_luma8();
        assert_eq!(written, result.image);
    }

    #[test]
    fn test_preprocess_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = preprocess_file(
            &dir.path().join("missing.png"),
            &dir.path().join("out.png"),
            &PreprocessSettings::default(),
        );
        assert!(result.is_err());
    }
}
