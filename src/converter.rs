use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::{FidelityReport, SimilarityConfig, SimilarityScorer};
use crate::formats;
use crate::output::{self, JpegConfig};
use crate::pipeline::{self, Reconstruction};
use crate::processing::ColorMatrix;
use crate::types::Image;

/// File-level front end: load, subsample and reconstruct, score, save.
pub struct ChromaConverter {
    matrix: ColorMatrix,
    similarity: SimilarityConfig,
    quality: u8,
}

/// A reconstruction together with its fidelity against the source image.
pub struct Evaluation {
    pub original: Image,
    pub reconstruction: Reconstruction,
    pub report: FidelityReport,
}

impl ChromaConverter {
    pub fn new() -> Self {
        ChromaConverter {
            matrix: ColorMatrix::default(),
            similarity: SimilarityConfig::default(),
            quality: 95,
        }
    }

    pub fn with_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_stability_constants(mut self, c1: f64, c2: f64) -> Self {
        self.similarity = SimilarityConfig { c1, c2 };
        self
    }

    /// JPEG quality for `convert` when the output is a JPEG.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::new()
            .with_config(self.similarity)
            .with_matrix(self.matrix)
    }

    /// Reconstruct an in-memory image and score the result against it.
    pub fn evaluate_image(&self, image: Image) -> Result<Evaluation> {
        let reconstruction = pipeline::subsample_and_reconstruct(&image, &self.matrix)?;
        let report = self.scorer().report(&image, &reconstruction.rgb)?;
        Ok(Evaluation {
            original: image,
            reconstruction,
            report,
        })
    }

    /// Load an image file and run the subsample/reconstruct pipeline on it.
    pub fn process<P: AsRef<Path>>(&self, input_path: P) -> Result<Reconstruction> {
        let image = formats::read_rgb_image(input_path.as_ref())?;
        pipeline::subsample_and_reconstruct(&image, &self.matrix)
            .context("Chroma reconstruction failed")
    }

    /// Load, reconstruct and score an image file.
    pub fn evaluate<P: AsRef<Path>>(&self, input_path: P) -> Result<Evaluation> {
        let input_path = input_path.as_ref();
        let image = formats::read_rgb_image(input_path)?;
        let evaluation = self
            .evaluate_image(image)
            .with_context(|| format!("Evaluation of {} failed", input_path.display()))?;
        info!(
            path = %input_path.display(),
            mean_ssim = evaluation.report.mean_ssim,
            "evaluated"
        );
        Ok(evaluation)
    }

    /// Reconstruct an image file, save the result and return its fidelity report.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<FidelityReport> {
        let evaluation = self.evaluate(&input_path)?;

        output::save_image(
            &evaluation.reconstruction.rgb,
            output_path.as_ref(),
            JpegConfig { quality: self.quality },
        )
        .context("Image save failed")?;

        Ok(evaluation.report)
    }
}

impl Default for ChromaConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_gray_image_is_perfect() {
        let image = Image::from_shape_fn((6, 5, 3), |(y, x, _)| (y * 30 + x * 7) as f64);
        let evaluation = ChromaConverter::new().evaluate_image(image).unwrap();
        assert!((evaluation.report.mean_ssim - 1.0).abs() < 1e-9);
        assert_eq!(evaluation.reconstruction.rgb.dim(), (6, 5, 3));
    }

    #[test]
    fn test_evaluate_colored_image_loses_fidelity() {
        // Alternating red/blue columns: chroma detail the 4:2:0 grid cannot hold.
        let image = Image::from_shape_fn((8, 8, 3), |(_, x, c)| match (x % 2, c) {
            (0, 0) | (1, 2) => 255.0,
            _ => 0.0,
        });
        let evaluation = ChromaConverter::new().evaluate_image(image).unwrap();
        assert!(evaluation.report.mean_ssim < 0.99, "{}", evaluation.report.mean_ssim);
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(ChromaConverter::new().with_quality(0).quality, 1);
        assert_eq!(ChromaConverter::new().with_quality(200).quality, 100);
    }
}
