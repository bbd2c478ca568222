/// Image fidelity scoring: global SSIM per plane, per channel and on luma.

mod similarity;

use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Axis;
use tracing::info;

use crate::error::FidelityError;
use crate::formats;
use crate::processing::ColorMatrix;
use crate::types::{check_rgb_shape, Channel, Image, Plane};

pub use similarity::{default_stability_constant, ssim, SimilarityStatistics, DYNAMIC_RANGE};

/// Fidelity of a compared image against its reference.
#[derive(Clone, Debug, PartialEq)]
pub struct FidelityReport {
    /// SSIM of the R, G, B planes, in that order.
    pub channel_ssim: [f64; 3],
    /// Arithmetic mean of `channel_ssim`.
    pub mean_ssim: f64,
    /// SSIM of the two luma planes under the scorer's color matrix.
    pub luma_ssim: f64,
}

impl FidelityReport {
    pub fn channel(&self, channel: Channel) -> f64 {
        self.channel_ssim[channel.index()]
    }
}

/// The two SSIM stability constants, before scaling by the dynamic range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimilarityConfig {
    pub c1: f64,
    pub c2: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig {
            c1: default_stability_constant(),
            c2: default_stability_constant(),
        }
    }
}

/// SSIM scorer with builder-style configuration.
pub struct SimilarityScorer {
    config: SimilarityConfig,
    matrix: ColorMatrix,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        SimilarityScorer {
            config: SimilarityConfig::default(),
            matrix: ColorMatrix::default(),
        }
    }

    /// Stabilises the luminance term. Independent of `c2`.
    pub fn with_c1(mut self, c1: f64) -> Self {
        self.config.c1 = c1;
        self
    }

    /// Stabilises the contrast-structure term. Independent of `c1`.
    pub fn with_c2(mut self, c2: f64) -> Self {
        self.config.c2 = c2;
        self
    }

    pub fn with_config(mut self, config: SimilarityConfig) -> Self {
        self.config = config;
        self
    }

    /// Color matrix used to derive luma for `report`.
    pub fn with_matrix(mut self, matrix: ColorMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn config(&self) -> SimilarityConfig {
        self.config
    }

    pub fn score_planes(&self, reference: &Plane, compared: &Plane) -> crate::Result<f64> {
        ssim(reference, compared, self.config.c1, self.config.c2)
    }

    /// Score each channel of two (H, W, C) images as an independent plane.
    pub fn score_images(&self, reference: &Image, compared: &Image) -> crate::Result<Vec<f64>> {
        if reference.dim() != compared.dim() {
            return Err(FidelityError::shape_mismatch(
                "similarity images",
                reference.shape(),
                compared.shape(),
            ));
        }
        reference
            .axis_iter(Axis(2))
            .zip(compared.axis_iter(Axis(2)))
            .map(|(r, c)| self.score_planes(&r.to_owned(), &c.to_owned()))
            .collect()
    }

    /// Per-channel and luma SSIM of two RGB images.
    pub fn report(&self, reference: &Image, compared: &Image) -> crate::Result<FidelityReport> {
        check_rgb_shape(reference, 1)?;
        let scores = self.score_images(reference, compared)?;
        let channel_ssim = [scores[0], scores[1], scores[2]];
        let mean_ssim = channel_ssim.iter().sum::<f64>() / 3.0;

        let luma_reference = self.matrix.forward(reference)?.y;
        let luma_compared = self.matrix.forward(compared)?.y;
        let luma_ssim = self.score_planes(&luma_reference, &luma_compared)?;

        Ok(FidelityReport {
            channel_ssim,
            mean_ssim,
            luma_ssim,
        })
    }

    /// Load two grayscale files and score them.
    pub fn score_gray_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, reference: P, compared: Q) -> Result<f64> {
        let reference = formats::read_gray_plane(reference.as_ref())
            .context("Failed to read reference image")?;
        let compared = formats::read_gray_plane(compared.as_ref())
            .context("Failed to read compared image")?;
        let score = self.score_planes(&reference, &compared)?;
        info!(score, "grayscale SSIM");
        Ok(score)
    }

    /// Load two RGB files and produce a report.
    pub fn report_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, reference: P, compared: Q) -> Result<FidelityReport> {
        let reference = formats::read_rgb_image(reference.as_ref())
            .context("Failed to read reference image")?;
        let compared = formats::read_rgb_image(compared.as_ref())
            .context("Failed to read compared image")?;
        let report = self.report(&reference, &compared)?;
        info!(mean_ssim = report.mean_ssim, luma_ssim = report.luma_ssim, "RGB SSIM");
        Ok(report)
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}
