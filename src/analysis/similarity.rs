/// Global SSIM: one window covering the whole plane.

use ndarray::Zip;

use crate::error::{FidelityError, Result};
use crate::types::Plane;

/// Normalisation applied to both stability constants. Fixed, not derived from the data.
pub const DYNAMIC_RANGE: f64 = 255.0;

/// Default for both stability constants: 1 / sqrt(255).
pub fn default_stability_constant() -> f64 {
    1.0 / DYNAMIC_RANGE.sqrt()
}

/// Means, population variances and cross-covariance of a plane pair.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimilarityStatistics {
    pub mean_reference: f64,
    pub mean_compared: f64,
    pub variance_reference: f64,
    pub variance_compared: f64,
    pub covariance: f64,
}

impl SimilarityStatistics {
    pub fn compute(reference: &Plane, compared: &Plane) -> Result<Self> {
        if reference.dim() != compared.dim() {
            return Err(FidelityError::shape_mismatch(
                "similarity planes",
                reference.shape(),
                compared.shape(),
            ));
        }
        let n = reference.len();
        if n == 0 {
            return Err(FidelityError::DegenerateInput { axis: "samples", len: 0, min: 1 });
        }
        let n = n as f64;

        let (sum_ref, sum_cmp) = Zip::from(reference)
            .and(compared)
            .fold((0.0, 0.0), |(sr, sc), &r, &c| (sr + r, sc + c));
        let mean_reference = sum_ref / n;
        let mean_compared = sum_cmp / n;

        let (ss_ref, ss_cmp, cross) = Zip::from(reference).and(compared).fold(
            (0.0, 0.0, 0.0),
            |(vr, vc, cv), &r, &c| {
                let dr = r - mean_reference;
                let dc = c - mean_compared;
                (vr + dr * dr, vc + dc * dc, cv + dr * dc)
            },
        );

        Ok(SimilarityStatistics {
            mean_reference,
            mean_compared,
            variance_reference: ss_ref / n,
            variance_compared: ss_cmp / n,
            covariance: cross / n,
        })
    }

    /// (2 mu_r mu_c + C1) / (mu_r^2 + mu_c^2 + C1)
    pub fn luminance_term(&self, c1: f64) -> f64 {
        let c1 = scaled(c1);
        (2.0 * self.mean_reference * self.mean_compared + c1)
            / (self.mean_reference.powi(2) + self.mean_compared.powi(2) + c1)
    }

    /// (2 cov + C2) / (var_r + var_c + C2)
    pub fn contrast_structure_term(&self, c2: f64) -> f64 {
        let c2 = scaled(c2);
        (2.0 * self.covariance + c2) / (self.variance_reference + self.variance_compared + c2)
    }

    pub fn ssim(&self, c1: f64, c2: f64) -> f64 {
        self.luminance_term(c1) * self.contrast_structure_term(c2)
    }
}

fn scaled(c: f64) -> f64 {
    (c * DYNAMIC_RANGE).powi(2)
}

/// Global SSIM of two same-shaped planes. Inputs are not modified and may hold
/// any real values; only the shapes are validated.
pub fn ssim(reference: &Plane, compared: &Plane, c1: f64, c2: f64) -> Result<f64> {
    Ok(SimilarityStatistics::compute(reference, compared)?.ssim(c1, c2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (f64, f64) {
        (default_stability_constant(), default_stability_constant())
    }

    fn textured(height: usize, width: usize) -> Plane {
        Plane::from_shape_fn((height, width), |(y, x)| ((y * 13 + x * 7) % 29) as f64 * 8.0)
    }

    #[test]
    fn test_constant_plane_self_similarity() {
        let p = Plane::from_elem((2, 2), 100.0);
        let stats = SimilarityStatistics::compute(&p, &p).unwrap();
        assert_eq!(stats.mean_reference, 100.0);
        assert_eq!(stats.mean_compared, 100.0);
        assert_eq!(stats.variance_reference, 0.0);
        assert_eq!(stats.covariance, 0.0);
        let (c1, c2) = defaults();
        assert!((stats.ssim(c1, c2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_similarity_textured() {
        let p = textured(17, 23);
        let (c1, c2) = defaults();
        let score = ssim(&p, &p, c1, c2).unwrap();
        assert!((score - 1.0).abs() < 1e-12, "SSIM(X, X) = {}", score);
    }

    #[test]
    fn test_shift_keeps_contrast_structure() {
        let reference = Plane::from_shape_vec((2, 2), vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let compared = Plane::from_shape_vec((2, 2), vec![50.0, 60.0, 70.0, 80.0]).unwrap();
        let stats = SimilarityStatistics::compute(&reference, &compared).unwrap();
        assert_eq!(stats.mean_reference, 25.0);
        assert_eq!(stats.mean_compared, 65.0);
        assert_eq!(stats.variance_reference, 125.0);
        assert_eq!(stats.variance_compared, 125.0);
        assert_eq!(stats.covariance, 125.0);

        let (c1, c2) = defaults();
        assert!((stats.contrast_structure_term(c2) - 1.0).abs() < 1e-12);
        let lum = stats.luminance_term(c1);
        assert!(lum < 1.0);
        let score = stats.ssim(c1, c2);
        assert!(score > 0.0 && score < 1.0, "score {}", score);
    }

    #[test]
    fn test_symmetry() {
        let a = textured(9, 11);
        let b = a.mapv(|v| (v * 0.7 + 13.0) % 200.0);
        let (c1, c2) = defaults();
        let ab = ssim(&a, &b, c1, c2).unwrap();
        let ba = ssim(&b, &a, c1, c2).unwrap();
        assert!((ab - ba).abs() < 1e-12, "{} vs {}", ab, ba);
    }

    #[test]
    fn test_score_falls_with_shift() {
        let a = textured(8, 8);
        let (c1, c2) = defaults();
        let mut previous = ssim(&a, &a, c1, c2).unwrap();
        for shift in [10.0, 100.0, 1000.0, 10000.0] {
            let b = a.mapv(|v| v + shift);
            let score = ssim(&a, &b, c1, c2).unwrap();
            assert!(score < previous, "shift {} gave {} (previous {})", shift, score, previous);
            previous = score;
        }
    }

    #[test]
    fn test_negative_samples_allowed() {
        let a = textured(4, 4).mapv(|v| v - 500.0);
        let (c1, c2) = defaults();
        let score = ssim(&a, &a, c1, c2).unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let (c1, c2) = defaults();
        let err = ssim(&Plane::zeros((4, 4)), &Plane::zeros((4, 5)), c1, c2).unwrap_err();
        assert_eq!(
            err,
            FidelityError::ShapeMismatch {
                context: "similarity planes",
                expected: vec![4, 4],
                found: vec![4, 5],
            }
        );
    }

    #[test]
    fn test_constants_are_independent() {
        let reference = Plane::from_shape_vec((2, 2), vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let compared = Plane::from_shape_vec((2, 2), vec![40.0, 10.0, 20.0, 30.0]).unwrap();
        let stats = SimilarityStatistics::compute(&reference, &compared).unwrap();
        let base = stats.ssim(0.01, 0.03);
        assert!(stats.ssim(0.01, 0.5) != base);
        assert_eq!(stats.contrast_structure_term(0.03) * stats.luminance_term(0.5), stats.ssim(0.5, 0.03));
    }
}
