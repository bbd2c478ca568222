use ndarray::Array2;
use num_traits::Zero;

use crate::error::{FidelityError, Result};
use crate::processing::upsample::SeededPlane;
use crate::types::{check_spatial, Plane};

/// Keep every `factor`-th sample along both axes, starting at index 0.
/// A trailing partial stride still contributes its first sample, so the
/// output is ceil(H / factor) x ceil(W / factor).
pub fn decimate<T: Copy + Zero>(data: &Array2<T>, factor: usize) -> Array2<T> {
    if factor <= 1 {
        return data.clone();
    }

    let (height, width) = data.dim();
    let new_height = height.div_ceil(factor);
    let new_width = width.div_ceil(factor);

    let mut result = Array2::zeros((new_height, new_width));

    for y in 0..new_height {
        for x in 0..new_width {
            result[[y, x]] = data[[y * factor, x * factor]];
        }
    }

    result
}

/// Chroma plane after 4:2:0 decimation: the retained (even, even) samples
/// plus the full-resolution shape they were taken from.
#[derive(Clone, Debug, PartialEq)]
pub struct SubsampledPlane {
    samples: Plane,
    height: usize,
    width: usize,
}

impl SubsampledPlane {
    /// Reassemble from stored samples and the original shape.
    pub fn from_parts(samples: Plane, height: usize, width: usize) -> Result<Self> {
        check_spatial(height, width, 2)?;
        let expected = [height.div_ceil(2), width.div_ceil(2)];
        if samples.shape() != expected {
            return Err(FidelityError::shape_mismatch("subsampled plane", &expected, samples.shape()));
        }
        Ok(SubsampledPlane { samples, height, width })
    }

    pub fn samples(&self) -> &Plane {
        &self.samples
    }

    /// Full-resolution (height, width) this plane reconstructs to.
    pub fn full_dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Place the retained samples on a zeroed full-resolution grid.
    pub fn seed(&self) -> SeededPlane {
        SeededPlane::place(&self.samples, self.height, self.width)
    }

    /// Seed, then fill rows, then fill columns.
    pub fn reconstruct(&self) -> Plane {
        self.seed().interpolate_rows().interpolate_columns()
    }
}

/// 4:2:0 decimation of a full-resolution chroma plane. Luma never goes through here.
pub fn subsample_420(plane: &Plane) -> Result<SubsampledPlane> {
    let (height, width) = plane.dim();
    check_spatial(height, width, 2)?;
    Ok(SubsampledPlane {
        samples: decimate(plane, 2),
        height,
        width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimate_even() {
        let data = Array2::from_shape_fn((100, 100), |(y, x)| (y * 100 + x) as u16);
        let out = decimate(&data, 2);
        assert_eq!(out.dim(), (50, 50));
        assert_eq!(out[[0, 0]], data[[0, 0]]);
        assert_eq!(out[[1, 1]], data[[2, 2]]);
    }

    #[test]
    fn test_decimate_odd_keeps_last_row_and_column() {
        let data = Array2::from_shape_fn((5, 3), |(y, x)| (y * 10 + x) as f64);
        let out = decimate(&data, 2);
        assert_eq!(out.dim(), (3, 2));
        assert_eq!(out[[2, 1]], data[[4, 2]]);
    }

    #[test]
    fn test_subsample_keeps_even_positions() {
        let plane = Plane::from_shape_fn((4, 6), |(y, x)| (y * 6 + x) as f64);
        let sub = subsample_420(&plane).unwrap();
        assert_eq!(sub.full_dim(), (4, 6));
        assert_eq!(sub.samples().dim(), (2, 3));
        for ((y, x), &v) in sub.samples().indexed_iter() {
            assert_eq!(v, plane[[2 * y, 2 * x]]);
        }
    }

    #[test]
    fn test_subsample_rejects_thin_planes() {
        let err = subsample_420(&Plane::zeros((1, 8))).unwrap_err();
        assert_eq!(err, FidelityError::DegenerateInput { axis: "height", len: 1, min: 2 });
        let err = subsample_420(&Plane::zeros((8, 1))).unwrap_err();
        assert_eq!(err, FidelityError::DegenerateInput { axis: "width", len: 1, min: 2 });
    }

    #[test]
    fn test_from_parts_validates_grid() {
        assert!(SubsampledPlane::from_parts(Plane::zeros((2, 3)), 4, 5).is_ok());
        assert!(matches!(
            SubsampledPlane::from_parts(Plane::zeros((2, 2)), 4, 5),
            Err(FidelityError::ShapeMismatch { .. })
        ));
    }
}
