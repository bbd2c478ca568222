use glam::{DMat3, DVec3};
use ndarray::{Axis, Zip};

use crate::error::{FidelityError, Result};
use crate::types::{check_rgb_shape, Image, Plane, YCbCrPlanes};

/// Rows of the RGB -> YCbCr transform. Luma weights sum to 1, each chroma
/// row sums to 0 so chroma is centred on zero (no +128 offset).
pub const YCBCR_ROWS: [[f64; 3]; 3] = [
    [0.299, 0.587, 0.114],
    [-0.169, -0.331, 0.5],
    [0.5, -0.419, -0.081],
];

/// Fixed 3x3 color transform together with its exact inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorMatrix {
    forward: DMat3,
    inverse: DMat3,
}

impl ColorMatrix {
    /// Build from row-major coefficients. Fails if the matrix cannot be inverted.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self> {
        // glam is column-major: load the rows as columns, then transpose.
        let forward = DMat3::from_cols_array_2d(&rows).transpose();
        let determinant = forward.determinant();
        if !determinant.is_finite() || determinant.abs() <= f64::EPSILON {
            return Err(FidelityError::SingularMatrix { determinant });
        }
        Ok(ColorMatrix {
            forward,
            inverse: forward.inverse(),
        })
    }

    /// Row-major forward coefficients.
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.forward.transpose().to_cols_array_2d()
    }

    /// Row-major coefficients of the inverse (YCbCr -> RGB).
    pub fn inverse_rows(&self) -> [[f64; 3]; 3] {
        self.inverse.transpose().to_cols_array_2d()
    }

    #[inline]
    pub fn to_ycbcr(&self, r: f64, g: f64, b: f64) -> (f64, f64, f64) {
        let v = self.forward * DVec3::new(r, g, b);
        (v.x, v.y, v.z)
    }

    #[inline]
    pub fn to_rgb(&self, y: f64, cb: f64, cr: f64) -> (f64, f64, f64) {
        let v = self.inverse * DVec3::new(y, cb, cr);
        (v.x, v.y, v.z)
    }

    /// Split an (H, W, 3) RGB image into Y, Cb, Cr planes. No clamping.
    pub fn forward(&self, image: &Image) -> Result<YCbCrPlanes> {
        let (height, width) = check_rgb_shape(image, 1)?;
        let mut y = Plane::zeros((height, width));
        let mut cb = Plane::zeros((height, width));
        let mut cr = Plane::zeros((height, width));

        Zip::from(&mut y)
            .and(&mut cb)
            .and(&mut cr)
            .and(image.lanes(Axis(2)))
            .for_each(|y, cb, cr, px| {
                (*y, *cb, *cr) = self.to_ycbcr(px[0], px[1], px[2]);
            });

        Ok(YCbCrPlanes { y, cb, cr })
    }

    /// Recombine Y, Cb, Cr planes into RGB through the exact inverse. No rounding or clamping.
    pub fn inverse(&self, planes: &YCbCrPlanes) -> Result<Image> {
        let (height, width) = planes.dim();
        for (context, plane) in [("Cb plane", &planes.cb), ("Cr plane", &planes.cr)] {
            if plane.dim() != (height, width) {
                return Err(FidelityError::shape_mismatch(context, &[height, width], plane.shape()));
            }
        }

        let mut rgb = Image::zeros((height, width, 3));
        Zip::from(rgb.lanes_mut(Axis(2)))
            .and(&planes.y)
            .and(&planes.cb)
            .and(&planes.cr)
            .for_each(|mut px, &y, &cb, &cr| {
                let (r, g, b) = self.to_rgb(y, cb, cr);
                px[0] = r;
                px[1] = g;
                px[2] = b;
            });

        Ok(rgb)
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        let forward = DMat3::from_cols_array_2d(&YCBCR_ROWS).transpose();
        ColorMatrix {
            forward,
            inverse: forward.inverse(),
        }
    }
}

/// Stack full-resolution luma with reconstructed chroma planes.
pub fn stack_planes(y: Plane, cb: Plane, cr: Plane) -> Result<YCbCrPlanes> {
    YCbCrPlanes::new(y, cb, cr)
}
