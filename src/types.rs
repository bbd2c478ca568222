use ndarray::{Array2, Array3};

use crate::error::{FidelityError, Result};

/// RGB image laid out as (height, width, channel), channel order R, G, B.
pub type Image = Array3<f64>;

/// Single channel: luma, one chroma plane, or a grayscale comparison image.
pub type Plane = Array2<f64>;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Index along the channel axis of an `Image`.
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Luma and the two chroma planes of one image, all sharing a shape.
#[derive(Clone, Debug, PartialEq)]
pub struct YCbCrPlanes {
    pub y: Plane,
    pub cb: Plane,
    pub cr: Plane,
}

impl YCbCrPlanes {
    /// Bundle three planes, refusing to pair planes of different shapes.
    pub fn new(y: Plane, cb: Plane, cr: Plane) -> Result<Self> {
        for (context, plane) in [("Cb plane", &cb), ("Cr plane", &cr)] {
            if plane.dim() != y.dim() {
                return Err(FidelityError::shape_mismatch(context, y.shape(), plane.shape()));
            }
        }
        Ok(YCbCrPlanes { y, cb, cr })
    }

    /// (height, width) shared by all three planes.
    pub fn dim(&self) -> (usize, usize) {
        self.y.dim()
    }
}

/// Check that an image is (H, W, 3) with both spatial axes holding at least `min_len` samples.
pub fn check_rgb_shape(image: &Image, min_len: usize) -> Result<(usize, usize)> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(FidelityError::shape_mismatch(
            "RGB image",
            &[height, width, 3],
            image.shape(),
        ));
    }
    check_spatial(height, width, min_len)?;
    Ok((height, width))
}

pub(crate) fn check_spatial(height: usize, width: usize, min_len: usize) -> Result<()> {
    if height < min_len {
        return Err(FidelityError::DegenerateInput { axis: "height", len: height, min: min_len });
    }
    if width < min_len {
        return Err(FidelityError::DegenerateInput { axis: "width", len: width, min: min_len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planes_must_agree() {
        let y = Plane::zeros((4, 4));
        let cb = Plane::zeros((4, 4));
        let cr = Plane::zeros((4, 3));
        let err = YCbCrPlanes::new(y, cb, cr).unwrap_err();
        assert!(matches!(err, FidelityError::ShapeMismatch { context: "Cr plane", .. }));
    }

    #[test]
    fn test_rgb_shape_checks() {
        assert_eq!(check_rgb_shape(&Image::zeros((3, 5, 3)), 2).unwrap(), (3, 5));
        assert!(matches!(
            check_rgb_shape(&Image::zeros((3, 5, 4)), 2),
            Err(FidelityError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            check_rgb_shape(&Image::zeros((1, 5, 3)), 2),
            Err(FidelityError::DegenerateInput { axis: "height", len: 1, min: 2 })
        ));
    }
}
