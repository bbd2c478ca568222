use tracing::debug;

use crate::error::Result;
use crate::processing::{stack_planes, subsample_420, ColorMatrix, SubsampledPlane};
use crate::types::{check_rgb_shape, Image, YCbCrPlanes};

/// Every intermediate of one subsample/reconstruct run.
pub struct Reconstruction {
    /// Forward transform of the input, before any subsampling.
    pub ycbcr: YCbCrPlanes,
    pub cb_subsampled: SubsampledPlane,
    pub cr_subsampled: SubsampledPlane,
    /// Original luma with the two reconstructed chroma planes.
    pub reconstructed_ycbcr: YCbCrPlanes,
    /// Inverse transform of `reconstructed_ycbcr`. Not rounded or clamped.
    pub rgb: Image,
}

/// RGB -> YCbCr, 4:2:0 chroma decimation, interpolated reconstruction, YCbCr -> RGB.
///
/// The image must be (H, W, 3) with H, W >= 2.
pub fn subsample_and_reconstruct(image: &Image, matrix: &ColorMatrix) -> Result<Reconstruction> {
    let (height, width) = check_rgb_shape(image, 2)?;
    debug!(height, width, "color transform");

    let ycbcr = matrix.forward(image)?;

    let cb_subsampled = subsample_420(&ycbcr.cb)?;
    let cr_subsampled = subsample_420(&ycbcr.cr)?;
    debug!(
        chroma_height = cb_subsampled.samples().nrows(),
        chroma_width = cb_subsampled.samples().ncols(),
        "chroma subsampled"
    );

    let cb = cb_subsampled.reconstruct();
    let cr = cr_subsampled.reconstruct();
    let reconstructed_ycbcr = stack_planes(ycbcr.y.clone(), cb, cr)?;

    let rgb = matrix.inverse(&reconstructed_ycbcr)?;
    debug!("reconstruction complete");

    Ok(Reconstruction {
        ycbcr,
        cb_subsampled,
        cr_subsampled,
        reconstructed_ycbcr,
        rgb,
    })
}

/// Forward then inverse transform with nothing discarded in between.
pub fn round_trip(image: &Image, matrix: &ColorMatrix) -> Result<Image> {
    let planes = matrix.forward(image)?;
    matrix.inverse(&planes)
}
