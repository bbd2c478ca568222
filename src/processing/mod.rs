pub mod color;
pub mod subsample;
pub mod upsample;

pub use color::{stack_planes, ColorMatrix};
pub use subsample::{subsample_420, SubsampledPlane};
pub use upsample::{RowInterpolatedPlane, SeededPlane};
