//! Reconstruction of a 4:2:0 chroma plane by separable linear interpolation.
//!
//! The two passes are separate types so the column pass can only ever run on
//! a buffer whose even rows have already been completed by the row pass.
//! A missing sample on the last row or column has no far neighbour; it takes
//! half of its near neighbour, i.e. the edge is treated as an implicit zero.

use ndarray::s;

use crate::types::Plane;

/// Full-resolution buffer holding only the retained (even, even) samples; every other position is zero.
#[derive(Clone, Debug, PartialEq)]
pub struct SeededPlane(Plane);

/// Buffer whose even rows are complete; odd rows are still zero.
#[derive(Clone, Debug, PartialEq)]
pub struct RowInterpolatedPlane(Plane);

impl SeededPlane {
    /// `samples` must be ceil(height / 2) x ceil(width / 2).
    pub(crate) fn place(samples: &Plane, height: usize, width: usize) -> Self {
        let mut full = Plane::zeros((height, width));
        full.slice_mut(s![..;2, ..;2]).assign(samples);
        SeededPlane(full)
    }

    pub fn as_plane(&self) -> &Plane {
        &self.0
    }

    /// Fill odd columns of every even row from their left and right neighbours.
    pub fn interpolate_rows(self) -> RowInterpolatedPlane {
        let mut p = self.0;
        let (height, width) = p.dim();

        for i in (0..height).step_by(2) {
            for j in (1..width).step_by(2) {
                p[[i, j]] = if j == width - 1 {
                    p[[i, j - 1]] / 2.0
                } else {
                    (p[[i, j - 1]] + p[[i, j + 1]]) / 2.0
                };
            }
        }

        RowInterpolatedPlane(p)
    }
}

impl RowInterpolatedPlane {
    pub fn as_plane(&self) -> &Plane {
        &self.0
    }

    /// Fill every odd row, column by column, from the rows above and below.
    pub fn interpolate_columns(self) -> Plane {
        let mut p = self.0;
        let (height, width) = p.dim();

        for j in 0..width {
            for i in (1..height).step_by(2) {
                p[[i, j]] = if i == height - 1 {
                    p[[i - 1, j]] / 2.0
                } else {
                    (p[[i - 1, j]] + p[[i + 1, j]]) / 2.0
                };
            }
        }

        p
    }
}
