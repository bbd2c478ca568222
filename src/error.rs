use thiserror::Error;

/// Failures of the numeric core. All of them are precondition failures;
/// nothing here is retried or partially recovered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FidelityError {
    #[error("shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("degenerate input: {axis} has {len} samples, at least {min} required")]
    DegenerateInput {
        axis: &'static str,
        len: usize,
        min: usize,
    },

    #[error("color matrix is not invertible (determinant {determinant})")]
    SingularMatrix { determinant: f64 },
}

impl FidelityError {
    pub(crate) fn shape_mismatch(context: &'static str, expected: &[usize], found: &[usize]) -> Self {
        FidelityError::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FidelityError>;
