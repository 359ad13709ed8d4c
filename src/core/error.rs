//! Crate error type.
use std::fmt;
use thiserror::Error;
use super::numeric::Float;

/// Which abscissa array of an interpolation call failed an ordering check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Abscissa {
    Input,
    Output,
}

impl fmt::Display for Abscissa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Abscissa::Input => write!(f, "input"),
            Abscissa::Output => write!(f, "output"),
        }
    }
}

/// Precondition violations detected at the entry of an operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Wrong array rank or size.
    #[error("shape mismatch: {context}")]
    Shape { context: String },

    /// An input quaternion is not unit length.
    #[error("quaternion {index} has norm {norm}, not unit length within {tolerance:e}")]
    Precision { index: usize, norm: Float, tolerance: Float },

    /// Abscissas are not non-decreasing.
    #[error("{abscissa} abscissas are not non-decreasing at index {index}")]
    Order { abscissa: Abscissa, index: usize },

    #[error("no time series named `{0}`")]
    MissingSeries(String),
}

impl Error {
    pub fn shape<S: Into<String>>(context: S) -> Error {
        Error::Shape { context: context.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fail with a shape error unless two batches have the same length.
pub fn check_same_len(what: &str, a: usize, b: usize) -> Result<()> {
    if a != b {
        return Err(Error::shape(format!("{} have different lengths ({} and {})", what, a, b)));
    }
    Ok(())
}
