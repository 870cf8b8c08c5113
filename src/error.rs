//! Crate-level error type.
//!
//! The geometry and mechanics layers report their own error enums; the
//! assembly layer folds them into [`CoiloverError`] so callers only deal with
//! two cases: a dimension that cannot describe a buildable coilover, or a
//! mesher that could not produce geometry from otherwise valid numbers.

use thiserror::Error;

use crate::geom::{HelixError, PrimitiveError, SweepError};

pub type CoiloverResult<T> = Result<T, CoiloverError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoiloverError {
    /// A dimension is out of range or inconsistent with another one.
    #[error("invalid dimension `{field}`: {reason}")]
    InvalidDimension { field: &'static str, reason: String },
    /// Geometry could not be generated.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl CoiloverError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            field,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidDimension { field, .. } => Some(*field),
            Self::DegenerateGeometry(_) => None,
        }
    }
}

impl From<PrimitiveError> for CoiloverError {
    fn from(err: PrimitiveError) -> Self {
        Self::DegenerateGeometry(err.to_string())
    }
}

impl From<SweepError> for CoiloverError {
    fn from(err: SweepError) -> Self {
        Self::DegenerateGeometry(err.to_string())
    }
}

impl From<HelixError> for CoiloverError {
    fn from(err: HelixError) -> Self {
        Self::DegenerateGeometry(err.to_string())
    }
}
