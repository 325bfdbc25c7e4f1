use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A star value outside `{0.5, 1.0, ..., 5.0}`.
    InvalidRating(f32),
    /// A remote rating that does not map onto the ten point scale.
    InvalidApiRating(f32),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidRating(value) => write!(
                f,
                "invalid rating {value}: expected half stars between 0.5 and 5"
            ),
            ModelError::InvalidApiRating(value) => write!(
                f,
                "invalid remote rating {value}: expected a value between 0.5 and 10"
            ),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
