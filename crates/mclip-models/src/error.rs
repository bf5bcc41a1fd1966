//! Model parsing and validation errors.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while parsing or validating model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown resolution: {0}")]
    UnknownResolution(String),

    #[error("Unknown camera movement: {0}")]
    UnknownMovement(String),

    #[error("Unknown movement speed: {0}")]
    UnknownSpeed(String),

    #[error("Unknown clip duration: {0}")]
    UnknownDuration(String),

    #[error("Unknown camera preset: {0}")]
    UnknownPreset(String),

    #[error("Intensity must be between {min} and {max}, got {value}")]
    IntensityOutOfRange { value: u8, min: u8, max: u8 },
}
