// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Result type for phosphene engine operations
pub type PhospheneResult<T> = Result<T, PhospheneError>;

/// Errors that can occur while building simulators or processing frames
#[derive(Debug, thiserror::Error)]
pub enum PhospheneError {
    /// An input array does not have the shape the operation was configured for
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Rejected at construction time, never deferred to the first frame
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl PhospheneError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PhospheneError::InvalidConfiguration(msg.into())
    }

    /// Fails with `ShapeMismatch` unless `actual == expected`
    pub(crate) fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> PhospheneResult<()> {
        if expected != actual {
            return Err(PhospheneError::ShapeMismatch { expected, actual });
        }
        Ok(())
    }
}

impl From<image::ImageError> for PhospheneError {
    fn from(err: image::ImageError) -> Self {
        PhospheneError::Image(err.to_string())
    }
}

impl From<phosphene_config::ConfigError> for PhospheneError {
    fn from(err: phosphene_config::ConfigError) -> Self {
        PhospheneError::InvalidConfiguration(err.to_string())
    }
}
