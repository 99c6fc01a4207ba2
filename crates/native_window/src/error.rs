//! Window management errors

use crate::WindowHandle;
use thiserror::Error;

/// Errors raised while creating or tracking native windows
///
/// Only [`WindowSystem::try_create_window`](crate::WindowSystem::try_create_window)
/// returns these directly. Every other public operation folds them into a
/// sentinel value and a log record.
#[derive(Error, Debug)]
pub enum WindowError {
    /// The native windowing service could not be reached
    #[error("Window backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The OS rejected the window creation request
    #[error("Window creation failed: {0}")]
    CreationFailed(String),

    /// Width or height was zero
    #[error("Invalid window dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// The registry already holds a record for this handle
    #[error("Window {0} is already registered")]
    DuplicateHandle(WindowHandle),

    /// The current platform has no implementation for the operation
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;
