//! Convenience result type alias for DriveBox.

use crate::error::AppError;

/// A specialized `Result` type for DriveBox operations.
pub type AppResult<T> = Result<T, AppError>;
