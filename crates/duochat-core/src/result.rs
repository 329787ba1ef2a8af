//! Convenience result type alias for duochat.

use crate::error::AppError;

/// A specialized `Result` type for duochat operations.
pub type AppResult<T> = Result<T, AppError>;
