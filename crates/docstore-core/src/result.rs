//! Convenience result type alias for the document store.

use crate::error::AppError;

/// A specialized `Result` type for document store operations.
pub type AppResult<T> = Result<T, AppError>;
