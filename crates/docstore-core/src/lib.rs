//! # docstore-core
//!
//! Core crate for the facility document store. Contains the blob-storage
//! trait, configuration schemas, typed identifiers, and the unified error
//! system shared by every other crate in the workspace.
//!
//! This crate has **no** internal dependencies on other docstore crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, FieldError};
pub use result::AppResult;
