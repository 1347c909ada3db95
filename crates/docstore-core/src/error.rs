//! Unified application error types for the document store.
//!
//! Every crate maps its internal failures into [`AppError`] so that callers
//! (CLI, HTTP controllers, tests) can branch on a single [`ErrorKind`] and
//! decide how to surface it. Nothing in the core decides on status codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed input (empty or too-long name, illegal characters, ...).
    Validation,
    /// A sibling with the same name already exists in the partition.
    DuplicateName,
    /// A referenced folder belongs to another facility or category.
    FolderOwnershipMismatch,
    /// Folder deletion blocked because it still has files or subfolders.
    FolderNotEmpty,
    /// The file row does not exist or its blob is missing.
    FileNotFound,
    /// The file extension or MIME type is not on the allow-list.
    UnsupportedFileType,
    /// The file exceeds the domain's size limit.
    FileTooLarge,
    /// Preview requested for a MIME type outside the previewable subset.
    UnsupportedPreviewType,
    /// A generic lookup miss (folder id, blob path, ...).
    NotFound,
    /// A blob storage I/O error occurred.
    Storage,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal invariant was broken.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::DuplicateName => write!(f, "DUPLICATE_NAME"),
            Self::FolderOwnershipMismatch => write!(f, "FOLDER_OWNERSHIP_MISMATCH"),
            Self::FolderNotEmpty => write!(f, "FOLDER_NOT_EMPTY"),
            Self::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            Self::UnsupportedFileType => write!(f, "UNSUPPORTED_FILE_TYPE"),
            Self::FileTooLarge => write!(f, "FILE_TOO_LARGE"),
            Self::UnsupportedPreviewType => write!(f, "UNSUPPORTED_PREVIEW_TYPE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending input field (e.g. `name`, `file`).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The unified application error used throughout the document store.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Field-level details for validation-class errors.
    pub fields: Vec<FieldError>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error carrying a single field error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Validation,
            fields: vec![FieldError::new(field, message.clone())],
            message,
            source: None,
        }
    }

    /// Create a validation error from a list of field errors.
    pub fn validation_fields(fields: Vec<FieldError>) -> Self {
        let message = fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            kind: ErrorKind::Validation,
            message,
            fields,
            source: None,
        }
    }

    /// Create a duplicate-name error.
    pub fn duplicate_name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName, message)
    }

    /// Create a folder-ownership-mismatch error.
    pub fn ownership_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderOwnershipMismatch, message)
    }

    /// Create a folder-not-empty error.
    pub fn folder_not_empty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FolderNotEmpty, message)
    }

    /// Create a file-not-found error.
    pub fn file_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileNotFound, message)
    }

    /// Create an unsupported-file-type error.
    pub fn unsupported_file_type(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::UnsupportedFileType,
            fields: vec![FieldError::new("file", message.clone())],
            message,
            source: None,
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::FileTooLarge,
            fields: vec![FieldError::new("file", message.clone())],
            message,
            source: None,
        }
    }

    /// Create an unsupported-preview-type error.
    pub fn unsupported_preview(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedPreviewType, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error belongs to the validation class (no mutation, 422-like).
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation | ErrorKind::UnsupportedFileType | ErrorKind::FileTooLarge
        )
    }

    /// Whether this error is a plain lookup miss of any flavour.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound | ErrorKind::FileNotFound)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            fields: self.fields.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
