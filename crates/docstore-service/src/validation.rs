//! Input validation for folder names, file names, and uploads.

use docstore_core::config::{DocumentsConfig, DomainProfile};
use docstore_core::error::{AppError, FieldError};
use docstore_core::result::AppResult;
use docstore_storage::path::split_extension;

/// Characters that would let a name act as a path.
const SEPARATORS: [char; 2] = ['/', '\\'];

/// Validate a folder or file name and return it trimmed.
pub fn validate_name(field: &str, name: &str, max_chars: usize) -> AppResult<String> {
    let trimmed = name.trim();
    let mut errors = Vec::new();

    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "Name must not be empty"));
    }
    if trimmed.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("Name must be at most {max_chars} characters"),
        ));
    }
    if trimmed.contains(SEPARATORS) {
        errors.push(FieldError::new(
            field,
            "Name must not contain '/' or '\\'",
        ));
    }
    if trimmed.chars().any(char::is_control) {
        errors.push(FieldError::new(
            field,
            "Name must not contain control characters",
        ));
    }

    if errors.is_empty() {
        Ok(trimmed.to_string())
    } else {
        Err(AppError::validation_fields(errors))
    }
}

/// Extension and MIME type accepted for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedType {
    /// Extension exactly as supplied.
    pub extension: String,
    /// MIME type recorded for the file.
    pub mime_type: String,
}

/// Check an upload's type and size against the allow-list and the domain limit.
///
/// The extension decides the type. A declared MIME type, when present, must
/// be the one the allow-list pairs with that extension; otherwise the
/// extension's canonical type is used.
pub fn validate_upload(
    config: &DocumentsConfig,
    profile: &DomainProfile,
    original_name: &str,
    declared_mime: Option<&str>,
    size: u64,
) -> AppResult<AcceptedType> {
    let (_, extension) = split_extension(original_name);
    let Some(extension) = extension else {
        return Err(AppError::unsupported_file_type(format!(
            "'{original_name}' has no file extension"
        )));
    };
    let Some(allowed) = config.allowed_type(extension) else {
        return Err(AppError::unsupported_file_type(format!(
            "Files of type '.{extension}' are not accepted"
        )));
    };

    let mime_type = match declared_mime.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mime) if config.accepts(extension, mime) => mime.to_ascii_lowercase(),
        Some(mime) => {
            return Err(AppError::unsupported_file_type(format!(
                "Content type '{mime}' does not match '.{extension}' files"
            )));
        }
        None => allowed.mime_type.clone(),
    };

    if size == 0 {
        return Err(AppError::validation("file", "The file is empty"));
    }
    if size > profile.max_file_size_bytes {
        return Err(AppError::file_too_large(format!(
            "File is {size} bytes; the limit is {} bytes",
            profile.max_file_size_bytes
        )));
    }

    Ok(AcceptedType {
        extension: extension.to_string(),
        mime_type,
    })
}

/// Check that a new file name keeps the file's stored extension.
pub fn validate_rename_extension(file_extension: &str, new_name: &str) -> AppResult<()> {
    match split_extension(new_name).1 {
        Some(extension) if extension.eq_ignore_ascii_case(file_extension) => Ok(()),
        _ => Err(AppError::unsupported_file_type(format!(
            "'{new_name}' must keep the '.{file_extension}' extension"
        ))),
    }
}
