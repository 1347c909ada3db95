//! File content retrieval: download and inline preview.

use bytes::Bytes;
use tracing::{debug, warn};

use docstore_core::error::{AppError, ErrorKind};
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FileId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::File;
use docstore_entity::scope::DocumentScope;

use super::DocumentService;

/// File bytes plus the headers a caller needs to serve them.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Metadata row of the served file.
    pub file: File,
    /// Complete file content.
    pub data: Bytes,
    /// Value for `Content-Type`.
    pub content_type: String,
    /// Value for `Content-Disposition`; `None` for inline previews.
    pub content_disposition: Option<String>,
}

impl DocumentService {
    /// Read a file for download, as an attachment under its original name.
    pub async fn download_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        file_id: FileId,
    ) -> AppResult<FileContent> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let file = self.scoped_file(&scope, file_id).await?;
        let data = self.read_blob(&file).await?;

        Ok(FileContent {
            content_type: file.mime_type.clone(),
            content_disposition: Some(attachment_disposition(&file.original_name)),
            data,
            file,
        })
    }

    /// Read a file for inline display.
    ///
    /// Only the configured previewable types are served; anything else fails
    /// with `UnsupportedPreviewType` before storage is touched.
    pub async fn preview_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        file_id: FileId,
    ) -> AppResult<FileContent> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let file = self.scoped_file(&scope, file_id).await?;

        if !self.config.is_previewable(&file.mime_type) {
            return Err(AppError::unsupported_preview(format!(
                "Files of type '{}' cannot be previewed",
                file.mime_type
            )));
        }
        let data = self.read_blob(&file).await?;

        Ok(FileContent {
            content_type: file.mime_type.clone(),
            content_disposition: None,
            data,
            file,
        })
    }

    async fn read_blob(&self, file: &File) -> AppResult<Bytes> {
        match self.storage.get(&file.file_path).await {
            Ok(data) => {
                debug!(file_id = %file.id, bytes = data.len(), "Read file blob");
                Ok(data)
            }
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(file_id = %file.id, path = %file.file_path, "File row has no blob");
                Err(AppError::file_not_found(format!(
                    "Content of file '{}' is missing from storage",
                    file.original_name
                )))
            }
            Err(e) => Err(e),
        }
    }
}

/// `attachment; filename="..."` with the name kept verbatim apart from
/// escaping quotes and backslashes.
fn attachment_disposition(original_name: &str) -> String {
    let mut escaped = String::with_capacity(original_name.len());
    for c in original_name.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("attachment; filename=\"{escaped}\"")
}
