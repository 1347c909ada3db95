//! Result shapes handed back to callers of the document services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docstore_core::types::{FileId, FolderId, UserId};

use crate::category::CategoryTag;
use crate::file::File;
use crate::folder::{Folder, FolderSummary};

/// A folder row in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Files directly inside the folder.
    pub file_count: u64,
    /// The creating user.
    pub creator: UserId,
}

impl From<FolderSummary> for FolderEntry {
    fn from(summary: FolderSummary) -> Self {
        Self {
            id: summary.folder.id,
            name: summary.folder.name,
            created_at: summary.folder.created_at,
            file_count: summary.file_count.max(0) as u64,
            creator: summary.folder.created_by,
        }
    }
}

/// A file row in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File ID.
    pub id: FileId,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
    /// User-visible name.
    pub original_name: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Upload time.
    pub created_at: DateTime<Utc>,
    /// The uploading user.
    pub uploader: UserId,
    /// MIME type.
    pub mime_type: String,
    /// Extension as supplied.
    pub file_extension: String,
}

impl From<File> for FileEntry {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            folder_id: file.folder_id,
            original_name: file.original_name,
            file_size: file.file_size,
            created_at: file.created_at,
            uploader: file.uploaded_by,
            mime_type: file.mime_type,
            file_extension: file.file_extension,
        }
    }
}

/// One step of the path from the category root to the current folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

/// Contents of a folder, or search hits across a partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentListing {
    /// Child folders (or matching folders when searching).
    pub folders: Vec<FolderEntry>,
    /// Child files (or matching files when searching).
    pub files: Vec<FileEntry>,
    /// Root-to-current ancestor chain, current folder last.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// The folder being listed; `None` for search results or an empty partition.
    pub current_folder: Option<Folder>,
}

/// Folder and file counts of one category partition, all depths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Number of folders, root included.
    pub folder_count: u64,
    /// Number of files.
    pub file_count: u64,
}

/// Per-category counts inside one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCategoryStats {
    /// The category partition.
    pub category: CategoryTag,
    /// Folder and file counts.
    #[serde(flatten)]
    pub stats: CategoryStats,
}

/// Response to a folder create or rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    /// Always `true`; failures are returned as errors.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The affected folder.
    pub folder: Folder,
}

impl FolderResponse {
    /// Wrap a successful folder mutation.
    pub fn ok(message: impl Into<String>, folder: Folder) -> Self {
        Self {
            success: true,
            message: message.into(),
            folder,
        }
    }
}

/// Response to a file upload or rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    /// Always `true`; failures are returned as errors.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The affected file.
    pub file: File,
}

impl FileResponse {
    /// Wrap a successful file mutation.
    pub fn ok(message: impl Into<String>, file: File) -> Self {
        Self {
            success: true,
            message: message.into(),
            file,
        }
    }
}

/// Response to a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the entity was removed.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl DeleteResponse {
    /// A successful delete.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
