//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use docstore_core::types::{FacilityId, FileId, FolderId, UserId};

use crate::category::CategoryTag;
use crate::folder::model::decode_category;

/// A stored document file.
///
/// `original_name` is what users see; `stored_name` is the generated
/// physical name at the end of `file_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// Owning facility.
    pub facility_id: FacilityId,
    /// Category partition, inherited from the folder.
    pub category: Option<CategoryTag>,
    /// Containing folder (null = partition root).
    pub folder_id: Option<FolderId>,
    /// User-visible name, preserved verbatim.
    pub original_name: String,
    /// Collision-resistant physical name.
    pub stored_name: String,
    /// Relative storage path, ending in `stored_name`.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type from the allow-list.
    pub mime_type: String,
    /// Extension as supplied by the uploader.
    pub file_extension: String,
    /// The uploading user.
    pub uploaded_by: UserId,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Whether this file lives in the given facility/category partition.
    pub fn belongs_to(&self, facility_id: FacilityId, category: Option<&CategoryTag>) -> bool {
        self.facility_id == facility_id && self.category.as_ref() == category
    }
}

impl<'r> FromRow<'r, PgRow> for File {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            facility_id: row.try_get("facility_id")?,
            category: decode_category(row)?,
            folder_id: row.try_get("folder_id")?,
            original_name: row.try_get("original_name")?,
            stored_name: row.try_get("stored_name")?,
            file_path: row.try_get("file_path")?,
            file_size: row.try_get("file_size")?,
            mime_type: row.try_get("mime_type")?,
            file_extension: row.try_get("file_extension")?,
            uploaded_by: row.try_get("uploaded_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Id chosen before the blob is written, so the path can be logged.
    pub id: FileId,
    /// Owning facility.
    pub facility_id: FacilityId,
    /// Category partition.
    pub category: Option<CategoryTag>,
    /// Containing folder.
    pub folder_id: Option<FolderId>,
    /// User-visible name.
    pub original_name: String,
    /// Physical name.
    pub stored_name: String,
    /// Relative storage path.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Extension as supplied.
    pub file_extension: String,
    /// The uploading user.
    pub uploaded_by: UserId,
}
