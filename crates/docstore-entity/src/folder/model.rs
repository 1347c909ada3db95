//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use docstore_core::types::{FacilityId, FolderId, UserId};

use crate::category::CategoryTag;

/// A folder in a per-facility, per-category tree.
///
/// `category` and `parent_id` are fixed at creation; only `name` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Owning facility.
    pub facility_id: FacilityId,
    /// Category partition (`None` = main space).
    pub category: Option<CategoryTag>,
    /// Parent folder ID (null for the category root).
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among siblings.
    pub name: String,
    /// The user who created the folder.
    pub created_by: UserId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a category root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this folder lives in the given facility/category partition.
    pub fn belongs_to(&self, facility_id: FacilityId, category: Option<&CategoryTag>) -> bool {
        self.facility_id == facility_id && self.category.as_ref() == category
    }
}

impl<'r> FromRow<'r, PgRow> for Folder {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            facility_id: row.try_get("facility_id")?,
            category: decode_category(row)?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// A folder together with the number of files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSummary {
    /// The folder row.
    pub folder: Folder,
    /// Files whose `folder_id` is this folder.
    pub file_count: i64,
}

impl<'r> FromRow<'r, PgRow> for FolderSummary {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            folder: Folder::from_row(row)?,
            file_count: row.try_get("file_count")?,
        })
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Owning facility.
    pub facility_id: FacilityId,
    /// Category partition.
    pub category: Option<CategoryTag>,
    /// Parent folder (None for the category root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// The creating user.
    pub created_by: UserId,
}

impl CreateFolder {
    /// A child of `parent`, inheriting its facility and category.
    pub fn child_of(parent: &Folder, name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            facility_id: parent.facility_id,
            category: parent.category.clone(),
            parent_id: Some(parent.id),
            name: name.into(),
            created_by,
        }
    }
}

/// Decode the `category_domain` / `category_subtype` column pair.
pub(crate) fn decode_category(row: &PgRow) -> Result<Option<CategoryTag>, sqlx::Error> {
    let domain: Option<String> = row.try_get("category_domain")?;
    let subtype: Option<String> = row.try_get("category_subtype")?;
    CategoryTag::from_columns(domain, subtype).map_err(|e| sqlx::Error::ColumnDecode {
        index: "category_domain".to_string(),
        source: Box::new(e),
    })
}
