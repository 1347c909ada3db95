//! Repository seams for folders and files, and their PostgreSQL
//! implementations.
//!
//! Every listing, search, and count takes a [`DocumentScope`]; there is no
//! way to ask a repository for rows by a raw category string.

pub mod file;
pub mod folder;

use std::fmt::Debug;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use docstore_core::result::AppResult;
use docstore_core::types::{FileId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::{CreateFile, File};
use docstore_entity::folder::{CreateFolder, Folder, FolderSummary};
use docstore_entity::scope::{CategoryFilter, DocumentScope};

pub use file::PgFileRepository;
pub use folder::PgFolderRepository;

/// Row counts grouped by category partition.
pub type CategoryCounts = Vec<(Option<CategoryTag>, u64)>;

/// Folder persistence.
#[async_trait]
pub trait FolderRepository: Send + Sync + Debug + 'static {
    /// Find a folder by id, in any partition.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// The root folder of an exact-category scope.
    async fn find_root(&self, scope: &DocumentScope) -> AppResult<Option<Folder>>;

    /// Direct subfolders of `parent_id` inside the scope, ordered by name.
    async fn find_children(
        &self,
        scope: &DocumentScope,
        parent_id: FolderId,
    ) -> AppResult<Vec<FolderSummary>>;

    /// The chain from the partition root down to `folder_id`, inclusive.
    ///
    /// Returns an empty list when the folder does not exist and an
    /// `Internal` error when the chain does not end at a root.
    async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Folders at any depth whose name contains `term`, case-insensitively.
    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<FolderSummary>>;

    /// Every folder in the scope, ordered by name.
    async fn list(&self, scope: &DocumentScope) -> AppResult<Vec<FolderSummary>>;

    /// Number of folders in the scope.
    async fn count(&self, scope: &DocumentScope) -> AppResult<u64>;

    /// Folder counts per category inside the scope.
    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts>;

    /// Insert a folder. Sibling collisions fail with `DuplicateName`.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Insert a partition root and its default subfolders as one unit.
    ///
    /// Returns `None` without writing anything when the partition already
    /// has a root.
    async fn create_root(
        &self,
        root: &CreateFolder,
        subfolders: &[String],
    ) -> AppResult<Option<Folder>>;

    /// Change a folder's name. Sibling collisions fail with `DuplicateName`.
    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder>;

    /// Delete a folder only if it has no subfolders and no files.
    ///
    /// Returns `false` when the folder was not deleted.
    async fn delete_if_empty(&self, id: FolderId) -> AppResult<bool>;
}

/// File metadata persistence.
#[async_trait]
pub trait FileRepository: Send + Sync + Debug + 'static {
    /// Find a file by id, in any partition.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>>;

    /// Files directly inside `folder_id`, ordered by name then upload time.
    ///
    /// With `include_unfiled`, files of the scope with no folder are listed
    /// as well.
    async fn list_in_folder(
        &self,
        scope: &DocumentScope,
        folder_id: FolderId,
        include_unfiled: bool,
    ) -> AppResult<Vec<File>>;

    /// Files at any depth whose original name contains `term`, case-insensitively.
    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<File>>;

    /// Number of files in the scope.
    async fn count(&self, scope: &DocumentScope) -> AppResult<u64>;

    /// File counts per category inside the scope.
    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts>;

    /// Insert a file row. A `file_path` collision fails with `DuplicateName`.
    async fn create(&self, data: &CreateFile) -> AppResult<File>;

    /// Re-insert a previously deleted row exactly as it was, timestamps included.
    async fn restore(&self, file: &File) -> AppResult<File>;

    /// Change a file's original name.
    async fn rename(&self, id: FileId, original_name: &str) -> AppResult<File>;

    /// Delete a file row. Returns `false` if it did not exist.
    async fn delete(&self, id: FileId) -> AppResult<bool>;
}

/// Append the scope predicate for table alias `alias` to a query.
pub(crate) fn push_scope<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    scope: &'a DocumentScope,
    alias: &str,
) {
    qb.push(format!("{alias}.facility_id = "))
        .push_bind(scope.facility_id());

    match scope.filter() {
        CategoryFilter::Exact(None) => {
            qb.push(format!(
                " AND {alias}.category_domain IS NULL AND {alias}.category_subtype IS NULL"
            ));
        }
        CategoryFilter::Exact(Some(tag)) => {
            qb.push(format!(" AND {alias}.category_domain = "))
                .push_bind(tag.domain());
            match tag.subtype() {
                Some(subtype) => {
                    qb.push(format!(" AND {alias}.category_subtype = "))
                        .push_bind(subtype);
                }
                None => {
                    qb.push(format!(" AND {alias}.category_subtype IS NULL"));
                }
            }
        }
        CategoryFilter::Domain(domain) => {
            qb.push(format!(" AND {alias}.category_domain = "))
                .push_bind(domain.as_str());
        }
    }
}

/// `ILIKE` pattern matching `term` as a literal substring.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Name of the unique constraint a database error violated, if any.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}

/// Turn grouped `(domain, subtype, count)` rows into typed counts.
pub(crate) fn decode_counts(rows: Vec<(Option<String>, Option<String>, i64)>) -> AppResult<CategoryCounts> {
    rows.into_iter()
        .map(|(domain, subtype, count)| {
            Ok((CategoryTag::from_columns(domain, subtype)?, count.max(0) as u64))
        })
        .collect()
}
