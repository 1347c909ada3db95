//! PostgreSQL file repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use docstore_core::error::{AppError, ErrorKind};
use docstore_core::result::AppResult;
use docstore_core::types::{FileId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::{CreateFile, File};
use docstore_entity::scope::DocumentScope;

use super::{
    CategoryCounts, FileRepository, contains_pattern, decode_counts, push_scope,
    unique_violation,
};

const FILE_PATH_KEY: &str = "document_files_file_path_key";

/// File repository backed by the `document_files` table.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_files(
        &self,
        mut qb: QueryBuilder<'_, Postgres>,
        context: &str,
    ) -> AppResult<Vec<File>> {
        qb.build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, context.to_string(), e))
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM document_files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_in_folder(
        &self,
        scope: &DocumentScope,
        folder_id: FolderId,
        include_unfiled: bool,
    ) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT d.* FROM document_files d WHERE ");
        push_scope(&mut qb, scope, "d");
        qb.push(" AND (d.folder_id = ").push_bind(folder_id);
        if include_unfiled {
            qb.push(" OR d.folder_id IS NULL");
        }
        qb.push(") ORDER BY d.original_name ASC, d.created_at ASC");
        self.fetch_files(qb, "Failed to list files").await
    }

    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<File>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT d.* FROM document_files d WHERE ");
        push_scope(&mut qb, scope, "d");
        qb.push(" AND d.original_name ILIKE ")
            .push_bind(contains_pattern(term));
        qb.push(" ORDER BY d.original_name ASC, d.created_at ASC");
        self.fetch_files(qb, "Failed to search files").await
    }

    async fn count(&self, scope: &DocumentScope) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM document_files d WHERE ");
        push_scope(&mut qb, scope, "d");

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT d.category_domain, d.category_subtype, COUNT(*) FROM document_files d WHERE ",
        );
        push_scope(&mut qb, scope, "d");
        qb.push(" GROUP BY d.category_domain, d.category_subtype");

        let rows = qb
            .build_query_as::<(Option<String>, Option<String>, i64)>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count files by category", e)
            })?;
        decode_counts(rows)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let (domain, subtype) = CategoryTag::to_columns(data.category.as_ref());
        sqlx::query_as::<_, File>(
            "INSERT INTO document_files \
             (id, facility_id, category_domain, category_subtype, folder_id, original_name, \
              stored_name, file_path, file_size, mime_type, file_extension, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(data.id)
        .bind(data.facility_id)
        .bind(domain)
        .bind(subtype)
        .bind(data.folder_id)
        .bind(&data.original_name)
        .bind(&data.stored_name)
        .bind(&data.file_path)
        .bind(data.file_size)
        .bind(&data.mime_type)
        .bind(&data.file_extension)
        .bind(data.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if unique_violation(&e) == Some(FILE_PATH_KEY) {
                AppError::duplicate_name(format!(
                    "Stored path collision for '{}'",
                    data.file_path
                ))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create file", e)
            }
        })
    }

    async fn restore(&self, file: &File) -> AppResult<File> {
        let (domain, subtype) = CategoryTag::to_columns(file.category.as_ref());
        sqlx::query_as::<_, File>(
            "INSERT INTO document_files \
             (id, facility_id, category_domain, category_subtype, folder_id, original_name, \
              stored_name, file_path, file_size, mime_type, file_extension, uploaded_by, \
              created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(file.id)
        .bind(file.facility_id)
        .bind(domain)
        .bind(subtype)
        .bind(file.folder_id)
        .bind(&file.original_name)
        .bind(&file.stored_name)
        .bind(&file.file_path)
        .bind(file.file_size)
        .bind(&file.mime_type)
        .bind(&file.file_extension)
        .bind(file.uploaded_by)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore file", e))
    }

    async fn rename(&self, id: FileId, original_name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE document_files SET original_name = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(original_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::file_not_found(format!("File {id} not found")))
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM document_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
