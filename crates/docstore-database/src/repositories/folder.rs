//! PostgreSQL folder repository.

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use docstore_core::error::{AppError, ErrorKind};
use docstore_core::result::AppResult;
use docstore_core::types::FolderId;
use docstore_entity::category::CategoryTag;
use docstore_entity::folder::{CreateFolder, Folder, FolderSummary};
use docstore_entity::scope::DocumentScope;

use super::{
    CategoryCounts, FolderRepository, contains_pattern, decode_counts, push_scope,
    unique_violation,
};

const SIBLING_NAME_KEY: &str = "document_folders_sibling_name_key";
const ONE_ROOT_KEY: &str = "document_folders_one_root_key";

const SUMMARY_SELECT: &str = "SELECT f.*, \
     (SELECT COUNT(*) FROM document_files d WHERE d.folder_id = f.id) AS file_count \
     FROM document_folders f WHERE ";

const INSERT_FOLDER: &str = "INSERT INTO document_folders \
     (id, facility_id, category_domain, category_subtype, parent_id, name, created_by) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *";

/// Folder repository backed by the `document_folders` table.
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_summaries(
        &self,
        mut qb: QueryBuilder<'_, Postgres>,
        context: &str,
    ) -> AppResult<Vec<FolderSummary>> {
        qb.build_query_as::<FolderSummary>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, context.to_string(), e))
    }
}

fn insert_query(data: &CreateFolder) -> QueryAs<'_, Postgres, Folder, PgArguments> {
    let (domain, subtype) = CategoryTag::to_columns(data.category.as_ref());
    sqlx::query_as::<_, Folder>(INSERT_FOLDER)
        .bind(FolderId::new())
        .bind(data.facility_id)
        .bind(domain)
        .bind(subtype)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(data.created_by)
}

fn map_write_error(e: sqlx::Error, name: &str, context: &str) -> AppError {
    let sibling_clash = matches!(
        unique_violation(&e),
        Some(SIBLING_NAME_KEY) | Some(ONE_ROOT_KEY)
    );
    if sibling_clash {
        AppError::duplicate_name(format!("A folder named '{name}' already exists here"))
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), e)
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM document_folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_root(&self, scope: &DocumentScope) -> AppResult<Option<Folder>> {
        if scope.exact_category().is_none() {
            return Err(AppError::internal(
                "Root lookup requires a single category partition",
            ));
        }

        let mut qb = QueryBuilder::<Postgres>::new("SELECT f.* FROM document_folders f WHERE ");
        push_scope(&mut qb, scope, "f");
        qb.push(" AND f.parent_id IS NULL");

        qb.build_query_as::<Folder>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root folder", e))
    }

    async fn find_children(
        &self,
        scope: &DocumentScope,
        parent_id: FolderId,
    ) -> AppResult<Vec<FolderSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(SUMMARY_SELECT);
        push_scope(&mut qb, scope, "f");
        qb.push(" AND f.parent_id = ").push_bind(parent_id);
        qb.push(" ORDER BY f.name ASC");
        self.fetch_summaries(qb, "Failed to list child folders").await
    }

    async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        // The visited array stops the recursion if a parent link ever loops.
        let chain = sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE chain AS ( \
                SELECT f.*, 0 AS hops, ARRAY[f.id] AS visited \
                FROM document_folders f WHERE f.id = $1 \
                UNION ALL \
                SELECT p.*, c.hops + 1, c.visited || p.id \
                FROM document_folders p INNER JOIN chain c ON p.id = c.parent_id \
                WHERE NOT p.id = ANY(c.visited) \
             ) SELECT * FROM chain ORDER BY hops DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))?;

        if let Some(top) = chain.first() {
            if !top.is_root() {
                return Err(AppError::internal(format!(
                    "Folder {folder_id} has a cyclic parent chain"
                )));
            }
        }
        Ok(chain)
    }

    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<FolderSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(SUMMARY_SELECT);
        push_scope(&mut qb, scope, "f");
        qb.push(" AND f.name ILIKE ").push_bind(contains_pattern(term));
        qb.push(" ORDER BY f.name ASC");
        self.fetch_summaries(qb, "Failed to search folders").await
    }

    async fn list(&self, scope: &DocumentScope) -> AppResult<Vec<FolderSummary>> {
        let mut qb = QueryBuilder::<Postgres>::new(SUMMARY_SELECT);
        push_scope(&mut qb, scope, "f");
        qb.push(" ORDER BY f.name ASC");
        self.fetch_summaries(qb, "Failed to list folders").await
    }

    async fn count(&self, scope: &DocumentScope) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM document_folders f WHERE ");
        push_scope(&mut qb, scope, "f");

        let count: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT f.category_domain, f.category_subtype, COUNT(*) FROM document_folders f WHERE ",
        );
        push_scope(&mut qb, scope, "f");
        qb.push(" GROUP BY f.category_domain, f.category_subtype");

        let rows = qb
            .build_query_as::<(Option<String>, Option<String>, i64)>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count folders by category", e)
            })?;
        decode_counts(rows)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        insert_query(data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &data.name, "Failed to create folder"))
    }

    async fn create_root(
        &self,
        root: &CreateFolder,
        subfolders: &[String],
    ) -> AppResult<Option<Folder>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let created = match insert_query(root).fetch_one(&mut *tx).await {
            Ok(folder) => folder,
            Err(e) if unique_violation(&e).is_some() => {
                debug!(facility_id = %root.facility_id, "Root folder already exists");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Database,
                    "Failed to create root folder",
                    e,
                ));
            }
        };

        for name in subfolders {
            let child = CreateFolder::child_of(&created, name.clone(), root.created_by);
            insert_query(&child)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_write_error(e, name, "Failed to create default subfolder"))?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit root folder", e)
        })?;
        Ok(Some(created))
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE document_folders SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, name, "Failed to rename folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn delete_if_empty(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM document_folders f WHERE f.id = $1 \
             AND NOT EXISTS (SELECT 1 FROM document_folders c WHERE c.parent_id = f.id) \
             AND NOT EXISTS (SELECT 1 FROM document_files d WHERE d.folder_id = f.id)",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::folder_not_empty(format!("Folder {id} is not empty"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to delete folder", e),
        })?;
        Ok(result.rows_affected() > 0)
    }
}
