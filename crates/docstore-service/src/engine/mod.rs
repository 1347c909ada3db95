//! Generic document engine.
//!
//! [`DocumentService`] implements every folder and file operation for any
//! `(facility, category)` partition. The category decides which domain
//! profile applies (size limit, root name, default subfolders); every query
//! the engine issues is built from a [`DocumentScope`].

mod download;
mod folder;
mod listing;
mod upload;

use std::sync::Arc;

use docstore_core::config::{DocumentsConfig, DomainProfile};
use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::traits::storage::StorageProvider;
use docstore_core::types::{FacilityId, FileId, FolderId};
use docstore_database::repositories::{FileRepository, FolderRepository};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::File;
use docstore_entity::folder::Folder;
use docstore_entity::scope::DocumentScope;
use docstore_storage::path::StoragePathResolver;

pub use download::FileContent;
pub use listing::DocumentFilter;
pub use upload::UploadBlob;

/// The shared document engine behind every domain service.
#[derive(Clone)]
pub struct DocumentService {
    /// Folder persistence.
    folders: Arc<dyn FolderRepository>,
    /// File metadata persistence.
    files: Arc<dyn FileRepository>,
    /// Blob storage for file content.
    storage: Arc<dyn StorageProvider>,
    /// Storage path resolver.
    resolver: StoragePathResolver,
    /// Allow-lists, limits, and domain profiles.
    config: Arc<DocumentsConfig>,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("storage", &self.storage.provider_type())
            .finish()
    }
}

impl DocumentService {
    /// Creates a new document engine.
    pub fn new(
        folders: Arc<dyn FolderRepository>,
        files: Arc<dyn FileRepository>,
        storage: Arc<dyn StorageProvider>,
        config: DocumentsConfig,
    ) -> Self {
        Self {
            folders,
            files,
            storage,
            resolver: StoragePathResolver::new(),
            config: Arc::new(config),
        }
    }

    /// The document configuration this engine enforces.
    pub fn config(&self) -> &DocumentsConfig {
        &self.config
    }

    /// The domain profile governing `category`.
    ///
    /// Fails with a validation error when the category is not one the
    /// configuration defines: an unknown domain, a missing or unknown
    /// subtype, or a subtype on a flat domain.
    pub fn profile_for(&self, category: Option<&CategoryTag>) -> AppResult<&DomainProfile> {
        let unknown = || {
            AppError::validation(
                "category",
                format!("Unknown category '{}'", CategoryTag::path_segment(category)),
            )
        };

        let profile = self
            .config
            .domains
            .by_prefix(category.map(CategoryTag::domain))
            .ok_or_else(unknown)?;

        let subtype = category.and_then(CategoryTag::subtype);
        let valid = match subtype {
            None => profile.is_main() || profile.is_flat(),
            Some(subtype) => profile.accepts_subtype(subtype),
        };
        if valid { Ok(profile) } else { Err(unknown()) }
    }

    /// Load a folder and require it to lie inside `scope`.
    async fn scoped_folder(&self, scope: &DocumentScope, id: FolderId) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        if !scope.contains_folder(&folder) {
            return Err(AppError::ownership_mismatch(format!(
                "Folder {id} belongs to another facility or category"
            )));
        }
        Ok(folder)
    }

    /// Load a file and require it to lie inside `scope`.
    ///
    /// A file from another partition is reported exactly like a missing one.
    async fn scoped_file(&self, scope: &DocumentScope, id: FileId) -> AppResult<File> {
        self.files
            .find_by_id(id)
            .await?
            .filter(|file| scope.contains_file(file))
            .ok_or_else(|| AppError::file_not_found(format!("File {id} not found")))
    }

    /// Get one folder of a partition (`getFolder`).
    pub async fn get_folder(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        self.scoped_folder(&scope, folder_id).await
    }

    /// Get one file of a partition (`getFile`).
    pub async fn get_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        file_id: FileId,
    ) -> AppResult<File> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        self.scoped_file(&scope, file_id).await
    }
}
