//! Per-domain document services.
//!
//! A [`DomainDocumentService`] is the shared engine bound to one domain
//! profile. Callers pass only a subtype (or nothing, for the main space and
//! flat domains) and the service builds the category tag.

use std::sync::Arc;

use docstore_core::config::DomainProfile;
use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FileId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::File;
use docstore_entity::folder::{Folder, FolderTree};
use docstore_entity::listing::{
    CategoryStats, DeleteResponse, DocumentListing, DomainCategoryStats, FileResponse,
    FolderResponse,
};

use crate::context::Actor;
use crate::engine::{DocumentFilter, DocumentService, FileContent, UploadBlob};

/// The document engine fixed to one domain.
#[derive(Debug, Clone)]
pub struct DomainDocumentService {
    engine: Arc<DocumentService>,
    profile: DomainProfile,
}

impl DomainDocumentService {
    /// Bind `engine` to `profile`.
    pub fn new(engine: Arc<DocumentService>, profile: DomainProfile) -> Self {
        Self { engine, profile }
    }

    /// The domain profile in force.
    pub fn profile(&self) -> &DomainProfile {
        &self.profile
    }

    /// The underlying engine.
    pub fn engine(&self) -> &DocumentService {
        &self.engine
    }

    /// Build this domain's category tag for `subtype`.
    ///
    /// The main space and flat domains take no subtype; a domain with
    /// subtypes requires one of its configured values.
    pub fn category(&self, subtype: Option<&str>) -> AppResult<Option<CategoryTag>> {
        let Some(prefix) = self.profile.prefix.as_deref() else {
            return match subtype {
                None => Ok(None),
                Some(s) => Err(AppError::validation(
                    "subtype",
                    format!("The main document space has no subtypes (got '{s}')"),
                )),
            };
        };

        match subtype {
            None if self.profile.is_flat() => Ok(Some(CategoryTag::flat(prefix)?)),
            None => Err(AppError::validation(
                "subtype",
                format!(
                    "Domain '{prefix}' requires a subtype: {}",
                    self.profile.subtypes.join(", ")
                ),
            )),
            Some(s) if self.profile.accepts_subtype(s) => {
                Ok(Some(CategoryTag::with_subtype(prefix, s)?))
            }
            Some(s) => Err(AppError::validation(
                "subtype",
                format!("Unknown subtype '{s}' for domain '{prefix}'"),
            )),
        }
    }

    /// The category root, created with its default subfolders on first use.
    pub async fn root(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        actor: &Actor,
    ) -> AppResult<Folder> {
        let category = self.category(subtype)?;
        self.engine
            .get_or_create_root(facility_id, category.as_ref(), actor)
            .await
    }

    /// Create a folder under `parent_id`, or under the root when omitted.
    pub async fn create_folder(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        parent_id: Option<FolderId>,
        name: &str,
        actor: &Actor,
    ) -> AppResult<FolderResponse> {
        let category = self.category(subtype)?;
        let folder = self
            .engine
            .create_folder(facility_id, category.as_ref(), parent_id, name, actor)
            .await?;
        Ok(FolderResponse::ok(
            format!("Folder '{}' created", folder.name),
            folder,
        ))
    }

    /// Rename a folder; sibling names stay unique.
    pub async fn rename_folder(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        folder_id: FolderId,
        name: &str,
        actor: &Actor,
    ) -> AppResult<FolderResponse> {
        let category = self.category(subtype)?;
        let folder = self
            .engine
            .rename_folder(facility_id, category.as_ref(), folder_id, name, actor)
            .await?;
        Ok(FolderResponse::ok(
            format!("Folder renamed to '{}'", folder.name),
            folder,
        ))
    }

    /// Delete an empty folder.
    pub async fn delete_folder(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        folder_id: FolderId,
        actor: &Actor,
    ) -> AppResult<DeleteResponse> {
        let category = self.category(subtype)?;
        self.engine
            .delete_folder(facility_id, category.as_ref(), folder_id, actor)
            .await?;
        Ok(DeleteResponse::ok("Folder deleted"))
    }

    /// Upload a file into `folder_id`, or into the root when omitted.
    pub async fn upload_file(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        folder_id: Option<FolderId>,
        blob: UploadBlob,
        actor: &Actor,
    ) -> AppResult<FileResponse> {
        let category = self.category(subtype)?;
        let file = self
            .engine
            .upload_file(facility_id, category.as_ref(), folder_id, blob, actor)
            .await?;
        Ok(FileResponse::ok(
            format!("File '{}' uploaded", file.original_name),
            file,
        ))
    }

    /// Rename a file, keeping its extension.
    pub async fn rename_file(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        file_id: FileId,
        name: &str,
        actor: &Actor,
    ) -> AppResult<FileResponse> {
        let category = self.category(subtype)?;
        let file = self
            .engine
            .rename_file(facility_id, category.as_ref(), file_id, name, actor)
            .await?;
        Ok(FileResponse::ok(
            format!("File renamed to '{}'", file.original_name),
            file,
        ))
    }

    /// Delete a file and its blob.
    pub async fn delete_file(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        file_id: FileId,
        actor: &Actor,
    ) -> AppResult<DeleteResponse> {
        let category = self.category(subtype)?;
        self.engine
            .delete_file(facility_id, category.as_ref(), file_id, actor)
            .await?;
        Ok(DeleteResponse::ok("File deleted"))
    }

    /// A folder of this category.
    pub async fn get_folder(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        folder_id: FolderId,
    ) -> AppResult<Folder> {
        let category = self.category(subtype)?;
        self.engine
            .get_folder(facility_id, category.as_ref(), folder_id)
            .await
    }

    /// A file of this category.
    pub async fn get_file(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        file_id: FileId,
    ) -> AppResult<File> {
        let category = self.category(subtype)?;
        self.engine
            .get_file(facility_id, category.as_ref(), file_id)
            .await
    }

    /// Folder contents with breadcrumbs, or search results when the filter has a term.
    pub async fn documents(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        filter: &DocumentFilter,
    ) -> AppResult<DocumentListing> {
        let category = self.category(subtype)?;
        self.engine
            .get_documents(facility_id, category.as_ref(), filter)
            .await
    }

    /// Folder and file counts for the category.
    pub async fn stats(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
    ) -> AppResult<CategoryStats> {
        let category = self.category(subtype)?;
        self.engine.get_stats(facility_id, category.as_ref()).await
    }

    /// Nested folders with per-folder file counts.
    pub async fn folder_tree(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
    ) -> AppResult<FolderTree> {
        let category = self.category(subtype)?;
        self.engine
            .get_folder_tree(facility_id, category.as_ref())
            .await
    }

    /// File content as an attachment.
    pub async fn download(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        file_id: FileId,
    ) -> AppResult<FileContent> {
        let category = self.category(subtype)?;
        self.engine
            .download_file(facility_id, category.as_ref(), file_id)
            .await
    }

    /// File content for inline display. Only previewable types are served.
    pub async fn preview(
        &self,
        facility_id: FacilityId,
        subtype: Option<&str>,
        file_id: FileId,
    ) -> AppResult<FileContent> {
        let category = self.category(subtype)?;
        self.engine
            .preview_file(facility_id, category.as_ref(), file_id)
            .await
    }

    /// Counts for every category of this domain. Not available for the
    /// main space, which has a single partition.
    pub async fn domain_stats(&self, facility_id: FacilityId) -> AppResult<Vec<DomainCategoryStats>> {
        let Some(prefix) = self.profile.prefix.as_deref() else {
            return Err(AppError::validation(
                "domain",
                "The main document space has no per-category stats",
            ));
        };
        self.engine.get_domain_stats(facility_id, prefix).await
    }
}

/// The four domain services sharing one engine.
#[derive(Debug, Clone)]
pub struct DocumentServices {
    /// Uncategorized documents.
    pub main: DomainDocumentService,
    /// Lifeline equipment documents.
    pub lifeline: DomainDocumentService,
    /// Maintenance history documents.
    pub maintenance: DomainDocumentService,
    /// Contract documents.
    pub contracts: DomainDocumentService,
}

impl DocumentServices {
    /// Build all domain services from the engine's configured profiles.
    pub fn new(engine: Arc<DocumentService>) -> Self {
        let domains = engine.config().domains.clone();
        Self {
            main: DomainDocumentService::new(engine.clone(), domains.main),
            lifeline: DomainDocumentService::new(engine.clone(), domains.lifeline),
            maintenance: DomainDocumentService::new(engine.clone(), domains.maintenance),
            contracts: DomainDocumentService::new(engine, domains.contracts),
        }
    }

    /// Look up a domain service by name (`main`, `lifeline`, ...).
    pub fn by_name(&self, name: &str) -> AppResult<&DomainDocumentService> {
        match name {
            "main" => Ok(&self.main),
            "lifeline" => Ok(&self.lifeline),
            "maintenance" => Ok(&self.maintenance),
            "contracts" => Ok(&self.contracts),
            other => Err(AppError::validation(
                "domain",
                format!("Unknown domain '{other}'"),
            )),
        }
    }
}
