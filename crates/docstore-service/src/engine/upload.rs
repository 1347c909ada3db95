//! File operations: upload, rename, delete.
//!
//! Blob and row are kept in step. Upload writes the blob first and removes
//! it again if the row cannot be inserted; delete removes the row first and
//! restores it if the blob cannot be removed.

use bytes::Bytes;
use tracing::{debug, info, warn};

use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FileId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::{CreateFile, File};
use docstore_entity::scope::DocumentScope;

use super::DocumentService;
use crate::context::Actor;
use crate::validation::{validate_name, validate_rename_extension, validate_upload};

/// An uploaded file as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadBlob {
    /// User-visible file name, extension included.
    pub original_name: String,
    /// Content type declared by the client, if any.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl UploadBlob {
    /// A blob with no declared content type.
    pub fn new(original_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    /// Attach a declared content type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl DocumentService {
    /// Store a new file (`uploadCategoryFile`).
    ///
    /// Without a target folder the file goes into the partition root. Type,
    /// size, and folder ownership are all checked before anything is
    /// written.
    pub async fn upload_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        target_folder: Option<FolderId>,
        blob: UploadBlob,
        actor: &Actor,
    ) -> AppResult<File> {
        let profile = self.profile_for(category)?;
        let original_name =
            validate_name("file", &blob.original_name, self.config.max_name_length)?;
        let accepted = validate_upload(
            &self.config,
            profile,
            &original_name,
            blob.mime_type.as_deref(),
            blob.data.len() as u64,
        )?;

        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let target = match target_folder {
            Some(id) => self.scoped_folder(&scope, id).await?,
            None => self.get_or_create_root(facility_id, category, actor).await?,
        };
        let chain = self.folders.find_ancestors(target.id).await?;
        let resolved = self
            .resolver
            .resolve(facility_id, category, &chain, &original_name)?;

        let file_size = blob.data.len() as i64;
        self.storage.put(&resolved.relative_path, blob.data).await?;
        debug!(path = %resolved.relative_path, bytes = file_size, "Stored upload blob");

        let record = CreateFile {
            id: FileId::new(),
            facility_id,
            category: category.cloned(),
            folder_id: Some(target.id),
            original_name,
            stored_name: resolved.stored_name,
            file_path: resolved.relative_path,
            file_size,
            mime_type: accepted.mime_type,
            file_extension: accepted.extension,
            uploaded_by: actor.user_id,
        };

        let file = match self.files.create(&record).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&record.file_path).await {
                    warn!(
                        path = %record.file_path,
                        error = %cleanup,
                        "Failed to remove blob after metadata insert failed"
                    );
                }
                return Err(e);
            }
        };

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            folder_id = %target.id,
            file_id = %file.id,
            size = file.file_size,
            "File uploaded"
        );
        Ok(file)
    }

    /// Change a file's user-visible name.
    ///
    /// The new name must keep the uploaded extension, so the recorded type
    /// keeps describing the content.
    pub async fn rename_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        file_id: FileId,
        name: &str,
        actor: &Actor,
    ) -> AppResult<File> {
        let name = validate_name("name", name, self.config.max_name_length)?;
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let existing = self.scoped_file(&scope, file_id).await?;
        validate_rename_extension(&existing.file_extension, &name)?;

        let file = self.files.rename(existing.id, &name).await?;

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            file_id = %file.id,
            new_name = %file.original_name,
            "File renamed"
        );
        Ok(file)
    }

    /// Delete a file's row and blob together.
    ///
    /// A blob that is already gone does not block the delete. Any other
    /// storage failure puts the row back and is returned.
    pub async fn delete_file(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        file_id: FileId,
        actor: &Actor,
    ) -> AppResult<()> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let file = self.scoped_file(&scope, file_id).await?;

        if !self.files.delete(file.id).await? {
            debug!(file_id = %file.id, "File row already deleted");
            return Ok(());
        }

        match self.storage.delete(&file.file_path).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(file_id = %file.id, path = %file.file_path, "Blob was already missing");
            }
            Err(e) => {
                if let Err(restore) = self.files.restore(&file).await {
                    warn!(
                        file_id = %file.id,
                        error = %restore,
                        "Failed to restore file row after blob delete failed"
                    );
                }
                return Err(e);
            }
        }

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            file_id = %file.id,
            "File deleted"
        );
        Ok(())
    }
}
