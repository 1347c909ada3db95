//! Folder operations: category roots, create, rename, delete.

use tracing::{debug, info};

use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::folder::{CreateFolder, Folder};
use docstore_entity::scope::DocumentScope;

use super::DocumentService;
use crate::context::Actor;
use crate::validation::validate_name;

impl DocumentService {
    /// Return the partition's root folder, creating it on first access
    /// (`getOrCreateCategoryRootFolder`).
    ///
    /// A new root is inserted together with the profile's default
    /// subfolders in one unit. When two callers race, the loser re-reads and
    /// returns the winner's root.
    pub async fn get_or_create_root(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        actor: &Actor,
    ) -> AppResult<Folder> {
        let profile = self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());

        if let Some(root) = self.folders.find_root(&scope).await? {
            return Ok(root);
        }

        let root = CreateFolder {
            facility_id,
            category: category.cloned(),
            parent_id: None,
            name: profile.root_folder_name.clone(),
            created_by: actor.user_id,
        };

        match self
            .folders
            .create_root(&root, &profile.default_subfolders)
            .await?
        {
            Some(created) => {
                info!(
                    user_id = %actor.user_id,
                    facility_id = %facility_id,
                    category = %CategoryTag::path_segment(category),
                    folder_id = %created.id,
                    subfolders = profile.default_subfolders.len(),
                    "Category root folder created"
                );
                Ok(created)
            }
            None => {
                debug!(
                    facility_id = %facility_id,
                    category = %CategoryTag::path_segment(category),
                    "Root folder created concurrently, re-reading"
                );
                self.folders.find_root(&scope).await?.ok_or_else(|| {
                    AppError::internal("Root folder vanished after a concurrent insert")
                })
            }
        }
    }

    /// Create a folder (`createCategoryFolder`).
    ///
    /// Without a parent the folder is created directly under the
    /// partition root.
    pub async fn create_folder(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        parent_id: Option<FolderId>,
        name: &str,
        actor: &Actor,
    ) -> AppResult<Folder> {
        let name = validate_name("name", name, self.config.max_name_length)?;
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());

        let parent = match parent_id {
            Some(id) => self.scoped_folder(&scope, id).await?,
            None => self.get_or_create_root(facility_id, category, actor).await?,
        };

        let folder = self
            .folders
            .create(&CreateFolder::child_of(&parent, name, actor.user_id))
            .await?;

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            folder_id = %folder.id,
            parent_id = %parent.id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Rename a folder. Category, parent, and facility never change.
    pub async fn rename_folder(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        folder_id: FolderId,
        name: &str,
        actor: &Actor,
    ) -> AppResult<Folder> {
        let name = validate_name("name", name, self.config.max_name_length)?;
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let existing = self.scoped_folder(&scope, folder_id).await?;

        let folder = self.folders.rename(existing.id, &name).await?;

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            folder_id = %folder.id,
            old_name = %existing.name,
            new_name = %folder.name,
            "Folder renamed"
        );
        Ok(folder)
    }

    /// Delete an empty folder.
    ///
    /// Fails with `FolderNotEmpty`, and changes nothing, while the folder
    /// still holds files or subfolders.
    pub async fn delete_folder(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        folder_id: FolderId,
        actor: &Actor,
    ) -> AppResult<()> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let folder = self.scoped_folder(&scope, folder_id).await?;

        if !self.folders.delete_if_empty(folder.id).await? {
            return Err(AppError::folder_not_empty(format!(
                "Folder '{}' still contains files or subfolders",
                folder.name
            )));
        }

        info!(
            user_id = %actor.user_id,
            facility_id = %facility_id,
            category = %CategoryTag::path_segment(category),
            folder_id = %folder.id,
            "Folder deleted"
        );
        Ok(())
    }
}
