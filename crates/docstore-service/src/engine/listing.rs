//! Read-side views: folder contents, search, stats, and the folder tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::folder::FolderTree;
use docstore_entity::listing::{
    Breadcrumb, CategoryStats, DocumentListing, DomainCategoryStats, FileEntry, FolderEntry,
};
use docstore_entity::scope::DocumentScope;

use super::DocumentService;

/// What a listing call should return.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Folder to list; the partition root when absent.
    pub folder_id: Option<FolderId>,
    /// Case-insensitive name search across the whole partition.
    pub search: Option<String>,
}

impl DocumentFilter {
    /// List the contents of one folder.
    pub fn folder(folder_id: FolderId) -> Self {
        Self {
            folder_id: Some(folder_id),
            search: None,
        }
    }

    /// Search the partition for `term`.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            folder_id: None,
            search: Some(term.into()),
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

impl DocumentService {
    /// List a folder's direct children, or search the whole partition
    /// (`getCategoryDocuments`).
    ///
    /// A partition that has never been used has no root; it lists as empty
    /// rather than creating one.
    pub async fn get_documents(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        filter: &DocumentFilter,
    ) -> AppResult<DocumentListing> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());

        if let Some(term) = filter.search_term() {
            let folders = self.folders.search(&scope, term).await?;
            let files = self.files.search(&scope, term).await?;
            debug!(
                facility_id = %facility_id,
                category = %CategoryTag::path_segment(category),
                folders = folders.len(),
                files = files.len(),
                "Search completed"
            );
            return Ok(DocumentListing {
                folders: folders.into_iter().map(FolderEntry::from).collect(),
                files: files.into_iter().map(FileEntry::from).collect(),
                breadcrumbs: Vec::new(),
                current_folder: None,
            });
        }

        let current = match filter.folder_id {
            Some(id) => self.scoped_folder(&scope, id).await?,
            None => match self.folders.find_root(&scope).await? {
                Some(root) => root,
                None => return Ok(DocumentListing::default()),
            },
        };

        let folders = self.folders.find_children(&scope, current.id).await?;
        let files = self
            .files
            .list_in_folder(&scope, current.id, current.is_root())
            .await?;
        let breadcrumbs = self
            .folders
            .find_ancestors(current.id)
            .await?
            .into_iter()
            .map(|f| Breadcrumb {
                id: f.id,
                name: f.name,
            })
            .collect();

        Ok(DocumentListing {
            folders: folders.into_iter().map(FolderEntry::from).collect(),
            files: files.into_iter().map(FileEntry::from).collect(),
            breadcrumbs,
            current_folder: Some(current),
        })
    }

    /// Folder and file counts of one partition, all depths (`getCategoryStats`).
    pub async fn get_stats(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
    ) -> AppResult<CategoryStats> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        Ok(CategoryStats {
            folder_count: self.folders.count(&scope).await?,
            file_count: self.files.count(&scope).await?,
        })
    }

    /// The partition's folders as a nested tree.
    pub async fn get_folder_tree(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
    ) -> AppResult<FolderTree> {
        self.profile_for(category)?;
        let scope = DocumentScope::for_category(facility_id, category.cloned());
        let folders = self.folders.list(&scope).await?;
        Ok(FolderTree::build(folders))
    }

    /// Per-category counts for every category of `domain`.
    ///
    /// Every configured subtype is reported, with zero counts when unused.
    pub async fn get_domain_stats(
        &self,
        facility_id: FacilityId,
        domain: &str,
    ) -> AppResult<Vec<DomainCategoryStats>> {
        let profile = self
            .config
            .domains
            .by_prefix(Some(domain))
            .ok_or_else(|| AppError::validation("domain", format!("Unknown domain '{domain}'")))?;
        let scope = DocumentScope::for_domain(facility_id, domain);

        let mut merged: BTreeMap<CategoryTag, CategoryStats> = BTreeMap::new();
        if profile.is_flat() {
            merged.insert(CategoryTag::flat(domain)?, CategoryStats::default());
        }
        for subtype in &profile.subtypes {
            merged.insert(
                CategoryTag::with_subtype(domain, subtype.as_str())?,
                CategoryStats::default(),
            );
        }

        for (category, count) in self.folders.count_by_category(&scope).await? {
            if let Some(category) = category {
                merged.entry(category).or_default().folder_count += count;
            }
        }
        for (category, count) in self.files.count_by_category(&scope).await? {
            if let Some(category) = category {
                merged.entry(category).or_default().file_count += count;
            }
        }

        Ok(merged
            .into_iter()
            .map(|(category, stats)| DomainCategoryStats { category, stats })
            .collect())
    }
}
