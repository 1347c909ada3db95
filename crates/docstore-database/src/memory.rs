//! In-memory folder/file repository using a Tokio mutex.
//!
//! Folders and files live in an arena keyed by id; parent links are ids,
//! never references. Each mutation holds the lock for its whole check and
//! write, so the uniqueness rules hold under concurrent callers exactly as
//! the database indexes enforce them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, FileId, FolderId};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::{CreateFile, File};
use docstore_entity::folder::{CreateFolder, Folder, FolderSummary};
use docstore_entity::scope::DocumentScope;

use crate::repositories::{CategoryCounts, FileRepository, FolderRepository};

#[derive(Debug, Default)]
struct Arena {
    folders: HashMap<FolderId, Folder>,
    files: HashMap<FileId, File>,
}

impl Arena {
    fn sibling_taken(&self, data: &CreateFolder, except: Option<FolderId>) -> bool {
        self.folders.values().any(|f| {
            Some(f.id) != except
                && f.facility_id == data.facility_id
                && f.category == data.category
                && f.parent_id == data.parent_id
                && f.name == data.name
        })
    }

    fn root_of(&self, facility_id: FacilityId, category: Option<&CategoryTag>) -> Option<&Folder> {
        self.folders
            .values()
            .find(|f| f.is_root() && f.belongs_to(facility_id, category))
    }

    fn summary(&self, folder: &Folder) -> FolderSummary {
        let file_count = self
            .files
            .values()
            .filter(|file| file.folder_id == Some(folder.id))
            .count() as i64;
        FolderSummary {
            folder: folder.clone(),
            file_count,
        }
    }

    fn summaries<P>(&self, predicate: P) -> Vec<FolderSummary>
    where
        P: Fn(&Folder) -> bool,
    {
        let mut found: Vec<FolderSummary> = self
            .folders
            .values()
            .filter(|&f| predicate(f))
            .map(|f| self.summary(f))
            .collect();
        found.sort_by(|a, b| a.folder.name.cmp(&b.folder.name));
        found
    }

    fn insert_file(&mut self, file: File) -> AppResult<File> {
        if self.files.values().any(|f| f.file_path == file.file_path) {
            return Err(AppError::duplicate_name(format!(
                "Stored path collision for '{}'",
                file.file_path
            )));
        }
        if let Some(folder_id) = file.folder_id {
            if !self.folders.contains_key(&folder_id) {
                return Err(AppError::database(format!(
                    "Folder {folder_id} does not exist"
                )));
            }
        }
        self.files.insert(file.id, file.clone());
        Ok(file)
    }

    fn files_where<P>(&self, predicate: P) -> Vec<File>
    where
        P: Fn(&File) -> bool,
    {
        let mut found: Vec<File> = self.files.values().filter(|&f| predicate(f)).cloned().collect();
        found.sort_by(|a, b| {
            a.original_name
                .cmp(&b.original_name)
                .then(a.created_at.cmp(&b.created_at))
        });
        found
    }

    fn insert_folder(&mut self, data: &CreateFolder) -> AppResult<Folder> {
        let root_taken = data.parent_id.is_none()
            && self
                .root_of(data.facility_id, data.category.as_ref())
                .is_some();
        if root_taken || self.sibling_taken(data, None) {
            return Err(AppError::duplicate_name(format!(
                "A folder named '{}' already exists here",
                data.name
            )));
        }
        if let Some(parent_id) = data.parent_id {
            if !self.folders.contains_key(&parent_id) {
                return Err(AppError::database(format!(
                    "Parent folder {parent_id} does not exist"
                )));
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            facility_id: data.facility_id,
            category: data.category.clone(),
            parent_id: data.parent_id,
            name: data.name.clone(),
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn group_counts<'a, I>(categories: I) -> CategoryCounts
where
    I: Iterator<Item = Option<&'a CategoryTag>>,
{
    let mut counts: HashMap<Option<CategoryTag>, u64> = HashMap::new();
    for category in categories {
        *counts.entry(category.cloned()).or_default() += 1;
    }
    let mut counts: CategoryCounts = counts.into_iter().collect();
    counts.sort_by(|a, b| a.0.cmp(&b.0));
    counts
}

/// Folder and file repository held entirely in process memory.
///
/// Clones share the same arena.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentRepository {
    arena: Arc<Mutex<Arena>>,
}

impl MemoryDocumentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FolderRepository for MemoryDocumentRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.arena.lock().await.folders.get(&id).cloned())
    }

    async fn find_root(&self, scope: &DocumentScope) -> AppResult<Option<Folder>> {
        let Some(category) = scope.exact_category() else {
            return Err(AppError::internal(
                "Root lookup requires a single category partition",
            ));
        };
        let arena = self.arena.lock().await;
        Ok(arena.root_of(scope.facility_id(), category).cloned())
    }

    async fn find_children(
        &self,
        scope: &DocumentScope,
        parent_id: FolderId,
    ) -> AppResult<Vec<FolderSummary>> {
        let arena = self.arena.lock().await;
        Ok(arena.summaries(|f| scope.contains_folder(f) && f.parent_id == Some(parent_id)))
    }

    async fn find_ancestors(&self, folder_id: FolderId) -> AppResult<Vec<Folder>> {
        let arena = self.arena.lock().await;
        let Some(start) = arena.folders.get(&folder_id) else {
            return Ok(Vec::new());
        };

        let bound = arena
            .folders
            .values()
            .filter(|f| f.facility_id == start.facility_id)
            .count();
        let mut seen = HashSet::new();
        let mut chain = vec![start.clone()];
        let mut current = start;

        while let Some(parent_id) = current.parent_id {
            if chain.len() > bound || !seen.insert(current.id) {
                return Err(AppError::internal(format!(
                    "Folder {folder_id} has a cyclic parent chain"
                )));
            }
            let Some(parent) = arena.folders.get(&parent_id) else {
                return Err(AppError::internal(format!(
                    "Folder {} references missing parent {parent_id}",
                    current.id
                )));
            };
            chain.push(parent.clone());
            current = parent;
        }

        chain.reverse();
        Ok(chain)
    }

    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<FolderSummary>> {
        let arena = self.arena.lock().await;
        Ok(arena.summaries(|f| scope.contains_folder(f) && contains_ignore_case(&f.name, term)))
    }

    async fn list(&self, scope: &DocumentScope) -> AppResult<Vec<FolderSummary>> {
        let arena = self.arena.lock().await;
        Ok(arena.summaries(|f| scope.contains_folder(f)))
    }

    async fn count(&self, scope: &DocumentScope) -> AppResult<u64> {
        let arena = self.arena.lock().await;
        Ok(arena.folders.values().filter(|f| scope.contains_folder(f)).count() as u64)
    }

    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts> {
        let arena = self.arena.lock().await;
        Ok(group_counts(
            arena
                .folders
                .values()
                .filter(|f| scope.contains_folder(f))
                .map(|f| f.category.as_ref()),
        ))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.arena.lock().await.insert_folder(data)
    }

    async fn create_root(
        &self,
        root: &CreateFolder,
        subfolders: &[String],
    ) -> AppResult<Option<Folder>> {
        let mut arena = self.arena.lock().await;
        if arena.root_of(root.facility_id, root.category.as_ref()).is_some() {
            return Ok(None);
        }

        let created = arena.insert_folder(root)?;
        let mut inserted = vec![created.id];
        for name in subfolders {
            let child = CreateFolder::child_of(&created, name.clone(), root.created_by);
            match arena.insert_folder(&child) {
                Ok(folder) => inserted.push(folder.id),
                Err(e) => {
                    for id in inserted {
                        arena.folders.remove(&id);
                    }
                    return Err(e);
                }
            }
        }
        Ok(Some(created))
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        let mut arena = self.arena.lock().await;
        let Some(existing) = arena.folders.get(&id) else {
            return Err(AppError::not_found(format!("Folder {id} not found")));
        };

        let probe = CreateFolder {
            facility_id: existing.facility_id,
            category: existing.category.clone(),
            parent_id: existing.parent_id,
            name: name.to_string(),
            created_by: existing.created_by,
        };
        if arena.sibling_taken(&probe, Some(id)) {
            return Err(AppError::duplicate_name(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        let folder = arena
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = name.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn delete_if_empty(&self, id: FolderId) -> AppResult<bool> {
        let mut arena = self.arena.lock().await;
        let has_children = arena.folders.values().any(|f| f.parent_id == Some(id));
        let has_files = arena.files.values().any(|f| f.folder_id == Some(id));
        if has_children || has_files {
            return Ok(false);
        }
        Ok(arena.folders.remove(&id).is_some())
    }
}

#[async_trait]
impl FileRepository for MemoryDocumentRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.arena.lock().await.files.get(&id).cloned())
    }

    async fn list_in_folder(
        &self,
        scope: &DocumentScope,
        folder_id: FolderId,
        include_unfiled: bool,
    ) -> AppResult<Vec<File>> {
        let arena = self.arena.lock().await;
        Ok(arena.files_where(|f| {
            scope.contains_file(f)
                && (f.folder_id == Some(folder_id) || (include_unfiled && f.folder_id.is_none()))
        }))
    }

    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<File>> {
        let arena = self.arena.lock().await;
        Ok(arena.files_where(|f| {
            scope.contains_file(f) && contains_ignore_case(&f.original_name, term)
        }))
    }

    async fn count(&self, scope: &DocumentScope) -> AppResult<u64> {
        let arena = self.arena.lock().await;
        Ok(arena.files.values().filter(|f| scope.contains_file(f)).count() as u64)
    }

    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts> {
        let arena = self.arena.lock().await;
        Ok(group_counts(
            arena
                .files
                .values()
                .filter(|f| scope.contains_file(f))
                .map(|f| f.category.as_ref()),
        ))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let now = Utc::now();
        let file = File {
            id: data.id,
            facility_id: data.facility_id,
            category: data.category.clone(),
            folder_id: data.folder_id,
            original_name: data.original_name.clone(),
            stored_name: data.stored_name.clone(),
            file_path: data.file_path.clone(),
            file_size: data.file_size,
            mime_type: data.mime_type.clone(),
            file_extension: data.file_extension.clone(),
            uploaded_by: data.uploaded_by,
            created_at: now,
            updated_at: now,
        };
        self.arena.lock().await.insert_file(file)
    }

    async fn restore(&self, file: &File) -> AppResult<File> {
        self.arena.lock().await.insert_file(file.clone())
    }

    async fn rename(&self, id: FileId, original_name: &str) -> AppResult<File> {
        let mut arena = self.arena.lock().await;
        let file = arena
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::file_not_found(format!("File {id} not found")))?;
        file.original_name = original_name.to_string();
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        Ok(self.arena.lock().await.files.remove(&id).is_some())
    }
}
