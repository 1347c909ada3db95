//! Folder tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use docstore_core::types::FolderId;

use super::model::FolderSummary;

/// A node in a folder tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Depth level (0 for the category root).
    pub depth: u32,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

/// The folder tree of one category partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }

    /// Assemble a tree from a flat list of folders in one partition.
    ///
    /// Folders whose parent is not in the list are treated as roots, so a
    /// partial list still yields every node exactly once.
    pub fn build(folders: Vec<FolderSummary>) -> Self {
        let total_folders = folders.len() as u64;
        let ids: std::collections::HashSet<FolderId> =
            folders.iter().map(|s| s.folder.id).collect();

        let mut by_parent: std::collections::HashMap<Option<FolderId>, Vec<FolderSummary>> =
            std::collections::HashMap::new();
        for summary in folders {
            let parent = summary.folder.parent_id.filter(|p| ids.contains(p));
            by_parent.entry(parent).or_default().push(summary);
        }
        for siblings in by_parent.values_mut() {
            siblings.sort_by(|a, b| a.folder.name.cmp(&b.folder.name));
        }

        let roots = Self::attach(None, 0, &mut by_parent);
        Self {
            roots,
            total_folders,
        }
    }

    fn attach(
        parent: Option<FolderId>,
        depth: u32,
        by_parent: &mut std::collections::HashMap<Option<FolderId>, Vec<FolderSummary>>,
    ) -> Vec<FolderNode> {
        let Some(children) = by_parent.remove(&parent) else {
            return Vec::new();
        };
        children
            .into_iter()
            .map(|summary| FolderNode {
                id: summary.folder.id,
                name: summary.folder.name,
                depth,
                file_count: summary.file_count.max(0) as u64,
                children: Self::attach(Some(summary.folder.id), depth + 1, by_parent),
            })
            .collect()
    }
}
