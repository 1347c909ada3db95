//! # docstore-entity
//!
//! Domain entity models for the facility document store. Folders and files
//! are database rows partitioned by facility and [`CategoryTag`]; every read
//! and write goes through a [`DocumentScope`].

pub mod category;
pub mod file;
pub mod folder;
pub mod listing;
pub mod scope;

pub use category::CategoryTag;
pub use file::{CreateFile, File};
pub use folder::{CreateFolder, Folder, FolderNode, FolderSummary, FolderTree};
pub use listing::{
    Breadcrumb, CategoryStats, DeleteResponse, DocumentListing, DomainCategoryStats, FileEntry,
    FileResponse, FolderEntry, FolderResponse,
};
pub use scope::{CategoryFilter, DocumentScope};
