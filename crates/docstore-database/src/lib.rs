//! # docstore-database
//!
//! PostgreSQL connection management, schema migrations, and the folder/file
//! repositories. An in-memory repository with the same uniqueness guarantees
//! backs tests and the `memory` storage profile.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryDocumentRepository;
pub use repositories::{FileRepository, FolderRepository, PgFileRepository, PgFolderRepository};
