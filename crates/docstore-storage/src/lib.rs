//! # docstore-storage
//!
//! Blob storage for document content: a local filesystem provider, an
//! in-memory provider, and the resolver that turns a facility, category,
//! and folder chain into a stable storage path.

pub mod path;
pub mod providers;

pub use path::{ResolvedPath, StoragePathResolver};
pub use providers::{LocalStorageProvider, MemoryStorageProvider, build_provider};
