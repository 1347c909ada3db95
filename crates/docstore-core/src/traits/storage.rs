//! Storage provider trait for pluggable blob storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for document blob storage backends.
///
/// Paths are relative, `/`-separated, and produced by the path resolver in
/// `docstore-storage`; providers never interpret the segments. A missing
/// blob on [`get`](StorageProvider::get) is reported with
/// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) so callers can
/// tell it apart from I/O failures.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes to `path`, replacing any existing content.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read the complete content stored at `path`.
    async fn get(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the blob at `path`. Returns `false` when nothing was there.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Check whether a blob exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
