//! Storage provider implementations.

pub mod local;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use docstore_core::config::{StorageBackend, StorageConfig};
use docstore_core::result::AppResult;
use docstore_core::traits::storage::StorageProvider;

pub use local::LocalStorageProvider;
pub use memory::MemoryStorageProvider;

/// Build the provider selected by `storage.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match config.provider {
        StorageBackend::Local => {
            Arc::new(LocalStorageProvider::new(&config.local.root_path).await?)
        }
        StorageBackend::Memory => Arc::new(MemoryStorageProvider::new()),
    };
    info!(provider = provider.provider_type(), "Storage provider ready");
    Ok(provider)
}
