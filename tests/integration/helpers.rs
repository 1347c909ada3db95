//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use docstore_core::config::DocumentsConfig;
use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::traits::storage::StorageProvider;
use docstore_core::types::{FacilityId, FileId, FolderId, UserId};
use docstore_database::repositories::CategoryCounts;
use docstore_database::{FileRepository, MemoryDocumentRepository};
use docstore_entity::category::CategoryTag;
use docstore_entity::file::{CreateFile, File};
use docstore_entity::scope::DocumentScope;
use docstore_service::{Actor, DocumentService, DocumentServices, UploadBlob};
use docstore_storage::MemoryStorageProvider;

/// A fully wired document engine over in-memory persistence and storage.
pub struct TestApp {
    /// The generic engine
    pub engine: Arc<DocumentService>,
    /// Per-domain services sharing `engine`
    pub services: DocumentServices,
    /// Folder and file rows
    pub repo: Arc<MemoryDocumentRepository>,
    /// Facility used by most tests
    pub facility: FacilityId,
    /// Acting user used by most tests
    pub actor: Actor,
}

impl TestApp {
    /// Engine over a plain in-memory blob store.
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorageProvider::new()))
    }

    /// Engine over the given blob store.
    pub fn with_storage(storage: Arc<dyn StorageProvider>) -> Self {
        let repo = Arc::new(MemoryDocumentRepository::new());
        Self::build(repo.clone(), repo, storage)
    }

    /// Engine whose file rows go through `files` instead of the arena.
    pub fn with_file_repository(
        repo: Arc<MemoryDocumentRepository>,
        files: Arc<dyn FileRepository>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self::build(repo, files, storage)
    }

    fn build(
        repo: Arc<MemoryDocumentRepository>,
        files: Arc<dyn FileRepository>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        let engine = Arc::new(DocumentService::new(
            repo.clone(),
            files,
            storage,
            DocumentsConfig::default(),
        ));
        Self {
            services: DocumentServices::new(engine.clone()),
            engine,
            repo,
            facility: FacilityId::new(),
            actor: Actor::new(UserId::new()),
        }
    }

    /// Look a file row up directly in the arena.
    pub async fn file_row(&self, id: FileId) -> Option<File> {
        FileRepository::find_by_id(&*self.repo, id).await.unwrap()
    }

    /// Number of file rows in one partition.
    pub async fn file_rows(&self, category: Option<&CategoryTag>) -> u64 {
        let scope = DocumentScope::for_category(self.facility, category.cloned());
        FileRepository::count(&*self.repo, &scope).await.unwrap()
    }

    /// Create a folder under `parent` (or the root) and return its id.
    pub async fn folder(
        &self,
        category: Option<&CategoryTag>,
        parent: Option<FolderId>,
        name: &str,
    ) -> FolderId {
        self.engine
            .create_folder(self.facility, category, parent, name, &self.actor)
            .await
            .unwrap()
            .id
    }

    /// Upload a small PDF and return the file row.
    pub async fn upload(
        &self,
        category: Option<&CategoryTag>,
        folder: Option<FolderId>,
        name: &str,
        content: &'static [u8],
    ) -> File {
        self.engine
            .upload_file(self.facility, category, folder, pdf(name, content), &self.actor)
            .await
            .unwrap()
    }
}

/// Parse a joined category tag.
pub fn tag(value: &str) -> CategoryTag {
    CategoryTag::parse(value).unwrap()
}

/// A PDF upload with the given content.
pub fn pdf(name: &str, content: &'static [u8]) -> UploadBlob {
    UploadBlob::new(name, Bytes::from_static(content)).with_mime_type("application/pdf")
}

/// Blob store that can be told to fail writes or deletes.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorageProvider,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Number of stored blobs.
    pub fn blob_count(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl StorageProvider for FlakyStorage {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::storage("disk full"));
        }
        self.inner.put(path, data).await
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        self.inner.get(path).await
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::storage("device busy"));
        }
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// File repository whose inserts can be made to fail.
#[derive(Debug)]
pub struct FlakyFileRepository {
    inner: Arc<dyn FileRepository>,
    fail_create: AtomicBool,
}

impl FlakyFileRepository {
    pub fn new(inner: Arc<dyn FileRepository>) -> Self {
        Self {
            inner,
            fail_create: AtomicBool::new(false),
        }
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileRepository for FlakyFileRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        self.inner.find_by_id(id).await
    }

    async fn list_in_folder(
        &self,
        scope: &DocumentScope,
        folder_id: FolderId,
        include_unfiled: bool,
    ) -> AppResult<Vec<File>> {
        self.inner
            .list_in_folder(scope, folder_id, include_unfiled)
            .await
    }

    async fn search(&self, scope: &DocumentScope, term: &str) -> AppResult<Vec<File>> {
        self.inner.search(scope, term).await
    }

    async fn count(&self, scope: &DocumentScope) -> AppResult<u64> {
        self.inner.count(scope).await
    }

    async fn count_by_category(&self, scope: &DocumentScope) -> AppResult<CategoryCounts> {
        self.inner.count_by_category(scope).await
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset"));
        }
        self.inner.create(data).await
    }

    async fn restore(&self, file: &File) -> AppResult<File> {
        self.inner.restore(file).await
    }

    async fn rename(&self, id: FileId, original_name: &str) -> AppResult<File> {
        self.inner.rename(id, original_name).await
    }

    async fn delete(&self, id: FileId) -> AppResult<bool> {
        self.inner.delete(id).await
    }
}
