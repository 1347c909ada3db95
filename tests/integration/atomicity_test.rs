//! Blob/row consistency when storage or persistence fails mid-operation.

use std::sync::Arc;

use docstore_core::error::ErrorKind;
use docstore_database::{FileRepository, MemoryDocumentRepository};
use docstore_service::DocumentFilter;

use crate::helpers::{FlakyFileRepository, FlakyStorage, TestApp, pdf};

#[tokio::test]
async fn test_failed_blob_write_creates_no_row() {
    let storage = Arc::new(FlakyStorage::new());
    let app = TestApp::with_storage(storage.clone());

    storage.fail_puts(true);
    let err = app
        .engine
        .upload_file(app.facility, None, None, pdf("a.pdf", b"%PDF"), &app.actor)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Storage);
    assert_eq!(app.file_rows(None).await, 0);
    assert_eq!(storage.blob_count(), 0);

    storage.fail_puts(false);
    let file = app.upload(None, None, "a.pdf", b"%PDF").await;
    assert_eq!(app.file_rows(None).await, 1);
    let content = app.engine.download_file(app.facility, None, file.id).await.unwrap();
    assert_eq!(&content.data[..], b"%PDF");
}

#[tokio::test]
async fn test_failed_row_insert_removes_blob() {
    let repo = Arc::new(MemoryDocumentRepository::new());
    let files = Arc::new(FlakyFileRepository::new(repo.clone()));
    let storage = Arc::new(FlakyStorage::new());
    let app = TestApp::with_file_repository(repo, files.clone(), storage.clone());

    files.fail_creates(true);
    let err = app
        .engine
        .upload_file(app.facility, None, None, pdf("a.pdf", b"%PDF"), &app.actor)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(storage.blob_count(), 0);
    assert_eq!(app.file_rows(None).await, 0);
}

#[tokio::test]
async fn test_failed_blob_delete_keeps_row() {
    let storage = Arc::new(FlakyStorage::new());
    let app = TestApp::with_storage(storage.clone());
    let file = app.upload(None, None, "a.pdf", b"%PDF").await;

    storage.fail_deletes(true);
    let err = app
        .engine
        .delete_file(app.facility, None, file.id, &app.actor)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Storage);
    let restored = app.file_row(file.id).await.unwrap();
    assert_eq!(restored, file);
    assert_eq!(storage.blob_count(), 1);

    storage.fail_deletes(false);
    app.engine
        .delete_file(app.facility, None, file.id, &app.actor)
        .await
        .unwrap();
    assert!(app.file_row(file.id).await.is_none());
    assert_eq!(storage.blob_count(), 0);
}

#[tokio::test]
async fn test_restored_row_keeps_its_listing_position() {
    let storage = Arc::new(FlakyStorage::new());
    let app = TestApp::with_storage(storage.clone());
    let first = app.upload(None, None, "report.pdf", b"1").await;
    let second = app.upload(None, None, "report.pdf", b"2").await;

    storage.fail_deletes(true);
    app.engine
        .delete_file(app.facility, None, first.id, &app.actor)
        .await
        .unwrap_err();

    let listing = app
        .engine
        .get_documents(app.facility, None, &DocumentFilter::default())
        .await
        .unwrap();
    let ids: Vec<_> = listing.files.iter().map(|f| f.id).collect();
    assert_eq!(ids, [first.id, second.id]);
}

#[tokio::test]
async fn test_flaky_repository_passes_through() {
    let repo = Arc::new(MemoryDocumentRepository::new());
    let files = Arc::new(FlakyFileRepository::new(repo.clone()));
    let app = TestApp::with_file_repository(repo, files.clone(), Arc::new(FlakyStorage::new()));

    let file = app.upload(None, None, "a.pdf", b"%PDF").await;
    assert_eq!(
        files.find_by_id(file.id).await.unwrap().map(|f| f.id),
        Some(file.id)
    );
}
