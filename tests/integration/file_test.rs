//! Integration tests for file upload, download, preview, rename, and delete.

use std::sync::Arc;

use bytes::Bytes;

use docstore_core::error::ErrorKind;
use docstore_core::traits::storage::StorageProvider;
use docstore_core::types::FileId;
use docstore_service::UploadBlob;
use docstore_storage::MemoryStorageProvider;

use crate::helpers::{TestApp, pdf, tag};

#[tokio::test]
async fn test_upload_records_metadata() {
    let app = TestApp::new();
    let contracts = tag("contracts");

    let file = app.upload(Some(&contracts), None, "契約書 2024.PDF", b"%PDF-1.7").await;
    let root = app
        .engine
        .get_or_create_root(app.facility, Some(&contracts), &app.actor)
        .await
        .unwrap();

    assert_eq!(file.folder_id, Some(root.id));
    assert_eq!(file.category, Some(contracts));
    assert_eq!(file.original_name, "契約書 2024.PDF");
    assert_eq!(file.file_extension, "PDF");
    assert_eq!(file.mime_type, "application/pdf");
    assert_eq!(file.file_size, 8);
    assert_eq!(file.uploaded_by, app.actor.user_id);
    assert!(file.stored_name.ends_with(".PDF"));
    assert!(file.file_path.ends_with(&file.stored_name));
    assert!(
        file.file_path
            .starts_with(&format!("documents/{}/contracts/{}", app.facility, root.id))
    );
}

#[tokio::test]
async fn test_same_name_uploads_get_distinct_paths() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");
    let folder = app.folder(Some(&gas), None, "Reports").await;

    let first = app.upload(Some(&gas), Some(folder), "report.pdf", b"first").await;
    let second = app.upload(Some(&gas), Some(folder), "report.pdf", b"second").await;

    assert_ne!(first.stored_name, second.stored_name);
    assert_ne!(first.file_path, second.file_path);

    let a = app.engine.download_file(app.facility, Some(&gas), first.id).await.unwrap();
    let b = app.engine.download_file(app.facility, Some(&gas), second.id).await.unwrap();
    assert_eq!(a.data, Bytes::from_static(b"first"));
    assert_eq!(b.data, Bytes::from_static(b"second"));
}

#[tokio::test]
async fn test_download_is_an_attachment_under_the_original_name() {
    let app = TestApp::new();
    let file = app.upload(None, None, "見積書.pdf", b"%PDF").await;

    let content = app.engine.download_file(app.facility, None, file.id).await.unwrap();
    assert_eq!(content.content_type, "application/pdf");
    assert_eq!(
        content.content_disposition.as_deref(),
        Some("attachment; filename=\"見積書.pdf\"")
    );
    assert_eq!(content.file.id, file.id);
}

#[tokio::test]
async fn test_preview_only_for_previewable_types() {
    let app = TestApp::new();
    let image = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("photo.png", Bytes::from_static(b"\x89PNG")),
            &app.actor,
        )
        .await
        .unwrap();
    let sheet = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("budget.xlsx", Bytes::from_static(b"PK")),
            &app.actor,
        )
        .await
        .unwrap();

    let preview = app.engine.preview_file(app.facility, None, image.id).await.unwrap();
    assert_eq!(preview.content_type, "image/png");
    assert!(preview.content_disposition.is_none());

    let err = app.engine.preview_file(app.facility, None, sheet.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedPreviewType);
}

#[tokio::test]
async fn test_missing_blob_is_file_not_found() {
    let storage = Arc::new(MemoryStorageProvider::new());
    let app = TestApp::with_storage(storage.clone());
    let file = app.upload(None, None, "a.pdf", b"%PDF").await;

    assert!(storage.delete(&file.file_path).await.unwrap());

    let err = app.engine.download_file(app.facility, None, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
    let err = app.engine.preview_file(app.facility, None, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    // The row survives a failed read and can still be deleted.
    assert!(app.file_row(file.id).await.is_some());
    app.engine
        .delete_file(app.facility, None, file.id, &app.actor)
        .await
        .unwrap();
    assert!(app.file_row(file.id).await.is_none());
}

#[tokio::test]
async fn test_unknown_file_is_file_not_found() {
    let app = TestApp::new();
    let err = app
        .engine
        .download_file(app.facility, None, FileId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);
}

#[tokio::test]
async fn test_rejected_uploads_change_nothing() {
    let storage = Arc::new(MemoryStorageProvider::new());
    let app = TestApp::with_storage(storage.clone());

    let err = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("setup.exe", Bytes::from_static(b"MZ")),
            &app.actor,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFileType);

    static BIG: [u8; 11 * 1024 * 1024] = [0; 11 * 1024 * 1024];
    let err = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("big.pdf", Bytes::from_static(&BIG)),
            &app.actor,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileTooLarge);
    assert!(err.is_validation());

    assert!(storage.is_empty());
    assert_eq!(app.file_rows(None).await, 0);
}

#[tokio::test]
async fn test_contracts_accept_larger_files() {
    let app = TestApp::new();
    let contracts = tag("contracts");

    static BIG: [u8; 11 * 1024 * 1024] = [0; 11 * 1024 * 1024];
    let file = app.upload(Some(&contracts), None, "scan.pdf", &BIG).await;
    assert_eq!(file.file_size, BIG.len() as i64);
}

#[tokio::test]
async fn test_upload_into_foreign_folder_is_rejected() {
    let storage = Arc::new(MemoryStorageProvider::new());
    let app = TestApp::with_storage(storage.clone());
    let interior = tag("maintenance_interior");
    let exterior = tag("maintenance_exterior");

    let folder = app.folder(Some(&interior), None, "Walls").await;
    let err = app
        .engine
        .upload_file(app.facility, Some(&exterior), Some(folder), pdf("a.pdf", b"%PDF"), &app.actor)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FolderOwnershipMismatch);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_rename_file_keeps_storage() {
    let app = TestApp::new();
    let file = app.upload(None, None, "draft.pdf", b"%PDF").await;

    let renamed = app
        .engine
        .rename_file(app.facility, None, file.id, "final.pdf", &app.actor)
        .await
        .unwrap();

    assert_eq!(renamed.original_name, "final.pdf");
    assert_eq!(renamed.file_path, file.file_path);
    assert_eq!(renamed.stored_name, file.stored_name);

    let content = app.engine.download_file(app.facility, None, file.id).await.unwrap();
    assert_eq!(
        content.content_disposition.as_deref(),
        Some("attachment; filename=\"final.pdf\"")
    );
}

#[tokio::test]
async fn test_rename_cannot_change_file_type() {
    let app = TestApp::new();
    let file = app.upload(None, None, "a.pdf", b"%PDF").await;

    let err = app
        .engine
        .rename_file(app.facility, None, file.id, "a.exe", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFileType);
    assert_eq!(app.file_row(file.id).await.unwrap().original_name, "a.pdf");

    let renamed = app
        .engine
        .rename_file(app.facility, None, file.id, "Minutes.PDF", &app.actor)
        .await
        .unwrap();
    assert_eq!(renamed.original_name, "Minutes.PDF");
}

#[tokio::test]
async fn test_declared_type_must_match_extension() {
    let app = TestApp::new();

    let err = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("macro.docx", Bytes::from_static(b"PK")).with_mime_type("text/plain"),
            &app.actor,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFileType);
    assert_eq!(app.file_rows(None).await, 0);

    let doc = app
        .engine
        .upload_file(
            app.facility,
            None,
            None,
            UploadBlob::new("macro.docx", Bytes::from_static(b"PK")),
            &app.actor,
        )
        .await
        .unwrap();
    let err = app.engine.preview_file(app.facility, None, doc.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedPreviewType);
}

#[tokio::test]
async fn test_delete_file_removes_blob() {
    let storage = Arc::new(MemoryStorageProvider::new());
    let app = TestApp::with_storage(storage.clone());
    let file = app.upload(None, None, "a.pdf", b"%PDF").await;
    assert_eq!(storage.len(), 1);

    app.engine
        .delete_file(app.facility, None, file.id, &app.actor)
        .await
        .unwrap();

    assert!(storage.is_empty());
    assert!(app.file_row(file.id).await.is_none());
}
