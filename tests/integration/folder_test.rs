//! Integration tests for folder operations.

use docstore_core::error::ErrorKind;
use docstore_core::types::FolderId;
use docstore_service::DocumentFilter;

use crate::helpers::{TestApp, tag};

#[tokio::test]
async fn test_root_is_created_once() {
    let app = TestApp::new();
    let contracts = tag("contracts");

    let first = app
        .engine
        .get_or_create_root(app.facility, Some(&contracts), &app.actor)
        .await
        .unwrap();
    let second = app
        .engine
        .get_or_create_root(app.facility, Some(&contracts), &app.actor)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(first.is_root());
    assert_eq!(first.name, "契約書類");

    let stats = app.engine.get_stats(app.facility, Some(&contracts)).await.unwrap();
    assert_eq!(stats.folder_count, 5);
}

#[tokio::test]
async fn test_concurrent_root_creation_yields_one_root() {
    let app = TestApp::new();
    let contracts = tag("contracts");

    let (a, b) = tokio::join!(
        app.engine
            .get_or_create_root(app.facility, Some(&contracts), &app.actor),
        app.engine
            .get_or_create_root(app.facility, Some(&contracts), &app.actor),
    );
    assert_eq!(a.unwrap().id, b.unwrap().id);

    let stats = app.engine.get_stats(app.facility, Some(&contracts)).await.unwrap();
    assert_eq!(stats.folder_count, 5);
}

#[tokio::test]
async fn test_folder_without_parent_goes_under_root() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");

    let folder = app
        .engine
        .create_folder(app.facility, Some(&gas), None, "Meters", &app.actor)
        .await
        .unwrap();
    let root = app
        .engine
        .get_or_create_root(app.facility, Some(&gas), &app.actor)
        .await
        .unwrap();

    assert_eq!(folder.parent_id, Some(root.id));
    assert_eq!(folder.category, Some(gas));
}

#[tokio::test]
async fn test_sibling_names_are_unique() {
    let app = TestApp::new();
    let electrical = tag("lifeline_electrical");
    let water = tag("lifeline_water");

    let panels = app.folder(Some(&electrical), None, "Panels").await;
    let err = app
        .engine
        .create_folder(app.facility, Some(&electrical), None, "Panels", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    // Same name under another parent, or in another category, is fine.
    app.folder(Some(&electrical), Some(panels), "Panels").await;
    app.folder(Some(&water), None, "Panels").await;
}

#[tokio::test]
async fn test_names_are_validated() {
    let app = TestApp::new();

    for bad in ["", "   ", "a/b", "a\\b"] {
        let err = app
            .engine
            .create_folder(app.facility, None, None, bad, &app.actor)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
    }

    let err = app
        .engine
        .create_folder(app.facility, None, None, &"x".repeat(256), &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.fields[0].field, "name");

    let stats = app.engine.get_stats(app.facility, None).await.unwrap();
    assert_eq!(stats.folder_count, 0);
}

#[tokio::test]
async fn test_parent_from_other_category_is_rejected() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");
    let water = tag("lifeline_water");

    let gas_folder = app.folder(Some(&gas), None, "Valves").await;
    let err = app
        .engine
        .create_folder(app.facility, Some(&water), Some(gas_folder), "Pipes", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderOwnershipMismatch);

    let stats = app.engine.get_stats(app.facility, Some(&water)).await.unwrap();
    assert_eq!(stats.folder_count, 0);
}

#[tokio::test]
async fn test_unknown_parent_is_not_found() {
    let app = TestApp::new();
    let err = app
        .engine
        .create_folder(app.facility, None, Some(FolderId::new()), "x", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_rename_checks_siblings() {
    let app = TestApp::new();
    let a = app.folder(None, None, "A").await;
    app.folder(None, None, "B").await;

    let err = app
        .engine
        .rename_folder(app.facility, None, a, "B", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    let renamed = app
        .engine
        .rename_folder(app.facility, None, a, " C ", &app.actor)
        .await
        .unwrap();
    assert_eq!(renamed.name, "C");
    assert_eq!(renamed.id, a);
}

#[tokio::test]
async fn test_non_empty_folder_cannot_be_deleted() {
    let app = TestApp::new();
    let electrical = tag("lifeline_electrical");

    let outer = app.folder(Some(&electrical), None, "Outer").await;
    let inner = app.folder(Some(&electrical), Some(outer), "Inner").await;
    let file = app.upload(Some(&electrical), Some(inner), "plan.pdf", b"%PDF-1").await;

    for id in [outer, inner] {
        let err = app
            .engine
            .delete_folder(app.facility, Some(&electrical), id, &app.actor)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FolderNotEmpty);
    }
    assert!(app.file_row(file.id).await.is_some());

    app.engine
        .delete_file(app.facility, Some(&electrical), file.id, &app.actor)
        .await
        .unwrap();
    app.engine
        .delete_folder(app.facility, Some(&electrical), inner, &app.actor)
        .await
        .unwrap();
    app.engine
        .delete_folder(app.facility, Some(&electrical), outer, &app.actor)
        .await
        .unwrap();

    let listing = app
        .engine
        .get_documents(app.facility, Some(&electrical), &DocumentFilter::default())
        .await
        .unwrap();
    assert!(listing.folders.is_empty());
}

#[tokio::test]
async fn test_folder_tree_nests_children() {
    let app = TestApp::new();
    let a = app.folder(None, None, "A").await;
    app.folder(None, Some(a), "A1").await;
    app.folder(None, None, "B").await;

    let tree = app.engine.get_folder_tree(app.facility, None).await.unwrap();
    assert_eq!(tree.total_folders, 4);
    assert_eq!(tree.roots.len(), 1);
    let root = &tree.roots[0];
    let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(root.children[0].children[0].name, "A1");
}
