//! Category and facility isolation.

use docstore_core::error::ErrorKind;
use docstore_core::types::FacilityId;
use docstore_entity::category::CategoryTag;
use docstore_service::DocumentFilter;

use crate::helpers::{TestApp, tag};

async fn listing_names(app: &TestApp, category: Option<&CategoryTag>) -> (Vec<String>, Vec<String>) {
    let listing = app
        .engine
        .get_documents(app.facility, category, &DocumentFilter::default())
        .await
        .unwrap();
    (
        listing.folders.into_iter().map(|f| f.name).collect(),
        listing.files.into_iter().map(|f| f.original_name).collect(),
    )
}

#[tokio::test]
async fn test_listings_never_cross_categories() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");
    let water = tag("lifeline_water");

    app.folder(None, None, "main-folder").await;
    app.upload(None, None, "main.pdf", b"m").await;
    app.folder(Some(&gas), None, "gas-folder").await;
    app.upload(Some(&gas), None, "gas.pdf", b"g").await;
    app.folder(Some(&water), None, "water-folder").await;

    assert_eq!(
        listing_names(&app, None).await,
        (vec!["main-folder".to_string()], vec!["main.pdf".to_string()])
    );
    assert_eq!(
        listing_names(&app, Some(&gas)).await,
        (vec!["gas-folder".to_string()], vec!["gas.pdf".to_string()])
    );
    assert_eq!(
        listing_names(&app, Some(&water)).await,
        (vec!["water-folder".to_string()], Vec::new())
    );
}

#[tokio::test]
async fn test_ids_from_other_partitions_are_refused() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");
    let water = tag("lifeline_water");

    let folder = app.folder(Some(&gas), None, "Valves").await;
    let file = app.upload(Some(&gas), Some(folder), "v.pdf", b"v").await;

    let err = app
        .engine
        .get_documents(app.facility, Some(&water), &DocumentFilter::folder(folder))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderOwnershipMismatch);

    let err = app
        .engine
        .rename_folder(app.facility, Some(&water), folder, "Taken", &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FolderOwnershipMismatch);

    let err = app
        .engine
        .delete_file(app.facility, Some(&water), file.id, &app.actor)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    let err = app
        .engine
        .get_file(FacilityId::new(), Some(&gas), file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::FileNotFound);

    assert_eq!(
        app.engine
            .get_folder(app.facility, Some(&gas), folder)
            .await
            .unwrap()
            .name,
        "Valves"
    );
}

#[tokio::test]
async fn test_mutations_leave_other_categories_untouched() {
    let app = TestApp::new();
    let interior = tag("maintenance_interior");
    let exterior = tag("maintenance_exterior");

    let inside = app.folder(Some(&interior), None, "Shared").await;
    let outside = app.folder(Some(&exterior), None, "Shared").await;
    let inside_file = app.upload(Some(&interior), Some(inside), "a.pdf", b"a").await;
    let outside_file = app.upload(Some(&exterior), Some(outside), "a.pdf", b"a").await;

    let before = app
        .engine
        .get_documents(app.facility, Some(&exterior), &DocumentFilter::folder(outside))
        .await
        .unwrap();
    let before_stats = app.engine.get_stats(app.facility, Some(&exterior)).await.unwrap();

    app.engine
        .rename_file(app.facility, Some(&interior), inside_file.id, "b.pdf", &app.actor)
        .await
        .unwrap();
    app.engine
        .delete_file(app.facility, Some(&interior), inside_file.id, &app.actor)
        .await
        .unwrap();
    app.engine
        .rename_folder(app.facility, Some(&interior), inside, "Renamed", &app.actor)
        .await
        .unwrap();
    app.engine
        .delete_folder(app.facility, Some(&interior), inside, &app.actor)
        .await
        .unwrap();

    let after = app
        .engine
        .get_documents(app.facility, Some(&exterior), &DocumentFilter::folder(outside))
        .await
        .unwrap();
    let after_stats = app.engine.get_stats(app.facility, Some(&exterior)).await.unwrap();

    assert_eq!(before_stats, after_stats);
    assert_eq!(before.files, after.files);
    assert_eq!(before.current_folder, after.current_folder);
    assert_eq!(app.file_row(outside_file.id).await, Some(outside_file));
}

#[tokio::test]
async fn test_facilities_are_separate() {
    let app = TestApp::new();
    let other = FacilityId::new();
    let gas = tag("lifeline_gas");

    app.folder(Some(&gas), None, "Meters").await;
    app.engine
        .create_folder(other, Some(&gas), None, "Meters", &app.actor)
        .await
        .unwrap();

    let mine = app.engine.get_stats(app.facility, Some(&gas)).await.unwrap();
    let theirs = app.engine.get_stats(other, Some(&gas)).await.unwrap();
    assert_eq!(mine.folder_count, 2);
    assert_eq!(theirs.folder_count, 2);
}
