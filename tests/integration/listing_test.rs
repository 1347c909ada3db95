//! Listing, search, and statistics.

use docstore_core::error::ErrorKind;
use docstore_entity::listing::CategoryStats;
use docstore_service::DocumentFilter;

use crate::helpers::{TestApp, pdf, tag};

#[tokio::test]
async fn test_end_to_end_lifeline_electrical() {
    let app = TestApp::new();
    let electrical = tag("lifeline_electrical");

    let root = app
        .engine
        .get_or_create_root(app.facility, Some(&electrical), &app.actor)
        .await
        .unwrap();
    assert_eq!(root.category, Some(electrical.clone()));
    assert_eq!(root.parent_id, None);

    let panel = app
        .engine
        .create_folder(app.facility, Some(&electrical), Some(root.id), "Panel A", &app.actor)
        .await
        .unwrap();
    assert_eq!(panel.parent_id, Some(root.id));

    let file = app
        .engine
        .upload_file(
            app.facility,
            Some(&electrical),
            Some(panel.id),
            pdf("wiring.pdf", b"%PDF-1.4"),
            &app.actor,
        )
        .await
        .unwrap();
    assert_eq!(file.category, Some(electrical.clone()));
    assert_eq!(file.folder_id, Some(panel.id));

    assert_eq!(
        app.engine.get_stats(app.facility, Some(&electrical)).await.unwrap(),
        CategoryStats {
            folder_count: 2,
            file_count: 1
        }
    );
    assert_eq!(
        app.engine
            .get_stats(app.facility, Some(&tag("lifeline_gas")))
            .await
            .unwrap(),
        CategoryStats::default()
    );
}

#[tokio::test]
async fn test_listing_a_folder_shows_children_and_breadcrumbs() {
    let app = TestApp::new();
    let contracts = tag("contracts");

    let root = app
        .engine
        .get_or_create_root(app.facility, Some(&contracts), &app.actor)
        .await
        .unwrap();
    let listing = app
        .engine
        .get_documents(app.facility, Some(&contracts), &DocumentFilter::default())
        .await
        .unwrap();
    let estimates = listing
        .folders
        .iter()
        .find(|f| f.name == "見積書")
        .unwrap()
        .id;

    let vendor = app.folder(Some(&contracts), Some(estimates), "Vendor X").await;
    app.upload(Some(&contracts), Some(estimates), "b.pdf", b"b").await;
    app.upload(Some(&contracts), Some(estimates), "a.pdf", b"a").await;

    let listing = app
        .engine
        .get_documents(app.facility, Some(&contracts), &DocumentFilter::folder(estimates))
        .await
        .unwrap();

    assert_eq!(listing.current_folder.as_ref().unwrap().id, estimates);
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].id, vendor);
    assert_eq!(listing.folders[0].creator, app.actor.user_id);
    let files: Vec<&str> = listing.files.iter().map(|f| f.original_name.as_str()).collect();
    assert_eq!(files, ["a.pdf", "b.pdf"]);

    let crumbs: Vec<_> = listing.breadcrumbs.iter().map(|b| b.id).collect();
    assert_eq!(crumbs, [root.id, estimates]);
    assert_eq!(listing.breadcrumbs[1].name, "見積書");

    let listing = app
        .engine
        .get_documents(app.facility, Some(&contracts), &DocumentFilter::default())
        .await
        .unwrap();
    let estimates_entry = listing.folders.iter().find(|f| f.id == estimates).unwrap();
    assert_eq!(estimates_entry.file_count, 2);
}

#[tokio::test]
async fn test_unused_partition_lists_empty() {
    let app = TestApp::new();
    let listing = app
        .engine
        .get_documents(app.facility, Some(&tag("lifeline_elevator")), &DocumentFilter::default())
        .await
        .unwrap();

    assert!(listing.folders.is_empty());
    assert!(listing.files.is_empty());
    assert!(listing.current_folder.is_none());

    let stats = app
        .engine
        .get_stats(app.facility, Some(&tag("lifeline_elevator")))
        .await
        .unwrap();
    assert_eq!(stats, CategoryStats::default());
}

#[tokio::test]
async fn test_search_stays_in_its_category() {
    let app = TestApp::new();
    let gas = tag("lifeline_gas");
    let water = tag("lifeline_water");

    let deep = app.folder(Some(&gas), None, "Level 1").await;
    let deeper = app.folder(Some(&gas), Some(deep), "Inspection 2024").await;
    app.upload(Some(&gas), Some(deeper), "INSPECTION-report.pdf", b"g").await;
    app.folder(Some(&water), None, "Inspection").await;
    app.upload(Some(&water), None, "inspection.pdf", b"w").await;
    app.upload(None, None, "inspection.pdf", b"m").await;

    let listing = app
        .engine
        .get_documents(app.facility, Some(&gas), &DocumentFilter::search("inspection"))
        .await
        .unwrap();

    let folders: Vec<&str> = listing.folders.iter().map(|f| f.name.as_str()).collect();
    let files: Vec<&str> = listing.files.iter().map(|f| f.original_name.as_str()).collect();
    assert_eq!(folders, ["Inspection 2024"]);
    assert_eq!(files, ["INSPECTION-report.pdf"]);
    assert!(listing.breadcrumbs.is_empty());
    assert!(listing.current_folder.is_none());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new();
    app.upload(None, None, "100% done.pdf", b"a").await;
    app.upload(None, None, "1000 done.pdf", b"b").await;

    let listing = app
        .engine
        .get_documents(app.facility, None, &DocumentFilter::search("0%"))
        .await
        .unwrap();
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].original_name, "100% done.pdf");
}

#[tokio::test]
async fn test_domain_stats_cover_every_subtype() {
    let app = TestApp::new();
    let exterior = tag("maintenance_exterior");

    app.upload(Some(&exterior), None, "roof.pdf", b"r").await;
    app.upload(Some(&exterior), None, "walls.pdf", b"w").await;
    app.folder(Some(&tag("lifeline_gas")), None, "Not counted").await;

    let stats = app
        .engine
        .get_domain_stats(app.facility, "maintenance")
        .await
        .unwrap();
    let categories: Vec<String> = stats.iter().map(|s| s.category.to_string()).collect();
    assert_eq!(
        categories,
        [
            "maintenance_exterior",
            "maintenance_interior",
            "maintenance_other",
            "maintenance_summer_condensation"
        ]
    );
    assert_eq!(
        stats[0].stats,
        CategoryStats {
            folder_count: 1,
            file_count: 2
        }
    );

    let err = app
        .engine
        .get_domain_stats(app.facility, "parking")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_domain_services_wrap_results() {
    let app = TestApp::new();

    let uploaded = app
        .services
        .maintenance
        .upload_file(app.facility, Some("interior"), None, pdf("floor.pdf", b"f"), &app.actor)
        .await
        .unwrap();
    assert!(uploaded.success);
    assert_eq!(uploaded.file.category, Some(tag("maintenance_interior")));

    let listing = app
        .services
        .maintenance
        .documents(app.facility, Some("interior"), &DocumentFilter::default())
        .await
        .unwrap();
    assert_eq!(listing.files.len(), 1);

    let err = app
        .services
        .maintenance
        .documents(app.facility, None, &DocumentFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
