//! End-to-end tests: catalog file -> store -> resolution

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use rehome::application::PlacementService;
use rehome::domain::{ContainerRef, Item};
use rehome::infrastructure::{load_catalog, InfraError};

/// Helper to write a catalog file for testing
fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, content).expect("write catalog");
    path
}

const NEWSROOM_CATALOG: &str = r#"
[containers.root]

[containers.news]
policy = { kind = "date", format = "%Y/%m" }

[containers."news/2024/05"]

[containers.tickets]
policy = { kind = "attribute", key = "category" }

[containers.dropbox.policy]
kind = "pattern"
rules = [
    { pattern = "(?i)invoice", target = "finance/invoices" },
]

[containers."finance/invoices"]

[containers.old-news]
policy = { kind = "redirect", target = "news" }
"#;

fn newsroom_service(dir: &TempDir) -> PlacementService {
    let path = write_catalog(dir, NEWSROOM_CATALOG);
    let store = load_catalog(&path).expect("load catalog");
    PlacementService::new(Arc::new(store))
}

#[test]
fn given_plain_root_when_resolving_then_stays_in_root() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);

    let resolved = svc
        .resolve(Some(&ContainerRef::new("root")), &Item::new("anything"))
        .unwrap();

    assert_eq!(resolved, Some(ContainerRef::new("root")));
}

#[test]
fn given_dated_item_when_resolving_under_news_then_lands_in_month_bucket() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);
    let item = Item::new("press-release.txt")
        .with_created_at(Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap());

    let resolved = svc
        .resolve(Some(&ContainerRef::new("news")), &item)
        .unwrap();

    assert_eq!(resolved, Some(ContainerRef::new("news/2024/05")));
}

#[test]
fn given_redirect_to_organizing_container_when_resolving_then_both_hops_apply() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);
    let item = Item::new("press-release.txt")
        .with_created_at(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());

    let resolved = svc
        .resolve(Some(&ContainerRef::new("old-news")), &item)
        .unwrap();

    // old-news redirects to news, news buckets by month
    assert_eq!(resolved, Some(ContainerRef::new("news/2024/05")));
}

#[test]
fn given_categorized_item_when_resolving_under_tickets_then_routed_by_attribute() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);
    let item = Item::new("ticket-99").with_attribute("category", "billing");

    let resolved = svc
        .resolve(Some(&ContainerRef::new("tickets")), &item)
        .unwrap();

    assert_eq!(resolved, Some(ContainerRef::new("tickets/billing")));
}

#[test]
fn given_uncategorized_item_when_resolving_under_tickets_then_stays_put() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);

    let resolved = svc
        .resolve(Some(&ContainerRef::new("tickets")), &Item::new("ticket-1"))
        .unwrap();

    assert_eq!(resolved, Some(ContainerRef::new("tickets")));
}

#[test]
fn given_matching_name_when_resolving_under_dropbox_then_pattern_routes() {
    let temp = TempDir::new().unwrap();
    let svc = newsroom_service(&temp);

    let resolved = svc
        .resolve(
            Some(&ContainerRef::new("dropbox")),
            &Item::new("Invoice-0815.pdf"),
        )
        .unwrap();

    assert_eq!(resolved, Some(ContainerRef::new("finance/invoices")));
}

#[test]
fn given_missing_catalog_file_when_loading_then_io_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist.toml");

    let err = load_catalog(&missing).unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
}

#[test]
fn given_malformed_toml_when_loading_then_catalog_error() {
    let temp = TempDir::new().unwrap();
    let path = write_catalog(&temp, "containers = not valid toml [");

    let err = load_catalog(&path).unwrap_err();

    assert!(matches!(err, InfraError::Catalog { .. }));
}
