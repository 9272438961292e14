//! Document store behavior: round-trips, first-run reads, seed fallback and
//! the (accepted) lost-update property of whole-collection writes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use sheetsmith::middleware::error_handling::{AppError, Result};
use sheetsmith::models::inquiry::{CreateInquiryRequest, UpdateInquiryRequest};
use sheetsmith::repositories::{InquiryRepository, LEADS_COLLECTION};
use sheetsmith::store::{DocumentBackend, DocumentStore, SeedData};

fn local_store(dir: &TempDir) -> DocumentStore {
    DocumentStore::local(dir.path())
}

fn sample_inquiry_request(name: &str) -> CreateInquiryRequest {
    CreateInquiryRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        description: "Need help automating a weekly report".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn missing_collection_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = local_store(&dir);

    let read = store.read::<Value>("leads").await.unwrap();
    assert!(!read.is_degraded());
    assert!(read.into_records().is_empty());
}

#[tokio::test]
async fn write_then_read_round_trips_deep_equal() {
    let dir = TempDir::new().unwrap();
    let store = local_store(&dir);

    let records = vec![
        json!({"id": "a", "name": "First", "nested": {"tags": ["x", "y"], "count": 3}}),
        json!({"id": "b", "name": "Second", "price": 49.5}),
    ];
    store.write("templates", &records).await.unwrap();

    let read: Vec<Value> = store.read("templates").await.unwrap().into_records();
    assert_eq!(read, records);
}

#[tokio::test]
async fn writes_are_pretty_printed_json() {
    let dir = TempDir::new().unwrap();
    let store = local_store(&dir);

    store
        .write("templates", &[json!({"id": "a"})])
        .await
        .unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("templates.json")).unwrap();
    assert!(on_disk.contains("\n  {"));
    assert!(on_disk.contains("\"id\": \"a\""));
}

/// Backend whose reads always fail with a transport-style error.
struct FailingBackend;

#[async_trait]
impl DocumentBackend for FailingBackend {
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        Err(AppError::Storage(format!(
            "simulated transport error fetching {key}"
        )))
    }

    async fn store(&self, _key: &str, _body: &str) -> Result<()> {
        Err(AppError::Storage("simulated transport error".to_string()))
    }

    fn kind(&self) -> &'static str {
        "failing"
    }
}

/// Backend that behaves like a bucket that has never been written.
struct EmptyRemoteBackend;

#[async_trait]
impl DocumentBackend for EmptyRemoteBackend {
    async fn fetch(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn store(&self, _key: &str, _body: &str) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "empty-remote"
    }
}

fn seed_dir_with_templates() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("seed.templates.json"),
        r#"[{"id": "seed-template", "name": "Seeded"}]"#,
    )
    .unwrap();
    dir
}

#[tokio::test]
async fn remote_read_failure_falls_back_to_seed_data() {
    let seed_dir = seed_dir_with_templates();
    let store = DocumentStore::with_backend(
        Arc::new(FailingBackend),
        Some(SeedData::new(seed_dir.path())),
    );

    let read = store.read::<Value>("templates").await.unwrap();
    assert!(read.is_degraded());
    let records = read.into_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "seed-template");
}

#[tokio::test]
async fn missing_remote_object_falls_back_to_seed_data() {
    let seed_dir = seed_dir_with_templates();
    let store = DocumentStore::with_backend(
        Arc::new(EmptyRemoteBackend),
        Some(SeedData::new(seed_dir.path())),
    );

    let read = store.read::<Value>("templates").await.unwrap();
    assert!(read.is_degraded());
    assert_eq!(read.into_records()[0]["id"], "seed-template");
}

#[tokio::test]
async fn missing_seed_file_degrades_to_empty_collection() {
    let seed_dir = TempDir::new().unwrap();
    let store = DocumentStore::with_backend(
        Arc::new(FailingBackend),
        Some(SeedData::new(seed_dir.path())),
    );

    let read = store.read::<Value>("leads").await.unwrap();
    assert!(read.is_degraded());
    assert!(read.into_records().is_empty());
}

#[tokio::test]
async fn read_failure_without_seed_data_propagates() {
    let store = DocumentStore::with_backend(Arc::new(FailingBackend), None);
    assert!(store.read::<Value>("leads").await.is_err());
}

#[tokio::test]
async fn sequential_updates_to_one_inquiry_accumulate() {
    let dir = TempDir::new().unwrap();
    let repo = InquiryRepository::new(local_store(&dir));

    let inquiry = repo.create(sample_inquiry_request("Dana")).await.unwrap();

    repo.update(
        &inquiry.id,
        UpdateInquiryRequest {
            company: Some("Sunrise Bakery".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    repo.update(
        &inquiry.id,
        UpdateInquiryRequest {
            phone: Some("555-010-0200".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stored = repo.find_by_id(&inquiry.id).await.unwrap().unwrap();
    assert_eq!(stored.company.as_deref(), Some("Sunrise Bakery"));
    assert_eq!(stored.phone.as_deref(), Some("555-010-0200"));
}

/// Two writers interleaving read-read-write-write on the same collection lose
/// the first writer's change. This documents the accepted limitation of
/// whole-collection read-modify-write; it is not a bug to fix here.
#[tokio::test]
async fn interleaved_writers_lose_the_first_update() {
    let dir = TempDir::new().unwrap();
    let store = local_store(&dir);

    store
        .write(LEADS_COLLECTION, &[json!({"id": "lead-1", "name": "Original"})])
        .await
        .unwrap();

    // Both writers snapshot the same state
    let mut writer_a: Vec<Value> = store.read(LEADS_COLLECTION).await.unwrap().into_records();
    let mut writer_b: Vec<Value> = store.read(LEADS_COLLECTION).await.unwrap().into_records();

    writer_a[0]["name"] = json!("Changed by A");
    writer_b[0]["company"] = json!("Added by B");

    store.write(LEADS_COLLECTION, &writer_a).await.unwrap();
    store.write(LEADS_COLLECTION, &writer_b).await.unwrap();

    let final_state: Vec<Value> = store.read(LEADS_COLLECTION).await.unwrap().into_records();
    assert_eq!(final_state.len(), 1);
    // B's whole-array write clobbered A's change
    assert_eq!(final_state[0]["name"], "Original");
    assert_eq!(final_state[0]["company"], "Added by B");
}

#[tokio::test]
async fn atomic_write_replaces_previous_version_completely() {
    let dir = TempDir::new().unwrap();
    let store = local_store(&dir);

    let big: Vec<Value> = (0..100).map(|i| json!({"id": format!("t-{i}")})).collect();
    store.write("templates", &big).await.unwrap();
    store
        .write("templates", &[json!({"id": "only-one"})])
        .await
        .unwrap();

    let read: Vec<Value> = store.read("templates").await.unwrap().into_records();
    assert_eq!(read.len(), 1);

    // No temp file remains next to the collection
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| {
            let name = e.unwrap().file_name().to_string_lossy().into_owned();
            name.ends_with(".tmp").then_some(name)
        })
        .collect();
    assert!(leftovers.is_empty());
}
