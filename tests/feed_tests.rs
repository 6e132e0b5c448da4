//! Complaint feed tests: subscription lifecycle, ordering, tolerant decode.

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use talk2kap::models::{Category, ComplaintDraft};
use talk2kap::prelude::*;
use talk2kap::store::{MemoryStore, RecordStore, StorePath};

fn record(id: &str, message: &str, timestamp: &str) -> serde_json::Value {
    json!({
        "id": id,
        "message": message,
        "label": "non-urgent",
        "type": "infrastructure",
        "timestamp": timestamp,
        "status": "pending"
    })
}

async fn test_client(server: &MockServer) -> (Talk2Kap, Arc<MemoryStore>) {
    let config = Config::new(&server.uri(), "https://unused-db.test/").expect("config");
    let store = Arc::new(MemoryStore::new());
    let mut client = Talk2Kap::with_store(config, ClientOptions::default(), store.clone());
    client.sign_in(Session::new("uid-1").with_purok("4"));
    (client, store)
}

#[tokio::test]
async fn empty_collection_is_an_empty_feed() {
    let server = MockServer::start().await;
    let (client, _store) = test_client(&server).await;

    let mut feed = client
        .complaints()
        .subscribe(client.session().unwrap())
        .await
        .unwrap();

    // The initial snapshot arrives immediately after subscribing.
    let records = feed.next_change().await.unwrap();
    assert!(records.is_empty());
    assert!(feed.is_empty());
}

#[tokio::test]
async fn feed_orders_newest_first_regardless_of_insertion_order() {
    let server = MockServer::start().await;
    let (client, store) = test_client(&server).await;
    let collection = StorePath::user_complaints("uid-1");

    // Inserted oldest-last to make sure ordering comes from timestamps,
    // not from the store's iteration order.
    store
        .set(
            &collection,
            json!({
                "b": record("2", "middle", "2024-02-01T00:00:00Z"),
                "c": record("3", "newest", "2024-03-01T00:00:00Z"),
                "a": record("1", "oldest", "2024-01-01T00:00:00Z"),
            }),
        )
        .await
        .unwrap();

    let mut feed = client
        .complaints()
        .subscribe(client.session().unwrap())
        .await
        .unwrap();
    let records = feed.next_change().await.unwrap();

    let messages: Vec<&str> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn records_missing_optional_fields_render_without_those_sections() {
    let server = MockServer::start().await;
    let (client, store) = test_client(&server).await;

    store
        .set(
            &StorePath::user_complaint("uid-1", "1"),
            json!({
                "id": "1",
                "message": "stray dogs near the plaza",
                "label": "non-urgent",
                "timestamp": "2024-01-15T08:30:00Z"
            }),
        )
        .await
        .unwrap();

    let mut feed = client
        .complaints()
        .subscribe(client.session().unwrap())
        .await
        .unwrap();
    feed.next_change().await.unwrap();

    let detail = feed.detail("1").expect("record decodes");
    assert!(!detail.has_evidence());
    assert!(!detail.has_kind());
    assert_eq!(detail.message, "stray dogs near the plaza");
}

#[tokio::test]
async fn feed_observes_a_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "flooded road by the school",
            "label": "Urgent",
            "type": "Infrastructure"
        })))
        .mount(&server)
        .await;

    let (client, _store) = test_client(&server).await;
    let complaints = client.complaints();
    let session = client.session().unwrap();

    let mut feed = complaints.subscribe(session).await.unwrap();
    assert!(feed.next_change().await.unwrap().is_empty());

    let draft = ComplaintDraft {
        category: Some(Category::Roads),
        message: "flooded road by the school".to_string(),
        location: "Purok 3".to_string(),
        contact_number: "0918 222 3333".to_string(),
        ..Default::default()
    };
    let submitted = complaints.submit(session, &draft).await.unwrap();

    let records = feed.next_change().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, submitted.id);
    assert_eq!(records[0].label, "urgent");
}

#[tokio::test]
async fn dropped_feed_stops_observing() {
    let server = MockServer::start().await;
    let (client, store) = test_client(&server).await;

    let feed = client
        .complaints()
        .subscribe(client.session().unwrap())
        .await
        .unwrap();
    drop(feed);

    // Writes after teardown must be a no-op for the dropped subscriber.
    store
        .set(
            &StorePath::user_complaint("uid-1", "1"),
            record("1", "late arrival", "2024-05-01T00:00:00Z"),
        )
        .await
        .unwrap();
}
