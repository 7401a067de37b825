//! Integration tests for Chronicle API endpoints
//!
//! These tests verify that the HTTP surface preserves the payload shapes
//! existing consumers expect, and that boundary validation maps to the
//! right status codes.

use axum_test::TestServer;
use chronicle::api::{build_api_router, Node};
use chronicle::ledger::Ledger;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn test_server(max_message_len: usize) -> TestServer {
    let node = Arc::new(Node::new(Ledger::new(), max_message_len));
    let app = build_api_router(node);
    TestServer::new(app).expect("Failed to create test server")
}

#[tokio::test]
async fn test_add_and_read_round_trip() {
    let server = test_server(250);

    // A fresh chain is just the genesis block.
    let response = server.get("/api/blockchain").await;
    assert_eq!(response.status_code(), 200);
    let chain: Value = response.json();
    assert_eq!(chain.as_array().unwrap().len(), 1);
    assert_eq!(chain[0]["index"], 0);
    assert_eq!(chain[0]["previousHash"], "0");
    assert_eq!(chain[0]["message"], "Genesis Block");

    // Append a message and check the structured response shape.
    let response = server
        .post("/api/blockchain/add")
        .json(&json!({ "message": "hello" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let block: Value = response.json();
    assert_eq!(block["index"], 1);
    assert_eq!(block["message"], "hello");
    assert!(block["timestamp"].is_string());
    assert!(block["messageHash"].is_string());
    assert_eq!(block["previousHash"], chain[0]["messageHash"]);

    // The chain now has two linked blocks.
    let response = server.get("/api/blockchain").await;
    let chain: Value = response.json();
    assert_eq!(chain.as_array().unwrap().len(), 2);
    assert_eq!(chain[1]["previousHash"], chain[0]["messageHash"]);
}

#[tokio::test]
async fn test_add_without_message_is_client_error() {
    let server = test_server(250);

    let response = server.post("/api/blockchain/add").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn test_add_empty_message_is_client_error() {
    let server = test_server(250);

    let response = server
        .post("/api/blockchain/add")
        .json(&json!({ "message": "" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].is_string());

    // Nothing was appended.
    let response = server.get("/api/blockchain/height").await;
    let height: u64 = response.json();
    assert_eq!(height, 1);
}

#[tokio::test]
async fn test_add_oversized_message_is_client_error() {
    let server = test_server(10);

    let response = server
        .post("/api/blockchain/add")
        .json(&json!({ "message": "this message is longer than ten characters" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("too long"));
}

#[tokio::test]
async fn test_block_lookup_and_height() {
    let server = test_server(250);

    server
        .post("/api/blockchain/add")
        .json(&json!({ "message": "first" }))
        .await;

    let response = server.get("/api/blockchain/height").await;
    assert_eq!(response.status_code(), 200);
    let height: u64 = response.json();
    assert_eq!(height, 2);

    let response = server.get("/api/blockchain/block/1").await;
    assert_eq!(response.status_code(), 200);
    let block: Value = response.json();
    assert_eq!(block["message"], "first");

    let response = server.get("/api/blockchain/block/999").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_stats_and_add_traffic_completes() {
    // Stats reads take the ledger lock and appends update the stats lock;
    // mixed traffic on both endpoints must never wedge on lock order.
    let server = Arc::new(test_server(250));

    let mut handles = Vec::new();
    for task in 0..4 {
        let writer = server.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50 {
                let response = writer
                    .post("/api/blockchain/add")
                    .json(&json!({ "message": format!("task {} message {}", task, i) }))
                    .await;
                assert_eq!(response.status_code(), 200);
            }
        }));

        let reader = server.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                let response = reader.get("/api/stats").await;
                assert_eq!(response.status_code(), 200);
            }
        }));
    }

    tokio::time::timeout(Duration::from_secs(30), async {
        for handle in handles {
            handle.await.unwrap();
        }
    })
    .await
    .expect("mixed stats/add traffic must complete without blocking");

    // Every append landed exactly once.
    let response = server.get("/api/blockchain/height").await;
    let height: u64 = response.json();
    assert_eq!(height, 201);

    let response = server.get("/api/blockchain/validate").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_validate_health_and_stats_endpoints() {
    let server = test_server(250);

    server
        .post("/api/blockchain/add")
        .json(&json!({ "message": "audit me" }))
        .await;

    let response = server.get("/api/blockchain/validate").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["valid"], true);

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let response = server.get("/api/stats").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["total_requests"].is_number());
    assert!(body["successful_requests"].is_number());
    assert!(body["failed_requests"].is_number());
    assert_eq!(body["blocks_appended"], 1);
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(body["chain_length"], 2);
}
