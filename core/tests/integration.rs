//! Full CRUD lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every `RoleClient`
//! operation over real HTTP through `ReqwestTransport`.

use std::sync::Arc;
use std::time::Duration;

use resource_core::{ApiError, ClientConfig, CrudClient, ReqwestTransport, Role, RoleClient};
use serde_json::Value;
use tokio::net::TcpListener;

async fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

#[tokio::test]
async fn crud_lifecycle() {
    let host = start_server().await;
    let config = ClientConfig::new(&host).unwrap();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    let client = RoleClient::from_config(&config, Arc::new(ReqwestTransport::with_client(http)));

    // Step 1: list, should be empty.
    let roles = client.find_all().await.unwrap();
    assert!(roles.is_empty(), "expected empty list");

    // Step 2: create a role.
    let created = client
        .save(&Role::new("OPERATOR").with_description("Traffic operations"))
        .await
        .unwrap();
    assert_eq!(created["name"], "OPERATOR");
    let id = created["idRole"].as_str().unwrap().to_string();

    // Step 3: get the created role.
    let fetched = client.find_by_id(&id).await.unwrap();
    assert_eq!(fetched.id().as_deref(), Some(id.as_str()));
    assert_eq!(fetched.description.as_deref(), Some("Traffic operations"));

    // Step 4: update it.
    let mut changed = fetched.clone();
    changed.name = "SUPERVISOR".to_string();
    changed.status = 0;
    let updated = client.update(&id, &changed).await.unwrap();
    assert_eq!(updated["name"], "SUPERVISOR");
    assert_eq!(updated["status"], 0);

    // Step 5: list, should have one item.
    let roles = client.find_all().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "SUPERVISOR");

    // Step 6: delete. 204 carries no body.
    let deleted = client.delete(&id).await.unwrap();
    assert_eq!(deleted, Value::Null);

    // Step 7: get after delete, should be NotFound.
    let err = client.find_by_id(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 8: delete again, should be NotFound.
    let err = client.delete(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn pageable_listing() {
    let host = start_server().await;
    let client = RoleClient::new(&host, Arc::new(ReqwestTransport::new()));
    for name in ["SUPER_USER", "ADMIN", "OPERATOR", "INSTALLER"] {
        client.save(&Role::new(name)).await.unwrap();
    }

    let raw = client.list_pageable(0, 3).await.unwrap();
    assert_eq!(raw["totalElements"], 4);
    assert_eq!(raw["content"].as_array().unwrap().len(), 3);

    let page = client.list_page(1, 3).await.unwrap();
    assert_eq!(page.number, 1);
    assert_eq!(page.total_pages, 2);
    assert!(page.last);
    let names: Vec<_> = page.content.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["SUPER_USER"]);
}

#[tokio::test]
async fn out_of_range_page_size_is_left_to_server() {
    let host = start_server().await;
    let client = RoleClient::new(&host, Arc::new(ReqwestTransport::new()));

    let err = client.list_pageable(0, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
}

#[tokio::test]
async fn bad_id_surfaces_server_status() {
    let host = start_server().await;
    let client = RoleClient::new(&host, Arc::new(ReqwestTransport::new()));

    let err = client.find_by_id("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RoleClient::new(&format!("http://{addr}"), Arc::new(ReqwestTransport::new()));
    let err = client.find_all().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
