// tests/subjects_api.rs

mod common;

use std::sync::atomic::Ordering;

use common::spawn_app;
use omr_backend::store::DocumentStore;
use serde_json::{Value, json};

#[tokio::test]
async fn list_starts_empty() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .client
        .get(format!("{}/api/subjects", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["subjects"], json!([]));
}

#[tokio::test]
async fn authoring_requires_a_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .json(&json!({ "name": "Math" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn stale_cached_session_is_unauthorized() {
    let app = spawn_app().await;
    // The token is still valid, but the provider no longer vouches for it.
    app.identity.live.store(false, Ordering::SeqCst);

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Math" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn add_and_list_round_trip() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Math" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Physics" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = app
        .client
        .get(format!("{}/api/subjects", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["subjects"], json!(["Math", "Physics"]));
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn duplicate_names_conflict() {
    let app = spawn_app().await;
    app.seed_subjects(&["Math"]).await;

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Math" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn remove_at_drops_exactly_that_position() {
    let app = spawn_app().await;
    app.seed_subjects(&["Math", "Physics", "Biology"]).await;

    let response = app
        .client
        .delete(format!("{}/api/admin/subjects/1", app.address))
        .bearer_auth(app.token())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["subjects"], json!(["Math", "Biology"]));
}

#[tokio::test]
async fn out_of_range_index_fails_fast() {
    let app = spawn_app().await;
    app.seed_subjects(&["Math"]).await;

    let response = app
        .client
        .delete(format!("{}/api/admin/subjects/5", app.address))
        .bearer_auth(app.token())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    // The list is untouched, not clamped.
    let body: Value = app
        .client
        .get(format!("{}/api/subjects", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["subjects"], json!(["Math"]));
}

#[tokio::test]
async fn every_edit_overwrites_the_whole_document() {
    let app = spawn_app().await;
    app.seed_subjects(&["Math"]).await;

    app.client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Physics" }))
        .send()
        .await
        .unwrap();

    // The stored document is the full list, not a delta.
    let doc = app.memory.get("subject", "subjects").await.unwrap().unwrap();
    assert_eq!(doc, json!({ "subjects": ["Math", "Physics"] }));
}

#[tokio::test]
async fn failed_write_surfaces_and_leaves_the_stored_list() {
    let app = spawn_app().await;
    app.seed_subjects(&["Math"]).await;
    app.store.break_collection("subject");

    let response = app
        .client
        .post(format!("{}/api/admin/subjects", app.address))
        .bearer_auth(app.token())
        .json(&json!({ "name": "Physics" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 500);

    // Nothing was half-applied: the next read shows the old list.
    app.store.heal_collection("subject");
    let body: Value = app
        .client
        .get(format!("{}/api/subjects", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["subjects"], json!(["Math"]));
}
