//! Common test utilities for integration tests.
//!
//! Each test app runs over the file backend in its own temporary directory,
//! so tests are independent and need no external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use persistence::{open_storage, Storage};
use rental_api::{app::create_app, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub storage: Arc<dyn Storage>,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    /// Sends a request and returns the status with the parsed JSON body
    /// (`Null` when the body is empty or not JSON).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(get_request(uri)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PUT, uri, body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(empty_request(Method::DELETE, uri)).await
    }

    /// Creates an object through the API and returns its id.
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, created) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {created}");
        created["id"].as_str().unwrap().to_string()
    }

    pub async fn create_state(&self, name: &str) -> String {
        self.create("/api/v1/states", json!({ "name": name })).await
    }

    pub async fn create_city(&self, state_id: &str, name: &str) -> String {
        self.create(
            &format!("/api/v1/states/{state_id}/cities"),
            json!({ "name": name }),
        )
        .await
    }

    pub async fn create_user(&self, email: &str) -> String {
        self.create(
            "/api/v1/users",
            json!({ "email": email, "password": "hunter2" }),
        )
        .await
    }

    pub async fn create_place(&self, city_id: &str, user_id: &str, name: &str) -> String {
        self.create(
            &format!("/api/v1/cities/{city_id}/places"),
            json!({ "name": name, "user_id": user_id }),
        )
        .await
    }

    pub async fn create_amenity(&self, name: &str) -> String {
        self.create("/api/v1/amenities", json!({ "name": name })).await
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(&[]).await
}

pub async fn create_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let dir = TempDir::new().unwrap();
    let file_path = dir.path().join("file.json");
    let file_path = file_path.to_str().unwrap().to_string();

    let mut all_overrides = vec![("storage.file_path", file_path.as_str())];
    all_overrides.extend_from_slice(overrides);
    let config = Config::load_for_test(&all_overrides).unwrap();

    let storage = open_storage(&config.storage, &config.database, config.is_test());
    storage.reload().await.unwrap();

    TestApp {
        router: create_app(config.clone(), storage.clone()),
        storage,
        config,
        _dir: dir,
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn raw_request(method: Method, uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    empty_request(Method::GET, uri)
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
