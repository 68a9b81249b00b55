#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use biztime_api::config::AppConfig;
use biztime_api::database::{MemoryStore, Store};
use biztime_api::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        read(res).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.post(self.url(path)).json(&body).send().await?;
        read(res).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.put(self.url(path)).json(&body).send().await?;
        read(res).await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).send().await?;
        read(res).await
    }

    /// Statements the store has served so far
    pub fn queries(&self) -> usize {
        self.store.query_count()
    }
}

async fn read(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res
        .json::<Value>()
        .await
        .with_context(|| format!("response with status {} was not JSON", status))?;
    Ok((status, body))
}

/// Serve the real router on a free port against an empty in-memory store
pub async fn spawn_server() -> Result<TestServer> {
    spawn_with_store(MemoryStore::new()).await
}

pub async fn spawn_with_store(store: MemoryStore) -> Result<TestServer> {
    spawn(Arc::new(store)).await
}

async fn spawn(store: Arc<MemoryStore>) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;

    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    let shared: Arc<dyn Store> = store.clone();
    let router = app(AppState::new(shared), &config);

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });

    Ok(TestServer {
        port,
        base_url,
        store,
        client: reqwest::Client::new(),
    })
}

/// Company "orange" with one 450 invoice, created through the API
pub async fn seed_orange(server: &TestServer) -> Result<Value> {
    let (status, body) = server
        .post(
            "/companies",
            serde_json::json!({ "name": "Orange", "description": "creates modern upholstery" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "seed company failed: {}", body);

    let (status, body) = server
        .post("/invoices", serde_json::json!({ "comp_code": "orange", "amt": 450 }))
        .await?;
    assert_eq!(status, StatusCode::CREATED, "seed invoice failed: {}", body);

    Ok(body["invoice"].clone())
}

/// Assert the shared error envelope and return its message
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let error = body
        .get("error")
        .unwrap_or_else(|| panic!("missing error envelope: {}", body));
    assert_eq!(error["status"].as_u64(), Some(status.as_u16() as u64), "{}", body);
    error["message"].as_str().unwrap_or_default().to_string()
}
