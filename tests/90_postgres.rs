//! Round trip against a real PostgreSQL database.
//!
//! Loads `sql/biztime.sql` (dropping and recreating the tables) first.
//! Run with: DATABASE_URL="postgresql:///biztime_test" cargo test --test 90_postgres -- --ignored

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::Executor;

use biztime_api::config::AppConfig;
use biztime_api::database::{DatabaseManager, PgStore, Store};
use biztime_api::{app, AppState};

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a disposable database"]
async fn postgres_round_trip() -> Result<()> {
    let mut config = AppConfig::development();
    config.database.url =
        Some(std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?);
    config.api.enable_request_logging = false;

    let pool = DatabaseManager::connect(&config.database).await?;
    pool.execute(include_str!("../sql/biztime.sql")).await?;

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool, &config.database));
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let router = app(AppState::new(store), &config);
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/companies", base))
        .json(&json!({ "name": "Dasani", "description": "Water" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?["company"]["code"], "dasani");

    let res = client
        .post(format!("{}/companies", base))
        .json(&json!({ "name": "Dasani", "description": "Again" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .put(format!("{}/companies/dasani", base))
        .json(&json!({ "name": "IBM", "description": "Taken" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{}/industries", base))
        .json(&json!({ "code": "tech2", "industry": "Technology" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"]["message"], "Industry 'Technology' already exists");

    let res = client
        .post(format!("{}/invoices", base))
        .json(&json!({ "comp_code": "dasani", "amt": 75 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let invoice = res.json::<Value>().await?;
    let id = invoice["invoice"]["id"].as_i64().context("invoice id")?;

    let res = client.get(format!("{}/invoices/{}", base, id)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["invoice"]["company"]["name"], "Dasani");

    let res = client
        .post(format!("{}/invoices", base))
        .json(&json!({ "comp_code": "ghost", "amt": 75 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client
        .post(format!("{}/industries/tech", base))
        .json(&json!({ "company_code": "dasani" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(format!("{}/companies/dasani", base)).send().await?;
    let company = res.json::<Value>().await?;
    assert_eq!(company["company"]["industries"], json!(["Technology"]));
    assert_eq!(company["company"]["invoices"].as_array().map(Vec::len), Some(1));

    let res = client.delete(format!("{}/companies/dasani", base)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(format!("{}/companies/dasani", base)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = client.get(format!("{}/invoices/{}", base, id)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
