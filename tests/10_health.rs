mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.get("/health").await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", status);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["endpoints"]["companies"].is_string(), "{}", body);
    Ok(())
}

#[tokio::test]
async fn unknown_route_uses_error_envelope() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.get("/nowhere").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let message = common::error_message(status, &body);
    assert!(message.contains("/nowhere"), "{}", message);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_400() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/companies"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<serde_json::Value>().await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_413() -> Result<()> {
    let server = common::spawn_server().await?;

    // Development config caps bodies at 1 MiB
    let description = "x".repeat(2 * 1024 * 1024);
    let (status, body) = server
        .post(
            "/companies",
            serde_json::json!({ "name": "Bulky", "description": description }),
        )
        .await?;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
    common::error_message(status, &body);

    let (_, body) = server.get("/companies").await?;
    assert_eq!(body, serde_json::json!({ "companies": [] }));
    Ok(())
}
