mod common;

use craftconnect_seller::sandbox::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn sandbox_answers_health_over_http() -> anyhow::Result<()> {
    let api = common::TestApi::start().await?;
    let body: serde_json::Value = reqwest::get(format!("http://{}/health", api.addr))
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn unknown_routes_use_the_error_envelope() -> anyhow::Result<()> {
    let api = common::TestApi::start().await?;
    let response = reqwest::get(format!("http://{}/api/nope", api.addr)).await?;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["message"], "Not Found");
    Ok(())
}
