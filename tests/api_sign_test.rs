//! Tests for the /api/sign endpoint.

mod common;

use axum::http::StatusCode;
use common::{assert_json_error, assert_ok, fixtures, TestApp};
use edgesign::services::digest::encoded_digest;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_sign_path_with_timestamp() {
    let app = TestApp::new();

    let response = app.get("/api/sign?resource=song.mp3").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], 200);
    assert_eq!(json["canonical_path"], "/previews/song.mp3");
    assert_eq!(json["timestamp"], fixtures::NOW);

    let expected = format!(
        "https://cdn.example.com/previews/song.mp3?verify={}-{}",
        fixtures::NOW,
        encoded_digest(
            fixtures::SECRET.as_bytes(),
            &format!("/previews/song.mp3{}", fixtures::NOW)
        )
    );
    assert_eq!(json["url"], expected);
}

#[tokio::test]
async fn test_sign_without_timestamp() {
    let app = TestApp::with_config(fixtures::CONFIG_NO_TIMESTAMP, fixtures::NOW);

    let response = app.get("/api/sign?resource=song.mp3").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert!(json.get("timestamp").is_none());
    assert_eq!(
        json["url"],
        format!(
            "https://cdn.example.com/previews/song.mp3?verify={}",
            encoded_digest(b"k", "/previews/song.mp3")
        )
    );
}

#[tokio::test]
async fn test_sign_resolves_identifier_and_strips_words() {
    let app = TestApp::new();

    let response = app.get("/api/sign?resource=42").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["canonical_path"], "/previews/uploads/song.mp3");
}

#[tokio::test]
async fn test_sign_unknown_identifier_is_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/sign?resource=43").await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_identifier_without_resolver_is_a_path() {
    let app = TestApp::with_config(fixtures::CONFIG_NO_TIMESTAMP, fixtures::NOW);

    let response = app.get("/api/sign?resource=43").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["canonical_path"], "/previews/43");
}

#[tokio::test]
async fn test_sign_identifier_without_resolver_keeps_leading_zeros() {
    let app = TestApp::with_config(fixtures::CONFIG_NO_TIMESTAMP, fixtures::NOW);

    let response = app.get("/api/sign?resource=007").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["canonical_path"], "/previews/007");
    assert_eq!(
        json["url"],
        format!(
            "https://cdn.example.com/previews/007?verify={}",
            encoded_digest(b"k", "/previews/007")
        )
    );

    let response = app.get("/api/sign?resource=0").await;
    assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["canonical_path"], "/previews/0");
}

#[tokio::test]
async fn test_sign_appends_extra_params_in_order() {
    let app = TestApp::new();

    let response = app
        .get("/api/sign?dl=1&resource=song.mp3&name=my%20song")
        .await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    let url = json["url"].as_str().unwrap();
    assert!(url.ends_with("&dl=1&name=my%20song"), "url: {url}");
}

#[tokio::test]
async fn test_sign_missing_resource() {
    let app = TestApp::new();

    let response = app.get("/api/sign").await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = app.get("/api/sign?resource=").await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_is_deterministic_at_fixed_time() {
    let app = TestApp::new();

    let first = app.sign("song.mp3").await;
    let second = app.sign("song.mp3").await;
    assert_eq!(first, second);
}
