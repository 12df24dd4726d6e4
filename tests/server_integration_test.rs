//! Server integration tests that test the actual server behavior.
//!
//! These tests start a real TCP server and drive it with raw HTTP/1.1, the
//! way a reverse proxy's forward-auth subrequest would.

mod common;

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use common::fixtures;
use edgesign::models::AppConfig;
use edgesign::server::{build_router, create_app_state, create_app_state_with_clock};
use edgesign::services::{Clock, SystemClock};

/// Start a test server on an available port and return the port number.
async fn start_test_server() -> u16 {
    let config = AppConfig::from_yaml(fixtures::CONFIG).expect("Failed to parse config");
    let state = create_app_state(&config).expect("Failed to create app state");
    let app = build_router(state);

    // Bind to port 0 to get an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    port
}

/// Send one request with `Connection: close` and return the raw response.
async fn raw_get(port: u16, path: &str, extra_headers: &[(&str, &str)]) -> String {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port))
        .await
        .expect("Failed to connect");

    let mut request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");

    stream
        .write_all(request.as_bytes())
        .await
        .expect("Failed to write request");

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("Failed to read response");
    String::from_utf8_lossy(&response).to_string()
}

#[tokio::test]
async fn test_health_over_tcp() {
    let port = start_test_server().await;

    let response = raw_get(port, "/health", &[]).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("OK"), "{response}");
}

#[tokio::test]
async fn test_forward_auth_over_tcp() {
    let port = start_test_server().await;

    // Sign with a state sharing the server's config and the wall clock.
    let config = AppConfig::from_yaml(fixtures::CONFIG).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = create_app_state_with_clock(&config, clock).unwrap();
    let no_params: [(&str, &str); 0] = [];
    let signed = state
        .signer
        .sign(&edgesign::models::Resource::parse("song.mp3"), no_params)
        .unwrap();
    let target = fixtures::request_target(&signed.url);

    let response = raw_get(port, "/auth", &[("X-Original-URI", target)]).await;
    assert!(response.starts_with("HTTP/1.1 204"), "{response}");

    let tampered = target.replace("song", "gnos");
    let response = raw_get(port, "/auth", &[("X-Original-URI", tampered.as_str())]).await;
    assert!(response.starts_with("HTTP/1.1 403"), "{response}");
}
