use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use serde_json::json;
use tokio::net::TcpListener;

use munch_server::configs::{Places, Voting};
use munch_server::services::GeoapifyClient;

mod common;
use common::mock_app::{MockApp, test_settings};

/// Serves a places endpoint that always fails.
async fn spawn_broken_provider() -> SocketAddr {
    let router = Router::new().route(
        "/v2/places",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    address
}

#[tokio::test]
async fn test_provider_outage_serves_fallback_venues() {
    let address = spawn_broken_provider().await;

    let places = Places {
        base_url: format!("http://{address}"),
        api_key: Some(String::from("test-key")),
        limit: 20,
        timeout_secs: 5,
    };
    let provider = Arc::new(GeoapifyClient::new(&places).unwrap());
    let app = MockApp::with_settings(provider, test_settings(places, Voting::default())).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/groups",
            Some("host"),
            Some(json!({
                "name": "Taco Night",
                "budget": 50.0,
                "radius": 5.0,
                "location": { "lat": 40.7128, "lng": -74.006 }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ingestion"]["source"], json!("fallback"));
    assert!(body["ingestion"]["fallback_reason"]
        .as_str()
        .unwrap()
        .contains("500"));
    assert_eq!(body["ingestion"]["linked"], json!(6));

    let join_code = body["group"]["join_code"].as_str().unwrap();
    let (_, deck) = app
        .send(
            Method::GET,
            &format!("/api/groups/{join_code}/restaurants"),
            Some("host"),
            None,
        )
        .await;

    let external_ids: Vec<&str> = deck
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["external_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        external_ids,
        vec!["fallback-1", "fallback-2", "fallback-3", "fallback-4", "fallback-5", "fallback-6"]
    );
    assert_eq!(deck[0]["name"], json!("Pasta Paradise"));
}

#[tokio::test]
async fn test_unreachable_provider_serves_fallback_venues() {
    let places = Places {
        base_url: String::from("http://127.0.0.1:9"),
        api_key: Some(String::from("test-key")),
        limit: 20,
        timeout_secs: 2,
    };
    let provider = Arc::new(GeoapifyClient::new(&places).unwrap());
    let app = MockApp::with_settings(provider, test_settings(places, Voting::default())).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/groups",
            Some("host"),
            Some(json!({
                "name": "Offline Night",
                "budget": 25.0,
                "radius": 1.0,
                "location": { "lat": 48.8566, "lng": 2.3522 }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ingestion"]["source"], json!("fallback"));
    assert_eq!(body["ingestion"]["linked"], json!(6));
}
