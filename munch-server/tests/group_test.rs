use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use munch_server::tests::create_test_member;

mod common;
use common::mock_app::MockApp;

fn group_body(name: &str) -> Value {
    json!({
        "name": name,
        "budget": 50.0,
        "radius": 5.0,
        "location": { "lat": 40.7128, "lng": -74.006 }
    })
}

#[tokio::test]
async fn test_create_group() {
    let app = MockApp::new().await;

    let (status, body) = app
        .send(Method::POST, "/api/groups", Some("host"), Some(group_body("Taco Night")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["group"]["name"], json!("Taco Night"));
    assert_eq!(body["group"]["radius"], json!(8047));
    assert_eq!(body["group"]["is_active"], json!(true));
    assert_eq!(body["group"]["created_by"], json!("host"));
    assert_eq!(body["group"]["join_code"].as_str().unwrap().len(), 6);
    assert_eq!(body["host"]["user_id"], json!("host"));
    assert_eq!(body["host"]["is_host"], json!(true));
    assert_eq!(body["ingestion"]["source"], json!("live"));
    assert_eq!(body["ingestion"]["linked"], json!(20));
    assert_eq!(body["ingestion"]["error"], Value::Null);

    let join_code = body["group"]["join_code"].as_str().unwrap();
    let (status, deck) = app
        .send(
            Method::GET,
            &format!("/api/groups/{join_code}/restaurants"),
            Some("host"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(deck.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_create_group_name_conflict() {
    let app = MockApp::new().await;

    let (status, _) = app
        .send(Method::POST, "/api/groups", Some("alice"), Some(group_body("Lunch Crew")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(Method::POST, "/api/groups", Some("alice"), Some(group_body("Lunch Crew")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        json!("You already have a group with this name")
    );

    let (status, _) = app
        .send(Method::POST, "/api/groups", Some("bob"), Some(group_body("Lunch Crew")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_group_validation() {
    let app = MockApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/groups",
            Some("host"),
            Some(json!({
                "name": "",
                "budget": 500.0,
                "radius": 0.5,
                "location": { "lat": 40.7128, "lng": -74.006 }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!(400));
    assert_eq!(body["error"]["fields"]["name"], json!("Group name is required"));
    assert!(body["error"]["fields"]["budget"].is_string());
    assert!(body["error"]["fields"]["radius"].is_string());
    assert!(body["error"]["fields"].get("location.lat").is_none());
}

#[tokio::test]
async fn test_requires_token() {
    let app = MockApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/groups", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!(401));
}

#[tokio::test]
async fn test_get_user_groups() {
    let app = MockApp::new().await;

    let (_, lunch) = app
        .send(Method::POST, "/api/groups", Some("alice"), Some(group_body("Lunch")))
        .await;
    app.send(Method::POST, "/api/groups", Some("alice"), Some(group_body("Dinner")))
        .await;
    create_test_member(
        app.storage.clone(),
        lunch["group"]["id"].as_i64().unwrap() as i32,
        "bob",
        false,
    )
    .await;

    let (status, groups) = app.send(Method::GET, "/api/groups", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);

    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], json!("Dinner"));
    assert_eq!(groups[0]["member_count"], json!(1));
    assert_eq!(groups[1]["name"], json!("Lunch"));
    assert_eq!(groups[1]["member_count"], json!(2));

    let (_, groups) = app.send(Method::GET, "/api/groups", Some("bob"), None).await;
    assert_eq!(groups.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_group_detail_and_activity() {
    let app = MockApp::new().await;

    let (_, created) = app
        .send(Method::POST, "/api/groups", Some("host"), Some(group_body("Brunch")))
        .await;
    let join_code = created["group"]["join_code"].as_str().unwrap().to_string();

    let (status, group) = app
        .send(Method::GET, &format!("/api/groups/{join_code}"), Some("host"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["name"], json!("Brunch"));

    let (status, _) = app
        .send(Method::GET, &format!("/api/groups/{join_code}"), Some("stranger"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::GET, "/api/groups/NOPE00", Some("host"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.send(
        Method::POST,
        "/api/memberships",
        Some("guest"),
        Some(json!({ "join_code": join_code })),
    )
    .await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/groups/{join_code}/active"),
            Some("guest"),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, group) = app
        .send(
            Method::PUT,
            &format!("/api/groups/{join_code}/active"),
            Some("host"),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["is_active"], json!(false));
}

#[tokio::test]
async fn test_refresh_restaurants() {
    let app = MockApp::new().await;

    let (_, created) = app
        .send(Method::POST, "/api/groups", Some("host"), Some(group_body("Late Bites")))
        .await;
    let join_code = created["group"]["join_code"].as_str().unwrap().to_string();
    let uri = format!("/api/groups/{join_code}/restaurants/refresh");

    let (status, report) = app.send(Method::POST, &uri, Some("host"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["source"], json!("live"));
    assert_eq!(report["linked"], json!(20));

    let (status, _) = app.send(Method::POST, &uri, Some("stranger"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM group_restaurants")
        .fetch_one(app.storage.get_pool())
        .await
        .unwrap();
    assert_eq!(count, 20);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = MockApp::new().await;

    let (status, doc) = app.send(Method::GET, "/api/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/groups"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
}
