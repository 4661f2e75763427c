use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use coin_ledger::api::{build_router, ApiState};
use coin_ledger::auth::hash_password;
use coin_ledger::storage::{SqliteStorage, Storage};
use coin_ledger::{CoinRecord, FallbackProvider, StaticCatalog};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    user_id: String,
    _dir: TempDir,
}

/// Router over a temporary database seeded with the static catalog and one user
fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("coins.db")).unwrap();
    storage.insert_coins(&StaticCatalog.records()).unwrap();
    let user = storage
        .create_user("collector", &hash_password("Ludivine67"))
        .unwrap();

    TestApp {
        router: build_router(Arc::new(ApiState::new(storage)), &["*".to_string()]),
        user_id: user.id,
        _dir: dir,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn find_coin(app: &TestApp, query: &str) -> Value {
    let (_, coins) = send(app, Method::GET, &format!("/api/coins?{}", query), None).await;
    coins[0].clone()
}

#[tokio::test]
async fn test_login() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"username": "collector", "password": "Ludivine67"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["id"], app.user_id.as_str());
    assert_eq!(body["user"]["username"], "collector");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        Some(json!({"username": "collector", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn test_catalog_browsing() {
    let app = test_app();

    let (status, coins) = send(&app, Method::GET, "/api/coins", None).await;
    assert_eq!(status, StatusCode::OK);
    let coins = coins.as_array().unwrap();
    assert_eq!(coins.len(), 20);
    assert!(coins.iter().all(|c| c["id"].is_string()));
    assert_eq!(coins.last().unwrap()["year"], 2022);

    let (_, france) = send(&app, Method::GET, "/api/coins?country=France", None).await;
    assert_eq!(france.as_array().unwrap().len(), 3);

    let (_, france_2023) = send(&app, Method::GET, "/api/coins?country=France&year=2023", None).await;
    assert_eq!(france_2023[0]["description"], "200 ans de la naissance de Louis Pasteur");

    let (_, search) = send(&app, Method::GET, "/api/coins?search=PASTEUR", None).await;
    assert_eq!(search.as_array().unwrap().len(), 1);

    let (_, years) = send(&app, Method::GET, "/api/years", None).await;
    assert_eq!(years, json!([2024, 2023, 2022]));

    let (_, countries) = send(&app, Method::GET, "/api/countries", None).await;
    let countries = countries.as_array().unwrap();
    assert_eq!(countries.len(), 15);
    assert_eq!(countries[0], "Allemagne");
}

#[tokio::test]
async fn test_get_coin_by_id() {
    let app = test_app();
    let coin = find_coin(&app, "search=Simone").await;
    let id = coin["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/coins/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Simone Veil");
    assert_eq!(body["mintage"], 4_000_000);

    let (status, body) = send(&app, Method::GET, "/api/coins/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Coin not found");
}

#[tokio::test]
async fn test_collection_crud_and_stats() {
    let app = test_app();
    let user = app.user_id.clone();
    let monaco = find_coin(&app, "country=Monaco").await;
    let monaco_id = monaco["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/collection/add?user_id={}", user),
        Some(json!({"coin_id": monaco_id, "condition": "bu", "notes": "gift"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let item_id = body["item"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/collection/add?user_id={}", user),
        Some(json!({"coin_id": monaco_id, "condition": "FDC"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Coin already in collection");

    let (_, collection) =
        send(&app, Method::GET, &format!("/api/collection?user_id={}", user), None).await;
    assert_eq!(collection.as_array().unwrap().len(), 1);
    assert_eq!(collection[0]["condition"], "BU");
    assert_eq!(collection[0]["notes"], "gift");
    assert_eq!(collection[0]["coin"]["country"], "Monaco");

    let (_, stats) =
        send(&app, Method::GET, &format!("/api/collection/stats?user_id={}", user), None).await;
    assert_eq!(stats["total_coins"], 20);
    assert_eq!(stats["owned_coins"], 1);
    assert_eq!(stats["completion_percentage"], 5.0);
    assert_eq!(stats["total_value"], 100.0);
    assert_eq!(stats["by_country"]["Monaco"], 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/collection/{}?user_id={}", item_id, user),
        Some(json!({"condition": "BE"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) =
        send(&app, Method::GET, &format!("/api/collection/stats?user_id={}", user), None).await;
    assert_eq!(stats["total_value"], 200.0);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/collection/{}?user_id={}", item_id, user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/collection/{}?user_id={}", item_id, user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Collection item not found");
}

#[tokio::test]
async fn test_collection_errors() {
    let app = test_app();
    let user = app.user_id.clone();
    let coin = find_coin(&app, "search=Avila").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/collection/add?user_id={}", user),
        Some(json!({"coin_id": "missing", "condition": "FDC"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/collection/add?user_id={}", user),
        Some(json!({"coin_id": coin["id"], "condition": "shiny"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/collection/whatever?user_id={}", user),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Nothing to update");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/collection/whatever?user_id={}", user),
        Some(json!({"notes": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_round_trip_through_api() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("coins.db");
    {
        let mut storage = SqliteStorage::new(&db_path).unwrap();
        storage
            .insert_coins(&[CoinRecord::estimated(
                "Estonia",
                2018,
                "Centenary",
                1_300_000,
                "https://img.example/ee.png",
            )])
            .unwrap();
    }

    let storage = SqliteStorage::new(&db_path).unwrap();
    let app = TestApp {
        router: build_router(Arc::new(ApiState::new(storage)), &["*".to_string()]),
        user_id: String::new(),
        _dir: dir,
    };

    let (_, coins) = send(&app, Method::GET, "/api/coins", None).await;
    assert_eq!(coins[0]["country"], "Estonia");
    assert_eq!(coins[0]["value_bu"], 7.0);
}
