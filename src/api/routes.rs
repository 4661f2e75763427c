//! API route handlers
//!
//! All endpoints return JSON. The storage is shared behind a mutex; handlers
//! never hold it across an await point.

use crate::api::error::ApiError;
use crate::auth::authenticate;
use crate::coin::Condition;
use crate::output::{load_statistics, CollectionStatistics};
use crate::storage::{Coin, CoinFilter, CollectionEntry, CollectionItem, SqliteStorage, Storage};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers
pub struct ApiState {
    storage: Mutex<SqliteStorage>,
}

impl ApiState {
    pub fn new(storage: SqliteStorage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    async fn storage(&self) -> MutexGuard<'_, SqliteStorage> {
        self.storage.lock().await
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Request and response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CoinQuery {
    pub country: Option<String>,
    pub year: Option<i32>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddToCollectionRequest {
    pub coin_id: String,
    pub condition: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollectionRequest {
    pub condition: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<CollectionItem>,
}

impl ActionResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            item: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_condition(raw: &str) -> Result<Condition, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let storage = state.storage().await;

    let response = match authenticate(&*storage, &request.username, &request.password)? {
        Some(user) => {
            tracing::info!("User {} logged in", user.username);
            LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                user: Some(UserResponse {
                    id: user.id,
                    username: user.username,
                }),
            }
        }
        None => {
            tracing::warn!("Failed login for {}", request.username);
            LoginResponse {
                success: false,
                message: "Invalid username or password".to_string(),
                user: None,
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/coins
pub async fn list_coins(
    State(state): State<AppState>,
    Query(query): Query<CoinQuery>,
) -> Result<Json<Vec<Coin>>, ApiError> {
    let filter = CoinFilter {
        country: non_empty(query.country),
        year: query.year,
        search: non_empty(query.search),
    };
    let coins = state.storage().await.list_coins(&filter)?;
    Ok(Json(coins))
}

/// GET /api/coins/:coin_id
pub async fn get_coin(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<Coin>, ApiError> {
    state
        .storage()
        .await
        .get_coin(&coin_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Coin not found".to_string()))
}

/// GET /api/countries
pub async fn list_countries(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.storage().await.list_countries()?))
}

/// GET /api/years
pub async fn list_years(State(state): State<AppState>) -> Result<Json<Vec<i32>>, ApiError> {
    Ok(Json(state.storage().await.list_years()?))
}

/// GET /api/collection
pub async fn get_collection(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<CollectionEntry>>, ApiError> {
    Ok(Json(state.storage().await.list_collection(&query.user_id)?))
}

/// POST /api/collection/add
pub async fn add_to_collection(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Json(request): Json<AddToCollectionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let condition = parse_condition(&request.condition)?;

    let item = state.storage().await.add_collection_item(
        &query.user_id,
        &request.coin_id,
        condition,
        request.notes.as_deref(),
    )?;

    tracing::info!("User {} added coin {}", query.user_id, item.coin_id);
    Ok(Json(ActionResponse {
        item: Some(item),
        ..ActionResponse::ok("Coin added to collection")
    }))
}

/// PUT /api/collection/:item_id
pub async fn update_collection_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<UserQuery>,
    Json(request): Json<UpdateCollectionRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    let condition = non_empty(request.condition)
        .map(|raw| parse_condition(&raw))
        .transpose()?;

    if condition.is_none() && request.notes.is_none() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    state.storage().await.update_collection_item(
        &query.user_id,
        &item_id,
        condition,
        request.notes.as_deref(),
    )?;

    Ok(Json(ActionResponse::ok("Collection updated")))
}

/// DELETE /api/collection/:item_id
pub async fn remove_from_collection(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ActionResponse>, ApiError> {
    state
        .storage()
        .await
        .remove_collection_item(&query.user_id, &item_id)?;

    Ok(Json(ActionResponse::ok("Coin removed from collection")))
}

/// GET /api/collection/stats
pub async fn collection_stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CollectionStatistics>, ApiError> {
    let storage = state.storage().await;
    Ok(Json(load_statistics(&*storage, &query.user_id)?))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
