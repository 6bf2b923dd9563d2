use std::path::PathBuf;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::IntroResult;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct IntroQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct IntroListResponse {
    pub provider: &'static str,
    pub intros: Vec<IntroResult>,
}

#[derive(Debug, Serialize)]
pub struct CustomIntroFilesResponse {
    pub files: Vec<PathBuf>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Select intros to play before an item
///
/// The selection is cancelled if the client goes away before it completes.
pub async fn get_intros(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<IntroQuery>,
) -> AppResult<Json<IntroListResponse>> {
    let target = state.catalog.item(item_id)?;
    let user = state.catalog.user(query.user_id)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let intros = state.provider.select(&target, &user, &cancel).await?;

    Ok(Json(IntroListResponse {
        provider: state.provider.name(),
        intros,
    }))
}

/// List every configured custom intro file
pub async fn get_custom_intro_files(
    State(state): State<AppState>,
) -> Json<CustomIntroFilesResponse> {
    let files = state.provider.list_all_custom_intro_files().await;
    Json(CustomIntroFilesResponse { files })
}
