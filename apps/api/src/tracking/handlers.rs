//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::tracking::{
    calculate_stats, list_applications, update_heard_back, ApplicationRecord, ApplicationStats,
};

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationRecord>,
    pub stats: ApplicationStats,
}

#[derive(Debug, Deserialize)]
pub struct HeardBackRequest {
    pub heard_back: bool,
}

/// GET /api/v1/applications/:user
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let applications = list_applications(&state.store, &user).await?;
    let stats = calculate_stats(&applications);
    Ok(Json(ApplicationsResponse {
        applications,
        stats,
    }))
}

/// PATCH /api/v1/applications/:user/:id
pub async fn handle_update_heard_back(
    State(state): State<AppState>,
    Path((user, id)): Path<(String, u32)>,
    Json(request): Json<HeardBackRequest>,
) -> Result<Json<ApplicationRecord>, AppError> {
    let record = update_heard_back(&state.store, &user, id, request.heard_back).await?;
    Ok(Json(record))
}
