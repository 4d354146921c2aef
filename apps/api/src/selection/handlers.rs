//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeDocument, Selection};
use crate::render::RenderedArtifact;
use crate::selection::orchestrator::{generate_resume, render_selection};
use crate::selection::validator::{check_config, validate, ValidationResult};
use crate::state::AppState;
use crate::tracking::{record_application, ApplicationRecord};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub job_description: String,
    /// When set, the generation is logged as an application to this company.
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub generation_id: Uuid,
    pub selection: Selection,
    pub artifact: RenderedArtifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub selection: Selection,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub selection: Selection,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes/:user/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<ResumeDocument>, AppError> {
    let doc = state.store.load(&user).await?;
    Ok(Json(doc))
}

/// PUT /api/v1/resumes/:user/document
///
/// Replaces the stored document. A malformed constraint config is rejected
/// up front so every stored document can be generated from.
pub async fn handle_put_document(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(doc): Json<ResumeDocument>,
) -> Result<Json<ResumeDocument>, AppError> {
    let violations = check_config(&doc);
    if !violations.is_empty() {
        return Err(AppError::Configuration(violations));
    }

    let _guard = state.store.write_lock().await;
    state.store.save(&user, &doc).await?;
    Ok(Json(doc))
}

/// POST /api/v1/resumes/:user/generate
///
/// One selection attempt per request. An invalid selection comes back as 422
/// with its violations; the caller decides whether to try again.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let doc = state.store.load(&user).await?;
    let outcome = generate_resume(
        state.llm.as_ref(),
        state.renderer.as_ref(),
        &doc,
        &request.job_description,
    )
    .await?;

    let application = match request
        .company_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        Some(company) => Some(
            record_application(&state.store, &user, company, &request.job_description).await?,
        ),
        None => None,
    };

    info!(
        "Generated resume {} for user {user} -> {}",
        outcome.generation_id,
        outcome.artifact.path.display()
    );

    Ok(Json(GenerateResponse {
        generation_id: outcome.generation_id,
        selection: outcome.selection,
        artifact: outcome.artifact,
        application,
    }))
}

/// POST /api/v1/resumes/:user/validate
///
/// Checks a caller-supplied selection against the stored document without
/// calling the text-generation service.
pub async fn handle_validate(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>, AppError> {
    let doc = state.store.load(&user).await?;
    let result = validate(&doc, &request.selection);
    if !result.is_valid() {
        info!(
            "Selection for user {user} has {} violation(s)",
            result.violations().len()
        );
    }
    Ok(Json(result))
}

/// POST /api/v1/resumes/:user/render
///
/// Re-renders a selection the caller edited, without calling the
/// text-generation service. The selection must pass validation first.
pub async fn handle_render(
    State(state): State<AppState>,
    Path(user): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let doc = state.store.load(&user).await?;
    let outcome = render_selection(state.renderer.as_ref(), &doc, request.selection).await?;

    info!(
        "Rendered edited selection {} for user {user} -> {}",
        outcome.generation_id,
        outcome.artifact.path.display()
    );

    Ok(Json(GenerateResponse {
        generation_id: outcome.generation_id,
        selection: outcome.selection,
        artifact: outcome.artifact,
        application: None,
    }))
}
