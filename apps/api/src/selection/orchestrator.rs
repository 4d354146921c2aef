//! Resume generation: one single-pass run for one job description.
//!
//! Flow: check_config → select_content (one LLM call) → validate →
//!       resolve RenderInput → renderer.render.
//!
//! No step is retried. A malformed config stops the run before the LLM call,
//! and only a `Valid` selection is ever handed to the renderer.
//!
//! `render_selection` is the same run minus the LLM call, for selections the
//! caller edited by hand.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::TextGenerator;
use crate::models::resume::{ResumeDocument, Selection};
use crate::render::{RenderInput, RenderedArtifact, Renderer};
use crate::selection::selector::{select_content, SelectionError};
use crate::selection::validator::{check_config, validate, ValidationResult, Violation};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Resume constraint config is malformed ({} issue(s))", .0.len())]
    Configuration(Vec<Violation>),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Selection failed validation with {} violation(s)", .violations.len())]
    Invalid {
        violations: Vec<Violation>,
        selection: Box<Selection>,
    },

    #[error("Render failed: {0:#}")]
    Render(anyhow::Error),
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub generation_id: Uuid,
    pub selection: Selection,
    pub artifact: RenderedArtifact,
}

/// Runs selection, validation, and rendering for one job description.
pub async fn generate_resume(
    llm: &dyn TextGenerator,
    renderer: &dyn Renderer,
    doc: &ResumeDocument,
    job_description: &str,
) -> Result<GenerationOutcome, GenerationError> {
    let generation_id = Uuid::new_v4();

    // Step 1: Static config check, before any LLM call
    ensure_config(generation_id, doc)?;

    // Step 2: Content selection
    info!("Generation {generation_id}: selecting content");
    let selection = select_content(llm, doc, job_description).await?;

    // Steps 3 and 4: Validation, then render
    validate_and_render(generation_id, renderer, doc, selection).await
}

/// Renders a caller-supplied selection (typically an edited earlier one)
/// without an LLM call. It passes the same validation gate as a generated one.
pub async fn render_selection(
    renderer: &dyn Renderer,
    doc: &ResumeDocument,
    selection: Selection,
) -> Result<GenerationOutcome, GenerationError> {
    let generation_id = Uuid::new_v4();
    info!("Generation {generation_id}: rendering supplied selection");

    ensure_config(generation_id, doc)?;
    validate_and_render(generation_id, renderer, doc, selection).await
}

fn ensure_config(generation_id: Uuid, doc: &ResumeDocument) -> Result<(), GenerationError> {
    let config_violations = check_config(doc);
    if config_violations.is_empty() {
        return Ok(());
    }
    warn!(
        "Generation {generation_id}: config has {} issue(s), stopping",
        config_violations.len()
    );
    Err(GenerationError::Configuration(config_violations))
}

async fn validate_and_render(
    generation_id: Uuid,
    renderer: &dyn Renderer,
    doc: &ResumeDocument,
    selection: Selection,
) -> Result<GenerationOutcome, GenerationError> {
    if let ValidationResult::Invalid(violations) = validate(doc, &selection) {
        for violation in &violations {
            warn!("Generation {generation_id}: {violation}");
        }
        return Err(GenerationError::Invalid {
            violations,
            selection: Box::new(selection),
        });
    }
    info!(
        "Generation {generation_id}: selection valid ({} bullets)",
        selection.total_bullets()
    );

    let input = RenderInput::resolve(doc, &selection).map_err(GenerationError::Render)?;
    let artifact = renderer
        .render(generation_id, &input)
        .await
        .map_err(GenerationError::Render)?;

    info!(
        "Generation {generation_id}: rendered {}",
        artifact.path.display()
    );

    Ok(GenerationOutcome {
        generation_id,
        selection,
        artifact,
    })
}
