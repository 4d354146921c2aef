//! Render hand-off: the only path by which a selection leaves the core.
//!
//! The renderer receives a `RenderInput`: a validated selection resolved back
//! against the document, so it sees full company and project records, the one
//! chosen summary, and the untouched display settings. Template filling and
//! PDF compilation live behind the `Renderer` trait.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{Bullet, Company, Project, ResumeDocument, Selection, StaticInfo};

/// File name of the hand-off artifact inside each generation directory.
pub const ARTIFACT_FILE: &str = "resume_data_trimmed.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChosenSummary {
    pub key: String,
    pub text: String,
}

/// Everything a renderer needs to lay out one tailored resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderInput {
    pub static_info: StaticInfo,
    pub summary: ChosenSummary,
    pub companies: Vec<Company>,
    pub skills: BTreeMap<String, Vec<String>>,
    pub projects: Vec<Project>,
    pub education: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_settings: Option<Value>,
}

impl RenderInput {
    /// Resolves a validated selection against its document.
    ///
    /// Companies keep document order; bullets keep the document's text and
    /// order. Summary text always comes from the document.
    pub fn resolve(doc: &ResumeDocument, selection: &Selection) -> Result<Self> {
        let key = selection
            .summaries
            .keys()
            .next()
            .context("selection has no summary variant")?;
        let text = doc
            .summaries
            .get(key)
            .with_context(|| format!("summary variant '{key}' not in document"))?;

        let companies = doc
            .companies
            .iter()
            .filter_map(|company| {
                let selected = selection.company(&company.id)?;
                let bullets: Vec<Bullet> = company
                    .bullets
                    .iter()
                    .filter(|b| selected.has_bullet(&b.text))
                    .cloned()
                    .collect();
                Some(Company {
                    bullets,
                    ..company.clone()
                })
            })
            .collect();

        let projects = doc
            .projects
            .iter()
            .filter(|p| selection.projects.iter().any(|s| s.id == p.id))
            .cloned()
            .collect();

        Ok(Self {
            static_info: doc.static_info.clone(),
            summary: ChosenSummary {
                key: key.clone(),
                text: text.clone(),
            },
            companies,
            skills: selection.skills.clone(),
            projects,
            education: doc.education.clone(),
            display_settings: doc.display_settings.clone(),
        })
    }
}

/// What a renderer produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub bytes: u64,
}

/// External render collaborator.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, generation_id: Uuid, input: &RenderInput) -> Result<RenderedArtifact>;
}

/// Writes the render input as JSON for a downstream template filler.
#[derive(Debug, Clone)]
pub struct JsonArtifactRenderer {
    output_dir: PathBuf,
}

impl JsonArtifactRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Renderer for JsonArtifactRenderer {
    async fn render(&self, generation_id: Uuid, input: &RenderInput) -> Result<RenderedArtifact> {
        let dir = self.output_dir.join(generation_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let body = serde_json::to_vec_pretty(input).context("Failed to serialize render input")?;
        let path = dir.join(ARTIFACT_FILE);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Wrote render artifact {} ({} bytes)", path.display(), body.len());

        Ok(RenderedArtifact {
            path,
            bytes: body.len() as u64,
        })
    }
}
