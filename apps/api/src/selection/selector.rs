//! Selector: asks the LLM to pick a constrained subset of the resume for a
//! job description, then parses the untrusted reply into a `Selection`.
//!
//! One outbound call per invocation, no retries. The returned `Selection` is
//! shape-correct but not yet checked against the constraint config.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM, VERBATIM_INSTRUCTION};
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::resume::{
    Company, ConstraintConfig, Project, ResumeDocument, Selection, SkillCatalog,
};
use crate::selection::json_scan::extract_first_json_object;
use crate::selection::prompts::{SELECTION_PROMPT_TEMPLATE, SELECTION_SYSTEM};

/// How much of a bad reply to echo into logs.
const RAW_LOG_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("job description must not be empty")]
    EmptyJobDescription,

    #[error("failed to serialize resume content: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The external call did not complete (network, timeout, auth, API status).
    #[error("selection request failed: {0}")]
    Request(#[from] LlmError),

    /// The reply held no recoverable JSON object of the selection shape.
    #[error("could not parse selection from LLM reply: {reason}")]
    Parse { reason: String, raw: String },
}

/// The selectable part of a document, as sent to the model.
#[derive(Debug, Serialize)]
struct ResumeContent<'a> {
    summaries: &'a BTreeMap<String, String>,
    companies: &'a [Company],
    skills: &'a SkillCatalog,
    projects: &'a [Project],
}

#[derive(Debug, Serialize)]
struct SelectionRequest<'a> {
    resume_content: ResumeContent<'a>,
    constraints: &'a ConstraintConfig,
}

/// Requests a selection for `job_description` and parses the reply.
pub async fn select_content(
    llm: &dyn TextGenerator,
    doc: &ResumeDocument,
    job_description: &str,
) -> Result<Selection, SelectionError> {
    if job_description.trim().is_empty() {
        return Err(SelectionError::EmptyJobDescription);
    }

    let prompt = build_selection_prompt(doc, job_description)?;
    info!(
        "Requesting content selection: companies={}, projects={}, prompt_chars={}",
        doc.companies.len(),
        doc.projects.len(),
        prompt.len()
    );

    let system = format!("{SELECTION_SYSTEM} {JSON_ONLY_SYSTEM}");
    let raw = llm.generate(&system, &prompt).await?;

    let selection = parse_selection(&raw)?;
    info!(
        "Selection parsed: companies={}, bullets={}, projects={}",
        selection.companies.len(),
        selection.total_bullets(),
        selection.projects.len()
    );
    Ok(selection)
}

/// Parses the first balanced JSON object of `raw` as a `Selection`.
pub fn parse_selection(raw: &str) -> Result<Selection, SelectionError> {
    let parse_error = |reason: String| {
        warn!(
            "Unparseable selection reply ({reason}): {:?}",
            raw.chars().take(RAW_LOG_PREVIEW_CHARS).collect::<String>()
        );
        SelectionError::Parse {
            reason,
            raw: raw.to_string(),
        }
    };

    let span = extract_first_json_object(raw)
        .ok_or_else(|| parse_error("no balanced JSON object in reply".to_string()))?;

    serde_json::from_str(span).map_err(|e| parse_error(e.to_string()))
}

/// Builds the selection prompt: the request payload as JSON plus the numeric
/// bounds and mandatory items spelled out as rules.
pub fn build_selection_prompt(
    doc: &ResumeDocument,
    job_description: &str,
) -> Result<String, SelectionError> {
    let request = SelectionRequest {
        resume_content: ResumeContent {
            summaries: &doc.summaries,
            companies: &doc.companies,
            skills: &doc.skills,
            projects: &doc.projects,
        },
        constraints: &doc.config,
    };
    let request_json = serde_json::to_string_pretty(&request)?;
    let constraints = constraint_rules(doc);
    let mandatory = mandatory_rules(doc);

    // Document text and the job description go in through a single pass, so
    // neither is scanned for placeholders.
    Ok(fill_template(
        SELECTION_PROMPT_TEMPLATE,
        &[
            ("json_only_instruction", JSON_ONLY_SYSTEM),
            ("verbatim_instruction", VERBATIM_INSTRUCTION),
            ("constraint_rules", constraints.as_str()),
            ("mandatory_rules", mandatory.as_str()),
            ("request_json", request_json.as_str()),
            ("job_description", job_description),
        ],
    ))
}

fn constraint_rules(doc: &ResumeDocument) -> String {
    let config = &doc.config;
    let mut rules = String::new();

    let _ = writeln!(
        rules,
        "- Total experience bullets across all companies: {} to {}",
        config.bullets.total_min, config.bullets.total_max
    );
    for company in &doc.companies {
        let _ = writeln!(
            rules,
            "- Company \"{}\": {} to {} bullets if included",
            company.id, company.bullet_constraints.min, company.bullet_constraints.max
        );
    }
    for (category, bounds) in &config.skills_per_category {
        let _ = writeln!(
            rules,
            "- Skills \"{category}\": {} to {} items",
            bounds.min, bounds.max
        );
    }
    let _ = writeln!(
        rules,
        "- Projects: {} to {}",
        config.projects.min, config.projects.max
    );
    rules.push_str("- Summary: exactly ONE summary variant");
    rules
}

fn mandatory_rules(doc: &ResumeDocument) -> String {
    let mut rules = String::new();

    for company in doc.companies.iter().filter(|c| c.mandatory) {
        let _ = writeln!(rules, "- Company \"{}\" must be included", company.id);
    }
    for company in &doc.companies {
        for bullet in company.mandatory_bullets() {
            let _ = writeln!(
                rules,
                "- Company \"{}\" bullet (include if the company is included): {}",
                company.id, bullet.text
            );
        }
    }
    for (category, skills) in &doc.skills.mandatory {
        if !skills.is_empty() {
            let _ = writeln!(rules, "- Skills \"{category}\": {}", skills.join(", "));
        }
    }

    if rules.is_empty() {
        "- (none)".to_string()
    } else {
        rules.trim_end().to_string()
    }
}
