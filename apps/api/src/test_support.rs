//! Shared fixtures for unit tests: the slice/acme sample document, a selection
//! that satisfies everything but the sample's 16..20 bullet total, and fake
//! LLM/render collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::bail;
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::llm_client::{LlmError, TextGenerator};
use crate::models::resume::{ResumeDocument, Selection};
use crate::render::{RenderInput, RenderedArtifact, Renderer};

const SLICE_BULLETS: [&str; 8] = [
    "Led the UPI payments SDK rewrite in Kotlin, cutting checkout failures by 32%",
    "Migrated 14 legacy screens to Jetpack Compose with MVI state management",
    "Built a CI pipeline on GitHub Actions running 2,400 unit tests in under 9 minutes",
    "Reduced cold start time from 2.8s to 1.1s through lazy module loading",
    "Mentored 4 junior engineers through weekly code reviews and pairing",
    "Designed an offline-first ledger sync using Room and WorkManager",
    "Shipped card-controls feature used by 3M monthly active users",
    "Instrumented crash reporting, lowering the crash rate to 0.08%",
];

const ACME_BULLETS: [&str; 5] = [
    "Developed REST APIs in Spring Boot serving 40k requests per minute",
    "Introduced contract tests between 6 microservices",
    "Automated release notes generation, saving 5 hours per sprint",
    "Built an internal admin dashboard in React and TypeScript",
    "Tuned PostgreSQL queries, reducing p95 latency by 45%",
];

/// 1-based, like the scenario descriptions.
pub fn slice_bullet(n: usize) -> String {
    SLICE_BULLETS[n - 1].to_string()
}

pub fn acme_bullet(n: usize) -> String {
    ACME_BULLETS[n - 1].to_string()
}

/// Bullet totals 16..20; "slice" mandatory (4..6, 8 bullets, #1 mandatory);
/// "acme" optional (2..4, 5 bullets); languages 3..5 with Kotlin and Java
/// mandatory; projects 1..2.
pub fn sample_document() -> ResumeDocument {
    let slice_bullets: Vec<_> = SLICE_BULLETS
        .iter()
        .enumerate()
        .map(|(i, text)| json!({"text": text, "mandatory": i == 0}))
        .collect();
    let acme_bullets: Vec<_> = ACME_BULLETS
        .iter()
        .map(|text| json!({"text": text, "mandatory": false}))
        .collect();

    serde_json::from_value(json!({
        "static_info": {
            "name": "Asha Rao",
            "email": "asha@example.com",
            "links": [
                {"name": "GitHub", "url": "https://github.com/asha", "icon": "github"}
            ]
        },
        "summaries": {
            "android": "Android engineer with 6 years of fintech experience.",
            "general": "Software engineer focused on payments."
        },
        "companies": [
            {
                "id": "slice",
                "mandatory": true,
                "name": "Slice",
                "position": "Senior Android Engineer",
                "dates": "2021 – Present",
                "location": "Bengaluru",
                "bullet_constraints": {"min": 4, "max": 6},
                "bullets": slice_bullets
            },
            {
                "id": "acme",
                "mandatory": false,
                "name": "Acme Corp",
                "position": "Software Engineer",
                "dates": "2018 – 2021",
                "location": "Pune",
                "bullet_constraints": {"min": 2, "max": 4},
                "bullets": acme_bullets
            }
        ],
        "skills": {
            "languages": ["Kotlin", "Java", "Python", "Go", "Rust", "Swift"],
            "languages_mandatory": ["Kotlin", "Java"],
            "tools": ["Git", "Gradle"]
        },
        "projects": [
            {"id": "upi-sdk", "name": "Open UPI SDK", "tech": "Kotlin"},
            {"id": "chess", "name": "Chess Engine", "tech": "Rust"},
            {"id": "budget", "name": "Budget Tracker", "tech": "Flutter"}
        ],
        "education": [
            {"school": "IIT Bombay", "degree": "B.Tech CSE", "dates": "2014 – 2018"}
        ],
        "config": {
            "page_limit": 2,
            "bullets": {"total_min": 16, "total_max": 20},
            "skills_per_category": {"languages": {"min": 3, "max": 5}},
            "projects": {"min": 1, "max": 2}
        },
        "display_settings": {
            "sections": {"projects": {"enabled": true, "title": "Personal Projects"}}
        }
    }))
    .expect("sample document deserializes")
}

/// slice bullets 1-5, acme bullets 1-4 (9 total), three languages, one project.
pub fn valid_selection_json() -> String {
    json!({
        "summaries": {"android": "Android engineer with 6 years of fintech experience."},
        "companies": [
            {
                "id": "slice",
                "bullets": (1..=5).map(|n| json!({"text": slice_bullet(n)})).collect::<Vec<_>>()
            },
            {
                "id": "acme",
                "bullets": (1..=4).map(|n| json!({"text": acme_bullet(n)})).collect::<Vec<_>>()
            }
        ],
        "skills": {"languages": ["Kotlin", "Java", "Python"]},
        "projects": [{"id": "upi-sdk"}]
    })
    .to_string()
}

pub fn valid_selection() -> Selection {
    serde_json::from_str(&valid_selection_json()).expect("valid selection deserializes")
}

enum Scripted {
    Reply(String),
    Timeout,
}

/// Fake LLM returning a fixed reply (or a timeout) and counting calls.
pub struct ScriptedGenerator {
    outcome: Scripted,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn reply(text: String) -> Self {
        Self::new(Scripted::Reply(text))
    }

    pub fn fail_with_timeout() -> Self {
        Self::new(Scripted::Timeout)
    }

    fn new(outcome: Scripted) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.outcome {
            Scripted::Reply(text) => Ok(text.clone()),
            Scripted::Timeout => Err(LlmError::Timeout { secs: 120 }),
        }
    }
}

/// Fake renderer that records what it was given.
#[derive(Default)]
pub struct RecordingRenderer {
    fail: bool,
    rendered: Mutex<Vec<(Uuid, RenderInput)>>,
}

impl RecordingRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn rendered(&self) -> Vec<(Uuid, RenderInput)> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(
        &self,
        generation_id: Uuid,
        input: &RenderInput,
    ) -> anyhow::Result<RenderedArtifact> {
        if self.fail {
            bail!("template missing");
        }
        self.rendered
            .lock()
            .unwrap()
            .push((generation_id, input.clone()));
        Ok(RenderedArtifact {
            path: format!("/tmp/{generation_id}/resume.pdf").into(),
            bytes: 0,
        })
    }
}
