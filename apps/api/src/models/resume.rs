//! Resume document model: the candidate's full content plus the constraint
//! config a Selection must satisfy.
//!
//! Wire keys are snake_case, matching the JSON documents users keep on disk.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::models::legacy::{deserialize_summaries, RawStaticInfo};

const DEFAULT_PAGE_LIMIT: u32 = 2;
const DEFAULT_TOTAL_BULLETS: Bounds = Bounds::new(16, 20);
const DEFAULT_COMPANY_BULLETS: Bounds = Bounds::new(4, 6);
const DEFAULT_PROJECTS: Bounds = Bounds::new(2, 3);

/// Suffix marking the mandatory subset of a skill category in the flat wire form.
pub const MANDATORY_SUFFIX: &str = "_mandatory";

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default)]
    pub static_info: StaticInfo,
    #[serde(default, deserialize_with = "deserialize_summaries")]
    pub summaries: BTreeMap<String, String>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub skills: SkillCatalog,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Opaque to selection; passed through to the renderer.
    #[serde(default)]
    pub education: Vec<Value>,
    #[serde(default)]
    pub config: ConstraintConfig,
    /// Consumed only by the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_settings: Option<Value>,
}

impl ResumeDocument {
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

/// Identity block. Always in the `links` sequence form once deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStaticInfo")]
pub struct StaticInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_company_bullets")]
    pub bullet_constraints: Bounds,
    #[serde(default)]
    pub bullets: Vec<Bullet>,
}

impl Company {
    pub fn mandatory_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.mandatory)
    }

    /// Looks up a bullet by text, ignoring surrounding whitespace.
    pub fn bullet(&self, text: &str) -> Option<&Bullet> {
        let text = text.trim();
        self.bullets.iter().find(|b| b.text.trim() == text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub text: String,
    #[serde(default)]
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tech: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub link: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Skill items per category plus the mandatory subset of each category.
///
/// On the wire this is one flat object: `"languages": [...]` next to
/// `"languages_mandatory": [...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    pub items: BTreeMap<String, Vec<String>>,
    pub mandatory: BTreeMap<String, Vec<String>>,
}

impl SkillCatalog {
    pub fn mandatory_for(&self, category: &str) -> &[String] {
        self.mandatory
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for SkillCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flat = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut catalog = SkillCatalog::default();
        for (key, values) in flat {
            match key.strip_suffix(MANDATORY_SUFFIX) {
                Some(category) => {
                    catalog.mandatory.insert(category.to_string(), values);
                }
                None => {
                    catalog.items.insert(key, values);
                }
            }
        }
        Ok(catalog)
    }
}

impl Serialize for SkillCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len() + self.mandatory.len()))?;
        for (category, items) in &self.items {
            map.serialize_entry(category, items)?;
        }
        for (category, items) in &self.mandatory {
            map.serialize_entry(&format!("{category}{MANDATORY_SUFFIX}"), items)?;
        }
        map.end()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Constraint config
// ────────────────────────────────────────────────────────────────────────────

/// Inclusive `[min, max]` count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }

    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Informational only; the renderer enforces page length.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub bullets: TotalBullets,
    #[serde(default)]
    pub skills_per_category: BTreeMap<String, Bounds>,
    #[serde(default = "default_projects")]
    pub projects: Bounds,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            bullets: TotalBullets::default(),
            skills_per_category: BTreeMap::new(),
            projects: DEFAULT_PROJECTS,
        }
    }
}

/// Bounds on the number of bullets summed across all selected companies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalBullets {
    pub total_min: usize,
    pub total_max: usize,
}

impl TotalBullets {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.total_min, self.total_max)
    }
}

impl Default for TotalBullets {
    fn default() -> Self {
        Self {
            total_min: DEFAULT_TOTAL_BULLETS.min,
            total_max: DEFAULT_TOTAL_BULLETS.max,
        }
    }
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_company_bullets() -> Bounds {
    DEFAULT_COMPANY_BULLETS
}

fn default_projects() -> Bounds {
    DEFAULT_PROJECTS
}

// ────────────────────────────────────────────────────────────────────────────
// Selection: the LLM's chosen subset, not yet validated
// ────────────────────────────────────────────────────────────────────────────

/// Subset of a `ResumeDocument` chosen for one job description.
///
/// Produced fresh per request and never merged with an earlier selection.
/// Extra fields echoed back by the model (names, dates, ...) are ignored; the
/// authoritative records are resolved from the document by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default, deserialize_with = "deserialize_summaries")]
    pub summaries: BTreeMap<String, String>,
    #[serde(default)]
    pub companies: Vec<SelectedCompany>,
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub projects: Vec<SelectedProject>,
}

impl Selection {
    pub fn total_bullets(&self) -> usize {
        self.companies.iter().map(|c| c.bullets.len()).sum()
    }

    pub fn company(&self, id: &str) -> Option<&SelectedCompany> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn skill_count(&self, category: &str) -> usize {
        self.skills.get(category).map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedCompany {
    pub id: String,
    #[serde(default)]
    pub bullets: Vec<SelectedBullet>,
}

impl SelectedCompany {
    pub fn has_bullet(&self, text: &str) -> bool {
        let text = text.trim();
        self.bullets.iter().any(|b| b.text.trim() == text)
    }
}

/// A chosen bullet. Models return either `{"text": "..."}` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectedBulletRepr")]
pub struct SelectedBullet {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectedBulletRepr {
    Text(String),
    Object { text: String },
}

impl From<SelectedBulletRepr> for SelectedBullet {
    fn from(repr: SelectedBulletRepr) -> Self {
        match repr {
            SelectedBulletRepr::Text(text) | SelectedBulletRepr::Object { text } => Self { text },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedProject {
    pub id: String,
}
