//! Validator: checks a `Selection` against the document's constraint config.
//!
//! Pure and deterministic. Every check runs; all violations are accumulated in
//! a stable order (config problems first, then the selection checks in the
//! order below) so callers can show the full list.
//!
//! Checks:
//! 1. total bullets within `[total_min, total_max]`
//! 2. every mandatory company present
//! 3. per selected company: known id listed once, bullet count within its
//!    bounds, every mandatory bullet present, every bullet taken from the
//!    document and listed once
//! 4. per skill category: count within bounds, every mandatory skill present;
//!    every selected category and skill exists in the document, listed once
//! 5. project count within bounds, every project id known and listed once
//! 6. exactly one summary variant, with a key the document defines
//!
//! A selection is a subset of the document, so repeats never count toward a
//! range: each one is reported as a duplicate.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::resume::{Bounds, ResumeDocument, Selection};

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// A single structured reason a selection (or its config) is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The constraint config itself is malformed.
    ConfigurationError { scope: String, detail: String },
    BulletCountViolation { total: usize, min: usize, max: usize },
    MissingMandatoryCompany { company_id: String },
    UnknownCompany { company_id: String },
    DuplicateCompany { company_id: String },
    CompanyBulletRangeViolation {
        company_id: String,
        count: usize,
        min: usize,
        max: usize,
    },
    MissingMandatoryBullet { company_id: String, bullet_text: String },
    UnknownBullet { company_id: String, bullet_text: String },
    DuplicateBullet { company_id: String, bullet_text: String },
    SkillRangeViolation {
        category: String,
        count: usize,
        min: usize,
        max: usize,
    },
    MissingMandatorySkill { category: String, skill: String },
    UnknownSkillCategory { category: String },
    UnknownSkill { category: String, skill: String },
    DuplicateSkill { category: String, skill: String },
    ProjectCountViolation { count: usize, min: usize, max: usize },
    UnknownProject { project_id: String },
    DuplicateProject { project_id: String },
    InvalidSummaryVariant { selected: Vec<String> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ConfigurationError { scope, detail } => {
                write!(f, "invalid config for {scope}: {detail}")
            }
            Violation::BulletCountViolation { total, min, max } => {
                write!(f, "total bullets ({total}) outside range {min}-{max}")
            }
            Violation::MissingMandatoryCompany { company_id } => {
                write!(f, "mandatory company '{company_id}' is missing")
            }
            Violation::UnknownCompany { company_id } => {
                write!(f, "company '{company_id}' does not exist in the resume")
            }
            Violation::DuplicateCompany { company_id } => {
                write!(f, "company '{company_id}' is selected more than once")
            }
            Violation::CompanyBulletRangeViolation {
                company_id,
                count,
                min,
                max,
            } => write!(f, "{company_id}: {count} bullets (expected {min}-{max})"),
            Violation::MissingMandatoryBullet {
                company_id,
                bullet_text,
            } => write!(f, "{company_id}: mandatory bullet missing: {bullet_text:?}"),
            Violation::UnknownBullet {
                company_id,
                bullet_text,
            } => write!(f, "{company_id}: bullet not in the resume: {bullet_text:?}"),
            Violation::DuplicateBullet {
                company_id,
                bullet_text,
            } => write!(f, "{company_id}: bullet selected more than once: {bullet_text:?}"),
            Violation::SkillRangeViolation {
                category,
                count,
                min,
                max,
            } => write!(f, "{category}: {count} items (expected {min}-{max})"),
            Violation::MissingMandatorySkill { category, skill } => {
                write!(f, "{category}: mandatory skill '{skill}' is missing")
            }
            Violation::UnknownSkillCategory { category } => {
                write!(f, "skill category '{category}' does not exist in the resume")
            }
            Violation::UnknownSkill { category, skill } => {
                write!(f, "{category}: skill '{skill}' is not in the resume")
            }
            Violation::DuplicateSkill { category, skill } => {
                write!(f, "{category}: skill '{skill}' is selected more than once")
            }
            Violation::ProjectCountViolation { count, min, max } => {
                write!(f, "project count ({count}) outside range {min}-{max}")
            }
            Violation::UnknownProject { project_id } => {
                write!(f, "project '{project_id}' does not exist in the resume")
            }
            Violation::DuplicateProject { project_id } => {
                write!(f, "project '{project_id}' is selected more than once")
            }
            Violation::InvalidSummaryVariant { selected } => write!(
                f,
                "expected exactly one known summary variant, got [{}]",
                selected.join(", ")
            ),
        }
    }
}

/// Outcome of validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "violations", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(violations)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Validates `selection` against `doc`. A malformed config always yields
/// `Invalid`, whatever the selection holds.
pub fn validate(doc: &ResumeDocument, selection: &Selection) -> ValidationResult {
    let mut violations = check_config(doc);

    check_total_bullets(doc, selection, &mut violations);
    check_mandatory_companies(doc, selection, &mut violations);
    check_selected_companies(doc, selection, &mut violations);
    check_skills(doc, selection, &mut violations);
    check_projects(doc, selection, &mut violations);
    check_summary(doc, selection, &mut violations);

    ValidationResult::from_violations(violations)
}

/// Static checks on the constraint config. Needs no selection, so callers run
/// it before spending an LLM call.
pub fn check_config(doc: &ResumeDocument) -> Vec<Violation> {
    let mut violations = Vec::new();
    let config = &doc.config;

    check_bounds("bullets", config.bullets.bounds(), &mut violations);
    check_bounds("projects", config.projects, &mut violations);
    for (category, bounds) in &config.skills_per_category {
        check_bounds(&format!("skills.{category}"), *bounds, &mut violations);
    }
    check_skill_config(doc, &mut violations);

    let mut seen_ids = HashSet::new();
    for company in &doc.companies {
        let scope = format!("companies.{}", company.id);
        if !seen_ids.insert(company.id.as_str()) {
            violations.push(Violation::ConfigurationError {
                scope: scope.clone(),
                detail: "duplicate company id".to_string(),
            });
        }

        let bounds = company.bullet_constraints;
        check_bounds(&scope, bounds, &mut violations);

        if bounds.max > company.bullets.len() {
            violations.push(Violation::ConfigurationError {
                scope: scope.clone(),
                detail: format!(
                    "max bullets ({}) exceeds available bullets ({})",
                    bounds.max,
                    company.bullets.len()
                ),
            });
        }

        let mandatory = company.mandatory_bullets().count();
        if company.mandatory && mandatory > bounds.max {
            violations.push(Violation::ConfigurationError {
                scope,
                detail: format!(
                    "{mandatory} mandatory bullets exceed max bullets ({})",
                    bounds.max
                ),
            });
        }
    }

    violations
}

// ────────────────────────────────────────────────────────────────────────────
// Individual checks
// ────────────────────────────────────────────────────────────────────────────

fn check_bounds(scope: &str, bounds: Bounds, violations: &mut Vec<Violation>) {
    if !bounds.is_well_formed() {
        violations.push(Violation::ConfigurationError {
            scope: scope.to_string(),
            detail: format!("min ({}) is greater than max ({})", bounds.min, bounds.max),
        });
    }
}

/// Skill settings no selection could satisfy.
fn check_skill_config(doc: &ResumeDocument, violations: &mut Vec<Violation>) {
    let categories: BTreeSet<&str> = doc
        .config
        .skills_per_category
        .keys()
        .chain(doc.skills.mandatory.keys())
        .map(String::as_str)
        .collect();

    for category in categories {
        let scope = format!("skills.{category}");
        let items = doc.skills.items.get(category).map_or(&[][..], Vec::as_slice);
        let mandatory = doc.skills.mandatory_for(category);

        if let Some(bounds) = doc.config.skills_per_category.get(category) {
            if bounds.min > items.len() {
                violations.push(Violation::ConfigurationError {
                    scope: scope.clone(),
                    detail: format!(
                        "min skills ({}) exceeds available skills ({})",
                        bounds.min,
                        items.len()
                    ),
                });
            }
            if mandatory.len() > bounds.max {
                violations.push(Violation::ConfigurationError {
                    scope: scope.clone(),
                    detail: format!(
                        "{} mandatory skills exceed max skills ({})",
                        mandatory.len(),
                        bounds.max
                    ),
                });
            }
        }

        for skill in mandatory {
            if !items.contains(skill) {
                violations.push(Violation::ConfigurationError {
                    scope: scope.clone(),
                    detail: format!("mandatory skill '{skill}' is not listed in the category"),
                });
            }
        }
    }
}

fn check_total_bullets(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    let bounds = doc.config.bullets.bounds();
    let total = selection.total_bullets();
    if !bounds.contains(total) {
        violations.push(Violation::BulletCountViolation {
            total,
            min: bounds.min,
            max: bounds.max,
        });
    }
}

fn check_mandatory_companies(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    for company in doc.companies.iter().filter(|c| c.mandatory) {
        if selection.company(&company.id).is_none() {
            violations.push(Violation::MissingMandatoryCompany {
                company_id: company.id.clone(),
            });
        }
    }
}

fn check_selected_companies(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    let mut seen_companies = HashSet::new();
    for selected in &selection.companies {
        let Some(company) = doc.company(&selected.id) else {
            violations.push(Violation::UnknownCompany {
                company_id: selected.id.clone(),
            });
            continue;
        };
        if !seen_companies.insert(company.id.as_str()) {
            violations.push(Violation::DuplicateCompany {
                company_id: company.id.clone(),
            });
            continue;
        }

        let bounds = company.bullet_constraints;
        let count = selected.bullets.len();
        if !bounds.contains(count) {
            violations.push(Violation::CompanyBulletRangeViolation {
                company_id: company.id.clone(),
                count,
                min: bounds.min,
                max: bounds.max,
            });
        }

        for bullet in company.mandatory_bullets() {
            if !selected.has_bullet(&bullet.text) {
                violations.push(Violation::MissingMandatoryBullet {
                    company_id: company.id.clone(),
                    bullet_text: bullet.text.clone(),
                });
            }
        }

        let mut seen_bullets = HashSet::new();
        for bullet in &selected.bullets {
            if company.bullet(&bullet.text).is_none() {
                violations.push(Violation::UnknownBullet {
                    company_id: company.id.clone(),
                    bullet_text: bullet.text.clone(),
                });
            } else if !seen_bullets.insert(bullet.text.trim()) {
                violations.push(Violation::DuplicateBullet {
                    company_id: company.id.clone(),
                    bullet_text: bullet.text.trim().to_string(),
                });
            }
        }
    }
}

fn check_skills(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    let categories: BTreeSet<&str> = doc
        .config
        .skills_per_category
        .keys()
        .chain(doc.skills.mandatory.keys())
        .map(String::as_str)
        .collect();

    for category in categories {
        if let Some(bounds) = doc.config.skills_per_category.get(category) {
            let count = selection.skill_count(category);
            if !bounds.contains(count) {
                violations.push(Violation::SkillRangeViolation {
                    category: category.to_string(),
                    count,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }

        let selected = selection.skills.get(category);
        for skill in doc.skills.mandatory_for(category) {
            let present = selected.is_some_and(|items| items.iter().any(|s| s == skill));
            if !present {
                violations.push(Violation::MissingMandatorySkill {
                    category: category.to_string(),
                    skill: skill.clone(),
                });
            }
        }
    }

    for (category, selected) in &selection.skills {
        let Some(items) = doc.skills.items.get(category) else {
            violations.push(Violation::UnknownSkillCategory {
                category: category.clone(),
            });
            continue;
        };

        let mut seen = HashSet::new();
        for skill in selected {
            if !items.contains(skill) {
                violations.push(Violation::UnknownSkill {
                    category: category.clone(),
                    skill: skill.clone(),
                });
            } else if !seen.insert(skill.as_str()) {
                violations.push(Violation::DuplicateSkill {
                    category: category.clone(),
                    skill: skill.clone(),
                });
            }
        }
    }
}

fn check_projects(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    let bounds = doc.config.projects;
    let count = selection.projects.len();
    if !bounds.contains(count) {
        violations.push(Violation::ProjectCountViolation {
            count,
            min: bounds.min,
            max: bounds.max,
        });
    }

    let mut seen = HashSet::new();
    for project in &selection.projects {
        if doc.project(&project.id).is_none() {
            violations.push(Violation::UnknownProject {
                project_id: project.id.clone(),
            });
        } else if !seen.insert(project.id.as_str()) {
            violations.push(Violation::DuplicateProject {
                project_id: project.id.clone(),
            });
        }
    }
}

fn check_summary(
    doc: &ResumeDocument,
    selection: &Selection,
    violations: &mut Vec<Violation>,
) {
    let keys: Vec<String> = selection.summaries.keys().cloned().collect();
    let valid = keys.len() == 1 && doc.summaries.contains_key(&keys[0]);
    if !valid {
        violations.push(Violation::InvalidSummaryVariant { selected: keys });
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
