//! Application tracking: a per-user log of where tailored resumes were sent,
//! with simple response-rate stats.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::store::ResumeStore;

pub mod handlers;

pub const APPLICATIONS_FILE: &str = "applications.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: u32,
    pub company_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub heard_back: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub avg_per_day: f64,
    pub avg_per_week: f64,
    pub heard_back_count: usize,
    /// Percentage, 0 to 100.
    pub heard_back_rate: f64,
}

/// Computes totals and rates over the span from earliest to latest application.
///
/// The span is inclusive, so a single day counts as 1 day (1/7 week).
pub fn calculate_stats(applications: &[ApplicationRecord]) -> ApplicationStats {
    let (Some(earliest), Some(latest)) = (
        applications.iter().map(|a| a.date).min(),
        applications.iter().map(|a| a.date).max(),
    ) else {
        return ApplicationStats {
            total: 0,
            avg_per_day: 0.0,
            avg_per_week: 0.0,
            heard_back_count: 0,
            heard_back_rate: 0.0,
        };
    };

    let total = applications.len();
    let heard_back_count = applications.iter().filter(|a| a.heard_back).count();
    let days_span = ((latest - earliest).num_days() + 1) as f64;
    let weeks_span = days_span / 7.0;

    ApplicationStats {
        total,
        avg_per_day: round_to(total as f64 / days_span, 2),
        avg_per_week: round_to(total as f64 / weeks_span, 2),
        heard_back_count,
        heard_back_rate: round_to(heard_back_count as f64 / total as f64 * 100.0, 1),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub async fn list_applications(
    store: &ResumeStore,
    user: &str,
) -> Result<Vec<ApplicationRecord>, AppError> {
    Ok(store
        .read_user_file(user, APPLICATIONS_FILE)
        .await?
        .unwrap_or_default())
}

/// Appends an application dated today and returns it.
pub async fn record_application(
    store: &ResumeStore,
    user: &str,
    company_name: &str,
    job_description: &str,
) -> Result<ApplicationRecord, AppError> {
    let _guard = store.write_lock().await;
    let mut applications = list_applications(store, user).await?;

    let record = ApplicationRecord {
        id: applications.iter().map(|a| a.id).max().unwrap_or(0) + 1,
        company_name: company_name.trim().to_string(),
        date: Local::now().date_naive(),
        job_description: job_description.to_string(),
        heard_back: false,
    };
    applications.push(record.clone());
    store
        .write_user_file(user, APPLICATIONS_FILE, &applications)
        .await?;

    info!(
        "Recorded application {} to {} for user {user}",
        record.id, record.company_name
    );
    Ok(record)
}

pub async fn update_heard_back(
    store: &ResumeStore,
    user: &str,
    id: u32,
    heard_back: bool,
) -> Result<ApplicationRecord, AppError> {
    let _guard = store.write_lock().await;
    let mut applications = list_applications(store, user).await?;

    let record = applications
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    record.heard_back = heard_back;
    let updated = record.clone();

    store
        .write_user_file(user, APPLICATIONS_FILE, &applications)
        .await?;
    Ok(updated)
}
