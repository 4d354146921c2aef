//! Normalization of older on-disk resume shapes.
//!
//! Runs once, at deserialization time, so the rest of the crate only ever sees
//! the current shapes:
//! - `static_info.linkedin / github / portfolio / leetcode` -> `static_info.links`
//! - `summaries` as a list of `{id, label, text}` -> map keyed by `id`

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::resume::{Link, StaticInfo};

/// Legacy link fields, in the order they are emitted into `links`.
const LEGACY_LINKS: [(&str, &str, &str); 4] = [
    ("linkedin", "LinkedIn", "linkedin"),
    ("github", "GitHub", "github"),
    ("portfolio", "Portfolio", "web"),
    ("leetcode", "LeetCode", "code"),
];

/// Wire form of `static_info` accepting both link shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStaticInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub links: Option<Vec<Link>>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub leetcode: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawStaticInfo {
    fn legacy_value(&self, field: &str) -> Option<&str> {
        let value = match field {
            "linkedin" => self.linkedin.as_deref(),
            "github" => self.github.as_deref(),
            "portfolio" => self.portfolio.as_deref(),
            "leetcode" => self.leetcode.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl From<RawStaticInfo> for StaticInfo {
    fn from(raw: RawStaticInfo) -> Self {
        normalize_links(raw)
    }
}

/// Converts a raw `static_info` into the `links` sequence form.
///
/// A document that already has a `links` array keeps it untouched, and any
/// leftover legacy fields are passed through in `extra`. Otherwise the legacy
/// fields are converted (empty values skipped) and dropped.
pub fn normalize_links(raw: RawStaticInfo) -> StaticInfo {
    let mut extra = raw.extra.clone();

    let links = match raw.links.clone() {
        Some(links) => {
            for (field, _, _) in LEGACY_LINKS {
                if let Some(value) = raw.legacy_value(field) {
                    extra.insert(field.to_string(), Value::String(value.to_string()));
                }
            }
            links
        }
        None => LEGACY_LINKS
            .iter()
            .filter_map(|(field, name, icon)| {
                raw.legacy_value(field).map(|url| Link {
                    name: name.to_string(),
                    url: url.to_string(),
                    icon: icon.to_string(),
                })
            })
            .collect(),
    };

    StaticInfo {
        name: raw.name,
        address: raw.address,
        phone: raw.phone,
        email: raw.email,
        links,
        extra,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SummariesRepr {
    Map(BTreeMap<String, String>),
    List(Vec<SummaryEntry>),
}

#[derive(Deserialize)]
struct SummaryEntry {
    id: String,
    #[serde(default)]
    text: String,
}

/// Accepts `summaries` either as `{key: text}` or as `[{id, label, text}]`.
pub fn deserialize_summaries<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SummariesRepr::deserialize(deserializer)? {
        SummariesRepr::Map(map) => map,
        SummariesRepr::List(entries) => entries.into_iter().map(|e| (e.id, e.text)).collect(),
    })
}
