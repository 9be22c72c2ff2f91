//! Record types and table definitions for crowdsourced district ideas

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored in place of a missing author name ("name not given")
pub const ANONYMOUS_AUTHOR: &str = "ไม่ระบุชื่อ";

/// A stored idea. The `text` field is what the word cloud is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub district: String,
    pub province: String,
    #[serde(rename = "idea")]
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub approved: bool,
}

/// Inbound idea form, as sent by the dashboard sidebar
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubmission {
    pub district: String,
    #[serde(default)]
    pub province: Option<String>,
    pub idea: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// A trimmed submission that passed validation
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ValidatedSubmission {
    #[validate(length(min = 1))]
    pub district: String,
    pub province: String,
    #[validate(length(min = 1))]
    pub idea: String,
    pub author: String,
}

impl NewSubmission {
    pub fn new(district: impl Into<String>, idea: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            idea: idea.into(),
            ..Self::default()
        }
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Trim every field, fill defaults, and reject blank district or idea
    pub fn validated(self) -> anyhow::Result<ValidatedSubmission> {
        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string();

        let submission = ValidatedSubmission {
            district: self.district.trim().to_string(),
            province: self.province.as_deref().map(str::trim).unwrap_or_default().to_string(),
            idea: self.idea.trim().to_string(),
            author,
        };

        submission
            .validate()
            .map_err(|e| anyhow!("District and idea are required: {}", e))?;
        Ok(submission)
    }
}

/// Per-district idea totals for the district overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictSummary {
    pub district: String,
    pub province: String,
    pub idea_count: i64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub total_ideas: i64,
    pub approved_ideas: i64,
    pub total_districts: i64,
}

pub const SCHEMA_SQL: &str = "
-- Crowdsourced ideas
CREATE TABLE IF NOT EXISTS district_ideas (
    id TEXT PRIMARY KEY,
    district TEXT NOT NULL,
    province TEXT NOT NULL DEFAULT '',
    idea TEXT NOT NULL,
    author TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    approved BOOLEAN NOT NULL DEFAULT TRUE
);
-- Indexes for district lookups
CREATE INDEX IF NOT EXISTS idx_ideas_district ON district_ideas (district, approved);
CREATE INDEX IF NOT EXISTS idx_ideas_timestamp ON district_ideas (timestamp);
";
