use crate::submissions::schema::*;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use rusqlite::types::Type;
use uuid::Uuid;
use tracing::{info, debug};
use std::sync::Arc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

/// Fixed-width UTC timestamps so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<Submission> {
    let timestamp: String = row.get(5)?;
    Ok(Submission {
        id: row.get(0)?,
        district: row.get(1)?,
        province: row.get(2)?,
        text: row.get(3)?,
        author: row.get(4)?,
        timestamp: parse_timestamp(5, &timestamp)?,
        approved: row.get(6)?,
    })
}

/// Storage for crowdsourced district ideas
#[derive(Clone)]
pub struct IdeaStore {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl IdeaStore {
    pub fn new(pool: Arc<Pool<SqliteConnectionManager>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> anyhow::Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| anyhow::anyhow!("Failed to get connection from pool: {}", e))
    }

    /// Validate and store a new idea. Ideas are approved on arrival.
    pub fn submit(&self, form: NewSubmission) -> anyhow::Result<Submission> {
        let valid = form.validated()?;
        self.insert(valid, Utc::now())
    }

    fn insert(&self, valid: ValidatedSubmission, timestamp: DateTime<Utc>) -> anyhow::Result<Submission> {
        let id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO district_ideas (id, district, province, idea, author, timestamp, approved)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &id,
                &valid.district,
                &valid.province,
                &valid.idea,
                &valid.author,
                format_timestamp(&timestamp),
                true,
            ],
        )?;

        info!("Stored idea {} for district {}", id, valid.district);
        Ok(Submission {
            id,
            district: valid.district,
            province: valid.province,
            text: valid.idea,
            author: valid.author,
            timestamp,
            approved: true,
        })
    }

    /// Store an idea with an explicit timestamp, used when importing existing records
    pub fn submit_at(&self, form: NewSubmission, timestamp: DateTime<Utc>) -> anyhow::Result<Submission> {
        let valid = form.validated()?;
        self.insert(valid, timestamp)
    }

    /// Approved ideas for one district, newest first
    pub fn ideas_for_district(&self, district: &str) -> anyhow::Result<Vec<Submission>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, district, province, idea, author, timestamp, approved
             FROM district_ideas
             WHERE district = ?1 AND approved = 1
             ORDER BY timestamp DESC, rowid DESC",
        )?;
        let ideas = stmt
            .query_map([district], submission_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Loaded {} approved ideas for district {}", ideas.len(), district);
        Ok(ideas)
    }

    /// Approved idea counts per district, busiest first
    pub fn district_summaries(&self) -> anyhow::Result<Vec<DistrictSummary>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT d.district,
                    (SELECT p.province FROM district_ideas p
                     WHERE p.district = d.district AND p.approved = 1
                     ORDER BY p.rowid ASC LIMIT 1),
                    COUNT(*),
                    MAX(d.timestamp)
             FROM district_ideas d
             WHERE d.approved = 1
             GROUP BY d.district
             ORDER BY COUNT(*) DESC, d.district ASC",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                let last_updated: String = row.get(3)?;
                Ok(DistrictSummary {
                    district: row.get(0)?,
                    province: row.get(1)?,
                    idea_count: row.get(2)?,
                    last_updated: parse_timestamp(3, &last_updated)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    /// Hide or restore an idea. Returns false when no idea has this id.
    pub fn set_approved(&self, id: &str, approved: bool) -> anyhow::Result<bool> {
        let conn = self.get_conn()?;
        let changed = conn.execute(
            "UPDATE district_ideas SET approved = ?1 WHERE id = ?2",
            params![approved, id],
        )?;
        if changed > 0 {
            info!("Idea {} approved = {}", id, approved);
        }
        Ok(changed > 0)
    }
}
