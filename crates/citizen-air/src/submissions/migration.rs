//! Database migration system

use rusqlite::{Connection, Result};
use tracing::{info, error};

use crate::submissions::schema::{self, DatabaseStats};

/// Manages schema migrations for the idea database
pub struct MigrationManager<'a> {
    conn: &'a mut Connection,
}

impl<'a> MigrationManager<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Create the version table and apply anything newer than the recorded version
    pub fn initialize_database(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        let current_version = self.current_version()?;
        info!("Current idea database schema version: {}", current_version);

        self.apply_migrations(current_version)
    }

    pub fn current_version(&self) -> Result<i32> {
        self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }

    fn apply_migrations(&mut self, current_version: i32) -> Result<()> {
        for (version, migration_sql) in get_migrations() {
            if version <= current_version {
                continue;
            }
            info!("Applying migration {}...", version);

            let tx = self.conn.transaction()?;
            if let Err(e) = tx.execute_batch(migration_sql) {
                error!("Failed to apply migration {}: {}", version, e);
                return Err(e);
            }
            tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
            tx.commit()?;

            info!("Migration {} applied successfully", version);
        }
        Ok(())
    }
}

/// Ordered list of (version, sql)
fn get_migrations() -> Vec<(i32, &'static str)> {
    vec![(1, schema::SCHEMA_SQL)]
}

pub fn get_database_stats(conn: &Connection) -> Result<DatabaseStats> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN approved THEN 1 ELSE 0 END), 0),
                COUNT(DISTINCT district)
         FROM district_ideas",
        [],
        |row| {
            Ok(DatabaseStats {
                total_ideas: row.get(0)?,
                approved_ideas: row.get(1)?,
                total_districts: row.get(2)?,
            })
        },
    )
}
