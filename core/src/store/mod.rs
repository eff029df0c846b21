//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Generation never touches it; callers copy a finished Dataset in.

use crate::{
    config::GeneratorConfig,
    error::{GenError, GenResult},
};
use rusqlite::{params, Connection, OptionalExtension, Row};

mod subject;
mod visit;

pub struct CohortStore {
    conn: Connection,
}

impl CohortStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> GenResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GenResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GenResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_cohort.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        config: &GeneratorConfig,
        version: &str,
        created_at: &str,
    ) -> GenResult<()> {
        let config_json = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, config_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, config.seed as i64, version, config_json, created_at],
        )?;
        Ok(())
    }

    pub fn run_exists(&self, run_id: &str) -> GenResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM run WHERE run_id = ?1",
                params![run_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// The config a run was generated with.
    pub fn run_config(&self, run_id: &str) -> GenResult<GeneratorConfig> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT config_json FROM run WHERE run_id = ?1",
                params![run_id],
                |row| row.get(0),
            )
            .optional()?;
        let json = json.ok_or_else(|| GenError::RunNotFound {
            run_id: run_id.to_string(),
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    // ── Dataset ────────────────────────────────────────────────

    /// Persist both tables of `dataset` under `run_id` in one transaction.
    pub fn save_dataset(&self, run_id: &str, dataset: &crate::dataset::Dataset) -> GenResult<()> {
        if !self.run_exists(run_id)? {
            return Err(GenError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let tx = self.conn.unchecked_transaction()?;
        for profile in &dataset.profiles {
            Self::insert_subject(&tx, run_id, profile)?;
        }
        for visit in &dataset.visits {
            Self::insert_visit(&tx, run_id, visit)?;
        }
        tx.commit()?;
        log::debug!(
            "store: saved {} subjects, {} visits for run {run_id}",
            dataset.profiles.len(),
            dataset.visits.len()
        );
        Ok(())
    }

    pub fn load_dataset(&self, run_id: &str) -> GenResult<crate::dataset::Dataset> {
        if !self.run_exists(run_id)? {
            return Err(GenError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        Ok(crate::dataset::Dataset {
            profiles: self.subjects(run_id)?,
            visits: self.visits(run_id)?,
        })
    }
}

/// Read an INTEGER column that must fit in a u32.
fn u32_column(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}
