use super::{u32_column, CohortStore};
use crate::{error::GenResult, profile_stage::SubjectProfile, types::Gender};
use rusqlite::{params, Connection, Row};

impl CohortStore {
    // ── Subject ───────────────────────────────────────────────────

    pub(super) fn insert_subject(
        conn: &Connection,
        run_id: &str,
        p: &SubjectProfile,
    ) -> GenResult<()> {
        conn.prepare_cached(
            "INSERT INTO subject (run_id, subject_id, total_visits, gender)
             VALUES (?1, ?2, ?3, ?4)",
        )?
        .execute(params![
            run_id,
            p.id as i64,
            p.total_visits as i64,
            p.gender.indicator() as i64
        ])?;
        Ok(())
    }

    pub fn subjects(&self, run_id: &str) -> GenResult<Vec<SubjectProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, total_visits, gender
             FROM subject WHERE run_id = ?1
             ORDER BY subject_id ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(SubjectProfile {
                id: u32_column(row, 0)?,
                total_visits: u32_column(row, 1)?,
                gender: gender_column(row, 2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn subject_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM subject WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

/// Read a 0/1 gender indicator column.
pub(super) fn gender_column(row: &Row, idx: usize) -> rusqlite::Result<Gender> {
    let raw: i64 = row.get(idx)?;
    u8::try_from(raw)
        .ok()
        .and_then(Gender::from_indicator)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}
