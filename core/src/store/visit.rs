use super::{subject::gender_column, u32_column, CohortStore};
use crate::{error::GenResult, visit_stage::VisitRecord};
use rusqlite::{params, Connection};

impl CohortStore {
    // ── Visit ─────────────────────────────────────────────────────

    pub(super) fn insert_visit(conn: &Connection, run_id: &str, v: &VisitRecord) -> GenResult<()> {
        conn.prepare_cached(
            "INSERT INTO visit (
                run_id, subject_id, appointment_index, gender, gap_days, elapsed_day,
                attended, attended_count_so_far, total_attended, measured_value
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?
        .execute(params![
            run_id,
            v.subject_id as i64,
            v.appointment_index as i64,
            v.gender.indicator() as i64,
            v.gap_days,
            v.elapsed_day,
            if v.attended { 1 } else { 0 },
            v.attended_count_so_far as i64,
            v.total_attended as i64,
            v.measured_value,
        ])?;
        Ok(())
    }

    /// All visits of a run in (subject, appointment) order.
    pub fn visits(&self, run_id: &str) -> GenResult<Vec<VisitRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, appointment_index, gender, gap_days, elapsed_day,
                    attended, attended_count_so_far, total_attended, measured_value
             FROM visit WHERE run_id = ?1
             ORDER BY subject_id ASC, appointment_index ASC",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(VisitRecord {
                subject_id: u32_column(row, 0)?,
                appointment_index: u32_column(row, 1)?,
                gender: gender_column(row, 2)?,
                gap_days: row.get(3)?,
                elapsed_day: row.get(4)?,
                attended: row.get::<_, i32>(5)? != 0,
                attended_count_so_far: u32_column(row, 6)?,
                total_attended: u32_column(row, 7)?,
                measured_value: row.get(8)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn visit_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM visit WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn attended_count(&self, run_id: &str) -> GenResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM visit WHERE run_id = ?1 AND attended = 1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
