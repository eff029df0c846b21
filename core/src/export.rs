//! Delimited-text and JSON export of a generated dataset.
//!
//! CSV columns follow the visit record field names. Missing values are
//! written as `NA`. Floats use Rust's shortest round-trip formatting, so
//! the same dataset always produces the same bytes.

use crate::{dataset::Dataset, error::GenResult};
use std::io::Write;

pub const VISIT_COLUMNS: [&str; 9] = [
    "subject_id",
    "appointment_index",
    "gender",
    "gap_days",
    "elapsed_day",
    "attended",
    "attended_count_so_far",
    "total_attended",
    "measured_value",
];

pub const PROFILE_COLUMNS: [&str; 3] = ["id", "total_visits", "gender"];

const MISSING: &str = "NA";

/// Write the visits table as CSV. Gender and attended are 0/1 indicators.
pub fn write_visits_csv<W: Write>(dataset: &Dataset, out: &mut W) -> GenResult<()> {
    writeln!(out, "{}", VISIT_COLUMNS.join(","))?;
    for v in &dataset.visits {
        let value = v
            .measured_value
            .map(|x| x.to_string())
            .unwrap_or_else(|| MISSING.to_string());
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            v.subject_id,
            v.appointment_index,
            v.gender.indicator(),
            v.gap_days,
            v.elapsed_day,
            u8::from(v.attended),
            v.attended_count_so_far,
            v.total_attended,
            value
        )?;
    }
    Ok(())
}

pub fn write_profiles_csv<W: Write>(dataset: &Dataset, out: &mut W) -> GenResult<()> {
    writeln!(out, "{}", PROFILE_COLUMNS.join(","))?;
    for p in &dataset.profiles {
        writeln!(out, "{},{},{}", p.id, p.total_visits, p.gender.indicator())?;
    }
    Ok(())
}

/// Measured points as a JSON array of
/// `{subject_id, sex, elapsed_day, measured_value}` objects.
pub fn write_points_json<W: Write>(dataset: &Dataset, out: &mut W) -> GenResult<()> {
    serde_json::to_writer_pretty(&mut *out, &dataset.measured_points())?;
    writeln!(out)?;
    Ok(())
}

pub fn visits_csv_string(dataset: &Dataset) -> GenResult<String> {
    let mut buf = Vec::new();
    write_visits_csv(dataset, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
