//! Stage 2: expand profiles into one row per scheduled visit and
//! derive the within-subject running columns.

use crate::{
    config::GeneratorConfig,
    profile_stage::SubjectProfile,
    rng::CohortRng,
    types::{Day, Gender, SubjectId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub subject_id: SubjectId,
    /// 1-based position within the subject's schedule.
    pub appointment_index: u32,
    pub gender: Gender,
    pub gap_days: Day,
    pub elapsed_day: Day,
    pub attended: bool,
    pub attended_count_so_far: u32,
    /// Same value on every row of the subject.
    pub total_attended: u32,
    /// None for a no-show.
    pub measured_value: Option<f64>,
}

/// Noise-free value of the model for a subject of `gender` at `elapsed_day`.
pub fn expected_value(config: &GeneratorConfig, gender: Gender, elapsed_day: Day) -> f64 {
    let g = gender.indicator() as f64;
    config.baseline
        + g * config.male_baseline_offset
        + config.slope * elapsed_day
        + g * config.male_slope_offset * elapsed_day
}

/// Expand `profiles` subject-major, drawing gap, attendance and noise row by row.
pub fn expand_visits(
    config: &GeneratorConfig,
    profiles: &[SubjectProfile],
    rng: &mut CohortRng,
) -> Vec<VisitRecord> {
    let total_rows: usize = profiles.iter().map(|p| p.total_visits as usize).sum();
    let mut visits = Vec::with_capacity(total_rows);

    for profile in profiles {
        let first_row = visits.len();
        let mut elapsed_day = 0.0;
        let mut attended_so_far = 0u32;

        for appointment_index in 1..=profile.total_visits {
            let gap_days = rng.uniform(0.0, config.max_gap_days);
            let attended = rng.chance(config.p_attend);

            elapsed_day += gap_days;
            let measured_value = if attended {
                attended_so_far += 1;
                let noise = rng.standard_normal();
                Some(expected_value(config, profile.gender, elapsed_day) + noise)
            } else {
                None
            };

            visits.push(VisitRecord {
                subject_id: profile.id,
                appointment_index,
                gender: profile.gender,
                gap_days,
                elapsed_day,
                attended,
                attended_count_so_far: attended_so_far,
                total_attended: 0,
                measured_value,
            });
        }

        // Broadcast the subject total now that the group is complete.
        for row in &mut visits[first_row..] {
            row.total_attended = attended_so_far;
        }
    }

    log::debug!(
        "{}: visit stage expanded {} rows for {} subjects",
        rng.name,
        visits.len(),
        profiles.len()
    );
    visits
}
