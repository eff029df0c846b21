//! Stage 1: one profile per subject.

use crate::{
    config::GeneratorConfig,
    error::{GenError, GenResult},
    rng::CohortRng,
    types::{Gender, SubjectId},
};
use serde::{Deserialize, Serialize};

/// Upper bound on scheduled visits for one subject. Draws above it are
/// clamped to it. Only reachable with a vanishing `visit_rate`.
pub const MAX_VISITS_PER_SUBJECT: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub id: SubjectId,
    pub total_visits: u32,
    pub gender: Gender,
}

/// Draw every subject's profile, in subject-index order.
/// Each subject draws its visit count, then its gender.
pub fn generate_profiles(
    config: &GeneratorConfig,
    rng: &mut CohortRng,
) -> GenResult<Vec<SubjectProfile>> {
    let n_subjects =
        SubjectId::try_from(config.n_subjects).map_err(|_| GenError::InvalidParameter {
            name: "n_subjects",
            value: config.n_subjects.to_string(),
            reason: "subject ids must fit in 32 bits",
        })?;
    let mut profiles = Vec::with_capacity(config.n_subjects);
    let mut clamped = 0usize;

    for id in 1..=n_subjects {
        let (total_visits, was_clamped) = draw_total_visits(config.visit_rate, rng)?;
        clamped += usize::from(was_clamped);
        let gender = if rng.chance(config.p_male) {
            Gender::Male
        } else {
            Gender::Female
        };
        profiles.push(SubjectProfile {
            id,
            total_visits,
            gender,
        });
    }

    if clamped > 0 {
        log::warn!(
            "{}: {clamped} of {} subjects drew more than {MAX_VISITS_PER_SUBJECT} visits \
             and were clamped (visit_rate = {})",
            rng.name,
            profiles.len(),
            config.visit_rate
        );
    }
    log::debug!(
        "{}: profile stage drew {} subjects",
        rng.name,
        profiles.len()
    );
    Ok(profiles)
}

/// ceil(Exponential(rate)), floored at 1 and clamped at MAX_VISITS_PER_SUBJECT.
/// The flag reports whether the clamp applied.
fn draw_total_visits(rate: f64, rng: &mut CohortRng) -> GenResult<(u32, bool)> {
    let raw = rng.exponential(rate)?.ceil();
    if raw > MAX_VISITS_PER_SUBJECT as f64 {
        Ok((MAX_VISITS_PER_SUBJECT, true))
    } else {
        Ok(((raw as u32).max(1), false))
    }
}
