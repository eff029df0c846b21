//! The repeated-measures generator.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Validate the config. Nothing is drawn from an invalid config.
//!   1. Profile stage   (profile_stage.rs)
//!   2. Visit stage     (visit_stage.rs)
//!
//! RULES:
//!   - Both stages share one RNG stream, handed in explicitly.
//!   - The profile stage finishes before the visit stage draws anything.
//!   - Output is either a complete Dataset or an error, never a partial table.

use crate::{
    config::GeneratorConfig,
    dataset::Dataset,
    error::GenResult,
    profile_stage::generate_profiles,
    rng::CohortRng,
    visit_stage::expand_visits,
};

/// Generate a dataset from `config`, seeding a fresh stream from `config.seed`.
pub fn generate(config: &GeneratorConfig) -> GenResult<Dataset> {
    let mut rng = CohortRng::new(config.seed);
    generate_with_rng(config, &mut rng)
}

/// Generate a dataset drawing from a caller-supplied stream.
/// `config.seed` is ignored; the stream's position decides the output.
pub fn generate_with_rng(config: &GeneratorConfig, rng: &mut CohortRng) -> GenResult<Dataset> {
    config.validate()?;

    let profiles = generate_profiles(config, rng)?;
    let visits = expand_visits(config, &profiles, rng);
    let dataset = Dataset { profiles, visits };

    let summary = dataset.summary();
    log::info!(
        "generated {} subjects, {} visits ({} attended, {} no-shows)",
        summary.subjects,
        summary.visits,
        summary.attended,
        summary.no_shows
    );
    Ok(dataset)
}
