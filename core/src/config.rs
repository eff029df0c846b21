use crate::{
    error::{GenError, GenResult},
    types::{Day, SubjectId},
};
use serde::{Deserialize, Serialize};

/// Largest population whose subject ids fit in a `SubjectId`.
pub const MAX_SUBJECTS: usize = SubjectId::MAX as usize;

/// Parameters of the repeated-measures model.
///
/// Missing fields in a config file fall back to `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub n_subjects: usize,
    /// Rate λ of the exponential draw behind each subject's visit count.
    pub visit_rate: f64,
    pub p_male: f64,
    pub baseline: f64,
    pub male_baseline_offset: f64,
    /// Change in value per elapsed day for female subjects.
    pub slope: f64,
    pub male_slope_offset: f64,
    /// Probability that a scheduled visit produces a measurement.
    pub p_attend: f64,
    pub max_gap_days: Day,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_subjects: 500,
            visit_rate: 0.3,
            p_male: 0.5,
            baseline: 50.0,
            male_baseline_offset: 5.0,
            slope: 0.02,
            male_slope_offset: 0.01,
            p_attend: 0.85,
            max_gap_days: 60.0,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            n_subjects: 50,
            visit_rate: 0.25,
            p_male: 0.5,
            baseline: 100.0,
            male_baseline_offset: 10.0,
            slope: 0.5,
            male_slope_offset: -0.2,
            p_attend: 0.8,
            max_gap_days: 30.0,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject out-of-domain parameters. Runs before any draw is taken.
    pub fn validate(&self) -> GenResult<()> {
        if self.n_subjects < 1 {
            return Err(invalid("n_subjects", self.n_subjects, "must be at least 1"));
        }
        if self.n_subjects > MAX_SUBJECTS {
            return Err(invalid("n_subjects", self.n_subjects, "subject ids must fit in 32 bits"));
        }
        if !(self.visit_rate.is_finite() && self.visit_rate > 0.0) {
            return Err(invalid("visit_rate", self.visit_rate, "must be finite and > 0"));
        }
        check_probability("p_male", self.p_male)?;
        check_probability("p_attend", self.p_attend)?;
        if !(self.max_gap_days.is_finite() && self.max_gap_days >= 0.0) {
            return Err(invalid("max_gap_days", self.max_gap_days, "must be finite and >= 0"));
        }
        for (name, value) in [
            ("baseline", self.baseline),
            ("male_baseline_offset", self.male_baseline_offset),
            ("slope", self.slope),
            ("male_slope_offset", self.male_slope_offset),
        ] {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, p: f64) -> GenResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(name, p, "probability must lie in [0, 1]"))
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> GenError {
    GenError::InvalidParameter {
        name,
        value: value.to_string(),
        reason,
    }
}
