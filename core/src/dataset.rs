//! The generated tables and the views consumers read from them.

use crate::{
    profile_stage::SubjectProfile,
    types::{Day, Gender, SubjectId},
    visit_stage::VisitRecord,
};
use serde::{Deserialize, Serialize};

/// Both tables of one generation run. Never mutated after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub profiles: Vec<SubjectProfile>,
    pub visits: Vec<VisitRecord>,
}

/// One measured visit in tidy long format, ready for a scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPoint {
    pub subject_id: SubjectId,
    pub sex: Gender,
    pub elapsed_day: Day,
    pub measured_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_id: SubjectId,
    pub gender: Gender,
    pub total_visits: u32,
    pub total_attended: u32,
    pub last_elapsed_day: Day,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub subjects: usize,
    pub males: usize,
    pub visits: usize,
    pub attended: usize,
    pub no_shows: usize,
    pub attendance_rate: f64,
}

impl Dataset {
    /// The visits table filtered to attended rows.
    pub fn attended_visits(&self) -> impl Iterator<Item = &VisitRecord> {
        self.visits.iter().filter(|v| v.attended)
    }

    pub fn measured_points(&self) -> Vec<MeasuredPoint> {
        self.visits
            .iter()
            .filter_map(|v| {
                v.measured_value.map(|value| MeasuredPoint {
                    subject_id: v.subject_id,
                    sex: v.gender,
                    elapsed_day: v.elapsed_day,
                    measured_value: value,
                })
            })
            .collect()
    }

    /// Rows of one subject, in appointment order.
    pub fn visits_for(&self, subject_id: SubjectId) -> &[VisitRecord] {
        let start = self.visits.partition_point(|v| v.subject_id < subject_id);
        let end = self.visits.partition_point(|v| v.subject_id <= subject_id);
        &self.visits[start..end]
    }

    pub fn subject_summaries(&self) -> Vec<SubjectSummary> {
        self.profiles
            .iter()
            .map(|p| {
                let rows = self.visits_for(p.id);
                SubjectSummary {
                    subject_id: p.id,
                    gender: p.gender,
                    total_visits: p.total_visits,
                    total_attended: rows.last().map(|v| v.total_attended).unwrap_or(0),
                    last_elapsed_day: rows.last().map(|v| v.elapsed_day).unwrap_or(0.0),
                }
            })
            .collect()
    }

    pub fn summary(&self) -> DatasetSummary {
        let visits = self.visits.len();
        let attended = self.attended_visits().count();
        DatasetSummary {
            subjects: self.profiles.len(),
            males: self.profiles.iter().filter(|p| p.gender == Gender::Male).count(),
            visits,
            attended,
            no_shows: visits - attended,
            attendance_rate: if visits > 0 {
                attended as f64 / visits as f64
            } else {
                0.0
            },
        }
    }
}
