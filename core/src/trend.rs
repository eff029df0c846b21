//! Per-gender least-squares trend of measured value on elapsed day.
//! These are the lines a plot overlays on the scatter of measured points.

use crate::{dataset::MeasuredPoint, types::Gender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub gender: Gender,
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub r_squared: f64,
}

impl TrendFit {
    pub fn predict(&self, elapsed_day: f64) -> f64 {
        self.intercept + self.slope * elapsed_day
    }
}

/// One fit per gender, female first. A gender is skipped when it has
/// fewer than two points or no spread in elapsed day.
pub fn fit_by_gender(points: &[MeasuredPoint]) -> Vec<TrendFit> {
    Gender::ALL
        .iter()
        .filter_map(|&gender| {
            let xy: Vec<(f64, f64)> = points
                .iter()
                .filter(|p| p.sex == gender)
                .map(|p| (p.elapsed_day, p.measured_value))
                .collect();
            let fit = fit_line(&xy).map(|(intercept, slope, r_squared)| TrendFit {
                gender,
                n: xy.len(),
                intercept,
                slope,
                r_squared,
            });
            if fit.is_none() && !xy.is_empty() {
                log::warn!(
                    "trend: cannot fit {} line from {} points",
                    gender.as_str(),
                    xy.len()
                );
            }
            fit
        })
        .collect()
}

/// Ordinary least squares. Returns (intercept, slope, r²).
fn fit_line(xy: &[(f64, f64)]) -> Option<(f64, f64, f64)> {
    if xy.len() < 2 {
        return None;
    }
    let n = xy.len() as f64;
    let mean_x = xy.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = xy.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xy {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // A flat response is explained perfectly by a flat line.
    let r_squared = if syy > 0.0 { (sxy * sxy) / (sxx * syy) } else { 1.0 };
    Some((intercept, slope, r_squared))
}
