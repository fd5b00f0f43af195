//! Distribution fairness via the Gini coefficient.
//!
//! A timetable is scored on three distributions:
//!
//! | Dimension | Values |
//! |-----------|--------|
//! | Workload | teaching hours per professor |
//! | Room usage | sessions per used room |
//! | AC access | AC-room hours per professor with at least one AC-preferring session |
//!
//! # Reference
//! Gini (1912), "Variabilità e mutabilità"

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{Chromosome, ProfessorId, RoomId, TimetableInput};

/// Gini coefficient of a distribution of nonnegative values.
///
/// Returns `0.0` for empty or all-zero input (perfect equality) and
/// otherwise a value in `[0, 1]`, where 1 means one entry holds everything.
///
/// With values sorted ascending and 1-based rank `i`:
///
/// ```text
/// G = 2·Σ(i·v_i) / (n·Σv_i) − (n+1)/n
/// ```
///
/// The result is clamped to `[0, 1]` to absorb floating-point overshoot.
///
/// # Examples
///
/// ```
/// use u_timetable::fairness::gini;
///
/// assert_eq!(gini(&[]), 0.0);
/// assert_eq!(gini(&[3.0, 3.0, 3.0]), 0.0);
/// assert!(gini(&[0.0, 0.0, 0.0, 0.0, 100.0]) > 0.7);
/// ```
pub fn gini(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total <= 0.0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum();

    let g = (2.0 * weighted) / (n * total) - (n + 1.0) / n;
    g.clamp(0.0, 1.0)
}

/// Gini coefficients for the three fairness dimensions of one timetable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FairnessSnapshot {
    /// Inequality of teaching hours across professors.
    pub workload: f64,
    /// Inequality of session counts across used rooms.
    pub room_usage: f64,
    /// Inequality of AC hours across AC-preferring professors.
    pub ac_access: f64,
}

impl FairnessSnapshot {
    /// Measures a chromosome against its input.
    ///
    /// Genes are mapped to class specs by position only.
    pub fn measure(input: &TimetableInput, chromosome: &Chromosome) -> Self {
        let mut professor_hours: BTreeMap<ProfessorId, f64> = BTreeMap::new();
        let mut room_usage: BTreeMap<RoomId, f64> = BTreeMap::new();
        let mut ac_hours: BTreeMap<ProfessorId, f64> = BTreeMap::new();

        for (spec, gene) in chromosome.with_specs(input.classes()) {
            let hours = f64::from(gene.duration());
            *professor_hours.entry(gene.professor_id).or_default() += hours;
            *room_usage.entry(gene.room_id).or_default() += 1.0;

            if spec.prefers_ac {
                let entry = ac_hours.entry(gene.professor_id).or_default();
                if input.is_ac_room(gene.room_id) {
                    *entry += hours;
                }
            }
        }

        Self::from_distributions(
            &professor_hours.into_values().collect::<Vec<_>>(),
            &room_usage.into_values().collect::<Vec<_>>(),
            &ac_hours.into_values().collect::<Vec<_>>(),
        )
    }

    /// Builds a snapshot from raw per-entity distributions.
    pub fn from_distributions(workload: &[f64], room_usage: &[f64], ac_access: &[f64]) -> Self {
        Self {
            workload: gini(workload),
            room_usage: gini(room_usage),
            ac_access: gini(ac_access),
        }
    }

    /// Mean of the three coefficients.
    pub fn mean(&self) -> f64 {
        (self.workload + self.room_usage + self.ac_access) / 3.0
    }

    /// Fairness score in `[0, 100]`: `(1 − mean) × 100`, higher is fairer.
    pub fn score(&self) -> f64 {
        (1.0 - self.mean()) * 100.0
    }

    /// Qualitative rating of the mean coefficient.
    pub fn rating(&self) -> FairnessRating {
        FairnessRating::from_gini(self.mean())
    }
}

/// Qualitative reading of a Gini coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FairnessRating {
    /// Below 0.2.
    Excellent,
    /// 0.2 up to 0.3.
    Good,
    /// 0.3 up to 0.4.
    Moderate,
    /// 0.4 and above.
    NeedsImprovement,
}

impl FairnessRating {
    /// Classifies a coefficient.
    pub fn from_gini(g: f64) -> Self {
        if g < 0.2 {
            FairnessRating::Excellent
        } else if g < 0.3 {
            FairnessRating::Good
        } else if g < 0.4 {
            FairnessRating::Moderate
        } else {
            FairnessRating::NeedsImprovement
        }
    }
}

impl std::fmt::Display for FairnessRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FairnessRating::Excellent => "Excellent",
            FairnessRating::Good => "Good",
            FairnessRating::Moderate => "Moderate",
            FairnessRating::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(label)
    }
}
