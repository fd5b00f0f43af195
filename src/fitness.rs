//! Composite timetable fitness.
//!
//! ```text
//! fitness = α·hard_penalty + β·soft_score + γ·fairness_score
//! ```
//!
//! with `α = 1000`, `β = 10`, `γ = 5`. A single professor double-booking
//! costs `−10 000 × 1000`, which dwarfs any achievable soft or fairness
//! gain, so hard constraints dominate in practice while fitness stays finite.
//!
//! Room collisions are not part of the hard penalty. They are resolved by
//! the [`reassign`](crate::reassign) pass after the search.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fairness::FairnessSnapshot;
use crate::model::{Chromosome, ConstraintKind, TimetableInput};

/// Penalty per repeated (day, hour, professor) key.
pub const PENALTY_PER_VIOLATION: i64 = 10_000;

/// Reward when an AC-preferring session sits in an AC room.
pub const AC_MATCH_REWARD: i64 = 100;
/// Penalty when an AC-preferring session sits in a non-AC room.
pub const AC_MISS_PENALTY: i64 = -50;
/// Bonus for a one-hour session.
pub const ONE_HOUR_BONUS: i64 = 30;
/// Bonus for a two-hour session.
pub const TWO_HOUR_BONUS: i64 = 10;
/// Reward when a session starts in a preferred window.
pub const PREFERRED_WINDOW_REWARD: i64 = 50;
/// Penalty when a session starts in an unavailability window.
pub const UNAVAILABLE_WINDOW_PENALTY: i64 = -100;

/// Weights of the three fitness terms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitnessWeights {
    /// Weight of the hard-constraint penalty (α).
    pub hard: f64,
    /// Weight of the soft-constraint score (β).
    pub soft: f64,
    /// Weight of the fairness score (γ).
    pub fairness: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            hard: 1000.0,
            soft: 10.0,
            fairness: 5.0,
        }
    }
}

/// Full breakdown of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// Weighted composite (higher is better).
    pub fitness: f64,
    /// Number of repeated (day, hour, professor) keys.
    pub hard_violations: usize,
    /// Soft-constraint score.
    pub soft_score: i64,
    /// Fairness coefficients.
    pub fairness: FairnessSnapshot,
}

impl Evaluation {
    /// Hard-constraint penalty, `−violations × 10 000`.
    pub fn hard_penalty(&self) -> i64 {
        -(self.hard_violations as i64) * PENALTY_PER_VIOLATION
    }
}

/// Counts professor double-bookings.
///
/// Every clock hour a gene occupies contributes a (day, hour, professor)
/// key; each key seen before counts as one violation.
pub fn hard_violations(chromosome: &Chromosome) -> usize {
    let mut seen = HashSet::new();
    let mut violations = 0;
    for gene in chromosome.genes() {
        for hour in gene.hours() {
            if !seen.insert((gene.day, hour, gene.professor_id)) {
                violations += 1;
            }
        }
    }
    violations
}

/// Hard-constraint penalty: `−violations × 10 000`.
pub fn hard_penalty(chromosome: &Chromosome) -> i64 {
    -(hard_violations(chromosome) as i64) * PENALTY_PER_VIOLATION
}

/// Soft-constraint score.
///
/// - AC-preferring session in an AC room: +100, otherwise −50
/// - Session length: +30 for 1h, +10 for 2h, 0 for longer
/// - Per matching professor constraint: +50 preferred, −100 unavailable
pub fn soft_score(input: &TimetableInput, chromosome: &Chromosome) -> i64 {
    let mut score = 0;
    for (spec, gene) in chromosome.with_specs(input.classes()) {
        if spec.prefers_ac {
            if let Some(room) = input.room(gene.room_id) {
                score += if room.has_ac {
                    AC_MATCH_REWARD
                } else {
                    AC_MISS_PENALTY
                };
            }
        }

        score += match gene.duration() {
            1 => ONE_HOUR_BONUS,
            2 => TWO_HOUR_BONUS,
            _ => 0,
        };

        for constraint in input.constraints().iter().filter(|c| c.matches(gene)) {
            score += match constraint.kind {
                ConstraintKind::Preferred => PREFERRED_WINDOW_REWARD,
                ConstraintKind::Unavailable => UNAVAILABLE_WINDOW_PENALTY,
            };
        }
    }
    score
}

/// Whether the chromosome is fully conflict-free for early termination.
///
/// Requires zero hard violations and pairwise distinct
/// (day, start, professor) and (day, start, room) keys.
pub fn is_conflict_free(chromosome: &Chromosome) -> bool {
    if hard_violations(chromosome) != 0 {
        return false;
    }
    let n = chromosome.len();
    let by_professor: HashSet<_> = chromosome
        .genes()
        .iter()
        .map(|g| (g.day, g.start_hour, g.professor_id))
        .collect();
    let by_room: HashSet<_> = chromosome
        .genes()
        .iter()
        .map(|g| (g.day, g.start_hour, g.room_id))
        .collect();
    by_professor.len() == n && by_room.len() == n
}

/// Evaluates a chromosome.
pub fn evaluate(
    input: &TimetableInput,
    chromosome: &Chromosome,
    weights: &FitnessWeights,
) -> Evaluation {
    let hard_violations = hard_violations(chromosome);
    let soft_score = soft_score(input, chromosome);
    let fairness = FairnessSnapshot::measure(input, chromosome);

    let hard_penalty = -(hard_violations as i64) * PENALTY_PER_VIOLATION;
    let fitness = weights.hard * hard_penalty as f64
        + weights.soft * soft_score as f64
        + weights.fairness * fairness.score();

    Evaluation {
        fitness,
        hard_violations,
        soft_score,
        fairness,
    }
}
