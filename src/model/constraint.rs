//! Professor time preferences and unavailability windows.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Day, Gene, Hour, ProfessorId};

/// How a constraint window affects the soft score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstraintKind {
    /// The professor would like to teach in this window.
    Preferred,
    /// The professor should not teach in this window.
    Unavailable,
}

/// A time window attached to one professor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfessorConstraint {
    /// Constrained professor.
    pub professor_id: ProfessorId,
    /// Preference or unavailability.
    pub kind: ConstraintKind,
    /// Day of week.
    pub day: Day,
    /// Window start (inclusive).
    pub start_hour: Hour,
    /// Window end (exclusive).
    pub end_hour: Hour,
}

impl ProfessorConstraint {
    /// A preferred teaching window.
    pub fn preferred(professor_id: ProfessorId, day: Day, start_hour: Hour, end_hour: Hour) -> Self {
        Self {
            professor_id,
            kind: ConstraintKind::Preferred,
            day,
            start_hour,
            end_hour,
        }
    }

    /// An unavailability window.
    pub fn unavailable(
        professor_id: ProfessorId,
        day: Day,
        start_hour: Hour,
        end_hour: Hour,
    ) -> Self {
        Self {
            professor_id,
            kind: ConstraintKind::Unavailable,
            day,
            start_hour,
            end_hour,
        }
    }

    /// Whether `gene` starts inside this window for the same professor.
    ///
    /// Only the start hour is tested: a session starting at the last hour
    /// of a window matches even if it runs past the window end.
    pub fn matches(&self, gene: &Gene) -> bool {
        self.professor_id == gene.professor_id
            && self.day == gene.day
            && self.start_hour <= gene.start_hour
            && gene.start_hour < self.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_on_start_hour() {
        let c = ProfessorConstraint::preferred(7, 1, 8, 12);
        assert!(c.matches(&Gene::placed(1, 7, 100, 1, 8, 9)));
        assert!(c.matches(&Gene::placed(1, 7, 100, 1, 11, 14)));
        assert!(!c.matches(&Gene::placed(1, 7, 100, 1, 12, 13)));
        assert!(!c.matches(&Gene::placed(1, 7, 100, 2, 9, 10)));
        assert!(!c.matches(&Gene::placed(1, 8, 100, 1, 9, 10)));
    }
}
