//! Teaching session specification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CourseId, Day, Hour, ProfessorId};
use crate::error::{Result, TimetableError};

/// A fixed day/time taken from a live timetable.
///
/// Only the room of a pinned session is subject to optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinnedSlot {
    /// Day of week.
    pub day: Day,
    /// Start hour (inclusive).
    pub start_hour: Hour,
    /// End hour (exclusive).
    pub end_hour: Hour,
}

/// One teaching session to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassSpec {
    /// Course identifier.
    pub course_id: CourseId,
    /// Course name or subject.
    pub course_name: String,
    /// Professor teaching the session.
    pub professor_id: ProfessorId,
    /// Required duration in hours.
    pub duration: Hour,
    /// Whether the session should be held in an AC room.
    pub prefers_ac: bool,
    /// Fixed day/time, if the session already exists in a live timetable.
    pub pinned: Option<PinnedSlot>,
}

impl ClassSpec {
    /// Creates an unpinned session.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidInput`] if `duration` is zero.
    pub fn new(
        course_id: CourseId,
        course_name: impl Into<String>,
        professor_id: ProfessorId,
        duration: Hour,
    ) -> Result<Self> {
        if duration == 0 {
            return Err(TimetableError::InvalidInput(format!(
                "course {course_id}: duration must be at least one hour"
            )));
        }
        Ok(Self {
            course_id,
            course_name: course_name.into(),
            professor_id,
            duration,
            prefers_ac: false,
            pinned: None,
        })
    }

    /// Creates a session pinned to `day`, `[start_hour, end_hour)`.
    ///
    /// The duration is derived from the pinned interval.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidInput`] unless `end_hour > start_hour`.
    pub fn pinned(
        course_id: CourseId,
        course_name: impl Into<String>,
        professor_id: ProfessorId,
        day: Day,
        start_hour: Hour,
        end_hour: Hour,
    ) -> Result<Self> {
        if end_hour <= start_hour {
            return Err(TimetableError::InvalidInput(format!(
                "course {course_id}: pinned end {end_hour} must be after start {start_hour}"
            )));
        }
        let mut spec = Self::new(course_id, course_name, professor_id, end_hour - start_hour)?;
        spec.pinned = Some(PinnedSlot {
            day,
            start_hour,
            end_hour,
        });
        Ok(spec)
    }

    /// Sets the AC preference.
    pub fn with_ac_preference(mut self, prefers_ac: bool) -> Self {
        self.prefers_ac = prefers_ac;
        self
    }

    /// Whether the day/time of this session is fixed.
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpinned_spec() {
        let spec = ClassSpec::new(1, "Calculus", 10, 2)
            .unwrap()
            .with_ac_preference(true);
        assert_eq!(spec.duration, 2);
        assert!(spec.prefers_ac);
        assert!(!spec.is_pinned());
    }

    #[test]
    fn test_pinned_derives_duration() {
        let spec = ClassSpec::pinned(1, "Physics", 10, 2, 8, 11).unwrap();
        assert_eq!(spec.duration, 3);
        assert_eq!(
            spec.pinned,
            Some(PinnedSlot {
                day: 2,
                start_hour: 8,
                end_hour: 11
            })
        );
    }

    #[test]
    fn test_pinned_rejects_empty_interval() {
        assert!(ClassSpec::pinned(1, "Physics", 10, 2, 9, 9).is_err());
        assert!(ClassSpec::pinned(1, "Physics", 10, 2, 10, 9).is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(matches!(
            ClassSpec::new(1, "Ethics", 10, 0),
            Err(TimetableError::InvalidInput(_))
        ));
    }
}
