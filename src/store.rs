//! Data and persistence collaborators.
//!
//! The engine reads its reference data through [`TimetableSource`] and
//! hands results to a [`ResultSink`]. Both are narrow traits so that a
//! database, a file or a test fixture can stand behind them.
//! [`MemoryStore`] implements both in memory.

use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::fairness::FairnessSnapshot;
use crate::model::{Chromosome, Day, Gene, Hour, ProfessorConstraint, ProfessorId, Room};

/// Identifier of a persisted schedule result.
pub type ResultId = u64;

/// A teaching professor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Professor {
    /// Professor identifier shared with class specs and constraints.
    pub id: ProfessorId,
    /// Display name.
    pub name: String,
}

impl Professor {
    /// Creates a professor record.
    pub fn new(id: ProfessorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A session of the live timetable.
///
/// Rooms are referenced by display code, as the live timetable stores them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExistingSession {
    /// Teaching professor.
    pub professor_id: ProfessorId,
    /// Subject name.
    pub subject: String,
    /// Live day index.
    pub day: Day,
    /// Live start hour (inclusive).
    pub start_hour: Hour,
    /// Live end hour (exclusive).
    pub end_hour: Hour,
    /// Room display code.
    pub room: String,
    /// Whether the session needs an air-conditioned room.
    pub needs_ac: bool,
}

impl ExistingSession {
    /// Creates a session that does not need AC.
    pub fn new(
        professor_id: ProfessorId,
        subject: impl Into<String>,
        day: Day,
        start_hour: Hour,
        end_hour: Hour,
        room: impl Into<String>,
    ) -> Self {
        Self {
            professor_id,
            subject: subject.into(),
            day,
            start_hour,
            end_hour,
            room: room.into(),
            needs_ac: false,
        }
    }

    /// Flags the session as needing an air-conditioned room.
    pub fn with_needs_ac(mut self, needs_ac: bool) -> Self {
        self.needs_ac = needs_ac;
        self
    }
}

/// Review state of a persisted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScheduleStatus {
    /// Saved, not yet reviewed.
    Pending,
    /// Accepted for use.
    Approved,
    /// Turned down on review.
    Rejected,
}

/// A persisted schedule result with its sessions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredSchedule {
    /// Store-assigned id.
    pub id: ResultId,
    /// Composite fitness of the saved chromosome.
    pub fitness: f64,
    /// Professor double-bookings.
    pub hard_violations: usize,
    /// Soft-constraint score.
    pub soft_score: i64,
    /// Gini snapshot.
    pub fairness: FairnessSnapshot,
    /// Free-form run notes.
    pub notes: String,
    /// Review state.
    pub status: ScheduleStatus,
    /// Final assignments, empty until [`ResultSink::save_sessions`] runs.
    pub sessions: Vec<Gene>,
}

/// Read-only reference data for one invocation.
pub trait TimetableSource {
    /// All professors.
    fn list_professors(&self) -> Result<Vec<Professor>>;

    /// All rooms, AC flag included.
    fn list_rooms(&self) -> Result<Vec<Room>>;

    /// The live timetable, in a stable order.
    fn list_existing_sessions(&self) -> Result<Vec<ExistingSession>>;

    /// Preferred and unavailable time windows.
    fn list_professor_constraints(&self) -> Result<Vec<ProfessorConstraint>>;
}

/// Persistence of generated schedules.
///
/// Methods take `&self`; implementations synchronize internally so a
/// single store can act as both source and sink.
pub trait ResultSink {
    /// Stores a result summary as [`ScheduleStatus::Pending`] and returns its id.
    fn save_trial_result(
        &self,
        fitness: f64,
        hard_violations: usize,
        soft_score: i64,
        fairness: &FairnessSnapshot,
        notes: &str,
    ) -> Result<ResultId>;

    /// Batch-writes the final gene assignments of a stored result.
    fn save_sessions(&self, id: ResultId, chromosome: &Chromosome) -> Result<()>;

    /// Sets a stored result to [`ScheduleStatus::Approved`].
    fn mark_approved(&self, id: ResultId) -> Result<()>;

    /// Sets a stored result to [`ScheduleStatus::Rejected`].
    fn mark_rejected(&self, id: ResultId) -> Result<()>;
}

#[derive(Debug, Default)]
struct Results {
    next_id: ResultId,
    schedules: Vec<StoredSchedule>,
}

impl Results {
    fn get_mut(&mut self, id: ResultId) -> Result<&mut StoredSchedule> {
        self.schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TimetableError::ResultNotFound(id))
    }
}

/// In-memory [`TimetableSource`] and [`ResultSink`].
///
/// # Example
/// ```
/// use u_timetable::model::Room;
/// use u_timetable::store::{MemoryStore, Professor, TimetableSource};
///
/// let store = MemoryStore::new()
///     .with_professors(vec![Professor::new(1, "Dr. Reyes")])
///     .with_rooms(vec![Room::new(322, "322", true)]);
/// assert_eq!(store.list_professors().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    professors: Vec<Professor>,
    rooms: Vec<Room>,
    sessions: Vec<ExistingSession>,
    constraints: Vec<ProfessorConstraint>,
    results: Mutex<Results>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the professor list.
    pub fn with_professors(mut self, professors: Vec<Professor>) -> Self {
        self.professors = professors;
        self
    }

    /// Sets the room list.
    pub fn with_rooms(mut self, rooms: Vec<Room>) -> Self {
        self.rooms = rooms;
        self
    }

    /// Sets the live timetable.
    pub fn with_sessions(mut self, sessions: Vec<ExistingSession>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Sets the professor time constraints.
    pub fn with_constraints(mut self, constraints: Vec<ProfessorConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    fn results(&self) -> Result<MutexGuard<'_, Results>> {
        self.results
            .lock()
            .map_err(|_| TimetableError::Store("result store lock poisoned".to_string()))
    }

    /// All stored results, newest first.
    pub fn list_results(&self) -> Result<Vec<StoredSchedule>> {
        let results = self.results()?;
        Ok(results.schedules.iter().rev().cloned().collect())
    }

    /// A stored result by id.
    pub fn get_result(&self, id: ResultId) -> Result<StoredSchedule> {
        self.results()?
            .schedules
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(TimetableError::ResultNotFound(id))
    }

    /// The stored result with the lowest mean Gini, if any.
    ///
    /// Ties keep the older result.
    pub fn fairest_result(&self) -> Result<Option<StoredSchedule>> {
        let results = self.results()?;
        Ok(results
            .schedules
            .iter()
            .min_by(|a, b| a.fairness.mean().total_cmp(&b.fairness.mean()))
            .cloned())
    }

    fn set_status(&self, id: ResultId, status: ScheduleStatus) -> Result<()> {
        self.results()?.get_mut(id)?.status = status;
        Ok(())
    }
}

impl TimetableSource for MemoryStore {
    fn list_professors(&self) -> Result<Vec<Professor>> {
        Ok(self.professors.clone())
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.clone())
    }

    fn list_existing_sessions(&self) -> Result<Vec<ExistingSession>> {
        Ok(self.sessions.clone())
    }

    fn list_professor_constraints(&self) -> Result<Vec<ProfessorConstraint>> {
        Ok(self.constraints.clone())
    }
}

impl ResultSink for MemoryStore {
    fn save_trial_result(
        &self,
        fitness: f64,
        hard_violations: usize,
        soft_score: i64,
        fairness: &FairnessSnapshot,
        notes: &str,
    ) -> Result<ResultId> {
        let mut results = self.results()?;
        results.next_id += 1;
        let id = results.next_id;
        results.schedules.push(StoredSchedule {
            id,
            fitness,
            hard_violations,
            soft_score,
            fairness: *fairness,
            notes: notes.to_string(),
            status: ScheduleStatus::Pending,
            sessions: Vec::new(),
        });
        Ok(id)
    }

    fn save_sessions(&self, id: ResultId, chromosome: &Chromosome) -> Result<()> {
        self.results()?.get_mut(id)?.sessions = chromosome.genes().to_vec();
        Ok(())
    }

    fn mark_approved(&self, id: ResultId) -> Result<()> {
        self.set_status(id, ScheduleStatus::Approved)
    }

    fn mark_rejected(&self, id: ResultId) -> Result<()> {
        self.set_status(id, ScheduleStatus::Rejected)
    }
}
