//! End-to-end operations over the data collaborators.
//!
//! - [`build_input`]: turns professors, rooms and the live timetable into a
//!   [`TimetableInput`]
//! - [`generate_schedule`]: runs the orchestrator and persists the winner
//! - [`analyze_current`]: measures the fairness of the live timetable as is

use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;

use crate::error::{Result, TimetableError};
use crate::fairness::{FairnessRating, FairnessSnapshot};
use crate::fitness::hard_violations;
use crate::model::{Chromosome, ClassSpec, CourseId, Gene, ProfessorId, Room, TimetableInput};
use crate::reassign::room_conflicts;
use crate::store::{ExistingSession, ResultId, ResultSink, TimetableSource};
use crate::trials::{run_trials, TrialResult, TrialsConfig, TrialsOutcome};

/// Duration of generated sessions when the live timetable is empty.
pub const FALLBACK_DURATION: u8 = 3;

/// Coefficient above which [`FairnessReport::recommendations`] flags a dimension.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.3;

fn rooms_by_code(rooms: &[Room]) -> HashMap<&str, &Room> {
    rooms.iter().map(|r| (r.code.as_str(), r)).collect()
}

fn in_ac_room(session: &ExistingSession, rooms: &HashMap<&str, &Room>) -> bool {
    rooms.get(session.room.as_str()).is_some_and(|r| r.has_ac)
}

/// Professors who prefer AC: strictly more than half of their sessions
/// need AC or already sit in an AC room.
pub fn professor_ac_preferences(
    sessions: &[ExistingSession],
    rooms: &[Room],
) -> HashMap<ProfessorId, bool> {
    let by_code = rooms_by_code(rooms);
    let mut counts: HashMap<ProfessorId, (usize, usize)> = HashMap::new();
    for session in sessions {
        let (ac, total) = counts.entry(session.professor_id).or_default();
        *total += 1;
        if session.needs_ac || in_ac_room(session, &by_code) {
            *ac += 1;
        }
    }
    counts
        .into_iter()
        .map(|(prof, (ac, total))| (prof, 2 * ac > total))
        .collect()
}

/// One pinned class spec per live session, course ids numbered by subject
/// in order of first appearance.
fn pinned_classes(
    sessions: &[ExistingSession],
    prefers_ac: impl Fn(&ExistingSession) -> bool,
) -> Result<Vec<ClassSpec>> {
    let mut course_ids: HashMap<&str, CourseId> = HashMap::new();
    sessions
        .iter()
        .map(|s| -> Result<ClassSpec> {
            let next = course_ids.len() as CourseId + 1;
            let course_id = *course_ids.entry(s.subject.as_str()).or_insert(next);
            Ok(ClassSpec::pinned(
                course_id,
                s.subject.clone(),
                s.professor_id,
                s.day,
                s.start_hour,
                s.end_hour,
            )?
            .with_ac_preference(prefers_ac(s)))
        })
        .collect()
}

/// Builds the scheduling input from the data collaborator.
///
/// Live sessions become pinned specs whose AC preference is
/// `needs_ac || professor prefers AC`. When the live timetable is empty,
/// every professor gets 2 or 3 unpinned sessions of
/// [`FALLBACK_DURATION`] hours drawn from `rng`.
///
/// # Errors
/// - [`TimetableError::NoWorkload`] if there are no professors
/// - [`TimetableError::InvalidInput`] for inverted session intervals,
///   an empty room list or sessions outside the time grid
pub fn build_input<S, R>(source: &S, rng: &mut R) -> Result<TimetableInput>
where
    S: TimetableSource + ?Sized,
    R: Rng,
{
    let professors = source.list_professors()?;
    if professors.is_empty() {
        return Err(TimetableError::NoWorkload("no professors".to_string()));
    }
    let rooms = source.list_rooms()?;
    let sessions = source.list_existing_sessions()?;
    let constraints = source.list_professor_constraints()?;

    let classes = if sessions.is_empty() {
        let mut classes = Vec::new();
        for professor in &professors {
            for _ in 0..rng.random_range(2..=3) {
                let id = classes.len() as CourseId + 1;
                classes.push(ClassSpec::new(
                    id,
                    format!("Course {id}"),
                    professor.id,
                    FALLBACK_DURATION,
                )?);
            }
        }
        info!(
            "live timetable is empty, generated {} sessions for {} professors",
            classes.len(),
            professors.len()
        );
        classes
    } else {
        let preferences = professor_ac_preferences(&sessions, &rooms);
        debug!(
            "{}/{} professors prefer AC",
            preferences.values().filter(|&&p| p).count(),
            professors.len()
        );
        let classes = pinned_classes(&sessions, |s| {
            s.needs_ac || preferences.get(&s.professor_id).copied().unwrap_or(false)
        })?;
        info!("pinned {} live sessions, optimizing rooms only", classes.len());
        classes
    };

    Ok(TimetableInput::new(rooms, classes)?.with_constraints(constraints))
}

/// Outcome of [`generate_schedule`].
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Id of the persisted, approved winner.
    pub result_id: ResultId,
    /// Every trial and the winner index.
    pub outcome: TrialsOutcome,
}

impl GenerationReport {
    /// The persisted trial.
    pub fn best(&self) -> &TrialResult {
        self.outcome.best()
    }
}

/// Builds the input, runs the trials and auto-applies the winner.
///
/// The winner is saved with a note, its sessions are written and it is
/// marked approved. Without a seed in `config.ga`, the trial seeds are
/// drawn from `rng`.
pub fn generate_schedule<S, K, R>(
    source: &S,
    sink: &K,
    config: &TrialsConfig,
    rng: &mut R,
) -> Result<GenerationReport>
where
    S: TimetableSource + ?Sized,
    K: ResultSink + ?Sized,
    R: Rng,
{
    let input = build_input(source, rng)?;

    let mut config = config.clone();
    if config.ga.seed.is_none() {
        config.ga.seed = Some(rng.random());
    }
    let outcome = run_trials(&input, &config)?;

    let best = outcome.best();
    let notes = format!(
        "best of {} trials, {} generations",
        outcome.trials.len(),
        best.generations
    );
    let result_id = sink.save_trial_result(
        best.fitness,
        best.hard_violations,
        best.soft_score,
        &best.fairness,
        &notes,
    )?;
    sink.save_sessions(result_id, &best.chromosome)?;
    sink.mark_approved(result_id)?;
    info!("schedule {result_id} saved and approved ({notes})");

    Ok(GenerationReport { result_id, outcome })
}

/// Fairness of a timetable as it stands.
#[derive(Debug, Clone, PartialEq)]
pub struct FairnessReport {
    /// Raw Gini values.
    pub snapshot: FairnessSnapshot,
    /// Rating of the workload Gini.
    pub workload: FairnessRating,
    /// Rating of the room-usage Gini.
    pub room_usage: FairnessRating,
    /// Rating of the AC-access Gini.
    pub ac_access: FairnessRating,
    /// Rating of the mean Gini.
    pub overall: FairnessRating,
    /// Number of sessions analyzed.
    pub sessions: usize,
    /// Professor double-bookings.
    pub hard_violations: usize,
    /// Repeated (day, hour, room) keys.
    pub room_conflicts: usize,
}

impl FairnessReport {
    fn new(snapshot: FairnessSnapshot, sessions: usize, hard: usize, rooms: usize) -> Self {
        Self {
            workload: FairnessRating::from_gini(snapshot.workload),
            room_usage: FairnessRating::from_gini(snapshot.room_usage),
            ac_access: FairnessRating::from_gini(snapshot.ac_access),
            overall: snapshot.rating(),
            snapshot,
            sessions,
            hard_violations: hard,
            room_conflicts: rooms,
        }
    }

    /// Suggested actions for dimensions above [`RECOMMENDATION_THRESHOLD`].
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.snapshot.workload > RECOMMENDATION_THRESHOLD {
            out.push("rebalance professor workloads");
        }
        if self.snapshot.room_usage > RECOMMENDATION_THRESHOLD {
            out.push("spread classes more evenly across rooms");
        }
        if self.snapshot.ac_access > RECOMMENDATION_THRESHOLD {
            out.push("give more AC room access to professors who need it");
        }
        out
    }
}

/// Measures the live timetable without running the search.
///
/// A session counts toward AC demand when it needs AC or already sits in
/// an AC room.
///
/// # Errors
/// - [`TimetableError::NoWorkload`] if the live timetable is empty
/// - [`TimetableError::UnknownRoom`] if a session's room code is not loaded
pub fn analyze_current<S>(source: &S) -> Result<FairnessReport>
where
    S: TimetableSource + ?Sized,
{
    let rooms = source.list_rooms()?;
    let sessions = source.list_existing_sessions()?;
    if sessions.is_empty() {
        return Err(TimetableError::NoWorkload(
            "live timetable has no sessions".to_string(),
        ));
    }

    let by_code = rooms_by_code(&rooms);
    let classes = pinned_classes(&sessions, |s| s.needs_ac || in_ac_room(s, &by_code))?;
    let genes = sessions
        .iter()
        .zip(&classes)
        .map(|(s, spec)| -> Result<Gene> {
            let room = by_code
                .get(s.room.as_str())
                .ok_or_else(|| TimetableError::UnknownRoom(s.room.clone()))?;
            Gene::new(
                spec.course_id,
                s.professor_id,
                room.id,
                s.day,
                s.start_hour,
                s.end_hour,
            )
        })
        .collect::<Result<Vec<_>>>()?;
    let chromosome = Chromosome::new(genes);

    let input = TimetableInput::new(rooms, classes)?;
    let snapshot = FairnessSnapshot::measure(&input, &chromosome);
    Ok(FairnessReport::new(
        snapshot,
        chromosome.len(),
        hard_violations(&chromosome),
        room_conflicts(&chromosome),
    ))
}
