//! Validated problem input.
//!
//! [`TimetableInput`] bundles the read-only reference data for one run:
//! rooms, class specs, professor constraints and the time grid. It is
//! built once, validated, and then shared by reference across trials.

use std::collections::{HashMap, HashSet};
use std::ops::{Range, RangeInclusive};

use super::{Chromosome, ClassSpec, Day, Hour, ProfessorConstraint, Room, RoomId};
use crate::error::{Result, TimetableError};

/// Default number of schedulable days (Sunday..Saturday).
pub const DEFAULT_DAYS: Day = 7;

/// Default schedulable hours (24-hour scheduling).
pub const DEFAULT_HOURS: Range<Hour> = 0..24;

/// Read-only input for a timetabling run.
#[derive(Debug, Clone)]
pub struct TimetableInput {
    rooms: Vec<Room>,
    classes: Vec<ClassSpec>,
    constraints: Vec<ProfessorConstraint>,
    days: Day,
    hours: Range<Hour>,
    room_index: HashMap<RoomId, usize>,
    ac_rooms: Vec<RoomId>,
    non_ac_rooms: Vec<RoomId>,
}

impl TimetableInput {
    /// Builds an input over the default grid (7 days, hours 0–24).
    ///
    /// # Errors
    /// - [`TimetableError::NoWorkload`] if `classes` is empty
    /// - [`TimetableError::InvalidInput`] if there are no rooms, room ids
    ///   repeat, or a class does not fit the grid
    pub fn new(rooms: Vec<Room>, classes: Vec<ClassSpec>) -> Result<Self> {
        if classes.is_empty() {
            return Err(TimetableError::NoWorkload(
                "no sessions to schedule".into(),
            ));
        }
        if rooms.is_empty() {
            return Err(TimetableError::InvalidInput(
                "at least one room is required".into(),
            ));
        }

        let mut room_index = HashMap::with_capacity(rooms.len());
        for (idx, room) in rooms.iter().enumerate() {
            if room_index.insert(room.id, idx).is_some() {
                return Err(TimetableError::InvalidInput(format!(
                    "duplicate room id {}",
                    room.id
                )));
            }
        }
        let ac_rooms = rooms.iter().filter(|r| r.has_ac).map(|r| r.id).collect();
        let non_ac_rooms = rooms.iter().filter(|r| !r.has_ac).map(|r| r.id).collect();

        let input = Self {
            rooms,
            classes,
            constraints: Vec::new(),
            days: DEFAULT_DAYS,
            hours: DEFAULT_HOURS,
            room_index,
            ac_rooms,
            non_ac_rooms,
        };
        input.check_grid()?;
        Ok(input)
    }

    /// Attaches professor preference/unavailability windows.
    pub fn with_constraints(mut self, constraints: Vec<ProfessorConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Replaces the time grid.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidInput`] if the grid is empty or a
    /// class no longer fits it.
    pub fn with_time_grid(mut self, days: Day, hours: Range<Hour>) -> Result<Self> {
        self.days = days;
        self.hours = hours;
        self.check_grid()?;
        Ok(self)
    }

    fn check_grid(&self) -> Result<()> {
        if self.days == 0 || self.hours.is_empty() {
            return Err(TimetableError::InvalidInput("empty time grid".into()));
        }
        let span = self.hours.end - self.hours.start;
        for (idx, spec) in self.classes.iter().enumerate() {
            match spec.pinned {
                Some(slot) if slot.day >= self.days => {
                    return Err(TimetableError::InvalidInput(format!(
                        "class {idx}: pinned day {} outside 0..{}",
                        slot.day, self.days
                    )));
                }
                Some(slot)
                    if slot.start_hour < self.hours.start || slot.end_hour > self.hours.end =>
                {
                    return Err(TimetableError::InvalidInput(format!(
                        "class {idx}: pinned hours {}..{} outside {}..{}",
                        slot.start_hour, slot.end_hour, self.hours.start, self.hours.end
                    )));
                }
                None if spec.duration > span => {
                    return Err(TimetableError::InvalidInput(format!(
                        "class {idx}: duration {}h exceeds the {span}h day",
                        spec.duration
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// All rooms, in load order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Class specs; position `i` corresponds to gene `i`.
    pub fn classes(&self) -> &[ClassSpec] {
        &self.classes
    }

    /// Professor constraint windows.
    pub fn constraints(&self) -> &[ProfessorConstraint] {
        &self.constraints
    }

    /// Number of schedulable days.
    pub fn days(&self) -> Day {
        self.days
    }

    /// Schedulable clock hours.
    pub fn hours(&self) -> Range<Hour> {
        self.hours.clone()
    }

    /// Feasible start hours for a session of `duration` hours.
    pub fn start_hours(&self, duration: Hour) -> RangeInclusive<Hour> {
        let last = self.hours.end.saturating_sub(duration).max(self.hours.start);
        self.hours.start..=last
    }

    /// Looks up a room by id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.room_index.get(&id).map(|&idx| &self.rooms[idx])
    }

    /// Whether `id` names an AC room.
    pub fn is_ac_room(&self, id: RoomId) -> bool {
        self.room(id).is_some_and(|r| r.has_ac)
    }

    /// Ids of AC rooms, in load order.
    pub fn ac_rooms(&self) -> &[RoomId] {
        &self.ac_rooms
    }

    /// Ids of non-AC rooms, in load order.
    pub fn non_ac_rooms(&self) -> &[RoomId] {
        &self.non_ac_rooms
    }

    /// Number of distinct professors across all class specs.
    pub fn professor_count(&self) -> usize {
        self.classes
            .iter()
            .map(|c| c.professor_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Checks that a chromosome fits this input.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidInput`] on a length mismatch and
    /// [`TimetableError::UnknownRoom`] if a gene names a room that was not
    /// loaded.
    pub fn validate_chromosome(&self, chromosome: &Chromosome) -> Result<()> {
        if chromosome.len() != self.classes.len() {
            return Err(TimetableError::InvalidInput(format!(
                "chromosome has {} genes for {} classes",
                chromosome.len(),
                self.classes.len()
            )));
        }
        for gene in chromosome.genes() {
            if !self.room_index.contains_key(&gene.room_id) {
                return Err(TimetableError::UnknownRoom(gene.room_id.to_string()));
            }
        }
        Ok(())
    }
}
