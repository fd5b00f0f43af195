//! Timetabling domain model.
//!
//! Typed records shared by every other module. Rooms and class specs are
//! read-only for the duration of a run; genes and chromosomes are values
//! that operators copy rather than edit in place.
//!
//! # Time Grid
//!
//! Days are numbered `0..7` (0 = Sunday). Hours are whole clock hours; a
//! session occupying `[start, end)` covers the hours `start, start+1, …, end-1`.

mod class_spec;
mod constraint;
mod gene;
mod input;
mod room;

pub use class_spec::{ClassSpec, PinnedSlot};
pub use constraint::{ConstraintKind, ProfessorConstraint};
pub use gene::{Chromosome, Gene};
pub use input::TimetableInput;
pub use room::Room;

/// Room identifier.
pub type RoomId = u32;
/// Professor identifier.
pub type ProfessorId = u32;
/// Course identifier.
pub type CourseId = u32;
/// Day of week, `0..7` with 0 = Sunday.
pub type Day = u8;
/// Clock hour.
pub type Hour = u8;
