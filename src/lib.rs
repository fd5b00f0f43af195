//! Fairness-aware course timetabling.
//!
//! Assigns rooms and times to teaching sessions with a genetic algorithm,
//! then scores the result for how evenly it spreads workload, room usage
//! and access to air-conditioned rooms:
//!
//! - **Model**: rooms, class specs (optionally pinned to a live day/time),
//!   genes and positional chromosomes, professor time constraints.
//! - **Fairness**: Gini coefficients over three distributions and their
//!   qualitative rating.
//! - **Fitness**: professor double-booking penalty, AC/duration/time-window
//!   soft score and fairness, combined lexicographically by weight.
//! - **GA**: generational search with elitism, tournament selection,
//!   uniform crossover, constraint-aware mutation on an adaptive schedule,
//!   and early termination once a schedule is conflict-free.
//! - **Reassignment**: greedy post-pass that removes room collisions,
//!   serving AC-preferring sessions first.
//! - **Trials**: independent runs of search + reassignment with a
//!   fairness-first winner selection.
//! - **Store / Pipeline**: collaborator traits for reference data and
//!   results, an in-memory store, generate-and-apply and live-timetable
//!   analysis.
//!
//! # Features
//!
//! - `parallel` (default): population evaluation and trials on rayon
//! - `serde`: `Serialize`/`Deserialize` on domain records
//!
//! # Example
//!
//! ```
//! use u_timetable::ga::GaConfig;
//! use u_timetable::model::Room;
//! use u_timetable::pipeline::generate_schedule;
//! use u_timetable::random::create_rng;
//! use u_timetable::store::{ExistingSession, MemoryStore, Professor};
//! use u_timetable::trials::TrialsConfig;
//!
//! let store = MemoryStore::new()
//!     .with_professors(vec![Professor::new(1, "Dr. Reyes"), Professor::new(2, "Dr. Cruz")])
//!     .with_rooms(vec![Room::new(322, "322", true), Room::new(101, "101", false)])
//!     .with_sessions(vec![
//!         ExistingSession::new(1, "Ethics", 1, 8, 10, "101").with_needs_ac(true),
//!         ExistingSession::new(2, "Calculus", 1, 8, 11, "101"),
//!     ]);
//!
//! let config = TrialsConfig::new(2).with_ga(GaConfig::fast());
//! let report = generate_schedule(&store, &store, &config, &mut create_rng(42)).unwrap();
//! assert_eq!(report.best().hard_violations, 0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod fairness;
pub mod fitness;
pub mod ga;
pub mod model;
pub mod pipeline;
pub mod random;
pub mod reassign;
pub mod store;
pub mod trials;

pub use error::{Result, TimetableError};
