//! Genetic Algorithm for timetabling.
//!
//! A generic generational loop built on trait-based abstractions, plus
//! the timetabling problem that plugs into it.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators,
//!   early-termination test
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, rates, adaptive mutation)
//! - [`GaRunner`]: Executes the generational loop
//! - [`GaResult`]: Best chromosome and run statistics
//! - [`TimetableProblem`]: Chromosome encoding of a timetable
//!
//! # Submodules
//!
//! - [`operators`]: Initialization, uniform crossover and constraint-aware mutation
//! - [`selection`]: Tournament selection without replacement
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

mod config;
pub mod operators;
mod problem;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use problem::TimetableProblem;
pub use runner::{GaResult, GaRunner, Termination};
pub use types::{Fitness, GaProblem, Individual};
