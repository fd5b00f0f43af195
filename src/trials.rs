//! Multi-trial orchestration.
//!
//! A single GA run can settle on a schedule that is conflict-free but
//! unfair. [`run_trials`] repeats the whole search + room reassignment
//! pipeline with independent seeds and picks one winner:
//!
//! 1. Among trials with zero hard violations, maximize
//!    `−meanGini × 10000 + fitness` (fairness first, fitness breaks ties)
//! 2. If no trial is clean, take the one with the fewest violations
//!    (higher fitness on ties)
//!
//! Trials share only the read-only [`TimetableInput`]; with the
//! `parallel` feature they run concurrently on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::{info, warn};

use crate::error::{Result, TimetableError};
use crate::fairness::FairnessSnapshot;
use crate::fitness::evaluate;
use crate::ga::{GaConfig, GaRunner, Individual, Termination, TimetableProblem};
use crate::model::{Chromosome, TimetableInput};
use crate::random::trial_seed;
use crate::reassign::{reassign_rooms, room_conflicts};

/// Upper bound on trials per request.
pub const MAX_TRIALS: usize = 10;

/// Weight of mean Gini in the selection score.
pub const GINI_SELECTION_WEIGHT: f64 = 10_000.0;

/// Outcome of one search + reassignment run.
///
/// Every metric is measured on the chromosome after room reassignment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialResult {
    /// Final chromosome (rooms reassigned).
    pub chromosome: Chromosome,
    /// Composite fitness.
    pub fitness: f64,
    /// Professor double-bookings.
    pub hard_violations: usize,
    /// Soft-constraint score.
    pub soft_score: i64,
    /// Gini coefficients of the final schedule.
    pub fairness: FairnessSnapshot,
    /// Repeated (day, hour, room) keys left by the reassignment pass.
    pub room_conflicts: usize,
    /// Generations bred by the search.
    pub generations: usize,
    /// Why the search stopped.
    pub termination: Termination,
    /// Seed the trial ran with.
    pub seed: u64,
}

impl TrialResult {
    /// `−meanGini × 10000 + fitness`; only meaningful among clean trials.
    pub fn selection_score(&self) -> f64 {
        -self.fairness.mean() * GINI_SELECTION_WEIGHT + self.fitness
    }

    /// Whether the schedule has no professor double-bookings.
    pub fn is_clean(&self) -> bool {
        self.hard_violations == 0
    }
}

/// Orchestrator parameters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialsConfig {
    /// Number of independent trials, within `1..=MAX_TRIALS`.
    pub runs: usize,

    /// Search parameters shared by every trial. When `ga.seed` is set,
    /// per-trial seeds are derived from it and the whole run is reproducible.
    pub ga: GaConfig,

    /// Run trials concurrently (requires the `parallel` feature).
    pub parallel: bool,
}

impl Default for TrialsConfig {
    fn default() -> Self {
        Self {
            runs: 3,
            ga: GaConfig::default(),
            parallel: true,
        }
    }
}

impl TrialsConfig {
    /// Creates a configuration with `runs` clamped to `1..=MAX_TRIALS`.
    pub fn new(runs: usize) -> Self {
        Self::default().with_runs(runs)
    }

    /// Sets the trial count, clamped to `1..=MAX_TRIALS`.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs.clamp(1, MAX_TRIALS);
        self
    }

    /// Sets the GA parameters shared by every trial.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Runs trials concurrently when the `parallel` feature is on.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the trial count and the GA parameters.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TRIALS).contains(&self.runs) {
            return Err(TimetableError::InvalidConfig(format!(
                "runs must be in 1..={MAX_TRIALS}, got {}",
                self.runs
            )));
        }
        self.ga.validate()
    }
}

/// All trials of one orchestrated run and the selected winner.
#[derive(Debug, Clone)]
pub struct TrialsOutcome {
    /// Trials in seed order.
    pub trials: Vec<TrialResult>,
    /// Index of the winner in `trials`.
    pub winner: usize,
}

impl TrialsOutcome {
    /// The selected trial.
    pub fn best(&self) -> &TrialResult {
        &self.trials[self.winner]
    }

    /// Consumes the outcome, returning the selected trial.
    pub fn into_best(mut self) -> TrialResult {
        self.trials.swap_remove(self.winner)
    }
}

/// Runs one GA search followed by room reassignment.
pub fn run_trial(input: &TimetableInput, ga: &GaConfig, seed: u64) -> Result<TrialResult> {
    let config = ga.clone().with_seed(seed);
    let problem = TimetableProblem::new(input, &config);
    let search = GaRunner::run(&problem, &config)?;

    let mut chromosome = reassign_rooms(input, &search.best);
    let evaluation = evaluate(input, &chromosome, problem.weights());
    chromosome.set_fitness(evaluation.fitness);

    Ok(TrialResult {
        room_conflicts: room_conflicts(&chromosome),
        chromosome,
        fitness: evaluation.fitness,
        hard_violations: evaluation.hard_violations,
        soft_score: evaluation.soft_score,
        fairness: evaluation.fairness,
        generations: search.generations,
        termination: search.termination,
        seed,
    })
}

/// Picks the winning trial; `None` only for an empty slice.
///
/// Ties keep the earliest trial.
pub fn select_best(trials: &[TrialResult]) -> Option<usize> {
    let clean = trials
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_clean())
        .min_by(|(_, a), (_, b)| b.selection_score().total_cmp(&a.selection_score()))
        .map(|(i, _)| i);

    clean.or_else(|| {
        trials
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.hard_violations
                    .cmp(&b.hard_violations)
                    .then(b.fitness.total_cmp(&a.fitness))
            })
            .map(|(i, _)| i)
    })
}

/// Runs `config.runs` independent trials and selects the winner.
///
/// # Errors
/// Returns [`TimetableError::InvalidConfig`] for invalid parameters.
pub fn run_trials(input: &TimetableInput, config: &TrialsConfig) -> Result<TrialsOutcome> {
    config.validate()?;
    let base = config.ga.seed.unwrap_or_else(rand::random);
    let seeds: Vec<u64> = (0..config.runs).map(|i| trial_seed(base, i)).collect();

    info!(
        "running {} trials over {} sessions",
        config.runs,
        input.classes().len()
    );
    let trials = run_all(input, &config.ga, &seeds, config.parallel)?;

    let winner = select_best(&trials).ok_or_else(|| {
        TimetableError::InvalidConfig("no trials were run".to_string())
    })?;
    let best = &trials[winner];
    info!(
        "trial {} of {} selected: fitness {:.2}, mean gini {:.4}, {} violations",
        winner + 1,
        trials.len(),
        best.fitness,
        best.fairness.mean(),
        best.hard_violations
    );
    if !best.is_clean() {
        warn!(
            "no trial reached zero violations; best has {}",
            best.hard_violations
        );
    }

    Ok(TrialsOutcome { trials, winner })
}

#[cfg(feature = "parallel")]
fn run_all(
    input: &TimetableInput,
    ga: &GaConfig,
    seeds: &[u64],
    parallel: bool,
) -> Result<Vec<TrialResult>> {
    if parallel {
        seeds
            .par_iter()
            .map(|&seed| run_trial(input, ga, seed))
            .collect()
    } else {
        seeds.iter().map(|&seed| run_trial(input, ga, seed)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_all(
    input: &TimetableInput,
    ga: &GaConfig,
    seeds: &[u64],
    _parallel: bool,
) -> Result<Vec<TrialResult>> {
    seeds.iter().map(|&seed| run_trial(input, ga, seed)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassSpec, Room};

    fn trial(violations: usize, mean_gini: f64, fitness: f64) -> TrialResult {
        TrialResult {
            chromosome: Chromosome::new(Vec::new()),
            fitness,
            hard_violations: violations,
            soft_score: 0,
            fairness: FairnessSnapshot {
                workload: mean_gini,
                room_usage: mean_gini,
                ac_access: mean_gini,
            },
            room_conflicts: 0,
            generations: 0,
            termination: Termination::Budget,
            seed: 0,
        }
    }

    fn input() -> TimetableInput {
        let rooms = vec![
            Room::new(322, "322", true),
            Room::new(323, "323", true),
            Room::new(101, "101", false),
        ];
        let classes = (0..6)
            .map(|i| {
                ClassSpec::new(i, format!("Course {i}"), i % 3, 1 + (i % 2) as u8)
                    .unwrap()
                    .with_ac_preference(i % 2 == 0)
            })
            .collect();
        TimetableInput::new(rooms, classes).unwrap()
    }

    #[test]
    fn test_fairer_clean_trial_wins() {
        let trials = vec![trial(0, 0.10, 500.0), trial(0, 0.05, 400.0)];
        assert_eq!(select_best(&trials), Some(1));
    }

    #[test]
    fn test_clean_trial_beats_higher_fitness_dirty_one() {
        let trials = vec![trial(1, 0.0, 1e9), trial(0, 0.5, -100.0)];
        assert_eq!(select_best(&trials), Some(1));
    }

    #[test]
    fn test_fallback_to_fewest_violations() {
        let trials = vec![trial(3, 0.1, 10.0), trial(1, 0.9, -5.0), trial(2, 0.0, 99.0)];
        assert_eq!(select_best(&trials), Some(1));
    }

    #[test]
    fn test_fallback_tie_prefers_fitness() {
        let trials = vec![trial(2, 0.1, 10.0), trial(2, 0.1, 20.0)];
        assert_eq!(select_best(&trials), Some(1));
    }

    #[test]
    fn test_ties_keep_first() {
        let trials = vec![trial(0, 0.1, 50.0), trial(0, 0.1, 50.0)];
        assert_eq!(select_best(&trials), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_runs_clamped() {
        assert_eq!(TrialsConfig::new(0).runs, 1);
        assert_eq!(TrialsConfig::new(25).runs, MAX_TRIALS);
        assert_eq!(TrialsConfig::new(4).runs, 4);
    }

    #[test]
    fn test_validate_rejects_bad_runs() {
        let mut config = TrialsConfig::default();
        config.runs = 0;
        assert!(matches!(
            config.validate(),
            Err(TimetableError::InvalidConfig(_))
        ));
        config.runs = 11;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_ac_bias_is_error() {
        let mut ga = GaConfig::fast().with_seed(3);
        ga.ac_bias = 1.5;
        let config = TrialsConfig::new(2).with_ga(ga);

        let err = run_trials(&input(), &config);
        assert!(matches!(err, Err(TimetableError::InvalidConfig(_))));
    }

    #[test]
    fn test_run_trial_measures_reassigned_schedule() {
        let inp = input();
        let result = run_trial(&inp, &GaConfig::fast().with_parallel(false), 7).unwrap();

        let expected = evaluate(&inp, &result.chromosome, &Default::default());
        assert_eq!(result.fitness, expected.fitness);
        assert_eq!(result.hard_violations, expected.hard_violations);
        assert_eq!(result.room_conflicts, room_conflicts(&result.chromosome));
        assert_eq!(result.seed, 7);
        assert_eq!(result.chromosome.fitness(), result.fitness);
    }

    #[test]
    fn test_run_trials_reproducible_with_seed() {
        let inp = input();
        let config = TrialsConfig::new(3)
            .with_ga(GaConfig::fast().with_seed(42).with_parallel(false))
            .with_parallel(false);

        let a = run_trials(&inp, &config).unwrap();
        let b = run_trials(&inp, &config).unwrap();

        assert_eq!(a.trials.len(), 3);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.best().chromosome.genes(), b.best().chromosome.genes());
        let seeds: Vec<u64> = a.trials.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![trial_seed(42, 0), trial_seed(42, 1), trial_seed(42, 2)]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let inp = input();
        let ga = GaConfig::fast().with_seed(9).with_parallel(false);
        let seq = run_trials(&inp, &TrialsConfig::new(4).with_ga(ga.clone()).with_parallel(false)).unwrap();
        let par = run_trials(&inp, &TrialsConfig::new(4).with_ga(ga).with_parallel(true)).unwrap();

        assert_eq!(seq.winner, par.winner);
        for (s, p) in seq.trials.iter().zip(&par.trials) {
            assert_eq!(s.chromosome.genes(), p.chromosome.genes());
        }
    }

    #[test]
    fn test_into_best() {
        let outcome = TrialsOutcome {
            trials: vec![trial(0, 0.3, 1.0), trial(0, 0.1, 1.0), trial(2, 0.0, 1.0)],
            winner: 1,
        };
        assert_eq!(outcome.best().fairness.workload, 0.1);
        assert_eq!(outcome.into_best().fairness.workload, 0.1);
    }
}
