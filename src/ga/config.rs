//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.
//! It is an explicit value passed to the runner; nothing is read from the
//! environment.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Configuration for the timetabling GA.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 200);
/// assert_eq!(config.elite_count(), 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_tournament_size(4)
///     .with_mutation_rate(0.15)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Number of chromosomes in the population.
    pub population_size: usize,

    /// Generation budget.
    pub max_generations: usize,

    /// Number of individuals drawn (without replacement) per tournament.
    pub tournament_size: usize,

    /// Fraction of the population carried forward unchanged (0.0–1.0).
    pub elite_ratio: f64,

    /// Probability of recombining a selected pair (0.0–1.0).
    ///
    /// When crossover is skipped both parents pass through unchanged
    /// (before mutation).
    pub crossover_rate: f64,

    /// Initial per-gene mutation probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Amount added to the mutation rate at each schedule step.
    pub mutation_step: f64,

    /// Generations between mutation-rate increases.
    ///
    /// Set to 0 to keep the rate fixed.
    pub mutation_interval: usize,

    /// Ceiling for the adaptive mutation rate.
    pub max_mutation_rate: f64,

    /// Probability that an AC-preferring session draws from AC rooms only
    /// when a room is picked at random.
    pub ac_bias: f64,

    /// Whether to evaluate the population in parallel.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,

    /// Optional wall-clock deadline in milliseconds.
    ///
    /// Checked at the start of each generation; the best chromosome so far
    /// is returned when it expires.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 200,
            tournament_size: 5,
            elite_ratio: 0.1,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            mutation_step: 0.05,
            mutation_interval: 50,
            max_mutation_rate: 0.3,
            ac_bias: 0.8,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation budget.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the initial mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the adaptive mutation schedule: `+step` every `interval`
    /// generations, capped at `max`.
    pub fn with_mutation_schedule(mut self, step: f64, interval: usize, max: f64) -> Self {
        self.mutation_step = step.max(0.0);
        self.mutation_interval = interval;
        self.max_mutation_rate = max.clamp(0.0, 1.0);
        self
    }

    /// Sets the AC room bias.
    pub fn with_ac_bias(mut self, bias: f64) -> Self {
        self.ac_bias = bias.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock deadline in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick runs: population 30, 60 generations.
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 60,
            mutation_interval: 20,
            ..Self::default()
        }
    }

    /// Number of elites carried forward each generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// Mutation rate in effect at `generation` under the adaptive schedule.
    ///
    /// The rate rises by `mutation_step` at every positive multiple of
    /// `mutation_interval`, never exceeding `max_mutation_rate` (nor
    /// dropping below the initial rate).
    pub fn mutation_rate_at(&self, generation: usize) -> f64 {
        if self.mutation_interval == 0 {
            return self.mutation_rate;
        }
        let steps = generation / self.mutation_interval;
        let ceiling = self.max_mutation_rate.max(self.mutation_rate);
        (self.mutation_rate + steps as f64 * self.mutation_step).min(ceiling)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidConfig`] describing the first
    /// invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TimetableError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(TimetableError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(TimetableError::InvalidConfig(
                "tournament_size must be at least 1".into(),
            ));
        }
        if self.elite_count() >= self.population_size {
            return Err(TimetableError::InvalidConfig(
                "elite_ratio too high: elites fill entire population".into(),
            ));
        }
        let unit_rates = [
            ("ac_bias", self.ac_bias),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("max_mutation_rate", self.max_mutation_rate),
            ("elite_ratio", self.elite_ratio),
        ];
        for (name, value) in unit_rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if !(self.mutation_step >= 0.0 && self.mutation_step.is_finite()) {
            return Err(TimetableError::InvalidConfig(format!(
                "mutation_step must be non-negative, got {}",
                self.mutation_step
            )));
        }
        if self.time_limit_ms == Some(0) {
            return Err(TimetableError::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
