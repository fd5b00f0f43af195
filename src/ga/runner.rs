//! GA generational loop.
//!
//! [`GaRunner`] drives one search:
//! initialization → evaluation → (termination check → elitism →
//! selection → crossover → mutation → evaluation) × generations.
//!
//! The best individual ever seen is tracked independently of population
//! turnover and is returned whatever its quality; the runner never fails
//! once the configuration is valid.

use super::config::GaConfig;
use super::selection::tournament;
use super::types::{Fitness, GaProblem, Individual};
use crate::error::Result;
use crate::random::rng_from;
use log::{debug, info};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why the generational loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The generation budget was exhausted.
    Budget,
    /// [`GaProblem::is_solved`] accepted the best individual.
    Solved,
    /// The wall-clock deadline expired.
    Deadline,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of generations bred.
    pub generations: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Mutation rate in effect when the run stopped.
    pub final_mutation_rate: f64,

    /// Best-ever fitness after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA generational loop.
///
/// # Usage
///
/// ```ignore
/// let problem = TimetableProblem::new(&input, &config);
/// let result = GaRunner::run(&problem, &config)?;
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator seeded from `config.seed`.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidConfig`](crate::error::TimetableError::InvalidConfig)
    /// if the configuration is invalid.
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> Result<GaResult<P::Individual>> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(problem, config, &mut rng, None)
    }

    /// Runs the GA with an explicit generator and optional cancellation flag.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops at
    /// the start of the next generation and returns the best so far.
    pub fn run_with_rng<P: GaProblem, R: Rng>(
        problem: &P,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>> {
        config.validate()?;
        let started = Instant::now();

        // 1. Initialize and evaluate
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);

        // 2. Best-ever memory
        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness().to_f64());

        let elite_count = config.elite_count();
        let mut mutation_rate = config.mutation_rate;
        let mut generations = 0;
        let mut termination = Termination::Budget;

        info!(
            "GA start: population {}, budget {} generations, initial best {:.2}",
            config.population_size,
            config.max_generations,
            best.fitness().to_f64()
        );

        for gen in 0..config.max_generations {
            // 3. Termination checks
            if problem.is_solved(&best) {
                termination = Termination::Solved;
                break;
            }
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                termination = Termination::Cancelled;
                break;
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    termination = Termination::Deadline;
                    break;
                }
            }

            // 4. Elitism: best first
            population.sort_by(|a, b| {
                b.fitness()
                    .partial_cmp(&a.fitness())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let mut next_gen: Vec<P::Individual> = population[..elite_count].to_vec();

            // Adaptive mutation schedule
            let rate = config.mutation_rate_at(gen);
            if rate > mutation_rate {
                debug!("generation {gen}: mutation rate {mutation_rate:.2} -> {rate:.2}");
            }
            mutation_rate = rate;

            // 5. Offspring
            while next_gen.len() < config.population_size {
                let p1 = tournament(&population, config.tournament_size, rng);
                let p2 = tournament(&population, config.tournament_size, rng);

                let (c1, c2) = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    problem.crossover(&population[p1], &population[p2], rng)
                } else {
                    (population[p1].clone(), population[p2].clone())
                };

                next_gen.push(problem.mutate(&c1, mutation_rate, rng));
                if next_gen.len() < config.population_size {
                    next_gen.push(problem.mutate(&c2, mutation_rate, rng));
                }
            }

            // Elites keep their fitness
            evaluate_population(problem, &mut next_gen[elite_count..], config.parallel);
            population = next_gen;
            generations = gen + 1;

            // Update best-ever
            let gen_best = find_best(&population);
            if gen_best.fitness() > best.fitness() {
                best = gen_best.clone();
                debug!(
                    "generation {}: new best fitness {:.2}",
                    generations,
                    best.fitness().to_f64()
                );
            }
            fitness_history.push(best.fitness().to_f64());

            problem.on_generation(generations, best.fitness());
        }

        // A solution found by the final generation still counts as solved.
        if termination == Termination::Budget && problem.is_solved(&best) {
            termination = Termination::Solved;
        }

        info!(
            "GA stopped after {} generations ({:?}), best fitness {:.2}",
            generations,
            termination,
            best.fitness().to_f64()
        );

        Ok(GaResult {
            best_fitness: best.fitness(),
            best,
            generations,
            termination,
            final_mutation_rate: mutation_rate,
            fitness_history,
        })
    }
}

/// Evaluate all individuals in the slice.
#[cfg(feature = "parallel")]
fn evaluate_population<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    if parallel {
        population.par_iter_mut().for_each(|ind| {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        });
    } else {
        for ind in population.iter_mut() {
            let f = problem.evaluate(ind);
            ind.set_fitness(f);
        }
    }
}

/// Evaluate all individuals in the slice.
#[cfg(not(feature = "parallel"))]
fn evaluate_population<P: GaProblem>(problem: &P, population: &mut [P::Individual], _parallel: bool) {
    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Find the individual with the best (highest) fitness.
///
/// Ties resolve to the earliest individual.
fn find_best<I: Individual>(population: &[I]) -> &I {
    let mut best = &population[0];
    for ind in &population[1..] {
        if ind.fitness() > best.fitness() {
            best = ind;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimetableError;
    use crate::random::create_rng;

    // ---- OneMax problem: maximize the number of set bits ----

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        fitness: f64,
    }

    impl Individual for BitString {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
        }
    }

    struct OneMaxProblem {
        n: usize,
        stop_when_full: bool,
    }

    impl GaProblem for OneMaxProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            let bits: Vec<bool> = (0..self.n).map(|_| rng.random_bool(0.5)).collect();
            BitString {
                bits,
                fitness: f64::NEG_INFINITY,
            }
        }

        fn evaluate(&self, ind: &BitString) -> f64 {
            ind.bits.iter().filter(|&&b| b).count() as f64
        }

        fn crossover<R: Rng>(
            &self,
            p1: &BitString,
            p2: &BitString,
            rng: &mut R,
        ) -> (BitString, BitString) {
            let mut c1 = Vec::with_capacity(self.n);
            let mut c2 = Vec::with_capacity(self.n);
            for (&a, &b) in p1.bits.iter().zip(&p2.bits) {
                if rng.random_bool(0.5) {
                    c1.push(a);
                    c2.push(b);
                } else {
                    c1.push(b);
                    c2.push(a);
                }
            }
            (
                BitString {
                    bits: c1,
                    fitness: f64::NEG_INFINITY,
                },
                BitString {
                    bits: c2,
                    fitness: f64::NEG_INFINITY,
                },
            )
        }

        fn mutate<R: Rng>(&self, ind: &BitString, rate: f64, rng: &mut R) -> BitString {
            let bits = ind
                .bits
                .iter()
                .map(|&b| if rng.random_bool(rate) { !b } else { b })
                .collect();
            BitString {
                bits,
                fitness: f64::NEG_INFINITY,
            }
        }

        fn is_solved(&self, ind: &BitString) -> bool {
            self.stop_when_full && ind.bits.iter().all(|&b| b)
        }
    }

    fn onemax(n: usize) -> OneMaxProblem {
        OneMaxProblem {
            n,
            stop_when_full: false,
        }
    }

    // ---- Decay problem: every offspring is the all-zero string ----

    struct DecayProblem {
        n: usize,
        delay: Option<std::time::Duration>,
        evaluations: std::sync::atomic::AtomicUsize,
        parent_fitness: std::sync::Mutex<Vec<f64>>,
    }

    impl DecayProblem {
        fn new(n: usize) -> Self {
            Self {
                n,
                delay: None,
                evaluations: std::sync::atomic::AtomicUsize::new(0),
                parent_fitness: std::sync::Mutex::new(Vec::new()),
            }
        }

        fn slow(n: usize, delay_ms: u64) -> Self {
            Self {
                delay: Some(std::time::Duration::from_millis(delay_ms)),
                ..Self::new(n)
            }
        }
    }

    impl GaProblem for DecayProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::NEG_INFINITY,
            }
        }

        fn evaluate(&self, ind: &BitString) -> f64 {
            self.evaluations.fetch_add(1, Ordering::Relaxed);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            ind.bits.iter().filter(|&&b| b).count() as f64
        }

        fn crossover<R: Rng>(
            &self,
            p1: &BitString,
            p2: &BitString,
            _rng: &mut R,
        ) -> (BitString, BitString) {
            (p1.clone(), p2.clone())
        }

        fn mutate<R: Rng>(&self, ind: &BitString, _rate: f64, _rng: &mut R) -> BitString {
            self.parent_fitness.lock().unwrap().push(ind.fitness);
            BitString {
                bits: vec![false; self.n],
                fitness: f64::NEG_INFINITY,
            }
        }
    }

    #[test]
    fn test_elites_survive_with_their_fitness() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_elite_ratio(0.2)
            .with_tournament_size(20)
            .with_crossover_rate(0.0)
            .with_seed(42)
            .with_parallel(false);
        let problem = DecayProblem::new(16);

        let result = GaRunner::run(&problem, &config).unwrap();
        let initial_best = result.fitness_history[0];

        assert_eq!(result.generations, 10);
        assert!(initial_best > 0.0);
        assert_eq!(result.best_fitness, initial_best);
        assert!(result.fitness_history.iter().all(|&f| f == initial_best));

        // Only offspring are evaluated; elites carry their fitness over.
        let elite_count = config.elite_count();
        assert_eq!(elite_count, 4);
        assert_eq!(
            problem.evaluations.load(Ordering::Relaxed),
            20 + 10 * (20 - elite_count)
        );

        // A full-population tournament always finds the top elite again.
        let parents = problem.parent_fitness.lock().unwrap();
        assert_eq!(parents.len(), 10 * (20 - elite_count));
        assert!(parents.iter().all(|&f| f == initial_best));
    }

    #[test]
    fn test_deadline_stops_slow_search() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(10_000)
            .with_time_limit_ms(5)
            .with_seed(42)
            .with_parallel(false);
        let problem = DecayProblem::slow(8, 2);

        let result = GaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.termination, Termination::Deadline);
        assert!(result.generations < 10_000);
        assert_eq!(result.fitness_history.len(), result.generations + 1);
    }

    #[test]
    fn test_onemax_convergence() {
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(200)
            .with_mutation_rate(0.02)
            .with_seed(42)
            .with_parallel(false);

        let result = GaRunner::run(&onemax(30), &config).unwrap();

        assert!(
            result.best_fitness >= 25.0,
            "expected fitness >= 25 for 30-bit OneMax, got {}",
            result.best_fitness
        );
    }

    #[test]
    fn test_early_termination_when_solved() {
        let problem = OneMaxProblem {
            n: 8,
            stop_when_full: true,
        };
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(500)
            .with_mutation_rate(0.05)
            .with_seed(42)
            .with_parallel(false);

        let result = GaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.termination, Termination::Solved);
        assert!(result.generations < 500);
        assert_eq!(result.best_fitness, 8.0);
    }

    #[test]
    fn test_best_ever_is_monotone() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(60)
            .with_mutation_rate(0.3)
            .with_seed(7)
            .with_parallel(false);

        let result = GaRunner::run(&onemax(16), &config).unwrap();

        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best-ever fitness must never decrease: {} < {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_fitness_history_length() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_seed(42)
            .with_parallel(false);

        let result = GaRunner::run(&onemax(200), &config).unwrap();

        assert_eq!(result.termination, Termination::Budget);
        assert_eq!(result.generations, 30);
        assert_eq!(result.fitness_history.len(), 31);
    }

    #[test]
    fn test_mutation_rate_reaches_ceiling() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(201)
            .with_seed(1)
            .with_parallel(false);

        let result = GaRunner::run(&onemax(300), &config).unwrap();

        assert!((result.final_mutation_rate - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(40)
            .with_seed(99)
            .with_parallel(false);

        let a = GaRunner::run(&onemax(24), &config).unwrap();
        let b = GaRunner::run(&onemax(24), &config).unwrap();
        assert_eq!(a.best.bits, b.best.bits);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = GaConfig::default().with_population_size(1);
        let err = GaRunner::run(&onemax(4), &config).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidConfig(_)));
    }

    #[test]
    fn test_cancellation() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10_000)
            .with_parallel(false);

        let cancel = Arc::new(AtomicBool::new(true));
        let mut rng = create_rng(42);
        let result =
            GaRunner::run_with_rng(&onemax(500), &config, &mut rng, Some(cancel)).unwrap();

        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_parallel_evaluation() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(50)
            .with_mutation_rate(0.02)
            .with_seed(42)
            .with_parallel(true);

        let result = GaRunner::run(&onemax(20), &config).unwrap();

        assert!(
            result.best_fitness >= 15.0,
            "parallel should find reasonable solution, got {}",
            result.best_fitness
        );
    }
}
