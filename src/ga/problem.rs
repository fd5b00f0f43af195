//! Timetabling GA problem definition.
//!
//! Implements [`GaProblem`] for [`Chromosome`]s over a [`TimetableInput`],
//! bridging the domain model to the generational loop.

use rand::Rng;

use super::config::GaConfig;
use super::operators::{mutate, random_chromosome, uniform_crossover};
use super::types::{GaProblem, Individual};
use crate::fitness::{evaluate, is_conflict_free, FitnessWeights};
use crate::model::{Chromosome, TimetableInput};

impl Individual for Chromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// GA problem for room/time assignment.
///
/// Fitness is the weighted composite of [`crate::fitness`]; the search
/// stops early once the best chromosome is fully conflict-free.
///
/// # Example
/// ```no_run
/// use u_timetable::ga::{GaConfig, GaRunner, TimetableProblem};
/// # fn input() -> u_timetable::model::TimetableInput { unimplemented!() }
///
/// let input = input();
/// let config = GaConfig::default().with_seed(42);
/// let problem = TimetableProblem::new(&input, &config);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// println!("best fitness {}", result.best_fitness);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem<'a> {
    input: &'a TimetableInput,
    weights: FitnessWeights,
    ac_bias: f64,
}

impl<'a> TimetableProblem<'a> {
    /// Creates a problem with default fitness weights.
    pub fn new(input: &'a TimetableInput, config: &GaConfig) -> Self {
        Self {
            input,
            weights: FitnessWeights::default(),
            ac_bias: config.ac_bias,
        }
    }

    /// Overrides the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// The input being scheduled.
    pub fn input(&self) -> &'a TimetableInput {
        self.input
    }

    /// Fitness weights in use.
    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }
}

impl GaProblem for TimetableProblem<'_> {
    type Individual = Chromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Chromosome {
        random_chromosome(self.input, self.ac_bias, rng)
    }

    fn evaluate(&self, individual: &Chromosome) -> f64 {
        evaluate(self.input, individual, &self.weights).fitness
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        uniform_crossover(parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&self, individual: &Chromosome, rate: f64, rng: &mut R) -> Chromosome {
        mutate(self.input, individual, rate, self.ac_bias, rng)
    }

    fn is_solved(&self, individual: &Chromosome) -> bool {
        is_conflict_free(individual)
    }
}
