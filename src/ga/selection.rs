//! Parent selection.
//!
//! Tournament selection: draw `k` distinct individuals uniformly at random
//! and keep the fittest. Larger `k` means stronger selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::types::Individual;
use rand::seq::index;
use rand::Rng;

/// Selects a parent index by tournament.
///
/// Members are drawn **without replacement**; `k` is clamped to
/// `1..=population.len()`. Ties keep the member drawn first.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );

    let n = population.len();
    let k = k.clamp(1, n);

    let mut members = index::sample(rng, n, k).into_iter();
    let mut best_idx = members.next().expect("k >= 1");
    for idx in members {
        if population[idx].fitness() > population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone)]
    struct TestInd {
        fit: f64,
    }

    impl Individual for TestInd {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fit
        }
        fn set_fitness(&mut self, f: f64) {
            self.fit = f;
        }
    }

    fn make_population(fitnesses: &[f64]) -> Vec<TestInd> {
        fitnesses.iter().map(|&f| TestInd { fit: f }).collect()
    }

    #[test]
    fn test_full_tournament_always_picks_best() {
        // Without replacement, k = n sees every member.
        let pop = make_population(&[10.0, 5.0, 99.0, 8.0]);
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            assert_eq!(tournament(&pop, 4, &mut rng), 2);
        }
    }

    #[test]
    fn test_oversized_tournament_clamped() {
        let pop = make_population(&[1.0, 3.0, 2.0]);
        let mut rng = create_rng(42);
        assert_eq!(tournament(&pop, 5, &mut rng), 1);
    }

    #[test]
    fn test_tournament_favors_fitter() {
        let pop = make_population(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let mut rng = create_rng(7);

        let mut counts = [0u32; 8];
        let n = 10000;
        for _ in 0..n {
            counts[tournament(&pop, 3, &mut rng)] += 1;
        }
        // Any 3 distinct members include one fitter than both of the two worst.
        assert_eq!(counts[0], 0);
        assert_eq!(counts[1], 0);
        assert!(
            counts[7] > counts[2],
            "best should win more often: {counts:?}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let pop = make_population(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            counts[tournament(&pop, 1, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);
        assert_eq!(tournament(&pop, 5, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<TestInd> = vec![];
        let mut rng = create_rng(42);
        tournament(&pop, 3, &mut rng);
    }
}
