//! Timetable genetic operators.
//!
//! All operators work positionally: gene `i` of every chromosome they
//! produce still belongs to class spec `i`. They never edit a chromosome
//! in place; each returns a fresh value.
//!
//! # Initialization
//!
//! - [`random_gene`]: pinned specs keep their day/time and only draw a
//!   room; unpinned specs draw a day, a feasible start hour and a room
//! - [`pick_room`]: AC-biased room draw
//!
//! # Crossover
//!
//! - [`uniform_crossover`]: per-position coin flip between parents
//!
//! # Mutation
//!
//! - [`mutate`]: per-gene rate gate; pinned genes change room only,
//!   unpinned genes perturb exactly one of time, room or day

use rand::Rng;

use crate::model::{Chromosome, Gene, RoomId, TimetableInput};

/// Draws a room for a session.
///
/// AC-preferring sessions draw from the AC rooms with probability
/// `ac_bias` (when any exist); every other draw is uniform over all rooms.
pub fn pick_room<R: Rng>(
    input: &TimetableInput,
    prefers_ac: bool,
    ac_bias: f64,
    rng: &mut R,
) -> RoomId {
    let ac_rooms = input.ac_rooms();
    if prefers_ac && !ac_rooms.is_empty() && rng.random_bool(ac_bias) {
        ac_rooms[rng.random_range(0..ac_rooms.len())]
    } else {
        let rooms = input.rooms();
        rooms[rng.random_range(0..rooms.len())].id
    }
}

/// Creates a random feasible gene for class spec `index`.
///
/// # Panics
/// Panics if `index` is out of range.
pub fn random_gene<R: Rng>(
    input: &TimetableInput,
    index: usize,
    ac_bias: f64,
    rng: &mut R,
) -> Gene {
    let spec = &input.classes()[index];
    let (day, start, end) = match spec.pinned {
        Some(slot) => (slot.day, slot.start_hour, slot.end_hour),
        None => {
            let day = rng.random_range(0..input.days());
            let start = rng.random_range(input.start_hours(spec.duration));
            (day, start, start + spec.duration)
        }
    };
    let room = pick_room(input, spec.prefers_ac, ac_bias, rng);
    Gene::placed(spec.course_id, spec.professor_id, room, day, start, end)
}

/// Creates a random chromosome: one [`random_gene`] per class spec.
pub fn random_chromosome<R: Rng>(input: &TimetableInput, ac_bias: f64, rng: &mut R) -> Chromosome {
    (0..input.classes().len())
        .map(|i| random_gene(input, i, ac_bias, rng))
        .collect()
}

/// Uniform crossover.
///
/// For every position, child 1 takes the gene of one parent and child 2
/// the gene of the other, with equal probability.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn uniform_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );

    let n = parent1.len();
    let mut child1 = Vec::with_capacity(n);
    let mut child2 = Vec::with_capacity(n);
    for (&g1, &g2) in parent1.genes().iter().zip(parent2.genes()) {
        if rng.random_bool(0.5) {
            child1.push(g1);
            child2.push(g2);
        } else {
            child1.push(g2);
            child2.push(g1);
        }
    }
    (Chromosome::new(child1), Chromosome::new(child2))
}

/// Dimension perturbed by an unpinned mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    Time,
    Room,
    Day,
}

/// Mutates a single gene belonging to class spec `index`.
pub fn mutate_gene<R: Rng>(
    input: &TimetableInput,
    index: usize,
    gene: Gene,
    ac_bias: f64,
    rng: &mut R,
) -> Gene {
    let spec = &input.classes()[index];
    if spec.is_pinned() {
        return gene.with_room(pick_room(input, spec.prefers_ac, ac_bias, rng));
    }

    let kind = match rng.random_range(0..3) {
        0 => MutationKind::Time,
        1 => MutationKind::Room,
        _ => MutationKind::Day,
    };
    match kind {
        MutationKind::Time => gene.with_start(rng.random_range(input.start_hours(gene.duration()))),
        MutationKind::Room => gene.with_room(pick_room(input, spec.prefers_ac, ac_bias, rng)),
        MutationKind::Day => gene.with_day(rng.random_range(0..input.days())),
    }
}

/// Returns a mutated copy of `chromosome`.
///
/// Each gene is independently mutated with probability `rate`.
pub fn mutate<R: Rng>(
    input: &TimetableInput,
    chromosome: &Chromosome,
    rate: f64,
    ac_bias: f64,
    rng: &mut R,
) -> Chromosome {
    chromosome
        .genes()
        .iter()
        .enumerate()
        .map(|(i, &gene)| {
            if rng.random::<f64>() < rate {
                mutate_gene(input, i, gene, ac_bias, rng)
            } else {
                gene
            }
        })
        .collect()
}
