//! Post-search room reassignment.
//!
//! The search only guards against professor double-booking. This pass
//! then hands out rooms greedily so that no two sessions share a room in
//! the same hour, serving AC-preferring sessions first.
//!
//! # Algorithm
//!
//! 1. Order sessions: AC-preferring first, original order otherwise (stable)
//! 2. Candidate rooms: AC rooms only for AC-preferring sessions; non-AC
//!    rooms then AC rooms for the rest
//! 3. Take the first candidate free for every hour the session spans and
//!    commit those (day, hour, room) cells
//! 4. If none is free, fall back to the first AC room (or the first room
//!    when there are no AC rooms) and accept the conflict
//!
//! The result depends only on the day/time of each gene, never on the room
//! it arrived with, so running the pass on its own output is a no-op.

use std::collections::HashSet;

use log::{debug, warn};

use crate::model::{Chromosome, Day, Gene, Hour, RoomId, TimetableInput};

/// Reassigns rooms, returning a new chromosome.
///
/// Genes keep their positions; only `room_id` changes.
///
/// # Panics
/// Panics if the chromosome length differs from the class spec count.
pub fn reassign_rooms(input: &TimetableInput, chromosome: &Chromosome) -> Chromosome {
    let classes = input.classes();
    assert_eq!(
        classes.len(),
        chromosome.len(),
        "chromosome length must equal class spec count"
    );

    let mut order: Vec<usize> = (0..chromosome.len()).collect();
    order.sort_by_key(|&i| !classes[i].prefers_ac);

    let ac_first: Vec<RoomId> = input.ac_rooms().to_vec();
    let non_ac_then_ac: Vec<RoomId> = input
        .non_ac_rooms()
        .iter()
        .chain(input.ac_rooms())
        .copied()
        .collect();
    let fallback = input
        .ac_rooms()
        .first()
        .copied()
        .unwrap_or(input.rooms()[0].id);

    let mut occupied: HashSet<(Day, Hour, RoomId)> = HashSet::new();
    let mut genes: Vec<Gene> = chromosome.genes().to_vec();
    let mut unplaced = 0usize;

    for idx in order {
        let gene = genes[idx];
        let candidates = if classes[idx].prefers_ac {
            &ac_first
        } else {
            &non_ac_then_ac
        };

        let free = candidates.iter().copied().find(|&room| {
            gene.hours()
                .all(|hour| !occupied.contains(&(gene.day, hour, room)))
        });

        let room = match free {
            Some(room) => {
                for hour in gene.hours() {
                    occupied.insert((gene.day, hour, room));
                }
                room
            }
            None => {
                unplaced += 1;
                debug!(
                    "no free room for class {idx} on day {} at {}-{}, using room {fallback}",
                    gene.day, gene.start_hour, gene.end_hour
                );
                fallback
            }
        };
        genes[idx] = gene.with_room(room);
    }

    if unplaced > 0 {
        warn!("room reassignment left {unplaced} sessions in conflicting rooms");
    }

    Chromosome::new(genes)
}

/// Counts repeated (day, hour, room) keys.
///
/// Reported informally; never part of the hard-violation count.
pub fn room_conflicts(chromosome: &Chromosome) -> usize {
    let mut seen = HashSet::new();
    let mut conflicts = 0;
    for gene in chromosome.genes() {
        for hour in gene.hours() {
            if !seen.insert((gene.day, hour, gene.room_id)) {
                conflicts += 1;
            }
        }
    }
    conflicts
}
