//! Gene and chromosome encoding.
//!
//! # Encoding
//!
//! A [`Chromosome`] holds exactly one [`Gene`] per [`ClassSpec`], and gene
//! `i` always belongs to class spec `i`. Positional correspondence is the
//! only way to recover a gene's spec: two sessions can share every field
//! (same professor, room and hour), so matching by value would attribute
//! one session's metrics to another.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ClassSpec, CourseId, Day, Hour, ProfessorId, RoomId};
use crate::error::{Result, TimetableError};

/// One room/time/professor assignment for a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gene {
    /// Course of the session.
    pub course_id: CourseId,
    /// Teaching professor.
    pub professor_id: ProfessorId,
    /// Assigned room.
    pub room_id: RoomId,
    /// Day of week.
    pub day: Day,
    /// Start hour (inclusive).
    pub start_hour: Hour,
    /// End hour (exclusive).
    pub end_hour: Hour,
}

impl Gene {
    /// Creates a gene, checking that the interval is non-empty.
    ///
    /// # Errors
    /// Returns [`TimetableError::InvalidInput`] unless `end_hour > start_hour`.
    pub fn new(
        course_id: CourseId,
        professor_id: ProfessorId,
        room_id: RoomId,
        day: Day,
        start_hour: Hour,
        end_hour: Hour,
    ) -> Result<Self> {
        if end_hour <= start_hour {
            return Err(TimetableError::InvalidInput(format!(
                "gene for course {course_id}: end {end_hour} must be after start {start_hour}"
            )));
        }
        Ok(Self::placed(
            course_id,
            professor_id,
            room_id,
            day,
            start_hour,
            end_hour,
        ))
    }

    /// Unchecked constructor for operators that derive the interval from a
    /// validated [`ClassSpec`].
    pub(crate) fn placed(
        course_id: CourseId,
        professor_id: ProfessorId,
        room_id: RoomId,
        day: Day,
        start_hour: Hour,
        end_hour: Hour,
    ) -> Self {
        debug_assert!(end_hour > start_hour);
        Self {
            course_id,
            professor_id,
            room_id,
            day,
            start_hour,
            end_hour,
        }
    }

    /// Session length in hours.
    pub fn duration(&self) -> Hour {
        self.end_hour - self.start_hour
    }

    /// Clock hours occupied by the session.
    pub fn hours(&self) -> Range<Hour> {
        self.start_hour..self.end_hour
    }

    /// Copy of this gene in another room.
    pub fn with_room(self, room_id: RoomId) -> Self {
        Self { room_id, ..self }
    }

    /// Copy of this gene on another day.
    pub fn with_day(self, day: Day) -> Self {
        Self { day, ..self }
    }

    /// Copy of this gene moved to `start_hour`, keeping its duration.
    pub fn with_start(self, start_hour: Hour) -> Self {
        let duration = self.duration();
        Self {
            start_hour,
            end_hour: start_hour + duration,
            ..self
        }
    }
}

/// A complete candidate timetable: one gene per class spec, in spec order.
///
/// Carries the fitness assigned by the last evaluation
/// (`f64::NEG_INFINITY` until evaluated).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chromosome {
    genes: Vec<Gene>,
    #[cfg_attr(feature = "serde", serde(skip, default = "unevaluated"))]
    pub(crate) fitness: f64,
}

#[cfg(feature = "serde")]
fn unevaluated() -> f64 {
    f64::NEG_INFINITY
}

impl Chromosome {
    /// Wraps a gene vector as an unevaluated chromosome.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: f64::NEG_INFINITY,
        }
    }

    /// Genes in class-spec order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Consumes the chromosome, returning its genes.
    pub fn into_genes(self) -> Vec<Gene> {
        self.genes
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Fitness from the last evaluation.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Pairs each gene with the class spec at the same position.
    ///
    /// # Panics
    /// Panics if `classes` and the chromosome differ in length.
    pub fn with_specs<'a>(
        &'a self,
        classes: &'a [ClassSpec],
    ) -> impl Iterator<Item = (&'a ClassSpec, &'a Gene)> + 'a {
        assert_eq!(
            classes.len(),
            self.genes.len(),
            "chromosome length must equal class spec count"
        );
        classes.iter().zip(self.genes.iter())
    }

    /// Returns a new chromosome with gene `index` replaced.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn with_gene(&self, index: usize, gene: Gene) -> Self {
        let mut genes = self.genes.clone();
        genes[index] = gene;
        Self::new(genes)
    }
}

impl FromIterator<Gene> for Chromosome {
    fn from_iter<T: IntoIterator<Item = Gene>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_rejects_empty_interval() {
        assert!(Gene::new(1, 1, 1, 0, 10, 10).is_err());
        assert!(Gene::new(1, 1, 1, 0, 10, 11).is_ok());
    }

    #[test]
    fn test_gene_copies() {
        let g = Gene::placed(1, 2, 3, 4, 8, 10);
        let moved = g.with_start(13);
        assert_eq!((moved.start_hour, moved.end_hour), (13, 15));
        assert_eq!(g.with_room(9).room_id, 9);
        assert_eq!(g.with_day(6).day, 6);
        // original untouched
        assert_eq!(g, Gene::placed(1, 2, 3, 4, 8, 10));
        assert_eq!(g.hours().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    fn test_positional_mapping_with_identical_genes() {
        // Two sessions with identical genes but different specs.
        let classes = vec![
            ClassSpec::new(1, "A", 5, 1).unwrap().with_ac_preference(true),
            ClassSpec::new(1, "A", 5, 1).unwrap().with_ac_preference(false),
        ];
        let gene = Gene::placed(1, 5, 100, 1, 9, 10);
        let chromosome = Chromosome::new(vec![gene, gene]);

        let prefs: Vec<bool> = chromosome
            .with_specs(&classes)
            .map(|(spec, _)| spec.prefers_ac)
            .collect();
        assert_eq!(prefs, vec![true, false]);
    }

    #[test]
    fn test_with_gene_is_copy_on_write() {
        let base = Chromosome::new(vec![Gene::placed(1, 1, 1, 0, 8, 9); 3]);
        let child = base.with_gene(1, Gene::placed(1, 1, 2, 0, 8, 9));
        assert_eq!(base.genes()[1].room_id, 1);
        assert_eq!(child.genes()[1].room_id, 2);
        assert_eq!(child.fitness(), f64::NEG_INFINITY);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_with_gene_out_of_range_panics() {
        let base = Chromosome::new(vec![Gene::placed(1, 1, 1, 0, 8, 9); 2]);
        let _ = base.with_gene(2, Gene::placed(1, 1, 2, 0, 8, 9));
    }

    #[test]
    #[should_panic(expected = "chromosome length must equal class spec count")]
    fn test_with_specs_length_mismatch_panics() {
        let classes = vec![ClassSpec::new(1, "A", 5, 1).unwrap()];
        let chromosome = Chromosome::new(vec![]);
        let _ = chromosome.with_specs(&classes).count();
    }
}
