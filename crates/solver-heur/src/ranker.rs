//! Variable ordering for the constructive solvers.
//!
//! Courses are ranked by conflict degree: the number of feasible timeslots
//! they share with every course in the catalog (themselves included). The
//! course with the highest degree is placed first; ties go to the lower index.
//! Alongside the ordering a per-course constraint counter is maintained.

use sched_core::{Assignment, Course};

/// Shared feasible timeslots for every ordered pair of courses.
#[derive(Clone, Debug)]
pub struct OverlapTable {
    n: usize,
    shared: Vec<usize>,
}

impl OverlapTable {
    /// Only slots below `slots` are counted.
    pub fn build(courses: &[Course], slots: usize) -> Self {
        let n = courses.len();
        let masks: Vec<Vec<bool>> = courses
            .iter()
            .map(|c| (0..slots).map(|t| c.is_feasible(t)).collect())
            .collect();

        let mut shared = vec![0usize; n * n];
        for i in 0..n {
            for j in i..n {
                let k = masks[i]
                    .iter()
                    .zip(&masks[j])
                    .filter(|(a, b)| **a && **b)
                    .count();
                shared[i * n + j] = k;
                shared[j * n + i] = k;
            }
        }
        Self { n, shared }
    }

    pub fn shared(&self, a: usize, b: usize) -> usize {
        if a < self.n && b < self.n {
            self.shared[a * self.n + b]
        } else {
            0
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Remaining-constraint counter per course.
///
/// Starts at `1 + feasible slots` and only ever goes down as selected courses
/// consume shared slots. Owned and threaded by value through the search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConstraintCounts(Vec<i64>);

impl ConstraintCounts {
    pub fn build(courses: &[Course], slots: usize) -> Self {
        Self(
            courses
                .iter()
                .map(|c| 1 + (0..slots).filter(|&t| c.is_feasible(t)).count() as i64)
                .collect(),
        )
    }

    pub fn get(&self, course: usize) -> Option<i64> {
        self.0.get(course).copied()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Charges every other course for the slots it shares with `selected`.
    #[must_use]
    pub fn consume(mut self, selected: usize, overlap: &OverlapTable) -> Self {
        for (other, count) in self.0.iter_mut().enumerate() {
            if other != selected {
                *count -= overlap.shared(selected, other) as i64;
            }
        }
        self
    }
}

#[derive(Clone, Debug)]
pub struct ConstraintRanker {
    overlap: OverlapTable,
    degrees: Vec<usize>,
}

impl ConstraintRanker {
    pub fn new(courses: &[Course], slots: usize) -> Self {
        let overlap = OverlapTable::build(courses, slots);
        let degrees = (0..overlap.len())
            .map(|i| (0..overlap.len()).map(|j| overlap.shared(i, j)).sum())
            .collect();
        Self { overlap, degrees }
    }

    pub fn overlap(&self) -> &OverlapTable {
        &self.overlap
    }

    pub fn conflict_degree(&self, course: usize) -> usize {
        self.degrees.get(course).copied().unwrap_or(0)
    }

    /// Highest-degree unassigned course; the first one wins ties.
    pub fn most_constraining(&self, assignment: &Assignment) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for ci in assignment.unassigned() {
            let degree = self.conflict_degree(ci);
            if best.map_or(true, |(_, d)| d < degree) {
                best = Some((ci, degree));
            }
        }
        best.map(|(ci, _)| ci)
    }

    /// Picks the next course and returns the counters updated for that pick.
    pub fn select(
        &self,
        assignment: &Assignment,
        counts: ConstraintCounts,
    ) -> (Option<usize>, ConstraintCounts) {
        match self.most_constraining(assignment) {
            Some(ci) => (Some(ci), counts.consume(ci, &self.overlap)),
            None => (None, counts),
        }
    }
}
