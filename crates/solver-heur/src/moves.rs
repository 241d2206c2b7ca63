//! Neighbourhood moves for the annealing refiner.
//!
//! A move never touches the schedule it is given: it returns a fresh copy
//! with the perturbation applied.

use rand::{Rng, RngCore};
use sched_core::{Cell, MoveKind, SchedulingProblem, Schedule};

pub trait MoveOperator {
    fn name(&self) -> &'static str;

    fn propose(
        &self,
        current: &Schedule,
        problem: &dyn SchedulingProblem,
        rng: &mut dyn RngCore,
    ) -> Schedule;
}

pub fn operator_for(kind: MoveKind) -> Box<dyn MoveOperator> {
    match kind {
        MoveKind::BlindSwap => Box::new(BlindSwap),
        MoveKind::GreedyPairSwap => Box::new(GreedyPairSwap),
    }
}

/// Exchanges the contents of two uniformly drawn cells.
///
/// Both cells may be empty or even the same cell; such a move is a no-op.
/// Cell contents are only permuted, never created or dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlindSwap;

impl MoveOperator for BlindSwap {
    fn name(&self) -> &'static str {
        "blind_swap"
    }

    fn propose(
        &self,
        current: &Schedule,
        _problem: &dyn SchedulingProblem,
        rng: &mut dyn RngCore,
    ) -> Schedule {
        let mut next = current.clone();
        if next.cell_count() == 0 {
            return next;
        }
        let a = Cell {
            room: rng.gen_range(0..next.rooms()),
            slot: rng.gen_range(0..next.slots()),
        };
        let b = Cell {
            room: rng.gen_range(0..next.rooms()),
            slot: rng.gen_range(0..next.slots()),
        };
        let _ = next.swap(a, b);
        next
    }
}

/// Walks occupied cells in row-major order two at a time and swaps the first
/// pair whose exchange raises their combined timeslot preference.
///
/// Deterministic; at most one swap per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPairSwap;

impl MoveOperator for GreedyPairSwap {
    fn name(&self) -> &'static str {
        "greedy_pair_swap"
    }

    fn propose(
        &self,
        current: &Schedule,
        problem: &dyn SchedulingProblem,
        _rng: &mut dyn RngCore,
    ) -> Schedule {
        let mut next = current.clone();
        let courses = problem.courses();
        let occupied: Vec<(Cell, usize)> = current
            .placements()
            .filter(|&(_, ci)| ci < courses.len())
            .collect();

        for pair in occupied.chunks_exact(2) {
            let (a, ca) = pair[0];
            let (b, cb) = pair[1];
            let (ca, cb) = (&courses[ca], &courses[cb]);
            let now = ca.preference(a.slot) + cb.preference(b.slot);
            let swapped = ca.preference(b.slot) + cb.preference(a.slot);
            if swapped > now {
                let _ = next.swap(a, b);
                break;
            }
        }
        next
    }
}
