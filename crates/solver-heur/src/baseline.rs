use rand::seq::SliceRandom;
use rand::RngCore;
use sched_core::{Cell, SchedulingProblem, Schedule};

/// Single pass in catalog order: each course takes the first vacant cell of
/// its earliest feasible slot that still has room. Deterministic; courses
/// with nowhere to go are left out.
pub fn naive_baseline(problem: &dyn SchedulingProblem) -> Schedule {
    let mut schedule = problem.empty_schedule();
    let rooms = problem.rooms().len();

    for (ci, c) in problem.courses().iter().enumerate() {
        let cell = c
            .feasible_slots()
            .take_while(|&slot| slot < schedule.slots())
            .find_map(|slot| {
                (0..rooms)
                    .map(|room| Cell { room, slot })
                    .find(|&cell| schedule.is_vacant(cell))
            });
        if let Some(cell) = cell {
            schedule.try_place(cell, ci);
        }
    }
    schedule
}

/// Puts each course into a uniformly chosen vacant cell among its feasible slots.
pub fn random_seed(problem: &dyn SchedulingProblem, rng: &mut dyn RngCore) -> Schedule {
    let mut schedule = problem.empty_schedule();
    let rooms = problem.rooms().len();

    for (ci, c) in problem.courses().iter().enumerate() {
        let vacant: Vec<Cell> = c
            .feasible_slots()
            .take_while(|&slot| slot < schedule.slots())
            .flat_map(|slot| (0..rooms).map(move |room| Cell { room, slot }))
            .filter(|&cell| schedule.is_vacant(cell))
            .collect();
        if let Some(&cell) = vacant.choose(rng) {
            schedule.try_place(cell, ci);
        }
    }
    schedule
}
