//! Constructive solver driven by [`ConstraintRanker`].
//!
//! Each selected course goes to the first vacant cell in a room at its
//! preferred location, scanning feasible slots then rooms in index order. If
//! no such cell exists it takes the first vacant feasible cell anywhere.
//!
//! [`PlacementMode::Greedy`] commits every placement and stops at the first
//! course that fits nowhere. [`PlacementMode::Backtracking`] keeps an undo
//! trail and revisits earlier choices on dead ends.

use crate::ranker::{ConstraintCounts, ConstraintRanker};
use sched_core::{
    Assignment, Cell, Course, Deadline, PlacementMode, Room, Schedule, SchedulingProblem,
};
use tracing::{debug, info, warn};

fn preferred_cell(course: &Course, rooms: &[Room], schedule: &Schedule) -> Option<Cell> {
    course
        .feasible_slots()
        .take_while(|&slot| slot < schedule.slots())
        .find_map(|slot| {
            (0..rooms.len())
                .map(|room| Cell { room, slot })
                .find(|&cell| {
                    rooms[cell.room].serves(&course.preferred_location)
                        && schedule.is_vacant(cell)
                })
        })
}

fn fallback_cell(course: &Course, rooms: &[Room], schedule: &Schedule) -> Option<Cell> {
    course
        .feasible_slots()
        .take_while(|&slot| slot < schedule.slots())
        .find_map(|slot| {
            (0..rooms.len())
                .map(|room| Cell { room, slot })
                .find(|&cell| schedule.is_vacant(cell))
        })
}

/// Every vacant feasible cell for `course`, preferred-location cells first.
pub(crate) fn candidate_cells(course: &Course, rooms: &[Room], schedule: &Schedule) -> Vec<Cell> {
    let vacant: Vec<Cell> = course
        .feasible_slots()
        .take_while(|&slot| slot < schedule.slots())
        .flat_map(|slot| (0..rooms.len()).map(move |room| Cell { room, slot }))
        .filter(|&cell| schedule.is_vacant(cell))
        .collect();
    let (mut preferred, others): (Vec<Cell>, Vec<Cell>) = vacant
        .into_iter()
        .partition(|c| rooms[c.room].serves(&course.preferred_location));
    preferred.extend(others);
    preferred
}

/// Outcome of one constructive run.
#[derive(Clone, Debug)]
pub struct BacktrackRun {
    pub schedule: Schedule,
    pub assignment: Assignment,
    pub counts: ConstraintCounts,
    pub backtracks: u64,
    pub expired: bool,
}

impl BacktrackRun {
    pub fn is_complete(&self) -> bool {
        self.assignment.is_complete()
    }
}

#[derive(Clone, Debug)]
pub struct BacktrackSolver {
    mode: PlacementMode,
    max_backtracks: u64,
}

impl Default for BacktrackSolver {
    fn default() -> Self {
        Self::new(PlacementMode::Greedy, 100_000)
    }
}

impl BacktrackSolver {
    pub fn new(mode: PlacementMode, max_backtracks: u64) -> Self {
        Self {
            mode,
            max_backtracks,
        }
    }

    pub fn run(&self, problem: &dyn SchedulingProblem, deadline: &Deadline) -> BacktrackRun {
        let run = match self.mode {
            PlacementMode::Greedy => self.run_greedy(problem, deadline),
            PlacementMode::Backtracking => self.run_with_undo(problem, deadline),
        };
        info!(
            mode = ?self.mode,
            placed = run.assignment.placed_count(),
            total = run.assignment.len(),
            backtracks = run.backtracks,
            expired = run.expired,
            "constructive search finished"
        );
        run
    }

    fn run_greedy(&self, problem: &dyn SchedulingProblem, deadline: &Deadline) -> BacktrackRun {
        let courses = problem.courses();
        let rooms = problem.rooms();
        let mut schedule = problem.empty_schedule();
        let ranker = ConstraintRanker::new(courses, schedule.slots());
        let mut assignment = Assignment::new(courses.len());
        let mut counts = ConstraintCounts::build(courses, schedule.slots());
        let mut expired = false;

        while !assignment.is_complete() {
            if deadline.is_expired() {
                warn!(placed = assignment.placed_count(), "deadline reached during construction");
                expired = true;
                break;
            }
            let (selected, next_counts) = ranker.select(&assignment, counts);
            counts = next_counts;
            let Some(ci) = selected else {
                break;
            };
            let course = &courses[ci];
            let cell = preferred_cell(course, rooms, &schedule)
                .or_else(|| fallback_cell(course, rooms, &schedule));
            let Some(cell) = cell else {
                debug!(course = %course.id, "no vacant feasible cell; stopping");
                break;
            };
            if !schedule.try_place(cell, ci) {
                break;
            }
            debug!(course = %course.id, room = cell.room, slot = cell.slot, "placed");
            assignment.mark(ci);
        }

        BacktrackRun {
            schedule,
            assignment,
            counts,
            backtracks: 0,
            expired,
        }
    }

    fn run_with_undo(&self, problem: &dyn SchedulingProblem, deadline: &Deadline) -> BacktrackRun {
        struct Frame {
            course: usize,
            candidates: Vec<Cell>,
            next: usize,
            placed: Option<Cell>,
            counts_before: ConstraintCounts,
        }

        let courses = problem.courses();
        let rooms = problem.rooms();
        let mut schedule = problem.empty_schedule();
        let ranker = ConstraintRanker::new(courses, schedule.slots());
        let mut counts = ConstraintCounts::build(courses, schedule.slots());

        // Courses without any feasible cell can never be placed; treat them as
        // settled so the search targets the rest.
        let mut settled = Assignment::new(courses.len());
        for (ci, c) in courses.iter().enumerate() {
            let reachable = !rooms.is_empty() && c.feasible_slots().any(|t| t < schedule.slots());
            if !reachable {
                debug!(course = %c.id, "course has no feasible cell");
                settled.mark(ci);
            }
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut best = schedule.clone();
        let mut best_placed = 0usize;
        let mut backtracks = 0u64;
        let mut expired = false;

        'search: while !settled.is_complete() {
            if deadline.is_expired() {
                warn!(depth = stack.len(), "deadline reached during backtracking");
                expired = true;
                break;
            }

            let (selected, next_counts) = ranker.select(&settled, counts.clone());
            let Some(ci) = selected else {
                break;
            };
            stack.push(Frame {
                course: ci,
                candidates: candidate_cells(&courses[ci], rooms, &schedule),
                next: 0,
                placed: None,
                counts_before: std::mem::replace(&mut counts, next_counts),
            });

            loop {
                let Some(frame) = stack.last_mut() else {
                    debug!("search space exhausted");
                    break 'search;
                };
                if let Some(cell) = frame.placed.take() {
                    let _ = schedule.clear(cell);
                    settled.unmark(frame.course);
                }
                let found = frame.candidates[frame.next..]
                    .iter()
                    .position(|&c| schedule.is_vacant(c));
                if let Some(offset) = found {
                    let cell = frame.candidates[frame.next + offset];
                    frame.next += offset + 1;
                    if schedule.try_place(cell, frame.course) {
                        settled.mark(frame.course);
                        frame.placed = Some(cell);
                        break;
                    }
                    continue;
                }

                if backtracks >= self.max_backtracks {
                    warn!(backtracks, "backtrack budget exhausted");
                    break 'search;
                }
                backtracks += 1;
                if let Some(dead) = stack.pop() {
                    debug!(course = %courses[dead.course].id, depth = stack.len(), "dead end; undoing");
                    counts = dead.counts_before;
                }
            }

            let placed = schedule.placed_count();
            if placed > best_placed {
                best_placed = placed;
                best = schedule.clone();
            }
        }

        let schedule = if settled.is_complete() { schedule } else { best };
        let assignment = Assignment::from_schedule(&schedule, courses.len());
        BacktrackRun {
            schedule,
            assignment,
            counts,
            backtracks,
            expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sched_core::Catalog;

    fn course(id: &str, values: &[f64], loc: &str) -> Course {
        Course {
            id: id.into(),
            time_slot_values: values.to_vec(),
            preferred_location: loc.into(),
        }
    }

    fn room(id: &str, loc: &str) -> Room {
        Room {
            id: id.into(),
            location: loc.into(),
        }
    }

    fn greedy() -> BacktrackSolver {
        BacktrackSolver::new(PlacementMode::Greedy, 0)
    }

    fn undo() -> BacktrackSolver {
        BacktrackSolver::new(PlacementMode::Backtracking, 10_000)
    }

    #[test]
    fn prefers_rooms_at_preferred_location() {
        let cat = Catalog::new(
            vec![course("a", &[0.0, 2.0], "east")],
            vec![room("r0", "west"), room("r1", "east")],
        );
        let run = greedy().run(&cat, &Deadline::none());
        assert_eq!(run.schedule.locate(0), Some(Cell::new(1, 1)));
    }

    #[test]
    fn preferred_location_beats_earlier_slot() {
        // slot 0 only has a west room; the east room in slot 1 wins.
        let cat = Catalog::new(
            vec![course("a", &[1.0, 1.0], "east")],
            vec![room("r0", "west"), room("r1", "east")],
        );
        let mut s = cat.empty_schedule();
        s.place(Cell::new(1, 0), 9).unwrap();
        assert_eq!(preferred_cell(&cat.courses[0], &cat.rooms, &s), Some(Cell::new(1, 1)));
    }

    #[test]
    fn falls_back_to_any_vacant_feasible_cell() {
        let cat = Catalog::new(
            vec![course("a", &[0.0, 2.0], "nowhere")],
            vec![room("r0", "west"), room("r1", "east")],
        );
        let run = greedy().run(&cat, &Deadline::none());
        assert_eq!(run.schedule.locate(0), Some(Cell::new(0, 1)));
        assert!(run.is_complete());
    }

    #[test]
    fn candidates_list_preferred_cells_first() {
        let c = course("a", &[1.0, 1.0], "east");
        let rooms = vec![room("r0", "west"), room("r1", "east")];
        let s = Schedule::empty(2, 2);
        assert_eq!(
            candidate_cells(&c, &rooms, &s),
            vec![Cell::new(1, 0), Cell::new(1, 1), Cell::new(0, 0), Cell::new(0, 1)]
        );
    }

    #[test]
    fn greedy_gives_up_on_first_unplaceable_course() {
        // c0 (degree 2) takes the only slot-0 cell first; c1 then has nowhere to go
        // and c2 is never reached.
        let cat = Catalog::new(
            vec![
                course("flexible", &[1.0, 1.0], "x"),
                course("picky", &[1.0, 0.0], "x"),
                course("late", &[0.0, 0.0, 1.0], "x"),
            ],
            vec![room("r0", "x")],
        );
        let run = greedy().run(&cat, &Deadline::none());
        assert_eq!(run.schedule.locate(0), Some(Cell::new(0, 0)));
        assert!(!run.assignment.is_placed(1));
        assert!(!run.is_complete());
        assert_eq!(Assignment::from_schedule(&run.schedule, 3), run.assignment);
    }

    #[test]
    fn undo_trail_recovers_what_greedy_misses() {
        let cat = Catalog::new(
            vec![
                course("flexible", &[1.0, 1.0], "x"),
                course("picky", &[1.0, 0.0], "x"),
            ],
            vec![room("r0", "x")],
        );
        assert!(!greedy().run(&cat, &Deadline::none()).is_complete());

        let run = undo().run(&cat, &Deadline::none());
        assert!(run.is_complete());
        assert_eq!(run.schedule.locate(0), Some(Cell::new(0, 1)));
        assert_eq!(run.schedule.locate(1), Some(Cell::new(0, 0)));
        assert!(run.backtracks >= 1);
    }

    #[test]
    fn undo_skips_courses_without_feasible_cells() {
        let cat = Catalog::new(
            vec![course("dead", &[0.0, -1.0], "x"), course("ok", &[0.0, 1.0], "x")],
            vec![room("r0", "x")],
        );
        let run = undo().run(&cat, &Deadline::none());
        assert_eq!(run.schedule.locate(1), Some(Cell::new(0, 1)));
        assert!(!run.assignment.is_placed(0));
        assert_eq!(run.backtracks, 0);
    }

    #[test]
    fn undo_returns_best_partial_when_infeasible() {
        // three courses competing for two cells
        let cat = Catalog::new(
            vec![
                course("a", &[1.0, 1.0], "x"),
                course("b", &[1.0, 1.0], "x"),
                course("c", &[1.0, 1.0], "x"),
            ],
            vec![room("r0", "x")],
        );
        let run = undo().run(&cat, &Deadline::none());
        assert_eq!(run.assignment.placed_count(), 2);
        assert_eq!(run.schedule.placed_count(), 2);
    }

    #[test]
    fn undo_respects_backtrack_budget() {
        let cat = Catalog::new(
            vec![
                course("a", &[1.0, 1.0], "x"),
                course("b", &[1.0, 1.0], "x"),
                course("c", &[1.0, 1.0], "x"),
            ],
            vec![room("r0", "x")],
        );
        let run = BacktrackSolver::new(PlacementMode::Backtracking, 1).run(&cat, &Deadline::none());
        assert!(run.backtracks <= 1);
        assert_eq!(run.assignment.placed_count(), 2);
    }

    #[test]
    fn expired_deadline_returns_empty_partial() {
        let cat = Catalog::new(vec![course("a", &[1.0], "x")], vec![room("r0", "x")]);
        let run = greedy().run(&cat, &Deadline::from_epoch_millis(0));
        assert!(run.expired);
        assert_eq!(run.schedule.placed_count(), 0);
    }

    #[test]
    fn empty_catalog_is_trivially_complete() {
        let cat = Catalog::new(vec![], vec![]);
        for solver in [greedy(), undo()] {
            let run = solver.run(&cat, &Deadline::none());
            assert!(run.is_complete());
            assert_eq!(run.schedule.cell_count(), 0);
        }
    }
}
