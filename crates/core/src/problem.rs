use crate::schedule::Schedule;
use types::{Course, Room};

/// Read-only view of a timetabling instance plus its quality oracle.
///
/// The search engine only ever reads through this trait. `evaluate` must be
/// side-effect free; higher is better.
pub trait SchedulingProblem {
    fn courses(&self) -> &[Course];

    fn rooms(&self) -> &[Room];

    fn slot_count(&self) -> usize;

    fn empty_schedule(&self) -> Schedule {
        Schedule::empty(self.rooms().len(), self.slot_count())
    }

    fn evaluate(&self, schedule: &Schedule) -> f64;
}
