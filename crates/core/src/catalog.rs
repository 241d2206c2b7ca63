use crate::problem::SchedulingProblem;
use crate::schedule::Schedule;
use crate::scoring::{compute_scores, ScoreWeights, Scores};
use types::{Course, Room};

/// In-memory instance scored with [`compute_scores`].
#[derive(Clone, Debug)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub rooms: Vec<Room>,
    pub slot_count: usize,
    pub weights: ScoreWeights,
}

impl Catalog {
    /// Slot count is taken from the longest preference vector.
    pub fn new(courses: Vec<Course>, rooms: Vec<Room>) -> Self {
        let slot_count = courses
            .iter()
            .map(|c| c.time_slot_values.len())
            .max()
            .unwrap_or(0);
        Self::with_slots(courses, rooms, slot_count)
    }

    pub fn with_slots(courses: Vec<Course>, rooms: Vec<Room>, slot_count: usize) -> Self {
        Self {
            courses,
            rooms,
            slot_count,
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn scores(&self, schedule: &Schedule) -> Scores {
        compute_scores(&self.courses, &self.rooms, schedule, &self.weights)
    }
}

impl SchedulingProblem for Catalog {
    fn courses(&self) -> &[Course] {
        &self.courses
    }

    fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn evaluate(&self, schedule: &Schedule) -> f64 {
        self.scores(schedule).objective
    }
}
