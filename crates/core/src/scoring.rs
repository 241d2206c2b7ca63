use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use types::{Course, Room};

fn default_location_bonus() -> f64 {
    1.0
}
fn default_penalty() -> f64 {
    10.0
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    #[serde(default = "default_location_bonus")]
    pub location_bonus: f64,
    #[serde(default = "default_penalty")]
    pub infeasible_penalty: f64,
    #[serde(default = "default_penalty")]
    pub unplaced_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            location_bonus: default_location_bonus(),
            infeasible_penalty: default_penalty(),
            unplaced_penalty: default_penalty(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Scores {
    pub preference_total: f64,
    pub location_matches: i64,
    pub infeasible_placements: i64,
    pub duplicate_placements: i64,
    pub unplaced: i64,
    pub objective: f64,
}

/// Reference scorer used by [`crate::Catalog`].
///
/// Sums the preference of every course sitting in a feasible slot, adds a
/// bonus per preferred-location match and subtracts penalties for courses in
/// infeasible slots and for courses missing from the grid. A course found in
/// more than one cell only counts once; the extra copies are penalized as
/// infeasible.
pub fn compute_scores(
    courses: &[Course],
    rooms: &[Room],
    schedule: &Schedule,
    weights: &ScoreWeights,
) -> Scores {
    let mut seen = vec![false; courses.len()];
    let mut s = Scores::default();

    for (cell, ci) in schedule.placements() {
        let c = match courses.get(ci) {
            Some(c) => c,
            None => continue,
        };
        if seen[ci] {
            s.duplicate_placements += 1;
            s.infeasible_placements += 1;
            continue;
        }
        seen[ci] = true;

        if !c.is_feasible(cell.slot) {
            s.infeasible_placements += 1;
            continue;
        }
        s.preference_total += c.preference(cell.slot);
        if rooms
            .get(cell.room)
            .is_some_and(|r| r.serves(&c.preferred_location))
        {
            s.location_matches += 1;
        }
    }

    s.unplaced = seen.iter().filter(|p| !**p).count() as i64;
    s.objective = s.preference_total + weights.location_bonus * s.location_matches as f64
        - weights.infeasible_penalty * s.infeasible_placements as f64
        - weights.unplaced_penalty * s.unplaced as f64;
    s
}
