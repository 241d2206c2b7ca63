pub mod assignment;
pub mod catalog;
pub mod deadline;
pub mod problem;
pub mod schedule;
pub mod scoring;

use serde::Serialize;
use thiserror::Error;

pub use assignment::Assignment;
pub use catalog::Catalog;
pub use deadline::Deadline;
pub use problem::SchedulingProblem;
pub use schedule::{Cell, Schedule, ScheduleError};
pub use types::{
    AnnealParams, Course, CourseId, LocationId, MoveKind, PlacementMode, Room, RoomId,
    SearchParams, SeederKind, Strategy,
};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid catalog: {0}")]
    Msg(String),
    #[error("invalid search params: {0}")]
    Params(String),
}

pub fn validate(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();

    if catalog.slot_count == 0 && !catalog.courses.is_empty() {
        errors.push("courses present but slot_count is 0".into());
    }

    fn chk_unique<I: ToString>(name: &str, ids: impl Iterator<Item = I>, errors: &mut Vec<String>) {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for id in ids {
            let s = id.to_string();
            if !seen.insert(s.clone()) {
                errors.push(format!("duplicate {name} id: {s}"));
            }
        }
    }
    chk_unique("course", catalog.courses.iter().map(|c| &c.id.0), &mut errors);
    chk_unique("room", catalog.rooms.iter().map(|r| &r.id.0), &mut errors);

    for c in &catalog.courses {
        if c.time_slot_values.len() > catalog.slot_count {
            errors.push(format!(
                "course {} has {} slot values but the grid has {} slots",
                c.id,
                c.time_slot_values.len(),
                catalog.slot_count
            ));
        }
        if let Some(t) = c.time_slot_values.iter().position(|v| !v.is_finite()) {
            errors.push(format!("course {} has non-finite value at slot {t}", c.id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Msg(errors.join("; ")))
    }
}

pub fn validate_params(params: &SearchParams) -> Result<(), ValidationError> {
    let a = &params.anneal;
    let mut errors: Vec<String> = Vec::new();

    if let Some(rate) = a.cooling_rate {
        if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
            errors.push(format!("coolingRate must be in (0, 1], got {rate}"));
        }
    }
    if a.cooling_interval == 0 {
        errors.push("coolingInterval must be positive".into());
    }
    if !a.min_temperature.is_finite() {
        errors.push("minTemperature must be finite".into());
    }
    if let Some(t) = a.initial_temperature {
        if !(t.is_finite() && t > 0.0) {
            errors.push(format!("initialTemperature must be positive, got {t}"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Params(errors.join("; ")))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Complete,
    Partial,
}

/// Result of one solver run. Always carries a schedule, even a partial one.
#[derive(Clone, Debug, Serialize)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub objective: f64,
    pub placed: usize,
    pub total: usize,
    pub schedule: Schedule,
    pub stats: serde_json::Value,
}

impl SearchOutcome {
    pub fn new(problem: &dyn SchedulingProblem, schedule: Schedule, stats: serde_json::Value) -> Self {
        let total = problem.courses().len();
        let placed = Assignment::from_schedule(&schedule, total).placed_count();
        Self {
            status: if placed == total {
                SearchStatus::Complete
            } else {
                SearchStatus::Partial
            },
            objective: problem.evaluate(&schedule),
            placed,
            total,
            schedule,
            stats,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }
}

pub trait Solver {
    fn solve(&self, problem: &dyn SchedulingProblem, deadline: Deadline) -> SearchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, values: &[f64]) -> Course {
        Course {
            id: id.into(),
            time_slot_values: values.to_vec(),
            preferred_location: "x".into(),
        }
    }

    fn room(id: &str) -> Room {
        Room {
            id: id.into(),
            location: "x".into(),
        }
    }

    #[test]
    fn valid_catalog_passes() {
        let cat = Catalog::new(vec![course("a", &[1.0, 0.0])], vec![room("r")]);
        assert_eq!(cat.slot_count, 2);
        assert!(validate(&cat).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let cat = Catalog::with_slots(
            vec![course("a", &[1.0, f64::INFINITY, 2.0]), course("a", &[1.0])],
            vec![room("r"), room("r")],
            2,
        );
        let msg = validate(&cat).unwrap_err().to_string();
        assert!(msg.contains("duplicate course id: a"), "{msg}");
        assert!(msg.contains("duplicate room id: r"), "{msg}");
        assert!(msg.contains("3 slot values"), "{msg}");
        assert!(msg.contains("non-finite value at slot 1"), "{msg}");
    }

    #[test]
    fn empty_catalog_is_valid() {
        assert!(validate(&Catalog::new(vec![], vec![])).is_ok());
    }

    #[test]
    fn rejects_bad_anneal_params() {
        let mut p = SearchParams::default();
        assert!(validate_params(&p).is_ok());
        p.anneal.cooling_rate = Some(1.5);
        p.anneal.cooling_interval = 0;
        let msg = validate_params(&p).unwrap_err().to_string();
        assert!(msg.contains("coolingRate"), "{msg}");
        assert!(msg.contains("coolingInterval"), "{msg}");
    }

    #[test]
    fn outcome_reports_completeness() {
        let cat = Catalog::new(vec![course("a", &[1.0]), course("b", &[1.0])], vec![room("r")]);
        let mut s = cat.empty_schedule();
        s.place(Cell::new(0, 0), 0).unwrap();
        let out = SearchOutcome::new(&cat, s, serde_json::json!({}));
        assert_eq!(out.status, SearchStatus::Partial);
        assert_eq!((out.placed, out.total), (1, 2));
        assert!(!out.is_complete());
    }
}
