use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::{
    AnnealParams, Assignment, Catalog, Course, Deadline, PlacementMode, Room, Schedule,
    SchedulingProblem,
};
use solver_heur::anneal::{Annealer, StopReason};
use solver_heur::backtrack::BacktrackSolver;
use solver_heur::{naive_baseline, random_seed};

const LOCATIONS: [&str; 3] = ["north", "south", "east"];

fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (1usize..6, 0usize..4, 0usize..9)
        .prop_flat_map(|(slots, rooms, courses)| {
            let value = prop_oneof![Just(0.0), -3.0..0.0f64, 0.5..9.0f64];
            let course = (prop::collection::vec(value, slots), 0usize..3);
            (
                Just(slots),
                prop::collection::vec(course, courses),
                prop::collection::vec(0usize..3, rooms),
            )
        })
        .prop_map(|(slots, courses, rooms)| {
            let courses = courses
                .into_iter()
                .enumerate()
                .map(|(i, (values, loc))| Course {
                    id: format!("c{i}").as_str().into(),
                    time_slot_values: values,
                    preferred_location: LOCATIONS[loc].into(),
                })
                .collect();
            let rooms = rooms
                .into_iter()
                .enumerate()
                .map(|(i, loc)| Room {
                    id: format!("r{i}").as_str().into(),
                    location: LOCATIONS[loc].into(),
                })
                .collect();
            Catalog::with_slots(courses, rooms, slots)
        })
}

/// Every course appears at most once and only in a feasible slot.
fn assert_well_formed(cat: &Catalog, s: &Schedule) {
    let mut seen = vec![false; cat.courses.len()];
    for (cell, ci) in s.placements() {
        assert!(!seen[ci], "course {ci} placed twice");
        seen[ci] = true;
        assert!(cat.courses[ci].is_feasible(cell.slot));
    }
}

proptest! {
    #[test]
    fn baseline_is_deterministic(cat in arb_catalog()) {
        prop_assert_eq!(naive_baseline(&cat), naive_baseline(&cat));
    }

    #[test]
    fn constructive_runs_never_overwrite(cat in arb_catalog()) {
        assert_well_formed(&cat, &naive_baseline(&cat));

        for mode in [PlacementMode::Greedy, PlacementMode::Backtracking] {
            let run = BacktrackSolver::new(mode, 5_000).run(&cat, &Deadline::none());
            assert_well_formed(&cat, &run.schedule);
            prop_assert_eq!(
                &run.assignment,
                &Assignment::from_schedule(&run.schedule, cat.courses.len())
            );
            prop_assert_eq!(run.schedule.placed_count(), run.assignment.placed_count());
        }
    }

    #[test]
    fn undo_trail_places_at_least_as_many_as_greedy(cat in arb_catalog()) {
        let greedy = BacktrackSolver::new(PlacementMode::Greedy, 0).run(&cat, &Deadline::none());
        let undo = BacktrackSolver::new(PlacementMode::Backtracking, 5_000).run(&cat, &Deadline::none());
        prop_assert!(undo.assignment.placed_count() >= greedy.assignment.placed_count());
    }

    #[test]
    fn random_seed_never_overwrites(cat in arb_catalog(), seed in any::<u64>()) {
        let s = random_seed(&cat, &mut ChaCha8Rng::seed_from_u64(seed));
        assert_well_formed(&cat, &s);
    }

    #[test]
    fn blind_swaps_conserve_cell_contents(
        cat in arb_catalog(),
        seed in any::<u64>(),
        steps in 0u32..200,
    ) {
        let start = naive_baseline(&cat);
        let params = AnnealParams { steps, cooling_rate: Some(0.9), ..AnnealParams::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = Annealer::new(params).refine(&cat, start.clone(), &Deadline::none(), &mut rng);
        prop_assert_eq!(report.current.occupants(), start.occupants());
        prop_assert_eq!(report.best.occupants(), start.occupants());
        prop_assert!(report.best_score >= cat.evaluate(&start));
    }

    #[test]
    fn cooling_halts_within_bound(
        cat in arb_catalog(),
        steps in 0u32..500,
        rate in 0.05f64..0.95,
        interval in 1u32..20,
        t_min in 0.0f64..5.0,
    ) {
        let params = AnnealParams {
            steps,
            cooling_rate: Some(rate),
            cooling_interval: interval,
            min_temperature: t_min,
            initial_temperature: Some(10.0),
            ..AnnealParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = Annealer::new(params).refine(&cat, cat.empty_schedule(), &Deadline::none(), &mut rng);
        prop_assert!(report.steps <= steps);
        match report.stop {
            StopReason::Frozen => prop_assert!(report.final_temperature <= t_min),
            StopReason::StepsExhausted => prop_assert_eq!(report.steps, steps),
            StopReason::DeadlineReached => prop_assert!(false, "no deadline was set"),
        }
    }
}
