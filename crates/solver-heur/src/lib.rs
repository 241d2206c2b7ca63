pub mod anneal;
pub mod backtrack;
pub mod baseline;
pub mod moves;
pub mod ranker;

use anneal::Annealer;
use backtrack::BacktrackSolver;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::{
    Assignment, Deadline, SchedulingProblem, Schedule, SearchOutcome, SearchParams, SeederKind,
    Solver, Strategy,
};
use serde_json::json;
use tracing::{info, warn};

pub use baseline::{naive_baseline, random_seed};

pub struct HeurSolver {
    params: SearchParams,
}

impl Default for HeurSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeurSolver {
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    pub fn with_params(params: SearchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    fn constructive(&self) -> BacktrackSolver {
        BacktrackSolver::new(self.params.placement, self.params.max_backtracks)
    }

    pub fn backtrack_alg(&self, problem: &dyn SchedulingProblem, deadline: Deadline) -> Schedule {
        self.constructive().run(problem, &deadline).schedule
    }

    pub fn naive_baseline(&self, problem: &dyn SchedulingProblem) -> Schedule {
        naive_baseline(problem)
    }

    pub fn simulated_annealing_alg(
        &self,
        problem: &dyn SchedulingProblem,
        deadline: Deadline,
    ) -> Schedule {
        self.anneal(problem, deadline).0
    }

    /// Starting point for annealing. A constructive run that stops short
    /// falls back to the baseline when the baseline places more courses.
    fn seed_schedule(
        &self,
        problem: &dyn SchedulingProblem,
        deadline: &Deadline,
        rng: &mut ChaCha8Rng,
    ) -> (Schedule, serde_json::Value) {
        match self.params.seeder {
            SeederKind::Baseline => (naive_baseline(problem), json!("baseline")),
            SeederKind::Random => (random_seed(problem, rng), json!("random")),
            SeederKind::Backtrack => {
                let run = self.constructive().run(problem, deadline);
                if run.is_complete() {
                    return (run.schedule, json!("backtrack"));
                }
                let baseline = naive_baseline(problem);
                let n = problem.courses().len();
                if Assignment::from_schedule(&baseline, n).placed_count()
                    > run.assignment.placed_count()
                {
                    warn!(
                        placed = run.assignment.placed_count(),
                        "constructive seed incomplete; using baseline"
                    );
                    (baseline, json!("baseline_fallback"))
                } else {
                    (run.schedule, json!("backtrack"))
                }
            }
        }
    }

    fn anneal(
        &self,
        problem: &dyn SchedulingProblem,
        deadline: Deadline,
    ) -> (Schedule, serde_json::Value) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        let (seed, seeded_by) = self.seed_schedule(problem, &deadline, &mut rng);
        let report =
            Annealer::new(self.params.anneal.clone()).refine(problem, seed, &deadline, &mut rng);
        let mut stats = report.stats();
        stats["seed"] = seeded_by;
        (report.best, stats)
    }
}

impl Solver for HeurSolver {
    fn solve(&self, problem: &dyn SchedulingProblem, deadline: Deadline) -> SearchOutcome {
        info!(
            courses = problem.courses().len(),
            rooms = problem.rooms().len(),
            slots = problem.slot_count(),
            strategy = ?self.params.strategy,
            "solve started"
        );
        match self.params.strategy {
            Strategy::Baseline => {
                let schedule = naive_baseline(problem);
                SearchOutcome::new(problem, schedule, json!({ "method": "baseline" }))
            }
            Strategy::Backtrack => {
                let run = self.constructive().run(problem, &deadline);
                let stats = json!({
                    "method": "backtrack",
                    "placement": self.params.placement,
                    "backtracks": run.backtracks,
                    "expired": run.expired,
                    "constraints": run.counts.as_slice(),
                });
                SearchOutcome::new(problem, run.schedule, stats)
            }
            Strategy::Annealing => {
                let (schedule, mut stats) = self.anneal(problem, deadline);
                stats["method"] = json!("annealing");
                SearchOutcome::new(problem, schedule, stats)
            }
        }
    }
}
