//! Simulated annealing over whole-grid candidates.
//!
//! Every step clones the current schedule, perturbs the clone with the
//! configured [`MoveOperator`] and accepts it by the Metropolis rule.
//! Temperature is multiplied by the cooling rate every `cooling_interval`
//! steps, starting with step 0, and the run stops early once it drops to
//! `min_temperature`.

use crate::moves::{operator_for, MoveOperator};
use rand::{Rng, RngCore};
use sched_core::{AnnealParams, Deadline, SchedulingProblem, Schedule};
use serde_json::json;
use tracing::{debug, info};

/// Starting temperature for a grid of `cells` cells: larger grids start hotter.
pub fn initial_temperature(cells: usize) -> f64 {
    (cells as f64 * 0.5).max(1.0)
}

/// Size-tiered cooling rate: slower cooling for smaller grids.
pub fn scaled_cooling_rate(cells: usize) -> f64 {
    let mut rate = 0.3;
    if cells < 1_000 {
        rate += 0.1;
    }
    if cells < 10_000 {
        rate += 0.1;
    }
    rate
}

/// Metropolis rule. Improvements are always taken; otherwise the move is
/// taken with probability `exp(delta / temperature)`.
pub fn metropolis_accept(delta: f64, temperature: f64, rng: &mut dyn RngCore) -> bool {
    if delta > 0.0 {
        return true;
    }
    let p: f64 = rng.gen();
    (delta / temperature).exp() > p
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    StepsExhausted,
    Frozen,
    DeadlineReached,
}

#[derive(Clone, Debug)]
pub struct AnnealReport {
    pub best: Schedule,
    pub best_score: f64,
    pub current: Schedule,
    pub current_score: f64,
    pub steps: u32,
    pub accepted: u32,
    pub improving: u32,
    pub final_temperature: f64,
    pub stop: StopReason,
}

impl AnnealReport {
    pub fn stats(&self) -> serde_json::Value {
        json!({
            "steps": self.steps,
            "accepted": self.accepted,
            "improving": self.improving,
            "final_temperature": self.final_temperature,
            "best": self.best_score,
            "stop": format!("{:?}", self.stop),
        })
    }
}

pub struct Annealer {
    params: AnnealParams,
    operator: Box<dyn MoveOperator>,
}

impl Annealer {
    pub fn new(params: AnnealParams) -> Self {
        let operator = operator_for(params.move_kind);
        Self { params, operator }
    }

    /// Replaces the move operator picked from `params.move_kind`.
    pub fn with_operator(mut self, operator: Box<dyn MoveOperator>) -> Self {
        self.operator = operator;
        self
    }

    pub fn refine(
        &self,
        problem: &dyn SchedulingProblem,
        seed: Schedule,
        deadline: &Deadline,
        rng: &mut dyn RngCore,
    ) -> AnnealReport {
        let p = &self.params;
        let cells = seed.cell_count();
        let mut temperature = p.initial_temperature.unwrap_or_else(|| initial_temperature(cells));
        let cooling = p.cooling_rate.unwrap_or_else(|| scaled_cooling_rate(cells));
        let interval = p.cooling_interval.max(1);

        let mut current_score = problem.evaluate(&seed);
        let mut best = seed.clone();
        let mut best_score = current_score;
        let mut current = seed;
        let mut steps = 0u32;
        let mut accepted = 0u32;
        let mut improving = 0u32;
        let mut stop = StopReason::StepsExhausted;

        info!(
            operator = self.operator.name(),
            temperature,
            cooling,
            score = current_score,
            "annealing started"
        );

        for step in 0..p.steps {
            if deadline.is_expired() {
                stop = StopReason::DeadlineReached;
                break;
            }
            if step % interval == 0 {
                temperature *= cooling;
            }
            if temperature <= p.min_temperature {
                stop = StopReason::Frozen;
                break;
            }

            let next = self.operator.propose(&current, problem, rng);
            let next_score = problem.evaluate(&next);
            let delta = next_score - current_score;
            steps += 1;

            if metropolis_accept(delta, temperature, rng) {
                accepted += 1;
                if delta > 0.0 {
                    improving += 1;
                }
                current = next;
                current_score = next_score;
                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                    debug!(step, score = best_score, temperature, "new best");
                }
            }
        }

        info!(steps, accepted, improving, best = best_score, ?stop, "annealing finished");
        AnnealReport {
            best,
            best_score,
            current,
            current_score,
            steps,
            accepted,
            improving,
            final_temperature: temperature,
            stop,
        }
    }
}
