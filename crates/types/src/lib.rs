use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, Eq, PartialEq, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}
id_newtype!(CourseId);
id_newtype!(RoomId);
id_newtype!(LocationId);

/// A course to be placed into exactly one (room, timeslot) cell.
///
/// `time_slot_values[t]` is the preference for timeslot `t`. Non-positive
/// values (and slots past the end of the vector) are infeasible.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub time_slot_values: Vec<f64>,
    pub preferred_location: LocationId,
}

impl Course {
    pub fn preference(&self, slot: usize) -> f64 {
        self.time_slot_values.get(slot).copied().unwrap_or(0.0)
    }

    pub fn is_feasible(&self, slot: usize) -> bool {
        self.preference(slot) > 0.0
    }

    /// Feasible timeslots in ascending order.
    pub fn feasible_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.time_slot_values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(t, _)| t)
    }

    pub fn feasible_count(&self) -> usize {
        self.feasible_slots().count()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub location: LocationId,
}

impl Room {
    pub fn serves(&self, location: &LocationId) -> bool {
        &self.location == location
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Backtrack,
    Baseline,
    #[default]
    Annealing,
}

/// Where the annealing run gets its starting schedule.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SeederKind {
    #[default]
    Backtrack,
    Baseline,
    Random,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Commit each placement for good; stop at the first course that does not fit.
    #[default]
    Greedy,
    /// Undo placements on dead ends and retry the next candidate cell.
    Backtracking,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    #[default]
    BlindSwap,
    GreedyPairSwap,
}

fn default_steps() -> u32 {
    100
}
fn default_cooling_rate() -> Option<f64> {
    Some(0.3)
}
fn default_cooling_interval() -> u32 {
    10
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnealParams {
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// `None` picks a rate from the grid size.
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: Option<f64>,
    #[serde(default = "default_cooling_interval")]
    pub cooling_interval: u32,
    #[serde(default)]
    pub min_temperature: f64,
    /// `None` derives the starting temperature from the grid size.
    #[serde(default)]
    pub initial_temperature: Option<f64>,
    #[serde(default)]
    pub move_kind: MoveKind,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            cooling_rate: default_cooling_rate(),
            cooling_interval: default_cooling_interval(),
            min_temperature: 0.0,
            initial_temperature: None,
            move_kind: MoveKind::default(),
        }
    }
}

fn default_seed() -> u64 {
    42
}
fn default_max_backtracks() -> u64 {
    100_000
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub seeder: SeederKind,
    #[serde(default)]
    pub placement: PlacementMode,
    #[serde(default = "default_max_backtracks")]
    pub max_backtracks: u64,
    #[serde(default)]
    pub anneal: AnnealParams,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            strategy: Strategy::default(),
            seeder: SeederKind::default(),
            placement: PlacementMode::default(),
            max_backtracks: default_max_backtracks(),
            anneal: AnnealParams::default(),
        }
    }
}
