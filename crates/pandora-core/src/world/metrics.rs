use super::World;
use crate::cell::{Cell, CellState};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub movement_us: u64,
    pub interaction_us: u64,
    pub transition_us: u64,
    pub total_us: u64,
}

/// Per-state population counts plus the generation index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub generation: u64,
    pub alive: usize,
    pub mutated: usize,
    pub warrior: usize,
    pub dead: usize,
}

impl Statistics {
    pub fn from_cells(generation: u64, cells: &[Cell]) -> Self {
        let mut stats = Self {
            generation,
            ..Self::default()
        };
        for cell in cells {
            stats.tally(cell.state);
        }
        stats
    }

    pub(crate) fn tally(&mut self, state: CellState) {
        match state {
            CellState::Dead => self.dead += 1,
            CellState::Alive => self.alive += 1,
            CellState::Mutated => self.mutated += 1,
            CellState::Warrior => self.warrior += 1,
        }
    }

    pub fn live(&self) -> usize {
        self.alive + self.mutated + self.warrior
    }

    pub fn total(&self) -> usize {
        self.live() + self.dead
    }

    pub fn is_extinct(&self) -> bool {
        self.live() == 0
    }
}

/// Event counters for a generation (or accumulated over a run).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepEvents {
    /// Dead cells brought to life by the transition rule.
    pub births: usize,
    /// Live cells that the transition rule turned Dead.
    pub deaths: usize,
    pub kills: usize,
    pub offspring: usize,
    /// Relocations onto an occupied cell.
    pub displacements: usize,
    pub stagnation_deaths: usize,
}

impl AddAssign for StepEvents {
    fn add_assign(&mut self, rhs: Self) {
        self.births += rhs.births;
        self.deaths += rhs.deaths;
        self.kills += rhs.kills;
        self.offspring += rhs.offspring;
        self.displacements += rhs.displacements;
        self.stagnation_deaths += rhs.stagnation_deaths;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub generation: u64,
    pub alive: usize,
    pub mutated: usize,
    pub warrior: usize,
    pub dead: usize,
    pub energy_mean: f32,
    pub energy_std: f32,
    pub age_mean: f32,
    pub max_age: u32,
    pub stagnation_mean: f32,
    #[serde(flatten)]
    pub events: StepEvents,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub generations: usize,
    pub sample_every: usize,
    pub final_statistics: Statistics,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub totals: StepEvents,
    /// First generation at which no live cell remained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extinct_at: Option<u64>,
}

impl World {
    /// Summarize the grid as of the last completed generation.
    pub fn collect_step_metrics(&self) -> StepMetrics {
        let stats = self.statistics;
        let live = stats.live();
        let denom = live.max(1) as f32;

        let mut energy_sum = 0.0f32;
        let mut age_sum = 0.0f32;
        let mut stagnation_sum = 0.0f32;
        let mut max_age = 0u32;
        let mut energies = Vec::with_capacity(live);
        for cell in self.grid.cells().iter().filter(|c| c.is_live()) {
            energy_sum += cell.energy as f32;
            age_sum += cell.age as f32;
            stagnation_sum += cell.stagnant_cycles as f32;
            max_age = max_age.max(cell.age);
            energies.push(cell.energy as f32);
        }
        let energy_mean = energy_sum / denom;
        let energy_std = if energies.len() < 2 {
            0.0
        } else {
            let var = energies
                .iter()
                .map(|e| (e - energy_mean).powi(2))
                .sum::<f32>()
                / (energies.len() - 1) as f32;
            var.sqrt()
        };

        StepMetrics {
            generation: stats.generation,
            alive: stats.alive,
            mutated: stats.mutated,
            warrior: stats.warrior,
            dead: stats.dead,
            energy_mean,
            energy_std,
            age_mean: age_sum / denom,
            max_age,
            stagnation_mean: stagnation_sum / denom,
            events: self.events_last_step,
        }
    }
}
