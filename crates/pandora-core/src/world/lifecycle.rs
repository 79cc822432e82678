use super::metrics::{StepEvents, StepTimings};
use super::{Statistics, World};
use crate::config::Ruleset;
use crate::rules;
use std::time::Instant;

impl World {
    /// Reproduction-or-combat turn for every live cell in row-major order.
    /// A cell above the reproduction threshold never fights, even when it
    /// has nowhere to place an offspring; its cooldown still ticks down.
    pub(crate) fn step_interaction_phase(&mut self) {
        let threshold = self.config.reproduction_threshold;
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let Some(cell) = self.grid.get(x, y).copied() else {
                    continue;
                };
                if !cell.is_live() {
                    continue;
                }
                if cell.energy > threshold {
                    self.try_reproduce(x, y);
                    if let Some(parent) = self.grid.get_mut(x, y) {
                        parent.attack_cooldown = parent.attack_cooldown.saturating_sub(1);
                    }
                } else {
                    self.try_attack(x, y);
                }
            }
        }
    }

    /// Compute every cell's next value from the grid as it stands now,
    /// writing into the scratch buffer so no update is visible to later
    /// cells in the scan.
    pub(crate) fn step_transition_phase(&mut self) -> Statistics {
        let mut stats = Statistics {
            generation: self.statistics.generation,
            ..Statistics::default()
        };
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let Some(cell) = self.grid.get(x, y).copied() else {
                    continue;
                };
                let census = self.grid.neighbor_census(x, y);
                let next = rules::next_cell(&self.config, &cell, census, &mut self.rng);
                match (cell.is_live(), next.is_live()) {
                    (false, true) => self.events_last_step.births += 1,
                    (true, false) => self.events_last_step.deaths += 1,
                    _ => {}
                }
                stats.tally(next.state);
                self.grid.scratch_set(x, y, next);
            }
        }
        stats
    }

    /// Advance one generation: movement, reproduction/combat, transition,
    /// then swap in the new grid and bump the generation counter.
    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.events_last_step = StepEvents::default();
        self.grid.reset_moved_flags();
        let full_economy = self.config.ruleset == Ruleset::Energy;

        let t0 = Instant::now();
        if full_economy {
            self.step_movement_phase();
        }
        let movement_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        if full_economy {
            self.step_interaction_phase();
        }
        let interaction_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        let mut stats = self.step_transition_phase();
        self.grid.swap_with_scratch();
        stats.generation = self.statistics.generation.saturating_add(1);
        self.statistics = stats;
        self.total_events += self.events_last_step;
        let transition_us = t2.elapsed().as_micros() as u64;

        log::debug!(
            "generation {}: alive={} mutated={} warrior={} dead={} kills={} offspring={}",
            stats.generation,
            stats.alive,
            stats.mutated,
            stats.warrior,
            stats.dead,
            self.events_last_step.kills,
            self.events_last_step.offspring
        );

        StepTimings {
            movement_us,
            interaction_us,
            transition_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }
}
