//! Lifecycle transition rules shared by both rule sets.

use crate::cell::{Cell, CellState};
use crate::config::{Ruleset, SimConfig};
use crate::grid::NeighborCensus;
use rand::Rng;

/// Live-neighbor band inside which a cell pays no isolation penalty.
pub const SURVIVAL_BAND: std::ops::RangeInclusive<u8> = 2..=3;
pub const BIRTH_NEIGHBORS: u8 = 3;

/// Compute the next-generation value of `cell` from its neighborhood.
///
/// Age grows by one while the state is unchanged and restarts at zero on any
/// state change. Cells that end up Dead are returned as [`Cell::dead`].
pub fn next_cell<R: Rng + ?Sized>(
    config: &SimConfig,
    cell: &Cell,
    census: NeighborCensus,
    rng: &mut R,
) -> Cell {
    let mut next = match config.ruleset {
        Ruleset::Energy => energy_transition(config, cell, census.live(), rng),
        Ruleset::Classic => classic_transition(config, cell, census),
    };
    if next.is_live() {
        next.age = if next.state == cell.state {
            cell.age.saturating_add(1)
        } else {
            0
        };
    }
    next.has_moved = false;
    next
}

fn energy_transition<R: Rng + ?Sized>(
    config: &SimConfig,
    cell: &Cell,
    live_neighbors: u8,
    rng: &mut R,
) -> Cell {
    if !cell.is_live() {
        if live_neighbors == BIRTH_NEIGHBORS {
            let state = if rng.random_bool(config.mutation_probability) {
                CellState::Mutated
            } else {
                CellState::Alive
            };
            return Cell::spawn(state, config.initial_energy);
        }
        return Cell::dead();
    }

    let mut next = *cell;
    if next.drain(config.upkeep_cost) {
        return next;
    }
    if !SURVIVAL_BAND.contains(&live_neighbors) && next.drain(config.isolation_penalty) {
        return next;
    }

    if next.energy > config.warrior_threshold
        && rng.random_bool(config.warrior_promotion_probability)
    {
        next.state = CellState::Warrior;
    } else if rng.random_bool(config.mutation_probability) {
        next.state = CellState::Mutated;
    }
    next
}

/// The earlier rule set: pure neighbor counting, Warriors count as Alive.
fn classic_transition(config: &SimConfig, cell: &Cell, census: NeighborCensus) -> Cell {
    let alive = census.alive + census.warrior;
    match cell.state {
        CellState::Dead => {
            if alive == BIRTH_NEIGHBORS {
                Cell::spawn(CellState::Alive, config.initial_energy)
            } else {
                Cell::dead()
            }
        }
        CellState::Alive | CellState::Warrior => {
            if !SURVIVAL_BAND.contains(&alive) {
                Cell::dead()
            } else if census.mutated > 1 {
                Cell {
                    state: CellState::Mutated,
                    ..*cell
                }
            } else {
                *cell
            }
        }
        CellState::Mutated => {
            if alive == BIRTH_NEIGHBORS {
                Cell {
                    state: CellState::Alive,
                    ..*cell
                }
            } else {
                *cell
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn census(alive: u8) -> NeighborCensus {
        NeighborCensus {
            alive,
            ..NeighborCensus::default()
        }
    }

    fn quiet_config() -> SimConfig {
        SimConfig {
            mutation_probability: 0.0,
            warrior_promotion_probability: 0.0,
            upkeep_cost: 2,
            isolation_penalty: 5,
            ..SimConfig::default()
        }
    }

    #[test]
    fn isolated_cell_pays_upkeep_and_penalty() {
        let config = quiet_config();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let cell = Cell {
            age: 3,
            ..Cell::spawn(CellState::Alive, 100)
        };
        let next = next_cell(&config, &cell, census(0), &mut rng);
        assert_eq!(next.state, CellState::Alive);
        assert_eq!(next.energy, 93);
        assert_eq!(next.age, 4);
    }

    #[test]
    fn band_cell_pays_only_upkeep() {
        let config = quiet_config();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let next = next_cell(
            &config,
            &Cell::spawn(CellState::Mutated, 100),
            census(2),
            &mut rng,
        );
        assert_eq!(next.energy, 98);
        assert_eq!(next.state, CellState::Mutated);
    }

    #[test]
    fn upkeep_exhaustion_kills() {
        let config = quiet_config();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let next = next_cell(
            &config,
            &Cell::spawn(CellState::Alive, 2),
            census(3),
            &mut rng,
        );
        assert_eq!(next, Cell::dead());
    }

    #[test]
    fn penalty_exhaustion_kills() {
        let config = quiet_config();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let next = next_cell(
            &config,
            &Cell::spawn(CellState::Warrior, 7),
            census(5),
            &mut rng,
        );
        assert_eq!(next, Cell::dead());
    }

    #[test]
    fn certain_promotion_requires_threshold() {
        let config = SimConfig {
            warrior_promotion_probability: 1.0,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let rich = Cell {
            age: 8,
            ..Cell::spawn(CellState::Alive, config.warrior_threshold + 50)
        };
        let promoted = next_cell(&config, &rich, census(2), &mut rng);
        assert_eq!(promoted.state, CellState::Warrior);
        assert_eq!(promoted.age, 0);

        let poor = Cell::spawn(CellState::Alive, config.warrior_threshold);
        assert_eq!(
            next_cell(&config, &poor, census(2), &mut rng).state,
            CellState::Alive
        );
    }

    #[test]
    fn dead_cell_with_three_neighbors_is_born() {
        let config = quiet_config();
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let born = next_cell(&config, &Cell::dead(), census(3), &mut rng);
        assert_eq!(born.state, CellState::Alive);
        assert_eq!(born.energy, config.initial_energy);
        assert_eq!(born.age, 0);
        assert_eq!(
            next_cell(&config, &Cell::dead(), census(2), &mut rng),
            Cell::dead()
        );
    }

    #[test]
    fn birth_mutation_rate_tracks_configuration() {
        let config = SimConfig {
            mutation_probability: 0.1,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(2024);
        let trials = 20_000;
        let mutated = (0..trials)
            .filter(|_| {
                next_cell(&config, &Cell::dead(), census(3), &mut rng).state
                    == CellState::Mutated
            })
            .count();
        let rate = mutated as f64 / trials as f64;
        assert!((rate - 0.1).abs() < 0.01, "empirical rate {rate}");
    }

    #[test]
    fn surviving_cell_mutates_and_restarts_age() {
        let config = SimConfig {
            mutation_probability: 1.0,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(8);
        let cell = Cell {
            age: 12,
            ..Cell::spawn(CellState::Alive, 100)
        };
        let next = next_cell(&config, &cell, census(2), &mut rng);
        assert_eq!(next.state, CellState::Mutated);
        assert_eq!(next.age, 0);
        assert_eq!(next.energy, 98);
    }

    #[test]
    fn warrior_below_threshold_can_mutate() {
        let config = SimConfig {
            mutation_probability: 1.0,
            warrior_promotion_probability: 1.0,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(9);
        let warrior = Cell {
            age: 4,
            ..Cell::spawn(CellState::Warrior, config.warrior_threshold)
        };
        let next = next_cell(&config, &warrior, census(2), &mut rng);
        assert_eq!(next.state, CellState::Mutated);
        assert_eq!(next.age, 0);
    }

    #[test]
    fn promotion_wins_over_mutation() {
        let config = SimConfig {
            mutation_probability: 1.0,
            warrior_promotion_probability: 1.0,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(10);
        let rich = Cell::spawn(CellState::Alive, config.warrior_threshold + 10);
        assert_eq!(
            next_cell(&config, &rich, census(3), &mut rng).state,
            CellState::Warrior
        );
    }

    #[test]
    fn survival_mutation_rate_tracks_configuration() {
        let config = SimConfig {
            mutation_probability: 0.1,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(77);
        let cell = Cell::spawn(CellState::Alive, 100);
        let trials = 20_000;
        let mutated = (0..trials)
            .filter(|_| next_cell(&config, &cell, census(2), &mut rng).state == CellState::Mutated)
            .count();
        let rate = mutated as f64 / trials as f64;
        assert!((rate - 0.1).abs() < 0.01, "empirical rate {rate}");
    }

    #[test]
    fn promotion_rate_tracks_configuration() {
        let config = SimConfig {
            warrior_promotion_probability: 0.2,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(78);
        let cell = Cell::spawn(CellState::Alive, config.warrior_threshold + 100);
        let trials = 20_000;
        let promoted = (0..trials)
            .filter(|_| next_cell(&config, &cell, census(3), &mut rng).state == CellState::Warrior)
            .count();
        let rate = promoted as f64 / trials as f64;
        assert!((rate - 0.2).abs() < 0.015, "empirical rate {rate}");
    }

    #[test]
    fn classic_rules_follow_neighbor_counts() {
        let config = SimConfig {
            ruleset: Ruleset::Classic,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let alive = Cell::spawn(CellState::Alive, 1);

        let lonely = next_cell(&config, &alive, census(1), &mut rng);
        assert_eq!(lonely, Cell::dead());

        let crowded_by_mutants = NeighborCensus {
            alive: 2,
            mutated: 2,
            warrior: 0,
        };
        assert_eq!(
            next_cell(&config, &alive, crowded_by_mutants, &mut rng).state,
            CellState::Mutated
        );

        let mutant = Cell::spawn(CellState::Mutated, 1);
        assert_eq!(
            next_cell(&config, &mutant, census(3), &mut rng).state,
            CellState::Alive
        );
        assert_eq!(
            next_cell(&config, &mutant, census(0), &mut rng).state,
            CellState::Mutated
        );

        let warrior_parents = NeighborCensus {
            alive: 1,
            mutated: 0,
            warrior: 2,
        };
        assert_eq!(
            next_cell(&config, &Cell::dead(), warrior_parents, &mut rng).state,
            CellState::Alive
        );
    }

    #[test]
    fn classic_rules_leave_energy_untouched() {
        let config = SimConfig {
            ruleset: Ruleset::Classic,
            ..quiet_config()
        };
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        let cell = Cell::spawn(CellState::Alive, 40);
        let next = next_cell(&config, &cell, census(2), &mut rng);
        assert_eq!(next.energy, 40);
        assert_eq!(next.age, 1);
    }
}
