use super::World;
use crate::cell::CellState;
use crate::grid::Grid;

/// Result of a cell's combat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackResult {
    Hit { target: (usize, usize), killed: bool },
    NoTarget,
    OnCooldown,
}

/// Warriors hit anything alive; other kinds only hit a different kind.
pub fn is_valid_target(attacker: CellState, target: CellState) -> bool {
    target.is_live() && (attacker == CellState::Warrior || attacker != target)
}

/// First valid target within `range`, scanning rings of increasing
/// Chebyshev distance and each ring row by row.
pub fn find_target(
    grid: &Grid,
    x: usize,
    y: usize,
    attacker: CellState,
    range: u32,
) -> Option<(usize, usize)> {
    // Rings past the far edge of the grid are empty.
    let span = grid.width().max(grid.height()) as isize;
    let range = (range as isize).min(span);
    for ring in 1..=range {
        for dy in -ring..=ring {
            for dx in -ring..=ring {
                if dx.abs().max(dy.abs()) != ring {
                    continue;
                }
                let Some((nx, ny)) = grid.offset(x, y, dx, dy) else {
                    continue;
                };
                if grid
                    .get(nx, ny)
                    .is_some_and(|c| is_valid_target(attacker, c.state))
                {
                    return Some((nx, ny));
                }
            }
        }
    }
    None
}

impl World {
    /// One combat turn for the cell at `(x, y)`.
    pub(crate) fn try_attack(&mut self, x: usize, y: usize) -> AttackResult {
        let Some(attacker) = self.grid.get(x, y).copied() else {
            return AttackResult::NoTarget;
        };
        let Some(profile) = self.config.attack_profile(attacker.state) else {
            return AttackResult::NoTarget;
        };
        if attacker.attack_cooldown > 0 {
            if let Some(cell) = self.grid.get_mut(x, y) {
                cell.attack_cooldown -= 1;
            }
            return AttackResult::OnCooldown;
        }

        let Some(target) = find_target(&self.grid, x, y, attacker.state, profile.range) else {
            return AttackResult::NoTarget;
        };
        let killed = self
            .grid
            .get_mut(target.0, target.1)
            .is_some_and(|victim| victim.drain(profile.damage));
        let cooldown = if attacker.state == CellState::Warrior {
            self.config.warrior_cooldown
        } else {
            self.config.regular_cooldown
        };
        if let Some(cell) = self.grid.get_mut(x, y) {
            cell.energy = cell.energy.saturating_add(profile.energy_gain);
            cell.attack_cooldown = cooldown;
        }
        if killed {
            self.events_last_step.kills += 1;
            log::trace!(
                "{:?} at ({x}, {y}) killed cell at ({}, {})",
                attacker.state,
                target.0,
                target.1
            );
        }
        AttackResult::Hit { target, killed }
    }
}
