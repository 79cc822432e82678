use super::World;
use crate::cell::{Cell, CellState};
use rand::Rng;

impl World {
    /// Spawn one offspring into the first Dead neighbor of `(x, y)`.
    ///
    /// The caller checks the energy threshold. Returns the offspring's
    /// position, or `None` when the neighborhood is full.
    pub(crate) fn try_reproduce(&mut self, x: usize, y: usize) -> Option<(usize, usize)> {
        let parent = self.grid.get(x, y).copied().filter(Cell::is_live)?;
        let (cx, cy) = self.grid.first_dead_neighbor(x, y)?;

        let state = match parent.state {
            CellState::Warrior
                if self
                    .rng
                    .random_bool(self.config.warrior_demotion_probability) =>
            {
                CellState::Alive
            }
            state => state,
        };
        let child = Cell {
            direction: parent.direction,
            ..Cell::spawn(state, self.config.offspring_energy)
        };
        self.grid.set(cx, cy, child);
        if let Some(parent) = self.grid.get_mut(x, y) {
            parent.drain(self.config.reproduction_cost);
        }
        self.events_last_step.offspring += 1;
        Some((cx, cy))
    }
}
