use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Dead,
    Alive,
    Mutated,
    Warrior,
}

impl CellState {
    pub fn is_live(self) -> bool {
        self != CellState::Dead
    }
}

/// One grid slot. Stored inline in the grid's backing `Vec`; death is a state
/// value, never a removal.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Cell {
    pub state: CellState,
    /// Generations survived in the current state.
    pub age: u32,
    pub energy: i32,
    /// Unit-length momentum vector (or zero for a fresh cell).
    pub direction: [f32; 2],
    pub attack_cooldown: u32,
    pub stagnant_cycles: u32,
    /// Set once the cell relocates during the current generation.
    pub has_moved: bool,
}

impl Cell {
    /// The canonical Dead value: every counter zeroed.
    pub const fn dead() -> Self {
        Self {
            state: CellState::Dead,
            age: 0,
            energy: 0,
            direction: [0.0, 0.0],
            attack_cooldown: 0,
            stagnant_cycles: 0,
            has_moved: false,
        }
    }

    /// A freshly spawned live cell.
    pub fn spawn(state: CellState, energy: i32) -> Self {
        debug_assert!(state.is_live(), "spawned cells must be live");
        Self {
            state,
            energy,
            ..Self::dead()
        }
    }

    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Subtract `amount` from energy, switching to Dead the moment energy
    /// reaches zero or below. Returns `true` if the cell died.
    pub fn drain(&mut self, amount: i32) -> bool {
        self.energy = self.energy.saturating_sub(amount);
        if self.energy <= 0 {
            *self = Self::dead();
            return true;
        }
        false
    }

    pub fn view(&self) -> CellView {
        CellView {
            state: self.state,
            age: self.age,
            energy: self.energy,
        }
    }
}

/// Read-only projection handed to the rendering shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub state: CellState,
    pub age: u32,
    pub energy: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_to_zero_kills_and_resets_counters() {
        let mut cell = Cell {
            age: 9,
            stagnant_cycles: 3,
            attack_cooldown: 2,
            ..Cell::spawn(CellState::Warrior, 10)
        };
        assert!(cell.drain(10));
        assert_eq!(cell, Cell::dead());
    }

    #[test]
    fn drain_above_zero_keeps_state() {
        let mut cell = Cell::spawn(CellState::Mutated, 10);
        assert!(!cell.drain(4));
        assert_eq!(cell.state, CellState::Mutated);
        assert_eq!(cell.energy, 6);
    }

    #[test]
    fn default_cell_is_dead() {
        assert_eq!(Cell::default(), Cell::dead());
        assert!(!Cell::default().is_live());
    }
}
