//! Fixed-size cell storage with a scratch buffer for the next generation.

use crate::cell::{Cell, CellState};
use std::collections::TryReserveError;

/// Offsets of the Moore neighborhood in row-major scan order.
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Live neighbors split by kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborCensus {
    pub alive: u8,
    pub mutated: u8,
    pub warrior: u8,
}

impl NeighborCensus {
    pub fn live(&self) -> u8 {
        self.alive + self.mutated + self.warrior
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    scratch: Vec<Cell>,
}

impl Grid {
    /// Allocate both buffers up front; nothing is handed out on failure.
    pub fn new(width: usize, height: usize) -> Result<Self, TryReserveError> {
        let len = width.saturating_mul(height);
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.resize(len, Cell::dead());
        let mut scratch = Vec::new();
        scratch.try_reserve_exact(len)?;
        scratch.resize(len, Cell::dead());
        Ok(Self {
            width,
            height,
            cells,
            scratch,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of the live buffer.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        self.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Write a cell. Out-of-range positions are ignored; returns whether the
    /// write happened.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn scratch_set(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.scratch[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Replace the live grid with the scratch buffer in one move.
    pub fn swap_with_scratch(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.scratch);
    }

    /// Step from `(x, y)` by `(dx, dy)`, returning `None` when the result
    /// falls off the grid.
    pub fn offset(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// Move the full attribute set at `from` into `to`. Whatever occupied
    /// `to` is discarded and `from` becomes a Dead cell.
    pub fn relocate(&mut self, from: (usize, usize), to: (usize, usize)) -> bool {
        let (Some(src), Some(dst)) = (self.index(from.0, from.1), self.index(to.0, to.1)) else {
            return false;
        };
        if src == dst {
            return false;
        }
        let mover = std::mem::replace(&mut self.cells[src], Cell::dead());
        self.cells[dst] = mover;
        true
    }

    /// Clear the per-generation movement flag on every cell.
    pub fn reset_moved_flags(&mut self) {
        for cell in &mut self.cells {
            cell.has_moved = false;
        }
    }

    /// Count non-Dead cells in the Moore neighborhood of `(x, y)`.
    pub fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
            .filter(|&(nx, ny)| self.cells[ny * self.width + nx].is_live())
            .count() as u8
    }

    pub fn neighbor_census(&self, x: usize, y: usize) -> NeighborCensus {
        let mut census = NeighborCensus::default();
        for (nx, ny) in MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
        {
            match self.cells[ny * self.width + nx].state {
                CellState::Dead => {}
                CellState::Alive => census.alive += 1,
                CellState::Mutated => census.mutated += 1,
                CellState::Warrior => census.warrior += 1,
            }
        }
        census
    }

    /// First Dead position in the 3×3 block around `(x, y)`, scanning rows
    /// top to bottom.
    pub fn first_dead_neighbor(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        MOORE_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.offset(x, y, dx, dy))
            .find(|&(nx, ny)| !self.cells[ny * self.width + nx].is_live())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(state: CellState) -> Cell {
        Cell::spawn(state, 10)
    }

    #[test]
    fn out_of_range_access_is_a_no_op() {
        let mut grid = Grid::new(4, 3).unwrap();
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 3).is_none());
        assert!(!grid.set(10, 10, live(CellState::Alive)));
        assert!(grid.cells().iter().all(|c| !c.is_live()));
        assert_eq!(grid.len(), 12);
    }

    #[test]
    fn offset_rejects_negative_and_overflowing_steps() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.offset(0, 0, -1, 0), None);
        assert_eq!(grid.offset(2, 2, 1, 0), None);
        assert_eq!(grid.offset(1, 1, 1, -1), Some((2, 0)));
    }

    #[test]
    fn corner_counts_only_in_range_neighbors() {
        let mut grid = Grid::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                grid.set(x, y, live(CellState::Alive));
            }
        }
        assert_eq!(grid.live_neighbors(0, 0), 3);
        assert_eq!(grid.live_neighbors(1, 0), 5);
        assert_eq!(grid.live_neighbors(1, 1), 8);
    }

    #[test]
    fn census_splits_by_kind() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(0, 0, live(CellState::Alive));
        grid.set(1, 0, live(CellState::Mutated));
        grid.set(2, 0, live(CellState::Mutated));
        grid.set(0, 1, live(CellState::Warrior));
        grid.set(1, 1, live(CellState::Alive));
        let census = grid.neighbor_census(1, 1);
        assert_eq!(
            census,
            NeighborCensus {
                alive: 1,
                mutated: 2,
                warrior: 1
            }
        );
        assert_eq!(census.live(), grid.live_neighbors(1, 1));
    }

    #[test]
    fn swap_installs_scratch_contents() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(0, 0, live(CellState::Alive));
        grid.scratch_set(1, 1, live(CellState::Mutated));
        grid.swap_with_scratch();
        assert!(!grid.get(0, 0).unwrap().is_live());
        assert_eq!(grid.get(1, 1).unwrap().state, CellState::Mutated);
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn relocate_discards_occupant_and_vacates_origin() {
        let mut grid = Grid::new(3, 1).unwrap();
        let mover = Cell {
            age: 4,
            ..Cell::spawn(CellState::Warrior, 70)
        };
        grid.set(0, 0, mover);
        grid.set(1, 0, live(CellState::Alive));
        assert!(grid.relocate((0, 0), (1, 0)));
        assert_eq!(*grid.get(1, 0).unwrap(), mover);
        assert_eq!(*grid.get(0, 0).unwrap(), Cell::dead());
        assert!(!grid.relocate((1, 0), (1, 0)));
    }

    #[test]
    fn first_dead_neighbor_follows_scan_order() {
        let mut grid = Grid::new(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                grid.set(x, y, live(CellState::Alive));
            }
        }
        assert_eq!(grid.first_dead_neighbor(1, 1), None);
        grid.set(2, 2, Cell::dead());
        grid.set(0, 1, Cell::dead());
        assert_eq!(grid.first_dead_neighbor(1, 1), Some((0, 1)));
    }
}
