use super::World;
use crate::cell::Cell;
use crate::grid::Grid;
use rand::Rng;

const MOMENTUM: f32 = 0.7;
const FIELD_WEIGHT: f32 = 0.3;
const FIELD_RADIUS: isize = 2;
const JITTER: f32 = 0.1;
const SPEED_DIVISOR: f32 = 50.0;
const MAX_SPEED: f32 = 2.0;

/// Outcome of one relocation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Relocated { to: (usize, usize), displaced: bool },
    Blocked,
    Starved,
    Skipped,
}

/// Attraction toward Dead cells and repulsion from live ones within
/// `FIELD_RADIUS`, each term a unit vector scaled by 1/d².
pub fn attraction_field(grid: &Grid, x: usize, y: usize) -> [f32; 2] {
    let mut field = [0.0f32; 2];
    for dy in -FIELD_RADIUS..=FIELD_RADIUS {
        for dx in -FIELD_RADIUS..=FIELD_RADIUS {
            if dx == 0 && dy == 0 {
                continue;
            }
            let Some((nx, ny)) = grid.offset(x, y, dx, dy) else {
                continue;
            };
            let dist_sq = (dx * dx + dy * dy) as f32;
            let dist = dist_sq.sqrt();
            let sign = if grid.get(nx, ny).is_some_and(Cell::is_live) {
                -1.0
            } else {
                1.0
            };
            field[0] += sign * (dx as f32 / dist) / dist_sq;
            field[1] += sign * (dy as f32 / dist) / dist_sq;
        }
    }
    field
}

fn normalize(v: [f32; 2]) -> Option<[f32; 2]> {
    let len = v[0].hypot(v[1]);
    (len > f32::EPSILON).then(|| [v[0] / len, v[1] / len])
}

/// Speed in cells per generation, scaled by energy.
pub fn speed_for(energy: i32) -> f32 {
    (energy.max(0) as f32 / SPEED_DIVISOR).min(MAX_SPEED)
}

/// Target of a move from `(x, y)`, clamped to the grid.
pub fn destination(grid: &Grid, x: usize, y: usize, direction: [f32; 2], speed: f32) -> (usize, usize) {
    let step_x = (direction[0] * speed).round() as isize;
    let step_y = (direction[1] * speed).round() as isize;
    let max_x = grid.width().saturating_sub(1) as isize;
    let max_y = grid.height().saturating_sub(1) as isize;
    (
        (x as isize + step_x).clamp(0, max_x) as usize,
        (y as isize + step_y).clamp(0, max_y) as usize,
    )
}

impl World {
    /// Movement for every live cell in row-major order. A cell that moves
    /// forward in the scan is not moved again thanks to `has_moved`.
    pub(crate) fn step_movement_phase(&mut self) {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                self.move_cell(x, y);
            }
        }
    }

    pub(crate) fn move_cell(&mut self, x: usize, y: usize) -> MoveOutcome {
        let Some(cell) = self.grid.get(x, y).copied() else {
            return MoveOutcome::Skipped;
        };
        if !cell.is_live()
            || cell.has_moved
            || cell.stagnant_cycles >= self.config.max_stagnant_cycles
        {
            return MoveOutcome::Skipped;
        }

        let field = attraction_field(&self.grid, x, y);
        let jitter = [
            self.rng.random_range(-JITTER..=JITTER),
            self.rng.random_range(-JITTER..=JITTER),
        ];
        let blended = [
            MOMENTUM * cell.direction[0] + FIELD_WEIGHT * field[0] + jitter[0],
            MOMENTUM * cell.direction[1] + FIELD_WEIGHT * field[1] + jitter[1],
        ];
        let direction = normalize(blended).unwrap_or(cell.direction);
        let to = destination(&self.grid, x, y, direction, speed_for(cell.energy));

        let relocated = match self.grid.get(to.0, to.1) {
            _ if to == (x, y) => None,
            Some(target) if !target.is_live() => Some(false),
            Some(_) if self.rng.random_bool(self.config.displacement_probability) => Some(true),
            _ => None,
        };

        let Some(mover) = self.grid.get_mut(x, y) else {
            return MoveOutcome::Skipped;
        };
        mover.direction = direction;
        match relocated {
            Some(displaced) => {
                mover.has_moved = true;
                mover.stagnant_cycles = 0;
                self.grid.relocate((x, y), to);
                if displaced {
                    self.events_last_step.displacements += 1;
                }
                MoveOutcome::Relocated { to, displaced }
            }
            None => {
                mover.stagnant_cycles += 1;
                if mover.stagnant_cycles >= self.config.max_stagnant_cycles {
                    *mover = Cell::dead();
                    self.events_last_step.stagnation_deaths += 1;
                    log::trace!("cell at ({x}, {y}) starved after failing to move");
                    return MoveOutcome::Starved;
                }
                MoveOutcome::Blocked
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;

    #[test]
    fn field_is_balanced_in_open_space() {
        let grid = Grid::new(9, 9).unwrap();
        let field = attraction_field(&grid, 4, 4);
        assert!(field[0].abs() < 1e-5 && field[1].abs() < 1e-5);
    }

    #[test]
    fn field_points_away_from_live_neighbor() {
        let mut grid = Grid::new(9, 9).unwrap();
        grid.set(5, 4, Cell::spawn(CellState::Alive, 10));
        let field = attraction_field(&grid, 4, 4);
        assert!(field[0] < 0.0);
        assert!(field[1].abs() < 1e-5);
    }

    #[test]
    fn field_near_edge_pulls_inward_toward_free_space() {
        let grid = Grid::new(9, 9).unwrap();
        let field = attraction_field(&grid, 0, 4);
        assert!(field[0] > 0.0);
    }

    #[test]
    fn speed_scales_with_energy_and_caps() {
        assert_eq!(speed_for(0), 0.0);
        assert_eq!(speed_for(25), 0.5);
        assert_eq!(speed_for(50), 1.0);
        assert_eq!(speed_for(1000), 2.0);
        assert_eq!(speed_for(-5), 0.0);
    }

    #[test]
    fn destination_is_clamped_to_bounds() {
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(destination(&grid, 4, 0, [1.0, -1.0], 2.0), (4, 0));
        assert_eq!(destination(&grid, 2, 2, [1.0, 0.0], 2.0), (4, 2));
        assert_eq!(destination(&grid, 2, 2, [0.0, 1.0], 0.4), (2, 2));
    }
}
