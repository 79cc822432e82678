use pandora_core::{CellState, CellView, Statistics, World};

pub const CURSOR_HOME: &str = "\x1b[H";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
const RESET: &str = "\x1b[0m";

/// Display color for a cell. Alive cells fade from white toward red as they
/// age, Mutated cells brighten from black toward red, Warriors are blue
/// with brightness following their energy.
pub fn cell_color(cell: CellView) -> [u8; 3] {
    let pulse = (cell.age % 255) as u8;
    match cell.state {
        CellState::Dead => [0, 0, 0],
        CellState::Alive => [255, 255 - pulse, 255 - pulse],
        CellState::Mutated => [255, pulse, pulse],
        CellState::Warrior => {
            let level = (cell.energy.clamp(0, 254) / 2) as u8;
            [0, level / 2, 128 + level]
        }
    }
}

/// One frame of the grid as ANSI truecolor blocks, two columns per cell.
pub fn render_frame(world: &World) -> String {
    let mut out = String::with_capacity(world.width() * world.height() * 20);
    for y in 0..world.height() {
        for x in 0..world.width() {
            let [r, g, b] = cell_color(world.cell_at(x, y));
            out.push_str(&format!("\x1b[48;2;{r};{g};{b}m  "));
        }
        out.push_str(RESET);
        out.push('\n');
    }
    out
}

pub fn overlay(stats: &Statistics) -> String {
    format!(
        "Alive: {} | Mutated: {} | Warrior: {} | Dead: {} | Generation: {}",
        stats.alive, stats.mutated, stats.warrior, stats.dead, stats.generation
    )
}
