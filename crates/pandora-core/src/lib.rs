//! Grid-based artificial-life engine.
//!
//! A fixed `width × height` grid of [`cell::Cell`] values evolves one
//! generation at a time through a four-phase pipeline owned by
//! [`world::World`]: movement, reproduction/combat, state transition, and
//! statistics. The first two phases mutate the live grid in row-major order;
//! the transition phase reads a consistent snapshot and writes into a scratch
//! buffer that is swapped in at the end of the generation.
//!
//! ```
//! use pandora_core::config::SimConfig;
//! use pandora_core::world::World;
//!
//! let mut world = World::initialize(32, 24, SimConfig::default(), 7).unwrap();
//! let stats = world.advance_generation();
//! assert_eq!(stats.generation, 1);
//! assert_eq!(stats.total(), 32 * 24);
//! ```

pub mod cell;
pub mod config;
pub mod grid;
pub mod rules;
pub mod world;

pub use cell::{Cell, CellState, CellView};
pub use config::{Ruleset, SimConfig};
pub use world::{RunSummary, StepEvents, Statistics, World};
