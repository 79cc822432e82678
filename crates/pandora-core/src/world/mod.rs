pub mod combat;
pub mod lifecycle;
pub mod metrics;
pub mod movement;
pub mod reproduction;

pub use metrics::*;

use crate::cell::{Cell, CellState, CellView};
use crate::config::{SimConfig, SimConfigError};
use crate::grid::Grid;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// The simulation engine: owns the grid, the random source and the
/// generation counter.
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) statistics: Statistics,
    pub(crate) events_last_step: StepEvents,
    pub(crate) total_events: StepEvents,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    Allocation { cells: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::Allocation { cells } => {
                write!(f, "failed to allocate grid of {cells} cells")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "generations ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Allocate a `width × height` grid and seed it from `seed`, overriding
    /// the corresponding fields of `config`.
    pub fn initialize(
        width: usize,
        height: usize,
        config: SimConfig,
        seed: u64,
    ) -> Result<Self, WorldInitError> {
        Self::try_new(SimConfig {
            width,
            height,
            seed,
            ..config
        })
    }

    pub fn try_new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let cells = config.cell_count();
        let mut grid = Grid::new(config.width, config.height)
            .map_err(|_| WorldInitError::Allocation { cells })?;

        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        for y in 0..config.height {
            for x in 0..config.width {
                if rng.random_bool(config.initial_population_ratio) {
                    grid.set(x, y, Cell::spawn(CellState::Alive, config.initial_energy));
                }
            }
        }

        let statistics = Statistics::from_cells(0, grid.cells());
        log::info!(
            "initialized {}x{} grid: {} live cells (seed {}, {:?} rules)",
            config.width,
            config.height,
            statistics.live(),
            config.seed,
            config.ruleset
        );
        Ok(Self {
            grid,
            config,
            rng,
            statistics,
            events_last_step: StepEvents::default(),
            total_events: StepEvents::default(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Counts and generation index as of the last completed generation.
    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn generation(&self) -> u64 {
        self.statistics.generation
    }

    pub fn events_last_step(&self) -> StepEvents {
        self.events_last_step
    }

    pub fn total_events(&self) -> StepEvents {
        self.total_events
    }

    /// Read a cell for rendering. Out-of-range coordinates are a caller bug.
    pub fn cell_at(&self, x: usize, y: usize) -> CellView {
        self.try_cell_at(x, y).unwrap_or_else(|| {
            panic!(
                "cell_at({x}, {y}) outside {}x{} grid",
                self.grid.width(),
                self.grid.height()
            )
        })
    }

    pub fn try_cell_at(&self, x: usize, y: usize) -> Option<CellView> {
        self.grid.get(x, y).map(Cell::view)
    }

    /// Run one full generation and return the recomputed statistics.
    pub fn advance_generation(&mut self) -> Statistics {
        self.step();
        self.statistics
    }

    pub fn run_experiment(&mut self, generations: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(generations, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        generations: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        self.try_run_experiment_observed(generations, sample_every, |_, _| {})
    }

    /// Like `try_run_experiment`, calling `observer` after every completed
    /// generation. The observer only ever sees whole generations.
    pub fn try_run_experiment_observed<F>(
        &mut self,
        generations: usize,
        sample_every: usize,
        mut observer: F,
    ) -> Result<RunSummary, ExperimentError>
    where
        F: FnMut(&World, &Statistics),
    {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if generations > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: generations,
            });
        }
        let estimated_samples = if generations == 0 {
            0
        } else {
            ((generations - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let mut totals = StepEvents::default();
        let mut samples = Vec::with_capacity(estimated_samples);
        let mut extinct_at = None;
        for step in 1..=generations {
            let stats = self.advance_generation();
            totals += self.events_last_step;
            observer(self, &stats);
            if extinct_at.is_none() && stats.is_extinct() {
                extinct_at = Some(stats.generation);
            }
            if step % sample_every == 0 || step == generations {
                samples.push(self.collect_step_metrics());
            }
        }

        Ok(RunSummary {
            schema_version: 1,
            seed: self.config.seed,
            generations,
            sample_every,
            final_statistics: self.statistics,
            samples,
            totals,
            extinct_at,
        })
    }
}
