use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Which transition rule set drives the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ruleset {
    /// Neighbor-count rules only: no energy economy, movement, or combat.
    Classic,
    /// Full energy economy with movement, reproduction, combat and castes.
    #[default]
    Energy,
}

/// Melee parameters for one kind of attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub damage: i32,
    /// Chebyshev scan radius in cells.
    pub range: u32,
    pub energy_gain: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub ruleset: Ruleset,
    /// Fraction of cells seeded Alive at initialization.
    pub initial_population_ratio: f64,
    pub initial_energy: i32,
    pub mutation_probability: f64,
    pub reproduction_threshold: i32,
    pub reproduction_cost: i32,
    pub offspring_energy: i32,
    pub upkeep_cost: i32,
    /// Extra cost paid by a live cell whose neighbor count is outside [2, 3].
    pub isolation_penalty: i32,
    pub warrior_threshold: i32,
    pub warrior_promotion_probability: f64,
    /// Chance that a Warrior's offspring is born Alive instead.
    pub warrior_demotion_probability: f64,
    pub warrior_attack: AttackProfile,
    pub alive_attack: AttackProfile,
    pub mutated_attack: AttackProfile,
    pub warrior_cooldown: u32,
    pub regular_cooldown: u32,
    pub max_stagnant_cycles: u32,
    /// Chance that a mover whose destination is occupied takes the slot anyway.
    pub displacement_probability: f64,
    /// Delay between rendered generations. Only the shell reads this.
    pub tick_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            seed: 42,
            ruleset: Ruleset::Energy,
            initial_population_ratio: 0.25,
            initial_energy: 100,
            mutation_probability: 0.01,
            reproduction_threshold: 150,
            reproduction_cost: 60,
            offspring_energy: 50,
            upkeep_cost: 1,
            isolation_penalty: 3,
            warrior_threshold: 200,
            warrior_promotion_probability: 0.05,
            warrior_demotion_probability: 0.2,
            warrior_attack: AttackProfile {
                damage: 30,
                range: 3,
                energy_gain: 15,
            },
            alive_attack: AttackProfile {
                damage: 10,
                range: 1,
                energy_gain: 5,
            },
            mutated_attack: AttackProfile {
                damage: 20,
                range: 2,
                energy_gain: 10,
            },
            warrior_cooldown: 5,
            regular_cooldown: 2,
            max_stagnant_cycles: 20,
            displacement_probability: 0.9,
            tick_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    InvalidDimensions { width: usize, height: usize },
    GridTooLarge { max: usize, actual: usize },
    InvalidProbability { field: &'static str, value: f64 },
    NonPositive { field: &'static str, value: i64 },
    Negative { field: &'static str, value: i64 },
    AttackRangeTooLarge { field: &'static str, range: u32, max: u32 },
    ReproductionCostExceedsThreshold { cost: i32, threshold: i32 },
    InvalidStagnationLimit,
    Parse(String),
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::InvalidDimensions { width, height } => {
                write!(f, "grid dimensions must be positive (got {width}x{height})")
            }
            SimConfigError::GridTooLarge { max, actual } => {
                write!(f, "grid cell count ({actual}) exceeds supported maximum ({max})")
            }
            SimConfigError::InvalidProbability { field, value } => {
                write!(f, "{field} must be within [0, 1] (got {value})")
            }
            SimConfigError::NonPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            SimConfigError::Negative { field, value } => {
                write!(f, "{field} must not be negative (got {value})")
            }
            SimConfigError::AttackRangeTooLarge { field, range, max } => {
                write!(f, "{field}.range ({range}) exceeds supported maximum ({max})")
            }
            SimConfigError::ReproductionCostExceedsThreshold { cost, threshold } => write!(
                f,
                "reproduction_cost ({cost}) must not exceed reproduction_threshold ({threshold})"
            ),
            SimConfigError::InvalidStagnationLimit => {
                write!(f, "max_stagnant_cycles must be at least 1")
            }
            SimConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub const MAX_CELLS: usize = 16 * 1024 * 1024;
    pub const MAX_ATTACK_RANGE: u32 = 1024;

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let cells = self
            .width
            .checked_mul(self.height)
            .unwrap_or(usize::MAX);
        if cells > Self::MAX_CELLS {
            return Err(SimConfigError::GridTooLarge {
                max: Self::MAX_CELLS,
                actual: cells,
            });
        }

        for (field, value) in [
            ("initial_population_ratio", self.initial_population_ratio),
            ("mutation_probability", self.mutation_probability),
            (
                "warrior_promotion_probability",
                self.warrior_promotion_probability,
            ),
            (
                "warrior_demotion_probability",
                self.warrior_demotion_probability,
            ),
            ("displacement_probability", self.displacement_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimConfigError::InvalidProbability { field, value });
            }
        }

        for (field, value) in [
            ("initial_energy", self.initial_energy),
            ("offspring_energy", self.offspring_energy),
            ("reproduction_cost", self.reproduction_cost),
        ] {
            if value <= 0 {
                return Err(SimConfigError::NonPositive {
                    field,
                    value: value as i64,
                });
            }
        }
        for (field, value) in [
            ("upkeep_cost", self.upkeep_cost),
            ("isolation_penalty", self.isolation_penalty),
            ("warrior_attack.damage", self.warrior_attack.damage),
            ("warrior_attack.energy_gain", self.warrior_attack.energy_gain),
            ("alive_attack.damage", self.alive_attack.damage),
            ("alive_attack.energy_gain", self.alive_attack.energy_gain),
            ("mutated_attack.damage", self.mutated_attack.damage),
            ("mutated_attack.energy_gain", self.mutated_attack.energy_gain),
        ] {
            if value < 0 {
                return Err(SimConfigError::Negative {
                    field,
                    value: value as i64,
                });
            }
        }
        for (field, profile) in [
            ("warrior_attack", self.warrior_attack),
            ("alive_attack", self.alive_attack),
            ("mutated_attack", self.mutated_attack),
        ] {
            if profile.range > Self::MAX_ATTACK_RANGE {
                return Err(SimConfigError::AttackRangeTooLarge {
                    field,
                    range: profile.range,
                    max: Self::MAX_ATTACK_RANGE,
                });
            }
        }
        if self.reproduction_cost > self.reproduction_threshold {
            return Err(SimConfigError::ReproductionCostExceedsThreshold {
                cost: self.reproduction_cost,
                threshold: self.reproduction_threshold,
            });
        }
        if self.max_stagnant_cycles == 0 {
            return Err(SimConfigError::InvalidStagnationLimit);
        }
        Ok(())
    }

    /// Parse a JSON config. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SimConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Attack parameters for a live state. Dead cells never attack.
    pub fn attack_profile(&self, state: crate::cell::CellState) -> Option<AttackProfile> {
        use crate::cell::CellState;
        match state {
            CellState::Dead => None,
            CellState::Alive => Some(self.alive_attack),
            CellState::Mutated => Some(self.mutated_attack),
            CellState::Warrior => Some(self.warrior_attack),
        }
    }
}
