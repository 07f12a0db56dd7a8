use serde::Serialize;

use crate::constants::{
    COLUMNS_ENV, DEFAULT_BALLOON_PROBABILITY, DEFAULT_COLUMNS, DEFAULT_ROWS,
    MAX_BALLOON_PROBABILITY, MAX_GRID_SIDE, PROBABILITY_ENV, ROWS_ENV,
};
use crate::error::ConfigError;

/// Validated session settings. The only way to build one is [`GameConfig::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    rows: usize,
    columns: usize,
    #[serde(rename = "balloonProbability")]
    balloon_probability: u8,
}

impl GameConfig {
    pub fn new(rows: i64, columns: i64, balloon_probability: i64) -> Result<Self, ConfigError> {
        let rows = validate_side("rows", rows)?;
        let columns = validate_side("columns", columns)?;
        if !(0..=MAX_BALLOON_PROBABILITY as i64).contains(&balloon_probability) {
            return Err(ConfigError::InvalidConfiguration {
                field: "balloonProbability",
                value: balloon_probability,
                reason: "must be between 0 and 100",
            });
        }
        Ok(Self {
            rows,
            columns,
            balloon_probability: balloon_probability as u8,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn balloon_probability(&self) -> u8 {
        self.balloon_probability
    }

    pub fn probability(&self) -> f64 {
        self.balloon_probability as f64 / 100.0
    }

    pub fn fills_every_cell(&self) -> bool {
        self.balloon_probability == MAX_BALLOON_PROBABILITY
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS as usize,
            columns: DEFAULT_COLUMNS as usize,
            balloon_probability: DEFAULT_BALLOON_PROBABILITY as u8,
        }
    }
}

fn validate_side(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidConfiguration {
            field,
            value,
            reason: "must be positive",
        });
    }
    if value > MAX_GRID_SIDE {
        return Err(ConfigError::InvalidConfiguration {
            field,
            value,
            reason: "exceeds the maximum grid side of 64",
        });
    }
    Ok(value as usize)
}

/// Command line value first, then the environment, then the built-in default.
pub fn resolve_config(
    rows: Option<i64>,
    columns: Option<i64>,
    balloon_probability: Option<i64>,
) -> Result<GameConfig, ConfigError> {
    GameConfig::new(
        pick_value(rows, env_i64(ROWS_ENV), DEFAULT_ROWS),
        pick_value(columns, env_i64(COLUMNS_ENV), DEFAULT_COLUMNS),
        pick_value(
            balloon_probability,
            env_i64(PROBABILITY_ENV),
            DEFAULT_BALLOON_PROBABILITY,
        ),
    )
}

pub fn env_i64(name: &str) -> Option<i64> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
}

fn pick_value(arg: Option<i64>, env: Option<i64>, default: i64) -> i64 {
    arg.or(env).unwrap_or(default)
}

pub fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}
