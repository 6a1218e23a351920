//! Tunable parameters of a game session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_GRID_SIZE: i32 = 40;
const DEFAULT_COLUMNS: i32 = 30;
const DEFAULT_ROWS: i32 = 15;
const DEFAULT_INITIAL_LENGTH: usize = 3;
const DEFAULT_TIME_FACTOR: f64 = 5.5;
const DEFAULT_TIME_FACTOR_STEP: f64 = 0.125;

// exp(30) ms is roughly 340 years between steps.
const MAX_TIME_FACTOR: f64 = 30.0;

/// Parameters shared by every entity of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Side length of one grid cell in world units.
    pub grid_size: i32,
    /// Number of playable columns.
    pub columns: i32,
    /// Number of playable rows.
    pub rows: i32,
    /// Body length the snake grows to before it starts sliding.
    pub initial_length: usize,
    /// Natural logarithm of the initial inter-step delay in milliseconds.
    pub initial_time_factor: f64,
    /// Amount subtracted from the time factor every time food is eaten.
    pub time_factor_step: f64,
    /// Whether the first game waits for the pause key before moving.
    pub start_paused: bool,
    /// Seed for food placement; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Whether the HUD shows the debug overlay.
    pub show_debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_time_factor: DEFAULT_TIME_FACTOR,
            time_factor_step: DEFAULT_TIME_FACTOR_STEP,
            start_paused: true,
            seed: None,
            show_debug: false,
        }
    }
}

impl GameConfig {
    /// Width of the playable area in world units.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.grid_size.saturating_mul(self.columns)
    }

    /// Height of the playable area in world units.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.grid_size.saturating_mul(self.rows)
    }

    /// Checks that every parameter describes a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::InvalidGridSize {
                grid_size: self.grid_size,
            });
        }
        if self.columns <= 0 || self.rows <= 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.width() == i32::MAX || self.height() == i32::MAX {
            return Err(ConfigError::GridTooLarge {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.initial_length == 0 {
            return Err(ConfigError::ZeroInitialLength);
        }
        if !self.initial_time_factor.is_finite() || self.initial_time_factor > MAX_TIME_FACTOR {
            return Err(ConfigError::TimeFactorOutOfRange {
                value: self.initial_time_factor,
            });
        }
        if !self.time_factor_step.is_finite() || self.time_factor_step < 0.0 {
            return Err(ConfigError::InvalidTimeFactorStep {
                value: self.time_factor_step,
            });
        }
        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Cells must have a positive size.
    #[error("grid_size must be positive (received {grid_size})")]
    InvalidGridSize {
        /// Provided grid size.
        grid_size: i32,
    },
    /// The playable area must contain at least one cell.
    #[error("grid must contain at least one cell (received {columns}x{rows})")]
    EmptyGrid {
        /// Provided column count.
        columns: i32,
        /// Provided row count.
        rows: i32,
    },
    /// The playable area does not fit in world coordinates.
    #[error("grid of {columns}x{rows} cells exceeds the coordinate range")]
    GridTooLarge {
        /// Provided column count.
        columns: i32,
        /// Provided row count.
        rows: i32,
    },
    /// The snake needs at least its head.
    #[error("initial_length must be at least 1")]
    ZeroInitialLength,
    /// The initial delay exponent cannot be represented as a delay.
    #[error("initial_time_factor must be finite and at most 30 (received {value})")]
    TimeFactorOutOfRange {
        /// Provided time factor.
        value: f64,
    },
    /// The speed-up per food must be a finite non-negative amount.
    #[error("time_factor_step must be finite and non-negative (received {value})")]
    InvalidTimeFactorStep {
        /// Provided step.
        value: f64,
    },
}
