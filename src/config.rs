//! Simulation configuration: grid size, layout randomness and pacing.

use std::time::Duration;

use crate::error::{Result, SimError};
use crate::types::{DEFAULT_COLS, DEFAULT_ROWS};

/// Human-visible pacing windows used by the sweep loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each move or clean step.
    pub step: Duration,
    /// Display window of a transient message.
    pub message: Duration,
    /// Wait once the robot reaches its charging corner.
    pub recharge_begin: Duration,
    /// Wait after the battery is refilled.
    pub recharge_end: Duration,
    /// Poll interval while paused.
    pub poll: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(100),
            message: Duration::from_millis(600),
            recharge_begin: Duration::from_millis(1200),
            recharge_end: Duration::from_millis(800),
            poll: Duration::from_millis(100),
        }
    }
}

impl Pacing {
    /// No waiting at all, for tests and `--fast` runs.
    pub fn instant() -> Self {
        Self {
            step: Duration::ZERO,
            message: Duration::ZERO,
            recharge_begin: Duration::ZERO,
            recharge_end: Duration::ZERO,
            poll: Duration::from_millis(1),
        }
    }

    /// Same proportions, with the step window set to `step`.
    pub fn with_step(self, step: Duration) -> Self {
        Self { step, ..self }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub rows: usize,
    pub cols: usize,
    pub dirty_probability: f64,
    /// Seed for reproducible layouts; entropy when `None`.
    pub seed: Option<u64>,
    pub pacing: Pacing,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            dirty_probability: 0.5,
            seed: None,
            pacing: Pacing::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SimError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(0.0..=1.0).contains(&self.dirty_probability) {
            return Err(SimError::invalid_config(format!(
                "dirty probability {} not in [0, 1]",
                self.dirty_probability
            )));
        }
        if self.pacing.poll.is_zero() {
            return Err(SimError::invalid_config("pause poll interval must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_ten_by_ten_coin_flip() {
        let config = SimConfig::default();
        assert_eq!((config.rows, config.cols), (10, 10));
        assert_eq!(config.dirty_probability, 0.5);
        assert_eq!(config.pacing.step, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let empty = SimConfig {
            rows: 0,
            ..SimConfig::default()
        };
        assert!(matches!(empty.validate(), Err(SimError::EmptyGrid { .. })));

        let probability = SimConfig {
            dirty_probability: 1.5,
            ..SimConfig::default()
        };
        assert!(matches!(
            probability.validate(),
            Err(SimError::InvalidConfig(_))
        ));

        let mut no_poll = SimConfig::default();
        no_poll.pacing.poll = Duration::ZERO;
        assert!(no_poll.validate().is_err());
    }

    #[test]
    fn with_step_keeps_other_windows() {
        let pacing = Pacing::default().with_step(Duration::from_millis(5));
        assert_eq!(pacing.step, Duration::from_millis(5));
        assert_eq!(pacing.message, Duration::from_millis(600));
    }
}
