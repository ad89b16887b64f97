//! Data-driven game balance
//!
//! Every knob here has a default matching the shipped game. Hosts can override
//! any subset from JSON; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Tunable simulation constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added each non-jump tick
    pub gravity: f32,
    /// Velocity set by a jump (negative = upward)
    pub jump_strength: f32,
    /// Leftward obstacle movement per tick
    pub obstacle_speed: f32,
    /// Vertical opening between the two columns
    pub obstacle_gap: f32,
    /// Column width
    pub obstacle_width: f32,
    /// Ticks between spawns
    pub spawn_interval: u64,
    pub playfield_width: f32,
    pub playfield_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_width: OBSTACLE_WIDTH,
            spawn_interval: SPAWN_INTERVAL,
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Upper bound of the obstacle top-height range
    #[inline]
    pub fn max_top_height(&self) -> f32 {
        self.playfield_height - self.obstacle_gap - MIN_BOTTOM_HEIGHT
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.gravity > 0.0) {
            return Err(invalid("gravity", "must be positive (downward)"));
        }
        if !(self.jump_strength < 0.0) {
            return Err(invalid("jump_strength", "must be negative (upward)"));
        }
        if !(self.obstacle_speed > 0.0) {
            return Err(invalid("obstacle_speed", "must be positive"));
        }
        if !(self.obstacle_width > 0.0) {
            return Err(invalid("obstacle_width", "must be positive"));
        }
        if !(self.obstacle_gap > 0.0) {
            return Err(invalid("obstacle_gap", "must be positive"));
        }
        if self.spawn_interval == 0 {
            return Err(invalid("spawn_interval", "must be at least 1 tick"));
        }
        if !(self.playfield_width > 0.0) {
            return Err(invalid("playfield_width", "must be positive"));
        }
        if self.max_top_height() < MIN_TOP_HEIGHT {
            return Err(invalid(
                "playfield_height",
                format!(
                    "{} leaves no room for a {} gap between columns of at least {} and {}",
                    self.playfield_height, self.obstacle_gap, MIN_TOP_HEIGHT, MIN_BOTTOM_HEIGHT
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.max_top_height(), 320.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "obstacle_speed": 4.5 }"#).unwrap();
        assert_eq!(tuning.obstacle_speed, 4.5);
        assert_eq!(tuning.gravity, GRAVITY);
        assert_eq!(tuning.spawn_interval, SPAWN_INTERVAL);
    }

    #[test]
    fn test_rejects_downward_jump() {
        let err = Tuning::from_json(r#"{ "jump_strength": 3.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "jump_strength",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_cramped_playfield() {
        let err = Tuning::from_json(r#"{ "playfield_height": 300.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "playfield_height",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }
}
