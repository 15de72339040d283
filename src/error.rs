//! Game configuration error types.
//!
//! Gameplay itself has no recoverable-error taxonomy: collisions, empty
//! collision queries, and zero-length input vectors are all defined states
//! with explicit results, and the terminal game-over condition is a designed
//! transition rather than a failure.  The only fallible path is loading and
//! validating `assets/settings.toml`, which reports through these types
//! instead of panicking.

use std::fmt;

/// Top-level error enum for Meteor Storm configuration.
#[derive(Debug)]
pub enum GameError {
    /// A configuration value is outside its safe operating range.
    ConfigOutOfRange {
        /// Name of the offending setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        requirement: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ConfigOutOfRange {
                name,
                value,
                requirement,
            } => write!(
                f,
                "setting '{}' = {} is outside accepted range {}",
                name, value, requirement
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if a viewport dimension is not strictly positive.
pub fn validate_viewport_extent(name: &'static str, value: f32) -> GameResult<()> {
    if value <= 0.0 {
        return Err(GameError::ConfigOutOfRange {
            name,
            value: value as f64,
            requirement: "(0.0, inf)",
        });
    }
    Ok(())
}

/// Returns an error if a scheduling period or cooldown is not strictly
/// positive.  A zero period would spawn (or fire) unboundedly within one
/// frame of catch-up.
pub fn validate_period(name: &'static str, value: f64) -> GameResult<()> {
    if value <= 0.0 {
        return Err(GameError::ConfigOutOfRange {
            name,
            value,
            requirement: "(0.0, inf)",
        });
    }
    Ok(())
}

/// Returns an error if a playback volume lies outside `[0.0, 1.0]`.
pub fn validate_volume(name: &'static str, value: f32) -> GameResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GameError::ConfigOutOfRange {
            name,
            value: value as f64,
            requirement: "[0.0, 1.0]",
        });
    }
    Ok(())
}

/// Returns an error if a random integer range is empty or non-positive.
pub fn validate_speed_range(name: &'static str, min: i32, max: i32) -> GameResult<()> {
    if min <= 0 || max < min {
        return Err(GameError::ConfigOutOfRange {
            name,
            value: min as f64,
            requirement: "0 < min <= max",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_period_is_accepted() {
        assert!(validate_period("meteor_spawn_period", 0.2).is_ok());
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = validate_period("meteor_spawn_period", 0.0).unwrap_err();
        assert!(
            err.to_string().contains("meteor_spawn_period"),
            "error should name the offending setting: {err}"
        );
    }

    #[test]
    fn volume_above_unity_is_rejected() {
        assert!(validate_volume("music_volume", 1.2).is_err());
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        assert!(validate_speed_range("meteor_speed", 500, 400).is_err());
    }
}
