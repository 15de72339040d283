//! Runtime gameplay configuration loaded from `assets/settings.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/settings.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_period, validate_speed_range, validate_viewport_extent, validate_volume, GameResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/settings.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Viewport ──────────────────────────────────────────────────────────────
    pub window_width: f32,
    pub window_height: f32,

    // ── Player ────────────────────────────────────────────────────────────────
    pub player_speed: f32,
    pub fire_cooldown: f64,

    // ── Laser ─────────────────────────────────────────────────────────────────
    pub laser_speed: f32,

    // ── Meteors ───────────────────────────────────────────────────────────────
    pub meteor_spawn_period: f64,
    pub meteor_spawn_band: f32,
    pub meteor_speed_min: i32,
    pub meteor_speed_max: i32,
    pub meteor_rotation_min: i32,
    pub meteor_rotation_max: i32,
    pub meteor_drift: f32,

    // ── Starfield ─────────────────────────────────────────────────────────────
    pub star_count: usize,

    // ── Explosions ────────────────────────────────────────────────────────────
    pub explosion_frame_rate: f32,

    // ── Audio ─────────────────────────────────────────────────────────────────
    pub music_volume: f32,
    pub laser_volume: f32,
    pub explosion_volume: f32,

    // ── Game over / HUD ───────────────────────────────────────────────────────
    pub game_over_pause: f32,
    pub hud_bottom_offset: f32,
    pub hud_font_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Viewport
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            // Player
            player_speed: PLAYER_SPEED,
            fire_cooldown: FIRE_COOLDOWN,
            // Laser
            laser_speed: LASER_SPEED,
            // Meteors
            meteor_spawn_period: METEOR_SPAWN_PERIOD,
            meteor_spawn_band: METEOR_SPAWN_BAND,
            meteor_speed_min: METEOR_SPEED_MIN,
            meteor_speed_max: METEOR_SPEED_MAX,
            meteor_rotation_min: METEOR_ROTATION_MIN,
            meteor_rotation_max: METEOR_ROTATION_MAX,
            meteor_drift: METEOR_DRIFT,
            // Starfield
            star_count: STAR_COUNT,
            // Explosions
            explosion_frame_rate: EXPLOSION_FRAME_RATE,
            // Audio
            music_volume: MUSIC_VOLUME,
            laser_volume: LASER_VOLUME,
            explosion_volume: EXPLOSION_VOLUME,
            // Game over / HUD
            game_over_pause: GAME_OVER_PAUSE,
            hud_bottom_offset: HUD_BOTTOM_OFFSET,
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl GameConfig {
    /// Reject configurations that would break scheduling or spawn math.
    pub fn validate(&self) -> GameResult<()> {
        validate_viewport_extent("window_width", self.window_width)?;
        validate_viewport_extent("window_height", self.window_height)?;
        validate_period("meteor_spawn_period", self.meteor_spawn_period)?;
        validate_period("fire_cooldown", self.fire_cooldown)?;
        validate_speed_range("meteor_speed", self.meteor_speed_min, self.meteor_speed_max)?;
        validate_speed_range(
            "meteor_rotation",
            self.meteor_rotation_min,
            self.meteor_rotation_max,
        )?;
        validate_volume("music_volume", self.music_volume)?;
        validate_volume("laser_volume", self.laser_volume)?;
        validate_volume("explosion_volume", self.explosion_volume)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/settings.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors
/// are logged but do not abort the game.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/settings.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("loaded settings from {path}");
                }
                Err(e) => {
                    warn!("rejected {path}: {e}; using defaults");
                }
            },
            Err(e) => {
                warn!("failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present; defaults are already in place; not an error.
            info!("no {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg: GameConfig =
            toml::from_str("meteor_spawn_period = 0.5\nstar_count = 10").expect("should parse");
        assert_eq!(cfg.meteor_spawn_period, 0.5);
        assert_eq!(cfg.star_count, 10);
        assert_eq!(cfg.window_width, WINDOW_WIDTH, "untouched keys keep defaults");
        assert_eq!(cfg.fire_cooldown, FIRE_COOLDOWN);
    }

    #[test]
    fn zero_spawn_period_fails_validation() {
        let cfg: GameConfig = toml::from_str("meteor_spawn_period = 0.0").expect("should parse");
        assert!(cfg.validate().is_err());
    }
}
