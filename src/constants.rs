//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig`] mirrors these as its compile-time defaults;
//! `assets/settings.toml` can override any subset at startup.

use bevy::math::Vec2;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Logical viewport width (screen units).  All spawn and wrap math is
/// expressed relative to this, never as an inline literal.
pub const WINDOW_WIDTH: f32 = 1280.0;

/// Logical viewport height (screen units).
pub const WINDOW_HEIGHT: f32 = 720.0;

// ── Player ────────────────────────────────────────────────────────────────────

/// Player movement speed (units/s).  Applied along the normalized input
/// direction, so diagonal travel is no faster than axis-aligned travel.
pub const PLAYER_SPEED: f32 = 400.0;

/// Seconds between two consecutive shots.  Fire presses that arrive while
/// the controller is cooling are dropped, not queued.
pub const FIRE_COOLDOWN: f64 = 0.4;

// ── Laser ─────────────────────────────────────────────────────────────────────

/// Upward laser speed (units/s).  Lasers despawn once their bottom edge
/// clears the top of the viewport.
pub const LASER_SPEED: f32 = 400.0;

// ── Meteors ───────────────────────────────────────────────────────────────────

/// Wall-clock interval between meteor spawns (seconds).  Scheduling is
/// absolute: slow frames catch up rather than drifting.
pub const METEOR_SPAWN_PERIOD: f64 = 0.2;

/// Height of the off-screen band above the viewport in which meteors spawn.
/// Spawn y is drawn from `[-METEOR_SPAWN_BAND, 0)`.
pub const METEOR_SPAWN_BAND: f32 = 200.0;

/// Minimum meteor fall speed (units/s, inclusive).
pub const METEOR_SPEED_MIN: i32 = 400;

/// Maximum meteor fall speed (units/s, inclusive).
pub const METEOR_SPEED_MAX: i32 = 500;

/// Minimum meteor rotation rate (degrees/s, inclusive).
pub const METEOR_ROTATION_MIN: i32 = 40;

/// Maximum meteor rotation rate (degrees/s, inclusive).
pub const METEOR_ROTATION_MAX: i32 = 80;

/// Half-width of the random horizontal drift component.  Meteor direction
/// is `(uniform(-DRIFT, DRIFT), 1.0)`, deliberately left unnormalized.
pub const METEOR_DRIFT: f32 = 0.5;

// ── Starfield ─────────────────────────────────────────────────────────────────

/// Number of background stars placed at world init.  Stars are static and
/// never respawned during a session.
pub const STAR_COUNT: usize = 30;

// ── Explosions ────────────────────────────────────────────────────────────────

/// Explosion animation playback rate (frames/s).
pub const EXPLOSION_FRAME_RATE: f32 = 20.0;

/// Number of frames in the explosion animation.  At
/// [`EXPLOSION_FRAME_RATE`] the full animation lasts 21/20 = 1.05 s.
pub const EXPLOSION_FRAME_COUNT: usize = 21;

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Background music loop volume.
pub const MUSIC_VOLUME: f32 = 0.2;

/// Laser fire one-shot volume.
pub const LASER_VOLUME: f32 = 0.24;

/// Explosion one-shot volume (both the laser-hit and game-over variants).
pub const EXPLOSION_VOLUME: f32 = 0.2;

// ── Game over ─────────────────────────────────────────────────────────────────

/// Real-time pause (seconds) between the fatal collision and loop exit,
/// long enough for the explosion sound to play out.  The pause blocks the
/// whole loop: input, updates and rendering freeze during this window.
pub const GAME_OVER_PAUSE: f32 = 1.0;

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Distance (units) between the bottom viewport edge and the score readout.
pub const HUD_BOTTOM_OFFSET: f32 = 50.0;

/// Score readout font size.
pub const HUD_FONT_SIZE: f32 = 35.0;

// ── Sprite dimensions ─────────────────────────────────────────────────────────

/// Player ship sprite extent.  The pixel mask used for the fatal collision
/// test is derived from this sprite's alpha channel.
pub const PLAYER_SIZE: Vec2 = Vec2::new(48.0, 40.0);

/// Background star sprite extent.
pub const STAR_SIZE: Vec2 = Vec2::new(6.0, 6.0);

/// Laser bolt sprite extent.
pub const LASER_SIZE: Vec2 = Vec2::new(6.0, 22.0);

/// Meteor sprite extent (unrotated).  The bounding rect grows as the
/// sprite rotates; collision masks are sampled against this base extent.
pub const METEOR_SIZE: Vec2 = Vec2::new(40.0, 40.0);

/// Explosion frame extent.
pub const EXPLOSION_SIZE: Vec2 = Vec2::new(64.0, 64.0);

/// Gap between successive draw layers.  Entities spawned later receive a
/// higher z so draw order always equals spawn order.
pub const LAYER_STEP: f32 = 0.001;
