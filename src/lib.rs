//! Meteor Storm: a small fixed-window arcade shooter.
//!
//! The player ship steers with the arrow keys and fires lasers upward with
//! space; meteors rain from above the screen at a fixed cadence.  One meteor
//! touching the ship ends the run; the score is simply seconds survived.
//!
//! The simulation runs in screen coordinates (origin top-left, +y down) on
//! the [`geometry::Bounds`] component; [`hud::sync_transforms_system`]
//! projects those rects into Bevy world space once per frame.  Sprites and
//! sounds are generated procedurally at startup, so the binary ships with no
//! asset files beyond an optional `assets/settings.toml` override.

pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod explosion;
pub mod game;
pub mod geometry;
pub mod hud;
pub mod meteor;
pub mod player;
pub mod star;
pub mod textures;
