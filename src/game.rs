//! Top-level plugin: resource registration, startup sequencing and the
//! per-frame system schedule.
//!
//! Every frame runs three chained phases:
//!
//! * **Flow**: the game-over exit check, always first so the app quits at
//!   the top of the frame after a fatal collision.
//! * **Play**: input, spawning, movement and collision, in a fixed chain
//!   matching the classic poll → spawn → move → collide loop shape.  The
//!   whole phase is gated off once the game is over.
//! * **Render**: projection of screen-space rects into transforms and the
//!   score refresh, after all state for the frame is final.

use std::thread;
use std::time::Duration;

use bevy::app::AppExit;
use bevy::prelude::*;

use crate::audio;
use crate::collision::{self, FrameKills};
use crate::config::{self, GameConfig};
use crate::explosion;
use crate::geometry::DrawOrder;
use crate::hud;
use crate::meteor::{self, MeteorClock};
use crate::player::{self, FireControl, PlayerIntent};
use crate::star;
use crate::textures::{self, GameSprites};

// ── Game-over flow ────────────────────────────────────────────────────────────

/// Raised by the player-collision system; read one frame later by
/// [`game_over_exit_system`], so the final frame (explosion sound, meteor
/// removal) still renders before the pause and shutdown.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameOver(pub bool);

/// Run condition: gameplay systems only run while the game is live.
pub fn game_active(game_over: Res<GameOver>) -> bool {
    !game_over.0
}

/// Checked at the top of every frame.  Once the flag is up, hold the final
/// frame on screen for the configured pause and then exit the app.
pub fn game_over_exit_system(
    game_over: Res<GameOver>,
    config: Res<GameConfig>,
    mut exit: EventWriter<AppExit>,
) {
    if !game_over.0 {
        return;
    }
    if config.game_over_pause > 0.0 {
        thread::sleep(Duration::from_secs_f32(config.game_over_pause));
    }
    exit.send(AppExit);
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Flow,
    Play,
    Render,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerIntent>()
            .init_resource::<GameOver>()
            .init_resource::<DrawOrder>()
            .init_resource::<FireControl>()
            .init_resource::<MeteorClock>()
            .init_resource::<FrameKills>()
            .init_resource::<GameSprites>();

        app.add_systems(
            Startup,
            (
                config::load_game_config,
                textures::setup_sprites,
                audio::setup_audio,
                hud::setup_camera,
                star::spawn_starfield,
                player::spawn_player,
                hud::setup_score_hud,
            )
                .chain(),
        );

        app.configure_sets(
            Update,
            (GameSet::Flow, GameSet::Play, GameSet::Render).chain(),
        );

        app.add_systems(Update, game_over_exit_system.in_set(GameSet::Flow));

        app.add_systems(
            Update,
            (
                player::poll_input_system,
                meteor::meteor_spawn_system,
                player::player_movement_system,
                player::player_fire_system,
                player::laser_update_system,
                meteor::meteor_update_system,
                explosion::explosion_update_system,
                collision::begin_collision_frame,
                collision::player_meteor_collision_system,
                collision::laser_meteor_collision_system,
            )
                .chain()
                .in_set(GameSet::Play)
                .run_if(game_active),
        );

        app.add_systems(
            Update,
            (hud::sync_transforms_system, hud::score_display_system)
                .in_set(GameSet::Render),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_starts_live() {
        assert_eq!(GameOver::default(), GameOver(false));
    }

    #[test]
    fn exit_system_is_quiet_while_live() {
        let mut app = App::new();
        app.init_resource::<GameOver>()
            .insert_resource(GameConfig::default())
            .add_systems(Update, game_over_exit_system);
        app.update();

        let events = app.world.resource::<Events<AppExit>>();
        assert!(events.is_empty(), "no exit while the game is live");
    }

    #[test]
    fn exit_system_sends_app_exit_once_flagged() {
        let mut app = App::new();
        let mut config = GameConfig::default();
        config.game_over_pause = 0.0; // skip the real-time hold in tests
        app.insert_resource(GameOver(true))
            .insert_resource(config)
            .add_systems(Update, game_over_exit_system);
        app.update();

        let events = app.world.resource::<Events<AppExit>>();
        assert!(!events.is_empty(), "flagged game-over must request exit");
    }
}
