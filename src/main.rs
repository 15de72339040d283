use bevy::prelude::*;
use bevy::window::WindowResolution;

use meteor_storm::config::GameConfig;
use meteor_storm::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use meteor_storm::game::GamePlugin;
use meteor_storm::hud;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Meteor Storm".into(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(hud::background_color()))
        .insert_resource(GameConfig::default())
        .add_plugins(GamePlugin)
        .run();
}
