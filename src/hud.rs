//! Camera, score overlay and the screen-space → world-space projection.
//!
//! The score is the number of whole seconds survived, drawn centred near the
//! bottom of the screen inside a white-bordered box.  The same module owns
//! the one system that turns authoritative [`Bounds`] rects into Bevy
//! `Transform`s after every update pass.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::geometry::{Bounds, Layer};
use crate::meteor::Meteor;

/// Deep plum clear colour behind the starfield.
pub fn background_color() -> Color {
    Color::rgb_u8(58, 46, 63)
}

/// Marker for the text node whose value tracks the elapsed-seconds score.
#[derive(Component, Debug)]
pub struct ScoreDisplay;

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Build the score overlay: a full-width anchor row pinned near the bottom
/// of the window, holding one bordered, padded box with the score text.
pub fn setup_score_hud(mut commands: Commands, config: Res<GameConfig>) {
    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                bottom: Val::Px(config.hud_bottom_offset),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            ..default()
        })
        .with_children(|row| {
            row.spawn(NodeBundle {
                style: Style {
                    border: UiRect::all(Val::Px(5.0)),
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                    ..default()
                },
                border_color: BorderColor(Color::WHITE),
                ..default()
            })
            .with_children(|boxed| {
                boxed.spawn((
                    TextBundle::from_section(
                        "0",
                        TextStyle {
                            font: Handle::default(),
                            font_size: config.hud_font_size,
                            color: Color::WHITE,
                        },
                    ),
                    ScoreDisplay,
                ));
            });
        });
}

/// Refresh the score text: whole seconds since startup, truncated.
pub fn score_display_system(time: Res<Time>, mut query: Query<&mut Text, With<ScoreDisplay>>) {
    let score = time.elapsed_seconds_f64() as u64;
    for mut text in &mut query {
        let rendered = score.to_string();
        if text.sections[0].value != rendered {
            text.sections[0].value = rendered;
        }
    }
}

/// Project every entity's screen-space rect into Bevy world space.
///
/// Screen (0,0) is the top-left corner with +y down; world (0,0) is the
/// window centre with +y up.  Meteors additionally carry their accumulated
/// rotation, negated because screen-space angles wind the opposite way.
pub fn sync_transforms_system(
    config: Res<GameConfig>,
    mut query: Query<(&Bounds, &Layer, Option<&Meteor>, &mut Transform)>,
) {
    let half = Vec2::new(config.window_width, config.window_height) / 2.0;
    for (bounds, layer, meteor, mut transform) in &mut query {
        let center = bounds.0.center();
        transform.translation = Vec3::new(center.x - half.x, half.y - center.y, layer.0);
        transform.rotation = match meteor {
            Some(m) => Quat::from_rotation_z(-m.rotation.to_radians()),
            None => Quat::IDENTITY,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn screen_centre_projects_to_world_origin() {
        let config = GameConfig::default();
        let center = Vec2::new(config.window_width / 2.0, config.window_height / 2.0);
        let half = Vec2::new(config.window_width, config.window_height) / 2.0;
        let world = Vec2::new(center.x - half.x, half.y - center.y);
        assert_eq!(world, Vec2::ZERO);
    }

    #[test]
    fn screen_top_left_projects_to_world_top_left() {
        // Screen (0, 0) must land at (-W/2, +H/2): x keeps its sense, y flips.
        let config = GameConfig::default();
        let half = Vec2::new(config.window_width, config.window_height) / 2.0;
        let world = Vec2::new(0.0 - half.x, half.y - 0.0);
        assert_relative_eq!(world.x, -config.window_width / 2.0);
        assert_relative_eq!(world.y, config.window_height / 2.0);
    }

    #[test]
    fn score_text_shows_truncated_whole_seconds() {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .add_systems(Update, score_display_system);
        let label = app
            .world
            .spawn((Text::from_section("0", TextStyle::default()), ScoreDisplay))
            .id();

        app.world
            .resource_mut::<Time>()
            .advance_by(std::time::Duration::from_millis(1900));
        app.update();

        let text = app.world.get::<Text>(label).unwrap();
        assert_eq!(text.sections[0].value, "1", "1.9 s truncates to 1");
    }
}
