//! Explosion effect: a fixed frame sequence advanced by a fractional index.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::constants::EXPLOSION_FRAME_COUNT;
use crate::geometry::{Bounds, DrawOrder, Layer};
use crate::textures::GameSprites;

/// A playing explosion animation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    /// Fractional frame accumulator; the visible frame is its floor.
    pub frame_index: f32,
}

impl Explosion {
    /// Advance by `frame_rate * dt` frames.  Returns the frame to show, or
    /// `None` once the sequence has run past `frame_count`.
    pub fn advance(&mut self, frame_rate: f32, frame_count: usize, dt: f32) -> Option<usize> {
        self.frame_index += frame_rate * dt;
        let frame = self.frame_index as usize;
        (frame < frame_count).then_some(frame)
    }
}

/// Spawn an explosion centred at `pos`, starting on frame 0.
pub fn spawn_explosion(
    commands: &mut Commands,
    sprites: &GameSprites,
    order: &mut DrawOrder,
    pos: Vec2,
) -> Entity {
    commands
        .spawn((
            Explosion { frame_index: 0.0 },
            Bounds(Rect::from_center_size(pos, sprites.explosion_size)),
            Layer(order.next()),
            SpriteBundle {
                texture: sprites.explosion_frames[0].clone(),
                sprite: Sprite {
                    custom_size: Some(sprites.explosion_size),
                    ..default()
                },
                ..default()
            },
        ))
        .id()
}

/// Advance every explosion; swap in the current frame's texture, or
/// despawn once the sequence is exhausted.
pub fn explosion_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    mut query: Query<(Entity, &mut Explosion, &mut Handle<Image>)>,
) {
    let dt = time.delta_seconds();
    for (entity, mut explosion, mut texture) in query.iter_mut() {
        match explosion.advance(config.explosion_frame_rate, EXPLOSION_FRAME_COUNT, dt) {
            Some(frame) => *texture = sprites.explosion_frames[frame].clone(),
            None => commands.entity(entity).despawn(),
        }
    }
}
