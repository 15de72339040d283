//! Background starfield: placed once at world init, static forever after.

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::{Bounds, DrawOrder, Layer};
use crate::textures::GameSprites;

/// Marker component for a background star.
#[derive(Component, Debug, Clone, Copy)]
pub struct Star;

/// Uniformly random star centre within the viewport.
pub fn roll_star_position(rng: &mut impl Rng, config: &GameConfig) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..=config.window_width),
        rng.gen_range(0.0..=config.window_height),
    )
}

/// Startup system: scatter the configured number of stars across the
/// viewport.  Runs before the player spawns so stars sit on the lowest
/// draw layers.
pub fn spawn_starfield(
    mut commands: Commands,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    mut order: ResMut<DrawOrder>,
) {
    let mut rng = rand::thread_rng();
    for _ in 0..config.star_count {
        let center = roll_star_position(&mut rng, &config);
        commands.spawn((
            Star,
            Bounds(Rect::from_center_size(center, sprites.star_size)),
            Layer(order.next()),
            SpriteBundle {
                texture: sprites.star.clone(),
                sprite: Sprite {
                    custom_size: Some(sprites.star_size),
                    ..default()
                },
                ..default()
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn star_positions_stay_inside_the_viewport() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = roll_star_position(&mut rng, &config);
            assert!((0.0..=config.window_width).contains(&p.x));
            assert!((0.0..=config.window_height).contains(&p.y));
        }
    }
}
