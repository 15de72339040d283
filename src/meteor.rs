//! Meteors: timed spawning, randomized fall kinematics, and rotation.
//!
//! Spawning runs on an absolute wall-clock schedule, not accumulated frame
//! deltas: each spawn has a fixed due time, so a slow frame catches up on
//! exactly the ticks that elapsed and timing error never compounds.

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::geometry::{self, Bounds, DrawOrder, Layer};
use crate::textures::GameSprites;

// ── Components ────────────────────────────────────────────────────────────────

/// A falling meteor.  Doubles as the "meteors" collection for targeted
/// collision queries.
#[derive(Component, Debug, Clone)]
pub struct Meteor {
    /// Fall direction `(drift, 1.0)`.  Deliberately unnormalized: the
    /// drift component adds to the effective speed.
    pub direction: Vec2,
    /// Scalar fall speed (units/s).
    pub speed: f32,
    /// Accumulated rotation (degrees).  Grows without bound; it is never
    /// reduced modulo 360.
    pub rotation: f32,
    /// Rotation rate (degrees/s).
    pub rotation_speed: f32,
    /// Unrotated sprite extent; the bounding rect is recomputed from this
    /// every frame as the sprite turns.
    pub base_size: Vec2,
}

// ── Spawn scheduling ──────────────────────────────────────────────────────────

/// Absolute-time spawn scheduler.
///
/// The first spawn is due one period after startup; each subsequent due
/// time advances by exactly one period.  `due` returns how many spawns
/// have become due since the last call.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MeteorClock {
    next_at: Option<f64>,
}

impl MeteorClock {
    /// Number of spawns due at `elapsed` seconds since startup.
    pub fn due(&mut self, elapsed: f64, period: f64) -> usize {
        let next = self.next_at.get_or_insert(period);
        let mut count = 0;
        while elapsed >= *next {
            count += 1;
            *next += period;
        }
        count
    }
}

/// Randomized spawn parameters for one meteor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorSeed {
    /// Bottom-centre anchor of the spawn rect.
    pub midbottom: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub rotation_speed: f32,
}

/// Roll a fresh meteor: x anywhere across the viewport, y in the
/// off-screen band above it, drifting mostly downward.
pub fn roll_meteor(rng: &mut impl Rng, config: &GameConfig) -> MeteorSeed {
    MeteorSeed {
        midbottom: Vec2::new(
            rng.gen_range(0.0..config.window_width),
            rng.gen_range(-config.meteor_spawn_band..0.0),
        ),
        direction: Vec2::new(rng.gen_range(-config.meteor_drift..=config.meteor_drift), 1.0),
        speed: rng.gen_range(config.meteor_speed_min..=config.meteor_speed_max) as f32,
        rotation_speed: rng.gen_range(config.meteor_rotation_min..=config.meteor_rotation_max)
            as f32,
    }
}

/// Spawn one meteor entity from a rolled seed.
pub fn spawn_meteor(
    commands: &mut Commands,
    sprites: &GameSprites,
    order: &mut DrawOrder,
    seed: MeteorSeed,
) -> Entity {
    commands
        .spawn((
            Meteor {
                direction: seed.direction,
                speed: seed.speed,
                rotation: 0.0,
                rotation_speed: seed.rotation_speed,
                base_size: sprites.meteor_size,
            },
            Bounds(geometry::from_midbottom(seed.midbottom, sprites.meteor_size)),
            Layer(order.next()),
            SpriteBundle {
                texture: sprites.meteor.clone(),
                sprite: Sprite {
                    custom_size: Some(sprites.meteor_size),
                    ..default()
                },
                ..default()
            },
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Spawn every meteor whose wall-clock due time has passed.
pub fn meteor_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    mut clock: ResMut<MeteorClock>,
    mut order: ResMut<DrawOrder>,
) {
    let due = clock.due(time.elapsed_seconds_f64(), config.meteor_spawn_period);
    let mut rng = rand::thread_rng();
    for _ in 0..due {
        let seed = roll_meteor(&mut rng, &config);
        spawn_meteor(&mut commands, &sprites, &mut order, seed);
    }
}

/// Advance every meteor: move along its direction, despawn once fully
/// below the viewport, then rotate and recompute the bounding rect around
/// the unchanged centre.
pub fn meteor_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(Entity, &mut Meteor, &mut Bounds)>,
) {
    let dt = time.delta_seconds();
    for (entity, mut meteor, mut bounds) in query.iter_mut() {
        let direction = meteor.direction;
        let speed = meteor.speed;
        bounds.0 = geometry::displace(bounds.0, direction, speed, dt);
        if bounds.0.min.y >= config.window_height {
            commands.entity(entity).despawn();
            continue;
        }
        meteor.rotation += meteor.rotation_speed * dt;
        bounds.0 = geometry::rotated_bounds(bounds.0.center(), meteor.base_size, meteor.rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ── MeteorClock ───────────────────────────────────────────────────────────

    #[test]
    fn nothing_is_due_before_the_first_period() {
        let mut clock = MeteorClock::default();
        assert_eq!(clock.due(0.0, 0.2), 0);
        assert_eq!(clock.due(0.19, 0.2), 0);
    }

    #[test]
    fn one_second_yields_exactly_five_spawns_at_200ms() {
        let mut clock = MeteorClock::default();
        assert_eq!(clock.due(1.0, 0.2), 5, "ticks at 0.2 .. 1.0 inclusive");
    }

    #[test]
    fn spawns_accumulate_without_drift_across_uneven_frames() {
        let mut clock = MeteorClock::default();
        let mut total = 0;
        // Deliberately irregular frame boundaries.
        for elapsed in [0.05, 0.21, 0.39, 0.41, 0.95, 1.0] {
            total += clock.due(elapsed, 0.2);
        }
        assert_eq!(total, 5, "absolute scheduling must not starve or double-count");
    }

    #[test]
    fn slow_frame_catches_up_on_all_elapsed_ticks() {
        let mut clock = MeteorClock::default();
        // One long 1-second stall: all five ticks fire on the next check.
        assert_eq!(clock.due(1.0, 0.2), 5);
        // Immediately after, nothing further is due.
        assert_eq!(clock.due(1.01, 0.2), 0);
    }

    // ── roll_meteor ───────────────────────────────────────────────────────────

    #[test]
    fn rolled_meteors_stay_inside_the_spawn_band() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let seed = roll_meteor(&mut rng, &config);
            assert!(
                (0.0..config.window_width).contains(&seed.midbottom.x),
                "x must lie in [0, width): {}",
                seed.midbottom.x
            );
            assert!(
                (-config.meteor_spawn_band..0.0).contains(&seed.midbottom.y),
                "y must lie in [-band, 0): {}",
                seed.midbottom.y
            );
        }
    }

    #[test]
    fn rolled_direction_is_downward_and_unnormalized() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let seed = roll_meteor(&mut rng, &config);
            assert_eq!(seed.direction.y, 1.0, "vertical component is fixed");
            assert!(seed.direction.x.abs() <= config.meteor_drift);
        }
    }

    #[test]
    fn rolled_speeds_and_rotation_rates_stay_in_range() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1000 {
            let seed = roll_meteor(&mut rng, &config);
            assert!((400.0..=500.0).contains(&seed.speed));
            assert!((40.0..=80.0).contains(&seed.rotation_speed));
        }
    }
}
