//! Player ship: polled movement input, screen wrapping, and the
//! cooldown-gated fire controller that spawns lasers.

use bevy::prelude::*;

use crate::audio::{self, GameAudio};
use crate::config::GameConfig;
use crate::geometry::{self, Bounds, DrawOrder, Layer};
use crate::textures::GameSprites;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for the player ship.  Singleton: exactly one exists for
/// the whole session.
#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Marker component for a laser bolt.  Doubles as the "lasers" collection:
/// targeted collision queries filter on it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Laser;

// ── Input snapshot ────────────────────────────────────────────────────────────

/// Polled boolean input state for the current frame.
///
/// [`poll_input_system`] fills this from the keyboard once per frame;
/// movement and fire both read the same snapshot.  Tests populate it
/// directly to drive the ship without a real input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Read the arrow keys and space bar into [`PlayerIntent`].
pub fn poll_input_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent {
        up: keys.pressed(KeyCode::ArrowUp),
        down: keys.pressed(KeyCode::ArrowDown),
        left: keys.pressed(KeyCode::ArrowLeft),
        right: keys.pressed(KeyCode::ArrowRight),
        fire: keys.pressed(KeyCode::Space),
    };
}

/// Movement direction implied by the snapshot: `(right - left, down - up)`,
/// normalized to unit length when non-zero.  Opposite keys cancel to the
/// zero vector, which is returned unchanged, with no divide-by-zero.
pub fn input_direction(intent: &PlayerIntent) -> Vec2 {
    Vec2::new(
        intent.right as i32 as f32 - intent.left as i32 as f32,
        intent.down as i32 as f32 - intent.up as i32 as f32,
    )
    .normalize_or_zero()
}

// ── Screen wrap ───────────────────────────────────────────────────────────────

/// Apply the viewport wrap rules to the player's rect.
///
/// Horizontal: leaving either side re-enters from the other.  Vertical is
/// deliberately asymmetric: crossing the top edge teleports the ship to the
/// bottom, while the bottom edge clamps.
pub fn wrap_player(rect: Rect, width: f32, height: f32) -> Rect {
    let size = rect.size();
    let mut r = rect;

    if r.min.x >= width {
        r.max.x = 0.0;
        r.min.x = -size.x;
    } else if r.max.x <= 0.0 {
        r.min.x = width;
        r.max.x = width + size.x;
    }

    if r.min.y <= 0.0 {
        r.max.y = height;
        r.min.y = height - size.y;
    }
    if r.max.y >= height {
        r.max.y = height;
        r.min.y = height - size.y;
    }

    r
}

// ── Fire controller ───────────────────────────────────────────────────────────

/// The two states of the fire controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireState {
    /// A press will fire immediately.
    Ready,
    /// Locked out since the recorded timestamp; presses are dropped.
    Cooling { since: f64 },
}

/// Cooldown-gated fire state machine.
///
/// `ready -> cooling` on a successful fire; `cooling -> ready` once the
/// configured duration has elapsed, checked once per frame whether or not
/// the button is held.  There is no queueing: a press during cooldown is
/// simply lost.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FireControl {
    state: FireState,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            state: FireState::Ready,
        }
    }
}

impl FireControl {
    /// Per-frame cooldown check: returns to `Ready` once `cooldown`
    /// seconds have passed since the last shot.
    pub fn tick(&mut self, now: f64, cooldown: f64) {
        if let FireState::Cooling { since } = self.state {
            if now - since >= cooldown {
                self.state = FireState::Ready;
            }
        }
    }

    /// Attempt to fire at time `now`.  Succeeds only from `Ready`, in which
    /// case the timestamp is recorded and the controller starts cooling.
    pub fn try_fire(&mut self, now: f64) -> bool {
        match self.state {
            FireState::Ready => {
                self.state = FireState::Cooling { since: now };
                true
            }
            FireState::Cooling { .. } => false,
        }
    }

    pub fn state(&self) -> FireState {
        self.state
    }
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Spawn the player ship at the centre of the viewport.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    mut order: ResMut<DrawOrder>,
) {
    let center = Vec2::new(config.window_width / 2.0, config.window_height / 2.0);
    commands.spawn((
        Player,
        Bounds(Rect::from_center_size(center, sprites.player_size)),
        Layer(order.next()),
        SpriteBundle {
            texture: sprites.player.clone(),
            sprite: Sprite {
                custom_size: Some(sprites.player_size),
                ..default()
            },
            ..default()
        },
    ));
}

/// Spawn a laser anchored by its bottom-centre at `pos` (the ship's
/// top-centre).
pub fn spawn_laser(
    commands: &mut Commands,
    sprites: &GameSprites,
    order: &mut DrawOrder,
    pos: Vec2,
) -> Entity {
    commands
        .spawn((
            Laser,
            Bounds(geometry::from_midbottom(pos, sprites.laser_size)),
            Layer(order.next()),
            SpriteBundle {
                texture: sprites.laser.clone(),
                sprite: Sprite {
                    custom_size: Some(sprites.laser_size),
                    ..default()
                },
                ..default()
            },
        ))
        .id()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Move the ship along the normalized input direction and apply the wrap
/// rules.
pub fn player_movement_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    mut query: Query<&mut Bounds, With<Player>>,
) {
    let Ok(mut bounds) = query.get_single_mut() else {
        return;
    };
    let direction = input_direction(&intent);
    let moved = geometry::displace(bounds.0, direction, config.player_speed, time.delta_seconds());
    bounds.0 = wrap_player(moved, config.window_width, config.window_height);
}

/// Run the fire controller: tick the cooldown, then fire one laser from the
/// ship's top-centre if the button is down and the controller is ready.
pub fn player_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    sprites: Res<GameSprites>,
    sounds: Res<GameAudio>,
    mut fire: ResMut<FireControl>,
    mut order: ResMut<DrawOrder>,
    query: Query<&Bounds, With<Player>>,
) {
    let now = time.elapsed_seconds_f64();
    // Cooldown expiry is checked every frame, independent of input.
    fire.tick(now, config.fire_cooldown);

    let Ok(bounds) = query.get_single() else {
        return;
    };
    if intent.fire && fire.try_fire(now) {
        spawn_laser(&mut commands, &sprites, &mut order, geometry::midtop(bounds.0));
        audio::play_sound(&mut commands, sounds.laser.clone(), config.laser_volume);
    }
}

/// Move lasers straight up; despawn each once its bottom edge clears the
/// top of the viewport.
pub fn laser_update_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(Entity, &mut Bounds), With<Laser>>,
) {
    let dt = time.delta_seconds();
    for (entity, mut bounds) in query.iter_mut() {
        bounds.0 = geometry::displace(bounds.0, Vec2::new(0.0, -1.0), config.laser_speed, dt);
        if bounds.0.max.y <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    // ── input_direction ───────────────────────────────────────────────────────

    #[test]
    fn no_keys_yield_zero_vector_without_fault() {
        let dir = input_direction(&PlayerIntent::default());
        assert_eq!(dir, Vec2::ZERO);
    }

    #[test]
    fn opposite_keys_cancel_to_zero() {
        let intent = PlayerIntent {
            left: true,
            right: true,
            up: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input_direction(&intent), Vec2::ZERO);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let intent = PlayerIntent {
            right: true,
            down: true,
            ..Default::default()
        };
        let dir = input_direction(&intent);
        assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-6);
        assert!(dir.x > 0.0 && dir.y > 0.0);
    }

    #[test]
    fn up_is_negative_y_in_screen_space() {
        let intent = PlayerIntent {
            up: true,
            ..Default::default()
        };
        assert_eq!(input_direction(&intent), Vec2::new(0.0, -1.0));
    }

    // ── wrap_player ───────────────────────────────────────────────────────────

    fn rect_at(left: f32, top: f32) -> Rect {
        Rect::new(left, top, left + 48.0, top + 40.0)
    }

    #[test]
    fn leaving_right_edge_reenters_with_right_edge_at_zero() {
        let wrapped = wrap_player(rect_at(W, 300.0), W, H);
        assert_eq!(wrapped.max.x, 0.0, "right edge sits at x=0 after wrap");
        assert_eq!(wrapped.min.x, -48.0);
        assert_eq!(wrapped.min.y, 300.0, "vertical position unchanged");
    }

    #[test]
    fn leaving_left_edge_reenters_with_left_edge_at_width() {
        let wrapped = wrap_player(rect_at(-48.0, 300.0), W, H);
        assert_eq!(wrapped.min.x, W);
        assert_eq!(wrapped.max.x, W + 48.0);
    }

    #[test]
    fn crossing_top_edge_teleports_to_bottom() {
        let wrapped = wrap_player(rect_at(600.0, -1.0), W, H);
        assert_eq!(wrapped.max.y, H, "bottom edge snaps to the boundary");
        assert_eq!(wrapped.min.y, H - 40.0);
    }

    #[test]
    fn crossing_bottom_edge_clamps_instead_of_wrapping() {
        let wrapped = wrap_player(rect_at(600.0, H - 10.0), W, H);
        assert_eq!(wrapped.max.y, H, "bottom clamps, never wraps to the top");
        assert_eq!(wrapped.min.x, 600.0);
    }

    #[test]
    fn rect_inside_viewport_is_untouched() {
        let rect = rect_at(400.0, 300.0);
        assert_eq!(wrap_player(rect, W, H), rect);
    }

    // ── FireControl ───────────────────────────────────────────────────────────

    const COOLDOWN: f64 = 0.4;

    #[test]
    fn first_press_fires_and_starts_cooling() {
        let mut fire = FireControl::default();
        fire.tick(0.0, COOLDOWN);
        assert!(fire.try_fire(0.0), "ready controller should fire");
        assert_eq!(fire.state(), FireState::Cooling { since: 0.0 });
    }

    #[test]
    fn press_during_cooldown_is_dropped() {
        let mut fire = FireControl::default();
        assert!(fire.try_fire(0.0));

        fire.tick(0.399, COOLDOWN);
        assert!(!fire.try_fire(0.399), "press at 399 ms must be dropped");
    }

    #[test]
    fn controller_returns_to_ready_at_cooldown_elapsed() {
        let mut fire = FireControl::default();
        assert!(fire.try_fire(0.0));

        fire.tick(0.4, COOLDOWN);
        assert_eq!(fire.state(), FireState::Ready);
        assert!(fire.try_fire(0.4), "subsequent press fires a new laser");
    }

    #[test]
    fn cooldown_expires_without_any_press() {
        let mut fire = FireControl::default();
        assert!(fire.try_fire(1.0));
        // Frames pass with the button released; the timer still runs.
        fire.tick(1.2, COOLDOWN);
        assert_eq!(fire.state(), FireState::Cooling { since: 1.0 });
        fire.tick(1.5, COOLDOWN);
        assert_eq!(fire.state(), FireState::Ready);
    }
}
