//! Collision engine: pairwise hit detection and outcome dispatch.
//!
//! Two independent checks run each frame, after all movement:
//!
//! 1. **Player vs meteors**: pixel-mask accurate.  Any hit removes the
//!    colliding meteors, silences the music, plays the explosion sound and
//!    flags game-over (handled by [`crate::game::game_over_exit_system`]).
//! 2. **Lasers vs meteors**: bounding-rect only; deliberately coarser and
//!    cheaper.  Each laser destroys every meteor it currently overlaps,
//!    spawns exactly one explosion at its top-centre, then despawns.
//!
//! Both scans are naive O(n·m); entity counts stay in the low hundreds.

use std::collections::HashSet;

use bevy::audio::{AudioSink, AudioSinkPlayback};
use bevy::prelude::*;

use crate::audio::{self, GameAudio, MusicChannel};
use crate::config::GameConfig;
use crate::explosion;
use crate::game::GameOver;
use crate::geometry::{self, Bounds, DrawOrder, PixelMask};
use crate::meteor::Meteor;
use crate::player::{Laser, Player};
use crate::textures::GameSprites;

// ── Per-frame kill tracking ───────────────────────────────────────────────────

/// Entities already destroyed during this frame's collision pass.
///
/// A meteor removed by one check must be invisible to every later check in
/// the same frame, so a handle is never despawned twice.
#[derive(Resource, Debug, Default)]
pub struct FrameKills(pub HashSet<Entity>);

/// Reset the kill set at the top of the collision pass.
pub fn begin_collision_frame(mut kills: ResMut<FrameKills>) {
    kills.0.clear();
}

// ── Primitive tests ───────────────────────────────────────────────────────────

/// Strict bounding-rect overlap: rects that merely touch edges do not
/// collide.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Pixel-mask collision between an unrotated sprite `a` and a sprite `b`
/// rotated by `b_angle_deg` about the centre of its (axis-aligned,
/// already-grown) bounding rect.
///
/// Every pixel centre inside the rect intersection is tested against both
/// masks; `b`'s samples are mapped back through the inverse rotation into
/// its unrotated base image.
pub fn masks_collide(
    a: &PixelMask,
    a_rect: Rect,
    b: &PixelMask,
    b_rect: Rect,
    b_angle_deg: f32,
) -> bool {
    let overlap = a_rect.intersect(b_rect);
    if overlap.is_empty() {
        return false;
    }

    // Screen y points down, so a screen-CCW rotation is a math-CW one; the
    // inverse map back into base coordinates is the plain rotation matrix.
    let (sin, cos) = b_angle_deg.to_radians().sin_cos();
    let b_center = b_rect.center();
    let half = Vec2::new(b.width as f32, b.height as f32) / 2.0;

    let (x0, x1) = (overlap.min.x.floor() as i32, overlap.max.x.ceil() as i32);
    let (y0, y1) = (overlap.min.y.floor() as i32, overlap.max.y.ceil() as i32);

    for y in y0..y1 {
        for x in x0..x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let ax = (px - a_rect.min.x).floor() as i32;
            let ay = (py - a_rect.min.y).floor() as i32;
            if !a.get(ax, ay) {
                continue;
            }

            let rel = Vec2::new(px - b_center.x, py - b_center.y);
            let bx = cos * rel.x - sin * rel.y + half.x;
            let by = sin * rel.x + cos * rel.y + half.y;
            if b.get(bx.floor() as i32, by.floor() as i32) {
                return true;
            }
        }
    }
    false
}

// ── Pure resolution ───────────────────────────────────────────────────────────

/// Every meteor whose rotated mask overlaps the player's mask.
pub fn player_mask_hits(
    player_mask: &PixelMask,
    player_rect: Rect,
    meteor_mask: &PixelMask,
    meteors: &[(Entity, Rect, f32)],
) -> Vec<Entity> {
    meteors
        .iter()
        .filter(|(_, rect, angle)| masks_collide(player_mask, player_rect, meteor_mask, *rect, *angle))
        .map(|(entity, _, _)| *entity)
        .collect()
}

/// One laser's collision outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LaserHit {
    pub laser: Entity,
    /// Laser top-centre: where the explosion blooms.
    pub at: Vec2,
    /// All meteors the laser overlapped this frame; removed together.
    pub meteors: Vec<Entity>,
}

/// Resolve laser-vs-meteor overlaps with per-laser single-pass semantics:
/// lasers are considered in order, each sees only meteors not already
/// destroyed by an earlier laser this frame, and a laser with any match
/// produces exactly one hit (and one explosion) regardless of how many
/// meteors it overlapped.
pub fn resolve_laser_hits(
    lasers: &[(Entity, Rect)],
    meteors: &[(Entity, Rect)],
    already_killed: &HashSet<Entity>,
) -> Vec<LaserHit> {
    let mut killed = already_killed.clone();
    let mut hits = Vec::new();

    for &(laser, laser_rect) in lasers {
        let matched: Vec<Entity> = meteors
            .iter()
            .filter(|(meteor, rect)| !killed.contains(meteor) && rects_overlap(laser_rect, *rect))
            .map(|(meteor, _)| *meteor)
            .collect();
        if matched.is_empty() {
            continue;
        }
        killed.extend(matched.iter().copied());
        hits.push(LaserHit {
            laser,
            at: geometry::midtop(laser_rect),
            meteors: matched,
        });
    }
    hits
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Pixel-accurate player-vs-meteor check; a hit is terminal.
///
/// The colliding meteors are removed, the music stops, an explosion plays,
/// and the game-over flag is raised exactly once; the loop-exit system
/// performs the real-time pause and terminates the app.
pub fn player_meteor_collision_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    sounds: Res<GameAudio>,
    mut kills: ResMut<FrameKills>,
    mut game_over: ResMut<GameOver>,
    q_player: Query<&Bounds, With<Player>>,
    q_meteors: Query<(Entity, &Bounds, &Meteor)>,
    music: Query<&AudioSink, With<MusicChannel>>,
) {
    if game_over.0 {
        return;
    }
    let Ok(player_bounds) = q_player.get_single() else {
        return;
    };

    let meteors: Vec<(Entity, Rect, f32)> = q_meteors
        .iter()
        .map(|(entity, bounds, meteor)| (entity, bounds.0, meteor.rotation))
        .collect();
    let hits = player_mask_hits(
        &sprites.player_mask,
        player_bounds.0,
        &sprites.meteor_mask,
        &meteors,
    );
    if hits.is_empty() {
        return;
    }

    for entity in hits {
        kills.0.insert(entity);
        commands.entity(entity).despawn();
    }
    if let Ok(sink) = music.get_single() {
        sink.stop();
    }
    audio::play_sound(&mut commands, sounds.explosion.clone(), config.explosion_volume);
    game_over.0 = true;
    info!("meteor strike, game over");
}

/// Coarse laser-vs-meteor check: despawn matched meteors and the laser,
/// spawn one explosion per hit laser.
pub fn laser_meteor_collision_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    sprites: Res<GameSprites>,
    sounds: Res<GameAudio>,
    mut order: ResMut<DrawOrder>,
    mut kills: ResMut<FrameKills>,
    q_lasers: Query<(Entity, &Bounds), With<Laser>>,
    q_meteors: Query<(Entity, &Bounds), With<Meteor>>,
) {
    let lasers: Vec<(Entity, Rect)> = q_lasers.iter().map(|(e, b)| (e, b.0)).collect();
    let meteors: Vec<(Entity, Rect)> = q_meteors.iter().map(|(e, b)| (e, b.0)).collect();

    for hit in resolve_laser_hits(&lasers, &meteors, &kills.0) {
        for meteor in &hit.meteors {
            kills.0.insert(*meteor);
            commands.entity(*meteor).despawn();
        }
        explosion::spawn_explosion(&mut commands, &sprites, &mut order, hit.at);
        audio::play_sound(&mut commands, sounds.explosion.clone(), config.explosion_volume);
        kills.0.insert(hit.laser);
        commands.entity(hit.laser).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    // ── rects_overlap ─────────────────────────────────────────────────────────

    #[test]
    fn overlapping_rects_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(rects_overlap(a, b));
        assert!(rects_overlap(b, a));
    }

    #[test]
    fn edge_touching_rects_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!rects_overlap(a, b));
    }

    #[test]
    fn disjoint_rects_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(50.0, 50.0, 60.0, 60.0);
        assert!(!rects_overlap(a, b));
    }

    // ── masks_collide ─────────────────────────────────────────────────────────

    #[test]
    fn solid_masks_collide_when_rects_overlap() {
        let mask = PixelMask::solid(8, 8);
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        let b = Rect::new(6.0, 6.0, 14.0, 14.0);
        assert!(masks_collide(&mask, a, &mask, b, 0.0));
    }

    #[test]
    fn overlapping_rects_with_disjoint_opaque_regions_miss() {
        // `a` opaque only in its top-left pixel, `b` only in its
        // bottom-right; the rects overlap but the opaque pixels never do.
        let mut a = PixelMask::solid(4, 4);
        a.bits = vec![false; 16];
        a.bits[0] = true; // (0, 0)
        let mut b = PixelMask::solid(4, 4);
        b.bits = vec![false; 16];
        b.bits[15] = true; // (3, 3)

        let a_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b_rect = Rect::new(2.0, 2.0, 6.0, 6.0);
        assert!(
            !masks_collide(&a, a_rect, &b, b_rect, 0.0),
            "opaque pixels are in opposite corners"
        );
    }

    #[test]
    fn mask_collision_hits_where_opaque_pixels_meet() {
        let mut a = PixelMask::solid(4, 4);
        a.bits = vec![false; 16];
        a.bits[15] = true; // (3, 3): a's bottom-right

        let mut b = PixelMask::solid(4, 4);
        b.bits = vec![false; 16];
        b.bits[0] = true; // (0, 0): b's top-left

        let a_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b_rect = Rect::new(3.0, 3.0, 7.0, 7.0);
        assert!(masks_collide(&a, a_rect, &b, b_rect, 0.0));
    }

    #[test]
    fn rotation_moves_the_opaque_region() {
        // `b` is opaque only in its top-left pixel.  Rotated 180° it shows
        // that pixel in the bottom-right of its bounding rect.
        let mut b = PixelMask::solid(4, 4);
        b.bits = vec![false; 16];
        b.bits[0] = true;

        let probe = PixelMask::solid(1, 1);
        let b_rect = Rect::new(0.0, 0.0, 4.0, 4.0);
        let bottom_right = Rect::new(3.0, 3.0, 4.0, 4.0);

        assert!(!masks_collide(&probe, bottom_right, &b, b_rect, 0.0));
        assert!(masks_collide(&probe, bottom_right, &b, b_rect, 180.0));
    }

    // ── player_mask_hits ──────────────────────────────────────────────────────

    #[test]
    fn all_simultaneously_overlapping_meteors_are_reported() {
        let mask = PixelMask::solid(8, 8);
        let player = Rect::new(100.0, 100.0, 108.0, 108.0);
        let meteors = vec![
            (entity(1), Rect::new(102.0, 102.0, 110.0, 110.0), 0.0),
            (entity(2), Rect::new(96.0, 96.0, 104.0, 104.0), 0.0),
            (entity(3), Rect::new(300.0, 300.0, 308.0, 308.0), 0.0),
        ];
        let hits = player_mask_hits(&mask, player, &mask, &meteors);
        assert_eq!(hits, vec![entity(1), entity(2)]);
    }

    // ── resolve_laser_hits ────────────────────────────────────────────────────

    #[test]
    fn one_laser_reports_one_hit_covering_all_overlapped_meteors() {
        let laser = (entity(1), Rect::new(100.0, 100.0, 106.0, 122.0));
        let meteors = vec![
            (entity(10), Rect::new(95.0, 95.0, 135.0, 135.0)),
            (entity(11), Rect::new(90.0, 105.0, 130.0, 145.0)),
        ];
        let hits = resolve_laser_hits(&[laser], &meteors, &HashSet::new());
        assert_eq!(hits.len(), 1, "one explosion per laser, not per meteor");
        assert_eq!(hits[0].meteors, vec![entity(10), entity(11)]);
        assert_eq!(hits[0].at, Vec2::new(103.0, 100.0), "explosion at laser top-centre");
    }

    #[test]
    fn later_laser_cannot_rekill_an_already_destroyed_meteor() {
        let lasers = [
            (entity(1), Rect::new(100.0, 100.0, 106.0, 122.0)),
            (entity(2), Rect::new(101.0, 100.0, 107.0, 122.0)),
        ];
        let meteors = vec![(entity(10), Rect::new(95.0, 95.0, 135.0, 135.0))];
        let hits = resolve_laser_hits(&lasers, &meteors, &HashSet::new());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].laser, entity(1), "first laser in order wins");
    }

    #[test]
    fn meteors_killed_earlier_in_the_frame_are_invisible() {
        let lasers = [(entity(1), Rect::new(100.0, 100.0, 106.0, 122.0))];
        let meteors = vec![(entity(10), Rect::new(95.0, 95.0, 135.0, 135.0))];
        let mut killed = HashSet::new();
        killed.insert(entity(10));
        assert!(resolve_laser_hits(&lasers, &meteors, &killed).is_empty());
    }

    #[test]
    fn missing_everything_produces_no_hits() {
        let lasers = [(entity(1), Rect::new(0.0, 0.0, 6.0, 22.0))];
        assert!(resolve_laser_hits(&lasers, &[], &HashSet::new()).is_empty());
        assert!(resolve_laser_hits(&[], &[], &HashSet::new()).is_empty());
    }
}
