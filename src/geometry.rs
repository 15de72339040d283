//! Screen-space geometry primitives shared by every entity.
//!
//! The whole simulation runs in screen coordinates: origin at the top-left
//! corner of the viewport, +x right, +y down.  An entity's extent is an
//! axis-aligned [`Rect`] (`min` = top-left, `max` = bottom-right); precise
//! collision additionally uses a per-pixel opacity [`PixelMask`].
//! [`crate::hud::sync_transforms_system`] projects these rects into Bevy's
//! y-up world space once per frame, after all updates.

use bevy::math::{Rect, Vec2};
use bevy::prelude::{Component, Resource};

use crate::constants::LAYER_STEP;

// ── Components ────────────────────────────────────────────────────────────────

/// Current screen-space bounding rect of an entity.
///
/// This is the authoritative position: movement, wrapping and collision all
/// operate on it.  `Transform` is derived from it, never the other way round.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Bounds(pub Rect);

/// Draw layer assigned at spawn time.  Monotonically increasing, so
/// iteration/draw order always equals spawn order: stars first, then the
/// player, then dynamically spawned lasers, meteors and explosions.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Layer(pub f32);

/// Hands out the next draw layer.  One shared counter for every spawn path
/// keeps the spawn-order invariant without any per-type bookkeeping.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DrawOrder {
    next: f32,
}

impl DrawOrder {
    /// Reserve and return the next (strictly higher) draw layer.
    pub fn next(&mut self) -> f32 {
        self.next += LAYER_STEP;
        self.next
    }
}

// ── Rect helpers ──────────────────────────────────────────────────────────────

/// Rect of the given size whose bottom-centre sits at `pos`.
pub fn from_midbottom(pos: Vec2, size: Vec2) -> Rect {
    Rect::from_center_size(pos - Vec2::new(0.0, size.y / 2.0), size)
}

/// Top-centre point of a rect (where lasers leave the ship and explosions
/// bloom).
pub fn midtop(rect: Rect) -> Vec2 {
    Vec2::new((rect.min.x + rect.max.x) / 2.0, rect.min.y)
}

/// Move a rect by `direction * speed * dt`, preserving its size.
pub fn displace(rect: Rect, direction: Vec2, speed: f32, dt: f32) -> Rect {
    Rect::from_center_size(rect.center() + direction * speed * dt, rect.size())
}

/// Axis-aligned bounds of a `size` rect rotated by `angle_deg` about
/// `center`.  The centre never moves; the extents grow and shrink as the
/// sprite turns, exactly like re-fetching the rect of a rotated image.
pub fn rotated_bounds(center: Vec2, size: Vec2, angle_deg: f32) -> Rect {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let extents = Vec2::new(
        size.x * c.abs() + size.y * s.abs(),
        size.x * s.abs() + size.y * c.abs(),
    );
    Rect::from_center_size(center, extents)
}

// ── Pixel masks ───────────────────────────────────────────────────────────────

/// Per-pixel opacity map used for precise collision testing.
///
/// A bit is set where the source sprite's alpha exceeds 127, matching the
/// usual mask-from-surface threshold.  Row-major, `width * height` bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMask {
    pub width: u32,
    pub height: u32,
    pub bits: Vec<bool>,
}

impl PixelMask {
    /// Derive a mask from a row-major RGBA8 buffer.
    pub fn from_alpha(rgba: &[u8], width: u32, height: u32) -> Self {
        let bits = rgba
            .chunks_exact(4)
            .map(|px| px[3] > 127)
            .take((width * height) as usize)
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque mask.  Degrades mask collision to a plain rect test;
    /// used by headless tests that have no sprite pixels.
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Whether the pixel at `(x, y)` is opaque.  Out-of-bounds pixels are
    /// transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }
}
