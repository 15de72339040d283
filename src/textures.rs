//! Procedural sprite textures and their collision masks.
//!
//! The game ships no image files: every sprite is painted into an RGBA
//! buffer at startup and registered in `Assets<Image>`.  The player and
//! meteor pixel masks are derived from the same buffers, so precise
//! collision always agrees with what is on screen.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::constants::{
    EXPLOSION_FRAME_COUNT, EXPLOSION_SIZE, LASER_SIZE, METEOR_SIZE, PLAYER_SIZE, STAR_SIZE,
};
use crate::geometry::PixelMask;

// ── Sprite handle registry ────────────────────────────────────────────────────

/// Handles, base extents and collision masks for every sprite in the game.
///
/// Initialised with placeholder handles (`Default`); [`setup_sprites`]
/// overwrites them at startup.  Headless tests keep the defaults: solid
/// masks make mask collision behave like a plain rect test.
#[derive(Resource)]
pub struct GameSprites {
    pub player: Handle<Image>,
    pub player_size: Vec2,
    pub player_mask: PixelMask,
    pub star: Handle<Image>,
    pub star_size: Vec2,
    pub laser: Handle<Image>,
    pub laser_size: Vec2,
    pub meteor: Handle<Image>,
    pub meteor_size: Vec2,
    pub meteor_mask: PixelMask,
    pub explosion_frames: Vec<Handle<Image>>,
    pub explosion_size: Vec2,
}

impl Default for GameSprites {
    fn default() -> Self {
        Self {
            player: Handle::default(),
            player_size: PLAYER_SIZE,
            player_mask: PixelMask::solid(PLAYER_SIZE.x as u32, PLAYER_SIZE.y as u32),
            star: Handle::default(),
            star_size: STAR_SIZE,
            laser: Handle::default(),
            laser_size: LASER_SIZE,
            meteor: Handle::default(),
            meteor_size: METEOR_SIZE,
            meteor_mask: PixelMask::solid(METEOR_SIZE.x as u32, METEOR_SIZE.y as u32),
            explosion_frames: vec![Handle::default(); EXPLOSION_FRAME_COUNT],
            explosion_size: EXPLOSION_SIZE,
        }
    }
}

/// Startup system: paint every sprite, derive the collision masks, and
/// register the images.  Must run before any spawn system.
pub fn setup_sprites(mut sprites: ResMut<GameSprites>, mut images: ResMut<Assets<Image>>) {
    let player = paint_player();
    sprites.player_mask = player.mask();
    sprites.player = images.add(player.into_image());

    sprites.star = images.add(paint_star().into_image());
    sprites.laser = images.add(paint_laser().into_image());

    let meteor = paint_meteor();
    sprites.meteor_mask = meteor.mask();
    sprites.meteor = images.add(meteor.into_image());

    sprites.explosion_frames = (0..EXPLOSION_FRAME_COUNT)
        .map(|i| images.add(paint_explosion_frame(i).into_image()))
        .collect();

    info!("sprites painted and registered");
}

// ── Pixel canvas ──────────────────────────────────────────────────────────────

/// Minimal RGBA8 paint surface for building sprites in code.
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    /// Overwrite a single pixel.  Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let i = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&color);
    }

    /// Fill the disc of radius `r` centred at `(cx, cy)`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: [u8; 4]) {
        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Fill an axis-aligned rectangle (half-open on the max edges).
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: [u8; 4]) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Fill a triangle by testing each pixel centre against the three edges.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [u8; 4]) {
        let edge = |p: Vec2, q: Vec2, r: Vec2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
        let (x0, x1) = (
            a.x.min(b.x).min(c.x).floor() as i32,
            a.x.max(b.x).max(c.x).ceil() as i32,
        );
        let (y0, y1) = (
            a.y.min(b.y).min(c.y).floor() as i32,
            a.y.max(b.y).max(c.y).ceil() as i32,
        );
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let e0 = edge(a, b, p);
                let e1 = edge(b, c, p);
                let e2 = edge(c, a, p);
                // Accept either winding so callers need not care about order.
                if (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0) {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Collision mask of the current pixels (alpha > 127).
    pub fn mask(&self) -> PixelMask {
        PixelMask::from_alpha(&self.data, self.width, self.height)
    }

    /// Convert into a GPU-ready Bevy image.
    pub fn into_image(self) -> Image {
        Image::new(
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            self.data,
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::RENDER_WORLD,
        )
    }
}

// ── Sprite painters ───────────────────────────────────────────────────────────

fn paint_player() -> Canvas {
    let (w, h) = (PLAYER_SIZE.x as u32, PLAYER_SIZE.y as u32);
    let mut canvas = Canvas::new(w, h);
    let hull = [200, 205, 220, 255];
    let trim = [120, 130, 160, 255];
    let glass = [120, 220, 240, 255];

    // Dart-shaped fuselage: nose at top centre, fins swept to the bottom corners.
    let nose = Vec2::new(w as f32 / 2.0, 1.0);
    let left = Vec2::new(3.0, h as f32 - 3.0);
    let right = Vec2::new(w as f32 - 3.0, h as f32 - 3.0);
    canvas.fill_triangle(nose, left, right, hull);
    // Tail notch so the silhouette reads as a ship, not a plain triangle.
    canvas.fill_triangle(
        Vec2::new(w as f32 / 2.0, h as f32 - 14.0),
        Vec2::new(w as f32 / 2.0 - 7.0, h as f32 - 2.0),
        Vec2::new(w as f32 / 2.0 + 7.0, h as f32 - 2.0),
        trim,
    );
    canvas.fill_circle(w as f32 / 2.0, h as f32 * 0.45, 4.5, glass);
    canvas
}

fn paint_star() -> Canvas {
    let (w, h) = (STAR_SIZE.x as u32, STAR_SIZE.y as u32);
    let mut canvas = Canvas::new(w, h);
    canvas.fill_circle(w as f32 / 2.0, h as f32 / 2.0, w as f32 / 2.0, [210, 210, 230, 160]);
    canvas.fill_circle(w as f32 / 2.0, h as f32 / 2.0, w as f32 / 4.0, [245, 245, 255, 255]);
    canvas
}

fn paint_laser() -> Canvas {
    let (w, h) = (LASER_SIZE.x as u32, LASER_SIZE.y as u32);
    let mut canvas = Canvas::new(w, h);
    canvas.fill_rect(0, 0, w as i32, h as i32, [120, 200, 255, 220]);
    canvas.fill_rect(1, 1, w as i32 - 1, h as i32 - 1, [225, 245, 255, 255]);
    canvas
}

fn paint_meteor() -> Canvas {
    let (w, h) = (METEOR_SIZE.x as u32, METEOR_SIZE.y as u32);
    let mut canvas = Canvas::new(w, h);
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    canvas.fill_circle(cx, cy, w as f32 / 2.0 - 1.0, [150, 120, 100, 255]);
    canvas.fill_circle(cx - 3.0, cy - 3.0, w as f32 / 2.0 - 5.0, [178, 146, 120, 255]);
    // Craters
    canvas.fill_circle(cx - 8.0, cy - 4.0, 4.0, [130, 103, 84, 255]);
    canvas.fill_circle(cx + 6.0, cy + 7.0, 5.0, [130, 103, 84, 255]);
    canvas.fill_circle(cx + 9.0, cy - 9.0, 2.5, [120, 94, 76, 255]);
    canvas
}

fn paint_explosion_frame(index: usize) -> Canvas {
    let (w, h) = (EXPLOSION_SIZE.x as u32, EXPLOSION_SIZE.y as u32);
    let mut canvas = Canvas::new(w, h);
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let t = index as f32 / (EXPLOSION_FRAME_COUNT - 1) as f32;

    // Fireball grows through the sequence while fading out near the end.
    let radius = 5.0 + t * (w as f32 / 2.0 - 6.0);
    let alpha = (if t < 0.7 { 255.0 } else { 255.0 * (1.0 - t) / 0.3 }) as u8;
    canvas.fill_circle(cx, cy, radius, [210, 80, 30, alpha]);
    canvas.fill_circle(cx, cy, radius * 0.7, [240, 160, 40, alpha]);
    if t < 0.5 {
        canvas.fill_circle(cx, cy, radius * 0.4, [255, 235, 180, alpha]);
    }
    canvas
}
