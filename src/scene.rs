//! Scene composition: the three particle populations, the photo cards, the
//! camera rig, and the static dressing, all driven from the store once per
//! frame and drawn into the rasterizer.

use crate::animator::{
    blend, card_scale, decor_position, foliage_position, sparkle, strobe_scale, twinkle_scale,
    MorphProgress, ZOOM_ANCHOR, ZOOM_SPEED,
};
use crate::config::Config;
use crate::geometry::{
    card_seeds, flasher_seeds, foliage_seeds, light_seeds, ornament_seeds, CardSeed, DecorSeed,
    FoliageSeed, TreeParams, Vec3,
};
use crate::raster::{Camera, Color, Rasterizer};
use crate::store::Store;

pub const EMERALD: Color = (0, 66, 37);
pub const GOLD: Color = (255, 215, 0);
pub const CHAMPAGNE: Color = (247, 231, 206);
pub const RED_VELVET: Color = (128, 0, 32);
pub const SNOW: Color = (255, 255, 255);
pub const BACKGROUND: Color = (0, 5, 0);
const IVORY: Color = (255, 255, 240);
const FLOOR_TONE: Color = (0, 26, 9);
const ORNAMENT_COLORS: [Color; 4] = [GOLD, RED_VELVET, CHAMPAGNE, EMERALD];

/// Needle color ramp endpoints (dark to lit emerald).
const NEEDLE_DARK: Color = (0, 66, 38);
const NEEDLE_LIT: Color = (0, 102, 51);

/// Everything hangs slightly below eye level.
const GROUP_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);
const CAMERA_BASE: Vec3 = Vec3::new(0.0, 4.0, 20.0);
const LOOK_TARGET: Vec3 = Vec3::new(0.0, 4.0, 0.0);
const CAMERA_FOV_DEG: f32 = 50.0;
/// Fixed per-frame approach coefficient for the camera follow.
const CAMERA_FOLLOW: f32 = 0.05;

const FOLIAGE_POINT_SIZE: f32 = 0.06;

fn mix_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    (
        (a.0 as f32 + (b.0 as f32 - a.0 as f32) * t) as u8,
        (a.1 as f32 + (b.1 as f32 - a.1 as f32) * t) as u8,
        (a.2 as f32 + (b.2 as f32 - a.2 as f32) * t) as u8,
    )
}

fn lift_color(c: Color, amount: f32) -> Color {
    let add = (amount * 255.0).clamp(0.0, 255.0);
    (
        (c.0 as f32 + add).min(255.0) as u8,
        (c.1 as f32 + add).min(255.0) as u8,
        (c.2 as f32 + add).min(255.0) as u8,
    )
}

pub struct Foliage {
    seeds: Vec<FoliageSeed>,
    progress: MorphProgress,
}

impl Foliage {
    pub fn new(count: usize, params: &TreeParams, speed: f32) -> Self {
        Self {
            seeds: foliage_seeds(count, params),
            progress: MorphProgress::new(speed),
        }
    }

    pub fn advance(&mut self, target: f32, dt: f32) {
        self.progress.tick(target, dt);
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn draw(&self, raster: &mut Rasterizer, t: f32) {
        let p = self.progress.value();
        for seed in &self.seeds {
            let pos = foliage_position(seed, p, t) + GROUP_OFFSET;
            let mut color = mix_color(NEEDLE_DARK, NEEDLE_LIT, seed.random);
            // Needles shimmer only as the scene breaks apart.
            color = lift_color(color, sparkle(t, seed.random) * 0.2 * p);
            raster.point(pos, FOLIAGE_POINT_SIZE, color);
        }
    }
}

/// Ornaments, string lights, and strobe flashers; one shared morph progress.
pub struct Decorations {
    ornaments: Vec<DecorSeed>,
    ornament_colors: Vec<Color>,
    lights: Vec<DecorSeed>,
    flashers: Vec<DecorSeed>,
    progress: MorphProgress,
}

impl Decorations {
    pub fn new(cfg: &Config, params: &TreeParams) -> Self {
        let ornaments = ornament_seeds(cfg.ornament_count, params);
        let ornament_colors = (0..ornaments.len())
            .map(|_| ORNAMENT_COLORS[fastrand::usize(..ORNAMENT_COLORS.len())])
            .collect();
        Self {
            ornaments,
            ornament_colors,
            lights: light_seeds(cfg.light_count, params),
            flashers: flasher_seeds(cfg.flasher_count, params),
            progress: MorphProgress::new(cfg.animation_speed),
        }
    }

    pub fn advance(&mut self, target: f32, dt: f32) {
        self.progress.tick(target, dt);
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn draw(&self, raster: &mut Rasterizer, t: f32) {
        let p = self.progress.value();

        for (seed, color) in self.ornaments.iter().zip(&self.ornament_colors) {
            let pos = decor_position(seed, p, t) + GROUP_OFFSET;
            // The spin only shows as the glint wandering over the ball.
            let glint = t * seed.rotation_speed * 0.5;
            raster.sphere(pos, seed.scale, *color, glint);
        }

        for seed in &self.lights {
            let pos = blend(seed.tree, seed.chaos, p) + GROUP_OFFSET;
            let scale = twinkle_scale(seed.scale, t, seed.phase);
            raster.sphere(pos, scale, GOLD, 0.0);
        }

        for seed in &self.flashers {
            let pos = blend(seed.tree, seed.chaos, p) + GROUP_OFFSET;
            let scale = strobe_scale(seed.scale, t, seed.phase);
            // Off state is effectively invisible; skip the draw entirely.
            if scale > 0.05 {
                raster.sphere(pos, scale, SNOW, 0.0);
            }
        }
    }
}

pub struct Polaroids {
    seeds: Vec<CardSeed>,
    zoom: Vec<MorphProgress>,
    progress: MorphProgress,
    images_revision: Option<u64>,
    params: TreeParams,
}

impl Polaroids {
    pub fn new(params: TreeParams, speed: f32) -> Self {
        Self {
            seeds: Vec::new(),
            zoom: Vec::new(),
            progress: MorphProgress::new(speed),
            images_revision: None,
            params,
        }
    }

    /// Rebuild the spiral when the gallery is replaced. Zoom progress resets
    /// with it; a replaced list has no card mid-zoom by construction.
    fn sync(&mut self, store: &Store) {
        if self.images_revision == Some(store.images_revision()) {
            return;
        }
        self.images_revision = Some(store.images_revision());
        let count = store.images().len();
        self.seeds = card_seeds(count, &self.params);
        self.zoom = vec![MorphProgress::new(ZOOM_SPEED); count];
    }

    pub fn advance(&mut self, store: &Store, dt: f32) {
        self.sync(store);
        self.progress.tick(store.chaos_level(), dt);
        for (i, zoom) in self.zoom.iter_mut().enumerate() {
            let target = if store.zoomed_image_index() == Some(i) {
                1.0
            } else {
                0.0
            };
            zoom.tick(target, dt);
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn draw(&self, raster: &mut Rasterizer, t: f32) {
        let chaos = self.progress.value();

        // Cards draw in ascending zoom order so an active zoom paints last.
        let mut order: Vec<usize> = (0..self.seeds.len()).collect();
        order.sort_by(|&a, &b| {
            self.zoom[a]
                .value()
                .partial_cmp(&self.zoom[b].value())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for &i in &order {
            let seed = &self.seeds[i];
            let zoom = self.zoom[i].value();
            let base = blend(seed.tree, seed.chaos, chaos) + GROUP_OFFSET;
            let pos = blend(base, ZOOM_ANCHOR, zoom);
            let scale = card_scale(zoom);
            let facing = if zoom > 0.1 {
                // Zooming overrides everything: face the viewer.
                1.0
            } else if chaos > 0.5 {
                0.85
            } else {
                let yaw = seed.yaw + (t + i as f32).sin() * 0.1;
                yaw.cos().abs().max(0.15)
            };
            raster.card(
                pos,
                0.6 * scale,
                0.75 * scale,
                facing,
                IVORY,
                photo_tone(i),
                zoom > 0.5,
            );
        }
    }
}

/// Stand-in tint for a photo we cannot decode at this resolution; varies per
/// card so the gallery does not read as copies.
fn photo_tone(index: usize) -> Color {
    let k = (index * 53 % 60) as u8;
    (60 + k, 80 + k / 2, 105 + k)
}

pub struct CameraRig {
    x: f32,
    y: f32,
}

impl CameraRig {
    pub fn new() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Ease toward the hand when tracked, else toward the pointer.
    pub fn advance(&mut self, store: &Store, pointer: (f32, f32)) {
        let (tx, ty) = if store.is_hand_detected() {
            let (hx, hy) = store.hand_position();
            (hx * 5.0, hy * 2.0)
        } else {
            (pointer.0 * 2.0, pointer.1 * 2.0)
        };
        self.x += (tx - self.x) * CAMERA_FOLLOW;
        self.y += (ty - self.y) * CAMERA_FOLLOW;
    }

    pub fn camera(&self) -> Camera {
        Camera {
            eye: CAMERA_BASE + Vec3::new(self.x, self.y, 0.0),
            target: LOOK_TARGET,
            fov_deg: CAMERA_FOV_DEG,
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Scene {
    pub foliage: Foliage,
    pub decorations: Decorations,
    pub polaroids: Polaroids,
    rig: CameraRig,
    params: TreeParams,
}

impl Scene {
    pub fn new(cfg: &Config) -> Self {
        let params = cfg.tree_params();
        Self {
            foliage: Foliage::new(cfg.foliage_count, &params, cfg.animation_speed),
            decorations: Decorations::new(cfg, &params),
            polaroids: Polaroids::new(params, cfg.animation_speed),
            rig: CameraRig::new(),
            params,
        }
    }

    pub fn advance(&mut self, store: &Store, pointer: (f32, f32), dt: f32) {
        let target = store.chaos_level();
        self.foliage.advance(target, dt);
        self.decorations.advance(target, dt);
        self.polaroids.advance(store, dt);
        self.rig.advance(store, pointer);
    }

    pub fn draw(&self, raster: &mut Rasterizer, t: f32) {
        raster.begin(&self.rig.camera(), BACKGROUND);
        self.draw_dressing(raster);
        self.foliage.draw(raster, t);
        self.decorations.draw(raster, t);
        self.polaroids.draw(raster, t);
    }

    /// Trunk stand and floor impression under the tree.
    fn draw_dressing(&self, raster: &mut Rasterizer) {
        let base_y = -self.params.height / 2.0 + GROUP_OFFSET.y;
        for k in 0..3 {
            let y = base_y - 0.3 - k as f32 * 0.5;
            raster.sphere(Vec3::new(0.0, y, 0.0), 1.0 + k as f32 * 0.18, (212, 175, 55), 0.0);
        }
        raster.ground_ring(Vec3::new(0.0, base_y - 1.5, 0.0), 8.0, FLOOR_TONE);
    }
}
