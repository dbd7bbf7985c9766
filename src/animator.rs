//! Frame-rate-independent morph animation: a smoothed progress value per
//! component, dual-position blending, and the per-population modulation
//! curves (drift, sway, twinkle, strobe, card zoom).

use crate::geometry::{DecorSeed, FoliageSeed, Vec3};

/// Below this progress the scene is considered at rest and oscillation
/// contributes exactly zero.
pub const OSCILLATION_THRESHOLD: f32 = 0.1;
/// Card zoom uses a faster time constant than the chaos morph.
pub const ZOOM_SPEED: f32 = 4.0;
/// Where a zoomed card parks: centered in view, close to the camera.
pub const ZOOM_ANCHOR: Vec3 = Vec3::new(0.0, 4.0, 14.0);
pub const ZOOM_SCALE: f32 = 3.5;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Exponentially smoothed progress toward a moving target. One per visual
/// component; ticking is the only mutation.
#[derive(Debug, Clone, Copy)]
pub struct MorphProgress {
    current: f32,
    speed: f32,
}

impl MorphProgress {
    pub fn new(speed: f32) -> Self {
        Self {
            current: 0.0,
            speed,
        }
    }

    pub fn value(&self) -> f32 {
        self.current
    }

    /// `current += (target - current) * min(1, dt * speed)`. The clamp makes a
    /// huge delta land exactly on the target instead of overshooting.
    pub fn tick(&mut self, target: f32, dt: f32) -> f32 {
        self.current += (target - self.current) * (dt * self.speed).min(1.0);
        self.current
    }
}

/// Blend between the two homes. Endpoints are exact: progress 0 is the tree
/// position bit-for-bit, progress 1 the chaos position.
pub fn blend(tree: Vec3, chaos: Vec3, progress: f32) -> Vec3 {
    if progress <= 0.0 {
        return tree;
    }
    if progress >= 1.0 {
        return chaos;
    }
    tree + (chaos - tree) * progress
}

/// Turbulence for foliage needles, growing with progress.
pub fn foliage_drift(progress: f32, t: f32, random: f32) -> Vec3 {
    if progress <= OSCILLATION_THRESHOLD {
        return Vec3::ZERO;
    }
    Vec3::new(
        (t * 2.0 + random * 10.0).sin() * 0.5 * progress,
        (t * 1.5 + random * 10.0).cos() * 0.5 * progress,
        (t * 2.5 + random * 10.0).sin() * 0.5 * progress,
    )
}

/// Gentle bob for ornaments once the morph is under way.
pub fn decor_sway(progress: f32, t: f32, phase: f32) -> Vec3 {
    if progress <= OSCILLATION_THRESHOLD {
        return Vec3::ZERO;
    }
    Vec3::new(
        (t * 0.5 + phase).cos() * 0.02 * progress,
        (t + phase).sin() * 0.02 * progress,
        0.0,
    )
}

pub fn foliage_position(seed: &FoliageSeed, progress: f32, t: f32) -> Vec3 {
    blend(seed.tree, seed.chaos, progress) + foliage_drift(progress, t, seed.random)
}

pub fn decor_position(seed: &DecorSeed, progress: f32, t: f32) -> Vec3 {
    blend(seed.tree, seed.chaos, progress) + decor_sway(progress, t, seed.phase)
}

/// Needle shimmer used to lift the foliage color in chaos.
pub fn sparkle(t: f32, random: f32) -> f32 {
    (t * 3.0 + random * 20.0).sin().abs()
}

/// Lights breathe around their base scale.
pub fn twinkle_scale(scale: f32, t: f32, phase: f32) -> f32 {
    scale * (1.0 + (t * 3.0 + phase).sin() * 0.3)
}

/// Flashers snap between near-zero and enlarged; an on/off blink, not a pulse.
pub fn strobe_scale(scale: f32, t: f32, phase: f32) -> f32 {
    if (t * 10.0 + phase).sin() > 0.5 {
        scale * 1.5
    } else {
        0.01
    }
}

pub fn card_scale(zoom: f32) -> f32 {
    lerp(1.0, ZOOM_SCALE, zoom)
}
