use std::f32::consts::PI;
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < 1e-6 {
            return Self::ZERO;
        }
        self * (1.0 / len)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Shape parameters shared by every population.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub height: f32,
    pub radius: f32,
    pub chaos_radius: f32,
}

/// One foliage needle: two homes plus a color/oscillation seed.
#[derive(Debug, Clone, Copy)]
pub struct FoliageSeed {
    pub tree: Vec3,
    pub chaos: Vec3,
    pub random: f32,
}

/// One decoration instance (ornament, light, or flasher).
#[derive(Debug, Clone, Copy)]
pub struct DecorSeed {
    pub tree: Vec3,
    pub chaos: Vec3,
    pub scale: f32,
    pub phase: f32,
    pub rotation_speed: f32,
}

/// One photo card on the spiral.
#[derive(Debug, Clone, Copy)]
pub struct CardSeed {
    pub tree: Vec3,
    pub chaos: Vec3,
    pub yaw: f32,
    pub roll: f32,
}

/// Point on the cone silhouette: wide at the base, narrow at the top.
pub fn cone_point(ratio: f32, theta: f32, params: &TreeParams, radius_factor: f32, jitter: f32) -> Vec3 {
    let y = ratio * params.height - params.height / 2.0;
    let r = (1.0 - ratio) * params.radius * radius_factor + jitter;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Uniform-by-volume point inside a sphere (inverse-CDF; cube root keeps the
/// density from biasing toward the surface).
pub fn sphere_volume_point(radius: f32) -> Vec3 {
    let theta = 2.0 * PI * fastrand::f32();
    let phi = (2.0 * fastrand::f32() - 1.0).acos();
    let r = radius * fastrand::f32().cbrt();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Point on the outer half of a sphere, for populations that should scatter
/// far from the center rather than fill it.
pub fn sphere_shell_point(radius: f32) -> Vec3 {
    let theta = 2.0 * PI * fastrand::f32();
    let phi = (2.0 * fastrand::f32() - 1.0).acos();
    let r = radius * (0.5 + fastrand::f32() * 0.5);
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

fn cube_point(half_extent: f32) -> Vec3 {
    Vec3::new(
        (fastrand::f32() - 0.5) * 2.0 * half_extent,
        (fastrand::f32() - 0.5) * 2.0 * half_extent,
        (fastrand::f32() - 0.5) * 2.0 * half_extent,
    )
}

/// Card scatter: wide in x/y, pushed toward the viewer in z.
fn slab_point() -> Vec3 {
    Vec3::new(
        (fastrand::f32() - 0.5) * 30.0,
        (fastrand::f32() - 0.5) * 30.0,
        (fastrand::f32() - 0.5) * 10.0 + 15.0,
    )
}

pub fn foliage_seeds(count: usize, params: &TreeParams) -> Vec<FoliageSeed> {
    let mut seeds = Vec::with_capacity(count);
    for i in 0..count {
        let ratio = i as f32 / count.max(1) as f32;
        let theta = fastrand::f32() * 2.0 * PI;
        seeds.push(FoliageSeed {
            tree: cone_point(ratio, theta, params, 1.0, fastrand::f32() * 0.5),
            chaos: sphere_volume_point(params.chaos_radius),
            random: fastrand::f32(),
        });
    }
    seeds
}

pub fn ornament_seeds(count: usize, params: &TreeParams) -> Vec<DecorSeed> {
    let mut seeds = Vec::with_capacity(count);
    for _ in 0..count {
        let ratio = fastrand::f32();
        let theta = fastrand::f32() * 2.0 * PI;
        seeds.push(DecorSeed {
            // Slightly inside the foliage so the balls look hung, not floated.
            tree: cone_point(ratio, theta, params, 0.9, 0.0),
            chaos: sphere_shell_point(params.chaos_radius),
            scale: 0.2 + fastrand::f32() * 0.25,
            phase: fastrand::f32() * PI,
            rotation_speed: (fastrand::f32() - 0.5) * 2.0,
        });
    }
    seeds
}

/// Lights wind up the tree on a deterministic helix.
pub fn light_seeds(count: usize, params: &TreeParams) -> Vec<DecorSeed> {
    let mut seeds = Vec::with_capacity(count);
    for i in 0..count {
        let ratio = i as f32 / count.max(1) as f32;
        let theta = i as f32 * 0.5;
        seeds.push(DecorSeed {
            tree: cone_point(ratio, theta, params, 1.05, 0.0),
            chaos: cube_point(20.0),
            scale: 0.08,
            phase: fastrand::f32() * 10.0,
            rotation_speed: 0.0,
        });
    }
    seeds
}

pub fn flasher_seeds(count: usize, params: &TreeParams) -> Vec<DecorSeed> {
    let mut seeds = Vec::with_capacity(count);
    for _ in 0..count {
        let ratio = fastrand::f32();
        let theta = fastrand::f32() * 2.0 * PI;
        seeds.push(DecorSeed {
            tree: cone_point(ratio, theta, params, 0.8, 0.0),
            chaos: cube_point(10.0),
            scale: 0.15,
            phase: fastrand::f32() * 100.0,
            rotation_speed: 0.0,
        });
    }
    seeds
}

/// Photo cards orbit the tree on a three-turn spiral, facing outward.
pub fn card_seeds(count: usize, params: &TreeParams) -> Vec<CardSeed> {
    let mut seeds = Vec::with_capacity(count);
    for i in 0..count {
        let t = i as f32 / count.max(1) as f32;
        let theta = t * PI * 6.0;
        let y = t * params.height - params.height / 2.0;
        let r = (1.0 - t) * params.radius * 1.3 + 0.5;
        seeds.push(CardSeed {
            tree: Vec3::new(r * theta.cos(), y, r * theta.sin()),
            chaos: slab_point(),
            yaw: -theta,
            roll: fastrand::f32() * 0.2 - 0.1,
        });
    }
    seeds
}
