//! Software projection surface. The scene submits points, sphere impressions,
//! and card quads; this module turns them into an RGBA buffer with a depth
//! test. Everything here is deliberately dumb: no scene graph, no materials,
//! just draw calls.

use crate::geometry::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_deg: f32,
}

pub type Color = (u8, u8, u8);

pub struct Rasterizer {
    w: usize,
    h: usize,
    pixels: Vec<u8>,
    depth: Vec<f32>,
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f32,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            w: 0,
            h: 0,
            pixels: Vec::new(),
            depth: Vec::new(),
            eye: Vec3::ZERO,
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            focal: 1.0,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if w == self.w && h == self.h {
            return;
        }
        self.w = w;
        self.h = h;
        self.pixels.resize(w * h * 4, 0);
        self.depth.resize(w * h, f32::INFINITY);
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Clear the frame and rebuild the view basis from the camera.
    pub fn begin(&mut self, camera: &Camera, clear: Color) {
        self.eye = camera.eye;
        self.forward = (camera.target - camera.eye).normalized();
        let world_up = Vec3::new(0.0, 1.0, 0.0);
        self.right = self.forward.cross(world_up).normalized();
        self.up = self.right.cross(self.forward).normalized();
        // Vertical field of view; half-block cells are close enough to square
        // that no pixel-aspect correction is applied.
        self.focal = (self.h as f32 / 2.0) / (camera.fov_deg.to_radians() / 2.0).tan();

        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = clear.0;
            px[1] = clear.1;
            px[2] = clear.2;
            px[3] = 255;
        }
        self.depth.fill(f32::INFINITY);
    }

    fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let rel = p - self.eye;
        let z = rel.dot(self.forward);
        if z < 0.1 {
            return None;
        }
        let x = rel.dot(self.right);
        let y = rel.dot(self.up);
        let sx = self.w as f32 / 2.0 + x * self.focal / z;
        let sy = self.h as f32 / 2.0 - y * self.focal / z;
        Some((sx, sy, z))
    }

    fn put(&mut self, x: i32, y: i32, z: f32, color: Color, ignore_depth: bool) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return;
        }
        let idx = y as usize * self.w + x as usize;
        if !ignore_depth && z >= self.depth[idx] {
            return;
        }
        self.depth[idx] = z;
        let i = idx * 4;
        self.pixels[i] = color.0;
        self.pixels[i + 1] = color.1;
        self.pixels[i + 2] = color.2;
        self.pixels[i + 3] = 255;
    }

    /// A size-attenuated particle splat; sub-pixel points still land one cell.
    pub fn point(&mut self, p: Vec3, world_size: f32, color: Color) {
        let Some((sx, sy, z)) = self.project(p) else {
            return;
        };
        let r = (world_size * self.focal / z).clamp(0.5, 3.0);
        self.fill_circle(sx, sy, r, z, |_| color, false);
    }

    /// Shaded ball impression. `glint` rotates the highlight around the
    /// surface, which is the only place instance rotation shows up at this
    /// resolution.
    pub fn sphere(&mut self, center: Vec3, world_radius: f32, color: Color, glint: f32) {
        let Some((sx, sy, z)) = self.project(center) else {
            return;
        };
        let r = (world_radius * self.focal / z).clamp(0.8, 40.0);
        let hx = sx + glint.cos() * r * 0.35;
        let hy = sy - glint.sin() * r * 0.35;
        self.fill_circle(sx, sy, r, z, |(px, py)| {
            let dx = px - hx;
            let dy = py - hy;
            let d = (dx * dx + dy * dy).sqrt() / r.max(1.0);
            shade(color, (1.25 - 0.8 * d).clamp(0.35, 1.25))
        }, false);
    }

    fn fill_circle(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        z: f32,
        color_at: impl Fn((f32, f32)) -> Color,
        ignore_depth: bool,
    ) {
        let x0 = (cx - r).floor() as i32;
        let x1 = (cx + r).ceil() as i32;
        let y0 = (cy - r).floor() as i32;
        let y1 = (cy + r).ceil() as i32;
        let rr = r * r;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= rr.max(0.25) {
                    self.put(x, y, z, color_at((x as f32, y as f32)), ignore_depth);
                }
            }
        }
    }

    /// Polaroid impression: ivory frame, photo window, caption strip.
    /// `facing` in `[0,1]` foreshortens the width; `topmost` skips the depth
    /// test so a zoomed card wins against everything it overlaps.
    pub fn card(
        &mut self,
        center: Vec3,
        half_w: f32,
        half_h: f32,
        facing: f32,
        frame_color: Color,
        photo_color: Color,
        topmost: bool,
    ) {
        let Some((sx, sy, z)) = self.project(center) else {
            return;
        };
        let hw = (half_w * facing.max(0.15) * self.focal / z).max(1.0);
        let hh = (half_h * self.focal / z).max(1.0);
        let x0 = (sx - hw) as i32;
        let x1 = (sx + hw) as i32;
        let y0 = (sy - hh) as i32;
        let y1 = (sy + hh) as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let u = (x as f32 - (sx - hw)) / (2.0 * hw);
                let v = (y as f32 - (sy - hh)) / (2.0 * hh);
                let in_photo = u > 0.12 && u < 0.88 && v > 0.08 && v < 0.72;
                let in_caption = u > 0.2 && u < 0.8 && v > 0.8 && v < 0.86;
                let color = if in_photo {
                    photo_color
                } else if in_caption {
                    shade(frame_color, 0.55)
                } else {
                    frame_color
                };
                self.put(x, y, z, color, topmost);
            }
        }
    }

    /// Flat circle outline in the xz-plane, used for the floor impression.
    pub fn ground_ring(&mut self, center: Vec3, radius: f32, color: Color) {
        let segments = 256;
        for i in 0..segments {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            let p = center + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius);
            self.point(p, 0.08, color);
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn shade(color: Color, factor: f32) -> Color {
    (
        (color.0 as f32 * factor).min(255.0) as u8,
        (color.1 as f32 * factor).min(255.0) as u8,
        (color.2 as f32 * factor).min(255.0) as u8,
    )
}
