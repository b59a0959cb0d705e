use std::f32::consts::FRAC_1_PI;

use glam::{Vec2, Vec3};
use image::RgbImage;

use super::lighting::{accumulate, resolve_color, Light, Material};

/// Spherical environment image in equirectangular layout.
///
/// Lookups repeat horizontally (longitude wraps) and clamp vertically
/// (latitude stops at the poles).
pub struct EnvironmentMap {
    image: RgbImage,
}

impl EnvironmentMap {
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Nearest-texel lookup, colors in [0, 1]. An empty image reads as black.
    pub fn lookup(&self, uv: Vec2) -> Vec3 {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return Vec3::ZERO;
        }
        let u = uv.x - uv.x.floor();
        let v = uv.y.clamp(0.0, 1.0);

        let x = ((u * w as f32) as u32).min(w - 1);
        let y = ((v * h as f32) as u32).min(h - 1);

        let [r, g, b] = self.image.get_pixel(x, y).0;
        Vec3::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Mirror `incident` about `normal`: `I - 2(I·N)N`.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Map a direction to equirectangular texture coordinates.
///
/// +Z lands on the image centre, longitude runs along u and latitude along v
/// with +Y at the top edge.
pub fn direction_to_uv(dir: Vec3) -> Vec2 {
    let theta = dir.x.atan2(dir.z);
    // round-off can push y just past ±1 near the poles
    let phi = dir.y.clamp(-1.0, 1.0).asin();
    Vec2::new(0.5 + 0.5 * theta * FRAC_1_PI, 0.5 - phi * FRAC_1_PI)
}

/// Color the environment reflects towards the eye at `point`.
pub fn sample_environment(eye: Vec3, point: Vec3, normal: Vec3, env: &EnvironmentMap) -> Vec3 {
    let incident = (point - eye).normalize();
    env.lookup(direction_to_uv(reflect(incident, normal)))
}

/// Reflective pipeline: lit base color blended linearly towards the environment.
pub fn shade_reflective(
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    lights: &[Light],
    material: &Material,
    env: &EnvironmentMap,
    reflectivity: f32,
) -> Vec3 {
    let fall = accumulate(point, normal, eye, lights, material);
    let lit = resolve_color(&fall, material);
    lit.lerp(sample_environment(eye, point, normal, env), reflectivity)
}
