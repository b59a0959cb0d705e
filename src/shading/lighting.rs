use std::ops::{Add, AddAssign};

use glam::Vec3;

/// Most lights the surface shaders accept in `u_lights`.
pub const MAX_LIGHTS: usize = 8;

/// Point light with a smooth half-distance falloff.
///
/// Also spawned as a scene component. The app collects them once at startup
/// and the renderer uploads them to the surface shaders every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub strength: f32,
    /// Distance at which attenuation drops to half of `strength`.
    pub half_distance: f32,
    /// Added to the diffuse term as a floor. Not clamped.
    pub ambient: f32,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Light {
    /// White light with matching diffuse and specular colors.
    pub fn white(position: Vec3) -> Self {
        Self {
            position,
            strength: 1.5,
            half_distance: 1.0,
            ambient: 0.8,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.diffuse = color;
        self.specular = color;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    /// `strength * h² / (h² + d²)`: equals `strength` at the light, half of it at `half_distance`.
    pub fn attenuation(&self, distance_sqr: f32) -> f32 {
        let hh = self.half_distance * self.half_distance;
        self.strength * hh / (hh + distance_sqr)
    }
}

/// The three fixed lights of the birthday scene.
pub fn birthday_lights() -> [Light; 3] {
    // key light, top right
    let key = Light::white(Vec3::new(0.5, 1.5, -0.5));
    // blue glow from under the table
    let under = Light {
        position: Vec3::new(0.0, -0.95, 0.0),
        ..key
    }
    .with_color(Vec3::new(0.0, 0.0, 1.0));
    // dimmer white fill, bottom left
    let fill = Light {
        position: Vec3::new(-0.7, -0.6, 0.0),
        ..key
    }
    .with_strength(0.7);
    [key, under, fill]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    /// Glossy white highlight over a textured base, as used on cake surfaces.
    pub fn textured(diffuse: Vec3) -> Self {
        Self {
            diffuse,
            specular: Vec3::ONE,
            shininess: 100.0,
        }
    }
}

/// Light falling on a surface, split into diffuse and specular parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightFall {
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightFall {
    pub const ZERO: Self = Self {
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
    };
}

impl Add for LightFall {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            diffuse: self.diffuse + rhs.diffuse,
            specular: self.specular + rhs.specular,
        }
    }
}

impl AddAssign for LightFall {
    fn add_assign(&mut self, rhs: Self) {
        self.diffuse += rhs.diffuse;
        self.specular += rhs.specular;
    }
}

/// Blinn-Phong contribution of one light at `point`.
///
/// `normal` must be unit length and `point` must not coincide with the light
/// or the eye; neither is checked.
pub fn compute_light_fall(
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    light: &Light,
    material: &Material,
) -> LightFall {
    let to_light = light.position - point;
    let atten = light.attenuation(to_light.length_squared());
    let l = to_light.normalize();

    let d = normal.dot(l).max(0.0) + light.ambient;

    let v = (eye - point).normalize();
    let h = (l + v).normalize();
    let s = normal.dot(h).max(0.0).powf(material.shininess);

    LightFall {
        diffuse: light.diffuse * (d * atten),
        specular: light.specular * (s * atten),
    }
}

pub fn combine(a: LightFall, b: LightFall) -> LightFall {
    a + b
}

/// Sum the contributions of every light in `lights`.
pub fn accumulate(
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    lights: &[Light],
    material: &Material,
) -> LightFall {
    lights.iter().fold(LightFall::ZERO, |fall, light| {
        combine(fall, compute_light_fall(point, normal, eye, light, material))
    })
}

/// Final linear color reflected off `material`. Not clamped.
pub fn resolve_color(fall: &LightFall, material: &Material) -> Vec3 {
    fall.diffuse * material.diffuse + fall.specular * material.specular
}

/// Opaque-textured pipeline: lit texture color, mixed against the vertex color by `texturing`.
pub fn shade_opaque(
    point: Vec3,
    normal: Vec3,
    eye: Vec3,
    lights: &[Light],
    material: &Material,
    vertex_color: Vec3,
    texturing: f32,
) -> Vec3 {
    let fall = accumulate(point, normal, eye, lights, material);
    vertex_color.lerp(resolve_color(&fall, material), texturing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn unit_light(position: Vec3) -> Light {
        Light {
            position,
            strength: 2.0,
            half_distance: 1.0,
            ambient: 0.0,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }

    fn assert_non_negative(v: Vec3) {
        assert!(v.x >= 0.0 && v.y >= 0.0 && v.z >= 0.0, "negative component in {v}");
    }

    #[test]
    fn attenuation_is_half_strength_at_half_distance() {
        let light = unit_light(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(light.attenuation(1.0), 1.0);
        assert_relative_eq!(light.attenuation(0.0), 2.0);
        assert!(light.attenuation(1e6) < 1e-5);
    }

    #[test]
    fn head_on_light_gives_full_diffuse() {
        let light = unit_light(Vec3::new(0.0, 1.0, 0.0));
        let material = Material::textured(Vec3::ONE);
        let fall = compute_light_fall(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::new(0.0, 1.0, 0.0),
            &light,
            &material,
        );
        // N·L = 1 and attenuation = 1 at distance 1
        assert_relative_eq!(fall.diffuse.x, 1.0, epsilon = 1e-6);
        // eye on the light axis puts H on the normal
        assert_relative_eq!(fall.specular.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn back_facing_light_leaves_only_ambient() {
        let mut light = unit_light(Vec3::new(0.0, -1.0, 0.0));
        light.ambient = 0.25;
        let material = Material::textured(Vec3::ONE);
        let fall = compute_light_fall(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 2.0, 0.0), &light, &material);
        assert_relative_eq!(fall.diffuse.z, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(fall.specular.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn ambient_can_push_diffuse_above_one() {
        let light = Light::white(Vec3::new(0.0, 0.5, 0.0));
        let material = Material::textured(Vec3::ONE);
        let fall = compute_light_fall(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 0.0, 3.0), &light, &material);
        assert!(fall.diffuse.x > 1.0);
    }

    #[test]
    fn light_fall_is_non_negative_for_any_orientation() {
        let material = Material::textured(Vec3::new(0.3, 0.6, 0.9));
        let points = [Vec3::ZERO, Vec3::new(0.4, -0.3, 0.2), Vec3::new(-1.0, 0.5, 1.5)];
        let normals = [
            Vec3::X,
            -Vec3::X,
            Vec3::Y,
            -Vec3::Y,
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            Vec3::new(-0.2, 0.9, -0.4).normalize(),
        ];
        let eyes = [Vec3::new(0.0, 0.0, 2.7), Vec3::new(-3.0, 1.0, 0.0)];
        for light in birthday_lights() {
            for &p in &points {
                for &n in &normals {
                    for &e in &eyes {
                        let fall = compute_light_fall(p, n, e, &light, &material);
                        assert_non_negative(fall.diffuse);
                        assert_non_negative(fall.specular);
                    }
                }
            }
        }
    }

    #[test]
    fn combine_is_commutative_and_associative() {
        let a = LightFall {
            diffuse: Vec3::new(0.1, 0.2, 0.3),
            specular: Vec3::new(0.5, 0.0, 0.25),
        };
        let b = LightFall {
            diffuse: Vec3::new(1.0, 0.0, 2.0),
            specular: Vec3::new(0.125, 0.75, 0.0),
        };
        let c = LightFall {
            diffuse: Vec3::new(0.0, 3.0, 0.5),
            specular: Vec3::new(0.5, 0.5, 0.5),
        };
        assert_eq!(combine(a, b), combine(b, a));
        let left = combine(combine(a, b), c);
        let right = combine(a, combine(b, c));
        assert!(left.diffuse.abs_diff_eq(right.diffuse, 1e-6));
        assert!(left.specular.abs_diff_eq(right.specular, 1e-6));
    }

    #[test]
    fn accumulate_matches_chained_combine() {
        let lights = birthday_lights();
        let material = Material::textured(Vec3::splat(0.8));
        let (p, n, e) = (Vec3::new(0.1, -0.3, 0.2), Vec3::Y, Vec3::new(0.0, 0.0, 2.7));
        let mut expected = compute_light_fall(p, n, e, &lights[0], &material);
        expected += compute_light_fall(p, n, e, &lights[1], &material);
        expected += compute_light_fall(p, n, e, &lights[2], &material);
        let total = accumulate(p, n, e, &lights, &material);
        assert!(total.diffuse.abs_diff_eq(expected.diffuse, 1e-6));
        assert!(total.specular.abs_diff_eq(expected.specular, 1e-6));
        assert_eq!(accumulate(p, n, e, &[], &material), LightFall::ZERO);
    }

    #[test]
    fn resolve_multiplies_per_channel() {
        let fall = LightFall {
            diffuse: Vec3::new(1.0, 2.0, 0.5),
            specular: Vec3::new(0.5, 0.0, 1.0),
        };
        let material = Material {
            diffuse: Vec3::new(0.5, 0.25, 1.0),
            specular: Vec3::new(1.0, 1.0, 0.5),
            shininess: 10.0,
        };
        let color = resolve_color(&fall, &material);
        assert_relative_eq!(color.x, 1.0);
        assert_relative_eq!(color.y, 0.5);
        assert_relative_eq!(color.z, 1.0);
    }

    #[test]
    fn birthday_lights_match_scene_layout() {
        let [key, under, fill] = birthday_lights();
        assert_eq!(key.position, Vec3::new(0.5, 1.5, -0.5));
        assert_eq!(key.strength, 1.5);
        assert_eq!(under.diffuse, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(under.specular, under.diffuse);
        assert_eq!(under.strength, 1.5);
        assert_eq!(fill.strength, 0.7);
        assert_eq!(fill.diffuse, Vec3::ONE);
        assert!(birthday_lights().len() <= MAX_LIGHTS);
    }

    #[test]
    fn opaque_texturing_zero_keeps_vertex_color() {
        let lights = birthday_lights();
        let material = Material::textured(Vec3::ONE);
        let color = shade_opaque(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::new(0.0, 0.0, 2.7),
            &lights,
            &material,
            Vec3::new(0.3, 0.2, 0.1),
            0.0,
        );
        assert!(color.abs_diff_eq(Vec3::new(0.3, 0.2, 0.1), 1e-6));
    }
}
