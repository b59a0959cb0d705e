use glam::{Mat3, Vec2, Vec3};
use image::{GrayImage, Luma};
use noise::{NoiseFn, Perlin};
use rand::Rng;

/// Corner offsets of a sprite quad, in emission order.
pub const SPRITE_CORNERS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// One corner of one particle quad. The vertex stage offsets `position`
/// by `corner * radius` in camera space.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub corner: [f32; 2],
}

/// Four vertices per particle, all at the particle centre.
pub fn build_sprite_vertices(positions: &[Vec3], color: Vec3) -> Vec<SpriteVertex> {
    positions
        .iter()
        .flat_map(|p| {
            SPRITE_CORNERS.iter().map(move |c| SpriteVertex {
                position: p.to_array(),
                color: color.to_array(),
                corner: c.to_array(),
            })
        })
        .collect()
}

/// Two triangles per quad, wound counter-clockwise.
pub fn sprite_indices(count: usize) -> Vec<u32> {
    (0..count as u32)
        .flat_map(|i| {
            let b = i * 4;
            [b, b + 1, b + 2, b, b + 2, b + 3]
        })
        .collect()
}

/// World-space position of one billboard corner.
///
/// Only the camera's rotation is applied to the offset, so the quad faces the
/// viewer wherever the camera stands.
pub fn billboard_corner(center: Vec3, corner: Vec2, radius: f32, camera_rotation: Mat3) -> Vec3 {
    center + camera_rotation * (corner * radius).extend(0.0)
}

/// Soft disk falloff: `(1 - r²) · w² / (w² + r²)`, or `None` outside the unit disk.
///
/// `width` must be positive.
pub fn sprite_alpha(sprite_coord: Vec2, width: f32) -> Option<f32> {
    let rsqr = sprite_coord.length_squared();
    if rsqr > 1.0 {
        return None;
    }
    let wsqr = width * width;
    Some((1.0 - rsqr) * wsqr / (wsqr + rsqr))
}

/// Premultiplied sprite color for additive blending, or `None` where the fragment is discarded.
pub fn shade_sprite(
    sprite_coord: Vec2,
    vertex_color: Vec3,
    texture_color: Vec3,
    texturing: f32,
    width: f32,
) -> Option<Vec3> {
    let alpha = sprite_alpha(sprite_coord, width)?;
    Some(vertex_color.lerp(texture_color, texturing) * alpha)
}

/// Uniform random points in `[0, extent)³`.
pub fn scatter_points<R: Rng>(rng: &mut R, count: usize, extent: f32) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.random::<f32>() * extent,
                rng.random::<f32>() * extent,
                rng.random::<f32>() * extent,
            )
        })
        .collect()
}

/// Six-octave fractal Perlin noise, normalised to [0, 255].
///
/// Octave frequencies start at 2 and double; each octave is weighted by 1/f.
pub fn fractal_noise_image(size: u32, seed: u32) -> GrayImage {
    const OCTAVES: u32 = 6;
    let perlin = Perlin::new(seed);
    let span = (size.max(2) - 1) as f64;

    GrayImage::from_fn(size, size, |i, j| {
        let (u, v) = (i as f64 / span, j as f64 / span);
        let mut val = 0.0;
        let mut amp_sum = 0.0;
        let mut f = 2.0;
        for _ in 0..OCTAVES {
            let amp = 1.0 / f;
            // Perlin is signed; shift into [0, 1]
            val += amp * (perlin.get([u * f, v * f]) * 0.5 + 0.5);
            amp_sum += amp;
            f *= 2.0;
        }
        Luma([((val / amp_sum).clamp(0.0, 1.0) * 255.0) as u8])
    })
}
