use gl::types::*;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;
use std::mem;
use std::ptr;

/// Vertex layout shared by the textured, reflective and backdrop pipelines.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
    pub texcoord: [f32; 2],
}

impl SurfaceVertex {
    pub fn new(position: Vec3, normal: Vec3, texcoord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: [1.0, 1.0, 1.0],
            texcoord: texcoord.to_array(),
        }
    }
}

/// CPU-side geometry, built first and uploaded once.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<SurfaceVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn push(&mut self, position: Vec3, normal: Vec3, texcoord: Vec2) {
        self.vertices.push(SurfaceVertex::new(position, normal, texcoord));
    }

    /// Quad from four corners in order, one shared normal, uv over the unit square.
    fn add_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.next_index();
        let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
        for (c, uv) in corners.into_iter().zip(uvs) {
            self.push(c, normal, uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Axis-aligned box centred at `center`.
    fn add_box(&mut self, center: Vec3, size: Vec3) {
        let h = size * 0.5;
        let c = |x: f32, y: f32, z: f32| center + Vec3::new(x * h.x, y * h.y, z * h.z);
        self.add_quad([c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)], Vec3::Z);
        self.add_quad([c(1., -1., -1.), c(-1., -1., -1.), c(-1., 1., -1.), c(1., 1., -1.)], -Vec3::Z);
        self.add_quad([c(-1., 1., 1.), c(1., 1., 1.), c(1., 1., -1.), c(-1., 1., -1.)], Vec3::Y);
        self.add_quad([c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)], -Vec3::Y);
        self.add_quad([c(1., -1., 1.), c(1., -1., -1.), c(1., 1., -1.), c(1., 1., 1.)], Vec3::X);
        self.add_quad([c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)], -Vec3::X);
    }

    /// Y-axis cylinder sector spanning `start..end` radians, centred `offset_y` up.
    fn add_cylinder_sector(&mut self, radius: f32, height: f32, start: f32, end: f32, segments: u32, offset_y: f32) {
        let half_h = height * 0.5;
        let (bot_y, top_y) = (offset_y - half_h, offset_y + half_h);
        let ring = |i: u32| start + (end - start) * (i as f32) / (segments as f32);

        // Side: two rings with outward normals
        let side = self.next_index();
        for i in 0..=segments {
            let angle = ring(i);
            let n = Vec3::new(angle.cos(), 0.0, angle.sin());
            let u = i as f32 / segments as f32;
            self.push(Vec3::new(n.x * radius, bot_y, n.z * radius), n, Vec2::new(u, 0.0));
            self.push(Vec3::new(n.x * radius, top_y, n.z * radius), n, Vec2::new(u, 1.0));
        }
        for i in 0..segments {
            let bot = side + i * 2;
            let (top, next_bot, next_top) = (bot + 1, bot + 2, bot + 3);
            self.indices.extend_from_slice(&[bot, next_bot, top, top, next_bot, next_top]);
        }

        // Caps: fans around the axis, planar uv
        for (y, normal) in [(top_y, Vec3::Y), (bot_y, -Vec3::Y)] {
            let center = self.next_index();
            self.push(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5));
            let rim = self.next_index();
            for i in 0..=segments {
                let angle = ring(i);
                let (s, c) = angle.sin_cos();
                self.push(
                    Vec3::new(c * radius, y, s * radius),
                    normal,
                    Vec2::new(0.5 + 0.5 * c, 0.5 + 0.5 * s),
                );
            }
            for i in 0..segments {
                self.indices.extend_from_slice(&[center, rim + i, rim + i + 1]);
            }
        }
    }
}

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn upload(data: &MeshData) -> Self {
        upload_mesh(&data.vertices, &data.indices)
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

fn upload_mesh(vertices: &[SurfaceVertex], indices: &[u32]) -> Mesh {
    let mut vao = 0;
    let mut vbo = 0;
    let mut ebo = 0;

    unsafe {
        gl::GenVertexArrays(1, &mut vao);
        gl::GenBuffers(1, &mut vbo);
        gl::GenBuffers(1, &mut ebo);

        gl::BindVertexArray(vao);

        gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
        gl::BufferData(
            gl::ARRAY_BUFFER,
            mem::size_of_val(vertices) as GLsizeiptr,
            vertices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
        gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            mem::size_of_val(indices) as GLsizeiptr,
            indices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        );

        let stride = mem::size_of::<SurfaceVertex>() as GLsizei;
        let attributes = [
            (0, 3, mem::offset_of!(SurfaceVertex, position)),
            (1, 3, mem::offset_of!(SurfaceVertex, normal)),
            (2, 3, mem::offset_of!(SurfaceVertex, color)),
            (3, 2, mem::offset_of!(SurfaceVertex, texcoord)),
        ];
        for (location, size, offset) in attributes {
            gl::VertexAttribPointer(location, size, gl::FLOAT, gl::FALSE, stride, offset as *const _);
            gl::EnableVertexAttribArray(location);
        }

        gl::BindVertexArray(0);
    }

    Mesh {
        vao,
        vbo,
        ebo,
        index_count: indices.len() as i32,
    }
}

/// UV sphere; u runs around the equator, v from the +Y pole down.
pub fn sphere(radius: f32, stacks: u32, sectors: u32) -> MeshData {
    let mut data = MeshData::default();

    for i in 0..=stacks {
        let stack_angle = PI / 2.0 - (i as f32) * PI / (stacks as f32);
        let xz = stack_angle.cos();
        let y = stack_angle.sin();

        for j in 0..=sectors {
            let sector_angle = 2.0 * PI * (j as f32) / (sectors as f32);
            let n = Vec3::new(xz * sector_angle.cos(), y, xz * sector_angle.sin());
            let uv = Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32);
            data.push(n * radius, n, uv);
        }
    }

    for i in 0..stacks {
        for j in 0..sectors {
            let first = i * (sectors + 1) + j;
            let second = first + sectors + 1;
            data.indices.extend_from_slice(&[first, second, first + 1, first + 1, second, second + 1]);
        }
    }

    data
}

/// Closed cylinder around the Y axis, centred on the origin.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let mut data = MeshData::default();
    data.add_cylinder_sector(radius, height, 0.0, 2.0 * PI, segments, 0.0);
    data
}

/// Cylinder with the `gap` radians starting at `gap_start` cut away: the cake with a slice removed.
pub fn cut_cylinder(radius: f32, height: f32, gap_start: f32, gap: f32, segments: u32) -> MeshData {
    wedge(radius, height, gap_start + gap, 2.0 * PI - gap, segments)
}

/// Solid sector of a Y-axis cylinder from `start` through `sweep` radians,
/// closed by two radial faces. Used for the slice and the cut cake.
pub fn wedge(radius: f32, height: f32, start: f32, sweep: f32, segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let end = start + sweep;
    data.add_cylinder_sector(radius, height, start, end, segments, 0.0);

    let half_h = height * 0.5;
    let rim = |a: f32, y: f32| Vec3::new(a.cos() * radius, y, a.sin() * radius);
    let axis = |y: f32| Vec3::new(0.0, y, 0.0);

    // Radial faces point away from the sector interior
    let start_normal = Vec3::new(start.sin(), 0.0, -start.cos());
    data.add_quad(
        [axis(-half_h), rim(start, -half_h), rim(start, half_h), axis(half_h)],
        start_normal,
    );
    let end_normal = Vec3::new(-end.sin(), 0.0, end.cos());
    data.add_quad(
        [rim(end, -half_h), axis(-half_h), axis(half_h), rim(end, half_h)],
        end_normal,
    );
    data
}

/// Flat quad through four corners with per-vertex normals pointing at the origin.
///
/// The room walls use this so their inner faces catch the scene lights.
pub fn inward_quad(corners: [Vec3; 4]) -> MeshData {
    let mut data = MeshData::default();
    let uvs = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)];
    for (c, uv) in corners.into_iter().zip(uvs) {
        data.push(c, (-c).try_normalize().unwrap_or(Vec3::Y), uv);
    }
    data.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    data
}

/// Cake knife: handle (cylinder), bolster and blade (boxes), laid out along +Y.
/// Origin is at the bolster, where the blade meets the handle.
pub fn knife() -> MeshData {
    let mut data = MeshData::default();

    // Handle below the origin
    data.add_cylinder_sector(0.012, 0.12, 0.0, 2.0 * PI, 12, -0.06);

    // Bolster
    data.add_box(Vec3::ZERO, Vec3::new(0.03, 0.015, 0.02));

    // Blade: wide, long and thin above the bolster
    data.add_box(Vec3::new(0.0, 0.1575, 0.0), Vec3::new(0.05, 0.3, 0.004));

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_well_formed(data: &MeshData) {
        assert!(!data.indices.is_empty());
        assert_eq!(data.indices.len() % 3, 0);
        let count = data.vertices.len() as u32;
        assert!(data.indices.iter().all(|&i| i < count), "index out of range");
        for v in &data.vertices {
            assert_relative_eq!(Vec3::from_array(v.normal).length(), 1.0, epsilon = 1e-5);
            let [u, t] = v.texcoord;
            assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&t));
        }
    }

    #[test]
    fn generated_meshes_are_well_formed() {
        assert_well_formed(&sphere(1.0, 8, 16));
        assert_well_formed(&cylinder(0.3, 0.2, 24));
        assert_well_formed(&wedge(0.3, 0.2, 0.0, PI / 3.5, 6));
        assert_well_formed(&cut_cylinder(0.3, 0.2, 1.0, PI / 3.5, 32));
        assert_well_formed(&inward_quad([
            Vec3::new(1.5, -0.6, -1.5),
            Vec3::new(-1.5, -0.6, -1.5),
            Vec3::new(-1.5, 1.5, -1.5),
            Vec3::new(1.5, 1.5, -1.5),
        ]));
        assert_well_formed(&knife());
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let data = sphere(2.5, 6, 10);
        assert_eq!(data.vertices.len(), 7 * 11);
        for v in &data.vertices {
            assert_relative_eq!(Vec3::from_array(v.position).length(), 2.5, epsilon = 1e-5);
        }
    }

    #[test]
    fn wedge_faces_point_out_of_the_sector() {
        let sweep = PI / 2.0;
        let data = wedge(1.0, 1.0, 0.0, sweep, 4);
        // centroid of a quarter wedge lies in +X +Z
        let inside = Vec3::new(0.4, 0.0, 0.4);
        let n = data.vertices.len();
        let start_face = &data.vertices[n - 8];
        let end_face = &data.vertices[n - 4];
        let start_n = Vec3::from_array(start_face.normal);
        let end_n = Vec3::from_array(end_face.normal);
        assert!(start_n.dot(inside) < 0.0);
        assert!(end_n.dot(inside) < 0.0);
    }

    #[test]
    fn inward_quad_normals_face_origin() {
        let data = inward_quad([
            Vec3::new(1.5, -0.6, 1.6),
            Vec3::new(1.5, -0.6, -1.5),
            Vec3::new(1.5, 1.5, -1.5),
            Vec3::new(1.5, 1.5, 1.6),
        ]);
        for v in &data.vertices {
            let p = Vec3::from_array(v.position);
            assert!(Vec3::from_array(v.normal).dot(-p) > 0.0);
        }
    }

    #[test]
    fn knife_blade_extends_above_origin() {
        let data = knife();
        let top = data
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        let bottom = data
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MAX, f32::min);
        assert_relative_eq!(top, 0.3075, epsilon = 1e-5);
        assert_relative_eq!(bottom, -0.12, epsilon = 1e-5);
    }
}
