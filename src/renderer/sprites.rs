use gl::types::*;
use glam::Vec3;
use std::mem;
use std::ptr;

use crate::shading::sprite::{build_sprite_vertices, sprite_indices};
use crate::shading::SpriteVertex;

/// GPU buffer for one particle batch: four vertices per particle, expanded
/// into a camera-facing quad by `shaders/sprite.vert`.
pub struct SpriteBatch {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: i32,
}

impl SpriteBatch {
    pub fn new(positions: &[Vec3], color: Vec3) -> Self {
        let vertices = build_sprite_vertices(positions, color);
        let indices = sprite_indices(positions.len());

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
                mem::size_of_val(vertices.as_slice()) as GLsizeiptr,
                vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                mem::size_of_val(indices.as_slice()) as GLsizeiptr,
                indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = mem::size_of::<SpriteVertex>() as GLsizei;
            let attributes = [
                (0, 3, mem::offset_of!(SpriteVertex, position)),
                (1, 3, mem::offset_of!(SpriteVertex, color)),
                (2, 2, mem::offset_of!(SpriteVertex, corner)),
            ];
            for (location, size, offset) in attributes {
                gl::VertexAttribPointer(location, size, gl::FLOAT, gl::FALSE, stride, offset as *const _);
                gl::EnableVertexAttribArray(location);
            }

            gl::BindVertexArray(0);
        }

        Self {
            vao,
            vbo,
            ebo,
            index_count: indices.len() as i32,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for SpriteBatch {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}
