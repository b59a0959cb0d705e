use gl::types::*;
use glam::{Mat3, Mat4, Vec3};
use std::collections::HashMap;
use std::ffi::CString;
use std::ptr;

use super::texture::Texture;
use crate::error::RenderError;
use crate::shading::{Light, MAX_LIGHTS};

/// Fields of the GLSL `Light` struct in the order `set_lights` writes them.
pub const LIGHT_FIELDS: [&str; 6] = ["pos", "strength", "halfDist", "ambient", "diffuse", "specular"];

pub struct ShaderProgram {
    pub id: GLuint,
    uniform_cache: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vert_src: &str, frag_src: &str) -> Result<Self, RenderError> {
        unsafe {
            let vert = compile_shader(vert_src, gl::VERTEX_SHADER)?;
            let frag = match compile_shader(frag_src, gl::FRAGMENT_SHADER) {
                Ok(frag) => frag,
                Err(e) => {
                    gl::DeleteShader(vert);
                    return Err(e);
                }
            };

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success == 0 {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
                buf.pop(); // remove null terminator
                let msg = String::from_utf8_lossy(&buf).to_string();
                gl::DeleteProgram(program);
                gl::DeleteShader(vert);
                gl::DeleteShader(frag);
                return Err(RenderError::Link(msg));
            }

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            Ok(Self {
                id: program,
                uniform_cache: HashMap::new(),
            })
        }
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(&loc) = self.uniform_cache.get(name) {
            return loc;
        }
        // Uniform names are internal literals; a nul byte maps to "not found".
        let loc = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };
        if loc < 0 {
            log::trace!("uniform {name} not active in program {}", self.id);
        }
        self.uniform_cache.insert(name.to_string(), loc);
        loc
    }

    pub fn set_mat4(&mut self, name: &str, mat: &Mat4) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix4fv(loc, 1, gl::FALSE, mat.to_cols_array().as_ptr());
        }
    }

    pub fn set_mat3(&mut self, name: &str, mat: &Mat3) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix3fv(loc, 1, gl::FALSE, mat.to_cols_array().as_ptr());
        }
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform3f(loc, v.x, v.y, v.z);
        }
    }

    pub fn set_float(&mut self, name: &str, val: f32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1f(loc, val);
        }
    }

    pub fn set_int(&mut self, name: &str, val: i32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1i(loc, val);
        }
    }

    /// Bind `texture` to `unit` and point the sampler `name` at it.
    pub fn set_texture(&mut self, name: &str, unit: u32, texture: &Texture) {
        texture.bind(unit);
        self.set_int(name, unit as i32);
    }

    /// Upload `lights` into `u_lights[]` / `u_light_count`. Extra lights past
    /// `MAX_LIGHTS` are dropped. The values stay on the program, so this runs
    /// once per program rather than per frame. Binds the program.
    pub fn set_lights(&mut self, lights: &[Light]) {
        if lights.len() > MAX_LIGHTS {
            log::warn!("{} lights in scene, shading only the first {MAX_LIGHTS}", lights.len());
        }
        self.bind();
        let count = lights.len().min(MAX_LIGHTS);
        for (i, light) in lights.iter().take(count).enumerate() {
            let [pos, strength, half_dist, ambient, diffuse, specular] = light_uniforms(i);
            self.set_vec3(&pos, light.position);
            self.set_float(&strength, light.strength);
            self.set_float(&half_dist, light.half_distance);
            self.set_float(&ambient, light.ambient);
            self.set_vec3(&diffuse, light.diffuse);
            self.set_vec3(&specular, light.specular);
        }
        self.set_int("u_light_count", count as i32);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

unsafe fn compile_shader(src: &str, shader_type: GLenum) -> Result<GLuint, RenderError> {
    let c_src = CString::new(src)?;
    let shader = gl::CreateShader(shader_type);
    gl::ShaderSource(shader, 1, &c_src.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success == 0 {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
        buf.pop();
        let stage = if shader_type == gl::VERTEX_SHADER {
            "vertex"
        } else {
            "fragment"
        };
        let log = String::from_utf8_lossy(&buf).to_string();
        gl::DeleteShader(shader);
        return Err(RenderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Uniform names for `u_lights[index]`, one per entry of `LIGHT_FIELDS`.
pub fn light_uniforms(index: usize) -> [String; 6] {
    LIGHT_FIELDS.map(|field| format!("u_lights[{index}].{field}"))
}

/// Splice the shared lighting block between the version line and a fragment body.
pub fn with_lighting(lighting: &str, body: &str) -> String {
    format!("#version 330 core\n{lighting}\n{body}")
}
