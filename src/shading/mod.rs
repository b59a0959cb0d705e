//! CPU reference of the shading pipeline.
//!
//! These functions mirror the GLSL in `shaders/` term for term. The renderer
//! uses the shared types (`Light`, `SpriteVertex`, ...) to feed the GPU, and
//! the tests pin down the math the shaders must reproduce.

pub mod lighting;
pub mod reflection;
pub mod sprite;

pub use lighting::{birthday_lights, Light, LightFall, Material, MAX_LIGHTS};
pub use reflection::EnvironmentMap;
pub use sprite::SpriteVertex;
