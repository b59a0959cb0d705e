//! Animated birthday-cake scene.
//!
//! `animation` and `shading` are the pure core: phase ramps, Blinn-Phong light
//! falloff, the equirectangular mirror lookup and particle sprite math. They are
//! the CPU reference for the GLSL under `shaders/`. The other modules build the
//! scene on top of them and drive it through SDL2 and OpenGL.

pub mod animation;
pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod shading;
