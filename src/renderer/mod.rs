pub mod mesh;
pub mod shader;
pub mod sprites;
pub mod texture;

use std::collections::HashMap;

use glam::Vec3;
use mesh::Mesh;
use shader::{with_lighting, ShaderProgram};
use sprites::SpriteBatch;
use texture::{load_rgb_or_placeholder, Texture, Wrap};

use crate::components::{MeshHandle, SpriteBatchHandle};
use crate::config::{AssetConfig, SceneConfig, SpriteConfig};
use crate::error::RenderError;
use crate::scene::{DrawList, FrameUniforms, Pipeline, SceneAssets, TextureKey};
use crate::shading::sprite::fractal_noise_image;
use crate::shading::{Light, MAX_LIGHTS};

const LIGHTING_SRC: &str = include_str!("../../shaders/lighting.glsl");
const SURFACE_VERT_SRC: &str = include_str!("../../shaders/surface.vert");
const TEXTURED_FRAG_SRC: &str = include_str!("../../shaders/textured.frag");
const REFLECTIVE_FRAG_SRC: &str = include_str!("../../shaders/reflective.frag");
const BACKDROP_FRAG_SRC: &str = include_str!("../../shaders/backdrop.frag");
const SPRITE_VERT_SRC: &str = include_str!("../../shaders/sprite.vert");
const SPRITE_FRAG_SRC: &str = include_str!("../../shaders/sprite.frag");

const CLEAR_COLOR: Vec3 = Vec3::new(0.05, 0.05, 0.08);

/// Textured surfaces reflect white highlights.
const SURFACE_SPECULAR: Vec3 = Vec3::ONE;
const SURFACE_SHININESS: f32 = 100.0;

/// Holds all uploaded meshes. Entities reference meshes by MeshHandle index.
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(mesh);
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> &Mesh {
        &self.meshes[handle.0]
    }
}

/// Uploaded particle batches, indexed by SpriteBatchHandle.
pub struct SpriteStore {
    batches: Vec<SpriteBatch>,
}

impl SpriteStore {
    pub fn new() -> Self {
        Self { batches: Vec::new() }
    }

    pub fn add(&mut self, batch: SpriteBatch) -> SpriteBatchHandle {
        let handle = SpriteBatchHandle(self.batches.len());
        self.batches.push(batch);
        handle
    }

    pub fn get(&self, handle: SpriteBatchHandle) -> &SpriteBatch {
        &self.batches[handle.0]
    }
}

/// Every surface texture plus the noise texture the sprites sample.
pub struct TextureStore {
    textures: HashMap<TextureKey, Texture>,
    noise: Texture,
}

impl TextureStore {
    pub fn load(assets: &AssetConfig, sprites: &SpriteConfig, noise_seed: u32) -> Result<Self, RenderError> {
        let mut textures = HashMap::new();
        for key in TextureKey::ALL {
            let (file, fallback) = texture_source(assets, key);
            let image = load_rgb_or_placeholder(&assets.path(file), fallback);
            let wrap = if key == TextureKey::Environment {
                Wrap::RepeatClampV
            } else {
                Wrap::Repeat
            };
            textures.insert(key, Texture::from_rgb(&image, wrap)?);
        }

        let noise = fractal_noise_image(sprites.noise_size, noise_seed);
        log::info!("generated {0}x{0} sprite noise (seed {noise_seed})", sprites.noise_size);
        let noise = Texture::from_gray(&noise, Wrap::Repeat)?;

        Ok(Self { textures, noise })
    }

    pub fn get(&self, key: TextureKey) -> &Texture {
        &self.textures[&key]
    }

    pub fn noise(&self) -> &Texture {
        &self.noise
    }
}

/// File name for a texture and the placeholder color used when it is missing.
fn texture_source(assets: &AssetConfig, key: TextureKey) -> (&str, [u8; 3]) {
    match key {
        TextureKey::Icing => (assets.icing.as_str(), [240, 230, 205]),
        TextureKey::ChocolateIcing => (assets.chocolate_icing.as_str(), [95, 55, 35]),
        TextureKey::Sponge => (assets.sponge.as_str(), [230, 200, 130]),
        TextureKey::ChocolateSponge => (assets.chocolate_sponge.as_str(), [110, 70, 45]),
        TextureKey::Plate => (assets.plate.as_str(), [200, 60, 90]),
        TextureKey::Paper => (assets.paper.as_str(), [235, 232, 220]),
        TextureKey::Environment => (assets.environment.as_str(), [120, 140, 180]),
    }
}

pub struct Renderer {
    textured: ShaderProgram,
    reflective: ShaderProgram,
    backdrop: ShaderProgram,
    sprite: ShaderProgram,
    meshes: MeshStore,
    sprites: SpriteStore,
    textures: TextureStore,
    sprite_config: SpriteConfig,
    reflectivity: f32,
}

impl Renderer {
    /// Compile the pipelines and upload the scene's geometry and textures.
    /// Needs a current GL context.
    pub fn init(assets: &SceneAssets, config: &SceneConfig, noise_seed: u32) -> Result<Self, RenderError> {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::ClearColor(CLEAR_COLOR.x, CLEAR_COLOR.y, CLEAR_COLOR.z, 1.0);
        }

        let textured =
            ShaderProgram::from_sources(SURFACE_VERT_SRC, &with_lighting(LIGHTING_SRC, TEXTURED_FRAG_SRC))?;
        let reflective =
            ShaderProgram::from_sources(SURFACE_VERT_SRC, &with_lighting(LIGHTING_SRC, REFLECTIVE_FRAG_SRC))?;
        let backdrop = ShaderProgram::from_sources(SURFACE_VERT_SRC, BACKDROP_FRAG_SRC)?;
        let sprite = ShaderProgram::from_sources(SPRITE_VERT_SRC, SPRITE_FRAG_SRC)?;
        log::info!("compiled surface, reflective, backdrop and sprite pipelines");

        let mut meshes = MeshStore::new();
        for data in assets.meshes() {
            meshes.add(Mesh::upload(data));
        }
        let mut sprites = SpriteStore::new();
        for batch in assets.batches() {
            sprites.add(SpriteBatch::new(&batch.positions, batch.color));
        }
        log::info!(
            "uploaded {} meshes and {} sprite batches",
            assets.meshes().len(),
            assets.batches().len()
        );

        let textures = TextureStore::load(&config.assets, &config.sprites, noise_seed)?;

        Ok(Self {
            textured,
            reflective,
            backdrop,
            sprite,
            meshes,
            sprites,
            textures,
            sprite_config: config.sprites.clone(),
            reflectivity: config.reflection.reflectivity,
        })
    }

    /// Load the scene lights into both lit pipelines. Lights are fixed for the
    /// life of the scene, so this runs once after init.
    pub fn upload_lights(&mut self, lights: &[Light]) {
        self.textured.set_lights(lights);
        self.reflective.set_lights(lights);
        log::info!("uploaded {} lights", lights.len().min(MAX_LIGHTS));
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Draw one frame: lit surfaces, the reflective knife, the backdrop, then
    /// the additive sprites over everything.
    pub fn draw_frame(&mut self, list: &DrawList, frame: &FrameUniforms) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.draw_opaque(list, frame);
        self.draw_reflective(list, frame);
        self.draw_backdrop(list, frame);
        self.draw_sprites(list, frame);
    }

    fn draw_opaque(&mut self, list: &DrawList, frame: &FrameUniforms) {
        let shader = &mut self.textured;
        shader.bind();
        shader.set_mat4("u_view", &frame.view);
        shader.set_mat4("u_projection", &frame.projection);
        shader.set_vec3("u_eye", frame.eye);
        shader.set_float("u_texturing", 1.0);
        shader.set_vec3("u_specular", SURFACE_SPECULAR);
        shader.set_float("u_shininess", SURFACE_SHININESS);

        for cmd in list.with_pipeline(|p| matches!(p, Pipeline::Opaque { .. })) {
            let Pipeline::Opaque { texture } = cmd.pipeline else {
                continue;
            };
            shader.set_texture("u_texture", 0, self.textures.get(texture));
            shader.set_mat4("u_model", &cmd.model);
            self.meshes.get(cmd.mesh).draw();
        }
    }

    fn draw_reflective(&mut self, list: &DrawList, frame: &FrameUniforms) {
        let shader = &mut self.reflective;
        shader.bind();
        shader.set_mat4("u_view", &frame.view);
        shader.set_mat4("u_projection", &frame.projection);
        shader.set_vec3("u_eye", frame.eye);
        shader.set_vec3("u_specular", Vec3::ONE);
        shader.set_float("u_reflectivity", self.reflectivity);
        shader.set_texture("u_environment", 0, self.textures.get(TextureKey::Environment));

        for cmd in list.with_pipeline(|p| matches!(p, Pipeline::Reflective { .. })) {
            let Pipeline::Reflective { color, shininess } = cmd.pipeline else {
                continue;
            };
            shader.set_vec3("u_diffuse", color);
            shader.set_float("u_shininess", shininess);
            shader.set_mat4("u_model", &cmd.model);
            self.meshes.get(cmd.mesh).draw();
        }
    }

    fn draw_backdrop(&mut self, list: &DrawList, frame: &FrameUniforms) {
        let shader = &mut self.backdrop;
        shader.bind();
        shader.set_mat4("u_view", &frame.view);
        shader.set_mat4("u_projection", &frame.projection);

        for cmd in list.with_pipeline(|p| matches!(p, Pipeline::Backdrop { .. })) {
            let Pipeline::Backdrop { texture } = cmd.pipeline else {
                continue;
            };
            shader.set_texture("u_texture", 0, self.textures.get(texture));
            shader.set_mat4("u_model", &cmd.model);
            self.meshes.get(cmd.mesh).draw();
        }
    }

    fn draw_sprites(&mut self, list: &DrawList, frame: &FrameUniforms) {
        if list.sprites.is_empty() {
            return;
        }

        let shader = &mut self.sprite;
        shader.bind();
        shader.set_mat4("u_view", &frame.view);
        shader.set_mat4("u_projection", &frame.projection);
        shader.set_mat3("u_camera_rotation", &frame.camera_rotation);
        shader.set_float("u_sprite_radius", self.sprite_config.radius);
        shader.set_float("u_texturing", self.sprite_config.texturing);
        shader.set_float("u_attenuation_width", self.sprite_config.attenuation_width);
        shader.set_texture("u_texture", 0, self.textures.noise());

        unsafe {
            gl::DepthMask(gl::FALSE);
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::ONE, gl::ONE);
        }

        for cmd in &list.sprites {
            shader.set_mat4("u_model", &cmd.model);
            self.sprites.get(cmd.batch).draw();
        }

        unsafe {
            gl::Disable(gl::BLEND);
            gl::DepthMask(gl::TRUE);
        }
    }
}
