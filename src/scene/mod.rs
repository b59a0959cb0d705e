pub mod birthday;
pub mod compositor;

use glam::Vec3;

use crate::components::{MeshHandle, SpriteBatchHandle};
use crate::renderer::mesh::MeshData;

pub use compositor::{
    collect_lights, compose_frame, DrawCommand, DrawList, Flavour, FrameUniforms, Pipeline,
    SceneFlags, SpriteCommand, TextureKey,
};

/// Points that share one color and are drawn as a single sprite batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleBatch {
    pub positions: Vec<Vec3>,
    pub color: Vec3,
}

/// CPU-side geometry for a scene. Entities hold handles into it; the renderer
/// uploads it once and keeps the same indices.
#[derive(Default)]
pub struct SceneAssets {
    meshes: Vec<MeshData>,
    batches: Vec<ParticleBatch>,
}

impl SceneAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(mesh);
        handle
    }

    pub fn add_batch(&mut self, batch: ParticleBatch) -> SpriteBatchHandle {
        let handle = SpriteBatchHandle(self.batches.len());
        self.batches.push(batch);
        handle
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn batches(&self) -> &[ParticleBatch] {
        &self.batches
    }
}
