use glam::Vec3;

/// Index into the MeshStore resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// Index into the sprite batch store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteBatchHandle(pub usize);

/// Texture role on a surface; the concrete image depends on the cake flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Icing,
    Sponge,
    Plate,
    Paper,
}

/// Which shading pipeline draws an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// Lit with the scene lights, diffuse color from the slot's texture.
    Opaque(TextureSlot),
    /// Lit constant color blended with the environment reflection.
    Reflective { color: Vec3, shininess: f32 },
    /// Unlit texture, for the environment sphere.
    Backdrop,
}

/// Marker: entity rides the slice animation (moved up by the current lift).
pub struct SliceLift;

/// Marker: particle batch is a candle flame, hidden when the candles are out.
pub struct CandleFlame;
