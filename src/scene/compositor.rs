use glam::{Mat3, Mat4, Vec3};
use hecs::World;

use crate::animation::SceneMotion;
use crate::components::{
    CandleFlame, LocalTransform, MeshHandle, Pivot, Shading, SliceLift, SpriteBatchHandle,
    TextureSlot,
};
use crate::shading::Light;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavour {
    Vanilla,
    Chocolate,
}

impl Flavour {
    pub fn toggled(self) -> Self {
        match self {
            Flavour::Vanilla => Flavour::Chocolate,
            Flavour::Chocolate => Flavour::Vanilla,
        }
    }
}

/// Scene toggles, snapshotted once per frame and read-only while composing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneFlags {
    pub candles_lit: bool,
    pub flavour: Flavour,
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self {
            candles_lit: true,
            flavour: Flavour::Vanilla,
        }
    }
}

/// Concrete texture a draw binds, after flavour resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Icing,
    ChocolateIcing,
    Sponge,
    ChocolateSponge,
    Plate,
    Paper,
    Environment,
}

impl TextureKey {
    pub const ALL: [TextureKey; 7] = [
        TextureKey::Icing,
        TextureKey::ChocolateIcing,
        TextureKey::Sponge,
        TextureKey::ChocolateSponge,
        TextureKey::Plate,
        TextureKey::Paper,
        TextureKey::Environment,
    ];

    pub fn resolve(slot: TextureSlot, flavour: Flavour) -> Self {
        match (slot, flavour) {
            (TextureSlot::Icing, Flavour::Vanilla) => TextureKey::Icing,
            (TextureSlot::Icing, Flavour::Chocolate) => TextureKey::ChocolateIcing,
            (TextureSlot::Sponge, Flavour::Vanilla) => TextureKey::Sponge,
            (TextureSlot::Sponge, Flavour::Chocolate) => TextureKey::ChocolateSponge,
            (TextureSlot::Plate, _) => TextureKey::Plate,
            (TextureSlot::Paper, _) => TextureKey::Paper,
        }
    }
}

/// Pipeline selected for one draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pipeline {
    Opaque { texture: TextureKey },
    Reflective { color: Vec3, shininess: f32 },
    Backdrop { texture: TextureKey },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub model: Mat4,
    pub pipeline: Pipeline,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteCommand {
    pub batch: SpriteBatchHandle,
    pub model: Mat4,
}

/// Everything drawn in one frame, each entry with its own model matrix.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub surfaces: Vec<DrawCommand>,
    pub sprites: Vec<SpriteCommand>,
}

impl DrawList {
    pub fn with_pipeline<'a>(
        &'a self,
        keep: impl Fn(&Pipeline) -> bool + 'a,
    ) -> impl Iterator<Item = &'a DrawCommand> + 'a {
        self.surfaces.iter().filter(move |cmd| keep(&cmd.pipeline))
    }
}

/// Per-frame camera state handed to every pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera orientation without translation, for billboarding.
    pub camera_rotation: Mat3,
}

fn model_matrix(local: &LocalTransform, pivot: Option<&Pivot>, lift: f32) -> Mat4 {
    let pivot = pivot.map_or(Mat4::IDENTITY, |p| p.0);
    Mat4::from_translation(Vec3::new(0.0, lift, 0.0)) * pivot * local.matrix()
}

/// Build the frame's draw list from the scene entities.
///
/// Pure: reads the world, the flag snapshot and the sampled motion; no GL.
pub fn compose_frame(world: &World, flags: SceneFlags, motion: SceneMotion) -> DrawList {
    let mut list = DrawList::default();

    for (_entity, (mesh, local, shading, pivot, lifted)) in world
        .query::<(&MeshHandle, &LocalTransform, &Shading, Option<&Pivot>, Option<&SliceLift>)>()
        .iter()
    {
        let lift = if lifted.is_some() { motion.slice_lift } else { 0.0 };
        let pipeline = match *shading {
            Shading::Opaque(slot) => Pipeline::Opaque {
                texture: TextureKey::resolve(slot, flags.flavour),
            },
            Shading::Reflective { color, shininess } => Pipeline::Reflective { color, shininess },
            Shading::Backdrop => Pipeline::Backdrop {
                texture: TextureKey::Environment,
            },
        };
        list.surfaces.push(DrawCommand {
            mesh: *mesh,
            model: model_matrix(local, pivot, lift),
            pipeline,
        });
    }

    for (_entity, (batch, local, pivot, flame)) in world
        .query::<(&SpriteBatchHandle, &LocalTransform, Option<&Pivot>, Option<&CandleFlame>)>()
        .iter()
    {
        let mut local = *local;
        if flame.is_some() {
            if !flags.candles_lit {
                continue;
            }
            local.position.x += motion.flame_wobble;
        }
        list.sprites.push(SpriteCommand {
            batch: *batch,
            model: model_matrix(&local, pivot, 0.0),
        });
    }

    list
}

/// Every light in the scene, in spawn order.
pub fn collect_lights(world: &World) -> Vec<Light> {
    let mut lights: Vec<(hecs::Entity, Light)> = world
        .query::<&Light>()
        .iter()
        .map(|(entity, light)| (entity, *light))
        .collect();
    lights.sort_by_key(|(entity, _)| entity.id());
    lights.into_iter().map(|(_, light)| light).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::birthday_lights;
    use approx::assert_abs_diff_eq;

    fn translation(m: &Mat4) -> Vec3 {
        m.w_axis.truncate()
    }

    fn small_world() -> World {
        let mut world = World::new();
        world.spawn((
            MeshHandle(0),
            LocalTransform::new(Vec3::new(0.0, -0.4, 0.0)),
            Shading::Opaque(TextureSlot::Icing),
        ));
        world.spawn((
            MeshHandle(1),
            LocalTransform::new(Vec3::new(0.2, -0.3, 0.4)),
            Shading::Opaque(TextureSlot::Sponge),
            SliceLift,
        ));
        world.spawn((
            MeshHandle(2),
            LocalTransform::new(Vec3::new(0.1, -0.2, 0.4)),
            Shading::Reflective {
                color: Vec3::new(0.2, 0.4, 0.7),
                shininess: 200.0,
            },
            SliceLift,
        ));
        world.spawn((
            SpriteBatchHandle(0),
            LocalTransform::new(Vec3::new(0.25, -0.1, 0.0)),
            Pivot::around_y(Vec3::ZERO, 90.0),
            CandleFlame,
        ));
        world.spawn((
            SpriteBatchHandle(1),
            LocalTransform::new(Vec3::splat(-1.5)),
        ));
        world
    }

    fn surface(list: &DrawList, mesh: usize) -> &DrawCommand {
        list.surfaces
            .iter()
            .find(|cmd| cmd.mesh == MeshHandle(mesh))
            .unwrap()
    }

    #[test]
    fn every_surface_gets_a_command() {
        let list = compose_frame(&small_world(), SceneFlags::default(), SceneMotion::default());
        assert_eq!(list.surfaces.len(), 3);
        assert_eq!(list.sprites.len(), 2);
        let reflective = list
            .with_pipeline(|p| matches!(p, Pipeline::Reflective { .. }))
            .count();
        assert_eq!(reflective, 1);
    }

    #[test]
    fn flavour_swaps_cake_textures() {
        let world = small_world();
        let vanilla = compose_frame(&world, SceneFlags::default(), SceneMotion::default());
        let chocolate = compose_frame(
            &world,
            SceneFlags {
                flavour: Flavour::Chocolate,
                ..SceneFlags::default()
            },
            SceneMotion::default(),
        );
        assert_eq!(
            surface(&vanilla, 0).pipeline,
            Pipeline::Opaque { texture: TextureKey::Icing }
        );
        assert_eq!(
            surface(&chocolate, 0).pipeline,
            Pipeline::Opaque { texture: TextureKey::ChocolateIcing }
        );
        assert_eq!(
            surface(&chocolate, 1).pipeline,
            Pipeline::Opaque { texture: TextureKey::ChocolateSponge }
        );
    }

    #[test]
    fn lift_moves_only_lifted_entities() {
        let world = small_world();
        let motion = SceneMotion {
            slice_lift: 0.5,
            flame_wobble: 0.0,
        };
        let list = compose_frame(&world, SceneFlags::default(), motion);
        assert_abs_diff_eq!(translation(&surface(&list, 0).model).y, -0.4);
        assert_abs_diff_eq!(translation(&surface(&list, 1).model).y, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(translation(&surface(&list, 2).model).y, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn snuffed_candles_drop_flames_but_keep_sparkles() {
        let flags = SceneFlags {
            candles_lit: false,
            ..SceneFlags::default()
        };
        let list = compose_frame(&small_world(), flags, SceneMotion::default());
        assert_eq!(list.sprites.len(), 1);
        assert_eq!(list.sprites[0].batch, SpriteBatchHandle(1));
    }

    #[test]
    fn wobble_shifts_flames_along_pivot_radius() {
        let motion = SceneMotion {
            slice_lift: 0.0,
            flame_wobble: 0.012,
        };
        let list = compose_frame(&small_world(), SceneFlags::default(), motion);
        let flame = list
            .sprites
            .iter()
            .find(|s| s.batch == SpriteBatchHandle(0))
            .unwrap();
        // local +X turns onto world -Z under a 90° pivot
        let t = translation(&flame.model);
        assert_abs_diff_eq!(t.z, -(0.25 + 0.012), epsilon = 1e-6);
        assert_abs_diff_eq!(t.x, 0.0, epsilon = 1e-6);
        let sparkles = list
            .sprites
            .iter()
            .find(|s| s.batch == SpriteBatchHandle(1))
            .unwrap();
        assert!(translation(&sparkles.model).abs_diff_eq(Vec3::splat(-1.5), 1e-6));
    }

    #[test]
    fn lights_come_back_in_spawn_order() {
        let mut world = World::new();
        for light in birthday_lights() {
            world.spawn((light,));
        }
        assert_eq!(collect_lights(&world), birthday_lights().to_vec());
    }

    #[test]
    fn plate_and_paper_ignore_flavour() {
        for flavour in [Flavour::Vanilla, Flavour::Chocolate] {
            assert_eq!(TextureKey::resolve(TextureSlot::Plate, flavour), TextureKey::Plate);
            assert_eq!(TextureKey::resolve(TextureSlot::Paper, flavour), TextureKey::Paper);
        }
    }

    #[test]
    fn flavour_toggle_round_trips() {
        assert_eq!(Flavour::Vanilla.toggled(), Flavour::Chocolate);
        assert_eq!(Flavour::Vanilla.toggled().toggled(), Flavour::Vanilla);
    }
}
