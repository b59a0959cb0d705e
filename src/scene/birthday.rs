use std::f32::consts::{PI, TAU};

use glam::{Mat4, Quat, Vec3};
use hecs::World;
use rand::Rng;

use super::{ParticleBatch, SceneAssets};
use crate::components::*;
use crate::config::SceneConfig;
use crate::renderer::mesh::{self, MeshData};
use crate::shading::birthday_lights;
use crate::shading::sprite::scatter_points;

// ---------------------------------------------------------------------------
// CakeLayout: private proportions table for the birthday scene
// ---------------------------------------------------------------------------

/// Cake dimensions and ring placements in one place. Angles are measured in
/// the XZ plane from +X towards +Z, the same way the wedge meshes are built.
struct CakeLayout {
    radius: f32,
    layer_height: f32,
    icing_height: f32,
    /// Y of the bottom of the lower sponge layer.
    base_y: f32,
    segments: u32,

    /// The cake is divided into this many slots; one is the cut slice.
    ring_slots: u32,
    /// Angle of the middle of the cut slice. +Z faces the camera.
    slice_center: f32,
    /// How far the slice is pulled out of the cake before lifting.
    slice_pull: f32,

    plate_radius: f32,
    plate_height: f32,

    base_dollops: u32,
    dollop_radius: f32,
    top_dollop_radius: f32,
    top_ring_radius: f32,

    candle_radius: f32,
    candle_height: f32,
    candle_ring_radius: f32,
}

impl CakeLayout {
    fn slot_angle(&self) -> f32 {
        TAU / self.ring_slots as f32
    }

    fn gap_start(&self) -> f32 {
        self.slice_center - self.slot_angle() * 0.5
    }

    fn lower_layer_y(&self) -> f32 {
        self.base_y + self.layer_height * 0.5
    }

    fn middle_icing_y(&self) -> f32 {
        self.base_y + self.layer_height + self.icing_height * 0.5
    }

    fn upper_layer_y(&self) -> f32 {
        self.base_y + self.layer_height * 1.5 + self.icing_height
    }

    fn top_icing_y(&self) -> f32 {
        self.base_y + self.layer_height * 2.0 + self.icing_height * 1.5
    }

    fn top_y(&self) -> f32 {
        self.base_y + (self.layer_height + self.icing_height) * 2.0
    }

    /// Angle of candle slot `i`, skipping the slot the slice was cut from.
    fn candle_angle(&self, i: u32) -> f32 {
        self.slice_center + self.slot_angle() * (i + 1) as f32
    }

    /// Angle of base dollop `i`, spread evenly over the uncut arc.
    fn base_dollop_angle(&self, i: u32) -> f32 {
        let arc = TAU - self.slot_angle();
        let step = arc / self.base_dollops as f32;
        self.gap_start() + self.slot_angle() + step * (i as f32 + 0.5)
    }
}

fn default_layout() -> CakeLayout {
    CakeLayout {
        radius: 0.45,
        layer_height: 0.12,
        icing_height: 0.02,
        base_y: -0.54,
        segments: 48,

        ring_slots: 7,
        slice_center: PI / 2.0,
        slice_pull: 0.2,

        plate_radius: 0.62,
        plate_height: 0.02,

        base_dollops: 28,
        dollop_radius: 0.035,
        top_dollop_radius: 0.04,
        top_ring_radius: 0.36,

        candle_radius: 0.015,
        candle_height: 0.14,
        candle_ring_radius: 0.28,
    }
}

/// Frame turned about the cake axis so local +X points along `angle`.
fn ring_pivot(origin_y: f32, angle: f32) -> Pivot {
    Pivot::around_y(Vec3::new(0.0, origin_y, 0.0), -angle.to_degrees())
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Populate `world` with the birthday scene and register its geometry in `assets`.
pub fn spawn_birthday_scene<R: Rng>(
    world: &mut World,
    assets: &mut SceneAssets,
    config: &SceneConfig,
    rng: &mut R,
) {
    let layout = default_layout();

    spawn_plate(world, assets, &layout);
    spawn_cake(world, assets, &layout);
    spawn_dollops(world, assets, &layout);
    spawn_candles(world, assets, &layout, config, rng);
    spawn_slice(world, assets, &layout);
    spawn_knife(world, assets, &layout, config);
    spawn_room(world, assets);
    spawn_sparkles(world, assets, config, rng);
    spawn_backdrop(world, assets, config);
    spawn_lights(world);

    log::info!(
        "birthday scene: {} entities, {} meshes, {} sprite batches",
        world.len(),
        assets.meshes().len(),
        assets.batches().len()
    );
}

fn spawn_surface(
    world: &mut World,
    mesh: MeshHandle,
    local: LocalTransform,
    shading: Shading,
) {
    world.spawn((mesh, local, shading));
}

fn spawn_plate(world: &mut World, assets: &mut SceneAssets, layout: &CakeLayout) {
    let plate = assets.add_mesh(mesh::cylinder(layout.plate_radius, layout.plate_height, layout.segments));
    let y = layout.base_y - layout.plate_height * 0.5;
    spawn_surface(world, plate, LocalTransform::new(Vec3::new(0.0, y, 0.0)), Shading::Opaque(TextureSlot::Plate));
}

/// Two sponge layers with icing between and on top, each missing the slice.
fn spawn_cake(world: &mut World, assets: &mut SceneAssets, layout: &CakeLayout) {
    let gap = layout.slot_angle();
    let sponge = assets.add_mesh(mesh::cut_cylinder(
        layout.radius,
        layout.layer_height,
        layout.gap_start(),
        gap,
        layout.segments,
    ));
    // icing overhangs the sponge a little
    let icing = assets.add_mesh(mesh::cut_cylinder(
        layout.radius + 0.005,
        layout.icing_height,
        layout.gap_start(),
        gap,
        layout.segments,
    ));

    for y in [layout.lower_layer_y(), layout.upper_layer_y()] {
        spawn_surface(world, sponge, LocalTransform::new(Vec3::new(0.0, y, 0.0)), Shading::Opaque(TextureSlot::Sponge));
    }
    for y in [layout.middle_icing_y(), layout.top_icing_y()] {
        spawn_surface(world, icing, LocalTransform::new(Vec3::new(0.0, y, 0.0)), Shading::Opaque(TextureSlot::Icing));
    }
}

fn dollop_mesh() -> MeshData {
    mesh::sphere(1.0, 8, 12)
}

fn dollop_transform(position: Vec3, radius: f32) -> LocalTransform {
    // squashed a little so it sits on the cake
    LocalTransform::new(position).with_scale(Vec3::new(radius, radius * 0.7, radius))
}

/// Cream ring around the base and one dollop under each candle.
fn spawn_dollops(world: &mut World, assets: &mut SceneAssets, layout: &CakeLayout) {
    let dollop = assets.add_mesh(dollop_mesh());

    for i in 0..layout.base_dollops {
        world.spawn((
            dollop,
            dollop_transform(Vec3::new(layout.radius, 0.0, 0.0), layout.dollop_radius),
            ring_pivot(layout.base_y, layout.base_dollop_angle(i)),
            Shading::Opaque(TextureSlot::Icing),
        ));
    }

    for i in 0..layout.ring_slots - 1 {
        world.spawn((
            dollop,
            dollop_transform(Vec3::new(layout.top_ring_radius, 0.0, 0.0), layout.top_dollop_radius),
            ring_pivot(layout.top_y(), layout.candle_angle(i)),
            Shading::Opaque(TextureSlot::Icing),
        ));
    }
}

/// Candles on the inner ring, each with a flame batch above its wick.
fn spawn_candles<R: Rng>(
    world: &mut World,
    assets: &mut SceneAssets,
    layout: &CakeLayout,
    config: &SceneConfig,
    rng: &mut R,
) {
    let sprites = &config.sprites;
    let candle = assets.add_mesh(mesh::cylinder(layout.candle_radius, layout.candle_height, 12));
    let flame = assets.add_batch(ParticleBatch {
        positions: scatter_points(rng, sprites.flame_count, sprites.flame_spread),
        color: Vec3::new(1.0, 0.0, 0.0),
    });

    // flame points fill [0, spread)³; centre them over the wick
    let half_spread = sprites.flame_spread * 0.5;
    let flame_offset = Vec3::new(
        layout.candle_ring_radius - half_spread,
        layout.candle_height + 0.01,
        -half_spread,
    );

    for i in 0..layout.ring_slots - 1 {
        let pivot = ring_pivot(layout.top_y(), layout.candle_angle(i));
        world.spawn((
            candle,
            LocalTransform::new(Vec3::new(layout.candle_ring_radius, layout.candle_height * 0.5, 0.0)),
            pivot,
            Shading::Opaque(TextureSlot::Plate),
        ));
        world.spawn((flame, LocalTransform::new(flame_offset), pivot, CandleFlame));
    }
}

/// The cut slice, pulled out towards the camera and riding the lift animation.
fn spawn_slice(world: &mut World, assets: &mut SceneAssets, layout: &CakeLayout) {
    let (start, sweep) = (layout.gap_start(), layout.slot_angle());
    let sponge = assets.add_mesh(mesh::wedge(layout.radius, layout.layer_height, start, sweep, 8));
    let icing = assets.add_mesh(mesh::wedge(layout.radius + 0.005, layout.icing_height, start, sweep, 8));
    let dollop = assets.add_mesh(dollop_mesh());

    let pull = Vec3::new(layout.slice_center.cos(), 0.0, layout.slice_center.sin()) * layout.slice_pull;
    let at = |y: f32| LocalTransform::new(pull + Vec3::new(0.0, y, 0.0));

    for y in [layout.lower_layer_y(), layout.upper_layer_y()] {
        world.spawn((sponge, at(y), Shading::Opaque(TextureSlot::Sponge), SliceLift));
    }
    for y in [layout.middle_icing_y(), layout.top_icing_y()] {
        world.spawn((icing, at(y), Shading::Opaque(TextureSlot::Icing), SliceLift));
    }

    // one dollop on top, four along the outer edge
    world.spawn((
        dollop,
        dollop_transform(Vec3::new(layout.top_ring_radius, 0.0, 0.0), layout.top_dollop_radius),
        Pivot(Mat4::from_translation(pull) * ring_pivot(layout.top_y(), layout.slice_center).0),
        Shading::Opaque(TextureSlot::Icing),
        SliceLift,
    ));
    for i in 0..4 {
        let angle = start + sweep * (i as f32 + 0.5) / 4.0;
        world.spawn((
            dollop,
            dollop_transform(Vec3::new(layout.radius, 0.0, 0.0), layout.dollop_radius),
            Pivot(Mat4::from_translation(pull) * ring_pivot(layout.base_y, angle).0),
            Shading::Opaque(TextureSlot::Icing),
            SliceLift,
        ));
    }
}

/// Knife pushed blade-down into the slice.
fn spawn_knife(world: &mut World, assets: &mut SceneAssets, layout: &CakeLayout, config: &SceneConfig) {
    let knife = assets.add_mesh(mesh::knife());
    let reflection = &config.reflection;

    let mid = Vec3::new(layout.slice_center.cos(), 0.0, layout.slice_center.sin());
    let position = mid * (layout.radius * 0.5 + layout.slice_pull) + Vec3::new(0.0, layout.top_y() + 0.2, 0.0);
    let rotation = Quat::from_rotation_y(-layout.slice_center) * Quat::from_rotation_x(PI);

    world.spawn((
        knife,
        LocalTransform::new(position).with_rotation(rotation),
        Shading::Reflective {
            color: Vec3::from_array(reflection.knife_color),
            shininess: reflection.knife_shininess,
        },
        SliceLift,
    ));
}

/// Three paper walls and a floor enclosing the cake.
fn spawn_room(world: &mut World, assets: &mut SceneAssets) {
    let quads = [
        [
            Vec3::new(1.5, -0.6, -1.5),
            Vec3::new(-1.5, -0.6, -1.5),
            Vec3::new(-1.5, 1.5, -1.5),
            Vec3::new(1.5, 1.5, -1.5),
        ],
        [
            Vec3::new(-1.5, -0.6, -1.5),
            Vec3::new(-1.5, -0.6, 1.6),
            Vec3::new(-1.5, 1.5, 1.6),
            Vec3::new(-1.5, 1.5, -1.5),
        ],
        [
            Vec3::new(1.5, -0.6, -1.5),
            Vec3::new(1.5, -0.6, 1.6),
            Vec3::new(1.5, 1.5, 1.6),
            Vec3::new(1.5, 1.5, -1.5),
        ],
        [
            Vec3::new(1.5, -0.6, -1.5),
            Vec3::new(-1.5, -0.6, -1.5),
            Vec3::new(-1.5, -0.6, 1.6),
            Vec3::new(1.5, -0.6, 1.6),
        ],
    ];
    for corners in quads {
        let quad = assets.add_mesh(mesh::inward_quad(corners));
        spawn_surface(world, quad, LocalTransform::new(Vec3::ZERO), Shading::Opaque(TextureSlot::Paper));
    }
}

fn spawn_sparkles<R: Rng>(world: &mut World, assets: &mut SceneAssets, config: &SceneConfig, rng: &mut R) {
    let sprites = &config.sprites;
    let sparkles = assets.add_batch(ParticleBatch {
        positions: scatter_points(rng, sprites.sparkle_count, sprites.sparkle_extent),
        color: Vec3::new(0.0, 0.0, 1.0),
    });
    let corner = -0.5 * sprites.sparkle_extent;
    world.spawn((sparkles, LocalTransform::new(Vec3::splat(corner))));
}

fn spawn_backdrop(world: &mut World, assets: &mut SceneAssets, config: &SceneConfig) {
    let sphere = assets.add_mesh(mesh::sphere(config.camera.far_clip * 0.85, 32, 64));
    spawn_surface(world, sphere, LocalTransform::new(Vec3::ZERO), Shading::Backdrop);
}

fn spawn_lights(world: &mut World) {
    for light in birthday_lights() {
        world.spawn((light,));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SceneMotion;
    use crate::scene::{collect_lights, compose_frame, Pipeline, SceneFlags};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build() -> (World, SceneAssets) {
        let mut world = World::new();
        let mut assets = SceneAssets::new();
        let mut rng = StdRng::seed_from_u64(7);
        spawn_birthday_scene(&mut world, &mut assets, &SceneConfig::default(), &mut rng);
        (world, assets)
    }

    fn angle_of(p: Vec3) -> f32 {
        p.z.atan2(p.x).rem_euclid(TAU)
    }

    #[test]
    fn scene_has_expected_population() {
        let (world, assets) = build();
        assert_eq!(world.query::<&CandleFlame>().iter().count(), 6);
        assert_eq!(collect_lights(&world).len(), 3);
        assert_eq!(assets.batches().len(), 2);
        assert_eq!(assets.batches()[0].positions.len(), 10);
        assert_eq!(assets.batches()[1].positions.len(), 100);

        let list = compose_frame(&world, SceneFlags::default(), SceneMotion::default());
        let backdrops = list
            .with_pipeline(|p| matches!(p, Pipeline::Backdrop { .. }))
            .count();
        let reflective = list
            .with_pipeline(|p| matches!(p, Pipeline::Reflective { .. }))
            .count();
        assert_eq!(backdrops, 1);
        assert_eq!(reflective, 1);
        assert_eq!(list.sprites.len(), 7);
    }

    #[test]
    fn every_handle_points_into_assets() {
        let (world, assets) = build();
        for (_e, handle) in world.query::<&MeshHandle>().iter() {
            assert!(handle.0 < assets.meshes().len());
        }
        for (_e, handle) in world.query::<&SpriteBatchHandle>().iter() {
            assert!(handle.0 < assets.batches().len());
        }
    }

    #[test]
    fn slice_and_knife_ride_the_lift() {
        let (world, _assets) = build();
        // 2 sponge, 2 icing, 5 dollops, knife
        assert_eq!(world.query::<&SliceLift>().iter().count(), 10);
        let reflective_lifted = world
            .query::<(&Shading, &SliceLift)>()
            .iter()
            .filter(|(_e, (s, _))| matches!(s, Shading::Reflective { .. }))
            .count();
        assert_eq!(reflective_lifted, 1);
    }

    #[test]
    fn candles_avoid_the_cut_slot() {
        let (world, _assets) = build();
        let layout = default_layout();
        let list = compose_frame(&world, SceneFlags::default(), SceneMotion::default());
        let half_slot = layout.slot_angle() * 0.5;
        let mut candles = 0;
        for (_e, (local, pivot, shading)) in world.query::<(&LocalTransform, &Pivot, &Shading)>().iter() {
            if *shading != Shading::Opaque(TextureSlot::Plate) {
                continue;
            }
            candles += 1;
            let p = pivot.0.transform_point3(local.position);
            let off = (angle_of(p) - layout.slice_center).abs();
            assert!(off > half_slot, "candle inside slice at {p:?}");
            assert_abs_diff_eq!(Vec3::new(p.x, 0.0, p.z).length(), layout.candle_ring_radius, epsilon = 1e-5);
        }
        assert_eq!(candles, 6);
        assert!(list.surfaces.len() > candles);
    }

    #[test]
    fn flames_sit_above_candle_wicks() {
        let (world, assets) = build();
        let layout = default_layout();
        let list = compose_frame(&world, SceneFlags::default(), SceneMotion::default());
        let spread = SceneConfig::default().sprites.flame_spread;
        let centre = Vec3::splat(spread * 0.5);
        let wick_y = layout.top_y() + layout.candle_height;

        let flames: Vec<_> = list
            .sprites
            .iter()
            .filter(|s| assets.batches()[s.batch.0].positions.len() == 10)
            .collect();
        assert_eq!(flames.len(), 6);
        for flame in flames {
            let c = flame.model.transform_point3(centre);
            assert!(c.y > wick_y && c.y < wick_y + spread + 0.02);
            assert_abs_diff_eq!(Vec3::new(c.x, 0.0, c.z).length(), layout.candle_ring_radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn base_dollops_fill_the_uncut_arc() {
        let layout = default_layout();
        let half_slot = layout.slot_angle() * 0.5;
        for i in 0..layout.base_dollops {
            let a = layout.base_dollop_angle(i).rem_euclid(TAU);
            assert!((a - layout.slice_center).abs() > half_slot);
        }
    }

    #[test]
    fn same_seed_same_particles() {
        let (_w1, a1) = build();
        let (_w2, a2) = build();
        assert_eq!(a1.batches(), a2.batches());
    }
}
