use crate::animation::SceneClock;
use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::engine::input::InputState;
use crate::engine::time::FrameTimer;
use crate::engine::window::SceneWindow;
use crate::error::{RenderError, WindowError};
use crate::renderer::Renderer;
use crate::scene::birthday::spawn_birthday_scene;
use crate::scene::{collect_lights, compose_frame, SceneAssets, SceneFlags};
use hecs::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sdl2::keyboard::Scancode;
use sdl2::Sdl;

pub struct CakeApp {
    world: World,
    camera: Camera,
    renderer: Renderer,
    clock: SceneClock,
    flags: SceneFlags,
}

impl CakeApp {
    /// Build the scene and upload it. Needs a current GL context.
    pub fn new(config: &SceneConfig) -> Result<Self, RenderError> {
        let seed = config.sprites.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("particle seed {seed}");
        let mut rng = StdRng::seed_from_u64(seed);

        let mut world = World::new();
        let mut assets = SceneAssets::new();
        spawn_birthday_scene(&mut world, &mut assets, config, &mut rng);

        let mut renderer = Renderer::init(&assets, config, rng.random())?;
        renderer.upload_lights(&collect_lights(&world));

        Ok(Self {
            world,
            camera: Camera::new(&config.camera),
            renderer,
            clock: SceneClock::new(&config.animation),
            flags: SceneFlags::default(),
        })
    }

    pub fn run(&mut self, sdl: &Sdl, window: &SceneWindow) -> Result<(), WindowError> {
        let mut event_pump = sdl
            .event_pump()
            .map_err(|e| WindowError::new("event pump", e))?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();

        let (w, h) = window.size();
        self.renderer.resize(w, h);

        loop {
            timer.tick();
            input.update(&mut event_pump);

            if input.quit {
                log::info!("quitting");
                break;
            }

            if let Some((w, h)) = input.resized {
                self.renderer.resize(w, h);
            }

            self.flags = toggled_flags(self.flags, &input);
            self.camera.orbit(input.drag_dx, input.drag_dy);
            if input.wheel != 0.0 {
                self.camera.zoom(input.wheel);
            }

            self.clock.advance(timer.dt);
            self.render(window);
            window.swap();
        }

        Ok(())
    }

    fn render(&mut self, window: &SceneWindow) {
        let motion = self.clock.sample();
        let list = compose_frame(&self.world, self.flags, motion);
        let frame = self.camera.frame_uniforms(window.aspect_ratio());
        log::trace!(
            "frame: {} surfaces, {} sprite batches, lift {:.3}",
            list.surfaces.len(),
            list.sprites.len(),
            motion.slice_lift
        );
        self.renderer.draw_frame(&list, &frame);
    }
}

/// Space blows out or relights the candles; C swaps the cake flavour.
fn toggled_flags(mut flags: SceneFlags, input: &InputState) -> SceneFlags {
    if input.was_pressed(Scancode::Space) {
        flags.candles_lit = !flags.candles_lit;
        log::info!("candles {}", if flags.candles_lit { "lit" } else { "out" });
    }
    if input.was_pressed(Scancode::C) {
        flags.flavour = flags.flavour.toggled();
        log::info!("flavour {:?}", flags.flavour);
    }
    flags
}
