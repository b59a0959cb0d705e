use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::Sdl;

use crate::config::WindowConfig;
use crate::error::WindowError;

pub struct SceneWindow {
    _gl_context: GLContext,
    window: Window,
}

impl SceneWindow {
    /// Open a window with a GL 3.3 core context and load the GL function pointers.
    pub fn new(sdl: &Sdl, config: &WindowConfig) -> Result<Self, WindowError> {
        let video = sdl.video().map_err(|e| WindowError::new("SDL video init", e))?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| WindowError::new("window creation", e))?;

        let gl_context = window
            .gl_create_context()
            .map_err(|e| WindowError::new("GL context creation", e))?;

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);
        log::info!("opened {}x{} window \"{}\"", config.width, config.height, config.title);

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.size()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.window.size();
        w as f32 / h.max(1) as f32
    }
}
