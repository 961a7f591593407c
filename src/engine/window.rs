use sdl2::video::{GLContext, GLProfile, Window};
use sdl2::Sdl;

use crate::error::GameError;

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    /// Open a resizable window with a GL 3.3 core context and load GL symbols.
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self, GameError> {
        let video = sdl.video().map_err(GameError::Sdl)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let window = video
            .window(title, width, height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| GameError::Window(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(GameError::Window)?;
        // vsync is best-effort
        if let Err(e) = video.gl_set_swap_interval(1) {
            log::debug!("vsync unavailable: {e}");
        }

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

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

    pub fn set_title(&mut self, title: &str) {
        if let Err(e) = self.window.set_title(title) {
            log::debug!("could not set window title: {e}");
        }
    }
}
