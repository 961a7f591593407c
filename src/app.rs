use log::info;
use sdl2::Sdl;

use crate::camera::Camera;
use crate::engine::input::InputState;
use crate::engine::time::FrameTimer;
use crate::engine::window::GameWindow;
use crate::error::GameError;
use crate::game::Game;
use crate::renderer::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
}

pub struct GameApp {
    game: Game,
    camera: Camera,
    renderer: Renderer,
    state: GameState,
    /// What the title bar currently shows.
    shown: Option<(u32, GameState)>,
}

impl GameApp {
    /// Needs the window's GL context to be current.
    pub fn new(game: Game) -> Result<Self, GameError> {
        let mut camera = Camera::new();
        camera.snap(game.tank().position, game.tank().forward());
        Ok(Self {
            game,
            camera,
            renderer: Renderer::new()?,
            state: GameState::Running,
            shown: None,
        })
    }

    pub fn run(&mut self, sdl: &Sdl, window: &mut GameWindow) -> Result<(), GameError> {
        let mut event_pump = sdl.event_pump().map_err(GameError::Sdl)?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();
        let (w, h) = window.size();
        self.renderer.resize(w, h);

        loop {
            timer.tick();
            input.update(&mut event_pump);

            if input.quit {
                break;
            }
            if let Some((w, h)) = input.resized {
                self.renderer.resize(w, h);
            }

            if input.toggle_pause {
                self.state = match self.state {
                    GameState::Running => {
                        info!("paused");
                        GameState::Paused
                    }
                    GameState::Paused => {
                        info!("resumed");
                        timer.resume();
                        GameState::Running
                    }
                };
            }

            if self.state == GameState::Running {
                let report = self.game.frame(timer.dt, &input.frame())?;
                let tank = self.game.tank();
                if report.reset {
                    self.camera.snap(tank.position, tank.forward());
                } else {
                    self.camera.follow(tank.position, tank.forward(), report.dt);
                }
            }

            self.update_title(window);

            let view = self.camera.view_matrix();
            let proj = self.camera.projection_matrix(window.aspect_ratio());
            self.renderer.begin_frame(&view, &proj, self.camera.position);
            self.game.draw(&mut self.renderer);

            window.swap();
        }

        info!("final score {}", self.game.score());
        Ok(())
    }

    fn update_title(&mut self, window: &mut GameWindow) {
        let current = (self.game.score(), self.state);
        if self.shown == Some(current) {
            return;
        }
        let suffix = if self.state == GameState::Paused { " (paused)" } else { "" };
        window.set_title(&format!("Tank Arena - score {}{suffix}", current.0));
        self.shown = Some(current);
    }
}
