use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::EventPump;
use std::collections::HashSet;

use crate::game::InputFrame;

/// Keyboard state gathered from SDL events, once per frame.
pub struct InputState {
    held: HashSet<Scancode>,
    /// Keys that went down this frame (repeats excluded).
    pressed: HashSet<Scancode>,
    pub quit: bool,
    /// Escape went down this frame.
    pub toggle_pause: bool,
    /// New drawable size if the window was resized this frame.
    pub resized: Option<(u32, u32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            quit: false,
            toggle_pause: false,
            resized: None,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.pressed.clear();
        self.toggle_pause = false;
        self.resized = None;

        for event in event_pump.poll_iter() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Quit { .. } => self.quit = true,
            Event::KeyDown {
                scancode: Some(Scancode::Escape),
                repeat: false,
                ..
            } => self.toggle_pause = true,
            Event::KeyDown {
                scancode: Some(sc),
                repeat,
                ..
            } => {
                if !repeat {
                    self.pressed.insert(sc);
                }
                self.held.insert(sc);
            }
            Event::KeyUp {
                scancode: Some(sc), ..
            } => {
                self.held.remove(&sc);
            }
            Event::Window {
                win_event: WindowEvent::SizeChanged(w, h),
                ..
            } => self.resized = Some((w.max(1) as u32, h.max(1) as u32)),
            _ => {}
        }
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.held.contains(&sc)
    }

    pub fn was_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }

    /// WASD / arrows to drive, Space to fire, R to reset.
    pub fn frame(&self) -> InputFrame {
        let held = |a, b| self.is_key_held(a) || self.is_key_held(b);
        InputFrame {
            forward: held(Scancode::W, Scancode::Up),
            back: held(Scancode::S, Scancode::Down),
            rotate_left: held(Scancode::A, Scancode::Left),
            rotate_right: held(Scancode::D, Scancode::Right),
            fire: self.was_pressed(Scancode::Space),
            reset: self.was_pressed(Scancode::R),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_down(sc: Scancode, repeat: bool) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: None,
            scancode: Some(sc),
            keymod: sdl2::keyboard::Mod::NOMOD,
            repeat,
        }
    }

    #[test]
    fn fire_is_edge_triggered() {
        let mut input = InputState::new();
        input.handle(key_down(Scancode::Space, false));
        assert!(input.frame().fire);

        // next frame: key still held, SDL sends a repeat
        input.pressed.clear();
        input.handle(key_down(Scancode::Space, true));
        assert!(!input.frame().fire);
    }

    #[test]
    fn movement_follows_held_keys() {
        let mut input = InputState::new();
        input.handle(key_down(Scancode::Up, false));
        input.handle(key_down(Scancode::A, false));
        let frame = input.frame();
        assert!(frame.forward && frame.rotate_left);
        assert!(!frame.back && !frame.reset);
    }

    #[test]
    fn escape_toggles_pause_instead_of_quitting() {
        let mut input = InputState::new();
        input.handle(key_down(Scancode::Escape, false));
        assert!(input.toggle_pause);
        assert!(!input.quit);
    }
}
