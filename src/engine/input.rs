use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;
use std::collections::HashSet;

/// Input gathered over one frame. Key presses are edges: a held key reports
/// once, on the frame it went down.
pub struct InputState {
    pub pressed: HashSet<Scancode>,
    pub drag_dx: f32,
    pub drag_dy: f32,
    pub wheel: f32,
    pub resized: Option<(u32, u32)>,
    pub quit: bool,
    dragging: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            drag_dx: 0.0,
            drag_dy: 0.0,
            wheel: 0.0,
            resized: None,
            quit: false,
            dragging: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.begin_frame();
        for event in event_pump.poll_iter() {
            self.handle(&event);
        }
    }

    fn begin_frame(&mut self) {
        self.pressed.clear();
        self.drag_dx = 0.0;
        self.drag_dy = 0.0;
        self.wheel = 0.0;
        self.resized = None;
    }

    fn handle(&mut self, event: &Event) {
        match *event {
            Event::Quit { .. } => self.quit = true,
            Event::KeyDown {
                scancode: Some(sc),
                repeat,
                ..
            } => self.key_down(sc, repeat),
            Event::MouseButtonDown {
                mouse_btn: MouseButton::Left,
                ..
            } => self.dragging = true,
            Event::MouseButtonUp {
                mouse_btn: MouseButton::Left,
                ..
            } => self.dragging = false,
            Event::MouseMotion { xrel, yrel, .. } => self.mouse_moved(xrel as f32, yrel as f32),
            Event::MouseWheel { y, .. } => self.wheel += y as f32,
            Event::Window {
                win_event: WindowEvent::SizeChanged(w, h),
                ..
            } => self.resized = Some((w.max(1) as u32, h.max(1) as u32)),
            _ => {}
        }
    }

    fn key_down(&mut self, sc: Scancode, repeat: bool) {
        if sc == Scancode::Escape {
            self.quit = true;
        } else if !repeat {
            self.pressed.insert(sc);
        }
    }

    fn mouse_moved(&mut self, dx: f32, dy: f32) {
        if self.dragging {
            self.drag_dx += dx;
            self.drag_dy += dy;
        }
    }

    pub fn was_pressed(&self, sc: Scancode) -> bool {
        self.pressed.contains(&sc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_last_one_frame() {
        let mut input = InputState::new();
        input.key_down(Scancode::Space, false);
        input.key_down(Scancode::C, true);
        assert!(input.was_pressed(Scancode::Space));
        assert!(!input.was_pressed(Scancode::C));
        input.begin_frame();
        assert!(!input.was_pressed(Scancode::Space));
    }

    #[test]
    fn escape_quits() {
        let mut input = InputState::new();
        input.key_down(Scancode::Escape, false);
        assert!(input.quit);
    }

    #[test]
    fn motion_only_counts_while_dragging() {
        let mut input = InputState::new();
        input.mouse_moved(5.0, 1.0);
        assert_eq!((input.drag_dx, input.drag_dy), (0.0, 0.0));
        input.dragging = true;
        input.mouse_moved(5.0, 1.0);
        input.mouse_moved(2.0, -3.0);
        assert_eq!((input.drag_dx, input.drag_dy), (7.0, -2.0));
    }
}
