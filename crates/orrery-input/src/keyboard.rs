//! Frame-coherent keyboard state.
//!
//! Keys are tracked by physical code so WASD stays in place on any layout.
//! Feed events in, query during the frame, then call
//! [`end_frame`](KeyboardState::end_frame).

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The parts of a winit key event the orrery cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub code: KeyCode,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    /// `None` for keys winit could not identify.
    pub fn from_winit(event: &KeyEvent) -> Option<Self> {
        match event.physical_key {
            PhysicalKey::Code(code) => Some(Self {
                code,
                state: event.state,
                repeat: event.repeat,
            }),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        if let Some(raw) = RawKeyEvent::from_winit(event) {
            self.process_raw(raw);
        }
    }

    /// Auto-repeat presses are dropped so edges fire once per physical press.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.code) {
                    self.pressed_this_frame.insert(event.code);
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.code) {
                    self.released_this_frame.insert(event.code);
                }
            }
        }
    }

    #[must_use]
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.pressed_this_frame.contains(&code)
    }

    #[must_use]
    pub fn just_released(&self, code: KeyCode) -> bool {
        self.released_this_frame.contains(&code)
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.released_this_frame.extend(self.held.drain());
    }

    pub fn end_frame(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }
}
