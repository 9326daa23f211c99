//! Key bindings of the orrery.
//!
//! | Key          | Effect                             |
//! |--------------|------------------------------------|
//! | W A S D      | fly forward / left / back / right  |
//! | Space, LCtrl | fly up / down                      |
//! | C            | toggle mouse-look (1 s cooldown)   |
//! | F1           | toggle the debug overlay           |
//! | ] / [        | orbit scale up / down              |
//! | = / -        | sun scale modifier up / down       |
//! | . / ,        | brighten / darken the background   |
//! | Escape       | quit                               |

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

const MOVE_BINDINGS: [(KeyCode, MoveDirection); 6] = [
    (KeyCode::KeyW, MoveDirection::Forward),
    (KeyCode::KeyS, MoveDirection::Backward),
    (KeyCode::KeyA, MoveDirection::Left),
    (KeyCode::KeyD, MoveDirection::Right),
    (KeyCode::Space, MoveDirection::Up),
    (KeyCode::ControlLeft, MoveDirection::Down),
];

/// Discrete actions triggered by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Quit,
    ToggleCapture,
    ToggleOverlay,
    OrbitScaleUp,
    OrbitScaleDown,
    SunScaleUp,
    SunScaleDown,
    Brighten,
    Darken,
}

/// Property nudges, one step per press.
const PROPERTY_BINDINGS: [(KeyCode, ControlAction); 6] = [
    (KeyCode::BracketRight, ControlAction::OrbitScaleUp),
    (KeyCode::BracketLeft, ControlAction::OrbitScaleDown),
    (KeyCode::Equal, ControlAction::SunScaleUp),
    (KeyCode::Minus, ControlAction::SunScaleDown),
    (KeyCode::Period, ControlAction::Brighten),
    (KeyCode::Comma, ControlAction::Darken),
];

/// Rate limiter for the mouse-look toggle.
#[derive(Debug, Clone, Copy)]
pub struct CaptureToggle {
    cooldown: f64,
    last_toggle: Option<f64>,
}

impl Default for CaptureToggle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CaptureToggle {
    pub fn new(cooldown_seconds: f64) -> Self {
        Self {
            cooldown: cooldown_seconds,
            last_toggle: None,
        }
    }

    /// `true` if a toggle at time `now` (seconds) is allowed; records it if so.
    pub fn try_toggle(&mut self, now: f64) -> bool {
        let ready = self
            .last_toggle
            .is_none_or(|last| now - last > self.cooldown);
        if ready {
            self.last_toggle = Some(now);
        }
        ready
    }
}

/// Everything the keyboard asks for in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameControls {
    pub movement: Vec<MoveDirection>,
    pub actions: Vec<ControlAction>,
}

impl FrameControls {
    /// Resolve held keys into movement and fresh presses into actions.
    pub fn from_keyboard(keyboard: &KeyboardState, capture: &mut CaptureToggle, now: f64) -> Self {
        let movement = MOVE_BINDINGS
            .iter()
            .filter(|(code, _)| keyboard.is_held(*code))
            .map(|(_, direction)| *direction)
            .collect();

        let mut actions = Vec::new();
        if keyboard.is_held(KeyCode::Escape) {
            actions.push(ControlAction::Quit);
        }
        if keyboard.is_held(KeyCode::KeyC) && capture.try_toggle(now) {
            actions.push(ControlAction::ToggleCapture);
        }
        if keyboard.just_pressed(KeyCode::F1) {
            actions.push(ControlAction::ToggleOverlay);
        }
        actions.extend(
            PROPERTY_BINDINGS
                .iter()
                .filter(|(code, _)| keyboard.just_pressed(*code))
                .map(|(_, action)| *action),
        );
        if !actions.is_empty() {
            tracing::debug!(?actions, "Control actions");
        }

        Self { movement, actions }
    }

    pub fn has(&self, action: ControlAction) -> bool {
        self.actions.contains(&action)
    }
}
