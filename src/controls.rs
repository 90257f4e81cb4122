//! Keyboard bindings for the demo, turned into [`Action`]s once per frame.
//!
//! | Keys          | Interpolate mode        | Free mode                |
//! |---------------|-------------------------|--------------------------|
//! | table keys    | animate to orientation  |                          |
//! | W / S         |                         | pitch about X + / -      |
//! | A / D         |                         | roll about Z + / -       |
//! | Q / E         |                         | yaw about Y + / -        |
//! | Space         | toggle slerp            | toggle multiply order    |
//! | M             | show/hide target marker | show/hide target marker  |
//! | Tab           | switch mode             | switch mode              |
//! | Escape        | exit                    | exit                     |

use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::input::{Input, key_code_for};
use crate::orientation_table::OrientationTable;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DemoMode {
    /// Digit keys animate between table orientations.
    #[default]
    Interpolate,
    /// Letter keys nudge a free-rotating orientation.
    Free,
}

impl DemoMode {
    pub fn toggled(self) -> Self {
        match self {
            DemoMode::Interpolate => DemoMode::Free,
            DemoMode::Free => DemoMode::Interpolate,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    AnimateTo(usize),
    ToggleSlerp,
    ToggleMultiplyOrder,
    Offset { axis: Vec3, degrees: f32 },
    ToggleMarker,
    SwitchMode,
    Exit,
}

const OFFSET_KEYS: [(KeyCode, Vec3, f32); 6] = [
    (KeyCode::KeyW, Vec3::X, 1.0),
    (KeyCode::KeyS, Vec3::X, -1.0),
    (KeyCode::KeyA, Vec3::Z, 1.0),
    (KeyCode::KeyD, Vec3::Z, -1.0),
    (KeyCode::KeyQ, Vec3::Y, 1.0),
    (KeyCode::KeyE, Vec3::Y, -1.0),
];

/// Current mode plus the free-rotation step size.
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    pub mode: DemoMode,
    pub step_deg: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            mode: DemoMode::default(),
            step_deg: 15.0,
        }
    }
}

impl Controls {
    pub fn new(step_deg: f32) -> Self {
        Self {
            step_deg,
            ..Self::default()
        }
    }

    /// Actions for the keys pressed this frame, in a stable order.
    pub fn actions(&self, input: &Input, table: &OrientationTable) -> Vec<Action> {
        let mut actions = Vec::new();

        if input.key_pressed(KeyCode::Escape) {
            actions.push(Action::Exit);
        }
        if input.key_pressed(KeyCode::Tab) {
            actions.push(Action::SwitchMode);
        }
        if input.key_pressed(KeyCode::KeyM) {
            actions.push(Action::ToggleMarker);
        }

        match self.mode {
            DemoMode::Interpolate => {
                if input.key_pressed(KeyCode::Space) {
                    actions.push(Action::ToggleSlerp);
                }
                for (index, entry) in table.iter().enumerate() {
                    if key_code_for(entry.key).is_some_and(|code| input.key_pressed(code)) {
                        actions.push(Action::AnimateTo(index));
                    }
                }
            }
            DemoMode::Free => {
                if input.key_pressed(KeyCode::Space) {
                    actions.push(Action::ToggleMultiplyOrder);
                }
                for (key, axis, sign) in OFFSET_KEYS {
                    if input.key_pressed(key) {
                        actions.push(Action::Offset {
                            axis,
                            degrees: sign * self.step_deg,
                        });
                    }
                }
            }
        }

        actions
    }

    pub fn switch_mode(&mut self) -> DemoMode {
        self.mode = self.mode.toggled();
        log::info!("mode: {:?}", self.mode);
        self.mode
    }
}
