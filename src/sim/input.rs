//! Input latch between the host window and the simulation
//!
//! The host pushes events whenever it receives them; the simulation takes one
//! snapshot at the start of each tick. Held keys and cursor position are
//! last-value-wins. Fire and camera toggle are edge-triggered and cleared by
//! the snapshot.

use glam::{Vec2, Vec3};

use super::camera::CameraControls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    RollLeft,
    RollRight,
    Sprint,
    ToggleCamera,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Fires the hitscan
    Primary,
    /// Held to steer the camera with the mouse
    Secondary,
}

/// Raw events delivered by the windowing layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    /// Absolute cursor position, top-left origin, pixels
    CursorMoved { x: f32, y: f32 },
}

/// Everything the simulation consumes for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Camera-space movement (x right, y up, -z forward)
    pub movement: Vec3,
    pub look_delta: Vec2,
    pub roll: f32,
    pub sprint: bool,
    pub toggle_camera: bool,
    /// Fire latched since the previous tick
    pub fire: bool,
    /// Cursor at the moment of the snapshot, top-left origin
    pub cursor: Vec2,
}

impl TickInput {
    pub fn camera_controls(&self) -> CameraControls {
        CameraControls {
            movement: self.movement,
            look_delta: self.look_delta,
            roll: self.roll,
            sprint: self.sprint,
            toggle_mode: self.toggle_camera,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct HeldKeys {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    roll_left: bool,
    roll_right: bool,
    sprint: bool,
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i8 - negative as i8) as f32
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HeldKeys,
    looking: bool,
    cursor: Vec2,
    last_cursor: Option<Vec2>,
    look_delta: Vec2,
    fire_latched: bool,
    toggle_latched: bool,
    exit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key, pressed } => self.key(key, pressed),
            InputEvent::MouseButton { button, pressed } => match button {
                MouseButton::Primary => {
                    if pressed {
                        self.fire_latched = true;
                    }
                }
                MouseButton::Secondary => self.looking = pressed,
            },
            InputEvent::CursorMoved { x, y } => {
                let pos = Vec2::new(x, y);
                if self.looking {
                    if let Some(last) = self.last_cursor {
                        self.look_delta += pos - last;
                    }
                }
                self.last_cursor = Some(pos);
                self.cursor = pos;
            }
        }
    }

    fn key(&mut self, key: Key, pressed: bool) {
        let held = &mut self.held;
        match key {
            Key::Forward => held.forward = pressed,
            Key::Back => held.back = pressed,
            Key::Left => held.left = pressed,
            Key::Right => held.right = pressed,
            Key::Up => held.up = pressed,
            Key::Down => held.down = pressed,
            Key::RollLeft => held.roll_left = pressed,
            Key::RollRight => held.roll_right = pressed,
            Key::Sprint => held.sprint = pressed,
            Key::ToggleCamera => {
                if pressed {
                    self.toggle_latched = true;
                }
            }
            Key::Exit => {
                if pressed {
                    self.exit_requested = true;
                }
            }
        }
    }

    /// Snapshot for this tick; clears the one-shot latches and look delta
    pub fn take(&mut self) -> TickInput {
        let h = &self.held;
        let input = TickInput {
            movement: Vec3::new(
                axis(h.right, h.left),
                axis(h.up, h.down),
                axis(h.back, h.forward),
            ),
            look_delta: self.look_delta,
            roll: axis(h.roll_left, h.roll_right),
            sprint: h.sprint,
            toggle_camera: self.toggle_latched,
            fire: self.fire_latched,
            cursor: self.cursor,
        };
        self.look_delta = Vec2::ZERO;
        self.fire_latched = false;
        self.toggle_latched = false;
        input
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }
}
