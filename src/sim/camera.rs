//! Player viewpoint
//!
//! Orientation comes straight from accumulated yaw/pitch/roll. Position
//! integrates a smoothed velocity so movement eases in and out.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::wrap_angle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
        }
    }
}

/// Per-tick camera controls, already reduced from raw input
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraControls {
    /// Desired movement in camera space (x right, y up, -z forward), unnormalized
    pub movement: Vec3,
    /// Mouse travel since the last tick (pixels)
    pub look_delta: Vec2,
    /// -1, 0 or +1
    pub roll: f32,
    pub sprint: bool,
    pub toggle_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub mode: CameraMode,
    /// Radians, wrapped to [-π, π)
    pub yaw: f32,
    /// Radians, clamped to ±π/2
    pub pitch: f32,
    pub roll: f32,
    /// Smoothed velocity (units per tick)
    pub velocity: Vec3,
    /// How far the third-person eye trails the target
    pub follow_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            mode: CameraMode::default(),
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            velocity: Vec3::ZERO,
            follow_distance: crate::consts::THIRD_PERSON_DISTANCE,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, mode: CameraMode) -> Self {
        Self {
            position,
            mode,
            ..Default::default()
        }
    }

    /// Apply one tick of controls. Returns the translation applied this tick.
    pub fn update(&mut self, controls: &CameraControls, settings: &Settings) -> Vec3 {
        if controls.toggle_mode {
            self.mode = self.mode.toggled();
            log::debug!("camera mode -> {:?}", self.mode);
        }

        let look = controls.look_delta * settings.look_sensitivity;
        self.yaw = wrap_angle(self.yaw - look.x);
        self.pitch = (self.pitch - look.y).clamp(
            -std::f32::consts::FRAC_PI_2,
            std::f32::consts::FRAC_PI_2,
        );
        self.roll = wrap_angle(self.roll + controls.roll * settings.roll_speed);
        self.orientation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll);

        let mut speed = settings.camera_move_speed;
        if controls.sprint {
            speed *= settings.sprint_multiplier;
        }
        let target = self.orientation * controls.movement.clamp_length_max(1.0) * speed;
        self.velocity = self.velocity.lerp(target, settings.camera_smoothing);
        if self.velocity.length_squared() < 1e-10 {
            self.velocity = Vec3::ZERO;
        }

        self.position += self.velocity;
        self.velocity
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Where the view is rendered from in the current mode
    pub fn eye(&self) -> Vec3 {
        match self.mode {
            CameraMode::FirstPerson => self.position,
            CameraMode::ThirdPerson => self.position - self.forward() * self.follow_distance,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye(), self.forward(), self.up())
    }
}

/// Perspective projection (OpenGL depth range, as the renderer expects)
pub fn projection_matrix(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_degrees.to_radians(), aspect, near, far)
}
