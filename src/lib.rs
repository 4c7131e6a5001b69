//! Space Objects - arcade space combat simulation core
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (spawning, movement, collision, picking)
//! - `catalog`: Prototype models the spawner instantiates
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Startup error taxonomy

pub mod catalog;
pub mod error;
pub mod settings;
pub mod sim;

pub use catalog::{Catalog, ModelName, Pose, Prototype};
pub use error::SimError;
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Ticks per second. Every rate and probability below is per tick.
    pub const TICK_RATE_HZ: u32 = 60;

    /// Per-tick chance that a hostile craft spawns
    pub const HOSTILE_SPAWN_CHANCE: f64 = 1.0 / 300.0;
    /// Per-tick chance that a free asteroid spawns
    pub const ASTEROID_SPAWN_CHANCE: f64 = 1.0 / 300.0;
    /// Per-tick chance that a living hostile launches an asteroid at the player
    pub const ASTEROID_LAUNCH_CHANCE: f64 = 1.0 / 1000.0;

    /// Spawn rectangle half-extent on x and y
    pub const SPAWN_HALF_EXTENT: f32 = 25.0;
    /// Far plane where entities appear
    pub const SPAWN_Z: f32 = -200.0;
    /// Alive entities past this z are culled without a death animation
    pub const CULL_Z: f32 = 200.0;

    /// Hostile closing speed (units per tick, along +z)
    pub const HOSTILE_SPEED: f32 = 0.5;
    /// Asteroid speed toward the player (units per tick)
    pub const ASTEROID_SPEED: f32 = 0.5;

    /// Ticks a dying entity fades before removal
    pub const DEATH_COUNTDOWN_TICKS: u32 = 60;

    /// Player starting health
    pub const PLAYER_HEALTH: f32 = 100.0;
    /// Damage dealt by an entity when no prototype overrides it
    pub const DEFAULT_DAMAGE: f32 = 10.0;

    /// Camera translation per tick at full input
    pub const CAMERA_MOVE_SPEED: f32 = 0.1;
    /// Camera velocity smoothing factor per tick (0 = frozen, 1 = instant)
    pub const CAMERA_SMOOTHING: f32 = 0.25;
    /// Radians of yaw/pitch per pixel of mouse travel
    pub const LOOK_SENSITIVITY: f32 = 0.01;
    /// Radians of roll per tick while Q/E is held
    pub const ROLL_SPEED: f32 = 0.1;
    /// Move speed multiplier while sprinting
    pub const SPRINT_MULTIPLIER: f32 = 2.0;
    /// Distance the third-person eye sits behind the camera target
    pub const THIRD_PERSON_DISTANCE: f32 = 10.0;

    /// Vertical field of view (degrees)
    pub const FOV_DEGREES: f32 = 45.0;
    pub const NEAR_PLANE: f32 = 0.1;
    pub const FAR_PLANE: f32 = 1000.0;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector from `from` toward `to`, or `fallback` when the points coincide
#[inline]
pub fn direction_or(from: Vec3, to: Vec3, fallback: Vec3) -> Vec3 {
    (to - from).try_normalize().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - (-PI)).abs() < 1e-4);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-0.5 - 2.0 * PI) - (-0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_direction_or_falls_back_on_zero_length() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(direction_or(p, p, Vec3::Z), Vec3::Z);

        let d = direction_or(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), Vec3::Z);
        assert!((d - Vec3::NEG_Z).length() < 1e-6);
    }
}
