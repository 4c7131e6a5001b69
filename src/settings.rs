//! Game settings and tuning
//!
//! Every rate here is per tick at the fixed 60 Hz tick rate. A host running
//! at a different refresh rate must rescale probabilities and speeds itself.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed; `None` draws one from the thread RNG at startup
    pub seed: Option<u64>,

    // === Spawning ===
    pub hostile_spawn_chance: f64,
    pub asteroid_spawn_chance: f64,
    pub asteroid_launch_chance: f64,
    pub spawn_half_extent: f32,
    pub spawn_z: f32,
    pub cull_z: f32,
    pub hostile_speed: f32,
    pub asteroid_speed: f32,
    /// Max tumble per tick for asteroids (radians)
    pub asteroid_max_spin: f32,

    // === Player ===
    pub player_health: f32,
    pub player_half_extents: Vec3,

    // === Camera ===
    pub camera_move_speed: f32,
    pub camera_smoothing: f32,
    pub look_sensitivity: f32,
    pub roll_speed: f32,
    pub sprint_multiplier: f32,
    pub third_person_distance: f32,

    // === Projection ===
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            hostile_spawn_chance: HOSTILE_SPAWN_CHANCE,
            asteroid_spawn_chance: ASTEROID_SPAWN_CHANCE,
            asteroid_launch_chance: ASTEROID_LAUNCH_CHANCE,
            spawn_half_extent: SPAWN_HALF_EXTENT,
            spawn_z: SPAWN_Z,
            cull_z: CULL_Z,
            hostile_speed: HOSTILE_SPEED,
            asteroid_speed: ASTEROID_SPEED,
            asteroid_max_spin: 0.02,

            player_health: PLAYER_HEALTH,
            player_half_extents: Vec3::new(1.5, 0.5, 1.5),

            camera_move_speed: CAMERA_MOVE_SPEED,
            camera_smoothing: CAMERA_SMOOTHING,
            look_sensitivity: LOOK_SENSITIVITY,
            roll_speed: ROLL_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            third_person_distance: THIRD_PERSON_DISTANCE,

            fov_degrees: FOV_DEGREES,
            near_plane: NEAR_PLANE,
            far_plane: FAR_PLANE,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings = serde_json::from_str::<Settings>(json)?.sanitized();
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values that would break the simulation into range
    fn sanitized(mut self) -> Self {
        self.hostile_spawn_chance = self.hostile_spawn_chance.clamp(0.0, 1.0);
        self.asteroid_spawn_chance = self.asteroid_spawn_chance.clamp(0.0, 1.0);
        self.asteroid_launch_chance = self.asteroid_launch_chance.clamp(0.0, 1.0);
        self.camera_smoothing = self.camera_smoothing.clamp(0.0, 1.0);
        self.spawn_half_extent = self.spawn_half_extent.abs();
        self.player_half_extents = self.player_half_extents.abs();
        self.viewport_width = self.viewport_width.max(1.0);
        self.viewport_height = self.viewport_height.max(1.0);
        self
    }

    /// Reject values the spawner, camera or projection cannot run with
    pub fn validate(&self) -> Result<()> {
        let chances = [
            self.hostile_spawn_chance,
            self.asteroid_spawn_chance,
            self.asteroid_launch_chance,
        ];
        if !chances.iter().all(|p| (0.0..=1.0).contains(p)) {
            return Err(SimError::InvalidSettings("spawn chances must lie in [0, 1]"));
        }
        if !non_negative(self.spawn_half_extent) {
            return Err(SimError::InvalidSettings("spawn_half_extent must be finite and >= 0"));
        }
        if !non_negative(self.asteroid_max_spin) {
            return Err(SimError::InvalidSettings("asteroid_max_spin must be finite and >= 0"));
        }
        let finite = [
            self.spawn_z,
            self.cull_z,
            self.hostile_speed,
            self.asteroid_speed,
            self.player_health,
            self.camera_move_speed,
            self.look_sensitivity,
            self.roll_speed,
            self.sprint_multiplier,
            self.third_person_distance,
        ];
        if !finite.iter().all(|v| v.is_finite()) {
            return Err(SimError::InvalidSettings("speeds, planes and health must be finite"));
        }
        if !self.player_half_extents.is_finite() || self.player_half_extents.min_element() < 0.0 {
            return Err(SimError::InvalidSettings("player_half_extents must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.camera_smoothing) {
            return Err(SimError::InvalidSettings("camera_smoothing must lie in [0, 1]"));
        }
        if !positive(self.viewport_width) || !positive(self.viewport_height) {
            return Err(SimError::InvalidSettings("viewport must have a positive size"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(SimError::InvalidSettings("fov_degrees must lie in (0, 180)"));
        }
        if !positive(self.near_plane)
            || !self.far_plane.is_finite()
            || self.far_plane <= self.near_plane
        {
            return Err(SimError::InvalidSettings("need 0 < near_plane < far_plane"));
        }
        Ok(())
    }
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.hostile_spawn_chance, 1.0 / 300.0);
        assert_eq!(s.asteroid_launch_chance, 1.0 / 1000.0);
        assert_eq!(s.spawn_z, -200.0);
        assert_eq!(s.cull_z, 200.0);
        assert_eq!(s.player_health, 100.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{ "seed": 7, "player_health": 50.0 }"#).unwrap();
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.player_health, 50.0);
        assert_eq!(s.hostile_speed, HOSTILE_SPEED);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let s = Settings::from_json(
            r#"{ "hostile_spawn_chance": 3.0, "camera_smoothing": -1.0, "viewport_height": 0.0 }"#,
        )
        .unwrap();
        assert_eq!(s.hostile_spawn_chance, 1.0);
        assert_eq!(s.camera_smoothing, 0.0);
        assert_eq!(s.viewport_height, 1.0);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_overflowing_extents_are_rejected() {
        let huge_extent = Settings::from_json(r#"{ "spawn_half_extent": 1e39 }"#);
        assert!(matches!(huge_extent, Err(SimError::InvalidSettings(_))));

        let huge_spin = Settings::from_json(r#"{ "asteroid_max_spin": 1e39 }"#);
        assert!(matches!(huge_spin, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_struct_values() {
        let cases = [
            Settings {
                hostile_spawn_chance: 1.5,
                ..Settings::default()
            },
            Settings {
                asteroid_launch_chance: f64::NAN,
                ..Settings::default()
            },
            Settings {
                spawn_half_extent: -5.0,
                ..Settings::default()
            },
            Settings {
                asteroid_max_spin: f32::INFINITY,
                ..Settings::default()
            },
            Settings {
                viewport_height: 0.0,
                ..Settings::default()
            },
            Settings {
                far_plane: 0.05,
                ..Settings::default()
            },
        ];
        for settings in cases {
            assert!(matches!(settings.validate(), Err(SimError::InvalidSettings(_))));
        }
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SimError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_or_default("/definitely/not/here/settings.json");
        assert_eq!(s.player_health, PLAYER_HEALTH);
    }

    #[test]
    fn test_json_roundtrip_keeps_tuning() {
        let mut s = Settings::default();
        s.asteroid_speed = 0.75;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back.asteroid_speed, 0.75);
    }
}
