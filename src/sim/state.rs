//! Simulation context
//!
//! `GameState` owns everything a run mutates: the entity collections, the
//! player ship, the camera, the input latch and the spawner. The host talks
//! to it through `ingest` (between ticks) and `step` (once per frame).

use glam::{Mat4, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::camera::{Camera, CameraMode, projection_matrix};
use super::entity::{Entity, EntityId, EntityKind, PlayerShip};
use super::input::{InputEvent, InputState};
use super::pick::Viewport;
use super::spawner::Spawner;
use super::tick::{TickOutcome, tick};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player health ran out; ticks are no-ops from here on
    GameOver,
}

/// Something that happened during a tick, for HUD, audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind },
    /// Killed by the player's hitscan
    Shot { id: EntityId, kind: EntityKind },
    /// Struck the player ship
    Collided { id: EntityId, damage: f32 },
    /// Flew past the player untouched
    Culled { id: EntityId },
    /// Death animation finished
    Expired { id: EntityId },
    GameOver { tick: u64 },
}

/// Running tallies for the HUD
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hostiles_shot: u32,
    pub asteroids_shot: u32,
    pub shots_fired: u32,
    pub collisions: u32,
    pub escaped: u32,
}

impl Stats {
    pub fn kills(&self) -> u32 {
        self.hostiles_shot + self.asteroids_shot
    }

    /// Fraction of shots that killed something
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.kills() as f32 / self.shots_fired as f32
        }
    }
}

pub struct GameState {
    pub seed: u64,
    pub settings: Settings,
    /// Read-only after construction
    pub(crate) catalog: Catalog,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub camera: Camera,
    pub player: PlayerShip,
    /// Alive and dying hostiles, in spawn order
    pub hostiles: Vec<Entity>,
    /// Alive and dying asteroids, in spawn order
    pub asteroids: Vec<Entity>,
    pub spawner: Spawner,
    pub input: InputState,
    pub viewport: Viewport,
    pub stats: Stats,
    /// Camera translation applied during the last tick
    pub last_displacement: Vec3,
}

impl GameState {
    /// Start a run. Fails on settings the simulation cannot run with, or if
    /// the catalog cannot populate both spawn pools.
    pub fn new(settings: Settings, catalog: Catalog) -> Result<Self> {
        settings.validate()?;
        catalog.validate()?;

        let seed = settings.seed.unwrap_or_else(|| rand::rng().next_u64());
        let camera = Camera {
            follow_distance: settings.third_person_distance,
            ..Camera::new(Vec3::ZERO, CameraMode::ThirdPerson)
        };
        let player = PlayerShip::new(
            camera.position,
            Aabb::from_half_extents(settings.player_half_extents),
            settings.player_health,
        );
        let viewport = Viewport::new(settings.viewport_width, settings.viewport_height);

        log::info!(
            "New run: seed {seed}, {} prototypes, health {}",
            catalog.len(),
            player.health
        );

        Ok(Self {
            seed,
            spawner: Spawner::new(seed, &settings),
            settings,
            catalog,
            phase: GamePhase::Playing,
            time_ticks: 0,
            camera,
            player,
            hostiles: Vec::new(),
            asteroids: Vec::new(),
            input: InputState::new(),
            viewport,
            stats: Stats::default(),
            last_displacement: Vec3::ZERO,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Host window callback boundary
    pub fn ingest(&mut self, event: InputEvent) {
        self.input.ingest(event);
    }

    /// Run one tick with whatever input was latched since the last one
    pub fn step(&mut self) -> TickOutcome {
        let input = self.input.take();
        tick(self, &input)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// The host asked to quit (Escape)
    pub fn exit_requested(&self) -> bool {
        self.input.exit_requested()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width.max(1.0), height.max(1.0));
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        projection_matrix(
            self.settings.fov_degrees,
            self.viewport.aspect(),
            self.settings.near_plane,
            self.settings.far_plane,
        )
    }

    /// Every live entity in pick priority order: hostiles, then asteroids
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.hostiles.iter().chain(self.asteroids.iter())
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.hostiles.iter_mut().chain(self.asteroids.iter_mut())
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities().find(|e| e.id == id)
    }

    /// Add an entity to the collection matching its kind
    pub fn insert(&mut self, entity: Entity) {
        match entity.kind {
            EntityKind::Hostile => self.hostiles.push(entity),
            EntityKind::Asteroid => self.asteroids.push(entity),
        }
    }

    /// Drop removed entities from both collections
    pub fn compact(&mut self) {
        self.hostiles.retain(|e| !e.is_removed());
        self.asteroids.retain(|e| !e.is_removed());
    }
}
