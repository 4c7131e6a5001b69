//! Spawned actors and the player ship
//!
//! Hostile craft and asteroids share one record. Only spawning cares about
//! the kind; movement, collision, picking and lifecycle read the shared
//! fields.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::catalog::ModelName;
use crate::consts::*;

/// Stable identifier, allocated by the spawner in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Hostile,
    Asteroid,
}

/// Lifecycle of a spawned entity
///
/// Transitions only move forward: `Alive -> Dying -> Removed` or
/// `Alive -> Removed` when culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    /// Fading out; `countdown` ticks remain before removal
    Dying { countdown: u32 },
    Removed,
}

/// What a lifecycle step did to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Unchanged,
    /// Left the play volume while alive
    Culled,
    /// Finished its death countdown
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Prototype the renderer draws this entity with
    pub model: ModelName,
    pub world_position: Vec3,
    /// Units per tick, constant for the entity's life
    pub velocity: Vec3,
    pub orientation: Quat,
    /// Rotation applied to `orientation` each tick
    pub spin: Quat,
    /// Local-space box, shared with the prototype
    pub bounds: Aabb,
    /// Health removed from the player on collision
    pub damage: f32,
    pub lifecycle: Lifecycle,
}

impl Entity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        model: ModelName,
        bounds: Aabb,
        world_position: Vec3,
        velocity: Vec3,
    ) -> Self {
        Self {
            id,
            kind,
            model,
            world_position,
            velocity,
            orientation: Quat::IDENTITY,
            spin: Quat::IDENTITY,
            bounds,
            damage: DEFAULT_DAMAGE,
            lifecycle: Lifecycle::Alive,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.lifecycle == Lifecycle::Removed
    }

    /// Ticks left in the death animation, if dying
    pub fn death_countdown(&self) -> Option<u32> {
        match self.lifecycle {
            Lifecycle::Dying { countdown } => Some(countdown),
            _ => None,
        }
    }

    /// Bounding box in world space (translation only)
    #[inline]
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.translated(self.world_position)
    }

    /// Model-to-world transform used for drawing and picking
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.world_position)
    }

    /// Start the death animation. Returns `true` only if the entity was alive;
    /// marking a dying or removed entity again does nothing.
    pub fn kill(&mut self) -> bool {
        if self.is_alive() {
            self.lifecycle = Lifecycle::Dying {
                countdown: DEATH_COUNTDOWN_TICKS,
            };
            true
        } else {
            false
        }
    }

    /// Advance position and tumble by one tick. Dying entities keep drifting.
    pub fn advance(&mut self) {
        if self.is_removed() {
            return;
        }
        self.world_position += self.velocity;
        if self.spin != Quat::IDENTITY {
            self.orientation = (self.spin * self.orientation).normalize();
        }
    }

    /// Per-tick lifecycle step: count down dying entities and cull alive ones
    /// past `cull_z`. Dying entities past the plane still finish their countdown.
    pub fn step_lifecycle(&mut self, cull_z: f32) -> LifecycleStep {
        match self.lifecycle {
            Lifecycle::Alive if self.world_position.z > cull_z => {
                self.lifecycle = Lifecycle::Removed;
                LifecycleStep::Culled
            }
            Lifecycle::Alive | Lifecycle::Removed => LifecycleStep::Unchanged,
            Lifecycle::Dying { countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown == 0 {
                    self.lifecycle = Lifecycle::Removed;
                    LifecycleStep::Expired
                } else {
                    self.lifecycle = Lifecycle::Dying { countdown };
                    LifecycleStep::Unchanged
                }
            }
        }
    }

    /// Render opacity: solid while alive, fading over the death countdown
    pub fn opacity(&self) -> f32 {
        match self.lifecycle {
            Lifecycle::Alive => 1.0,
            Lifecycle::Dying { countdown } => countdown as f32 / DEATH_COUNTDOWN_TICKS as f32,
            Lifecycle::Removed => 0.0,
        }
    }
}

/// The player's ship. Alive while `health > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerShip {
    pub position: Vec3,
    pub bounds: Aabb,
    pub health: f32,
}

impl PlayerShip {
    pub fn new(position: Vec3, bounds: Aabb, health: f32) -> Self {
        Self {
            position,
            bounds,
            health,
        }
    }

    #[inline]
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.translated(self.position)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }
}
