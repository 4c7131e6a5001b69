//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One tick per rendered frame, fixed 60 Hz assumption
//! - Seeded RNG only, so a seed reproduces a run
//! - Stable iteration order (spawn order, hostiles before asteroids)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod input;
pub mod pick;
pub mod spawner;
pub mod state;
pub mod tick;

pub use bounds::{Aabb, overlaps};
pub use camera::{Camera, CameraControls, CameraMode, projection_matrix};
pub use collision::{CollisionOutcome, sweep};
pub use entity::{Entity, EntityId, EntityKind, Lifecycle, LifecycleStep, PlayerShip};
pub use input::{InputEvent, InputState, Key, MouseButton, TickInput};
pub use pick::{Viewport, pick, pick_and_kill, project};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, Stats};
pub use tick::{TickOutcome, tick};
