//! Per-frame simulation tick
//!
//! One call advances the world by exactly one frame in a fixed order:
//! camera, spawn, move, collide, pick, lifecycle sweep, game-over check.
//! Entities are never removed before the sweep, so the collision and pick
//! passes always see the same collections.

use super::collision::{CollisionOutcome, sweep};
use super::entity::{EntityKind, LifecycleStep};
use super::input::TickInput;
use super::pick::pick_and_kill;
use super::state::{GameEvent, GamePhase, GameState};

/// What one tick produced
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    pub collisions: CollisionOutcome,
    /// The run ended on this tick
    pub game_over: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase == GamePhase::GameOver {
        return outcome;
    }
    state.time_ticks += 1;

    // Camera
    let displacement = state.camera.update(&input.camera_controls(), &state.settings);
    state.last_displacement = displacement;

    // Spawning. Launch rolls only consider hostiles that existed before this tick.
    let target = state.camera.position;
    let mut spawned = Vec::new();
    if let Some(e) = state.spawner.maybe_spawn_hostile(&state.catalog) {
        spawned.push(e);
    }
    if let Some(e) = state.spawner.maybe_spawn_asteroid(&state.catalog, target) {
        spawned.push(e);
    }
    let launchers: Vec<_> = state
        .hostiles
        .iter()
        .filter(|h| h.is_alive())
        .map(|h| h.world_position)
        .collect();
    for origin in launchers {
        if let Some(e) = state.spawner.maybe_launch_asteroid(&state.catalog, origin, target) {
            spawned.push(e);
        }
    }
    for e in spawned {
        outcome.events.push(GameEvent::Spawned { id: e.id, kind: e.kind });
        state.insert(e);
    }

    // Movement
    for e in state.entities_mut() {
        e.advance();
    }
    state.player.position += displacement;

    // Collision, hostiles then asteroids
    let mut collisions = sweep(&mut state.player, state.hostiles.iter_mut());
    collisions.merge(sweep(&mut state.player, state.asteroids.iter_mut()));
    for &(id, damage) in &collisions.hits {
        outcome.events.push(GameEvent::Collided { id, damage });
    }
    state.stats.collisions += collisions.hits.len() as u32;
    outcome.collisions = collisions;

    // Hitscan
    if input.fire {
        state.stats.shots_fired += 1;
        let view = state.view_matrix();
        let projection = state.projection_matrix();
        let viewport = state.viewport;
        let hit = pick_and_kill(
            input.cursor,
            state.hostiles.iter_mut().chain(state.asteroids.iter_mut()),
            view,
            projection,
            &viewport,
        );
        if let Some((id, kind)) = hit {
            match kind {
                EntityKind::Hostile => state.stats.hostiles_shot += 1,
                EntityKind::Asteroid => state.stats.asteroids_shot += 1,
            }
            log::debug!("shot {kind:?} {id:?}");
            outcome.events.push(GameEvent::Shot { id, kind });
        }
    }

    // Lifecycle sweep, then compaction
    let cull_z = state.settings.cull_z;
    let mut escaped = 0;
    for e in state.hostiles.iter_mut().chain(state.asteroids.iter_mut()) {
        match e.step_lifecycle(cull_z) {
            LifecycleStep::Culled => {
                log::trace!("culled {:?} at z {}", e.id, e.world_position.z);
                escaped += 1;
                outcome.events.push(GameEvent::Culled { id: e.id });
            }
            LifecycleStep::Expired => outcome.events.push(GameEvent::Expired { id: e.id }),
            LifecycleStep::Unchanged => {}
        }
    }
    state.stats.escaped += escaped;
    state.compact();

    // Termination
    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        outcome.game_over = true;
        outcome.events.push(GameEvent::GameOver {
            tick: state.time_ticks,
        });
        log::info!(
            "Game over at tick {} (health {}, {} kills)",
            state.time_ticks,
            state.player.health,
            state.stats.kills()
        );
    }

    outcome
}
