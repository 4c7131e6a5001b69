//! Space Objects headless runner
//!
//! Drives the simulation without a window: a scripted pilot strafes and
//! fires at the viewport centre until the ship is destroyed or the tick cap
//! is reached. Usage: `space-objects [settings.json]`

use space_objects::sim::{GameEvent, GameState, InputEvent, Key, MouseButton};
use space_objects::{Catalog, Settings};

/// Ten simulated minutes at 60 Hz
const MAX_TICKS: u64 = 10 * 60 * 60;
/// Ticks between scripted shots
const FIRE_INTERVAL: u64 = 20;
/// Ticks between strafe direction changes
const STRAFE_INTERVAL: u64 = 240;

fn main() {
    env_logger::init();
    log::info!("Space Objects (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut state = match GameState::new(settings, Catalog::builtin()) {
        Ok(state) => state,
        Err(e) => {
            log::error!("cannot start run: {e}");
            std::process::exit(1);
        }
    };

    let centre = state.viewport.center();
    state.ingest(InputEvent::CursorMoved {
        x: centre.x,
        y: state.viewport.height - centre.y,
    });

    let mut spawned = 0u32;
    while !state.is_over() && !state.exit_requested() && state.time_ticks < MAX_TICKS {
        script_pilot(&mut state);
        let outcome = state.step();
        spawned += outcome
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count() as u32;
    }

    let stats = &state.stats;
    log::info!(
        "Run finished after {} ticks ({:.1}s): health {:.0}, spawned {}",
        state.time_ticks,
        state.time_ticks as f32 / space_objects::consts::TICK_RATE_HZ as f32,
        state.player.health.max(0.0),
        spawned
    );
    log::info!(
        "Shot {} hostiles / {} asteroids, accuracy {:.0}%, {} collisions, {} escaped",
        stats.hostiles_shot,
        stats.asteroids_shot,
        stats.accuracy() * 100.0,
        stats.collisions,
        stats.escaped
    );
}

/// Feed the input events a human would produce this frame
fn script_pilot(state: &mut GameState) {
    let t = state.time_ticks;

    if t % STRAFE_INTERVAL == 0 {
        let going_left = (t / STRAFE_INTERVAL) % 2 == 0;
        state.ingest(InputEvent::Key {
            key: Key::Left,
            pressed: going_left,
        });
        state.ingest(InputEvent::Key {
            key: Key::Right,
            pressed: !going_left,
        });
    }

    if t % FIRE_INTERVAL == 0 {
        state.ingest(InputEvent::MouseButton {
            button: MouseButton::Primary,
            pressed: true,
        });
        state.ingest(InputEvent::MouseButton {
            button: MouseButton::Primary,
            pressed: false,
        });
    }
}
