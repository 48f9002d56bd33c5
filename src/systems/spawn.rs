//! Timed wave spawning.

use bevy_ecs::system::{Commands, ResMut};
use glam::Vec2;
use tracing::debug;

use crate::constants::{TILE_SIZE, WINDOW_SIZE, run};
use crate::systems::components::{EnemyBundle, RunState};

/// Drips reinforcements in from just past the right window edge on a fixed
/// timer. Health scales with the level number, so later waves soak more
/// hits. The newcomer falls onto whatever terrain is below its entry point.
pub fn spawn_system(mut commands: Commands, mut state: ResMut<RunState>) {
    state.spawn_timer += 1;
    if state.spawn_timer < run::SPAWN_INTERVAL {
        return;
    }
    state.spawn_timer = 0;

    let entry = Vec2::new((WINDOW_SIZE.x + TILE_SIZE) as f32, 0.0);
    commands.spawn(EnemyBundle::new(entry, state.level as i32));
    debug!(level = state.level, "wave enemy spawned");
}
