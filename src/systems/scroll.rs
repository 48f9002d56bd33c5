//! Applies the per-tick scroll to everything at once.

use bevy_ecs::{
    query::With,
    system::{Query, ResMut},
};

use crate::level::world::TileWorld;
use crate::systems::components::{CameraScroll, Position, WorldAnchored};

/// Shifts the tile world and every world-anchored entity by the delta the
/// player system decided, then folds it into the running total.
///
/// The whole shift happens inside this one system, so no other system can
/// ever observe a half-scrolled world where tiles and entities disagree.
pub fn scroll_system(
    mut scroll: ResMut<CameraScroll>,
    mut world: ResMut<TileWorld>,
    mut anchored: Query<&mut Position, With<WorldAnchored>>,
) {
    if scroll.delta == 0.0 {
        return;
    }

    world.shift(scroll.delta);
    for mut position in anchored.iter_mut() {
        position.0.x += scroll.delta;
    }

    // The delta is negative when the window moves deeper into the level.
    scroll.total -= scroll.delta;
    scroll.delta = 0.0;
}
