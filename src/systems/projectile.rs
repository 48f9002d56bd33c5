//! Projectile flight and culling.

use bevy_ecs::{
    entity::Entity,
    query::With,
    system::{Commands, Query},
};

use crate::constants::{WINDOW_SIZE, bullet};
use crate::systems::components::{Bullet, Facing, Hitbox, Position};

/// Flies every bullet straight ahead and removes the ones that leave the
/// window. Bullets ignore gravity; hits are resolved by the collision pass
/// after everything has moved this tick.
pub fn projectile_system(
    mut commands: Commands,
    mut bullets: Query<(Entity, &mut Position, &Hitbox, &Facing), With<Bullet>>,
) {
    for (entity, mut position, hitbox, facing) in bullets.iter_mut() {
        position.0.x += bullet::SPEED * facing.sign();

        let body = hitbox.rect(&position);
        if body.right() < 0.0 || body.left() > WINDOW_SIZE.x as f32 {
            commands.entity(entity).despawn();
        }
    }
}
