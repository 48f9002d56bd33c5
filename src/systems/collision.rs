//! Projectile hit detection.
//!
//! Detection only: this system reads positions and emits events, and the
//! combat system applies the consequences. The split keeps every damage
//! path in one place regardless of who detected the hit.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res},
};

use crate::events::GameEvent;
use crate::level::world::TileWorld;
use crate::systems::components::{
    Dying, Health, Hitbox, Hostile, HostileBullet, PlayerBullet, PlayerControlled, Position,
};

/// Emits at most one event per bullet: blocked by a solid tile, or striking
/// the first overlapping target of the opposing side. Tiles win ties, so a
/// bullet inside a wall never reaches anyone hugging that wall.
pub fn collision_system(
    world: Res<TileWorld>,
    player_bullets: Query<(Entity, &Position, &Hitbox), With<PlayerBullet>>,
    hostile_bullets: Query<(Entity, &Position, &Hitbox), With<HostileBullet>>,
    enemies: Query<(Entity, &Position, &Hitbox), (With<Hostile>, Without<Dying>)>,
    player: Query<(Entity, &Position, &Hitbox, &Health), With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    for (projectile, position, hitbox) in player_bullets.iter() {
        let body = hitbox.rect(position);
        if !world.collisions(&body).is_empty() {
            events.write(GameEvent::Blocked { projectile });
            continue;
        }
        for (target, enemy_position, enemy_hitbox) in enemies.iter() {
            if body.intersects(&enemy_hitbox.rect(enemy_position)) {
                events.write(GameEvent::Struck { projectile, target });
                break;
            }
        }
    }

    for (projectile, position, hitbox) in hostile_bullets.iter() {
        let body = hitbox.rect(position);
        if !world.collisions(&body).is_empty() {
            events.write(GameEvent::Blocked { projectile });
            continue;
        }
        if let Ok((target, player_position, player_hitbox, health)) = player.single() {
            if health.alive() && body.intersects(&player_hitbox.rect(player_position)) {
                events.write(GameEvent::Struck { projectile, target });
            }
        }
    }
}
