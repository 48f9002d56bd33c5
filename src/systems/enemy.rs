//! Enemy AI: vision, firing, patrol and hazard avoidance.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res},
};
use glam::Vec2;
use rand::Rng;
use tracing::warn;

use crate::constants::{TILE_SIZE, WINDOW_SIZE, bullet, enemy};
use crate::events::AudioEvent;
use crate::geometry::Rect;
use crate::level::world::TileWorld;
use crate::systems::animation::{AnimState, Animation, AnimationCatalog};
use crate::systems::components::{
    BulletBundle, Dying, EntityKind, Facing, Health, Hitbox, Hostile, HostileBullet, Patrol, PlayerControlled,
    Position, ShootCooldown, Velocity,
};
use crate::systems::physics;

/// Runs every living enemy for one tick.
///
/// Order per enemy: vision (which may freeze it and fire), then movement,
/// then the reversal checks. Any reversal zeroes both the patrol distance
/// and the tick's walked distance, so a turn always starts a fresh leg.
pub fn enemy_system(
    mut commands: Commands,
    world: Res<TileWorld>,
    catalog: Res<AnimationCatalog>,
    mut enemies: Query<
        (
            Entity,
            &mut Position,
            &Hitbox,
            &mut Velocity,
            &mut Facing,
            &mut Patrol,
            &mut ShootCooldown,
            &mut Animation,
        ),
        (With<Hostile>, Without<Dying>, Without<PlayerControlled>),
    >,
    player: Query<(&Position, &Hitbox, &Health), (With<PlayerControlled>, Without<Hostile>)>,
    mut audio: EventWriter<AudioEvent>,
) {
    let target = player.single().ok();

    for (entity, mut position, hitbox, mut velocity, mut facing, mut patrol, mut cooldown, mut animation) in
        enemies.iter_mut()
    {
        // Off the bottom of the world: scrolled over a pit edge or walked
        // off one despite the probe. Nothing brings it back.
        if position.0.y > (WINDOW_SIZE.y + 4 * TILE_SIZE) as f32 {
            warn!(?entity, "enemy fell out of the world, removing");
            commands.entity(entity).despawn();
            continue;
        }

        if cooldown.0 > 0 {
            cooldown.0 -= 1;
        }

        // Vision: a fixed box extending forward from the facing edge at
        // body-center height. Dead players are invisible.
        let body = hitbox.rect(&position);
        let vision_origin = match *facing {
            Facing::Right => Vec2::new(body.right(), body.center().y - enemy::VISION_SIZE.y / 2.0),
            Facing::Left => Vec2::new(
                body.left() - enemy::VISION_SIZE.x,
                body.center().y - enemy::VISION_SIZE.y / 2.0,
            ),
        };
        let vision = Rect::new(vision_origin, enemy::VISION_SIZE);

        if let Some((player_position, player_hitbox, player_health)) = target {
            if player_health.alive() && vision.intersects(&player_hitbox.rect(player_position)) {
                patrol.idling = true;
                patrol.idle_ticks = enemy::VISION_HOLD;
                if cooldown.0 == 0 {
                    cooldown.0 = enemy::SHOOT_COOLDOWN;
                    let muzzle_x = body.center().x + bullet::MUZZLE_FACTOR * body.size.x * facing.sign();
                    commands.spawn((
                        BulletBundle::new(Vec2::new(muzzle_x, body.center().y), *facing),
                        HostileBullet,
                    ));
                    audio.write(AudioEvent::Shot);
                }
            }
        }

        let dx = if patrol.idling { 0.0 } else { velocity.speed * facing.sign() };
        let outcome = physics::step(&world, &mut position, &hitbox, &mut velocity, dx);
        let mut walked = outcome.dx;

        if outcome.hit_wall {
            *facing = facing.opposite();
            patrol.travelled = 0.0;
            walked = 0.0;
        }

        // Ledge probe: a point just ahead of the leading edge, just below
        // the feet. Only meaningful when standing on ground and moving.
        if outcome.grounded && walked != 0.0 {
            let body = hitbox.rect(&position);
            let probe_x = if walked > 0.0 {
                body.right() + enemy::LEDGE_PROBE.x
            } else {
                body.left() - enemy::LEDGE_PROBE.x
            };
            if !world.solid_at(Vec2::new(probe_x, body.bottom() + enemy::LEDGE_PROBE.y)) {
                *facing = facing.opposite();
                patrol.travelled = 0.0;
                position.0.x -= walked;
                walked = 0.0;
            }
        }

        if patrol.idling {
            patrol.idle_ticks = patrol.idle_ticks.saturating_sub(1);
            if patrol.idle_ticks == 0 {
                patrol.idling = false;
            }
        } else {
            patrol.travelled += walked.abs();
            if patrol.travelled > TILE_SIZE as f32 {
                *facing = facing.opposite();
                patrol.travelled = 0.0;
                patrol.idling = true;
                patrol.idle_ticks = rand::rng().random_range(enemy::IDLE_TICKS_MIN..=enemy::IDLE_TICKS_MAX);
            }
        }

        let state = if !velocity.grounded {
            AnimState::Jump
        } else if dx != 0.0 {
            AnimState::Run
        } else {
            AnimState::Idle
        };
        animation.set_state(EntityKind::Enemy, state, &catalog);
    }
}
