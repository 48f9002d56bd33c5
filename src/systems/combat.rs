//! Applies combat outcomes: spends bullets, deals damage, starts deaths.

use bevy_ecs::{
    event::EventReader,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use tracing::info;

use crate::constants::bullet;
use crate::events::GameEvent;
use crate::systems::animation::{AnimState, Animation, AnimationCatalog};
use crate::systems::components::{
    Dying, EntityKind, Health, Hostile, PlayerControlled, RunState, ShieldCharges, Velocity,
};

/// Responds to the tick's hit events.
///
/// A bullet is spent on whatever it touched, even a target that stopped
/// being damageable earlier in the same batch. Damage lands only on living
/// targets, so two bullets arriving on the same tick cannot kill twice.
#[allow(clippy::type_complexity)]
pub fn combat_system(
    mut commands: Commands,
    catalog: Res<AnimationCatalog>,
    mut state: ResMut<RunState>,
    mut events: EventReader<GameEvent>,
    mut enemies: Query<(&mut Health, &mut Velocity, &mut Animation), (With<Hostile>, Without<PlayerControlled>)>,
    mut player: Query<
        (&mut Health, &mut ShieldCharges, &mut Velocity, &mut Animation),
        (With<PlayerControlled>, Without<Hostile>),
    >,
) {
    for event in events.read() {
        match event {
            GameEvent::Blocked { projectile } => {
                commands.entity(*projectile).despawn();
            }
            GameEvent::Struck { projectile, target } => {
                commands.entity(*projectile).despawn();

                if let Ok((mut health, mut velocity, mut animation)) = enemies.get_mut(*target) {
                    if !health.alive() {
                        continue;
                    }
                    health.current -= bullet::DAMAGE;
                    if !health.alive() {
                        state.kills += 1;
                        velocity.speed = 0.0;
                        animation.set_state(EntityKind::Enemy, AnimState::Death, &catalog);
                        commands.entity(*target).insert(Dying);
                        info!(kills = state.kills, "enemy down");
                    }
                } else if let Ok((mut health, mut shields, mut velocity, mut animation)) = player.get_mut(*target) {
                    if !health.alive() {
                        continue;
                    }
                    if shields.0 > 0 {
                        shields.0 -= 1;
                        continue;
                    }
                    health.current -= bullet::DAMAGE;
                    if !health.alive() {
                        velocity.speed = 0.0;
                        animation.set_state(EntityKind::Player, AnimState::Death, &catalog);
                        info!("player down");
                    }
                }
            }
            GameEvent::Command(_) => {}
        }
    }
}
