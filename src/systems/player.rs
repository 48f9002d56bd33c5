//! Player control: movement, jumping, firing and the scroll decision.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::debug;

use crate::constants::physics::JUMP_VELOCITY;
use crate::constants::{SCROLL_THRESHOLD, WINDOW_SIZE, bullet, player, run};
use crate::error::GameError;
use crate::events::AudioEvent;
use crate::level::world::TileWorld;
use crate::systems::animation::{AnimState, Animation, AnimationCatalog};
use crate::systems::components::{
    BulletBundle, CameraScroll, EntityKind, Facing, Health, Hitbox, JumpState, PlayerBullet, PlayerControlled,
    Position, RunState, ShootCooldown, Upgrades, Velocity,
};
use crate::systems::input::{Buttons, InputState};
use crate::systems::physics;

/// Runs the player for one tick.
///
/// Everything that depends on where the player ends up this tick happens
/// here, in order: steering, the jump edge, physics, the scroll decision,
/// firing, and finally the pose. The scroll decision in particular must see
/// the post-collision displacement, which is why this is one system.
#[allow(clippy::too_many_arguments)]
pub fn player_system(
    mut commands: Commands,
    world: Res<TileWorld>,
    input: Res<InputState>,
    upgrades: Res<Upgrades>,
    catalog: Res<AnimationCatalog>,
    mut scroll: ResMut<CameraScroll>,
    mut query: Query<
        (
            &mut Position,
            &Hitbox,
            &mut Velocity,
            &mut Facing,
            &mut JumpState,
            &mut ShootCooldown,
            &Health,
            &mut Animation,
        ),
        With<PlayerControlled>,
    >,
    mut audio: EventWriter<AudioEvent>,
    mut errors: EventWriter<GameError>,
) {
    let Ok((mut position, hitbox, mut velocity, mut facing, mut jump, mut cooldown, health, mut animation)) =
        query.single_mut()
    else {
        scroll.delta = 0.0;
        errors.write(GameError::InvalidState("expected exactly one player".into()));
        return;
    };

    // A dead player keeps falling but takes no input.
    if !health.alive() {
        scroll.delta = 0.0;
        physics::step(&world, &mut position, &hitbox, &mut velocity, 0.0);
        return;
    }

    let mut dx = 0.0;
    if input.held.contains(Buttons::LEFT) {
        dx -= velocity.speed;
        *facing = Facing::Left;
    }
    if input.held.contains(Buttons::RIGHT) {
        dx += velocity.speed;
        *facing = Facing::Right;
    }

    // The player never walks off the window; past the scroll bounds the
    // world stops moving and the window edge becomes a wall.
    let width = WINDOW_SIZE.x as f32;
    let body = hitbox.rect(&position);
    if body.left() + dx < 0.0 || body.right() + dx > width {
        dx = 0.0;
    }

    let jump_held = input.held.contains(Buttons::JUMP);
    if jump_held && !jump.held_last_tick {
        if velocity.grounded {
            velocity.vel_y = JUMP_VELOCITY;
            audio.write(AudioEvent::Jump);
        } else if jump.air_jumps_used < upgrades.extra_jumps {
            jump.air_jumps_used += 1;
            velocity.vel_y = JUMP_VELOCITY;
            audio.write(AudioEvent::Jump);
        }
    }
    jump.held_last_tick = jump_held;

    let outcome = physics::step(&world, &mut position, &hitbox, &mut velocity, dx);
    if outcome.grounded {
        jump.air_jumps_used = 0;
    }

    // Scroll decision: inside either edge zone, the player's horizontal
    // displacement is taken back and handed to the scroll system instead,
    // as long as the level has room left in that direction.
    let body = hitbox.rect(&position);
    let can_scroll_right = scroll.total < world.length() - width;
    let can_scroll_left = scroll.total > outcome.dx.abs();
    if outcome.dx != 0.0
        && ((body.right() > width - SCROLL_THRESHOLD && can_scroll_right)
            || (body.left() < SCROLL_THRESHOLD && can_scroll_left))
    {
        position.0.x -= outcome.dx;
        scroll.delta = -outcome.dx;
    } else {
        scroll.delta = 0.0;
    }

    if cooldown.0 > 0 {
        cooldown.0 -= 1;
    }
    if input.held.contains(Buttons::SHOOT) && cooldown.0 == 0 {
        cooldown.0 = player::SHOOT_COOLDOWN;
        let body = hitbox.rect(&position);
        let muzzle_x = body.center().x + bullet::MUZZLE_FACTOR * body.size.x * facing.sign();
        let volley = 1 + upgrades.extra_bullets;
        let spread = (volley - 1) as f32 * player::VOLLEY_SPACING;
        for index in 0..volley {
            let muzzle_y = body.center().y - spread / 2.0 + index as f32 * player::VOLLEY_SPACING;
            commands.spawn((BulletBundle::new(Vec2::new(muzzle_x, muzzle_y), *facing), PlayerBullet));
        }
        audio.write(AudioEvent::Shot);
    }

    let state = if !velocity.grounded {
        AnimState::Jump
    } else if dx != 0.0 {
        AnimState::Run
    } else {
        AnimState::Idle
    };
    animation.set_state(EntityKind::Player, state, &catalog);
}

/// Heals the player over time once regen has been bought.
pub fn regen_system(
    upgrades: Res<Upgrades>,
    mut state: ResMut<RunState>,
    mut query: Query<&mut Health, With<PlayerControlled>>,
) {
    if upgrades.regen == 0 {
        return;
    }
    let Ok(mut health) = query.single_mut() else {
        return;
    };
    if !health.alive() || health.current >= health.max {
        state.regen_timer = 0;
        return;
    }

    state.regen_timer += 1;
    let period = (run::REGEN_BASE_PERIOD / upgrades.regen).max(1);
    if state.regen_timer >= period {
        state.regen_timer = 0;
        health.current += 1;
        debug!(health = health.current, "regenerated");
    }
}
