//! Axis-separated movement resolution against the tile world.

use crate::constants::physics::{GRAVITY, TERMINAL_FALL_SPEED};
use crate::level::world::TileWorld;
use crate::systems::components::{Hitbox, Position, Velocity};

/// What a [`step`] call did to the body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    /// Horizontal displacement actually applied, after wall clamping.
    pub dx: f32,
    /// The body ran into a wall while moving horizontally.
    pub hit_wall: bool,
    /// The body finished the tick standing on ground.
    pub grounded: bool,
}

/// Moves a body one tick: the horizontal axis fully resolves, then gravity
/// and the vertical axis. Resolving one axis at a time keeps a body sliding
/// along walls it is pushed against and landing cleanly on corners instead
/// of snagging on them.
///
/// Bodies never move more than a tile per tick, so clamping against the
/// overlapped tiles is sufficient; no sweep is needed.
pub fn step(
    world: &TileWorld,
    position: &mut Position,
    hitbox: &Hitbox,
    velocity: &mut Velocity,
    dx: f32,
) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();

    let start_x = position.0.x;
    if dx != 0.0 {
        position.0.x += dx;
        let body = hitbox.rect(position);
        for obstacle in world.collisions(&body) {
            if dx > 0.0 {
                position.0.x = position.0.x.min(obstacle.left() - hitbox.0.x);
            } else {
                position.0.x = position.0.x.max(obstacle.right());
            }
            outcome.hit_wall = true;
        }
    }
    outcome.dx = position.0.x - start_x;

    velocity.vel_y = (velocity.vel_y + GRAVITY).min(TERMINAL_FALL_SPEED);
    let rising = velocity.vel_y < 0.0;
    position.0.y += velocity.vel_y;
    let body = hitbox.rect(position);
    for obstacle in world.collisions(&body) {
        if rising {
            position.0.y = position.0.y.max(obstacle.bottom());
        } else {
            position.0.y = position.0.y.min(obstacle.top() - hitbox.0.y);
            outcome.grounded = true;
        }
        velocity.vel_y = 0.0;
    }

    velocity.grounded = outcome.grounded;
    outcome
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use speculoos::prelude::*;

    use super::step;
    use crate::constants::TILE_SIZE;
    use crate::constants::physics::{GRAVITY, JUMP_VELOCITY, TERMINAL_FALL_SPEED};
    use crate::level::parser::LevelParser;
    use crate::level::world::TileWorld;
    use crate::systems::components::{Hitbox, Position, Velocity};

    const TILE: f32 = TILE_SIZE as f32;

    fn world(text: &str) -> TileWorld {
        TileWorld::from_grid(&LevelParser::parse(text)).unwrap()
    }

    fn body(x: f32, y: f32) -> (Position, Hitbox, Velocity) {
        (Position(Vec2::new(x, y)), Hitbox(Vec2::new(20.0, 30.0)), Velocity::with_speed(5.0))
    }

    #[test]
    fn falls_and_lands_flush_on_the_floor() {
        let w = world("-1,-1\n-1,-1\n0,0\n");
        let (mut pos, hitbox, mut vel) = body(5.0, 0.0);

        let mut landed = false;
        for _ in 0..60 {
            let outcome = step(&w, &mut pos, &hitbox, &mut vel, 0.0);
            if outcome.grounded {
                landed = true;
                break;
            }
        }

        assert_that(&landed).is_true();
        assert_that(&pos.0.y).is_equal_to(2.0 * TILE - 30.0);
        assert_that(&vel.vel_y).is_equal_to(0.0);
        assert_that(&vel.grounded).is_true();
    }

    #[test]
    fn fall_speed_is_clamped() {
        let w = world("-1\n");
        let (mut pos, hitbox, mut vel) = body(0.0, 0.0);

        for _ in 0..100 {
            step(&w, &mut pos, &hitbox, &mut vel, 0.0);
        }
        assert_that(&vel.vel_y).is_equal_to(TERMINAL_FALL_SPEED);
    }

    #[test]
    fn walking_into_a_wall_clamps_flush() {
        // Wall in column 2, body on the floor of row 1.
        let w = world("-1,-1,0\n0,0,0\n");
        let (mut pos, hitbox, mut vel) = body(2.0 * TILE - 25.0, TILE - 30.0);

        let outcome = step(&w, &mut pos, &hitbox, &mut vel, 10.0);

        assert_that(&outcome.hit_wall).is_true();
        assert_that(&pos.0.x).is_equal_to(2.0 * TILE - 20.0);
        // The clamp shortens the applied displacement.
        assert_that(&outcome.dx).is_equal_to(5.0);
    }

    #[test]
    fn walking_left_into_a_wall_clamps_flush() {
        let w = world("0,-1,-1\n0,0,0\n");
        let (mut pos, hitbox, mut vel) = body(TILE + 3.0, TILE - 30.0);

        let outcome = step(&w, &mut pos, &hitbox, &mut vel, -10.0);

        assert_that(&outcome.hit_wall).is_true();
        assert_that(&pos.0.x).is_equal_to(TILE);
        assert_that(&outcome.dx).is_equal_to(-3.0);
    }

    #[test]
    fn rising_into_a_ceiling_stops_the_jump() {
        let w = world("0\n-1\n-1\n0\n");
        let (mut pos, hitbox, mut vel) = body(10.0, TILE + 10.0);
        vel.vel_y = JUMP_VELOCITY;

        let outcome = step(&w, &mut pos, &hitbox, &mut vel, 0.0);

        assert_that(&outcome.grounded).is_false();
        assert_that(&pos.0.y).is_equal_to(TILE);
        assert_that(&vel.vel_y).is_equal_to(0.0);
    }

    #[test]
    fn horizontal_resolves_before_vertical_at_corners() {
        // A step up: wall occupies (2,1), floor covers row 2. A body sliding
        // right along the floor is stopped by the wall, not lifted onto it.
        let w = world("-1,-1,-1\n-1,-1,0\n0,0,0\n");
        let (mut pos, hitbox, mut vel) = body(2.0 * TILE - 22.0, 2.0 * TILE - 30.0);
        vel.vel_y = 0.0;

        let outcome = step(&w, &mut pos, &hitbox, &mut vel, 5.0);

        assert_that(&outcome.hit_wall).is_true();
        assert_that(&pos.0.x).is_equal_to(2.0 * TILE - 20.0);
        assert_that(&pos.0.y).is_equal_to(2.0 * TILE - 30.0);
        assert_that(&outcome.grounded).is_true();
    }

    #[test]
    fn gravity_accumulates_until_ground() {
        let w = world("-1\n");
        let (mut pos, hitbox, mut vel) = body(0.0, 0.0);

        step(&w, &mut pos, &hitbox, &mut vel, 0.0);
        assert_that(&vel.vel_y).is_equal_to(GRAVITY);
        step(&w, &mut pos, &hitbox, &mut vel, 0.0);
        assert_that(&vel.vel_y).is_equal_to(GRAVITY * 2.0);
        assert_that(&pos.0.y).is_equal_to(GRAVITY + GRAVITY * 2.0);
    }
}
