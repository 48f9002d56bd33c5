//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{UVec2, Vec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each tile, in pixels.
pub const TILE_SIZE: u32 = 40;
/// The size of a level grid, in tiles (columns x rows).
pub const GRID_SIZE: UVec2 = UVec2::new(150, 16);
/// The size of the visible window, in pixels.
pub const WINDOW_SIZE: UVec2 = UVec2::new(800, 640);
/// How close the player may get to a horizontal window edge before the world scrolls instead.
pub const SCROLL_THRESHOLD: f32 = 200.0;

/// The number of shipped levels.
pub const LEVEL_COUNT: u32 = 3;

/// An enum classifying the integer ids found in level grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    /// A solid tile that blocks movement.
    Obstacle,
    /// A non-solid tile drawn behind obstacles.
    Decoration,
    /// The player's starting position.
    PlayerSpawn,
    /// An enemy starting position.
    EnemySpawn,
    /// A recognized id with no simulation effect (water, items, exit marker).
    Inert,
    /// Anything else, including negative cells.
    Empty,
}

impl TileKind {
    /// Maps a raw grid cell to its kind. Unknown ids are treated as empty.
    pub fn from_id(id: i32) -> Self {
        match id {
            0..=8 => TileKind::Obstacle,
            9..=10 => TileKind::Inert,
            11..=14 => TileKind::Decoration,
            15 => TileKind::PlayerSpawn,
            16 => TileKind::EnemySpawn,
            17..=20 => TileKind::Inert,
            _ => TileKind::Empty,
        }
    }
}

/// Physics constants shared by every kinematic body.
pub mod physics {
    /// Downward acceleration applied each tick.
    pub const GRAVITY: f32 = 0.75;
    /// Fall speed is clamped to this before integration.
    pub const TERMINAL_FALL_SPEED: f32 = 10.0;
    /// Vertical velocity set by a jump.
    pub const JUMP_VELOCITY: f32 = -15.0;
}

pub mod player {
    use super::Vec2;

    pub const SIZE: Vec2 = Vec2::new(28.0, 52.0);
    /// Horizontal speed in pixels per tick.
    pub const SPEED: f32 = 5.0;
    /// Ticks between shots.
    pub const SHOOT_COOLDOWN: u32 = 20;
    pub const MAX_HEALTH: i32 = 5;
    /// Where the player lands when a grid carries no spawn tile.
    pub const FALLBACK_SPAWN: Vec2 = Vec2::new(80.0, 0.0);
    /// Vertical spacing between bullets of a multi-shot volley.
    pub const VOLLEY_SPACING: f32 = 6.0;
}

pub mod enemy {
    use super::Vec2;

    pub const SIZE: Vec2 = Vec2::new(28.0, 52.0);
    /// Patrol speed in pixels per tick.
    pub const SPEED: f32 = 2.0;
    /// Ticks between shots.
    pub const SHOOT_COOLDOWN: u32 = 240;
    /// Forward sensor rectangle, anchored to the facing edge.
    pub const VISION_SIZE: Vec2 = Vec2::new(150.0, 20.0);
    /// How long a vision contact keeps the enemy standing still.
    pub const VISION_HOLD: u32 = 20;
    /// Idle duration rolled after a patrol boundary, inclusive bounds.
    pub const IDLE_TICKS_MIN: u32 = 30;
    pub const IDLE_TICKS_MAX: u32 = 90;
    /// Ledge probe offsets: ahead of the leading edge, below the feet.
    pub const LEDGE_PROBE: Vec2 = Vec2::new(2.0, 2.0);
}

pub mod bullet {
    use super::Vec2;

    pub const SIZE: Vec2 = Vec2::new(10.0, 5.0);
    /// Horizontal speed in pixels per tick.
    pub const SPEED: f32 = 10.0;
    /// Muzzle offset from the shooter's center, as a fraction of its width.
    pub const MUZZLE_FACTOR: f32 = 0.8;
    /// Health removed per hit.
    pub const DAMAGE: i32 = 1;
}

pub mod animation {
    /// Ticks each animation frame is displayed.
    pub const FRAME_INTERVAL: u32 = 6;
}

/// Pacing of a run: waves, win condition, regen.
pub mod run {
    /// Ticks between wave enemy spawns.
    pub const SPAWN_INTERVAL: u32 = 300;
    /// The level is complete once progress reaches its pixel length minus this margin.
    pub const LEVEL_END_MARGIN: f32 = 120.0;
    /// How long the level-clear banner holds before advancing.
    pub const LEVEL_COMPLETE_HOLD: u32 = 90;
    /// Base regen period; divided by the purchased regen level.
    pub const REGEN_BASE_PERIOD: u32 = 600;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_tile_size() {
        assert_eq!(TILE_SIZE, 40);
    }

    #[test]
    fn test_window_is_whole_tiles() {
        assert_eq!(WINDOW_SIZE.x % TILE_SIZE, 0);
        assert_eq!(WINDOW_SIZE.y % TILE_SIZE, 0);
        // The grid is exactly one window tall.
        assert_eq!(GRID_SIZE.y * TILE_SIZE, WINDOW_SIZE.y);
    }

    #[test]
    fn test_level_pixel_length() {
        assert_eq!(GRID_SIZE.x * TILE_SIZE, 6000);
    }

    #[test]
    fn test_scroll_threshold_leaves_room() {
        // Both scroll zones must not overlap in the middle of the window.
        assert!(SCROLL_THRESHOLD * 2.0 < WINDOW_SIZE.x as f32);
    }

    #[test]
    fn test_tile_kind_buckets() {
        for id in 0..=8 {
            assert_eq!(TileKind::from_id(id), TileKind::Obstacle);
        }
        assert_eq!(TileKind::from_id(9), TileKind::Inert);
        assert_eq!(TileKind::from_id(10), TileKind::Inert);
        for id in 11..=14 {
            assert_eq!(TileKind::from_id(id), TileKind::Decoration);
        }
        assert_eq!(TileKind::from_id(15), TileKind::PlayerSpawn);
        assert_eq!(TileKind::from_id(16), TileKind::EnemySpawn);
        for id in 17..=20 {
            assert_eq!(TileKind::from_id(id), TileKind::Inert);
        }
        assert_eq!(TileKind::from_id(-1), TileKind::Empty);
        assert_eq!(TileKind::from_id(21), TileKind::Empty);
    }

    #[test]
    fn test_physics_values() {
        assert_eq!(physics::GRAVITY, 0.75);
        assert_eq!(physics::TERMINAL_FALL_SPEED, 10.0);
        assert_eq!(physics::JUMP_VELOCITY, -15.0);
    }

    #[test]
    fn test_bodies_fit_between_tiles() {
        // Both body types must fit through a one-tile-wide gap.
        assert!(player::SIZE.x < TILE_SIZE as f32);
        assert!(enemy::SIZE.x < TILE_SIZE as f32);
        // And under a two-tile ceiling.
        assert!(player::SIZE.y < (2 * TILE_SIZE) as f32);
        assert!(enemy::SIZE.y < (2 * TILE_SIZE) as f32);
    }

    #[test]
    fn test_no_tunneling_possible() {
        // Per-tick displacement never exceeds a tile, so single-pass clamping is sound.
        assert!(player::SPEED < TILE_SIZE as f32);
        assert!(enemy::SPEED < TILE_SIZE as f32);
        assert!(bullet::SPEED < TILE_SIZE as f32);
        assert!(physics::TERMINAL_FALL_SPEED < TILE_SIZE as f32);
        assert!(physics::JUMP_VELOCITY.abs() < TILE_SIZE as f32);
    }

    #[test]
    fn test_cooldowns() {
        // The player must fire considerably faster than enemies.
        assert!(player::SHOOT_COOLDOWN < enemy::SHOOT_COOLDOWN);
        assert_eq!(player::SHOOT_COOLDOWN, 20);
        assert_eq!(enemy::SHOOT_COOLDOWN, 240);
    }

    #[test]
    fn test_enemy_idle_bounds() {
        assert!(enemy::IDLE_TICKS_MIN < enemy::IDLE_TICKS_MAX);
        assert_eq!(enemy::IDLE_TICKS_MIN, 30);
        assert_eq!(enemy::IDLE_TICKS_MAX, 90);
    }

    #[test]
    fn test_muzzle_clears_shooter() {
        // A spawned bullet must not overlap its shooter, or it would strike it instantly.
        let muzzle_offset = bullet::MUZZLE_FACTOR * player::SIZE.x;
        assert!(muzzle_offset - bullet::SIZE.x / 2.0 > player::SIZE.x / 2.0);
    }

    #[test]
    fn test_run_values() {
        assert_eq!(run::SPAWN_INTERVAL, 300);
        assert_eq!(run::LEVEL_END_MARGIN, 120.0);
        assert_eq!(run::LEVEL_COMPLETE_HOLD, 90);
        assert_eq!(run::REGEN_BASE_PERIOD, 600);
        assert_eq!(LEVEL_COUNT, 3);
    }
}
