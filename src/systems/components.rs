//! Components, resources and bundles shared across systems.

use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;

use crate::constants::{bullet, enemy, player};
use crate::geometry::Rect;
use crate::systems::animation::Animation;

/// A tag component for the entity controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component for enemies.
#[derive(Default, Component)]
pub struct Hostile;

/// A tag component for projectiles of either side.
#[derive(Default, Component)]
pub struct Bullet;

/// Faction marker: this projectile damages enemies.
#[derive(Default, Component)]
pub struct PlayerBullet;

/// Faction marker: this projectile damages the player.
#[derive(Default, Component)]
pub struct HostileBullet;

/// The entity is playing its death animation and ignores all stimuli.
#[derive(Default, Component)]
pub struct Dying;

/// The entity lives in world coordinates and moves when the camera scrolls.
#[derive(Default, Component)]
pub struct WorldAnchored;

/// The entity belongs to the active level and despawns when it is torn down.
#[derive(Default, Component)]
pub struct LevelScoped;

/// A tag component denoting the type of entity, used to pick animation sets.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Enemy,
    Bullet,
}

/// Top-left corner of the entity's hitbox, in world coordinates.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Hitbox size. Together with [`Position`] it defines the collision rect.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hitbox(pub Vec2);

impl Hitbox {
    pub fn rect(&self, position: &Position) -> Rect {
        Rect::new(position.0, self.0)
    }
}

/// Kinematic state. `speed` is the body's own horizontal pace; actual
/// movement per tick is decided by its controlling system.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub speed: f32,
    pub vel_y: f32,
    pub grounded: bool,
}

impl Velocity {
    pub fn with_speed(speed: f32) -> Self {
        Self {
            speed,
            vel_y: 0.0,
            grounded: false,
        }
    }
}

/// Horizontal orientation. Aim, vision and sprite mirroring all follow it.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn opposite(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// True when the sprite should be mirrored.
    pub fn flipped(&self) -> bool {
        *self == Facing::Left
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn alive(&self) -> bool {
        self.current > 0
    }
}

/// Shield charges absorb one hit each before health is touched.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShieldCharges(pub u32);

/// Ticks until the entity may fire again.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShootCooldown(pub u32);

/// Jump edge detection and mid-air jump tracking.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JumpState {
    /// Whether jump was held last tick. A jump needs a fresh press.
    pub held_last_tick: bool,
    /// Mid-air jumps spent since the entity last stood on ground.
    pub air_jumps_used: u32,
}

/// Patrol bookkeeping for enemies.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Patrol {
    /// Standing still, either from an idle roll or from spotting the player.
    pub idling: bool,
    /// Remaining idle ticks.
    pub idle_ticks: u32,
    /// Distance walked since the last turn. Resets to zero on every reversal.
    pub travelled: f32,
}

/// Flags checked by the shell every tick.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct GlobalState {
    pub exit: bool,
}

/// The per-tick scroll contract.
///
/// The player system writes `delta` (the shift to apply to the world this
/// tick, opposite in sign to the player's travel); the scroll system applies
/// it everywhere at once and accumulates `total`, the distance the world has
/// moved past the left window edge.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CameraScroll {
    pub delta: f32,
    pub total: f32,
}

impl CameraScroll {
    /// How far into the level the left window edge is.
    pub fn progress(&self) -> f32 {
        self.total
    }
}

/// Mutable state of the current run.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct RunState {
    /// Confirmed kills, which double as store currency.
    pub kills: u64,
    /// Current level, numbered from 1.
    pub level: u32,
    /// Ticks since the last wave spawn.
    pub spawn_timer: u32,
    /// Ticks accumulated toward the next regen heal.
    pub regen_timer: u32,
}

/// Upgrade levels bought in the store. Each field counts purchases.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upgrades {
    pub extra_jumps: u32,
    pub extra_bullets: u32,
    pub regen: u32,
    pub max_shields: u32,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    kind: EntityKind,
    marker: PlayerControlled,
    position: Position,
    hitbox: Hitbox,
    velocity: Velocity,
    facing: Facing,
    health: Health,
    shields: ShieldCharges,
    cooldown: ShootCooldown,
    jump: JumpState,
    animation: Animation,
    scoped: LevelScoped,
}

impl PlayerBundle {
    /// The player is deliberately not [`WorldAnchored`]: scrolling moves the
    /// world around it, so its screen position only changes when it walks.
    pub fn new(position: Vec2, shields: u32) -> Self {
        Self {
            kind: EntityKind::Player,
            marker: PlayerControlled,
            position: Position(position),
            hitbox: Hitbox(player::SIZE),
            velocity: Velocity::with_speed(player::SPEED),
            facing: Facing::default(),
            health: Health::new(player::MAX_HEALTH),
            shields: ShieldCharges(shields),
            cooldown: ShootCooldown::default(),
            jump: JumpState::default(),
            animation: Animation::default(),
            scoped: LevelScoped,
        }
    }
}

#[derive(Bundle)]
pub struct EnemyBundle {
    kind: EntityKind,
    marker: Hostile,
    position: Position,
    hitbox: Hitbox,
    velocity: Velocity,
    facing: Facing,
    health: Health,
    cooldown: ShootCooldown,
    patrol: Patrol,
    animation: Animation,
    anchored: WorldAnchored,
    scoped: LevelScoped,
}

impl EnemyBundle {
    pub fn new(position: Vec2, health: i32) -> Self {
        Self {
            kind: EntityKind::Enemy,
            marker: Hostile,
            position: Position(position),
            hitbox: Hitbox(enemy::SIZE),
            velocity: Velocity::with_speed(enemy::SPEED),
            // Wave spawns enter from the right, so start walking left.
            facing: Facing::Left,
            health: Health::new(health),
            cooldown: ShootCooldown::default(),
            patrol: Patrol::default(),
            animation: Animation::default(),
            anchored: WorldAnchored,
            scoped: LevelScoped,
        }
    }
}

#[derive(Bundle)]
pub struct BulletBundle {
    kind: EntityKind,
    marker: Bullet,
    position: Position,
    hitbox: Hitbox,
    facing: Facing,
    animation: Animation,
    anchored: WorldAnchored,
    scoped: LevelScoped,
}

impl BulletBundle {
    /// Spawns centered on the muzzle point, flying toward `facing`.
    pub fn new(muzzle: Vec2, facing: Facing) -> Self {
        Self {
            kind: EntityKind::Bullet,
            marker: Bullet,
            position: Position(Rect::from_center(muzzle, bullet::SIZE).pos),
            hitbox: Hitbox(bullet::SIZE),
            facing,
            animation: Animation::default(),
            anchored: WorldAnchored,
            scoped: LevelScoped,
        }
    }
}
