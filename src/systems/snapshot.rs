//! A read-only description of a finished tick.
//!
//! Shells pull one of these after each tick and draw it however they like;
//! nothing in here references artwork, only ids, poses and rectangles.

use bevy_ecs::query::With;
use bevy_ecs::world::World;
use glam::Vec2;
use strum::IntoEnumIterator;
use thousands::Separable;

use crate::constants::WINDOW_SIZE;
use crate::events::UpgradeKind;
use crate::geometry::Rect;
use crate::level::world::TileWorld;
use crate::systems::animation::{AnimState, Animation};
use crate::systems::components::{
    CameraScroll, EntityKind, Facing, Health, Hitbox, PlayerControlled, Position, RunState, ShieldCharges, Upgrades,
};
use crate::systems::state::Mode;

/// A tile to draw: which artwork id, and where on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSprite {
    pub id: i32,
    pub rect: Rect,
}

/// An entity to draw: which strip, which frame, mirrored or not, and where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySprite {
    pub kind: EntityKind,
    pub state: AnimState,
    pub frame: usize,
    pub flipped: bool,
    pub rect: Rect,
}

/// Everything a shell needs to draw one frame, in painting order:
/// decorations, then obstacles, then entities, then the HUD text lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub mode: Mode,
    /// Distance the window has moved into the level, in pixels.
    pub progress: f32,
    pub decorations: Vec<TileSprite>,
    pub obstacles: Vec<TileSprite>,
    pub entities: Vec<EntitySprite>,
    pub hud: Vec<String>,
}

impl FrameSnapshot {
    /// Captures the current frame. Tiles outside the window are culled;
    /// entities are ordered enemies, player, bullets so shots draw on top.
    pub fn build(world: &mut World) -> FrameSnapshot {
        let mode = *world.resource::<Mode>();
        let progress = world.resource::<CameraScroll>().progress();
        let state = *world.resource::<RunState>();
        let upgrades = *world.resource::<Upgrades>();

        let window = Rect::new(Vec2::ZERO, WINDOW_SIZE.as_vec2());
        let (decorations, obstacles) = match world.get_resource::<TileWorld>() {
            Some(tiles) => (visible(tiles.decorations(), &window), visible(tiles.obstacles(), &window)),
            None => (Vec::new(), Vec::new()),
        };

        let mut entities: Vec<EntitySprite> = world
            .query::<(&EntityKind, &Position, &Hitbox, &Facing, &Animation)>()
            .iter(world)
            .map(|(kind, position, hitbox, facing, animation)| EntitySprite {
                kind: *kind,
                state: animation.state,
                frame: animation.frame,
                flipped: facing.flipped(),
                rect: hitbox.rect(position),
            })
            .collect();
        entities.sort_by_key(|sprite| match sprite.kind {
            EntityKind::Enemy => 0,
            EntityKind::Player => 1,
            EntityKind::Bullet => 2,
        });

        let player_stats = world
            .query_filtered::<(&Health, &ShieldCharges), With<PlayerControlled>>()
            .single(world)
            .map(|(health, shields)| (*health, *shields))
            .ok();

        FrameSnapshot {
            mode,
            progress,
            decorations,
            obstacles,
            entities,
            hud: hud_lines(mode, &state, &upgrades, player_stats),
        }
    }
}

fn visible(tiles: &[crate::level::world::Tile], window: &Rect) -> Vec<TileSprite> {
    tiles
        .iter()
        .filter(|tile| tile.rect.intersects(window))
        .map(|tile| TileSprite {
            id: tile.id,
            rect: tile.rect,
        })
        .collect()
}

fn hud_lines(
    mode: Mode,
    state: &RunState,
    upgrades: &Upgrades,
    player_stats: Option<(Health, ShieldCharges)>,
) -> Vec<String> {
    let mut hud = Vec::new();

    if let Mode::Menu = mode {
        hud.push("WAVE SHOOTER".to_string());
        hud.push("press confirm to start".to_string());
        return hud;
    }

    if let Some((health, shields)) = player_stats {
        hud.push(format!("HP {}/{}", health.current.max(0), health.max));
        hud.push(format!("SHIELD {}", shields.0));
    }
    hud.push(format!("KILLS {}", state.kills.separate_with_commas()));
    hud.push(format!("LEVEL {}", state.level));

    match mode {
        Mode::Paused => hud.push("PAUSED".to_string()),
        Mode::Store => {
            hud.push("STORE".to_string());
            for upgrade in UpgradeKind::iter() {
                match owned(upgrades, upgrade) {
                    Some(count) => hud.push(format!("{} - {} kills (owned {})", upgrade, upgrade.cost(), count)),
                    None => hud.push(format!("{} - {} kills", upgrade, upgrade.cost())),
                }
            }
        }
        Mode::GameOver => {
            hud.push("GAME OVER".to_string());
            hud.push("press confirm to retry".to_string());
        }
        Mode::LevelComplete { .. } => hud.push(format!("LEVEL {} CLEAR", state.level)),
        Mode::Beaten => {
            hud.push("CAMPAIGN COMPLETE".to_string());
            hud.push("press confirm to play again".to_string());
        }
        _ => {}
    }

    hud
}

/// How many of this upgrade the player owns; consumables have no count.
fn owned(upgrades: &Upgrades, upgrade: UpgradeKind) -> Option<u32> {
    match upgrade {
        UpgradeKind::ExtraJump => Some(upgrades.extra_jumps),
        UpgradeKind::ExtraBullet => Some(upgrades.extra_bullets),
        UpgradeKind::Regen => Some(upgrades.regen),
        UpgradeKind::MaxShield => Some(upgrades.max_shields),
        UpgradeKind::RestoreHealth => None,
    }
}
