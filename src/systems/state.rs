//! The top-level run state machine.
//!
//! Every mode change in the program funnels through [`mode_system`]: it
//! folds the tick's commands and terminal conditions into a new [`Mode`],
//! performs the side effects of the transition, and writes the mode back.
//! No other system mutates [`Mode`].

use std::mem::discriminant;

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::constants::{player, run};
use crate::error::GameError;
use crate::events::{GameCommand, GameEvent, UpgradeKind};
use crate::level::Levels;
use crate::level::world::TileWorld;
use crate::systems::components::{
    CameraScroll, EnemyBundle, GlobalState, Health, LevelScoped, PlayerBundle, PlayerControlled, Position, RunState,
    ShieldCharges, Upgrades,
};

/// What the program is doing right now.
///
/// Simulation systems only run in `Playing`; the banner modes keep the
/// world frozen on screen. `LevelComplete` embeds its own countdown so the
/// machine needs no side table to know when to advance.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Paused,
    Store,
    LevelComplete {
        remaining_ticks: u32,
    },
    GameOver,
    Beaten,
}

impl Mode {
    /// True while the simulation advances.
    pub fn running(&self) -> bool {
        matches!(self, Mode::Playing)
    }

    /// Animation keeps stepping through death and victory banners so the
    /// last poses play out on a frozen world.
    pub fn animates(&self) -> bool {
        matches!(self, Mode::Playing | Mode::GameOver | Mode::LevelComplete { .. })
    }
}

/// Compares only the variant, ignoring embedded fields. The level-complete
/// countdown changes the value every tick but is still the "same" mode.
trait TooSimilar {
    fn too_similar(&self, other: &Self) -> bool;
}

impl TooSimilar for Mode {
    fn too_similar(&self, other: &Self) -> bool {
        discriminant(self) == discriminant(other)
    }
}

#[allow(clippy::too_many_arguments)]
#[allow(clippy::type_complexity)]
pub fn mode_system(
    mut commands: Commands,
    mut mode: ResMut<Mode>,
    levels: Res<Levels>,
    world: Option<Res<TileWorld>>,
    scroll: Res<CameraScroll>,
    mut state: ResMut<RunState>,
    mut upgrades: ResMut<Upgrades>,
    mut global: ResMut<GlobalState>,
    mut events: EventReader<GameEvent>,
    mut errors: EventWriter<GameError>,
    mut player_query: Query<(&Position, &mut Health, &mut ShieldCharges), With<PlayerControlled>>,
    scoped: Query<Entity, With<LevelScoped>>,
) {
    let old_mode = *mode;
    let mut new_mode = old_mode;

    for event in events.read() {
        let GameEvent::Command(command) = event else { continue };
        match (*command, new_mode) {
            (GameCommand::Exit, _) => global.exit = true,
            (GameCommand::Confirm, Mode::Menu | Mode::GameOver | Mode::Beaten) => new_mode = Mode::Playing,
            (GameCommand::TogglePause, Mode::Playing) => new_mode = Mode::Paused,
            (GameCommand::TogglePause, Mode::Paused) => new_mode = Mode::Playing,
            (GameCommand::ToggleStore, Mode::Playing) => new_mode = Mode::Store,
            (GameCommand::ToggleStore, Mode::Store) => new_mode = Mode::Playing,
            (GameCommand::GiveUp, Mode::Playing | Mode::Paused) => new_mode = Mode::GameOver,
            (GameCommand::Purchase(upgrade), Mode::Store) => {
                purchase(upgrade, &mut state, &mut upgrades, &mut player_query);
            }
            _ => debug!(?command, mode = ?new_mode, "command has no effect in this mode"),
        }
    }

    // Terminal conditions are only checked while actually playing. Both
    // queries go quiet between levels, when no player entity exists yet.
    if matches!(new_mode, Mode::Playing) && matches!(old_mode, Mode::Playing) {
        if let Ok((position, health, _)) = player_query.single() {
            if !health.alive() {
                new_mode = Mode::GameOver;
            } else if let Some(world) = world.as_ref() {
                let world_x = scroll.total + position.0.x;
                if world_x > world.length() - run::LEVEL_END_MARGIN {
                    new_mode = Mode::LevelComplete {
                        remaining_ticks: run::LEVEL_COMPLETE_HOLD,
                    };
                }
            }
        }
    }

    // The banner countdown. Runs only once the banner is already up, so
    // entering the mode displays the full hold.
    if let Mode::LevelComplete { remaining_ticks } = old_mode {
        if new_mode.too_similar(&old_mode) {
            new_mode = if remaining_ticks > 0 {
                Mode::LevelComplete {
                    remaining_ticks: remaining_ticks - 1,
                }
            } else if state.level >= levels.count() {
                Mode::Beaten
            } else {
                Mode::Playing
            };
        }
    }

    match (old_mode, new_mode) {
        // A fresh run: everything resets, the campaign starts over.
        (Mode::Menu | Mode::GameOver | Mode::Beaten, Mode::Playing) => {
            *state = RunState {
                level: 1,
                ..RunState::default()
            };
            *upgrades = Upgrades::default();
            if load_level(&mut commands, &levels, 1, 0, &scoped, &mut errors) {
                info!("run started");
            } else {
                new_mode = Mode::Menu;
            }
        }
        // Advancing: upgrades and kills persist, shield charges carry over.
        (Mode::LevelComplete { .. }, Mode::Playing) => {
            let shields = player_query.single().map(|(_, _, shields)| shields.0).unwrap_or(0);
            state.level += 1;
            state.spawn_timer = 0;
            state.regen_timer = 0;
            if load_level(&mut commands, &levels, state.level, shields, &scoped, &mut errors) {
                info!(level = state.level, "advanced to next level");
            } else {
                new_mode = Mode::Menu;
            }
        }
        (Mode::Playing | Mode::Paused, Mode::GameOver) => info!(kills = state.kills, "run over"),
        (Mode::Playing, Mode::LevelComplete { .. }) => info!(level = state.level, "level complete"),
        (Mode::LevelComplete { .. }, Mode::Beaten) => info!(kills = state.kills, "campaign beaten"),
        (Mode::Playing, Mode::Paused) => debug!("paused"),
        (Mode::Paused, Mode::Playing) => debug!("resumed"),
        (Mode::Playing, Mode::Store) => debug!("store opened"),
        (Mode::Store, Mode::Playing) => debug!("store closed"),
        _ => {}
    }

    *mode = new_mode;
}

/// Attempts a store purchase. Either the whole purchase happens or none of
/// it does; an unaffordable or pointless purchase changes nothing.
fn purchase(
    upgrade: UpgradeKind,
    state: &mut RunState,
    upgrades: &mut Upgrades,
    player_query: &mut Query<(&Position, &mut Health, &mut ShieldCharges), With<PlayerControlled>>,
) {
    let cost = upgrade.cost();
    if state.kills < cost {
        debug!(%upgrade, cost, kills = state.kills, "cannot afford upgrade");
        return;
    }
    if upgrade == UpgradeKind::RestoreHealth {
        let full = player_query
            .single()
            .map(|(_, health, _)| health.current >= health.max)
            .unwrap_or(true);
        if full {
            debug!("health already full, not buying");
            return;
        }
    }

    state.kills -= cost;
    match upgrade {
        UpgradeKind::ExtraJump => upgrades.extra_jumps += 1,
        UpgradeKind::ExtraBullet => upgrades.extra_bullets += 1,
        UpgradeKind::Regen => upgrades.regen += 1,
        UpgradeKind::MaxShield => {
            upgrades.max_shields += 1;
            if let Ok((_, _, mut shields)) = player_query.single_mut() {
                shields.0 += 1;
            }
        }
        UpgradeKind::RestoreHealth => {
            if let Ok((_, mut health, _)) = player_query.single_mut() {
                health.current = health.max;
            }
        }
    }
    info!(%upgrade, remaining = state.kills, "upgrade purchased");
}

/// Tears down the previous level and brings up `number`.
///
/// Returns false when the level cannot be built; the world resource is
/// removed in that case so no stale tiles survive.
fn load_level(
    commands: &mut Commands,
    levels: &Levels,
    number: u32,
    shields: u32,
    scoped: &Query<Entity, With<LevelScoped>>,
    errors: &mut EventWriter<GameError>,
) -> bool {
    for entity in scoped.iter() {
        commands.entity(entity).despawn();
    }
    commands.insert_resource(CameraScroll::default());

    match levels.build(number) {
        Ok(world) => {
            let spawn = world.player_spawn().unwrap_or(player::FALLBACK_SPAWN);
            commands.spawn(PlayerBundle::new(spawn, shields));
            for &enemy_spawn in world.enemy_spawns() {
                commands.spawn(EnemyBundle::new(enemy_spawn, number as i32));
            }
            info!(level = number, enemies = world.enemy_spawns().len(), "level loaded");
            commands.insert_resource(world);
            true
        }
        Err(error) => {
            commands.remove_resource::<TileWorld>();
            errors.write(error);
            false
        }
    }
}
