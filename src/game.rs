//! This module contains the main game loop and ECS orchestration.

use std::time::Instant;

use bevy_ecs::event::{EventReader, EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use tracing::{error, warn};

use crate::error::GameError;
use crate::events::{AudioEvent, GameEvent};
use crate::level::Levels;
use crate::systems::animation::AnimationCatalog;
use crate::systems::components::{CameraScroll, GlobalState, RunState, Upgrades};
use crate::systems::input::InputState;
use crate::systems::profiling::{profile, SystemId, SystemTimings, Timing};
use crate::systems::snapshot::FrameSnapshot;
use crate::systems::state::Mode;
use crate::systems::{
    animation, collision, combat, enemy, input, player, projectile, scroll, spawn, state,
};

/// System sets, ordered within the per-tick schedule.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Translates the tick's input sample into game commands.
    Input,
    /// Simulation systems. Only run while a level is being played.
    Update,
    /// Animation playheads. Also run while banner screens are up, so
    /// death animations finish behind the game-over text.
    Animate,
    /// Mode machine and error drain. Always runs.
    Respond,
}

/// Core game state manager built on the ECS architecture.
///
/// Owns the `World` holding every entity and resource, plus the `Schedule`
/// that advances the simulation by exactly one tick per call to [`Game::tick`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Creates a new game over the given level campaign, parked on the menu.
    pub fn new(levels: Levels) -> Game {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_events(&mut world);
        Self::insert_resources(&mut world, levels);
        Self::configure_schedule(&mut schedule);

        Game { world, schedule }
    }

    /// Registers all event types with the ECS world.
    fn setup_events(world: &mut World) {
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<AudioEvent>(world);
        EventRegistry::register_event::<GameError>(world);
    }

    /// Inserts all global resources. Level entities are not spawned here;
    /// the mode machine loads level 1 when a run starts.
    fn insert_resources(world: &mut World, levels: Levels) {
        world.insert_resource(levels);
        world.insert_resource(Mode::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(RunState::default());
        world.insert_resource(Upgrades::default());
        world.insert_resource(CameraScroll::default());
        world.insert_resource(AnimationCatalog::default());
        world.insert_resource(InputState::default());
        world.insert_resource(SystemTimings::default());
        world.insert_resource(Timing::default());
    }

    /// Builds the tick schedule with profiling-wrapped systems.
    fn configure_schedule(schedule: &mut Schedule) {
        let input_system = profile(SystemId::Input, input::input_system);
        let player_system = profile(SystemId::Player, player::player_system);
        let scroll_system = profile(SystemId::Scroll, scroll::scroll_system);
        let enemy_system = profile(SystemId::Enemy, enemy::enemy_system);
        let projectile_system = profile(SystemId::Projectile, projectile::projectile_system);
        let collision_system = profile(SystemId::Collision, collision::collision_system);
        let combat_system = profile(SystemId::Combat, combat::combat_system);
        let spawn_system = profile(SystemId::Spawn, spawn::spawn_system);
        let regen_system = profile(SystemId::Regen, player::regen_system);
        let animation_system = profile(SystemId::Animation, animation::animation_system);
        let mode_system = profile(SystemId::Mode, state::mode_system);

        schedule.add_systems((
            input_system.in_set(GameplaySet::Input),
            (
                player_system,
                scroll_system,
                enemy_system,
                projectile_system,
                collision_system,
                combat_system,
                spawn_system,
                regen_system,
            )
                .chain()
                .in_set(GameplaySet::Update),
            animation_system.in_set(GameplaySet::Animate),
            (mode_system, drain_errors_system)
                .chain()
                .in_set(GameplaySet::Respond),
        ));

        schedule.configure_sets(
            (
                GameplaySet::Input,
                GameplaySet::Update.run_if(|mode: Res<Mode>| mode.running()),
                GameplaySet::Animate.run_if(|mode: Res<Mode>| mode.animates()),
                GameplaySet::Respond,
            )
                .chain(),
        );
    }

    /// Advances the simulation by one tick against the given input sample.
    ///
    /// Returns `true` once the game wants the process to exit.
    pub fn tick(&mut self, input: InputState) -> bool {
        self.world.insert_resource(input);

        let start = Instant::now();
        self.schedule.run(&mut self.world);
        let total_duration = start.elapsed();

        // Buffered events survive two pumps. One pump per tick gives every
        // reader exactly one full tick to observe an event.
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<AudioEvent>>().update();
        self.world.resource_mut::<Events<GameError>>().update();

        if let (Some(timings), Some(timing)) = (
            self.world.get_resource::<SystemTimings>(),
            self.world.get_resource::<Timing>(),
        ) {
            let new_tick = timing.increment_tick();
            timings.add_total_timing(total_duration, new_tick);

            let frame_budget_ms =
                (crate::constants::LOOP_TIME.as_secs_f32() * 1000.0 * 1.2) as u128;
            if total_duration.as_millis() > frame_budget_ms {
                let slowest = timings.get_slowest_systems();
                if !slowest.is_empty() {
                    let slowest_info = slowest
                        .iter()
                        .map(|(id, avg)| format!("{:?}: {:.2}ms", id, avg.as_secs_f64() * 1000.0))
                        .collect::<Vec<_>>()
                        .join(", ");
                    warn!(
                        "Tick exceeded frame budget: {}ms > {}ms (slowest: {})",
                        total_duration.as_millis(),
                        frame_budget_ms,
                        slowest_info
                    );
                } else {
                    warn!(
                        "Tick exceeded frame budget: {}ms > {}ms",
                        total_duration.as_millis(),
                        frame_budget_ms
                    );
                }
            }
        }

        self.world
            .get_resource::<GlobalState>()
            .map(|state| state.exit)
            .unwrap_or(true)
    }

    /// Captures the draw state left behind by the last completed tick.
    pub fn snapshot(&mut self) -> FrameSnapshot {
        FrameSnapshot::build(&mut self.world)
    }

    /// Removes and returns the sound cues raised since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioEvent> {
        self.world
            .resource_mut::<Events<AudioEvent>>()
            .drain()
            .collect()
    }

    /// Formatted per-system timing lines for the shutdown report.
    pub fn timing_report(&self) -> Vec<String> {
        self.world
            .get_resource::<SystemTimings>()
            .map(|timings| timings.format_timing_display().to_vec())
            .unwrap_or_default()
    }
}

/// Logs every error event raised during the tick.
fn drain_errors_system(mut errors: EventReader<GameError>) {
    for error in errors.read() {
        error!(%error, "tick error");
    }
}
