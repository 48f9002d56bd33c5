//! Frame-stepped sprite animation.
//!
//! The simulation owns the playhead (pose, frame index, tick counter); the
//! shell maps `(kind, state, frame)` to whatever artwork it has.

use std::collections::HashMap;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Commands, Query, Res};
use strum_macros::AsRefStr;

use crate::constants::animation::FRAME_INTERVAL;
use crate::systems::components::{Dying, EntityKind};

/// The pose an entity is showing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AnimState {
    #[default]
    Idle,
    Run,
    Jump,
    Death,
}

/// Frame counts for every `(kind, pose)` strip the artwork provides.
///
/// Strips the artwork lacks simply have no entry; [`Animation::set_state`]
/// refuses to switch to them, so a missing strip degrades to holding the
/// current pose instead of indexing out of range.
#[derive(Resource, Debug, Clone)]
pub struct AnimationCatalog {
    frames: HashMap<(EntityKind, AnimState), usize>,
}

impl Default for AnimationCatalog {
    fn default() -> Self {
        let mut frames = HashMap::new();
        for kind in [EntityKind::Player, EntityKind::Enemy] {
            frames.insert((kind, AnimState::Idle), 4);
            frames.insert((kind, AnimState::Run), 6);
            frames.insert((kind, AnimState::Jump), 1);
            frames.insert((kind, AnimState::Death), 4);
        }
        frames.insert((EntityKind::Bullet, AnimState::Idle), 1);
        Self { frames }
    }
}

impl AnimationCatalog {
    pub fn from_frames(frames: HashMap<(EntityKind, AnimState), usize>) -> Self {
        Self { frames }
    }

    pub fn frames(&self, kind: EntityKind, state: AnimState) -> usize {
        self.frames.get(&(kind, state)).copied().unwrap_or(0)
    }
}

/// Playhead over an animation strip.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub state: AnimState,
    pub frame: usize,
    pub ticks: u32,
}

impl Animation {
    /// Switches pose and restarts the strip. Re-asserting the current pose
    /// keeps the playhead so a running entity does not stutter on frame 0.
    pub fn set_state(&mut self, kind: EntityKind, state: AnimState, catalog: &AnimationCatalog) {
        if state == self.state || catalog.frames(kind, state) == 0 {
            return;
        }
        self.state = state;
        self.frame = 0;
        self.ticks = 0;
    }
}

/// Advances every playhead at the fixed frame cadence.
///
/// Looping poses wrap. Death holds its final frame, except for entities
/// marked [`Dying`], which despawn once their strip has fully played.
pub fn animation_system(
    mut commands: Commands,
    catalog: Res<AnimationCatalog>,
    mut query: Query<(Entity, &EntityKind, &mut Animation, Option<&Dying>)>,
) {
    for (entity, kind, mut animation, dying) in query.iter_mut() {
        let count = catalog.frames(*kind, animation.state);
        if count == 0 {
            // No strip for the current pose. A dying entity still has to leave.
            if dying.is_some() {
                commands.entity(entity).despawn();
            }
            continue;
        }

        animation.ticks += 1;
        if animation.ticks < FRAME_INTERVAL {
            continue;
        }
        animation.ticks = 0;

        if animation.frame + 1 < count {
            animation.frame += 1;
        } else if animation.state == AnimState::Death {
            if dying.is_some() {
                commands.entity(entity).despawn();
            }
        } else {
            animation.frame = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bevy_ecs::schedule::Schedule;
    use bevy_ecs::world::World;
    use speculoos::prelude::*;

    use super::{AnimState, Animation, AnimationCatalog, animation_system};
    use crate::constants::animation::FRAME_INTERVAL;
    use crate::systems::components::{Dying, EntityKind};

    #[test]
    fn set_state_restarts_the_strip() {
        let catalog = AnimationCatalog::default();
        let mut animation = Animation {
            state: AnimState::Idle,
            frame: 2,
            ticks: 3,
        };

        animation.set_state(EntityKind::Player, AnimState::Run, &catalog);
        assert_that(&animation.state).is_equal_to(AnimState::Run);
        assert_that(&animation.frame).is_equal_to(0);
        assert_that(&animation.ticks).is_equal_to(0);
    }

    #[test]
    fn reasserting_the_pose_keeps_the_playhead() {
        let catalog = AnimationCatalog::default();
        let mut animation = Animation {
            state: AnimState::Run,
            frame: 4,
            ticks: 2,
        };

        animation.set_state(EntityKind::Player, AnimState::Run, &catalog);
        assert_that(&animation.frame).is_equal_to(4);
        assert_that(&animation.ticks).is_equal_to(2);
    }

    #[test]
    fn missing_strips_are_ignored() {
        let catalog = AnimationCatalog::from_frames(HashMap::new());
        let mut animation = Animation::default();

        animation.set_state(EntityKind::Enemy, AnimState::Death, &catalog);
        assert_that(&animation.state).is_equal_to(AnimState::Idle);
    }

    fn harness() -> (World, Schedule) {
        let mut world = World::new();
        world.insert_resource(AnimationCatalog::default());
        let mut schedule = Schedule::default();
        schedule.add_systems(animation_system);
        (world, schedule)
    }

    #[test]
    fn frames_advance_at_the_cadence_and_loop() {
        let (mut world, mut schedule) = harness();
        let entity = world.spawn((EntityKind::Player, Animation::default())).id();

        for _ in 0..FRAME_INTERVAL - 1 {
            schedule.run(&mut world);
        }
        assert_that(&world.get::<Animation>(entity).unwrap().frame).is_equal_to(0);

        schedule.run(&mut world);
        assert_that(&world.get::<Animation>(entity).unwrap().frame).is_equal_to(1);

        // Idle has 4 frames; a full cycle returns to the start.
        for _ in 0..FRAME_INTERVAL * 3 {
            schedule.run(&mut world);
        }
        assert_that(&world.get::<Animation>(entity).unwrap().frame).is_equal_to(0);
    }

    #[test]
    fn death_holds_its_last_frame_without_dying_marker() {
        let (mut world, mut schedule) = harness();
        let entity = world
            .spawn((
                EntityKind::Player,
                Animation {
                    state: AnimState::Death,
                    frame: 0,
                    ticks: 0,
                },
            ))
            .id();

        for _ in 0..FRAME_INTERVAL * 10 {
            schedule.run(&mut world);
        }
        let animation = world.get::<Animation>(entity).unwrap();
        assert_that(&animation.frame).is_equal_to(3);
    }

    #[test]
    fn dying_entities_despawn_when_the_strip_ends() {
        let (mut world, mut schedule) = harness();
        let entity = world
            .spawn((
                EntityKind::Enemy,
                Animation {
                    state: AnimState::Death,
                    frame: 0,
                    ticks: 0,
                },
                Dying,
            ))
            .id();

        // Four frames at the fixed cadence, then removal on the final step.
        for _ in 0..FRAME_INTERVAL * 4 - 1 {
            schedule.run(&mut world);
            assert_that(&world.get_entity(entity).is_ok()).is_true();
        }
        schedule.run(&mut world);
        assert_that(&world.get_entity(entity).is_ok()).is_false();
    }
}
