//! Input decoding: held buttons are polled, mode changes fire on edges.

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Local, Res},
};
use bitflags::bitflags;

use crate::events::{GameCommand, GameEvent, UpgradeKind};

bitflags! {
    /// Raw buttons sampled by the shell for one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Buttons: u16 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP = 1 << 2;
        const SHOOT = 1 << 3;
        const PAUSE = 1 << 4;
        const STORE = 1 << 5;
        const CONFIRM = 1 << 6;
        const GIVE_UP = 1 << 7;
        const EXIT = 1 << 8;
    }
}

/// The tick's input sample. The shell inserts a fresh value before each tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    pub held: Buttons,
    /// A store purchase request decoded by the shell, if any.
    pub purchase: Option<UpgradeKind>,
}

/// Turns button presses into commands.
///
/// Movement, jump and fire remain held-state and are polled by their systems
/// directly. Mode-changing buttons emit a command only on the tick they go
/// from released to held, so holding pause does not flap the mode.
pub fn input_system(input: Res<InputState>, mut previous: Local<Buttons>, mut events: EventWriter<GameEvent>) {
    let pressed = input.held & !*previous;
    *previous = input.held;

    for (button, command) in [
        (Buttons::PAUSE, GameCommand::TogglePause),
        (Buttons::STORE, GameCommand::ToggleStore),
        (Buttons::CONFIRM, GameCommand::Confirm),
        (Buttons::GIVE_UP, GameCommand::GiveUp),
        (Buttons::EXIT, GameCommand::Exit),
    ] {
        if pressed.contains(button) {
            events.write(command.into());
        }
    }

    if let Some(upgrade) = input.purchase {
        events.write(GameCommand::Purchase(upgrade).into());
    }
}

/// Convenience for tests and the demo shell.
pub fn held(buttons: Buttons) -> InputState {
    InputState {
        held: buttons,
        purchase: None,
    }
}
