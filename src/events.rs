use bevy_ecs::prelude::*;
use strum_macros::{Display, EnumIter};

/// Store upgrades, purchasable with banked kills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum UpgradeKind {
    /// One extra mid-air jump per airborne stretch, stacking.
    #[strum(serialize = "Extra Jump")]
    ExtraJump,
    /// One extra bullet per volley, stacking.
    #[strum(serialize = "Extra Bullet")]
    ExtraBullet,
    /// Passive health regeneration, faster per level.
    #[strum(serialize = "Regen")]
    Regen,
    /// Raises the shield cap and grants one charge.
    #[strum(serialize = "Max Shield")]
    MaxShield,
    /// Refills health to the cap immediately.
    #[strum(serialize = "Restore Health")]
    RestoreHealth,
}

impl UpgradeKind {
    /// Price in banked kills.
    pub fn cost(&self) -> u64 {
        match self {
            UpgradeKind::ExtraJump => 8,
            UpgradeKind::ExtraBullet => 10,
            UpgradeKind::Regen => 6,
            UpgradeKind::MaxShield => 5,
            UpgradeKind::RestoreHealth => 3,
        }
    }
}

/// Discrete commands decoded from the input edge detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    /// Starts or restarts a run from a banner mode.
    Confirm,
    TogglePause,
    ToggleStore,
    /// Abandons the current run.
    GiveUp,
    Purchase(UpgradeKind),
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// A projectile overlapped a damageable body.
    Struck { projectile: Entity, target: Entity },
    /// A projectile hit a solid tile.
    Blocked { projectile: Entity },
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Sound cues for the shell to play. The simulation only emits them.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    Shot,
    Jump,
}
