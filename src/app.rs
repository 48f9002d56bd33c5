//! Application shell: paces the tick loop and scripts a demo session.
//!
//! The shell is deliberately headless. It feeds the game a synthetic input
//! sample every tick, logs the HUD whenever the mode changes, and relays
//! audio cues to the log. A real front end would replace exactly this file.

use std::mem::discriminant;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::constants::LOOP_TIME;
use crate::error::GameResult;
use crate::events::UpgradeKind;
use crate::formatter;
use crate::game::Game;
use crate::level::Levels;
use crate::platform;
use crate::systems::input::{Buttons, InputState};
use crate::systems::state::Mode;

/// Ticks the script lingers on the menu before starting.
const MENU_DELAY: u32 = 30;
/// Ticks the script lets a banner sit before acknowledging it.
const BANNER_DELAY: u32 = 90;
/// A short beat between scripted store actions.
const STORE_BEAT: u32 = 45;
/// Hop this often while running right.
const JUMP_PERIOD: u64 = 75;
/// Visit the store after this many playing ticks, then again at multiples.
const STORE_PERIOD: u64 = 1000;
/// Pause exactly once per run, this far in.
const PAUSE_AT: u64 = 500;
/// Abandon a run that somehow drags on this long.
const GIVE_UP_AFTER: u64 = 9000;
/// How many runs the demo plays before exiting.
const DEMO_RUNS: u32 = 2;

/// Main application wrapper that owns the game and paces the tick loop.
pub struct App {
    pub game: Game,
    /// Skip frame pacing and run ticks back to back.
    turbo: bool,
    script: DemoScript,
    last_mode: Mode,
}

impl App {
    /// Loads the shipped campaign and builds the game around it.
    ///
    /// # Errors
    ///
    /// Propagates level asset and parse failures from [`Levels::shipped`].
    pub fn new(turbo: bool) -> GameResult<Self> {
        let levels = Levels::shipped()?;
        info!(levels = levels.count(), turbo, "campaign loaded");

        Ok(App {
            game: Game::new(levels),
            turbo,
            script: DemoScript::default(),
            last_mode: Mode::default(),
        })
    }

    /// Executes a single frame: sample the script, tick the game, present,
    /// then sleep off the rest of the frame.
    ///
    /// Returns `true` if the loop should keep running.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        // The counter feeds the hex prefix on every log line.
        formatter::increment_tick();

        let mode = *self.game.world.resource::<Mode>();
        let input = self.script.sample(mode);

        if self.game.tick(input) {
            return false;
        }

        self.present();

        if !self.turbo && start.elapsed() < LOOP_TIME {
            let time = LOOP_TIME.saturating_sub(start.elapsed());
            if time != Duration::ZERO {
                platform::sleep(time, true);
            }
        }

        true
    }

    /// Logs the HUD on mode changes and relays audio cues.
    fn present(&mut self) {
        let snapshot = self.game.snapshot();

        if discriminant(&snapshot.mode) != discriminant(&self.last_mode) {
            for line in &snapshot.hud {
                info!(target: "hud", "{line}");
            }
            self.last_mode = snapshot.mode;
        } else if self.script.playing_ticks % 300 == 0 && snapshot.mode.running() {
            debug!(
                progress = snapshot.progress,
                entities = snapshot.entities.len(),
                "playing"
            );
        }

        for cue in self.game.drain_audio() {
            debug!(?cue, "audio cue");
        }
    }
}

/// Open-loop input script that plays whole sessions unattended.
///
/// While playing it holds run and fire, hops on a fixed period, and drops
/// into the store at intervals to spend kills. Banner modes are
/// acknowledged after a short beat. After [`DEMO_RUNS`] runs it exits.
#[derive(Debug, Default)]
struct DemoScript {
    /// Ticks spent in the current mode variant.
    ticks_in_mode: u32,
    /// Ticks spent playing in the current run.
    playing_ticks: u64,
    runs_started: u32,
    last_mode: Mode,
}

impl DemoScript {
    fn sample(&mut self, mode: Mode) -> InputState {
        if discriminant(&mode) != discriminant(&self.last_mode) {
            self.ticks_in_mode = 0;
            self.last_mode = mode;
        } else {
            self.ticks_in_mode += 1;
        }

        let mut held = Buttons::empty();
        let mut purchase = None;

        match mode {
            Mode::Menu => {
                if self.runs_started >= DEMO_RUNS {
                    held |= Buttons::EXIT;
                } else if self.ticks_in_mode == MENU_DELAY {
                    held |= Buttons::CONFIRM;
                    self.start_run();
                }
            }
            Mode::Playing => {
                self.playing_ticks += 1;
                held |= Buttons::RIGHT | Buttons::SHOOT;
                if self.playing_ticks % JUMP_PERIOD == 0 {
                    held |= Buttons::JUMP;
                }
                if self.playing_ticks % STORE_PERIOD == 0 {
                    held |= Buttons::STORE;
                }
                if self.playing_ticks == PAUSE_AT {
                    held |= Buttons::PAUSE;
                }
                if self.playing_ticks >= GIVE_UP_AFTER {
                    held |= Buttons::GIVE_UP;
                }
            }
            Mode::Paused => {
                if self.ticks_in_mode >= STORE_BEAT {
                    held |= Buttons::PAUSE;
                }
            }
            Mode::Store => {
                if self.ticks_in_mode == STORE_BEAT {
                    purchase = Some(UpgradeKind::ExtraBullet);
                } else if self.ticks_in_mode == STORE_BEAT * 2 {
                    purchase = Some(UpgradeKind::RestoreHealth);
                } else if self.ticks_in_mode >= STORE_BEAT * 3 {
                    held |= Buttons::STORE;
                }
            }
            Mode::GameOver | Mode::Beaten => {
                if self.ticks_in_mode >= BANNER_DELAY {
                    if self.runs_started >= DEMO_RUNS {
                        held |= Buttons::EXIT;
                    } else {
                        held |= Buttons::CONFIRM;
                        self.start_run();
                    }
                }
            }
            Mode::LevelComplete { .. } => {}
        }

        InputState { held, purchase }
    }

    fn start_run(&mut self) {
        self.runs_started += 1;
        self.playing_ticks = 0;
        info!(run = self.runs_started, "demo starting a run");
    }
}
