//! Binary entry point for the headless demo shell.

use std::env;

use tracing::info;

use waveshooter::app::App;
use waveshooter::constants::LOOP_TIME;
use waveshooter::platform;

/// The main entry point of the application.
///
/// Installs the tracing subscriber, builds the app around the shipped
/// campaign, and drives the loop until the game requests exit.
pub fn main() {
    let args: Vec<String> = env::args().collect();
    let turbo = args.iter().any(|arg| arg == "--turbo" || arg == "-t");

    platform::init_console().expect("Could not initialize console");

    let mut app = App::new(turbo).expect("Could not create app");

    info!(loop_time = ?LOOP_TIME, "Starting game loop");

    loop {
        if !app.run() {
            break;
        }
    }

    info!("Per-system timings:");
    for line in app.game.timing_report() {
        info!("{line}");
    }
}
