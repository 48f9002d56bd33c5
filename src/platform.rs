//! Platform helpers for the desktop shell.

use std::time::Duration;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::error::{GameError, GameResult};
use crate::formatter::CustomFormatter;

/// Sleeps off the remainder of a frame.
///
/// Spin-sleeps for precision while the shell is pacing itself to the tick
/// rate; falls back to the coarse OS sleep when precision does not matter.
pub fn sleep(duration: Duration, accurate: bool) {
    if accurate {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_console() -> GameResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(true)
        .with_env_filter(filter)
        .event_format(CustomFormatter)
        .finish()
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::Console(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}
