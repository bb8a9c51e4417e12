pub mod config;
pub mod fast;
pub mod insight;
pub mod progress;
pub mod view;

use chronos_core::protocol::normalize_hours;
use chronos_core::{Config, Database, SessionController, SystemClock};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Controller over the on-disk store, reattached to any running session.
pub fn open_controller(
    config: &Config,
) -> Result<SessionController<Database, SystemClock>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(SessionController::new(db, SystemClock).with_target_seconds(config.target_seconds()))
}

/// `--hours` if given, else the running session's elapsed hours (0 when idle).
pub fn resolve_hours(hours: Option<f64>, config: &Config) -> Result<f64, Box<dyn std::error::Error>> {
    match hours {
        Some(h) => Ok(normalize_hours(h)),
        None => {
            let mut controller = open_controller(config)?;
            controller.tick();
            Ok(controller.elapsed_hours())
        }
    }
}
