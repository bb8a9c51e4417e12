use clap::Subcommand;
use chronos_core::{Config, Database, ProgressStore, BADGES};
use serde_json::json;

use super::{open_controller, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print streaks, total fasts and unlocked badges
    Show,
    /// List every badge with its unlock state
    Badges,
    /// Clear all streak history
    Reset,
}

pub fn run(action: ProgressAction, config: &Config) -> CmdResult {
    match action {
        ProgressAction::Show => {
            let db = Database::open()?;
            let progress = ProgressStore::new(&db).load();
            let unlocked: Vec<_> = progress.unlocked_badges().iter().map(|b| b.id).collect();
            print_json(&json!({
                "streaks": progress.streaks,
                "totalFasts": progress.total_fasts,
                "maxStreak": progress.max_streak(),
                "unlockedBadges": unlocked,
            }))?;
        }
        ProgressAction::Badges => {
            let db = Database::open()?;
            let max_streak = ProgressStore::new(&db).load().max_streak();
            let badges: Vec<_> = BADGES
                .iter()
                .map(|b| {
                    json!({
                        "badge": b,
                        "unlocked": b.is_unlocked(max_streak),
                    })
                })
                .collect();
            print_json(&json!({ "maxStreak": max_streak, "badges": badges }))?;
        }
        ProgressAction::Reset => {
            let mut controller = open_controller(config)?;
            let progress = controller.reset_progress()?;
            print_json(progress)?;
        }
    }
    Ok(())
}
