//! Read-only views over the protocol tables.

use chronos_core::protocol::{
    hours_until, last_milestone, metabolic_mode, motivation, next_milestone, organ_states,
    resolve_phase, sample_at, simulate_biomarkers, timeline as milestone_timeline,
};
use chronos_core::Config;
use serde_json::json;

use super::{print_json, resolve_hours, CmdResult};

pub fn timeline(hours: Option<f64>, config: &Config) -> CmdResult {
    let hours = resolve_hours(hours, config)?;
    print_json(&json!({
        "elapsedHours": hours,
        "milestones": milestone_timeline(hours),
    }))
}

pub fn phase(hours: Option<f64>, config: &Config) -> CmdResult {
    let hours = resolve_hours(hours, config)?;
    let next = next_milestone(hours);
    print_json(&json!({
        "elapsedHours": hours,
        "phase": resolve_phase(hours),
        "motivation": motivation(hours),
        "mode": metabolic_mode(hours),
        "organs": organ_states(hours),
        "lastMilestone": last_milestone(hours),
        "nextMilestone": next,
        "hoursToNextMilestone": next.map(|m| hours_until(m, hours)),
    }))
}

pub fn biomarkers(seed: Option<u64>, hours: Option<f64>, config: &Config) -> CmdResult {
    let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis().unsigned_abs());
    let hours = resolve_hours(hours, config)?;
    let points = simulate_biomarkers(seed);
    print_json(&json!({
        "seed": seed,
        "elapsedHours": hours,
        "current": sample_at(&points, hours),
        "points": points,
    }))
}
