//! The fasting protocol: static phase, milestone and badge tables and the
//! pure lookups over them.
//!
//! Every function in this module maps an elapsed-hours scalar to table
//! entries. None of them read the clock or touch storage.

mod badge;
mod biomarkers;
mod milestone;
mod narrative;
mod phase;

pub use badge::{unlocked_badges_in, Badge, BADGES};
pub use biomarkers::{sample_at, simulate_biomarkers, BiomarkerPoint, CHART_HOURS};
pub use milestone::{
    hours_until, last_milestone, last_milestone_in, milestones_between, next_milestone,
    next_milestone_in, timeline, Milestone, MilestoneStatus, TimelineEntry, MILESTONES,
};
pub use narrative::{metabolic_mode, organ_state, organ_states, MetabolicMode, Organ, OrganState};
pub use phase::{
    motivation, phase_by_id, phase_lower_bound, phases_entered_between, resolve_phase,
    resolve_phase_in, FastingPhase, PhaseProgress, PHASES,
};

/// Clamp an elapsed-hours reading into the engine's input domain.
///
/// Negative and NaN readings are treated as zero.
pub fn normalize_hours(elapsed_hours: f64) -> f64 {
    if elapsed_hours.is_nan() || elapsed_hours < 0.0 {
        0.0
    } else {
        elapsed_hours
    }
}
