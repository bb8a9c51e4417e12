use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::protocol::{FastingPhase, MetabolicMode, Milestone, OrganState, PhaseProgress};
use crate::session::SessionState;

/// Every state change in the session controller produces an Event.
/// The CLI prints them; the ticker loop forwards them to its callback.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    FastStarted {
        started_at: DateTime<Utc>,
    },
    /// Session ended and its streak rewards were applied.
    FastStopped {
        elapsed_seconds: u64,
        hours_fasted: f64,
        /// Phases whose threshold the session reached; empty if none.
        completed_phase_ids: Vec<u32>,
        total_fasts: u32,
        at: DateTime<Utc>,
    },
    /// Timer discarded without touching progress.
    FastReset {
        at: DateTime<Utc>,
    },
    /// A tick moved the session into a new phase.
    PhaseEntered {
        phase: &'static FastingPhase,
        elapsed_seconds: u64,
        at: DateTime<Utc>,
    },
    /// A tick passed a milestone's hour.
    MilestoneReached {
        milestone: &'static Milestone,
        elapsed_seconds: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        started_at: Option<DateTime<Utc>>,
        elapsed_seconds: u64,
        elapsed_hours: f64,
        /// 0.0 .. 100.0 of the configured target.
        target_progress_pct: f64,
        phase: &'static FastingPhase,
        last_milestone: Option<&'static Milestone>,
        next_milestone: Option<&'static Milestone>,
        hours_to_next_milestone: Option<f64>,
        mode: MetabolicMode,
        organs: [OrganState; 5],
        motivation: Option<PhaseProgress>,
        streaks: BTreeMap<u32, u32>,
        total_fasts: u32,
        unlocked_badges: Vec<&'static str>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::FastStarted { .. } => "fast_started",
            Event::FastStopped { .. } => "fast_stopped",
            Event::FastReset { .. } => "fast_reset",
            Event::PhaseEntered { .. } => "phase_entered",
            Event::MilestoneReached { .. } => "milestone_reached",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
