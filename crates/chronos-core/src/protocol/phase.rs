//! Fasting phases and phase resolution.
//!
//! Phases are ordered by `min_duration_hours`, strictly increasing. A phase's
//! lower bound is the previous phase's `min_duration_hours` (0 for the first),
//! so the table covers `[0, ∞)` with no gaps; the last phase is open-ended.

use serde::Serialize;

use super::normalize_hours;

/// A named interval of elapsed fasting hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingPhase {
    pub id: u32,
    pub name: &'static str,
    /// Display label, e.g. "0 - 8 Hours".
    pub range: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    /// Hours required to complete this phase.
    pub min_duration_hours: f64,
}

pub static PHASES: &[FastingPhase] = &[
    FastingPhase {
        id: 1,
        name: "Insulin Reset",
        range: "0 - 8 Hours",
        description: "Lower insulin, stop fat storage, hydration focus.",
        color: "#3b82f6",
        min_duration_hours: 8.0,
    },
    FastingPhase {
        id: 2,
        name: "Glycogen Exhaustion",
        range: "8 - 18 Hours",
        description: "Deplete sugar, attack triglycerides, liver de-fatting.",
        color: "#8b5cf6",
        min_duration_hours: 18.0,
    },
    FastingPhase {
        id: 3,
        name: "Liver Detox",
        range: "18 - 30 Hours",
        description: "Deep fat mobilization, Uric Acid management.",
        color: "#d946ef",
        min_duration_hours: 30.0,
    },
    FastingPhase {
        id: 4,
        name: "Deep Repair",
        range: "30 - 48 Hours",
        description: "Immune reset, Gallbladder safety, Peak Autophagy.",
        color: "#10b981",
        min_duration_hours: 48.0,
    },
];

/// Implicit lower bound of the phase at `index`.
pub fn phase_lower_bound(phases: &[FastingPhase], index: usize) -> f64 {
    match index {
        0 => 0.0,
        i => phases
            .get(i - 1)
            .map(|p| p.min_duration_hours)
            .unwrap_or(0.0),
    }
}

pub fn phase_by_id(id: u32) -> Option<&'static FastingPhase> {
    PHASES.iter().find(|p| p.id == id)
}

/// Active phase for `elapsed_hours` in the built-in table.
///
/// Total for every input: negative and NaN readings resolve as zero, and the
/// first phase is returned if the table ever fails to match.
pub fn resolve_phase(elapsed_hours: f64) -> &'static FastingPhase {
    resolve_phase_in(PHASES, elapsed_hours).unwrap_or(&PHASES[0])
}

/// Active phase in an arbitrary table. `None` only for an empty table.
pub fn resolve_phase_in(phases: &[FastingPhase], elapsed_hours: f64) -> Option<&FastingPhase> {
    let hours = normalize_hours(elapsed_hours);
    let last = phases.len().checked_sub(1)?;

    phases
        .iter()
        .enumerate()
        .find(|(i, phase)| {
            let lower = phase_lower_bound(phases, *i);
            hours >= lower && (*i == last || hours < phase.min_duration_hours)
        })
        .map(|(_, phase)| phase)
        .or_else(|| phases.first())
}

/// Phases whose lower bound lies in `(from, to]`, in table order.
///
/// The first phase starts at 0 and is never entered this way.
pub fn phases_entered_between(from: f64, to: f64) -> Vec<&'static FastingPhase> {
    let (from, to) = (normalize_hours(from), normalize_hours(to));
    PHASES
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let lower = phase_lower_bound(PHASES, *i);
            from < lower && lower <= to
        })
        .map(|(_, phase)| phase)
        .collect()
}

/// Progress toward the next phase threshold not yet reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub target: &'static FastingPhase,
    /// Threshold of the previous phase (0 for the first).
    pub interval_start_hours: f64,
    pub hours_remaining: f64,
    /// 0.0 .. 100.0 within `[interval_start_hours, target.min_duration_hours)`.
    pub progress_percent: f64,
}

/// The phase currently being worked toward, or `None` once every phase
/// threshold has been cleared.
pub fn motivation(elapsed_hours: f64) -> Option<PhaseProgress> {
    let hours = normalize_hours(elapsed_hours);
    let index = PHASES.iter().position(|p| p.min_duration_hours > hours)?;
    let target = &PHASES[index];
    let start = phase_lower_bound(PHASES, index);

    let span = target.min_duration_hours - start;
    let percent = if span > 0.0 {
        ((hours - start) / span * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    Some(PhaseProgress {
        target,
        interval_start_hours: start,
        hours_remaining: target.min_duration_hours - hours,
        progress_percent: percent,
    })
}
