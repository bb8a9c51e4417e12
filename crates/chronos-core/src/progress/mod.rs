//! Streak bookkeeping.
//!
//! [`UserProgress`] is the only persisted, mutable entity. It changes once
//! per completed fasting session, through [`apply_completed_session`], and is
//! reconciled against the current phase table on load with [`merge`].

mod store;

pub use store::ProgressStore;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::protocol::{unlocked_badges_in, Badge, FastingPhase, BADGES};

/// Per-phase streak counters and session totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Phase id to number of completed sessions that reached it.
    #[serde(default)]
    pub streaks: BTreeMap<u32, u32>,
    /// Badge ids carried from older records. Unlock state is derived from
    /// `streaks`, never from this list.
    #[serde(default)]
    pub badges: Vec<String>,
    /// Sessions that cleared at least one phase threshold.
    #[serde(default)]
    pub total_fasts: u32,
}

impl UserProgress {
    /// First-run state: every phase at zero.
    pub fn initial(phases: &[FastingPhase]) -> Self {
        Self {
            streaks: phases.iter().map(|p| (p.id, 0)).collect(),
            ..Self::default()
        }
    }

    pub fn streak(&self, phase_id: u32) -> u32 {
        self.streaks.get(&phase_id).copied().unwrap_or(0)
    }

    /// Best streak across all phases, 0 when there are none.
    pub fn max_streak(&self) -> u32 {
        self.streaks.values().copied().max().unwrap_or(0)
    }

    /// Badges unlocked by the current best streak.
    pub fn unlocked_badges(&self) -> Vec<&'static Badge> {
        unlocked_badges_in(BADGES, self.max_streak())
    }
}

/// Ensure every phase in `phases` has a streak entry, defaulting to 0.
///
/// Existing counts (including ids no longer in the table), badges and totals
/// are kept as they are, so the operation is idempotent.
pub fn merge(mut loaded: UserProgress, phases: &[FastingPhase]) -> UserProgress {
    for phase in phases {
        loaded.streaks.entry(phase.id).or_insert(0);
    }
    loaded
}

/// Ids of the phases whose threshold `hours_fasted` reached.
pub fn qualifying_phases(hours_fasted: f64, phases: &[FastingPhase]) -> Vec<u32> {
    phases
        .iter()
        .filter(|p| p.min_duration_hours <= hours_fasted)
        .map(|p| p.id)
        .collect()
}

/// Record a finished session of `hours_fasted`.
///
/// Every reached phase gains one streak and `total_fasts` grows by one if any
/// phase qualified. A session short of every threshold returns a value equal
/// to the input.
pub fn apply_completed_session(
    progress: &UserProgress,
    hours_fasted: f64,
    phases: &[FastingPhase],
) -> UserProgress {
    let reached = qualifying_phases(hours_fasted, phases);
    let mut next = progress.clone();
    if reached.is_empty() {
        return next;
    }

    for id in reached {
        let streak = next.streaks.entry(id).or_insert(0);
        *streak = streak.saturating_add(1);
    }
    next.total_fasts = next.total_fasts.saturating_add(1);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PHASES;
    use proptest::prelude::*;

    fn progress_with(streaks: &[(u32, u32)]) -> UserProgress {
        UserProgress {
            streaks: streaks.iter().copied().collect(),
            ..UserProgress::default()
        }
    }

    #[test]
    fn initial_has_every_phase_at_zero() {
        let p = UserProgress::initial(PHASES);
        assert_eq!(p.streaks.len(), 4);
        assert!(p.streaks.values().all(|&s| s == 0));
        assert_eq!(p.total_fasts, 0);
        assert!(p.badges.is_empty());
    }

    #[test]
    fn merge_fills_missing_phases() {
        let merged = merge(progress_with(&[(1, 3), (2, 1)]), PHASES);
        let expected: BTreeMap<u32, u32> = [(1, 3), (2, 1), (3, 0), (4, 0)].into_iter().collect();
        assert_eq!(merged.streaks, expected);
    }

    #[test]
    fn merge_keeps_other_fields() {
        let mut loaded = progress_with(&[(1, 2), (9, 5)]);
        loaded.total_fasts = 7;
        loaded.badges = vec!["bronze_7".into()];
        let merged = merge(loaded, PHASES);
        assert_eq!(merged.total_fasts, 7);
        assert_eq!(merged.badges, vec!["bronze_7".to_string()]);
        assert_eq!(merged.streak(9), 5);
    }

    #[test]
    fn short_session_is_a_no_op() {
        let before = UserProgress::initial(PHASES);
        let after = apply_completed_session(&before, 7.99, PHASES);
        assert_eq!(after, before);
    }

    #[test]
    fn thirty_hours_clears_three_phases() {
        let after = apply_completed_session(&UserProgress::initial(PHASES), 30.0, PHASES);
        assert_eq!(after.streak(1), 1);
        assert_eq!(after.streak(2), 1);
        assert_eq!(after.streak(3), 1);
        assert_eq!(after.streak(4), 0);
        assert_eq!(after.total_fasts, 1);
    }

    #[test]
    fn input_is_not_mutated() {
        let before = UserProgress::initial(PHASES);
        let _ = apply_completed_session(&before, 48.0, PHASES);
        assert_eq!(before.max_streak(), 0);
    }

    #[test]
    fn badges_follow_best_streak() {
        assert!(progress_with(&[(1, 6), (2, 6)]).unlocked_badges().is_empty());
        let ids: Vec<_> = progress_with(&[(1, 3), (3, 15)])
            .unlocked_badges()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["bronze_7", "silver_14"]);
        assert!(UserProgress::default().unlocked_badges().is_empty());
    }

    #[test]
    fn json_shape_matches_stored_records() {
        let json = r#"{"streaks":{"1":3,"2":1},"badges":[],"totalFasts":4}"#;
        let parsed: UserProgress = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.streak(1), 3);
        assert_eq!(parsed.total_fasts, 4);

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["streaks"]["1"], 3);
        assert_eq!(out["totalFasts"], 4);
    }

    fn arb_progress() -> impl Strategy<Value = UserProgress> {
        (
            proptest::collection::btree_map(1u32..8, 0u32..400, 0..6),
            0u32..1000,
        )
            .prop_map(|(streaks, total_fasts)| UserProgress {
                streaks,
                total_fasts,
                ..UserProgress::default()
            })
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(p in arb_progress()) {
            let once = merge(p, PHASES);
            let twice = merge(once.clone(), PHASES);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn completed_session_is_monotone(p in arb_progress(), hours in 0.0f64..100.0) {
            let p = merge(p, PHASES);
            let next = apply_completed_session(&p, hours, PHASES);
            for (id, before) in &p.streaks {
                prop_assert!(next.streak(*id) >= *before);
            }
            let expected = if hours >= 8.0 { p.total_fasts + 1 } else { p.total_fasts };
            prop_assert_eq!(next.total_fasts, expected);
        }

        #[test]
        fn raising_a_streak_never_locks_a_badge(p in arb_progress(), id in 1u32..5, bump in 0u32..100) {
            let before: Vec<_> = p.unlocked_badges().iter().map(|b| b.id).collect();
            let mut raised = p.clone();
            *raised.streaks.entry(id).or_insert(0) += bump;
            let after: Vec<_> = raised.unlocked_badges().iter().map(|b| b.id).collect();
            for badge in before {
                prop_assert!(after.contains(&badge));
            }
        }
    }
}
