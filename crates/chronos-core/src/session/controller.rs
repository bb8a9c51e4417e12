//! Session controller.
//!
//! Owns the running fast and the user's progress. It does not use internal
//! threads or timers: the caller drives `tick()` (see [`super::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//!   ^                |
//!   +-----reset------+
//! ```
//!
//! Every public operation is safe to call from either state. Transitions
//! that do not apply return `None` and change nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::events::Event;
use crate::progress::{apply_completed_session, qualifying_phases, ProgressStore, UserProgress};
use crate::protocol::{
    hours_until, last_milestone, metabolic_mode, milestones_between, motivation, next_milestone,
    organ_states, phases_entered_between, resolve_phase, FastingPhase, PHASES,
};
use crate::storage::{KvStore, FAST_START_KEY};

const DEFAULT_TARGET_SECONDS: u64 = 48 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
}

pub struct SessionController<S, C> {
    store: S,
    clock: C,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    /// Cached `now - started_at`, refreshed by `tick()`.
    elapsed_seconds: u64,
    progress: UserProgress,
    target_seconds: u64,
    /// Elapsed hours already reported by `tick()`; crossings are detected
    /// in `(seen_hours, now]`.
    seen_hours: f64,
}

impl<S: KvStore, C: Clock> SessionController<S, C> {
    /// Load progress and reattach to a persisted session, if any.
    pub fn new(store: S, clock: C) -> Self {
        let progress = ProgressStore::new(&store).load();
        let mut controller = Self {
            store,
            clock,
            state: SessionState::Idle,
            started_at: None,
            elapsed_seconds: 0,
            progress,
            target_seconds: DEFAULT_TARGET_SECONDS,
            seen_hours: 0.0,
        };
        controller.restore();
        controller
    }

    /// Duration that counts as a full run for `target_progress_pct`.
    pub fn with_target_seconds(mut self, seconds: u64) -> Self {
        self.target_seconds = seconds.max(1);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn elapsed_hours(&self) -> f64 {
        self.elapsed_seconds as f64 / 3600.0
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn current_phase(&self) -> &'static FastingPhase {
        resolve_phase(self.elapsed_hours())
    }

    /// 0.0 .. 100.0 of the target duration.
    pub fn target_progress_pct(&self) -> f64 {
        (self.elapsed_seconds as f64 / self.target_seconds as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let hours = self.elapsed_hours();
        let next = next_milestone(hours);
        Event::StateSnapshot {
            state: self.state,
            started_at: self.started_at,
            elapsed_seconds: self.elapsed_seconds,
            elapsed_hours: hours,
            target_progress_pct: self.target_progress_pct(),
            phase: self.current_phase(),
            last_milestone: last_milestone(hours),
            next_milestone: next,
            hours_to_next_milestone: next.map(|m| hours_until(m, hours)),
            mode: metabolic_mode(hours),
            organs: organ_states(hours),
            motivation: motivation(hours),
            streaks: self.progress.streaks.clone(),
            total_fasts: self.progress.total_fasts,
            unlocked_badges: self.progress.unlocked_badges().iter().map(|b| b.id).collect(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fast. A no-op while one is already running, keeping the
    /// original start.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }

        let now = self.clock.now();
        self.state = SessionState::Running;
        self.started_at = Some(now);
        self.elapsed_seconds = 0;
        self.seen_hours = 0.0;

        if let Err(e) = self
            .store
            .set(FAST_START_KEY, &now.timestamp_millis().to_string())
        {
            tracing::warn!(error = %e, "failed to persist fast start time");
        }
        tracing::info!(started_at = %now, "fast started");

        Some(Event::FastStarted { started_at: now })
    }

    /// End the running fast and credit every phase threshold it reached.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }

        let now = self.clock.now();
        self.refresh_elapsed(now);
        let elapsed_seconds = self.elapsed_seconds;
        let hours_fasted = elapsed_seconds as f64 / 3600.0;

        let completed_phase_ids = qualifying_phases(hours_fasted, PHASES);
        let next = apply_completed_session(&self.progress, hours_fasted, PHASES);
        if next != self.progress {
            if let Err(e) = ProgressStore::new(&self.store).save(&next) {
                tracing::warn!(error = %e, "failed to persist user progress");
            }
            self.progress = next;
        }

        self.clear_session();
        tracing::info!(
            hours_fasted,
            phases = ?completed_phase_ids,
            total_fasts = self.progress.total_fasts,
            "fast stopped"
        );

        Some(Event::FastStopped {
            elapsed_seconds,
            hours_fasted,
            completed_phase_ids,
            total_fasts: self.progress.total_fasts,
            at: now,
        })
    }

    /// Discard the timer from any state. Progress is untouched.
    pub fn reset(&mut self) -> Option<Event> {
        self.clear_session();
        tracing::info!("fast reset");
        Some(Event::FastReset {
            at: self.clock.now(),
        })
    }

    /// Clear all streak history back to the first-run state.
    pub fn reset_progress(&mut self) -> crate::error::Result<&UserProgress> {
        self.progress = ProgressStore::new(&self.store).reset()?;
        Ok(&self.progress)
    }

    /// Refresh `elapsed_seconds` from the clock. Call periodically while
    /// running.
    ///
    /// Returns phase and milestone crossings since the previous tick. Never
    /// changes progress.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running() {
            return Vec::new();
        }

        let now = self.clock.now();
        self.refresh_elapsed(now);
        let hours = self.elapsed_hours();
        tracing::trace!(elapsed_seconds = self.elapsed_seconds, "tick");

        // A clock that steps backwards reports nothing until it passes
        // `seen_hours` again.
        let from = self.seen_hours;
        self.seen_hours = from.max(hours);
        let elapsed_seconds = self.elapsed_seconds;

        let mut events: Vec<Event> = phases_entered_between(from, hours)
            .into_iter()
            .map(|phase| Event::PhaseEntered {
                phase,
                elapsed_seconds,
                at: now,
            })
            .collect();
        events.extend(
            milestones_between(from, hours)
                .iter()
                .map(|milestone| Event::MilestoneReached {
                    milestone,
                    elapsed_seconds,
                    at: now,
                }),
        );

        for event in &events {
            tracing::debug!(kind = event.kind(), "session event");
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restore(&mut self) {
        let raw = match self.store.get(FAST_START_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read fast start time");
                return;
            }
        };

        let started_at = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);

        match started_at {
            Some(started_at) => {
                self.state = SessionState::Running;
                self.started_at = Some(started_at);
                self.refresh_elapsed(self.clock.now());
                // Crossings before the restart are not replayed.
                self.seen_hours = self.elapsed_hours();
                tracing::info!(%started_at, elapsed_seconds = self.elapsed_seconds, "restored running fast");
            }
            None => {
                tracing::warn!(value = %raw, "discarding unparsable fast start time");
                if let Err(e) = self.store.remove(FAST_START_KEY) {
                    tracing::warn!(error = %e, "failed to clear fast start time");
                }
            }
        }
    }

    fn refresh_elapsed(&mut self, now: DateTime<Utc>) {
        self.elapsed_seconds = match self.started_at {
            Some(start) => {
                let ms = (now - start).num_milliseconds().max(0) as u64;
                ms / 1000
            }
            None => 0,
        };
    }

    fn clear_session(&mut self) {
        self.state = SessionState::Idle;
        self.started_at = None;
        self.elapsed_seconds = 0;
        self.seen_hours = 0.0;
        if let Err(e) = self.store.remove(FAST_START_KEY) {
            tracing::warn!(error = %e, "failed to clear fast start time");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ManualClock;
    use crate::protocol::MILESTONES;
    use crate::storage::{MemoryStore, PROGRESS_KEY};
    use chrono::Duration;

    const T0: i64 = 1_700_000_000_000;

    fn controller(kv: &MemoryStore) -> SessionController<&MemoryStore, ManualClock> {
        SessionController::new(kv, ManualClock::at_millis(T0))
    }

    #[test]
    fn starts_idle_on_first_run() {
        let kv = MemoryStore::new();
        let c = controller(&kv);
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.elapsed_seconds(), 0);
        assert_eq!(c.progress(), &UserProgress::initial(PHASES));
    }

    #[test]
    fn start_persists_timestamp() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        assert!(c.start().is_some());
        assert!(c.is_running());
        assert_eq!(kv.get(FAST_START_KEY).unwrap(), Some(T0.to_string()));
    }

    #[test]
    fn second_start_keeps_original_timestamp() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(2));
        assert!(c.start().is_none());
        assert_eq!(c.started_at().unwrap().timestamp_millis(), T0);
        assert_eq!(kv.get(FAST_START_KEY).unwrap(), Some(T0.to_string()));
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        assert!(c.stop().is_none());
        assert!(kv.get(FAST_START_KEY).unwrap().is_none());
        assert!(kv.get(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn tick_floors_elapsed_seconds() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::milliseconds(2_999));
        c.tick();
        assert_eq!(c.elapsed_seconds(), 2);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.clock().advance(Duration::hours(10));
        assert!(c.tick().is_empty());
        assert_eq!(c.elapsed_seconds(), 0);
    }

    #[test]
    fn clock_before_start_reads_zero() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::seconds(-30));
        c.tick();
        assert_eq!(c.elapsed_seconds(), 0);
    }

    #[test]
    fn tick_never_touches_progress() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(50));
        c.tick();
        assert_eq!(c.progress().max_streak(), 0);
        assert!(kv.get(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn tick_reports_crossings_once() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();

        c.clock().advance(Duration::minutes(20));
        assert!(c.tick().is_empty());

        c.clock().advance(Duration::minutes(10));
        let events = c.tick();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::MilestoneReached { milestone, .. } if milestone.hour == 0.5));
        assert!(c.tick().is_empty());

        c.clock().set(DateTime::from_timestamp_millis(T0).unwrap() + Duration::hours(8));
        let kinds: Vec<_> = c.tick().iter().map(Event::kind).collect();
        assert_eq!(kinds[0], "phase_entered");
        assert_eq!(kinds.iter().filter(|k| **k == "milestone_reached").count(), 7);
        assert!(c.tick().is_empty());
    }

    fn crossings(events: &[Event]) -> (Vec<u32>, Vec<f64>) {
        let mut phases = Vec::new();
        let mut milestones = Vec::new();
        for event in events {
            match event {
                Event::PhaseEntered { phase, .. } => phases.push(phase.id),
                Event::MilestoneReached { milestone, .. } => milestones.push(milestone.hour),
                other => panic!("unexpected event {other:?}"),
            }
        }
        (phases, milestones)
    }

    #[test]
    fn tick_after_a_long_gap_reports_every_crossing() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(20));

        let (phases, milestones) = crossings(&c.tick());
        assert_eq!(phases, vec![2, 3]);
        let expected: Vec<f64> = MILESTONES
            .iter()
            .map(|m| m.hour)
            .filter(|h| *h <= 20.0)
            .collect();
        assert_eq!(milestones.len(), 20);
        assert_eq!(milestones, expected);
        assert!(c.tick().is_empty());
    }

    #[test]
    fn clock_stepping_back_does_not_replay() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(9));
        assert!(!c.tick().is_empty());

        c.clock().advance(Duration::hours(-2));
        assert!(c.tick().is_empty());
        c.clock().advance(Duration::hours(2));
        assert!(c.tick().is_empty());

        c.clock().advance(Duration::hours(1));
        let (phases, milestones) = crossings(&c.tick());
        assert!(phases.is_empty());
        assert_eq!(milestones, vec![10.0]);
    }

    #[test]
    fn stop_credits_reached_phases_and_clears_session() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(19));

        match c.stop() {
            Some(Event::FastStopped {
                completed_phase_ids,
                total_fasts,
                elapsed_seconds,
                ..
            }) => {
                assert_eq!(completed_phase_ids, vec![1, 2]);
                assert_eq!(total_fasts, 1);
                assert_eq!(elapsed_seconds, 19 * 3600);
            }
            other => panic!("expected FastStopped, got {other:?}"),
        }

        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.elapsed_seconds(), 0);
        assert!(kv.get(FAST_START_KEY).unwrap().is_none());
        let stored: UserProgress =
            serde_json::from_str(&kv.get(PROGRESS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.streak(2), 1);
    }

    #[test]
    fn short_fast_writes_no_progress() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(3));
        let event = c.stop();
        assert!(matches!(event, Some(Event::FastStopped { total_fasts: 0, .. })));
        assert!(kv.get(PROGRESS_KEY).unwrap().is_none());
        assert!(!c.is_running());
    }

    #[test]
    fn stop_uses_fresh_clock_not_stale_tick() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(1));
        c.tick();
        c.clock().advance(Duration::hours(8));
        c.stop();
        assert_eq!(c.progress().streak(1), 1);
    }

    #[test]
    fn reset_discards_timer_but_keeps_history() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(9));
        c.stop();
        c.start();
        c.clock().advance(Duration::hours(20));
        c.tick();

        assert!(matches!(c.reset(), Some(Event::FastReset { .. })));
        assert_eq!(c.state(), SessionState::Idle);
        assert_eq!(c.elapsed_seconds(), 0);
        assert!(c.started_at().is_none());
        assert!(kv.get(FAST_START_KEY).unwrap().is_none());
        assert_eq!(c.progress().streak(1), 1);
        assert_eq!(c.progress().total_fasts, 1);
    }

    #[test]
    fn reset_from_idle_is_harmless() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        assert!(c.reset().is_some());
        assert_eq!(c.state(), SessionState::Idle);
    }

    #[test]
    fn restores_running_session() {
        let kv = MemoryStore::new();
        kv.set(FAST_START_KEY, &T0.to_string()).unwrap();
        let clock = ManualClock::at_millis(T0 + 5 * 3600 * 1000 + 500);
        let mut c = SessionController::new(&kv, clock);
        assert!(c.is_running());
        assert_eq!(c.elapsed_seconds(), 5 * 3600);
        // Milestones before the restart are not replayed.
        assert!(c.tick().is_empty());
    }

    #[test]
    fn unparsable_timestamp_is_discarded() {
        let kv = MemoryStore::new();
        kv.set(FAST_START_KEY, "yesterday").unwrap();
        let c = controller(&kv);
        assert!(!c.is_running());
        assert!(kv.get(FAST_START_KEY).unwrap().is_none());
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(24));
        c.tick();
        match c.snapshot() {
            Event::StateSnapshot {
                state,
                phase,
                last_milestone,
                next_milestone,
                target_progress_pct,
                ..
            } => {
                assert_eq!(state, SessionState::Running);
                assert_eq!(phase.id, 3);
                assert_eq!(last_milestone.unwrap().title, "Peak BDNF");
                assert_eq!(next_milestone.unwrap().hour, 25.0);
                assert!((target_progress_pct - 50.0).abs() < 1e-9);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn target_progress_follows_configured_target() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv).with_target_seconds(24 * 3600);
        c.start();
        c.clock().advance(Duration::hours(12));
        c.tick();
        assert!((c.target_progress_pct() - 50.0).abs() < 1e-9);
        c.clock().advance(Duration::hours(30));
        c.tick();
        assert_eq!(c.target_progress_pct(), 100.0);
    }

    #[test]
    fn reset_progress_clears_history() {
        let kv = MemoryStore::new();
        let mut c = controller(&kv);
        c.start();
        c.clock().advance(Duration::hours(30));
        c.stop();
        assert_eq!(c.progress().streak(3), 1);
        c.reset_progress().unwrap();
        assert_eq!(c.progress(), &UserProgress::initial(PHASES));
    }
}
