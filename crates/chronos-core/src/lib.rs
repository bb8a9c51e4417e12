//! # Chronos Core Library
//!
//! This library provides the core logic for the Chronos fasting tracker.
//! Like the CLI built on it, it is usable without any UI: every operation is
//! a plain function or a method on [`SessionController`].
//!
//! ## Architecture
//!
//! - **Protocol**: static phase, milestone and badge tables plus pure
//!   resolvers from elapsed hours to table entries
//! - **Progress**: per-phase streak bookkeeping, persisted as JSON
//! - **Session**: a wall-clock state machine that requires the caller to
//!   periodically invoke `tick()` (see [`Ticker`])
//! - **Storage**: SQLite key-value store and TOML configuration
//! - **Insight**: optional text-generation coaching with a fixed fallback
//!
//! ## Key Components
//!
//! - [`SessionController`]: start / stop / reset / tick
//! - [`ProgressStore`]: load, merge and save [`UserProgress`]
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod insight;
pub mod logging;
pub mod progress;
pub mod protocol;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, InsightError, StorageError};
pub use events::Event;
pub use insight::{generate_insight, GeminiInsight, InsightProvider};
pub use progress::{apply_completed_session, merge, ProgressStore, UserProgress};
pub use protocol::{
    last_milestone, next_milestone, resolve_phase, Badge, FastingPhase, Milestone, BADGES,
    MILESTONES, PHASES,
};
pub use session::{
    run_ticks, Clock, ManualClock, SessionController, SessionState, SystemClock, TickExit, Ticker,
};
pub use storage::{Config, Database, KvStore, MemoryStore};
