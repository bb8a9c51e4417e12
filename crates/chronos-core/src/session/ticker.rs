//! Periodic driver for [`SessionController::tick`].
//!
//! The controller never schedules itself. A [`Ticker`] owns the tokio
//! interval and [`run_ticks`] pumps it until the session stops, the callback
//! asks to stop, or the shutdown future resolves.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

use super::clock::Clock;
use super::controller::SessionController;
use crate::events::Event;
use crate::storage::{KvStore, TimerConfig};

/// Shortest period accepted; tokio rejects a zero interval.
const MIN_PERIOD: Duration = Duration::from_millis(1);

pub struct Ticker {
    interval: Interval,
    active: bool,
}

impl Ticker {
    /// Must be called inside a tokio runtime with time enabled.
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval(period.max(MIN_PERIOD));
        // A suspended process resumes with one tick, not a burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            active: true,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(Duration::from_millis(config.tick_interval_ms))
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop delivering ticks. Pending and future `tick()` calls never resolve.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Wait for the next tick. The first tick completes immediately.
    pub async fn tick(&mut self) {
        if !self.active {
            std::future::pending::<()>().await;
        }
        self.interval.tick().await;
    }
}

/// Why [`run_ticks`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickExit {
    /// No session running, or the ticker was already stopped.
    Inactive,
    /// The shutdown future resolved.
    Shutdown,
    /// The callback returned `ControlFlow::Break`.
    Stopped,
}

/// Tick `controller` on every `ticker` period and hand each batch of events
/// to `on_tick`, including empty batches.
///
/// The loop also ends as soon as the controller leaves the running state.
pub async fn run_ticks<S, C, F, Fut>(
    controller: &mut SessionController<S, C>,
    ticker: &mut Ticker,
    shutdown: Fut,
    mut on_tick: F,
) -> TickExit
where
    S: KvStore,
    C: Clock,
    F: FnMut(&SessionController<S, C>, &[Event]) -> ControlFlow<()>,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        if !controller.is_running() || !ticker.is_active() {
            return TickExit::Inactive;
        }

        let fired = tokio::select! {
            _ = &mut shutdown => false,
            _ = ticker.tick() => true,
        };
        if !fired {
            tracing::debug!("tick loop shut down");
            return TickExit::Shutdown;
        }

        let events = controller.tick();
        if on_tick(controller, &events).is_break() {
            ticker.stop();
            return TickExit::Stopped;
        }
    }
}
