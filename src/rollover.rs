//! Midnight rollover of the active day log.
//!
//! [`RolloverTimer`] is a single-slot, re-armable deadline owned by the
//! tracker. It does not sleep on its own: [`spawn_driver`] runs a tokio task
//! that waits for the armed deadline and calls [`Tracker::tick`], and tests
//! call `tick` directly after moving a manual clock.
//!
//! [`Tracker::tick`]: crate::tracker::Tracker::tick

use crate::day_key::next_midnight;
use crate::state::AppState;
use chrono::{DateTime, Duration, Local};
use std::sync::Arc;
use tokio::{sync::Notify, task::JoinHandle};
use tracing::debug;

/// Seconds past local midnight before the rollover fires.
pub const SAFETY_MARGIN_SECS: i64 = 1;

/// Upper bound on a single driver sleep, so wall-clock jumps are noticed.
pub const MAX_SLEEP: std::time::Duration = std::time::Duration::from_secs(300);

#[derive(Debug, Default)]
pub struct RolloverTimer {
    deadline: Option<DateTime<Local>>,
    arms: u64,
    wake: Arc<Notify>,
}

impl RolloverTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending deadline with next local midnight (plus margin)
    /// relative to `now`.
    pub fn arm(&mut self, now: DateTime<Local>) -> DateTime<Local> {
        let deadline = next_midnight(&now) + Duration::seconds(SAFETY_MARGIN_SECS);
        self.deadline = Some(deadline);
        self.arms += 1;
        debug!(%deadline, arms = self.arms, "rollover armed");
        self.wake.notify_one();
        deadline
    }

    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        let pending = self.deadline.take().is_some();
        if pending {
            debug!("rollover cancelled");
            self.wake.notify_one();
        }
        pending
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.deadline
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// How many times the timer has been armed since creation.
    #[cfg(test)]
    pub fn arm_count(&self) -> u64 {
        self.arms
    }

    /// Wall time left until the deadline, zero if already due.
    pub fn remaining(&self, now: DateTime<Local>) -> Option<std::time::Duration> {
        self.deadline
            .map(|deadline| (deadline - now).to_std().unwrap_or(std::time::Duration::ZERO))
    }

    /// Consumes the deadline if it has passed. Returns true at most once per arm.
    pub fn fire_if_due(&mut self, now: DateTime<Local>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Signalled whenever the deadline is armed or cancelled.
    pub fn wake_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }
}

/// Background task driving the tracker's rollover timer.
pub struct RolloverDriver {
    handle: JoinHandle<()>,
}

impl RolloverDriver {
    /// Cancels the pending deadline and stops the task.
    pub async fn shutdown(self, state: &AppState) {
        state.tracker.lock().await.cancel_rollover();
        self.handle.abort();
        let _ = self.handle.await;
    }
}

pub fn spawn_driver(state: AppState) -> RolloverDriver {
    let handle = tokio::spawn(async move {
        let wake = state.tracker.lock().await.rollover_wake_handle();
        loop {
            let remaining = {
                let tracker = state.tracker.lock().await;
                tracker.time_until_rollover()
            };

            match remaining {
                Some(remaining) => {
                    tokio::select! {
                        _ = tokio::time::sleep(remaining.min(MAX_SLEEP)) => {
                            state.tracker.lock().await.tick();
                        }
                        _ = wake.notified() => {}
                    }
                }
                None => wake.notified().await,
            }
        }
    });

    RolloverDriver { handle }
}
