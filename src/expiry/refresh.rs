// Recurring countdown recomputation for mounted displays
use super::time_remaining_at;
use crate::clock::Clock;
use crate::models::{Enrollment, TimeRemaining};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Recompute cadence for a visible countdown
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Owns one recurring recomputation task for one enrollment.
///
/// The task is aborted when the ticker is cancelled or dropped, so its lifetime never
/// outlives the display holding it. Must be created inside a Tokio runtime.
pub struct CountdownTicker {
    receiver: watch::Receiver<TimeRemaining>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn spawn(enrollment: Enrollment, clock: Arc<dyn Clock>, period: Duration) -> Self {
        let period = period.max(MIN_REFRESH_INTERVAL);
        let initial = time_remaining_at(clock.as_ref(), &enrollment);
        let (sender, receiver) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            if initial.expired {
                return;
            }

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the initial value is already published
            interval.tick().await;

            loop {
                interval.tick().await;
                let next = time_remaining_at(clock.as_ref(), &enrollment);
                sender.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });

                if next.expired {
                    tracing::debug!("Countdown reached expiry, stopping refresh");
                    break;
                }
            }
        });

        Self { receiver, handle }
    }

    /// Latest computed value
    pub fn current(&self) -> TimeRemaining {
        *self.receiver.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimeRemaining> {
        self.receiver.clone()
    }

    /// Wait for the next changed value. `None` once the ticker has stopped.
    pub async fn changed(&mut self) -> Option<TimeRemaining> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Mount point for a single countdown display.
///
/// Holds at most one ticker; mounting again cancels the previous one first.
#[derive(Default)]
pub struct CountdownSlot {
    ticker: Option<CountdownTicker>,
}

impl CountdownSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(
        &mut self,
        enrollment: Enrollment,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> &mut CountdownTicker {
        if let Some(previous) = self.ticker.take() {
            previous.cancel();
        }
        self.ticker.insert(CountdownTicker::spawn(enrollment, clock, period))
    }

    pub fn unmount(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn ticker(&self) -> Option<&CountdownTicker> {
        self.ticker.as_ref()
    }
}
