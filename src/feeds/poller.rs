use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Stopped,
}

/// Fixed-interval tick scheduler.
///
/// Owns the timer task; `stop()` and drop both disarm it. Every tick is spawned
/// as its own task, so a slow or failing tick never delays the next one, and
/// overlapping ticks may finish in any order.
pub struct Poller {
    period: Duration,
    state: PollState,
    timer: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            state: PollState::Idle,
            timer: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the timer: one tick right away, then one per period.
    ///
    /// Re-arming while already polling replaces the previous timer. Must be
    /// called from inside a tokio runtime.
    pub fn start<F, Fut>(&mut self, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.disarm();

        // The t=0 tick is detached so a `stop()` right after `start()` cannot lose it.
        tokio::spawn(tick());

        let period = self.period;
        let first = Instant::now() + period;
        self.timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                debug!("Poll tick");
                tokio::spawn(tick());
            }
        }));
        self.state = PollState::Polling;
        info!("Polling every {}s", period.as_secs_f64());
    }

    /// Disarm the timer. In-flight ticks run to completion.
    pub fn stop(&mut self) {
        if self.disarm() {
            info!("Polling stopped");
        }
        self.state = PollState::Stopped;
    }

    fn disarm(&mut self) -> bool {
        match self.timer.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.disarm();
    }
}
