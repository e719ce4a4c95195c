use crate::models::snapshot::DashboardSnapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// What every presentation surface sees.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Last successfully decoded snapshot, or the placeholder.
    pub snapshot: Arc<DashboardSnapshot>,
    /// True while at least one fetch is in flight.
    pub is_refreshing: bool,
    pub last_error: Option<String>,
    in_flight: usize,
}

impl DashboardState {
    fn new(snapshot: DashboardSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            is_refreshing: false,
            last_error: None,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

/// Single owner of the published dashboard state.
///
/// All writes go through `send_modify`, so a subscriber always sees a whole
/// `DashboardState`, never half of one update. Does no I/O.
pub struct StatePublisher {
    tx: watch::Sender<DashboardState>,
}

impl StatePublisher {
    pub fn new(initial: DashboardSnapshot) -> Self {
        let (tx, _) = watch::channel(DashboardState::new(initial));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> DashboardState {
        self.tx.borrow().clone()
    }

    /// Mark a fetch as started. The flag clears when the guard drops.
    pub fn begin_refresh(&self) -> RefreshGuard<'_> {
        self.tx.send_modify(|state| {
            state.in_flight += 1;
            state.is_refreshing = true;
        });
        RefreshGuard { publisher: self }
    }

    /// Replace the snapshot and clear any error.
    pub fn publish_snapshot(&self, snapshot: DashboardSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.tx.send_modify(|state| {
            state.snapshot = snapshot;
            state.last_error = None;
        });
    }

    /// Record a failure. The current snapshot stays on display.
    pub fn publish_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.last_error = Some(message));
    }

    fn end_refresh(&self) {
        self.tx.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.is_refreshing = state.in_flight > 0;
        });
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new(DashboardSnapshot::placeholder())
    }
}

pub struct RefreshGuard<'a> {
    publisher: &'a StatePublisher,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.publisher.end_refresh();
    }
}
