use crate::feeds::dashboard_client::DashboardApi;
use crate::feeds::poller::{PollState, Poller};
use crate::models::snapshot::DashboardSnapshot;
use crate::state::publisher::{DashboardState, StatePublisher};
use crate::telemetry::feedback::{Feedback, FeedbackEvent, LogFeedback};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Live dashboard: polls the bot API and republishes what it gets.
///
/// Errors from fetches and approvals end here; they become `last_error` on the
/// published state and are never returned to the caller.
///
/// Overlapping fetches are not serialized. When a fetch outlives the poll
/// period, whichever response finishes last is the one left on display.
pub struct DashboardStore {
    api: Arc<dyn DashboardApi>,
    publisher: Arc<StatePublisher>,
    feedback: Arc<dyn Feedback>,
    poller: Poller,
}

impl DashboardStore {
    pub fn new(api: Arc<dyn DashboardApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            publisher: Arc::new(StatePublisher::new(DashboardSnapshot::placeholder())),
            feedback: Arc::new(LogFeedback),
            poller: Poller::new(poll_interval),
        }
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn publisher(&self) -> Arc<StatePublisher> {
        self.publisher.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> DashboardState {
        self.publisher.current()
    }

    pub fn poll_state(&self) -> PollState {
        self.poller.state()
    }

    /// Fetch now, then every poll interval until `stop()`.
    pub fn start(&mut self) {
        let api = self.api.clone();
        let publisher = self.publisher.clone();
        let feedback = self.feedback.clone();

        self.poller.start(move || {
            let api = api.clone();
            let publisher = publisher.clone();
            let feedback = feedback.clone();
            async move {
                refresh_once(api.as_ref(), &publisher, feedback.as_ref()).await;
            }
        });
    }

    /// Stop scheduling. A fetch already in flight still publishes.
    pub fn stop(&mut self) {
        self.poller.stop();
    }

    /// One manual fetch. Returns whether it produced a new snapshot.
    pub async fn refresh(&self) -> bool {
        refresh_once(self.api.as_ref(), &self.publisher, self.feedback.as_ref()).await
    }

    /// Post an approval. Failures are published, never retried.
    pub async fn send_approval(&self, approval_id: &str) -> bool {
        match self.api.send_approval(approval_id).await {
            Ok(()) => {
                self.feedback.notify(FeedbackEvent::ApprovalSucceeded);
                true
            }
            Err(e) => {
                warn!("Approval call failed for {approval_id}: {e}");
                self.feedback.notify(FeedbackEvent::ApprovalFailed);
                self.publisher
                    .publish_error(format!("Approval call failed: {e}"));
                false
            }
        }
    }
}

async fn refresh_once(
    api: &dyn DashboardApi,
    publisher: &StatePublisher,
    feedback: &dyn Feedback,
) -> bool {
    let _refreshing = publisher.begin_refresh();

    match api.fetch_snapshot().await {
        Ok(snapshot) => {
            debug!("Publishing snapshot: status={} phase={}", snapshot.status, snapshot.phase);
            publisher.publish_snapshot(snapshot);
            feedback.notify(FeedbackEvent::RefreshSucceeded);
            true
        }
        Err(e) => {
            warn!("Dashboard refresh failed: {e}");
            publisher.publish_error(format!("Refresh failed: {e}"));
            false
        }
    }
}
