use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackEvent {
    RefreshSucceeded,
    ApprovalSucceeded,
    ApprovalFailed,
}

/// User-facing success/failure signal (haptics, toasts, sounds).
///
/// The store fires these and does not care what happens next.
pub trait Feedback: Send + Sync {
    fn notify(&self, event: FeedbackEvent);
}

/// Default hook: turns feedback into log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn notify(&self, event: FeedbackEvent) {
        match event {
            FeedbackEvent::RefreshSucceeded => tracing::debug!("feedback: refresh ok"),
            FeedbackEvent::ApprovalSucceeded => info!("feedback: approval sent"),
            FeedbackEvent::ApprovalFailed => warn!("feedback: approval failed"),
        }
    }
}
