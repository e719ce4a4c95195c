//! Pull-based snapshot access for surfaces that cannot hold a live
//! subscription, such as a home-screen widget.
//!
//! Every call answers immediately from memory. The provider asks its host to
//! come back no sooner than [`TIMELINE_REFRESH_MINUTES`] later.

use crate::config::TIMELINE_REFRESH_MINUTES;
use crate::models::snapshot::DashboardSnapshot;
use crate::state::publisher::DashboardState;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub snapshot: Arc<DashboardSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Do not ask again before this instant.
    After(DateTime<Utc>),
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    pub policy: RefreshPolicy,
}

impl Timeline {
    pub fn next_refresh(&self) -> DateTime<Utc> {
        match self.policy {
            RefreshPolicy::After(at) => at,
        }
    }
}

pub struct TimelineProvider {
    placeholder: Arc<DashboardSnapshot>,
    live: Option<watch::Receiver<DashboardState>>,
    refresh_after: Duration,
}

impl TimelineProvider {
    /// Provider with no live source; every entry carries the placeholder.
    pub fn new() -> Self {
        Self {
            placeholder: Arc::new(DashboardSnapshot::placeholder()),
            live: None,
            refresh_after: Duration::minutes(TIMELINE_REFRESH_MINUTES),
        }
    }

    /// Serve the latest published snapshot instead of the placeholder.
    pub fn with_live(mut self, live: watch::Receiver<DashboardState>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_refresh_after(mut self, refresh_after: Duration) -> Self {
        self.refresh_after = refresh_after;
        self
    }

    pub fn placeholder_entry(&self) -> TimelineEntry {
        TimelineEntry {
            date: Utc::now(),
            snapshot: self.placeholder.clone(),
        }
    }

    /// Best snapshot known right now, without touching the network.
    pub fn snapshot_entry(&self) -> TimelineEntry {
        self.entry_at(Utc::now())
    }

    /// One entry for `now`, valid until `now + refresh_after`.
    pub fn schedule_next_refresh(&self, now: DateTime<Utc>) -> Timeline {
        Timeline {
            entries: vec![self.entry_at(now)],
            policy: RefreshPolicy::After(now + self.refresh_after),
        }
    }

    fn entry_at(&self, date: DateTime<Utc>) -> TimelineEntry {
        let snapshot = match &self.live {
            Some(rx) => rx.borrow().snapshot.clone(),
            None => self.placeholder.clone(),
        };
        TimelineEntry { date, snapshot }
    }
}

impl Default for TimelineProvider {
    fn default() -> Self {
        Self::new()
    }
}
