use crate::config::ServerConfig;
use crate::error::SyncError;
use crate::models::snapshot::DashboardSnapshot;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info};

pub const DASHBOARD_PATH: &str = "/ios/dashboard";
pub const APPROVAL_PATH: &str = "/execute_approved";

/// The two calls the dashboard makes against the bot API.
///
/// `DashboardClient` is the HTTP implementation; the store only sees this
/// trait so it can be driven without a server.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, SyncError>;
    async fn send_approval(&self, approval_id: &str) -> Result<(), SyncError>;
}

/// REST client for the bot's dashboard endpoints.
///
/// One `reqwest::Client` is shared by every call; nothing in it is mutated
/// after construction.
pub struct DashboardClient {
    config: ServerConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ApprovalRequest<'a> {
    approval_id: &'a str,
    approved: bool,
}

impl DashboardClient {
    pub fn new(config: ServerConfig) -> Result<Self, SyncError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Some(std::time::Duration::from_secs(30)));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SyncError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the bearer token when one is configured. No token is not an error.
    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_token.as_deref() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    fn dashboard_request(&self) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.endpoint(DASHBOARD_PATH)))
    }

    fn approval_request(&self, approval_id: &str) -> reqwest::RequestBuilder {
        let body = ApprovalRequest {
            approval_id,
            approved: true,
        };
        self.authorize(self.http.post(self.endpoint(APPROVAL_PATH)))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
    }

    /// Fetch and decode one dashboard snapshot. Never retries.
    pub async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, SyncError> {
        let started = Instant::now();
        let resp = self.dashboard_request().send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let snapshot = DashboardSnapshot::from_json(&body)?;

        debug!(
            "Dashboard fetched in {}ms: status={} positions={} history={}",
            started.elapsed().as_millis(),
            snapshot.status,
            snapshot.positions.len(),
            snapshot.history.len()
        );
        Ok(snapshot)
    }

    /// Post an approval for `approval_id`. The response body is not read.
    pub async fn send_approval(&self, approval_id: &str) -> Result<(), SyncError> {
        let resp = self.approval_request(approval_id).send().await?;

        let status = resp.status();
        if status.is_success() {
            info!("Approval {approval_id} accepted: HTTP {status}");
            Ok(())
        } else {
            error!("Approval {approval_id} failed: HTTP {status}");
            Err(SyncError::Server {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn fetch_snapshot(&self) -> Result<DashboardSnapshot, SyncError> {
        DashboardClient::fetch_snapshot(self).await
    }

    async fn send_approval(&self, approval_id: &str) -> Result<(), SyncError> {
        DashboardClient::send_approval(self, approval_id).await
    }
}
