use super::position::{Portfolio, Position};
use super::wire::{decimal, rfc3339};
use crate::error::SyncError;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete dashboard state as served by `GET /ios/dashboard`.
///
/// Wire keys are snake_case and map one-to-one onto the fields below; there is
/// no defaulting, so a missing key fails the whole decode. Unknown keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub status: String,
    #[serde(with = "rfc3339")]
    pub last_updated: DateTime<Utc>,
    pub phase: String,
    pub portfolio: Portfolio,
    /// Server order.
    pub positions: Vec<Position>,
    /// Chronological as produced; never re-sorted here.
    pub history: Vec<EquityPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
    #[serde(with = "decimal")]
    pub value: Decimal,
}

impl DashboardSnapshot {
    /// Decode a response body. Either the whole snapshot decodes or nothing does.
    pub fn from_json(body: &[u8]) -> Result<Self, SyncError> {
        let snapshot: Self = serde_json::from_slice(body)?;
        snapshot.check_unique_tickers()?;
        Ok(snapshot)
    }

    fn check_unique_tickers(&self) -> Result<(), SyncError> {
        let mut seen = HashSet::with_capacity(self.positions.len());
        for p in &self.positions {
            if !seen.insert(p.ticker.as_str()) {
                return Err(SyncError::decode(format!("duplicate ticker {}", p.ticker)));
            }
        }
        Ok(())
    }

    /// Built-in sample shown before the first successful fetch.
    pub fn placeholder() -> Self {
        Self::placeholder_at(Utc::now())
    }

    pub fn placeholder_at(now: DateTime<Utc>) -> Self {
        Self {
            status: "ONLINE".into(),
            last_updated: now,
            phase: "G-companion-read-only".into(),
            portfolio: Portfolio {
                bankroll_start: dec!(50),
                portfolio_value: dec!(50.4),
                daily_pnl: dec!(0.4),
                daily_pnl_percent: dec!(0.8),
                total_exposure: dec!(1.7),
                buying_power: dec!(48.3),
                live_trading: false,
            },
            positions: vec![
                Position {
                    ticker: "FED-RATE-25MAR".into(),
                    side: "YES".into(),
                    contracts: 1,
                    avg_price: dec!(0.48),
                    mark_price: dec!(0.52),
                    unrealized_pnl: dec!(0.04),
                    confidence: Decimal::ZERO,
                },
                Position {
                    ticker: "INFLATION-CPI".into(),
                    side: "YES".into(),
                    contracts: 1,
                    avg_price: dec!(0.44),
                    mark_price: dec!(0.41),
                    unrealized_pnl: dec!(-0.03),
                    confidence: Decimal::ZERO,
                },
            ],
            // 24 hourly points ending at `now`
            history: (0..24i64)
                .map(|i| EquityPoint {
                    timestamp: now - Duration::hours(23 - i),
                    value: dec!(50) + Decimal::from(i) * dec!(0.02),
                })
                .collect(),
        }
    }

    /// First `n` positions in server order.
    pub fn top_positions(&self, n: usize) -> &[Position] {
        &self.positions[..n.min(self.positions.len())]
    }

    pub fn position(&self, ticker: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.ticker == ticker)
    }

    pub fn latest_equity(&self) -> Option<&EquityPoint> {
        self.history.last()
    }
}
