use super::wire::decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One open contract position as reported by the bot.
///
/// `ticker` is the natural key within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub side: String, // "YES" / "NO"
    pub contracts: u32,
    #[serde(with = "decimal")]
    pub avg_price: Decimal,  // probability-price space, usually [0, 1]
    #[serde(with = "decimal")]
    pub mark_price: Decimal,
    #[serde(with = "decimal")]
    pub unrealized_pnl: Decimal,
    #[serde(with = "decimal")]
    pub confidence: Decimal,
}

impl Position {
    pub fn cost_basis(&self) -> Decimal {
        Decimal::from(self.contracts) * self.avg_price
    }

    pub fn market_value(&self) -> Decimal {
        Decimal::from(self.contracts) * self.mark_price
    }

    pub fn is_winning(&self) -> bool {
        self.unrealized_pnl > Decimal::ZERO
    }
}

/// Bankroll summary computed by the bot. Displayed verbatim, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(with = "decimal")]
    pub bankroll_start: Decimal,
    #[serde(with = "decimal")]
    pub portfolio_value: Decimal,
    #[serde(with = "decimal")]
    pub daily_pnl: Decimal,
    #[serde(with = "decimal")]
    pub daily_pnl_percent: Decimal,
    #[serde(with = "decimal")]
    pub total_exposure: Decimal,
    #[serde(with = "decimal")]
    pub buying_power: Decimal,
    /// True when real capital is at risk.
    pub live_trading: bool,
}

impl Portfolio {
    pub fn risk_label(&self) -> &'static str {
        if self.live_trading {
            "Live"
        } else {
            "Read-only"
        }
    }

    pub fn is_up_today(&self) -> bool {
        self.daily_pnl >= Decimal::ZERO
    }
}
