use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of actionable signal a strategy produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Entry,
    Exit,
    StopLoss,
    TakeProfit,
}

impl SignalKind {
    /// Exit-family kinds close a position and may carry a realized P&L.
    pub fn is_exit_family(&self) -> bool {
        matches!(
            self,
            SignalKind::Exit | SignalKind::StopLoss | SignalKind::TakeProfit
        )
    }

    /// Human-facing label used in notification content.
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Entry => "Entry",
            SignalKind::Exit => "Exit",
            SignalKind::StopLoss => "Stop Loss",
            SignalKind::TakeProfit => "Take Profit",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable signal event handed over by the strategy evaluation engine.
/// Consumed exactly once per dispatch; the dispatcher never retains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub strategy_name: String,
    pub user_id: Uuid,
    pub kind: SignalKind,
    pub asset: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    /// Realized P&L percentage; meaningful only for exit-family kinds.
    pub profit_pct: Option<Decimal>,
    pub timeframe: String,
}
