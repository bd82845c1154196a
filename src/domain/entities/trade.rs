use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::trade_status::TradeStatus;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_low: f64,
    pub entry_high: f64,
    pub take_profits: Vec<f64>,
    pub stop_loss: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub pnl: Option<f64>,
    pub notes: Option<String>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// A trade that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTrade {
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_low: f64,
    pub entry_high: f64,
    pub take_profits: Vec<f64>,
    pub stop_loss: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub pnl: f64,
}

impl NewTrade {
    pub fn new(
        symbol: &str,
        direction: TradeDirection,
        entry_low: f64,
        entry_high: f64,
        take_profits: Vec<f64>,
        stop_loss: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            direction,
            entry_low,
            entry_high,
            take_profits,
            stop_loss,
            status: TradeStatus::Open.to_string(),
            // Both stores keep microseconds; truncating keeps the read-back identical.
            created_at: Utc::now().trunc_subsecs(6),
            pnl: 0.0,
        }
    }
}

/// Whitelisted patch fields. The outer `Option` is "field present in the
/// payload", the inner one (where there is one) is an explicit null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeUpdate {
    pub status: Option<String>,
    pub pnl: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
    pub closed_at: Option<Option<DateTime<Utc>>>,
}

impl TradeUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.pnl.is_none()
            && self.notes.is_none()
            && self.closed_at.is_none()
    }

    /// Stamp `closed_at` when the new status closes the trade. Overrides any
    /// caller-supplied `closed_at`.
    pub fn stamp_closed_at(&mut self, now: DateTime<Utc>) {
        if self
            .status
            .as_deref()
            .is_some_and(TradeStatus::is_closing)
        {
            self.closed_at = Some(Some(now.trunc_subsecs(6)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_trade_normalizes() {
        let t = NewTrade::new("btcusdt", TradeDirection::Long, 1.0, 2.0, vec![3.0], 0.5);
        assert_eq!(t.symbol, "BTCUSDT");
        assert_eq!(t.status, "open");
        assert_eq!(t.pnl, 0.0);
    }

    #[test]
    fn test_stamp_overrides_supplied_closed_at() {
        let supplied = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut update = TradeUpdate {
            status: Some("failed".into()),
            closed_at: Some(Some(supplied)),
            ..Default::default()
        };
        update.stamp_closed_at(now);
        assert_eq!(update.closed_at, Some(Some(now)));
    }

    #[test]
    fn test_stamp_ignores_non_closing_status() {
        let now = Utc::now();
        let mut update = TradeUpdate {
            status: Some("open".into()),
            ..Default::default()
        };
        update.stamp_closed_at(now);
        assert!(update.closed_at.is_none());
        assert!(!update.is_empty());
        assert!(TradeUpdate::default().is_empty());
    }
}
