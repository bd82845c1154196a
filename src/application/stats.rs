use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::{TradeOutcomeRow, TradeRepository};
use crate::domain::values::trade_status::TradeStatus;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_pnl: f64,
}

impl TradeStats {
    /// Aggregate over every trade regardless of status. Null pnl counts as 0.
    pub fn from_rows(rows: &[TradeOutcomeRow]) -> Self {
        let count = |status: TradeStatus| rows.iter().filter(|r| r.status == status.as_str()).count();
        let total_pnl: f64 = rows.iter().map(|r| r.pnl.unwrap_or(0.0)).sum();
        Self {
            total: rows.len(),
            wins: count(TradeStatus::Success),
            losses: count(TradeStatus::Failed),
            total_pnl: round4(total_pnl),
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub struct StatsUseCase {
    repo: Arc<dyn TradeRepository>,
}

impl StatsUseCase {
    pub fn new(repo: Arc<dyn TradeRepository>) -> Self {
        Self { repo }
    }

    pub async fn stats(&self) -> Result<TradeStats, DomainError> {
        let rows = self.repo.outcomes().await?;
        Ok(TradeStats::from_rows(&rows))
    }
}
