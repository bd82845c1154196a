use crate::domain::entities::trade::{NewTrade, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub status: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// The two columns the stats aggregate needs.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct TradeOutcomeRow {
    pub status: String,
    pub pnl: Option<f64>,
}

/// Persistence contract shared by every backend. Results are ordered newest
/// first (`created_at` then `id`, both descending).
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
    async fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, DomainError>;
    async fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError>;
    async fn count_trades(&self, status: Option<&str>) -> Result<i64, DomainError>;
    async fn get_trade(&self, id: i64) -> Result<Option<Trade>, DomainError>;
    async fn update_trade(&self, id: i64, update: &TradeUpdate) -> Result<(), DomainError>;
    /// Deleting an unknown id is not an error.
    async fn delete_trade(&self, id: i64) -> Result<(), DomainError>;
    async fn outcomes(&self) -> Result<Vec<TradeOutcomeRow>, DomainError>;
}
