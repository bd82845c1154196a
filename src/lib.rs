pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

use crate::application::stats::{StatsUseCase, TradeStats};
use crate::application::trade::{TradePage, TradeUseCase};
use crate::config::{Backend, Config};
use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::TradeRepository;
use crate::domain::values::page::PageRequest;
use crate::infrastructure::sqlite::trade_repo::SqliteTradeRepo;
use crate::infrastructure::supabase::trade_repo::SupabaseTradeRepo;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// The trade journal service. Built once at startup around a single
/// repository and shared by every request.
pub struct TradeLedger {
    backend: &'static str,
    trade_uc: TradeUseCase,
    stats_uc: StatsUseCase,
}

impl TradeLedger {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let repo: Arc<dyn TradeRepository> = match &config.backend {
            Backend::Sqlite { path } => Arc::new(SqliteTradeRepo::open(path)?),
            Backend::Supabase { url, key } => Arc::new(SupabaseTradeRepo::new(url, key.clone())),
        };
        info!(backend = repo.backend(), "trade store ready");
        Ok(Self::with_repository(repo))
    }

    pub fn open_sqlite(db_path: &str) -> Result<Self, DomainError> {
        Ok(Self::with_repository(Arc::new(SqliteTradeRepo::open(db_path)?)))
    }

    pub fn with_repository(repo: Arc<dyn TradeRepository>) -> Self {
        Self {
            backend: repo.backend(),
            trade_uc: TradeUseCase::new(repo.clone()),
            stats_uc: StatsUseCase::new(repo),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub async fn create(&self, payload: &Value) -> Result<Trade, DomainError> {
        self.trade_uc.create(payload).await
    }

    pub async fn list(
        &self,
        page: PageRequest,
        status: Option<String>,
    ) -> Result<TradePage, DomainError> {
        self.trade_uc.list(page, status).await
    }

    pub async fn get(&self, id: i64) -> Result<Trade, DomainError> {
        self.trade_uc.get(id).await
    }

    pub async fn patch(&self, id: i64, payload: &Value) -> Result<Trade, DomainError> {
        self.trade_uc.patch(id, payload).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.trade_uc.delete(id).await
    }

    pub async fn stats(&self) -> Result<TradeStats, DomainError> {
        self.stats_uc.stats().await
    }
}
