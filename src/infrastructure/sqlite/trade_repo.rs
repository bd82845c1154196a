use crate::domain::entities::trade::{NewTrade, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::*;
use crate::infrastructure::sqlite::migrations::run_migrations;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const SELECT_COLS: &str = "id, symbol, direction, entry_low, entry_high, take_profits, stop_loss, status, created_at, closed_at, pnl, notes";

pub struct SqliteTradeRepo {
    conn: Mutex<Connection>,
}

impl SqliteTradeRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(db_path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        run_migrations(&conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn row_to_trade(row: &rusqlite::Row) -> Result<Trade, rusqlite::Error> {
        let dir_str: String = row.get(2)?;
        let tps_str: String = row.get(5)?;
        let status: Option<String> = row.get(7)?;
        let created_str: String = row.get(8)?;
        let closed_str: Option<String> = row.get(9)?;

        Ok(Trade {
            id: row.get(0)?,
            symbol: row.get(1)?,
            direction: dir_str
                .parse()
                .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, e.into()))?,
            entry_low: row.get(3)?,
            entry_high: row.get(4)?,
            take_profits: serde_json::from_str(&tps_str)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
            stop_loss: row.get(6)?,
            status: status.unwrap_or_default(),
            created_at: parse_timestamp(8, &created_str)?,
            closed_at: closed_str
                .map(|s| parse_timestamp(9, &s))
                .transpose()?,
            pnl: row.get(10)?,
            notes: row.get(11)?,
        })
    }
}

/// Fixed microsecond precision so text order matches time order.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[async_trait]
impl TradeRepository for SqliteTradeRepo {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, DomainError> {
        let conn = self.lock()?;
        let take_profits = serde_json::to_string(&trade.take_profits)
            .map_err(|e| DomainError::Parse(e.to_string()))?;
        conn.execute(
            "INSERT INTO trades (symbol, direction, entry_low, entry_high, take_profits, stop_loss, status, created_at, pnl)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                trade.symbol,
                trade.direction.to_string(),
                trade.entry_low,
                trade.entry_high,
                take_profits,
                trade.stop_loss,
                trade.status,
                format_timestamp(&trade.created_at),
                trade.pnl,
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add trade: {e}")))?;
        let id = conn.last_insert_rowid();
        debug!(id, symbol = %trade.symbol, "inserted trade");

        let sql = format!("SELECT {SELECT_COLS} FROM trades WHERE id = ?1");
        conn.query_row(&sql, params![id], Self::row_to_trade)
            .map_err(|e| DomainError::Database(format!("Failed to read back trade {id}: {e}")))
    }

    async fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        let conn = self.lock()?;
        let mut sql = format!("SELECT {SELECT_COLS} FROM trades WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = &filter.status {
            sql.push_str(&format!(" AND status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status.clone()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");
        if filter.limit.is_some() || filter.offset.is_some() {
            // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
            sql.push_str(&format!(" LIMIT ?{}", param_values.len() + 1));
            param_values.push(Box::new(filter.limit.unwrap_or(-1)));
            sql.push_str(&format!(" OFFSET ?{}", param_values.len() + 1));
            param_values.push(Box::new(filter.offset.unwrap_or(0)));
        }

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let trades = stmt
            .query_map(params_refs.as_slice(), Self::row_to_trade)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trades)
    }

    async fn count_trades(&self, status: Option<&str>) -> Result<i64, DomainError> {
        let conn = self.lock()?;
        let total: i64 = match status {
            Some(status) => conn.query_row(
                "SELECT COUNT(*) FROM trades WHERE status = ?1",
                params![status],
                |r| r.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM trades", [], |r| r.get(0))?,
        };
        Ok(total)
    }

    async fn get_trade(&self, id: i64) -> Result<Option<Trade>, DomainError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {SELECT_COLS} FROM trades WHERE id = ?1");
        let trade = conn
            .query_row(&sql, params![id], Self::row_to_trade)
            .optional()?;
        Ok(trade)
    }

    async fn update_trade(&self, id: i64, update: &TradeUpdate) -> Result<(), DomainError> {
        let mut sets: Vec<&str> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = &update.status {
            sets.push("status");
            param_values.push(Box::new(status.clone()));
        }
        if let Some(pnl) = update.pnl {
            sets.push("pnl");
            param_values.push(Box::new(pnl));
        }
        if let Some(notes) = &update.notes {
            sets.push("notes");
            param_values.push(Box::new(notes.clone()));
        }
        if let Some(closed_at) = &update.closed_at {
            sets.push("closed_at");
            param_values.push(Box::new(closed_at.as_ref().map(format_timestamp)));
        }
        if sets.is_empty() {
            return Ok(());
        }

        let assignments: Vec<String> = sets
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE trades SET {} WHERE id = ?{}",
            assignments.join(", "),
            param_values.len() + 1
        );
        param_values.push(Box::new(id));

        let conn = self.lock()?;
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())
            .map_err(|e| DomainError::Database(format!("Failed to update trade: {e}")))?;
        Ok(())
    }

    async fn delete_trade(&self, id: i64) -> Result<(), DomainError> {
        let conn = self.lock()?;
        let rows = conn
            .execute("DELETE FROM trades WHERE id = ?1", params![id])
            .map_err(|e| DomainError::Database(format!("Failed to delete trade: {e}")))?;
        debug!(id, rows, "deleted trade");
        Ok(())
    }

    async fn outcomes(&self) -> Result<Vec<TradeOutcomeRow>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT status, pnl FROM trades")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TradeOutcomeRow {
                    status: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    pnl: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
