use crate::domain::entities::trade::{NewTrade, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::{TradeFilter, TradeRepository};
use crate::domain::values::page::PageRequest;
use crate::domain::values::trade_direction::TradeDirection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub const REQUIRED_FIELDS: [&str; 6] = [
    "symbol",
    "direction",
    "entry_low",
    "entry_high",
    "take_profits",
    "stop_loss",
];

#[derive(Debug, Clone, Serialize)]
pub struct TradePage {
    pub trades: Vec<Trade>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

pub struct TradeUseCase {
    repo: Arc<dyn TradeRepository>,
}

impl TradeUseCase {
    pub fn new(repo: Arc<dyn TradeRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: &Value) -> Result<Trade, DomainError> {
        let new_trade = parse_new_trade(payload)?;
        let trade = self.repo.insert_trade(&new_trade).await?;
        info!(id = trade.id, symbol = %trade.symbol, direction = %trade.direction, "trade created");
        Ok(trade)
    }

    /// One page of trades, newest first. An empty status means no filter.
    pub async fn list(
        &self,
        page: PageRequest,
        status: Option<String>,
    ) -> Result<TradePage, DomainError> {
        let status = status.filter(|s| !s.is_empty());
        let total = self.repo.count_trades(status.as_deref()).await?;
        let trades = self
            .repo
            .list_trades(&TradeFilter {
                status,
                offset: Some(page.offset()),
                limit: Some(page.per_page()),
            })
            .await?;

        Ok(TradePage {
            trades,
            total,
            page: page.page(),
            per_page: page.per_page(),
            total_pages: page.total_pages(total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<Trade, DomainError> {
        self.repo
            .get_trade(id)
            .await?
            .ok_or_else(DomainError::trade_not_found)
    }

    pub async fn patch(&self, id: i64, payload: &Value) -> Result<Trade, DomainError> {
        let existing = self.get(id).await?;
        let mut update = parse_update(payload)?;
        if update.is_empty() {
            return Ok(existing);
        }

        update.stamp_closed_at(Utc::now());
        self.repo.update_trade(id, &update).await?;
        info!(id, status = ?update.status, "trade updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.repo.delete_trade(id).await?;
        info!(id, "trade deleted");
        Ok(())
    }
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, DomainError> {
    payload
        .as_object()
        .ok_or_else(|| DomainError::InvalidInput("Request body must be a JSON object".into()))
}

/// Float coercion that accepts JSON numbers, numeric strings and booleans.
/// Infinities and NaN are refused since JSON has no encoding for them.
fn coerce_f64(value: &Value, field: &str) -> Result<f64, String> {
    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{field} is not a representable float"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert {field} to float: {s:?}"))?,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        other => return Err(format!("{field} must be a number, not {other}")),
    };
    if !number.is_finite() {
        return Err(format!("{field} must be a finite number, not {value}"));
    }
    Ok(number)
}

pub fn parse_new_trade(payload: &Value) -> Result<NewTrade, DomainError> {
    let data = as_object(payload)?;
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !data.contains_key(**f)) {
        return Err(DomainError::InvalidInput(format!("Missing field: {missing}")));
    }

    let direction: TradeDirection = data["direction"]
        .as_str()
        .ok_or_else(|| DomainError::Parse("direction must be a string".into()))?
        .parse()
        .map_err(DomainError::InvalidInput)?;
    let symbol = data["symbol"]
        .as_str()
        .ok_or_else(|| DomainError::Parse("symbol must be a string".into()))?;
    let number = |field: &str| coerce_f64(&data[field], field).map_err(DomainError::Parse);
    let take_profits = data["take_profits"]
        .as_array()
        .ok_or_else(|| DomainError::Parse("take_profits must be a list".into()))?
        .iter()
        .map(|tp| coerce_f64(tp, "take_profits").map_err(DomainError::Parse))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewTrade::new(
        symbol,
        direction,
        number("entry_low")?,
        number("entry_high")?,
        take_profits,
        number("stop_loss")?,
    ))
}

/// Picks the whitelisted fields out of a patch payload; everything else is
/// ignored.
pub fn parse_update(payload: &Value) -> Result<TradeUpdate, DomainError> {
    let data = as_object(payload)?;
    let mut update = TradeUpdate::default();

    if let Some(status) = data.get("status") {
        let status = status
            .as_str()
            .ok_or_else(|| DomainError::InvalidInput("status must be a string".into()))?;
        update.status = Some(status.to_string());
    }
    if let Some(pnl) = data.get("pnl") {
        update.pnl = Some(match pnl {
            Value::Null => None,
            v => Some(coerce_f64(v, "pnl").map_err(DomainError::InvalidInput)?),
        });
    }
    if let Some(notes) = data.get("notes") {
        update.notes = Some(match notes {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            _ => return Err(DomainError::InvalidInput("notes must be a string".into())),
        });
    }
    if let Some(closed_at) = data.get("closed_at") {
        update.closed_at = Some(match closed_at {
            Value::Null => None,
            Value::String(s) => Some(
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        DomainError::InvalidInput(format!("closed_at must be an RFC 3339 timestamp: {e}"))
                    })?,
            ),
            _ => {
                return Err(DomainError::InvalidInput(
                    "closed_at must be an RFC 3339 timestamp".into(),
                ))
            }
        });
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "symbol": "btcusdt",
            "direction": "long",
            "entry_low": 100,
            "entry_high": "101.5",
            "take_profits": [105.5, "110.2"],
            "stop_loss": 95.0
        })
    }

    #[test]
    fn test_parse_new_trade_coerces_numbers() {
        let trade = parse_new_trade(&valid_payload()).unwrap();
        assert_eq!(trade.symbol, "BTCUSDT");
        assert_eq!(trade.direction, TradeDirection::Long);
        assert_eq!(trade.entry_low, 100.0);
        assert_eq!(trade.entry_high, 101.5);
        assert_eq!(trade.take_profits, vec![105.5, 110.2]);
    }

    #[test]
    fn test_missing_field_named_in_order() {
        let err = parse_new_trade(&json!({"symbol": "X"})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(ref m) if m == "Missing field: direction"));
    }

    #[test]
    fn test_bad_direction_is_validation_error() {
        let mut payload = valid_payload();
        payload["direction"] = json!("sideways");
        let err = parse_new_trade(&payload).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(ref m) if m == "direction must be LONG or SHORT"));
    }

    #[test]
    fn test_uncoercible_number_is_type_error() {
        let mut payload = valid_payload();
        payload["stop_loss"] = json!("abc");
        assert!(matches!(parse_new_trade(&payload), Err(DomainError::Parse(_))));

        let mut payload = valid_payload();
        payload["take_profits"] = json!([1.0, null]);
        assert!(matches!(parse_new_trade(&payload), Err(DomainError::Parse(_))));
    }

    #[test]
    fn test_non_finite_numbers_are_type_errors() {
        for bad in ["inf", "-inf", "NaN", "1e999"] {
            let mut payload = valid_payload();
            payload["take_profits"] = json!([bad]);
            assert!(matches!(parse_new_trade(&payload), Err(DomainError::Parse(_))));

            let mut payload = valid_payload();
            payload["entry_low"] = json!(bad);
            assert!(matches!(parse_new_trade(&payload), Err(DomainError::Parse(_))));
        }
        let err = parse_update(&json!({"pnl": "inf"})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_update_whitelist() {
        let update = parse_update(&json!({
            "status": "success",
            "pnl": "12.5",
            "symbol": "IGNORED",
            "id": 99
        }))
        .unwrap();
        assert_eq!(update.status.as_deref(), Some("success"));
        assert_eq!(update.pnl, Some(Some(12.5)));
        assert!(update.notes.is_none());
        assert!(update.closed_at.is_none());
    }

    #[test]
    fn test_parse_update_nulls_and_empty() {
        let update = parse_update(&json!({"notes": null, "pnl": null})).unwrap();
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.pnl, Some(None));
        assert!(parse_update(&json!({"entry_low": 3})).unwrap().is_empty());
    }

    #[test]
    fn test_parse_update_rejects_bad_closed_at() {
        let err = parse_update(&json!({"closed_at": "yesterday"})).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
