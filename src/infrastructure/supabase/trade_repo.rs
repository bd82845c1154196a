use crate::domain::entities::trade::{NewTrade, Trade, TradeUpdate};
use crate::domain::error::DomainError;
use crate::domain::ports::trade_repository::*;
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Trades table behind a Supabase (PostgREST) endpoint. Each call is one
/// HTTP round-trip; atomicity is whatever the server gives a single request.
pub struct SupabaseTradeRepo {
    client: Client,
    table_url: String,
    api_key: String,
}

impl SupabaseTradeRepo {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("trade-ledger/0.1")
                .build()
                .unwrap_or_default(),
            table_url: format!("{}/rest/v1/trades", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, DomainError> {
        let resp = req
            .send()
            .await
            .map_err(|e| DomainError::Backend(format!("Supabase request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Supabase returned an error");
            return Err(DomainError::Backend(format!("Supabase {status}: {body}")));
        }
        Ok(resp)
    }

    async fn fetch_trades(&self, query: &[(&str, String)]) -> Result<Vec<Trade>, DomainError> {
        let resp = self.send(self.request(Method::GET).query(query)).await?;
        resp.json()
            .await
            .map_err(|e| DomainError::Backend(format!("Unexpected Supabase payload: {e}")))
    }
}

fn list_query(filter: &TradeFilter) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("select", "*".to_string()),
        ("order", "created_at.desc,id.desc".to_string()),
    ];
    if let Some(status) = &filter.status {
        query.push(("status", format!("eq.{status}")));
    }
    if let Some(offset) = filter.offset {
        query.push(("offset", offset.to_string()));
    }
    if let Some(limit) = filter.limit {
        query.push(("limit", limit.to_string()));
    }
    query
}

/// Only the fields present in the patch, with explicit nulls kept.
fn update_body(update: &TradeUpdate) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(status) = &update.status {
        body.insert("status".into(), json!(status));
    }
    if let Some(pnl) = update.pnl {
        body.insert("pnl".into(), json!(pnl));
    }
    if let Some(notes) = &update.notes {
        body.insert("notes".into(), json!(notes));
    }
    if let Some(closed_at) = &update.closed_at {
        let value = closed_at.map(|dt| dt.to_rfc3339_opts(SecondsFormat::Micros, true));
        body.insert("closed_at".into(), json!(value));
    }
    body
}

/// Total from a `Content-Range` header such as `0-3/12` or `*/0`.
fn parse_content_range_total(header: &str) -> Option<i64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl TradeRepository for SupabaseTradeRepo {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    async fn insert_trade(&self, trade: &NewTrade) -> Result<Trade, DomainError> {
        let req = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(trade);
        let resp = self.send(req).await?;
        let mut rows: Vec<Trade> = resp
            .json()
            .await
            .map_err(|e| DomainError::Backend(format!("Unexpected Supabase payload: {e}")))?;
        if rows.is_empty() {
            return Err(DomainError::Backend("Supabase insert returned no rows".into()));
        }
        let inserted = rows.swap_remove(0);
        debug!(id = inserted.id, symbol = %inserted.symbol, "inserted trade");
        Ok(inserted)
    }

    async fn list_trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        self.fetch_trades(&list_query(filter)).await
    }

    async fn count_trades(&self, status: Option<&str>) -> Result<i64, DomainError> {
        let mut query = vec![("select", "id".to_string())];
        if let Some(status) = status {
            query.push(("status", format!("eq.{status}")));
        }
        let req = self
            .request(Method::HEAD)
            .header("Prefer", "count=exact")
            .query(&query);
        let resp = self.send(req).await?;
        resp.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| DomainError::Backend("Supabase count missing Content-Range".into()))
    }

    async fn get_trade(&self, id: i64) -> Result<Option<Trade>, DomainError> {
        let query = [("select", "*".to_string()), ("id", format!("eq.{id}"))];
        let rows = self.fetch_trades(&query).await?;
        Ok(rows.into_iter().next())
    }

    async fn update_trade(&self, id: i64, update: &TradeUpdate) -> Result<(), DomainError> {
        let body = update_body(update);
        if body.is_empty() {
            return Ok(());
        }
        let req = self
            .request(Method::PATCH)
            .query(&[("id", format!("eq.{id}"))])
            .json(&body);
        self.send(req).await?;
        debug!(id, fields = body.len(), "updated trade");
        Ok(())
    }

    async fn delete_trade(&self, id: i64) -> Result<(), DomainError> {
        let req = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{id}"))]);
        self.send(req).await?;
        Ok(())
    }

    async fn outcomes(&self) -> Result<Vec<TradeOutcomeRow>, DomainError> {
        let req = self
            .request(Method::GET)
            .query(&[("select", "status,pnl")]);
        let resp = self.send(req).await?;
        resp.json()
            .await
            .map_err(|e| DomainError::Backend(format!("Unexpected Supabase payload: {e}")))
    }
}
