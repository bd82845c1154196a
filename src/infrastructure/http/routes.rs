use super::error::ApiError;
use crate::domain::error::DomainError;
use crate::domain::values::page::{PageRequest, DEFAULT_PAGE, DEFAULT_PER_PAGE};
use crate::TradeLedger;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

/// All routes, sharing one `TradeLedger`.
pub fn router(ledger: Arc<TradeLedger>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/create", post(create_trade))
        .route("/api/trades", get(list_trades))
        .route(
            "/api/trades/:id",
            get(get_trade).patch(update_trade).delete(delete_trade),
        )
        .route("/api/stats", get(stats))
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(ledger): State<Arc<TradeLedger>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": ledger.backend(),
    }))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError(DomainError::InvalidInput(e.body_text())))
}

/// Ids are integers; anything else cannot name a trade.
fn trade_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError(DomainError::trade_not_found()))
}

async fn create_trade(
    State(ledger): State<Arc<TradeLedger>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(body)?;
    let trade = ledger.create(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "trade": trade })),
    ))
}

async fn list_trades(
    State(ledger): State<Arc<TradeLedger>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError(DomainError::Parse(e.body_text())))?;
    let page = PageRequest::new(
        params.page.unwrap_or(DEFAULT_PAGE),
        params.per_page.unwrap_or(DEFAULT_PER_PAGE),
    )?;
    let page = ledger.list(page, params.status).await?;
    Ok(Json(page))
}

async fn get_trade(
    State(ledger): State<Arc<TradeLedger>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let trade = ledger.get(trade_id(id)?).await?;
    Ok(Json(trade))
}

async fn update_trade(
    State(ledger): State<Arc<TradeLedger>>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = trade_id(id)?;
    let payload = json_body(body)?;
    let trade = ledger.patch(id, &payload).await?;
    Ok(Json(json!({ "success": true, "trade": trade })))
}

async fn delete_trade(
    State(ledger): State<Arc<TradeLedger>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    ledger.delete(trade_id(id)?).await?;
    Ok(Json(json!({ "success": true })))
}

async fn stats(State(ledger): State<Arc<TradeLedger>>) -> Result<impl IntoResponse, ApiError> {
    let stats = ledger.stats().await?;
    Ok(Json(stats))
}
