//! Shared test helpers.

#![allow(dead_code)]

use serde_json::{json, Value};
use trade_ledger::domain::entities::trade::Trade;
use trade_ledger::TradeLedger;

pub fn setup() -> TradeLedger {
    TradeLedger::open_sqlite(":memory:").unwrap()
}

pub fn trade_payload(symbol: &str, direction: &str) -> Value {
    json!({
        "symbol": symbol,
        "direction": direction,
        "entry_low": 100.0,
        "entry_high": 102.0,
        "take_profits": [105.5, 110.2],
        "stop_loss": 95.0
    })
}

pub async fn add_trade(ledger: &TradeLedger, symbol: &str) -> Trade {
    ledger
        .create(&trade_payload(symbol, "long"))
        .await
        .unwrap()
}
