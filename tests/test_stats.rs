mod common;

use common::{add_trade, setup};
use serde_json::json;

#[tokio::test]
async fn test_stats_empty() {
    let ledger = setup();
    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.wins, 0);
    assert_eq!(stats.losses, 0);
    assert_eq!(stats.total_pnl, 0.0);
}

#[tokio::test]
async fn test_stats_counts_all_statuses() {
    let ledger = setup();
    let win = add_trade(&ledger, "WIN").await;
    let loss = add_trade(&ledger, "LOSS").await;
    add_trade(&ledger, "OPEN").await;

    ledger
        .patch(win.id, &json!({"status": "success", "pnl": 10}))
        .await
        .unwrap();
    ledger
        .patch(loss.id, &json!({"status": "failed", "pnl": -3}))
        .await
        .unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.losses, 1);
    assert_eq!(stats.total_pnl, 7.0);
}

#[tokio::test]
async fn test_stats_null_pnl_counts_as_zero() {
    let ledger = setup();
    let a = add_trade(&ledger, "A").await;
    let b = add_trade(&ledger, "B").await;
    ledger
        .patch(a.id, &json!({"pnl": null}))
        .await
        .unwrap();
    ledger
        .patch(b.id, &json!({"pnl": "0.12346"}))
        .await
        .unwrap();

    let stats = ledger.stats().await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.total_pnl, 0.1235);
}
