mod common;

use common::{add_trade, setup};
use serde_json::json;
use std::collections::HashSet;
use trade_ledger::domain::values::page::PageRequest;

#[tokio::test]
async fn test_empty_store_has_one_page() {
    let ledger = setup();
    let page = ledger.list(PageRequest::default(), None).await.unwrap();
    assert!(page.trades.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 4);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_pages_cover_every_trade_once_newest_first() {
    let ledger = setup();
    let mut created = Vec::new();
    for i in 0..11 {
        created.push(add_trade(&ledger, &format!("SYM{i}")).await.id);
    }

    let per_page = 3;
    let first = ledger
        .list(PageRequest::new(1, per_page).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(first.total, 11);
    assert_eq!(first.total_pages, 4);

    let mut seen = Vec::new();
    for p in 1..=first.total_pages {
        let page = ledger
            .list(PageRequest::new(p, per_page).unwrap(), None)
            .await
            .unwrap();
        assert!(page.trades.len() as i64 <= per_page);
        seen.extend(page.trades.iter().map(|t| t.id));
    }

    let unique: HashSet<i64> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 11);
    assert_eq!(unique.len(), 11);

    created.reverse();
    assert_eq!(seen, created);
}

#[tokio::test]
async fn test_page_past_end_keeps_total() {
    let ledger = setup();
    for i in 0..5 {
        add_trade(&ledger, &format!("T{i}")).await;
    }
    let page = ledger
        .list(PageRequest::new(10, 4).unwrap(), None)
        .await
        .unwrap();
    assert!(page.trades.is_empty());
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_status_filter() {
    let ledger = setup();
    let a = add_trade(&ledger, "A").await;
    add_trade(&ledger, "B").await;
    let c = add_trade(&ledger, "C").await;
    ledger
        .patch(a.id, &json!({"status": "success"}))
        .await
        .unwrap();
    ledger
        .patch(c.id, &json!({"status": "success"}))
        .await
        .unwrap();

    let wins = ledger
        .list(PageRequest::default(), Some("success".into()))
        .await
        .unwrap();
    assert_eq!(wins.total, 2);
    assert_eq!(
        wins.trades.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![c.id, a.id]
    );

    let open = ledger
        .list(PageRequest::default(), Some("open".into()))
        .await
        .unwrap();
    assert_eq!(open.total, 1);

    let bogus = ledger
        .list(PageRequest::default(), Some("nonsense".into()))
        .await
        .unwrap();
    assert_eq!(bogus.total, 0);
    assert_eq!(bogus.total_pages, 1);

    // Empty filter means no filter.
    let all = ledger
        .list(PageRequest::default(), Some(String::new()))
        .await
        .unwrap();
    assert_eq!(all.total, 3);
}
