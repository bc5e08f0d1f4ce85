//! Order code allocation under concurrency

mod common;

use common::*;
use std::collections::HashSet;

const ORDERS: usize = 40;

#[tokio::test]
async fn test_concurrent_orders_get_unique_codes() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "bulk@example.com").await;

    let mut handles = Vec::with_capacity(ORDERS);
    for i in 0..ORDERS {
        let state = state.clone();
        let buyer_id = buyer.id.clone();
        handles.push(tokio::spawn(async move {
            // distinct products: no row contention besides the code index
            let input = order_input(&buyer_id, vec![item(&format!("bulk{i}"), 1, 10.0)]);
            state.orders.create_order(input).await
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let order = handle.await.expect("task").expect("order created");
        assert!(is_order_code(&order.code));
        assert!(codes.insert(order.code.clone()), "duplicate code {}", order.code);
    }
    assert_eq!(codes.len(), ORDERS);

    let all = state.orders.list_all().await.unwrap();
    assert_eq!(all.len(), ORDERS);
}

#[tokio::test]
async fn test_exhausted_code_space_is_a_conflict() {
    let mut state = test_state().await;
    let buyer = create_buyer(&state, "few@example.com").await;

    // a one-attempt allocator over a space that is already full
    let mut config = state.config.clone();
    config.order_code_prefix = "FULL".into();
    config.order_code_max_attempts = 1;
    state.orders = market_server::OrderStore::new(state.get_db(), &config);

    let db = state.get_db();
    for n in 0..1000 {
        db.query("CREATE orders CONTENT { code: $code, buyer_id: 'seed', status: 'cancelled', created_at: 0 }")
            .bind(("code", format!("FULL{n:03}")))
            .await
            .unwrap()
            .check()
            .unwrap();
    }

    let err = state
        .orders
        .create_order(order_input(&buyer.id, vec![item("P1", 1, 10.0)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, shared::ErrorCode::OrderCodeExhausted);
    assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_last_free_code_is_found() {
    let mut state = test_state().await;
    let buyer = create_buyer(&state, "gap@example.com").await;

    let mut config = state.config.clone();
    config.order_code_prefix = "GAP".into();
    config.order_code_max_attempts = 8;
    state.orders = market_server::OrderStore::new(state.get_db(), &config);

    let db = state.get_db();
    for n in (0..1000).filter(|n| *n != 500) {
        db.query("CREATE orders CONTENT { code: $code, buyer_id: 'seed', status: 'cancelled', created_at: 0 }")
            .bind(("code", format!("GAP{n:03}")))
            .await
            .unwrap()
            .check()
            .unwrap();
    }

    let order = state
        .orders
        .create_order(order_input(&buyer.id, vec![item("P1", 1, 10.0)]))
        .await
        .unwrap();
    assert_eq!(order.code, "GAP500");

    // now the space really is full
    let err = state
        .orders
        .create_order(order_input(&buyer.id, vec![item("P1", 1, 10.0)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, shared::ErrorCode::OrderCodeExhausted);
}
