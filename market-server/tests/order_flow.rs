//! Order lifecycle: creation, shipper transitions, admin transitions

mod common;

use common::*;
use market_server::db::repository::NoticeRepository;
use shared::{AssignmentStatus, ErrorCode, OrderStatus};

#[tokio::test]
async fn test_checkout_accept_complete_scenario() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "alice@example.com").await;
    let shipper = create_shipper(&state, "s1@example.com").await;

    let order = place_order(&state, &buyer.id).await;
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(is_order_code(&order.code), "unexpected code {}", order.code);
    assert_eq!(order.items, vec![item("P1", 2, 100.0)]);

    // accept
    let accepted = state
        .fulfillment
        .accept_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();
    assert_eq!(accepted.order.status, OrderStatus::Processing);
    assert_eq!(accepted.notice.kind, OrderStatus::Processing);

    let row = load_shipper(&state, &shipper.id).await;
    assert_eq!(row.assigned_orders.len(), 1);
    assert_eq!(row.assigned_orders[0].order_id, order.id);
    assert_eq!(row.assigned_orders[0].status, AssignmentStatus::Processing);

    let json = serde_json::to_value(&row.assigned_orders[0]).unwrap();
    assert_eq!(json["sellers"], order.id.as_str());
    assert_eq!(json["status"], "processing");

    // complete
    let completed = state
        .fulfillment
        .complete_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();
    assert_eq!(completed.order.status, OrderStatus::Delivered);
    assert_eq!(
        completed.assignment.as_ref().map(|a| a.status),
        Some(AssignmentStatus::Delivered)
    );

    let stored = state.orders.get(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Delivered);
    let row = load_shipper(&state, &shipper.id).await;
    assert_eq!(row.assigned_orders[0].status, AssignmentStatus::Delivered);

    let notices = NoticeRepository::new(state.get_db())
        .find_by_order(&order.id)
        .await
        .unwrap();
    let kinds: Vec<OrderStatus> = notices.iter().map(|n| n.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&OrderStatus::Processing));
    assert!(kinds.contains(&OrderStatus::Delivered));
    assert!(notices.iter().all(|n| n.buyer_id == buyer.id && n.order_code == order.code));
}

#[tokio::test]
async fn test_terminal_orders_reject_every_transition() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "bob@example.com").await;
    let shipper = create_shipper(&state, "s2@example.com").await;

    let order = place_order(&state, &buyer.id).await;
    state
        .fulfillment
        .accept_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();
    state
        .fulfillment
        .cancel_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();

    let f = &state.fulfillment;
    let attempts = [
        f.accept_by_shipper(&shipper.id, &order.id).await,
        f.complete_by_shipper(&shipper.id, &order.id).await,
        f.cancel_by_shipper(&shipper.id, &order.id).await,
        f.admin_confirm(&order.id).await,
        f.admin_cancel(&order.id).await,
        f.admin_resolve(&order.id).await,
    ];
    for result in attempts {
        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderTransitionRejected);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
    }

    let stored = state.orders.get(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Cancelled);
    let notices = state.notices.list(&buyer.id).await.unwrap();
    assert_eq!(notices.len(), 2);
}

#[tokio::test]
async fn test_admin_resolve_then_pickup() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "carol@example.com").await;
    let shipper = create_shipper(&state, "s3@example.com").await;
    let order = place_order(&state, &buyer.id).await;

    let resolved = state.fulfillment.admin_resolve(&order.id).await.unwrap();
    assert_eq!(resolved.order.status, OrderStatus::Resolved);
    assert!(resolved.assignment.is_none());

    // resolved is entered once
    assert_eq!(
        state.fulfillment.admin_resolve(&order.id).await.unwrap_err().code,
        ErrorCode::OrderTransitionRejected
    );

    let awaiting = state.orders.list_awaiting_pickup().await.unwrap();
    assert!(awaiting.iter().any(|o| o.id == order.id));

    let accepted = state
        .fulfillment
        .accept_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();
    assert_eq!(accepted.order.status, OrderStatus::Processing);

    let awaiting = state.orders.list_awaiting_pickup().await.unwrap();
    assert!(awaiting.iter().all(|o| o.id != order.id));
}

#[tokio::test]
async fn test_admin_bypass_leaves_assignment_untouched() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "dave@example.com").await;
    let shipper = create_shipper(&state, "s4@example.com").await;
    let order = place_order(&state, &buyer.id).await;

    state
        .fulfillment
        .accept_by_shipper(&shipper.id, &order.id)
        .await
        .unwrap();
    let confirmed = state.fulfillment.admin_confirm(&order.id).await.unwrap();
    assert_eq!(confirmed.order.status, OrderStatus::Delivered);
    assert_eq!(confirmed.notice.kind, OrderStatus::Delivered);

    let row = load_shipper(&state, &shipper.id).await;
    assert_eq!(row.assigned_orders[0].status, AssignmentStatus::Processing);

    // straight from pending
    let other = place_order(&state, &buyer.id).await;
    let cancelled = state.fulfillment.admin_cancel(&other.id).await.unwrap();
    assert_eq!(cancelled.order.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_transition_lookup_errors() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "erin@example.com").await;
    let shipper = create_shipper(&state, "s5@example.com").await;
    let stranger = create_shipper(&state, "s6@example.com").await;
    let order = place_order(&state, &buyer.id).await;
    let f = &state.fulfillment;

    let missing = shared::util::new_record_key();
    assert_eq!(
        f.accept_by_shipper(&shipper.id, &missing).await.unwrap_err().code,
        ErrorCode::OrderNotFound
    );
    assert_eq!(
        f.accept_by_shipper(&missing, &order.id).await.unwrap_err().code,
        ErrorCode::ShipperNotFound
    );
    assert_eq!(
        f.accept_by_shipper("not-an-id", &order.id).await.unwrap_err().code,
        ErrorCode::InvalidFormat
    );

    // completing needs an assignment; pending orders are rejected before that
    assert_eq!(
        f.complete_by_shipper(&shipper.id, &order.id).await.unwrap_err().code,
        ErrorCode::OrderTransitionRejected
    );

    f.accept_by_shipper(&shipper.id, &order.id).await.unwrap();
    assert_eq!(
        f.complete_by_shipper(&stranger.id, &order.id).await.unwrap_err().code,
        ErrorCode::AssignmentNotFound
    );

    let stored = state.orders.get(&order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Processing);
}

#[tokio::test]
async fn test_concurrent_accepts_have_one_winner() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "frank@example.com").await;
    let first = create_shipper(&state, "s7@example.com").await;
    let second = create_shipper(&state, "s8@example.com").await;
    let order = place_order(&state, &buyer.id).await;

    let (a, b) = tokio::join!(
        state.fulfillment.accept_by_shipper(&first.id, &order.id),
        state.fulfillment.accept_by_shipper(&second.id, &order.id),
    );
    let wins = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(wins, 1);
    let loser = if a.is_ok() { b } else { a };
    assert_eq!(loser.unwrap_err().code, ErrorCode::OrderTransitionRejected);

    let notices = NoticeRepository::new(state.get_db())
        .find_by_order(&order.id)
        .await
        .unwrap();
    assert_eq!(notices.len(), 1);

    let mut assigned = 0;
    for id in [&first.id, &second.id] {
        assigned += load_shipper(&state, id).await.assigned_orders.len();
    }
    assert_eq!(assigned, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_one_shipper_accepts_many_orders_concurrently() {
    const ORDERS: usize = 6;
    let state = test_state().await;
    let buyer = create_buyer(&state, "busy@example.com").await;
    let shipper = create_shipper(&state, "busy-shipper@example.com").await;

    let mut ids = Vec::with_capacity(ORDERS);
    for _ in 0..ORDERS {
        ids.push(place_order(&state, &buyer.id).await.id);
    }

    let mut handles = Vec::with_capacity(ORDERS);
    for order_id in ids.clone() {
        let state = state.clone();
        let shipper_id = shipper.id.clone();
        handles.push(tokio::spawn(async move {
            state.fulfillment.accept_by_shipper(&shipper_id, &order_id).await
        }));
    }
    for handle in handles {
        let outcome = handle.await.expect("task").expect("accept committed");
        assert_eq!(outcome.order.status, OrderStatus::Processing);
    }

    for id in &ids {
        assert_eq!(state.orders.get(id).await.unwrap().status, OrderStatus::Processing);
    }
    let row = load_shipper(&state, &shipper.id).await;
    assert_eq!(row.assigned_orders.len(), ORDERS);
    assert!(ids.iter().all(|id| row.assigned_orders.iter().any(|a| &a.order_id == id)));
    assert_eq!(row.revision, ORDERS as u64);

    // the list is still consistent for a later complete
    state
        .fulfillment
        .complete_by_shipper(&shipper.id, &ids[0])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_order_validation() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "gina@example.com").await;

    let err = state
        .orders
        .create_order(order_input(&buyer.id, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderEmpty);

    let mut input = order_input(&buyer.id, vec![item("P1", 1, 10.0)]);
    input.shipping.address = "  ".into();
    let err = state.orders.create_order(input).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);

    let err = state
        .orders
        .create_order(order_input(
            &shared::util::new_record_key(),
            vec![item("P1", 1, 10.0)],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BuyerNotFound);
}

#[tokio::test]
async fn test_create_order_bumps_product_sold() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "hank@example.com").await;
    let db = state.get_db();
    db.query("CREATE type::thing('product', 'p1') CONTENT { name: 'Fern', price: 100, sold: 3 }")
        .await
        .unwrap()
        .check()
        .unwrap();

    state
        .orders
        .create_order(order_input(&buyer.id, vec![item("p1", 2, 100.0)]))
        .await
        .unwrap();

    let mut result = db
        .query("SELECT VALUE sold FROM type::thing('product', 'p1')")
        .await
        .unwrap();
    let sold: Vec<i64> = result.take(0).unwrap();
    assert_eq!(sold, vec![5]);
}

#[tokio::test]
async fn test_buyer_buckets_partition_orders() {
    let state = test_state().await;
    let buyer = create_buyer(&state, "ivy@example.com").await;
    let shipper = create_shipper(&state, "s9@example.com").await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(place_order(&state, &buyer.id).await.id);
    }
    state.fulfillment.admin_resolve(&ids[1]).await.unwrap();
    state
        .fulfillment
        .accept_by_shipper(&shipper.id, &ids[2])
        .await
        .unwrap();
    state.fulfillment.admin_cancel(&ids[3]).await.unwrap();

    let buckets = state.orders.list_for_buyer(&buyer.id).await.unwrap();
    assert_eq!(buckets.len(), 4);
    assert_eq!(buckets.pending.len(), 1);
    assert_eq!(buckets.resolved.len(), 1);
    assert_eq!(buckets.processing.len(), 1);
    assert_eq!(buckets.delivered.len(), 0);
    assert_eq!(buckets.cancelled.len(), 1);
    assert_eq!(buckets.cancelled[0].id, ids[3]);
}
