//! Shared fixtures: an in-memory server state plus account/order helpers

#![allow(dead_code)]

use market_server::db::DbService;
use market_server::db::models::{AdminRole, AdminRow, BuyerRow, ShipperRow};
use market_server::db::repository::{AdminRepository, BuyerRepository, ShipperRepository};
use market_server::{Config, ServerState};
use shared::models::{Order, OrderCreate, OrderItem, ShippingInfo};
use shared::util::{new_record_key, now_millis};
use shared::ServerEvent;
use tokio::sync::mpsc;

/// Fresh state over its own in-memory database
pub async fn test_state() -> ServerState {
    let config = Config::with_overrides("./target/test-data", 0);
    let db = DbService::memory("test", "test")
        .await
        .expect("in-memory database")
        .db;
    ServerState::with_db(config, db)
}

pub async fn create_buyer(state: &ServerState, email: &str) -> BuyerRow {
    create_buyer_with_hash(state, email, "not-a-hash").await
}

pub async fn create_buyer_with_hash(state: &ServerState, email: &str, password_hash: &str) -> BuyerRow {
    let row = BuyerRow {
        id: new_record_key(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        full_name: format!("Buyer {email}"),
        phone: "0900000001".to_string(),
        is_active: true,
    };
    BuyerRepository::new(state.get_db())
        .create(&row)
        .await
        .expect("create buyer");
    row
}

/// Admins are ordered by `created_at`; pass increasing values to control
/// which one is the default chat partner.
pub async fn create_admin(state: &ServerState, email: &str, created_at: i64) -> AdminRow {
    let row = AdminRow {
        id: new_record_key(),
        email: email.to_string(),
        password_hash: "not-a-hash".to_string(),
        name: format!("Admin {email}"),
        role: AdminRole::Admin,
        created_at,
    };
    AdminRepository::new(state.get_db())
        .create(&row)
        .await
        .expect("create admin");
    row
}

pub async fn create_shipper(state: &ServerState, email: &str) -> ShipperRow {
    let row = ShipperRow {
        id: new_record_key(),
        email: email.to_string(),
        password_hash: "not-a-hash".to_string(),
        full_name: format!("Shipper {email}"),
        phone: "0900000002".to_string(),
        is_active: true,
        assigned_orders: Vec::new(),
        revision: 0,
    };
    ShipperRepository::new(state.get_db())
        .create(&row)
        .await
        .expect("create shipper");
    row
}

pub async fn load_shipper(state: &ServerState, id: &str) -> ShipperRow {
    ShipperRepository::new(state.get_db())
        .find_by_id(id)
        .await
        .expect("query shipper")
        .expect("shipper exists")
}

pub fn order_input(buyer_id: &str, items: Vec<OrderItem>) -> OrderCreate {
    OrderCreate {
        buyer_id: buyer_id.to_string(),
        items,
        shipping: ShippingInfo {
            full_name: "Alice Nguyen".to_string(),
            phone: "0900000001".to_string(),
            address: "12 Garden Street".to_string(),
            payment_method: "cod".to_string(),
        },
        fee: 15.0,
        total_price: 215.0,
    }
}

pub fn item(product_id: &str, quantity: u32, price: f64) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        quantity,
        price,
    }
}

pub async fn place_order(state: &ServerState, buyer_id: &str) -> Order {
    state
        .orders
        .create_order(order_input(buyer_id, vec![item("P1", 2, 100.0)]))
        .await
        .expect("create order")
}

pub fn is_order_code(code: &str) -> bool {
    code.len() == 6 && code.starts_with("ORD") && code[3..].bytes().all(|b| b.is_ascii_digit())
}

/// Everything currently queued on a connection's outbox
pub fn drain(rx: &mut mpsc::Receiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn now() -> i64 {
    now_millis()
}
