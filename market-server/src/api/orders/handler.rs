//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extract::ValidatedJson;
use crate::core::ServerState;
use crate::orders::TransitionOutcome;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_ADDRESS_LEN_U64, MAX_NAME_LEN_U64, MAX_SHORT_TEXT_LEN_U64};
use shared::models::{Order, OrderBuckets, OrderCreate, OrderItem, ShippingInfo};

/// Checkout body. Shipping fields default to empty so that a missing field
/// is reported by name instead of as a parse error.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    #[validate(length(max = MAX_NAME_LEN_U64))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = MAX_ADDRESS_LEN_U64))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = MAX_SHORT_TEXT_LEN_U64))]
    pub phone: String,
    #[serde(rename = "paymentMethod", default)]
    #[validate(length(max = MAX_SHORT_TEXT_LEN_U64))]
    pub payment_method: String,
    #[validate(range(min = 0.0))]
    pub fee: f64,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
}

impl From<CreateOrderRequest> for OrderCreate {
    fn from(req: CreateOrderRequest) -> Self {
        OrderCreate {
            buyer_id: req.user_id,
            items: req.items,
            shipping: ShippingInfo {
                full_name: req.name,
                phone: req.phone,
                address: req.address,
                payment_method: req.payment_method,
            },
            fee: req.fee,
            total_price: req.total_price,
        }
    }
}

/// POST /api/sellers - 下单
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.orders.create_order(req.into()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/seller - 全部订单, 最新在前
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list_all().await?))
}

/// GET /api/seller/{userId} - 买家订单, 按状态分组
pub async fn list_for_buyer(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<OrderBuckets>> {
    Ok(Json(state.orders.list_for_buyer(&user_id).await?))
}

/// GET /api/orders/{orderId}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(&order_id).await?))
}

/// PATCH /api/orders/{orderId}/resolve
pub async fn resolve(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.fulfillment.admin_resolve(&order_id).await?))
}

/// PATCH /api/orders/{orderId}/confirm
pub async fn confirm(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.fulfillment.admin_confirm(&order_id).await?))
}

/// PATCH /api/orders/{orderId}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<TransitionOutcome>> {
    Ok(Json(state.fulfillment.admin_cancel(&order_id).await?))
}
