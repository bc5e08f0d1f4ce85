//! Shipper API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extract::ValidatedJson;
use crate::core::ServerState;
use crate::orders::TransitionOutcome;
use crate::utils::AppResult;
use shared::models::{AssignmentBuckets, Order};

/// `{id, orderId}`; `shipperId` and `orderID` are accepted as spellings too
#[derive(Debug, Deserialize, Validate)]
pub struct ShipperTransitionRequest {
    #[serde(alias = "shipperId", default)]
    pub id: String,
    #[serde(rename = "orderId", alias = "orderID", default)]
    pub order_id: String,
}

/// GET /api/shipper - 待取件订单, 最早在前
pub async fn awaiting_pickup(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.list_awaiting_pickup().await?))
}

/// GET /api/shipper_status/{shipperId}
pub async fn status(
    State(state): State<ServerState>,
    Path(shipper_id): Path<String>,
) -> AppResult<Json<AssignmentBuckets>> {
    Ok(Json(state.fulfillment.shipper_assignments(&shipper_id).await?))
}

/// PATCH /api/shipper_accept
pub async fn accept(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<ShipperTransitionRequest>,
) -> AppResult<Json<TransitionOutcome>> {
    let outcome = state
        .fulfillment
        .accept_by_shipper(&req.id, &req.order_id)
        .await?;
    Ok(Json(outcome))
}

/// PATCH /api/shipper_complete
pub async fn complete(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<ShipperTransitionRequest>,
) -> AppResult<Json<TransitionOutcome>> {
    let outcome = state
        .fulfillment
        .complete_by_shipper(&req.id, &req.order_id)
        .await?;
    Ok(Json(outcome))
}

/// PATCH /api/shipper_cancel
pub async fn cancel(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<ShipperTransitionRequest>,
) -> AppResult<Json<TransitionOutcome>> {
    let outcome = state
        .fulfillment
        .cancel_by_shipper(&req.id, &req.order_id)
        .await?;
    Ok(Json(outcome))
}
