//! Notice API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::api::extract::ValidatedJson;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_ADDRESS_LEN_U64, MAX_NAME_LEN_U64};
use shared::OrderStatus;
use shared::models::{Notice, NoticeCreate};

#[derive(Debug, Deserialize, Validate)]
pub struct NoticeCreateRequest {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(rename = "orderId", alias = "orderID", default)]
    pub order_id: String,
    #[serde(default)]
    #[validate(length(max = MAX_NAME_LEN_U64))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = MAX_ADDRESS_LEN_U64))]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: OrderStatus,
}

/// GET /notice/{userId} - 买家通知, 最新在前
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Notice>>> {
    Ok(Json(state.notices.list(&user_id).await?))
}

/// PATCH /notice/read/{id} - 标记已读 (幂等)
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Notice>> {
    Ok(Json(state.notices.mark_read(&id).await?))
}

/// POST /api/notices
pub async fn create(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<NoticeCreateRequest>,
) -> AppResult<(StatusCode, Json<Notice>)> {
    let notice = state
        .notices
        .create_notice(NoticeCreate {
            buyer_id: req.user_id,
            order_id: req.order_id,
            title: req.title,
            message: req.message,
            kind: req.kind,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(notice)))
}
