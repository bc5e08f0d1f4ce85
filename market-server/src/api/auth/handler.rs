//! Authentication Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::api::extract::ValidatedJson;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{AdminProfile, BuyerProfile, ShipperProfile};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

/// POST /login - 买家登录
pub async fn login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<BuyerProfile>> {
    Ok(Json(state.credentials.login_buyer(&req.email, &req.password).await?))
}

/// POST /admin/login
pub async fn admin_login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AdminProfile>> {
    Ok(Json(state.credentials.login_admin(&req.email, &req.password).await?))
}

/// POST /login_shipper
pub async fn shipper_login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ShipperProfile>> {
    Ok(Json(
        state
            .credentials
            .login_shipper(&req.email, &req.password)
            .await?,
    ))
}
