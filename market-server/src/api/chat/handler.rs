use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{ChatMessage, ConversationSummary, RecentMessage};

/// GET /api/conversations/{adminId}
pub async fn conversations(
    State(state): State<ServerState>,
    Path(admin_id): Path<String>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(state.hub.conversations(&admin_id).await?))
}

/// GET /api/messages/{userId}
pub async fn messages(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    Ok(Json(state.hub.buyer_history(&user_id).await?))
}

/// GET /api/recent-messages/{adminId}
pub async fn recent_messages(
    State(state): State<ServerState>,
    Path(admin_id): Path<String>,
) -> AppResult<Json<Vec<RecentMessage>>> {
    Ok(Json(state.hub.recent_messages(&admin_id).await?))
}
