//! Chat Model

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// Persisted chat message, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Buyer side of the conversation
    pub buyer_id: String,
    pub sender: Address,
    pub receiver: Address,
    pub content: String,
    pub timestamp: i64,
}

/// Buyer identity attached to live chat events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUser {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
}

/// One buyer conversation as seen by an admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub user: ChatUser,
    pub last_message: String,
    pub last_timestamp: i64,
    pub message_count: u64,
}

/// Latest message an admin received from one buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentMessage {
    pub user: ChatUser,
    pub message: ChatMessage,
}
