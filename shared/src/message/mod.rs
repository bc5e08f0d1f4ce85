//! 实时通道消息类型定义
//!
//! Events exchanged over the chat WebSocket. Every frame is a JSON text
//! message shaped as `{"event": "<name>", "data": <payload>}`.
//!
//! Client payloads keep raw strings; the hub parses them into typed
//! [`Address`]es on arrival so that malformed input can be answered with an
//! `error` event instead of dropping the frame.

use crate::address::Address;
use crate::models::{AdminProfile, ChatMessage, ChatUser, Notice};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub user_id: String,
    /// `user` (alias `buyer`) or `admin`
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    /// Buyer id the conversation belongs to
    pub user_id: String,
    pub sender: String,
    pub receiver: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAdminPayload {
    pub user_id: String,
    pub admin_id: String,
}

/// Client → server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    Register(RegisterPayload),
    SendMessage(SendMessagePayload),
    SelectAdmin(SelectAdminPayload),
}

/// Live copy of a persisted chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDelivery {
    pub user: ChatUser,
    pub sender: Address,
    pub receiver: Address,
    pub content: String,
    pub timestamp: i64,
}

impl ChatDelivery {
    pub fn new(user: ChatUser, message: &ChatMessage) -> Self {
        Self {
            user,
            sender: message.sender.clone(),
            receiver: message.receiver.clone(),
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Server → client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Acknowledges `register` with the room the connection joined
    Registered { room: String },
    LoadAdmins(Vec<AdminProfile>),
    LoadMessages(Vec<ChatMessage>),
    ReceiveMessage(ChatDelivery),
    /// A fulfillment notice for the registered buyer
    Notice(Notice),
    Error { message: String },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Registered { .. } => "registered",
            ServerEvent::LoadAdmins(_) => "loadAdmins",
            ServerEvent::LoadMessages(_) => "loadMessages",
            ServerEvent::ReceiveMessage(_) => "receiveMessage",
            ServerEvent::Notice(_) => "notice",
            ServerEvent::Error { .. } => "error",
        }
    }
}
