//! Buyer / Admin account rows

use serde::{Deserialize, Serialize};
use shared::models::{AdminProfile, AdminRole, BuyerProfile, ChatUser};

/// Buyer account row (with password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl BuyerRow {
    pub fn profile(&self) -> BuyerProfile {
        BuyerProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            is_active: self.is_active,
        }
    }

    /// Identity attached to live chat deliveries
    pub fn chat_user(&self) -> ChatUser {
        ChatUser {
            user_id: self.id.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Admin account row (with password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default)]
    pub created_at: i64,
}

impl AdminRow {
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

pub(crate) fn default_active() -> bool {
    true
}
