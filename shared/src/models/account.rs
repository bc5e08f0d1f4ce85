//! Buyer / Admin account views (without password)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Superadmin,
    #[default]
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}
