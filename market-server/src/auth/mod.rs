//! 认证模块 - 基础凭证校验
//!
//! Email + password check for the three account kinds. No sessions or tokens
//! are issued; a successful check returns the account profile.

pub mod password;

pub use password::{hash_password, verify_password};

use crate::db::repository::{AdminRepository, BuyerRepository, ShipperRepository};
use shared::models::{AdminProfile, BuyerProfile, ShipperProfile};
use shared::{AppError, AppResult, ErrorCode};
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Fixed delay before answering, so timing does not reveal whether an email exists
const AUTH_FIXED_DELAY_MS: u64 = 200;

#[derive(Clone)]
pub struct CredentialService {
    buyers: BuyerRepository,
    admins: AdminRepository,
    shippers: ShipperRepository,
}

impl CredentialService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            buyers: BuyerRepository::new(db.clone()),
            admins: AdminRepository::new(db.clone()),
            shippers: ShipperRepository::new(db),
        }
    }

    pub async fn login_buyer(&self, email: &str, password: &str) -> AppResult<BuyerProfile> {
        let row = self.buyers.find_by_email(email).await?;
        fixed_delay().await;
        let row = check(row, email, password, |r| (&r.password_hash, r.is_active), "buyer")?;
        tracing::info!(buyer_id = %row.id, "Buyer logged in");
        Ok(row.profile())
    }

    pub async fn login_admin(&self, email: &str, password: &str) -> AppResult<AdminProfile> {
        let row = self.admins.find_by_email(email).await?;
        fixed_delay().await;
        let row = check(row, email, password, |r| (&r.password_hash, true), "admin")?;
        tracing::info!(admin_id = %row.id, "Admin logged in");
        Ok(row.profile())
    }

    pub async fn login_shipper(&self, email: &str, password: &str) -> AppResult<ShipperProfile> {
        let row = self.shippers.find_by_email(email).await?;
        fixed_delay().await;
        let row = check(row, email, password, |r| (&r.password_hash, r.is_active), "shipper")?;
        tracing::info!(shipper_id = %row.id, "Shipper logged in");
        Ok(row.profile())
    }
}

async fn fixed_delay() {
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;
}

/// Unified failure for unknown email and wrong password
fn check<T>(
    row: Option<T>,
    email: &str,
    password: &str,
    fields: impl Fn(&T) -> (&String, bool),
    kind: &str,
) -> AppResult<T> {
    let Some(row) = row else {
        tracing::warn!(email = %email, kind, "Login failed - account not found");
        return Err(AppError::invalid_credentials());
    };
    let (hash, active) = fields(&row);
    if !verify_password(password, hash) {
        tracing::warn!(email = %email, kind, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }
    if !active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    Ok(row)
}
