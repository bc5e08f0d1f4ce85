//! Demo data
//!
//! Seeds a small set of accounts and products when `SEED_DEMO_DATA=true`.
//! Runs only against an empty `admin` table, so restarts never duplicate rows.

use super::models::{AdminRole, AdminRow, BuyerRow, ShipperRow};
use super::repository::{AdminRepository, BuyerRepository, RepoResult, ShipperRepository};
use crate::auth::hash_password;
use shared::AppError;
use shared::util::{new_record_key, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    name: &'static str,
}

const ADMINS: [(DemoAccount, AdminRole); 2] = [
    (
        DemoAccount {
            email: "admin001@example.com",
            password: "admin001",
            name: "Admin One",
        },
        AdminRole::Superadmin,
    ),
    (
        DemoAccount {
            email: "admin002@example.com",
            password: "admin002",
            name: "Admin Two",
        },
        AdminRole::Admin,
    ),
];

const BUYER: DemoAccount = DemoAccount {
    email: "buyer@example.com",
    password: "buyer123",
    name: "Demo Buyer",
};

const SHIPPER: DemoAccount = DemoAccount {
    email: "shipper@example.com",
    password: "shipper123",
    name: "Demo Shipper",
};

const PRODUCTS: [(&str, f64); 2] = [("Monstera seedling", 120.0), ("Orchid pot", 250.0)];

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Seed demo rows if the database has no admins yet
pub async fn seed_demo_data(db: &Surreal<Db>) -> Result<bool, AppError> {
    let admins = AdminRepository::new(db.clone());
    if !admins.find_all().await?.is_empty() {
        tracing::debug!("Demo data already present, skipping seed");
        return Ok(false);
    }

    for (i, (account, role)) in ADMINS.iter().enumerate() {
        admins
            .create(&AdminRow {
                id: new_record_key(),
                email: account.email.to_string(),
                password_hash: hash(account.password)?,
                name: account.name.to_string(),
                role: *role,
                // keep seed order stable: the first admin is the default chat partner
                created_at: now_millis() + i as i64,
            })
            .await?;
    }

    BuyerRepository::new(db.clone())
        .create(&BuyerRow {
            id: new_record_key(),
            email: BUYER.email.to_string(),
            password_hash: hash(BUYER.password)?,
            full_name: BUYER.name.to_string(),
            phone: "0900000001".to_string(),
            is_active: true,
        })
        .await?;

    ShipperRepository::new(db.clone())
        .create(&ShipperRow {
            id: new_record_key(),
            email: SHIPPER.email.to_string(),
            password_hash: hash(SHIPPER.password)?,
            full_name: SHIPPER.name.to_string(),
            phone: "0900000002".to_string(),
            is_active: true,
            assigned_orders: Vec::new(),
            revision: 0,
        })
        .await?;

    seed_products(db).await?;

    tracing::info!(
        admins = ADMINS.len(),
        products = PRODUCTS.len(),
        "Demo data seeded"
    );
    Ok(true)
}

async fn seed_products(db: &Surreal<Db>) -> RepoResult<()> {
    for (name, price) in PRODUCTS {
        db.query("CREATE type::thing('product', $id) CONTENT { name: $name, price: $price, sold: 0 }")
            .bind(("id", new_record_key()))
            .bind(("name", name))
            .bind(("price", price))
            .await?
            .check()?;
    }
    Ok(())
}
