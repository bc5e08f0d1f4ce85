//! Database row types
//!
//! Orders, notices and chat messages are stored in their shared wire shape
//! (see `shared::models`). Account rows carry the password hash and are only
//! exposed through the profile views.

mod account;
mod shipper;

pub use account::{AdminRow, BuyerRow};
pub use shipper::ShipperRow;

pub use shared::models::{
    AdminProfile, AdminRole, BuyerProfile, ChatMessage, ChatUser, Notice, Order, OrderItem,
    ShipperAssignment, ShipperProfile, ShippingInfo,
};
