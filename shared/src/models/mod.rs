//! Data models
//!
//! Shared between market-server and its clients (via API).
//! All record ids are hex strings (see [`crate::address::is_valid_id`]);
//! all timestamps are Unix milliseconds.

pub mod account;
pub mod chat;
pub mod notice;
pub mod order;
pub mod shipper;

// Re-exports
pub use account::*;
pub use chat::*;
pub use notice::*;
pub use order::*;
pub use shipper::*;
