//! Shared types for the marketplace server
//!
//! Common types used by market-server and its clients: error codes and
//! response envelopes, chat addresses, order statuses, data models and the
//! realtime event protocol.

pub mod address;
pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use address::{Address, Role};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{ClientEvent, ServerEvent};
pub use order::{AssignmentStatus, OrderStatus};
pub use serde::{Deserialize, Serialize};
