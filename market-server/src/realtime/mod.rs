//! 实时通道
//!
//! ```text
//! WebSocket session (ws.rs)
//!       │ ClientEvent
//!       ▼
//! RealtimeHub (hub.rs) ── MessageRepository (persist first)
//!       │ ServerEvent
//!       ▼
//! RoomRegistry (rooms.rs)
//!   ├── user:<buyerId>  → {connection}
//!   └── admin:<adminId> → {connection}
//! ```

pub mod hub;
pub mod rooms;
pub mod ws;

pub use hub::{RECENT_MESSAGES_LIMIT, RealtimeHub, recipient_rooms};
pub use rooms::{ConnectionId, RoomRegistry};
