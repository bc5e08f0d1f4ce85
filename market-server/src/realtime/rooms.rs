//! RoomRegistry - 连接表 + 房间成员
//!
//! ```text
//! connections: ConnectionId → Outbox (bounded mpsc)
//! rooms:       Address      → {ConnectionId}
//! joined:      ConnectionId → {Address}      (reverse index, for leave/disconnect)
//! ```
//!
//! Emission never blocks: a full or closed outbox drops the event and logs.

use dashmap::{DashMap, DashSet};
use shared::{Address, ServerEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

pub type ConnectionId = u64;

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    rooms: DashMap<Address, DashSet<ConnectionId>>,
    joined: DashMap<ConnectionId, DashSet<Address>>,
}

#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<Inner>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection with an outbox of `capacity` events
    pub fn connect(&self, capacity: usize) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.connections.insert(id, tx);
        (id, rx)
    }

    /// Join `room`, leaving every room the connection was in before
    pub fn join_exclusive(&self, conn: ConnectionId, room: Address) {
        self.leave_all(conn);
        self.inner
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(conn);
        self.inner.joined.entry(conn).or_default().insert(room);
    }

    /// Rooms the connection is currently in
    pub fn rooms_of(&self, conn: ConnectionId) -> Vec<Address> {
        self.inner
            .joined
            .get(&conn)
            .map(|rooms| rooms.iter().map(|r| r.key().clone()).collect())
            .unwrap_or_default()
    }

    pub fn leave_all(&self, conn: ConnectionId) {
        let Some((_, rooms)) = self.inner.joined.remove(&conn) else {
            return;
        };
        for room in rooms {
            let emptied = match self.inner.rooms.get(&room) {
                Some(members) => {
                    members.remove(&conn);
                    members.is_empty()
                }
                None => false,
            };
            if emptied {
                self.inner.rooms.remove_if(&room, |_, members| members.is_empty());
            }
        }
    }

    /// Drop the connection and its memberships
    pub fn disconnect(&self, conn: ConnectionId) {
        self.leave_all(conn);
        self.inner.connections.remove(&conn);
    }

    /// Send to one connection. Returns whether the event was queued.
    pub fn send_to(&self, conn: ConnectionId, event: ServerEvent) -> bool {
        let Some(tx) = self.inner.connections.get(&conn).map(|tx| tx.clone()) else {
            return false;
        };
        match tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                tracing::warn!(conn, event = event.name(), "Outbox full, event dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                tracing::debug!(conn, event = event.name(), "Outbox closed, event dropped");
                false
            }
        }
    }

    /// Send to every connection in `room`. Returns how many were queued.
    pub fn emit(&self, room: &Address, event: &ServerEvent) -> usize {
        let members: Vec<ConnectionId> = match self.inner.rooms.get(room) {
            Some(members) => members.iter().map(|c| *c).collect(),
            None => return 0,
        };
        members
            .into_iter()
            .filter(|conn| self.send_to(*conn, event.clone()))
            .count()
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn room_size(&self, room: &Address) -> usize {
        self.inner.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }
}
