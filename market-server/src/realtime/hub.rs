//! RealtimeHub - 买家 / 客服实时聊天
//!
//! Handles the three client events (`register`, `sendMessage`,
//! `selectAdmin`), routes chat messages into rooms and answers the history
//! queries used by the REST surface.
//!
//! A message is persisted before it is emitted. Live delivery is best-effort;
//! the stored message is what clients re-fetch on reconnect.

use super::rooms::{ConnectionId, RoomRegistry};
use crate::db::models::{AdminRow, BuyerRow, ChatMessage};
use crate::db::repository::{AdminRepository, BuyerRepository, MessageRepository};
use crate::utils::validation::{MAX_MESSAGE_LEN, parse_id, validate_required_text};
use shared::message::{ChatDelivery, RegisterPayload, SelectAdminPayload, SendMessagePayload};
use shared::models::{ChatUser, ConversationSummary, RecentMessage};
use shared::util::{new_record_key, now_millis};
use shared::{Address, AppError, AppResult, ClientEvent, ErrorCode, Role, ServerEvent};
use std::collections::{HashMap, HashSet};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

/// `recent_messages` returns at most this many buyers
pub const RECENT_MESSAGES_LIMIT: usize = 10;

#[derive(Clone)]
pub struct RealtimeHub {
    rooms: RoomRegistry,
    buyers: BuyerRepository,
    admins: AdminRepository,
    messages: MessageRepository,
    outbox_capacity: usize,
}

impl RealtimeHub {
    pub fn new(db: Surreal<Db>, outbox_capacity: usize) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            buyers: BuyerRepository::new(db.clone()),
            admins: AdminRepository::new(db.clone()),
            messages: MessageRepository::new(db),
            outbox_capacity,
        }
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Open a connection; the receiver is the connection's outbox
    pub fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (conn, rx) = self.rooms.connect(self.outbox_capacity);
        tracing::debug!(conn, "Realtime connection opened");
        (conn, rx)
    }

    pub fn disconnect(&self, conn: ConnectionId) {
        let rooms = self.rooms.rooms_of(conn);
        self.rooms.disconnect(conn);
        tracing::debug!(conn, rooms = rooms.len(), "Realtime connection closed");
    }

    /// Best-effort emit to one room, returns the number of connections reached
    pub fn emit(&self, room: &Address, event: ServerEvent) -> usize {
        self.rooms.emit(room, &event)
    }

    /// Dispatch one client event. Failures go back to `conn` as an `error`
    /// event and never reach other connections.
    pub async fn handle(&self, conn: ConnectionId, event: ClientEvent) {
        let result = match event {
            ClientEvent::Register(payload) => self.register(conn, payload).await.map(|_| ()),
            ClientEvent::SendMessage(payload) => self.send_message(payload).await.map(|_| ()),
            ClientEvent::SelectAdmin(payload) => self.select_admin(conn, payload).await,
        };
        if let Err(err) = result {
            self.reject(conn, &err);
        }
    }

    /// Report a failure to the originating connection only
    pub fn reject(&self, conn: ConnectionId, err: &AppError) {
        if err.is_internal() {
            tracing::error!(conn, code = %err.code, error = %err.message, "Realtime event failed");
        } else {
            tracing::debug!(conn, code = %err.code, error = %err.message, "Realtime event rejected");
        }
        self.rooms
            .send_to(conn, ServerEvent::error(err.public_message()));
    }

    /// Bind the connection to an identity and join its room
    pub async fn register(&self, conn: ConnectionId, payload: RegisterPayload) -> AppResult<Address> {
        let role: Role = payload.role.trim().parse().map_err(|_| {
            AppError::invalid_request(format!("Unknown role {:?}", payload.role))
                .with_detail("field", "role")
        })?;
        let id = parse_id(&payload.user_id, "userId")?;

        match role {
            Role::User => {
                let buyer = self.require_buyer(&id).await?;
                let room = Address::user(buyer.id.clone());
                self.rooms.join_exclusive(conn, room.clone());
                self.rooms.send_to(conn, ServerEvent::Registered { room: room.to_string() });

                let admins = self.admins.find_all().await?;
                let history = match admins.first() {
                    Some(admin) => {
                        self.messages
                            .find_between(&buyer.id, &Address::admin(admin.id.clone()))
                            .await?
                    }
                    None => Vec::new(),
                };
                self.rooms.send_to(
                    conn,
                    ServerEvent::LoadAdmins(admins.iter().map(AdminRow::profile).collect()),
                );
                self.rooms.send_to(conn, ServerEvent::LoadMessages(history));
                tracing::info!(conn, room = %room, "Buyer registered");
                Ok(room)
            }
            Role::Admin => {
                let admin = self.require_admin(&id).await?;
                let room = Address::admin(admin.id);
                self.rooms.join_exclusive(conn, room.clone());
                self.rooms.send_to(conn, ServerEvent::Registered { room: room.to_string() });
                tracing::info!(conn, room = %room, "Admin registered");
                Ok(room)
            }
        }
    }

    /// Persist a buyer↔admin message and deliver it to both sides' rooms.
    ///
    /// Returns the stored message and the rooms it was emitted to.
    pub async fn send_message(&self, payload: SendMessagePayload) -> AppResult<(ChatMessage, Vec<Address>)> {
        let buyer_id = parse_id(&payload.user_id, "userId")?;
        let sender = parse_address(&payload.sender, "sender")?;
        let receiver = parse_address(&payload.receiver, "receiver")?;

        let buyer_address = Address::user(buyer_id.clone());
        let admin = match (&sender, &receiver) {
            (s, r) if *s == buyer_address && r.is_admin() => r,
            (s, r) if *r == buyer_address && s.is_admin() => s,
            _ => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidAddress,
                    format!("A message must go between {buyer_address} and an admin"),
                ));
            }
        };
        validate_required_text(&payload.content, "content", MAX_MESSAGE_LEN)?;

        let buyer = self.require_buyer(&buyer_id).await?;
        self.require_admin(&admin.id).await?;

        let message = ChatMessage {
            id: new_record_key(),
            buyer_id,
            sender,
            receiver,
            content: payload.content,
            timestamp: now_millis(),
        };
        self.messages.create(&message).await?;

        let rooms = recipient_rooms(&message);
        let event = ServerEvent::ReceiveMessage(ChatDelivery::new(buyer.chat_user(), &message));
        let delivered: usize = rooms.iter().map(|room| self.rooms.emit(room, &event)).sum();
        tracing::info!(
            message_id = %message.id,
            sender = %message.sender,
            receiver = %message.receiver,
            rooms = rooms.len(),
            delivered,
            "Chat message sent"
        );
        Ok((message, rooms))
    }

    /// Load the history between a buyer and one specific admin
    pub async fn select_admin(&self, conn: ConnectionId, payload: SelectAdminPayload) -> AppResult<()> {
        let buyer_id = parse_id(&payload.user_id, "userId")?;
        let admin_id = parse_id(&payload.admin_id, "adminId")?;
        let admin = self.require_admin(&admin_id).await?;

        let history = self
            .messages
            .find_between(&buyer_id, &Address::admin(admin.id))
            .await?;
        self.rooms.send_to(conn, ServerEvent::LoadMessages(history));
        Ok(())
    }

    // ========== History queries ==========

    /// Buyers that exchanged messages with the admin, most recent first
    pub async fn conversations(&self, admin_id: &str) -> AppResult<Vec<ConversationSummary>> {
        let admin_id = parse_id(admin_id, "adminId")?;
        self.require_admin(&admin_id).await?;
        let messages = self
            .messages
            .find_involving(&Address::admin(admin_id))
            .await?;

        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, (ChatMessage, u64)> = HashMap::new();
        for message in messages {
            match grouped.get_mut(&message.buyer_id) {
                Some((_, count)) => *count += 1,
                None => {
                    order.push(message.buyer_id.clone());
                    grouped.insert(message.buyer_id.clone(), (message, 1));
                }
            }
        }

        let users = self.chat_users(&order).await?;
        Ok(order
            .into_iter()
            .filter_map(|buyer_id| {
                let (last, count) = grouped.remove(&buyer_id)?;
                Some(ConversationSummary {
                    user: lookup_user(&users, &buyer_id),
                    last_message: last.content,
                    last_timestamp: last.timestamp,
                    message_count: count,
                })
            })
            .collect())
    }

    /// Every buyer↔admin message of one buyer, oldest first
    pub async fn buyer_history(&self, buyer_id: &str) -> AppResult<Vec<ChatMessage>> {
        let buyer_id = parse_id(buyer_id, "userId")?;
        Ok(self.messages.find_by_buyer(&buyer_id).await?)
    }

    /// Latest message received by the admin from each buyer, newest first
    pub async fn recent_messages(&self, admin_id: &str) -> AppResult<Vec<RecentMessage>> {
        let admin_id = parse_id(admin_id, "adminId")?;
        self.require_admin(&admin_id).await?;
        let received = self
            .messages
            .find_received(&Address::admin(admin_id))
            .await?;

        let mut seen = HashSet::new();
        let latest: Vec<ChatMessage> = received
            .into_iter()
            .filter(|m| seen.insert(m.buyer_id.clone()))
            .take(RECENT_MESSAGES_LIMIT)
            .collect();

        let ids: Vec<String> = latest.iter().map(|m| m.buyer_id.clone()).collect();
        let users = self.chat_users(&ids).await?;
        Ok(latest
            .into_iter()
            .map(|message| RecentMessage {
                user: lookup_user(&users, &message.buyer_id),
                message,
            })
            .collect())
    }

    // ========== Lookups ==========

    async fn require_buyer(&self, id: &str) -> AppResult<BuyerRow> {
        self.buyers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::BuyerNotFound).with_detail("userId", id))
    }

    async fn require_admin(&self, id: &str) -> AppResult<AdminRow> {
        self.admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound).with_detail("adminId", id))
    }

    async fn chat_users(&self, ids: &[String]) -> AppResult<HashMap<String, ChatUser>> {
        let rows = self.buyers.find_many(ids).await?;
        Ok(rows.into_iter().map(|b| (b.id.clone(), b.chat_user())).collect())
    }
}

fn parse_address(raw: &str, field: &str) -> AppResult<Address> {
    raw.parse::<Address>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidAddress, format!("{field}: {e}"))
            .with_detail("field", field)
    })
}

/// Buyer room plus every admin address on the message, without duplicates
pub fn recipient_rooms(message: &ChatMessage) -> Vec<Address> {
    let mut rooms = vec![Address::user(message.buyer_id.clone())];
    for address in [&message.sender, &message.receiver] {
        if address.is_admin() && !rooms.contains(address) {
            rooms.push(address.clone());
        }
    }
    rooms
}

/// Buyer accounts may be gone; keep the id and leave the rest blank
fn lookup_user(users: &HashMap<String, ChatUser>, buyer_id: &str) -> ChatUser {
    users.get(buyer_id).cloned().unwrap_or_else(|| ChatUser {
        user_id: buyer_id.to_string(),
        email: String::new(),
        full_name: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUYER: &str = "64b7f0c2a1e4d3b2c1a09f8e";
    const ADMIN: &str = "64b7f0c2a1e4d3b2c1a09f8f";

    fn message(sender: Address, receiver: Address) -> ChatMessage {
        ChatMessage {
            id: new_record_key(),
            buyer_id: BUYER.into(),
            sender,
            receiver,
            content: "hello".into(),
            timestamp: 1,
        }
    }

    #[test]
    fn test_recipient_rooms_are_deduplicated() {
        let m = message(Address::user(BUYER), Address::admin(ADMIN));
        assert_eq!(
            recipient_rooms(&m),
            vec![Address::user(BUYER), Address::admin(ADMIN)]
        );

        let reply = message(Address::admin(ADMIN), Address::user(BUYER));
        assert_eq!(recipient_rooms(&reply).len(), 2);
    }

    #[test]
    fn test_parse_address_errors() {
        assert_eq!(
            parse_address("nobody", "receiver").unwrap_err().code,
            ErrorCode::InvalidAddress
        );
        assert_eq!(
            parse_address("shipper:64b7f0c2a1e4d3b2c1a09f8e", "receiver")
                .unwrap_err()
                .code,
            ErrorCode::InvalidAddress
        );
        assert!(parse_address(&format!("admin:{ADMIN}"), "receiver").is_ok());
    }
}
