//! 通知模块 - NotificationService
//!
//! Buyer-addressed, one-way notices. Transition notices are written by the
//! fulfillment commit; this service covers the explicit append endpoint,
//! the read flag and listing.

use crate::db::models::Notice;
use crate::db::repository::{NoticeRepository, OrderRepository, RepoError};
use crate::realtime::RealtimeHub;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, parse_id, validate_required_text};
use shared::models::NoticeCreate;
use shared::util::{new_record_key, now_millis};
use shared::{Address, AppError, AppResult, ErrorCode, ServerEvent};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationService {
    notices: NoticeRepository,
    orders: OrderRepository,
    hub: RealtimeHub,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>, hub: RealtimeHub) -> Self {
        Self {
            notices: NoticeRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            hub,
        }
    }

    /// Append a notice. No dedup: every call writes a new record.
    pub async fn create_notice(&self, input: NoticeCreate) -> AppResult<Notice> {
        let buyer_id = parse_id(&input.buyer_id, "userId")?;
        let order_id = parse_id(&input.order_id, "orderId")?;
        validate_required_text(&input.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&input.message, "message", MAX_ADDRESS_LEN)?;

        let order = self.orders.find_by_id(&order_id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", order_id.clone())
        })?;

        let notice = Notice {
            id: new_record_key(),
            buyer_id,
            order_id,
            order_code: order.code,
            title: input.title.trim().to_string(),
            message: input.message.trim().to_string(),
            kind: input.kind,
            is_read: false,
            created_at: now_millis(),
        };
        self.notices.create(&notice).await?;
        tracing::info!(notice_id = %notice.id, buyer_id = %notice.buyer_id, kind = %notice.kind, "Notice created");

        let room = Address::user(notice.buyer_id.clone());
        self.hub.emit(&room, ServerEvent::Notice(notice.clone()));
        Ok(notice)
    }

    /// Flip `is_read`; calling it on an already read notice is a no-op
    pub async fn mark_read(&self, notice_id: &str) -> AppResult<Notice> {
        let notice_id = parse_id(notice_id, "id")?;
        match self.notices.mark_read(&notice_id).await {
            Ok(notice) => Ok(notice),
            Err(RepoError::NotFound(_)) => {
                Err(AppError::new(ErrorCode::NoticeNotFound).with_detail("id", notice_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A buyer's notices, newest first
    pub async fn list(&self, buyer_id: &str) -> AppResult<Vec<Notice>> {
        let buyer_id = parse_id(buyer_id, "userId")?;
        Ok(self.notices.find_by_buyer(&buyer_id).await?)
    }
}
