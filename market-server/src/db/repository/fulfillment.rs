//! Fulfillment Repository
//!
//! 一次状态迁移 = 一个事务: order status, the shipper's embedded assignment
//! list and the resulting notice are written together or not at all.
//!
//! The order update is guarded by the expected source statuses. Accepting
//! appends the new assignment inside the transaction, so concurrent accepts
//! by one shipper only contend at the storage level. Completing or
//! cancelling rewrites an existing entry and is guarded by the `revision`
//! that was read. A failed guard throws and nothing is written.

use super::{BaseRepository, RepoError, RepoResult, record_content};
use crate::db::models::{Notice, ShipperAssignment};
use shared::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const STALE_ORDER: &str = "stale_order";
const STALE_SHIPPER: &str = "stale_shipper";

/// How a transition touches the shipper document
#[derive(Debug, Clone)]
pub enum ShipperWrite {
    /// Push a new entry (accept)
    Append {
        shipper_id: String,
        assignment: ShipperAssignment,
    },
    /// Replace the list read at `revision` (complete / cancel)
    Replace {
        shipper_id: String,
        revision: u64,
        assignments: Vec<ShipperAssignment>,
    },
}

/// Everything one transition writes
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub order_id: String,
    /// Statuses the order may be in for the write to apply
    pub from: Vec<OrderStatus>,
    pub next: OrderStatus,
    pub at: i64,
    pub shipper: Option<ShipperWrite>,
    /// Written under its own (deterministic) id
    pub notice: Notice,
}

#[derive(Clone)]
pub struct FulfillmentRepository {
    base: BaseRepository,
}

impl FulfillmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Run the transition transaction.
    ///
    /// `Stale` means the order left its source statuses; `Conflict` means the
    /// shipper document or the storage transaction lost to another writer.
    pub async fn commit(&self, commit: TransitionCommit) -> RepoResult<()> {
        let mut sql = String::from(
            r#"
            BEGIN TRANSACTION;
            LET $moved = (UPDATE orders SET status = $next, updated_at = $at
                WHERE id = type::thing('orders', $order_id) AND status IN $from RETURN AFTER);
            IF array::len($moved) = 0 { THROW "stale_order" };
            "#,
        );
        match &commit.shipper {
            Some(ShipperWrite::Append { .. }) => sql.push_str(
                r#"
            LET $shipped = (UPDATE shipper
                SET assigned_orders = array::append(assigned_orders OR [], $assignment),
                    revision = (revision OR 0) + 1
                WHERE id = type::thing('shipper', $shipper_id) RETURN AFTER);
            IF array::len($shipped) = 0 { THROW "stale_shipper" };
            "#,
            ),
            Some(ShipperWrite::Replace { .. }) => sql.push_str(
                r#"
            LET $shipped = (UPDATE shipper SET assigned_orders = $assignments, revision = $revision + 1
                WHERE id = type::thing('shipper', $shipper_id) AND (revision OR 0) = $revision RETURN AFTER);
            IF array::len($shipped) = 0 { THROW "stale_shipper" };
            "#,
            ),
            None => {}
        }
        sql.push_str(
            r#"
            CREATE type::thing('notice', $notice_id) CONTENT $notice;
            COMMIT TRANSACTION;
            "#,
        );

        let notice_id = commit.notice.id.clone();
        let notice = record_content(&commit.notice)?;
        let query = self
            .base
            .db()
            .query(sql)
            .bind(("order_id", commit.order_id.clone()))
            .bind(("from", commit.from))
            .bind(("next", commit.next))
            .bind(("at", commit.at))
            .bind(("notice_id", notice_id))
            .bind(("notice", notice));
        let query = match commit.shipper {
            Some(ShipperWrite::Append {
                shipper_id,
                assignment,
            }) => query
                .bind(("shipper_id", shipper_id))
                .bind(("assignment", assignment)),
            Some(ShipperWrite::Replace {
                shipper_id,
                revision,
                assignments,
            }) => query
                .bind(("shipper_id", shipper_id))
                .bind(("revision", revision))
                .bind(("assignments", assignments)),
            None => query,
        };

        let mut response = query.await?;
        let errors = response.take_errors();
        if errors.is_empty() {
            return Ok(());
        }

        let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
        if messages.iter().any(|m| m.contains(STALE_ORDER)) {
            return Err(RepoError::Stale(format!(
                "order {} changed while the transition was committing",
                commit.order_id
            )));
        }
        if messages.iter().any(|m| m.contains(STALE_SHIPPER)) {
            return Err(RepoError::Conflict(format!(
                "shipper changed while order {} was committing",
                commit.order_id
            )));
        }
        Err(RepoError::from_db_message(messages.join("; ")))
    }
}
