//! FulfillmentCoordinator - 订单履约状态机
//!
//! Drives `pending → resolved → processing → {delivered | cancelled}` and
//! keeps the order, the shipper's embedded assignment and the buyer notice in
//! step. Each transition is validated against a fresh read, then committed as
//! one guarded transaction. A commit that loses a race (the order moved,
//! the shipper document moved, or storage reported a write conflict) backs
//! off with jitter, re-reads and re-validates, up to `TRANSITION_MAX_ATTEMPTS`
//! times. Only a re-read showing the order outside the source statuses turns
//! into `OrderTransitionRejected`.
//!
//! Notices written by transitions use a key derived from `(order, status)`.
//! A status is entered at most once per order, so a retried or reconciled
//! transition can never produce a second notice.

use crate::core::Config;
use crate::db::models::{Notice, Order, ShipperAssignment, ShipperRow};
use crate::db::repository::{
    FulfillmentRepository, NoticeRepository, OrderRepository, RepoError, ShipperRepository,
    ShipperWrite, TransitionCommit,
};
use crate::realtime::RealtimeHub;
use crate::utils::validation::parse_id;
use rand::Rng;
use serde::Serialize;
use shared::models::AssignmentBuckets;
use shared::util::now_millis;
use shared::{Address, AppError, AppResult, AssignmentStatus, ErrorCode, OrderStatus, ServerEvent};
use std::fmt;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

const BACKOFF_BASE_MS: u64 = 4;
const BACKOFF_MAX_MS: u64 = 200;

/// Who moves the order and where to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ShipperAccept,
    ShipperComplete,
    ShipperCancel,
    /// Support confirms the order before pickup
    AdminResolve,
    /// Administrative bypass to `delivered`
    AdminConfirm,
    /// Administrative bypass to `cancelled`
    AdminCancel,
}

impl Transition {
    pub fn target(&self) -> OrderStatus {
        match self {
            Transition::ShipperAccept => OrderStatus::Processing,
            Transition::ShipperComplete | Transition::AdminConfirm => OrderStatus::Delivered,
            Transition::ShipperCancel | Transition::AdminCancel => OrderStatus::Cancelled,
            Transition::AdminResolve => OrderStatus::Resolved,
        }
    }

    /// Statuses the order may be in for this transition to apply
    pub fn sources(&self) -> Vec<OrderStatus> {
        match self {
            Transition::AdminConfirm | Transition::AdminCancel => OrderStatus::open(),
            _ => OrderStatus::sources_of(self.target()),
        }
    }

    pub fn by_shipper(&self) -> bool {
        matches!(
            self,
            Transition::ShipperAccept | Transition::ShipperComplete | Transition::ShipperCancel
        )
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::ShipperAccept => "shipper_accept",
            Transition::ShipperComplete => "shipper_complete",
            Transition::ShipperCancel => "shipper_cancel",
            Transition::AdminResolve => "admin_resolve",
            Transition::AdminConfirm => "admin_confirm",
            Transition::AdminCancel => "admin_cancel",
        };
        f.write_str(name)
    }
}

/// Result of a committed transition
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub order: Order,
    /// The shipper's assignment after the transition (shipper transitions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<ShipperAssignment>,
    pub notice: Notice,
}

/// Deterministic notice key for the notice announcing `status` on `order_id`
pub fn transition_notice_id(order_id: &str, status: OrderStatus) -> String {
    Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("notice:{order_id}:{status}").as_bytes(),
    )
    .simple()
    .to_string()
}

/// Title and body of the notice announcing `status`
pub fn notice_text(status: OrderStatus, code: &str) -> (String, String) {
    match status {
        OrderStatus::Pending => (
            "Order placed".to_string(),
            format!("Order {code} has been placed."),
        ),
        OrderStatus::Resolved => (
            "Order confirmed".to_string(),
            format!("Order {code} has been confirmed and is waiting for pickup."),
        ),
        OrderStatus::Processing => (
            "Order handed to the carrier".to_string(),
            format!("Order {code} has been handed to the delivery partner."),
        ),
        OrderStatus::Delivered => (
            "Order completed".to_string(),
            format!("Order {code} was delivered successfully."),
        ),
        OrderStatus::Cancelled => (
            "Order cancelled".to_string(),
            format!("Order {code} was cancelled."),
        ),
    }
}

fn build_notice(order: &Order, status: OrderStatus, at: i64) -> Notice {
    let (title, message) = notice_text(status, &order.code);
    Notice {
        id: transition_notice_id(&order.id, status),
        buyer_id: order.buyer_id.clone(),
        order_id: order.id.clone(),
        order_code: order.code.clone(),
        title,
        message,
        kind: status,
        is_read: false,
        created_at: at,
    }
}

fn rejected(order: &Order, transition: Transition) -> AppError {
    AppError::with_message(
        ErrorCode::OrderTransitionRejected,
        format!(
            "Order {} is {}; {} is not allowed",
            order.code, order.status, transition
        ),
    )
    .with_detail("orderId", order.id.clone())
    .with_detail("status", order.status.as_str())
    .with_detail("target", transition.target().as_str())
}

#[derive(Clone)]
pub struct FulfillmentCoordinator {
    orders: OrderRepository,
    shippers: ShipperRepository,
    notices: NoticeRepository,
    commits: FulfillmentRepository,
    hub: RealtimeHub,
    max_attempts: u32,
}

impl FulfillmentCoordinator {
    pub fn new(db: Surreal<Db>, hub: RealtimeHub, config: &Config) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            shippers: ShipperRepository::new(db.clone()),
            notices: NoticeRepository::new(db.clone()),
            commits: FulfillmentRepository::new(db),
            hub,
            max_attempts: config.transition_max_attempts.max(1),
        }
    }

    pub async fn accept_by_shipper(&self, shipper_id: &str, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::ShipperAccept, Some(shipper_id), order_id).await
    }

    pub async fn complete_by_shipper(&self, shipper_id: &str, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::ShipperComplete, Some(shipper_id), order_id).await
    }

    pub async fn cancel_by_shipper(&self, shipper_id: &str, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::ShipperCancel, Some(shipper_id), order_id).await
    }

    pub async fn admin_resolve(&self, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::AdminResolve, None, order_id).await
    }

    pub async fn admin_confirm(&self, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::AdminConfirm, None, order_id).await
    }

    pub async fn admin_cancel(&self, order_id: &str) -> AppResult<TransitionOutcome> {
        self.apply(Transition::AdminCancel, None, order_id).await
    }

    /// Validate, commit, retry on a lost race, then notify the buyer
    pub async fn apply(
        &self,
        transition: Transition,
        shipper_id: Option<&str>,
        order_id: &str,
    ) -> AppResult<TransitionOutcome> {
        let order_id = parse_id(order_id, "orderId")?;
        let shipper_id = match (transition.by_shipper(), shipper_id) {
            (true, Some(id)) => Some(parse_id(id, "shipperId")?),
            (true, None) => return Err(AppError::required_field("shipperId")),
            (false, _) => None,
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let (commit, outcome) = self
                .plan(transition, shipper_id.as_deref(), &order_id)
                .await?;

            let err = match self.commits.commit(commit).await {
                Ok(()) => {
                    tracing::info!(
                        transition = %transition,
                        order_id = %outcome.order.id,
                        code = %outcome.order.code,
                        status = %outcome.order.status,
                        shipper_id = shipper_id.as_deref().unwrap_or("-"),
                        attempt,
                        "Order transition committed"
                    );
                    self.announce(&outcome.notice);
                    return Ok(outcome);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                tracing::error!(
                    transition = %transition,
                    order_id = %order_id,
                    attempt,
                    error = %err,
                    "Order transition failed"
                );
                return Err(err.into());
            }
            if attempt >= self.max_attempts {
                // the re-read decides: a moved order is a rejection, a
                // still-legal one only lost every race
                self.plan(transition, shipper_id.as_deref(), &order_id).await?;
                tracing::error!(
                    transition = %transition,
                    order_id = %order_id,
                    attempts = attempt,
                    error = %err,
                    "Order transition still contended, giving up"
                );
                return Err(AppError::database(format!(
                    "order {order_id} is busy, {transition} did not commit after {attempt} attempts"
                )));
            }

            tracing::debug!(
                transition = %transition,
                order_id = %order_id,
                attempt,
                error = %err,
                "Order transition lost a race, re-reading"
            );
            tokio::time::sleep(retry_backoff(attempt)).await;
        }
    }

    /// Read current state and build the commit, or reject the transition
    async fn plan(
        &self,
        transition: Transition,
        shipper_id: Option<&str>,
        order_id: &str,
    ) -> AppResult<(TransitionCommit, TransitionOutcome)> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", order_id))?;

        let shipper = match shipper_id {
            Some(id) => Some(self.shippers.find_by_id(id).await?.ok_or_else(|| {
                AppError::new(ErrorCode::ShipperNotFound).with_detail("shipperId", id)
            })?),
            None => None,
        };

        let target = transition.target();
        let sources = transition.sources();
        if order.status.is_terminal() || !sources.contains(&order.status) {
            return Err(rejected(&order, transition));
        }

        let now = now_millis();
        let (shipper_write, assignment) = match shipper {
            Some(shipper) => {
                let (write, assignment) = shipper_write(&shipper, &order, transition, now)?;
                (Some(write), Some(assignment))
            }
            None => (None, None),
        };

        let notice = build_notice(&order, target, now);
        let mut moved = order;
        moved.status = target;
        moved.updated_at = now;

        let commit = TransitionCommit {
            order_id: moved.id.clone(),
            from: sources,
            next: target,
            at: now,
            shipper: shipper_write,
            notice: notice.clone(),
        };
        let outcome = TransitionOutcome {
            order: moved,
            assignment,
            notice,
        };
        Ok((commit, outcome))
    }

    /// Push the notice to the buyer's live connections, if any
    fn announce(&self, notice: &Notice) {
        let room = Address::user(notice.buyer_id.clone());
        let delivered = self.hub.emit(&room, ServerEvent::Notice(notice.clone()));
        tracing::debug!(room = %room, delivered, notice_id = %notice.id, "Notice announced");
    }

    /// A shipper's assignments partitioned by assignment status
    pub async fn shipper_assignments(&self, shipper_id: &str) -> AppResult<AssignmentBuckets> {
        let shipper_id = parse_id(shipper_id, "shipperId")?;
        let shipper = self.shippers.find_by_id(&shipper_id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ShipperNotFound).with_detail("shipperId", shipper_id)
        })?;
        Ok(shipper.assigned_orders.into_iter().collect())
    }

    /// Recreate any missing state-change notice for non-pending orders.
    ///
    /// Returns the number of notices written. Safe to run concurrently with
    /// live transitions: keys are deterministic, so a duplicate insert fails
    /// instead of duplicating.
    pub async fn reconcile(&self) -> AppResult<usize> {
        let statuses: Vec<OrderStatus> = OrderStatus::ALL
            .into_iter()
            .filter(|s| *s != OrderStatus::Pending)
            .collect();
        let orders = self.orders.find_by_status(&statuses).await?;
        let expected: Vec<String> = orders
            .iter()
            .map(|o| transition_notice_id(&o.id, o.status))
            .collect();
        let existing = self.notices.existing_ids(&expected).await?;

        let mut written = 0;
        for (order, key) in orders.iter().zip(expected.iter()) {
            if existing.contains(key) {
                continue;
            }
            let notice = build_notice(order, order.status, now_millis());
            match self.notices.create(&notice).await {
                Ok(()) => {
                    written += 1;
                    tracing::info!(order_id = %order.id, status = %order.status, "Missing notice recreated");
                }
                // lost a race with a live transition; the notice exists now
                Err(RepoError::Database(msg)) if msg.contains("already exists") => {}
                Err(err) => return Err(err.into()),
            }
        }
        if written > 0 {
            tracing::info!(written, scanned = orders.len(), "Notice reconciliation finished");
        }
        Ok(written)
    }
}

/// Jittered exponential pause before re-reading a contended transition
fn retry_backoff(attempt: u32) -> Duration {
    let ceiling = (BACKOFF_BASE_MS << attempt.min(6)).min(BACKOFF_MAX_MS);
    Duration::from_millis(rand::thread_rng().gen_range(ceiling / 2..=ceiling))
}

/// The shipper write for `transition`, plus the touched entry
fn shipper_write(
    shipper: &ShipperRow,
    order: &Order,
    transition: Transition,
    now: i64,
) -> AppResult<(ShipperWrite, ShipperAssignment)> {
    if transition == Transition::ShipperAccept {
        let assignment = ShipperAssignment {
            order_id: order.id.clone(),
            status: AssignmentStatus::Processing,
            created_at: now,
            updated_at: now,
        };
        let write = ShipperWrite::Append {
            shipper_id: shipper.id.clone(),
            assignment: assignment.clone(),
        };
        return Ok((write, assignment));
    }

    let next = match transition.target() {
        OrderStatus::Delivered => AssignmentStatus::Delivered,
        _ => AssignmentStatus::Cancelled,
    };
    let mut assignments = shipper.assigned_orders.clone();
    let entry = assignments
        .iter_mut()
        .find(|a| a.order_id == order.id)
        .ok_or_else(|| {
            AppError::new(ErrorCode::AssignmentNotFound)
                .with_detail("shipperId", shipper.id.clone())
                .with_detail("orderId", order.id.clone())
        })?;
    if entry.status != AssignmentStatus::Processing {
        return Err(rejected(order, transition));
    }
    entry.status = next;
    entry.updated_at = now;
    let assignment = entry.clone();
    let write = ShipperWrite::Replace {
        shipper_id: shipper.id.clone(),
        revision: shipper.revision,
        assignments,
    };
    Ok((write, assignment))
}
