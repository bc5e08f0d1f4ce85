use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// ```text
/// pending ──► resolved ──► processing ──► delivered
///    │                         ▲    └───► cancelled
///    └─────────────────────────┘
/// ```
///
/// `delivered` and `cancelled` are terminal. Admin confirm/cancel bypass the
/// graph and may jump from any non-terminal status straight to a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Resolved,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Resolved,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Resolved => "resolved",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Edges of the canonical transition graph
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Resolved)
                | (Pending, Processing)
                | (Resolved, Processing)
                | (Processing, Delivered)
                | (Processing, Cancelled)
        )
    }

    /// Statuses from which a shipper may pick the order up
    pub fn awaiting_pickup(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Resolved)
    }

    /// Every status an order may be in for `next` to be reachable via the graph
    pub fn sources_of(next: OrderStatus) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| s.can_transition_to(next))
            .collect()
    }

    /// Every non-terminal status (admin bypass sources)
    pub fn open() -> Vec<OrderStatus> {
        Self::ALL.into_iter().filter(|s| !s.is_terminal()).collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a shipper's own assignment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Processing,
    Delivered,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Processing => "processing",
            AssignmentStatus::Delivered => "delivered",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    /// The order status this assignment status mirrors
    pub fn order_status(&self) -> OrderStatus {
        match self {
            AssignmentStatus::Processing => OrderStatus::Processing,
            AssignmentStatus::Delivered => OrderStatus::Delivered,
            AssignmentStatus::Cancelled => OrderStatus::Cancelled,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_graph_edges() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Resolved));
        assert!(Pending.can_transition_to(Processing));
        assert!(Resolved.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Delivered));
        assert!(Processing.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Resolved.can_transition_to(Pending));
        assert!(!Processing.can_transition_to(Resolved));
        assert!(!Processing.can_transition_to(Processing));
    }

    #[test]
    fn test_sources_of() {
        assert_eq!(
            OrderStatus::sources_of(OrderStatus::Processing),
            vec![OrderStatus::Pending, OrderStatus::Resolved]
        );
        assert_eq!(
            OrderStatus::sources_of(OrderStatus::Delivered),
            vec![OrderStatus::Processing]
        );
        assert_eq!(OrderStatus::open().len(), 3);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
        let s: AssignmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s.order_status(), OrderStatus::Cancelled);
    }
}
