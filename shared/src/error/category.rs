//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Order / fulfillment errors (4xxx)
    Order,
    /// Notice errors (5xxx)
    Notice,
    /// Chat errors (6xxx)
    Chat,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            4000..5000 => Self::Order,
            5000..6000 => Self::Notice,
            6000..7000 => Self::Chat,
            _ => Self::System,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Order => "order",
            Self::Notice => "notice",
            Self::Chat => "chat",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1002), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(4010), ErrorCategory::Order);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Notice);
        assert_eq!(ErrorCategory::from_code(6003), ErrorCategory::Chat);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
        // unassigned ranges fall through to system
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::AssignmentNotFound.category(),
            ErrorCategory::Order
        );
        assert_eq!(ErrorCode::BuyerNotFound.category(), ErrorCategory::Chat);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Notice).unwrap();
        assert_eq!(json, "\"notice\"");
    }
}
