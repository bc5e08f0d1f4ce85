//! Unified error codes for the marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order / fulfillment errors
//! - 5xxx: Notice errors
//! - 6xxx: Chat errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values on the wire so that the
/// web and mobile clients can switch on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4007,
    /// Could not allocate a unique order code
    OrderCodeExhausted = 4009,
    /// Requested status change is not allowed from the current status
    OrderTransitionRejected = 4010,
    /// Shipper has no assignment for the order
    AssignmentNotFound = 4011,
    /// Shipper not found
    ShipperNotFound = 4012,

    // ==================== 5xxx: Notice ====================
    /// Notice not found
    NoticeNotFound = 5001,

    // ==================== 6xxx: Chat ====================
    /// Buyer not found
    BuyerNotFound = 6001,
    /// Admin not found
    AdminNotFound = 6002,
    /// Malformed `role:id` address
    InvalidAddress = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderCodeExhausted => "Could not allocate a unique order code",
            ErrorCode::OrderTransitionRejected => "Order status change is not allowed",
            ErrorCode::AssignmentNotFound => "Shipper has no assignment for this order",
            ErrorCode::ShipperNotFound => "Shipper not found",

            // Notice
            ErrorCode::NoticeNotFound => "Notice not found",

            // Chat
            ErrorCode::BuyerNotFound => "Buyer not found",
            ErrorCode::AdminNotFound => "Admin not found",
            ErrorCode::InvalidAddress => "Invalid address, expected role:id",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            1002 => Ok(ErrorCode::InvalidCredentials),
            1007 => Ok(ErrorCode::AccountDisabled),

            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4009 => Ok(ErrorCode::OrderCodeExhausted),
            4010 => Ok(ErrorCode::OrderTransitionRejected),
            4011 => Ok(ErrorCode::AssignmentNotFound),
            4012 => Ok(ErrorCode::ShipperNotFound),

            5001 => Ok(ErrorCode::NoticeNotFound),

            6001 => Ok(ErrorCode::BuyerNotFound),
            6002 => Ok(ErrorCode::AdminNotFound),
            6003 => Ok(ErrorCode::InvalidAddress),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
