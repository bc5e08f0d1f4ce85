//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::AssignmentNotFound
            | Self::ShipperNotFound
            | Self::NoticeNotFound
            | Self::BuyerNotFound
            | Self::AdminNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrderTransitionRejected
            | Self::OrderCodeExhausted => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::InvalidCredentials | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::OrderEmpty
            | Self::InvalidAddress => StatusCode::BAD_REQUEST,
        }
    }
}
