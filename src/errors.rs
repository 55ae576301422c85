//! Unified error types for `MessMate`.
//!
//! All fallible operations in the crate return [`Result`]. The HTTP layer maps
//! each variant to a status code in the [`IntoResponse`] implementation, so
//! handlers can bubble errors with `?` and still produce the right response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration problem
        message: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was malformed or missing
        message: String,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    #[error("Not authorized")]
    Unauthorized,

    #[error("User {id} not found")]
    UserNotFound {
        /// The unresolvable user id
        id: i64,
    },

    #[error("Attendance record {id} not found")]
    RecordNotFound {
        /// The unresolvable attendance record id
        id: i64,
    },

    #[error("User {user_id} has no subscription start date")]
    MissingStartDate {
        /// The user whose subscription has not started
        user_id: i64,
    },

    #[error("Attendance already marked for {slot} on {date}")]
    AlreadyMarked {
        /// The calendar date of the duplicate mark
        date: chrono::NaiveDate,
        /// The slot that was already decided
        slot: String,
    },

    #[error("A user with email {email} already exists")]
    EmailTaken {
        /// The duplicate email address
        email: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds an [`Error::InvalidInput`] from anything displayable.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } | Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UserNotFound { .. }
            | Self::RecordNotFound { .. }
            | Self::MissingStartDate { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyMarked { .. } | Self::EmailTaken { .. } => StatusCode::CONFLICT,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs, not in the response body.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "something went wrong".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
