//! HTTP layer - axum router, shared state, and request handlers.
//!
//! Handlers stay thin: decode and validate the request, call into
//! [`crate::core`], and serialize the result. Error responses come from the
//! [`IntoResponse`](axum::response::IntoResponse) implementation on
//! [`crate::errors::Error`], so every handler simply returns `Result`.

/// Attendance endpoints (mark, update, list, report, count)
pub mod attendance;
/// Authenticated-user extractor
pub mod extract;
/// Payment endpoints (record, history, outstanding, monthly fees)
pub mod payments;
/// User endpoints (register, profile, mess reset)
pub mod users;

use crate::core::fees::BillingConfig;
use axum::{
    Router,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;

/// Shared state available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
    /// Fee accrual settings
    pub billing: BillingConfig,
}

impl AppState {
    /// Creates the shared handler state.
    #[must_use]
    pub const fn new(db: DatabaseConnection, billing: BillingConfig) -> Self {
        Self { db, billing }
    }
}

/// Builds the application router with all routes mounted.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users/register", post(users::register))
        .route("/api/users/profile", put(users::update_profile))
        .route("/api/users/reset-mess", post(users::reset_mess))
        .route("/api/attendance/mark", post(attendance::mark))
        .route("/api/attendance/update/{id}", put(attendance::update))
        .route("/api/attendance", get(attendance::list))
        .route("/api/attendance/report", post(attendance::report))
        .route("/api/attendance/count", get(attendance::count))
        .route("/api/payments/outstanding", get(payments::outstanding))
        .route("/api/payments/monthly-fees", get(payments::monthly_fees))
        .route("/api/payments/record", post(payments::record))
        .route("/api/payments/history", post(payments::history))
        .with_state(state)
}
