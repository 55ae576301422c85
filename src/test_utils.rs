//! Shared test utilities for `MessMate`.
//!
//! This module provides common helper functions for setting up test databases
//! and seeding users with sensible defaults.

use crate::{
    core::user::{NewUser, register_user},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user with sensible defaults.
///
/// # Defaults
/// * `start_date`: 2025-01-01 (cycle runs to 2025-02-01)
/// * `paid_in_advance`: 0.0
/// * `mess_owner_phone`: "+10000000000"
#[allow(clippy::unwrap_used)]
pub async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    monthly_fee: f64,
) -> Result<entities::user::Model> {
    register_user(
        db,
        NewUser {
            name: "Test Subscriber".to_string(),
            email: email.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            monthly_fee,
            paid_in_advance: 0.0,
            mess_owner_phone: "+10000000000".to_string(),
            lunch_time: "13:00".to_string(),
            dinner_time: "20:30".to_string(),
        },
    )
    .await
}
