//! Database configuration module for `MessMate`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. The one addition the derive cannot express
//! is the composite UNIQUE index on `attendance (user_id, date)`, which backs
//! the one-record-per-user-per-day invariant at the store level.

use crate::entities::{Attendance, Payment, User, attendance};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/messmate.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database.
///
/// Uses the `DATABASE_URL` environment variable and falls back to a default
/// local `SQLite` file if it is not set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions, plus the attendance uniqueness index.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut attendance_table = schema.create_table_from_entity(Attendance);
    let mut payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(attendance_table.if_not_exists()))
        .await?;
    db.execute(builder.build(payment_table.if_not_exists())).await?;

    // At most one attendance record per (user, date). Concurrent marks for the
    // same user and day race on find-then-insert; this index makes the loser fail
    // instead of creating a duplicate row.
    let attendance_unique = Index::create()
        .if_not_exists()
        .name("idx_attendance_user_date")
        .table(Attendance)
        .col(attendance::Column::UserId)
        .col(attendance::Column::Date)
        .unique()
        .to_owned();
    db.execute(builder.build(&attendance_unique)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        attendance::Model as AttendanceModel, payment::Model as PaymentModel,
        user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<AttendanceModel> = Attendance::find().limit(1).all(&db).await?;
        let _: Vec<PaymentModel> = Payment::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_user_date_rejected_by_index() -> Result<()> {
        use chrono::NaiveDate;
        use sea_orm::Set;

        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let date = NaiveDate::from_ymd_opt(2025, 4, 2).ok_or_else(|| {
            crate::errors::Error::invalid_input("bad test date")
        })?;
        let row = |_| crate::entities::attendance::ActiveModel {
            user_id: Set(1),
            date: Set(date),
            lunch_present: Set(Some(true)),
            lunch_fee: Set(Some(100.0)),
            ..Default::default()
        };

        Attendance::insert(row(0)).exec(&db).await?;
        let second = Attendance::insert(row(1)).exec(&db).await;
        assert!(second.is_err(), "unique index must reject the duplicate row");

        Ok(())
    }
}
