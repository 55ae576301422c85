//! Attendance entity - One row per user per calendar date.
//!
//! Each row holds a decision per meal slot (`lunch`, `dinner`). A slot whose
//! `*_present` column is `None` has never been decided; once set it is updated
//! in place, never duplicated. Uniqueness of `(user_id, date)` is enforced by
//! a composite UNIQUE index created alongside the table, so concurrent marks
//! for the same user and day cannot produce two rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    /// Unique identifier for the attendance record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user this record belongs to
    pub user_id: i64,
    /// Calendar date of the record (UTC, date-only)
    pub date: Date,
    /// Whether the user attended lunch; None if never decided
    pub lunch_present: Option<bool>,
    /// Fee charged for the lunch slot; 0 when marked absent
    pub lunch_fee: Option<f64>,
    /// Whether the user attended dinner; None if never decided
    pub dinner_present: Option<bool>,
    /// Fee charged for the dinner slot; 0 when marked absent
    pub dinner_fee: Option<f64>,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each attendance record belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Sum of fees for slots marked present in this record.
    #[must_use]
    pub fn accrued_fee(&self) -> f64 {
        let mut total = 0.0;
        if self.lunch_present == Some(true) {
            total += self.lunch_fee.unwrap_or(0.0);
        }
        if self.dinner_present == Some(true) {
            total += self.dinner_fee.unwrap_or(0.0);
        }
        total
    }

    /// Number of slots marked present in this record (0, 1, or 2).
    #[must_use]
    pub fn present_slots(&self) -> u64 {
        u64::from(self.lunch_present == Some(true)) + u64::from(self.dinner_present == Some(true))
    }
}
