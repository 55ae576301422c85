//! Payment entity - Append-only ledger of completed and pending payments.
//!
//! Each payment belongs to one user and records an amount, the channel it was
//! made through (`"online"` payments carry a `transaction_ref`, `"offline"`
//! ones do not), a status, and the payment timestamp. Rows are immutable once
//! created; the outstanding balance is always derived, never stored here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who made the payment
    pub user_id: i64,
    /// Amount paid, always positive
    pub amount: f64,
    /// Payment channel: `"online"` or `"offline"`
    pub channel: String,
    /// Gateway transaction reference; required for online payments
    pub transaction_ref: Option<String>,
    /// Settlement status: `"pending"`, `"completed"`, or `"failed"`
    pub status: String,
    /// When the payment was recorded
    pub paid_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one user
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
