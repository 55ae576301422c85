//! User entity - Represents a mess subscriber.
//!
//! Each user carries their subscription window (`start_date`/`end_date`),
//! the monthly fee their attendance is billed against, any advance credit,
//! and the mess owner's contact used for payment coordination.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the subscriber
    pub name: String,
    /// Email address, unique per user
    #[sea_orm(unique)]
    pub email: String,
    /// Start of the current billing cycle (UTC calendar date); None until the
    /// subscription starts or after a mess-data reset
    pub start_date: Option<Date>,
    /// End of the current billing cycle, always one calendar month after
    /// `start_date` when both are set
    pub end_date: Option<Date>,
    /// Subscription price for one full cycle
    pub monthly_fee: f64,
    /// Non-negative credit applied against accrued fees
    pub paid_in_advance: f64,
    /// Mess owner's phone number, surfaced in the monthly fee report
    pub mess_owner_phone: String,
    /// Scheduled lunch serving time (display only, e.g. "13:00")
    pub lunch_time: String,
    /// Scheduled dinner serving time (display only, e.g. "20:30")
    pub dinner_time: String,
    /// Opaque bearer token identifying the user on authenticated routes
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many attendance records
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    /// One user has many payment records
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
