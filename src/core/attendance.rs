//! Attendance ledger business logic.
//!
//! One attendance record exists per (user, date); each record carries an
//! independent decision per meal slot. Marking is create-style and rejects a
//! second decision for a slot that is already set, while the update path
//! overwrites unconditionally and re-derives the fee from the user's current
//! monthly rate. Both paths run inside a store transaction so the
//! find-then-write sequence cannot interleave with a concurrent mark for the
//! same user and day.

use crate::{
    core::fees::BillingConfig,
    entities::{Attendance, User, attendance},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two daily meal opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    /// The midday meal
    Lunch,
    /// The evening meal
    Dinner,
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            other => Err(Error::invalid_input(format!("Invalid meal type: {other}"))),
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
        }
    }
}

fn slot_is_set(record: &attendance::Model, slot: MealSlot) -> bool {
    match slot {
        MealSlot::Lunch => record.lunch_present.is_some(),
        MealSlot::Dinner => record.dinner_present.is_some(),
    }
}

fn set_slot(active: &mut attendance::ActiveModel, slot: MealSlot, present: bool, fee: f64) {
    match slot {
        MealSlot::Lunch => {
            active.lunch_present = Set(Some(present));
            active.lunch_fee = Set(Some(fee));
        }
        MealSlot::Dinner => {
            active.dinner_present = Set(Some(present));
            active.dinner_fee = Set(Some(fee));
        }
    }
}

/// Records a meal decision for `(user, date, slot)`.
///
/// Creates the day's record on the first mark; a later mark for the other slot
/// lands on the same record. Marking a slot that is already decided fails with
/// [`Error::AlreadyMarked`] - re-decisions go through [`update_attendance`].
/// A present slot accrues `monthly_fee / fee_divisor`; an absent one accrues 0.
///
/// # Errors
/// [`Error::UserNotFound`] if the user id does not resolve;
/// [`Error::AlreadyMarked`] on a duplicate same-day same-slot mark.
pub async fn mark_attendance(
    db: &DatabaseConnection,
    billing: &BillingConfig,
    user_id: i64,
    date: NaiveDate,
    slot: MealSlot,
    present: bool,
) -> Result<attendance::Model> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let fee = if present {
        billing.fee_per_meal(user.monthly_fee)
    } else {
        0.0
    };

    let existing = Attendance::find()
        .filter(attendance::Column::UserId.eq(user_id))
        .filter(attendance::Column::Date.eq(date))
        .one(&txn)
        .await?;

    let saved = match existing {
        Some(record) => {
            if slot_is_set(&record, slot) {
                return Err(Error::AlreadyMarked {
                    date,
                    slot: slot.to_string(),
                });
            }
            let mut active: attendance::ActiveModel = record.into();
            set_slot(&mut active, slot, present, fee);
            active.update(&txn).await?
        }
        None => {
            let mut active = attendance::ActiveModel {
                user_id: Set(user_id),
                date: Set(date),
                ..Default::default()
            };
            set_slot(&mut active, slot, present, fee);
            active.insert(&txn).await?
        }
    };

    txn.commit().await?;
    tracing::debug!(user_id, %date, %slot, present, fee, "attendance marked");
    Ok(saved)
}

/// Overwrites a slot decision on an existing record.
///
/// Unlike [`mark_attendance`] this never conflicts: the slot is re-set
/// unconditionally, and the fee is recomputed from the owning user's *current*
/// `monthly_fee`, so rate changes apply retroactively to un-finalized records.
///
/// # Errors
/// [`Error::RecordNotFound`] / [`Error::UserNotFound`] if the record or its
/// owner no longer exists.
pub async fn update_attendance(
    db: &DatabaseConnection,
    billing: &BillingConfig,
    record_id: i64,
    slot: MealSlot,
    present: bool,
) -> Result<attendance::Model> {
    let txn = db.begin().await?;

    let record = Attendance::find_by_id(record_id)
        .one(&txn)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    let user = User::find_by_id(record.user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: record.user_id })?;

    let fee = if present {
        billing.fee_per_meal(user.monthly_fee)
    } else {
        0.0
    };

    let mut active: attendance::ActiveModel = record.into();
    set_slot(&mut active, slot, present, fee);
    let saved = active.update(&txn).await?;

    txn.commit().await?;
    tracing::debug!(record_id, %slot, present, fee, "attendance updated");
    Ok(saved)
}

/// Lists a user's attendance records, optionally restricted to an inclusive
/// date range, ordered by date ascending.
pub async fn list_attendance(
    db: &DatabaseConnection,
    user_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<attendance::Model>> {
    let mut query = Attendance::find().filter(attendance::Column::UserId.eq(user_id));

    if let Some((start, end)) = range {
        query = query
            .filter(attendance::Column::Date.gte(start))
            .filter(attendance::Column::Date.lte(end));
    }

    query
        .order_by_asc(attendance::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts slot-level present marks across all of a user's history.
///
/// A record with both lunch and dinner present counts as 2.
pub async fn count_present(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    let records = list_attendance(db, user_id, None).await?;
    Ok(records.iter().map(attendance::Model::present_slots).sum())
}

/// Deletes all of a user's attendance records. Idempotent.
pub async fn reset_attendance(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    let result = Attendance::delete_many()
        .filter(attendance::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
