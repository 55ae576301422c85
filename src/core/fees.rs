//! Fee aggregation business logic.
//!
//! The accrued fee is derived on read from the attendance ledger: every slot
//! marked present contributes its stored `fee`, an absent slot contributes
//! nothing. The outstanding balance nets the accrual since subscription start
//! against the advance credit; it is never stored.

use crate::{
    core::{attendance, cycle},
    entities::User,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::prelude::*;
use serde::Deserialize;

/// Fee accrual settings.
///
/// The divisor converts a monthly subscription price into a per-meal fee.
/// The default of 60 assumes ~30 days of two meals each; it is configuration
/// rather than a literal so alternate cycle lengths can be tested.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BillingConfig {
    /// Number of meals a monthly fee is divided across
    #[serde(default = "default_fee_divisor")]
    pub fee_divisor: f64,
}

const fn default_fee_divisor() -> f64 {
    60.0
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            fee_divisor: default_fee_divisor(),
        }
    }
}

impl BillingConfig {
    /// Fee attributable to one present meal at the given monthly rate.
    #[must_use]
    pub fn fee_per_meal(&self, monthly_fee: f64) -> f64 {
        monthly_fee / self.fee_divisor
    }
}

/// A monthly fee summary for the current subscription cycle.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MonthlyFeeReport {
    /// Fees accrued within the current cycle
    pub total_fee: f64,
    /// Mess owner's phone number for payment coordination
    pub contact_phone: String,
}

/// Sums the fees of all present slots for `user_id` with
/// `date` in `[start, end]` inclusive.
pub async fn fees_in_range(
    db: &DatabaseConnection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<f64> {
    let records = attendance::list_attendance(db, user_id, Some((start, end))).await?;
    Ok(records
        .iter()
        .map(crate::entities::attendance::Model::accrued_fee)
        .sum())
}

/// Computes the user's signed outstanding balance as of `today`.
///
/// Accrual runs continuously from `start_date` up to `today` - not capped at
/// the cycle end - and the advance credit is subtracted. Positive = owed. A
/// user with no attendance in the window owes zero accrued fees; absence of
/// records is not an error.
///
/// # Errors
/// [`Error::UserNotFound`] if the user id does not resolve;
/// [`Error::MissingStartDate`] if the subscription never started.
pub async fn outstanding_balance(
    db: &DatabaseConnection,
    user_id: i64,
    today: NaiveDate,
) -> Result<f64> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let start = user
        .start_date
        .ok_or(Error::MissingStartDate { user_id })?;

    let accrued = fees_in_range(db, user_id, start, today).await?;
    Ok(accrued - user.paid_in_advance)
}

/// Builds the monthly fee report for the user's current cycle.
///
/// # Errors
/// [`Error::UserNotFound`] / [`Error::MissingStartDate`] as for
/// [`outstanding_balance`].
pub async fn monthly_fee_report(db: &DatabaseConnection, user_id: i64) -> Result<MonthlyFeeReport> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let (start, end) = cycle::current_cycle(&user)?;
    let total_fee = fees_in_range(db, user_id, start, end).await?;

    Ok(MonthlyFeeReport {
        total_fee,
        contact_phone: user.mess_owner_phone,
    })
}
