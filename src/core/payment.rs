//! Payment ledger business logic.
//!
//! Payments are append-only credit entries against a user's accrued fees.
//! Online payments must carry the gateway's transaction reference; offline
//! (cash-in-hand) payments do not. No intermediate settlement state is
//! modeled, so new payments default to `completed`.

use crate::{
    entities::{Payment, User, payment},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement status a new payment is created with.
pub const STATUS_COMPLETED: &str = "completed";

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentChannel {
    /// Paid through a gateway; requires a transaction reference
    Online,
    /// Paid in person; no reference to record
    Offline,
}

impl FromStr for PaymentChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(Error::invalid_input(format!(
                "Invalid payment type: {other}"
            ))),
        }
    }
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Appends a payment to the user's ledger.
///
/// # Errors
/// [`Error::InvalidAmount`] for non-finite or non-positive amounts;
/// [`Error::InvalidInput`] when an online payment lacks a transaction
/// reference; [`Error::UserNotFound`] if the user id does not resolve.
pub async fn record_payment(
    db: &DatabaseConnection,
    user_id: i64,
    amount: f64,
    channel: PaymentChannel,
    transaction_ref: Option<String>,
) -> Result<payment::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let has_ref = transaction_ref
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if channel == PaymentChannel::Online && !has_ref {
        return Err(Error::invalid_input(
            "transactionRef is required for online payments",
        ));
    }

    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let saved = payment::ActiveModel {
        user_id: Set(user_id),
        amount: Set(amount),
        channel: Set(channel.to_string()),
        transaction_ref: Set(transaction_ref),
        status: Set(STATUS_COMPLETED.to_string()),
        paid_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id, amount, %channel, "payment recorded");
    Ok(saved)
}

/// Lists a user's payments with `paid_at` inside `[from, to]` (whole UTC
/// days, inclusive), ordered by payment time ascending.
pub async fn payment_history(
    db: &DatabaseConnection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<payment::Model>> {
    // Inclusive day bounds: [from 00:00, to+1d 00:00)
    let lower = from
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::invalid_input("invalid from date"))?
        .and_utc();
    let upper = to
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::invalid_input("invalid to date"))?
        .and_utc();

    Payment::find()
        .filter(payment::Column::UserId.eq(user_id))
        .filter(payment::Column::PaidAt.gte(lower))
        .filter(payment::Column::PaidAt.lt(upper))
        .order_by_asc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{seed_user, setup_test_db};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("online".parse::<PaymentChannel>().unwrap(), PaymentChannel::Online);
        assert_eq!("offline".parse::<PaymentChannel>().unwrap(), PaymentChannel::Offline);
        assert!(matches!(
            "cheque".parse::<PaymentChannel>(),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_online_requires_transaction_ref() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "payer@mess.test", 6000.0).await?;

        let missing =
            record_payment(&db, user.id, 500.0, PaymentChannel::Online, None).await;
        assert!(matches!(missing, Err(Error::InvalidInput { .. })));

        let blank = record_payment(
            &db,
            user.id,
            500.0,
            PaymentChannel::Online,
            Some("  ".to_string()),
        )
        .await;
        assert!(matches!(blank, Err(Error::InvalidInput { .. })));

        let ok = record_payment(
            &db,
            user.id,
            500.0,
            PaymentChannel::Online,
            Some("txn-123".to_string()),
        )
        .await?;
        assert_eq!(ok.status, STATUS_COMPLETED);
        assert_eq!(ok.transaction_ref.as_deref(), Some("txn-123"));
        Ok(())
    }

    #[tokio::test]
    async fn test_offline_needs_no_ref() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "cash@mess.test", 6000.0).await?;

        let payment =
            record_payment(&db, user.id, 300.0, PaymentChannel::Offline, None).await?;
        assert_eq!(payment.channel, "offline");
        assert_eq!(payment.transaction_ref, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_bad_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "zero@mess.test", 6000.0).await?;

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result =
                record_payment(&db, user.id, amount, PaymentChannel::Offline, None).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_history_filters_by_day_range() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "history@mess.test", 6000.0).await?;

        record_payment(&db, user.id, 250.0, PaymentChannel::Offline, None).await?;
        record_payment(&db, user.id, 750.0, PaymentChannel::Offline, None).await?;

        let today = chrono::Utc::now().date_naive();
        let hits = payment_history(&db, user.id, today, today).await?;
        assert_eq!(hits.len(), 2);
        assert!(hits[0].paid_at <= hits[1].paid_at);

        let past = payment_history(&db, user.id, date(2020, 1, 1), date(2020, 12, 31)).await?;
        assert!(past.is_empty());
        Ok(())
    }
}
