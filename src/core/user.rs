//! User lifecycle business logic.
//!
//! Registration is the only way a subscription window is created; the cycle
//! rollover (see [`crate::core::cycle`]) is the only thing that moves it
//! afterwards. Registration also issues the opaque API token the HTTP layer
//! resolves authenticated requests with - session mechanics beyond that
//! lookup are outside this crate's scope.

use crate::{
    core::cycle,
    entities::{Attendance, AttendanceColumn, User, user},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use uuid::Uuid;

/// Input for [`register_user`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Email address; must be unique
    pub email: String,
    /// First day of the subscription (UTC calendar date)
    pub start_date: NaiveDate,
    /// Monthly subscription price
    pub monthly_fee: f64,
    /// Credit already paid, if any
    #[serde(default)]
    pub paid_in_advance: f64,
    /// Mess owner's phone number
    pub mess_owner_phone: String,
    /// Scheduled lunch time (display only)
    pub lunch_time: String,
    /// Scheduled dinner time (display only)
    pub dinner_time: String,
}

/// Partial profile update; `None` fields are left unchanged.
///
/// Cycle bounds are deliberately absent - they move only through registration
/// and rollover.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    /// New display name
    pub name: Option<String>,
    /// New mess owner phone
    pub mess_owner_phone: Option<String>,
    /// New lunch time
    pub lunch_time: Option<String>,
    /// New dinner time
    pub dinner_time: Option<String>,
    /// New monthly rate; applies to future fee computations and to
    /// explicit attendance updates
    pub monthly_fee: Option<f64>,
    /// New advance credit balance
    pub paid_in_advance: Option<f64>,
}

fn validate_amounts(monthly_fee: f64, paid_in_advance: f64) -> Result<()> {
    if !monthly_fee.is_finite() || monthly_fee < 0.0 {
        return Err(Error::InvalidAmount {
            amount: monthly_fee,
        });
    }
    if !paid_in_advance.is_finite() || paid_in_advance < 0.0 {
        return Err(Error::InvalidAmount {
            amount: paid_in_advance,
        });
    }
    Ok(())
}

/// Registers a new subscriber and issues their API token.
///
/// The start date is taken as a UTC calendar date; the cycle end is one
/// calendar month later.
///
/// # Errors
/// [`Error::InvalidInput`] for a malformed email or empty name;
/// [`Error::InvalidAmount`] for negative fee/credit;
/// [`Error::EmailTaken`] when the email is already registered.
pub async fn register_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::invalid_input("Name cannot be empty"));
    }
    let email = input.email.trim().to_lowercase();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(Error::invalid_input("Invalid email address"));
    }
    validate_amounts(input.monthly_fee, input.paid_in_advance)?;

    let existing = User::find()
        .filter(user::Column::Email.eq(email.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::EmailTaken { email });
    }

    let end_date = cycle::add_one_month(input.start_date);
    let token = Uuid::new_v4().to_string();

    let saved = user::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(email),
        start_date: Set(Some(input.start_date)),
        end_date: Set(Some(end_date)),
        monthly_fee: Set(input.monthly_fee),
        paid_in_advance: Set(input.paid_in_advance),
        mess_owner_phone: Set(input.mess_owner_phone),
        lunch_time: Set(input.lunch_time),
        dinner_time: Set(input.dinner_time),
        api_token: Set(Some(token)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(user_id = saved.id, "user registered");
    Ok(saved)
}

/// Resolves an API token to its user, if any. The HTTP auth extractor's
/// backing lookup.
pub async fn find_by_token(db: &DatabaseConnection, token: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::ApiToken.eq(token))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial profile update. Last-writer-wins against a concurrent
/// cycle rollover is acceptable; the rollover never touches these fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    changes: ProfileChanges,
) -> Result<user::Model> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let monthly_fee = changes.monthly_fee.unwrap_or(user.monthly_fee);
    let paid_in_advance = changes.paid_in_advance.unwrap_or(user.paid_in_advance);
    validate_amounts(monthly_fee, paid_in_advance)?;

    let mut active: user::ActiveModel = user.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(phone) = changes.mess_owner_phone {
        active.mess_owner_phone = Set(phone);
    }
    if let Some(lunch) = changes.lunch_time {
        active.lunch_time = Set(lunch);
    }
    if let Some(dinner) = changes.dinner_time {
        active.dinner_time = Set(dinner);
    }
    active.monthly_fee = Set(monthly_fee);
    active.paid_in_advance = Set(paid_in_advance);

    active.update(db).await.map_err(Into::into)
}

/// Clears the user's subscription state and deletes their attendance history.
///
/// Cycle bounds are unset, the fee and advance credit zeroed, and every
/// attendance row removed. Running it again is a no-op.
///
/// # Errors
/// [`Error::UserNotFound`] if the user id does not resolve.
pub async fn reset_mess_data(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active: user::ActiveModel = user.into();
    active.start_date = Set(None);
    active.end_date = Set(None);
    active.monthly_fee = Set(0.0);
    active.paid_in_advance = Set(0.0);
    active.update(&txn).await?;

    Attendance::delete_many()
        .filter(AttendanceColumn::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(user_id, "mess data reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::attendance::{MealSlot, list_attendance, mark_attendance};
    use crate::core::fees::BillingConfig;
    use crate::test_utils::{seed_user, setup_test_db};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Asha".to_string(),
            email: email.to_string(),
            start_date: date(2025, 1, 31),
            monthly_fee: 6000.0,
            paid_in_advance: 0.0,
            mess_owner_phone: "+10000000000".to_string(),
            lunch_time: "13:00".to_string(),
            dinner_time: "20:30".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_sets_cycle_and_token() -> Result<()> {
        let db = setup_test_db().await?;
        let user = register_user(&db, new_user("asha@mess.test")).await?;

        assert_eq!(user.start_date, Some(date(2025, 1, 31)));
        // End date clamps at February's month end
        assert_eq!(user.end_date, Some(date(2025, 2, 28)));
        assert!(user.api_token.is_some());

        let token = user.api_token.clone().unwrap();
        let found = find_by_token(&db, &token).await?;
        assert_eq!(found.map(|u| u.id), Some(user.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, new_user("dup@mess.test")).await?;

        let again = register_user(&db, new_user("dup@mess.test")).await;
        assert!(matches!(again, Err(Error::EmailTaken { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_validates_input() -> Result<()> {
        let db = setup_test_db().await?;

        let mut bad_email = new_user("not-an-email");
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            register_user(&db, bad_email).await,
            Err(Error::InvalidInput { .. })
        ));

        let mut bad_fee = new_user("fee@mess.test");
        bad_fee.monthly_fee = -1.0;
        assert!(matches!(
            register_user(&db, bad_fee).await,
            Err(Error::InvalidAmount { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_partial() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "partial@mess.test", 6000.0).await?;

        let updated = update_profile(
            &db,
            user.id,
            ProfileChanges {
                monthly_fee: Some(7200.0),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.monthly_fee, 7200.0);
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.start_date, user.start_date);
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_mess_data_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "reset@mess.test", 6000.0).await?;
        let billing = BillingConfig::default();

        mark_attendance(&db, &billing, user.id, date(2025, 1, 8), MealSlot::Lunch, true).await?;

        reset_mess_data(&db, user.id).await?;
        reset_mess_data(&db, user.id).await?;

        let user = User::find_by_id(user.id).one(&db).await?.unwrap();
        assert_eq!(user.start_date, None);
        assert_eq!(user.end_date, None);
        assert_eq!(user.monthly_fee, 0.0);
        assert_eq!(user.paid_in_advance, 0.0);
        assert!(list_attendance(&db, user.id, None).await?.is_empty());
        Ok(())
    }
}
