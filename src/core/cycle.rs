//! Subscription window business logic.
//!
//! A user's billing cycle is the one-calendar-month window between
//! `start_date` and `end_date`. Once the window has expired the cycle rolls
//! forward: the old end becomes the new start and the end moves one month out.
//! The roll runs from a recurring sweep independent of request handling; every
//! function takes `today` explicitly so tests never depend on the wall clock.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate};
use sea_orm::{Set, prelude::*};

/// Advances a date by one calendar month, clamping the day at month end
/// (Jan 31 -> Feb 28/29).
#[must_use]
pub fn add_one_month(date: NaiveDate) -> NaiveDate {
    // Months::new(1) cannot overflow NaiveDate's range for any date we store.
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

/// Returns the user's current cycle bounds.
///
/// # Errors
/// [`Error::MissingStartDate`] if the subscription has not started (or was
/// reset).
pub fn current_cycle(user: &user::Model) -> Result<(NaiveDate, NaiveDate)> {
    match (user.start_date, user.end_date) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(Error::MissingStartDate { user_id: user.id }),
    }
}

/// Rolls the user's cycle forward if it has expired.
///
/// If `end_date < today`, the window advances: new start = old end, new end =
/// new start + 1 month. A long-dormant window may need several steps to catch
/// up; the roll repeats until `end_date >= today`, which also makes repeated
/// invocations a no-op. Returns the new bounds when a roll happened.
pub async fn roll_if_expired(
    db: &DatabaseConnection,
    user: &user::Model,
    today: NaiveDate,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let (mut start, mut end) = current_cycle(user)?;
    if end >= today {
        return Ok(None);
    }

    while end < today {
        start = end;
        end = add_one_month(start);
    }

    let mut active: user::ActiveModel = user.clone().into();
    active.start_date = Set(Some(start));
    active.end_date = Set(Some(end));
    active.update(db).await?;

    tracing::info!(user_id = user.id, %start, %end, "rolled subscription cycle");
    Ok(Some((start, end)))
}

/// Sweeps all users with an expired cycle and rolls each one forward.
///
/// Each user's rollover touches only that user's row, so the sweep needs no
/// global lock and may run concurrently with request handling. Returns the
/// number of users rolled.
pub async fn roll_all_expired(db: &DatabaseConnection, today: NaiveDate) -> Result<usize> {
    let expired = User::find()
        .filter(user::Column::EndDate.lt(today))
        .all(db)
        .await?;

    let mut rolled = 0;
    for user in expired {
        if roll_if_expired(db, &user, today).await?.is_some() {
            rolled += 1;
        }
    }

    if rolled > 0 {
        tracing::info!(rolled, "cycle rollover sweep complete");
    }
    Ok(rolled)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{seed_user, setup_test_db};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_one_month_plain() {
        assert_eq!(add_one_month(date(2025, 3, 15)), date(2025, 4, 15));
    }

    #[test]
    fn test_add_one_month_clamps_day() {
        assert_eq!(add_one_month(date(2025, 1, 31)), date(2025, 2, 28));
        assert_eq!(add_one_month(date(2024, 1, 31)), date(2024, 2, 29));
        assert_eq!(add_one_month(date(2025, 12, 31)), date(2026, 1, 31));
    }

    #[tokio::test]
    async fn test_roll_if_expired_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "roller@mess.test", 6000.0).await?;

        // Push the stored window into the past
        let mut active: user::ActiveModel = user.clone().into();
        active.start_date = Set(Some(date(2025, 1, 10)));
        active.end_date = Set(Some(date(2025, 2, 10)));
        let user = active.update(&db).await?;

        let today = date(2025, 2, 20);
        let rolled = roll_if_expired(&db, &user, today).await?;
        assert_eq!(rolled, Some((date(2025, 2, 10), date(2025, 3, 10))));

        // Second invocation sees a window ending in the future: no-op
        let user = User::find_by_id(user.id).one(&db).await?.unwrap();
        let again = roll_if_expired(&db, &user, today).await?;
        assert_eq!(again, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_roll_catches_up_after_long_gap() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "dormant@mess.test", 6000.0).await?;

        let mut active: user::ActiveModel = user.clone().into();
        active.start_date = Set(Some(date(2024, 6, 1)));
        active.end_date = Set(Some(date(2024, 7, 1)));
        let user = active.update(&db).await?;

        let rolled = roll_if_expired(&db, &user, date(2025, 2, 15)).await?;
        let (start, end) = rolled.unwrap();
        assert_eq!(start, date(2025, 2, 1));
        assert_eq!(end, date(2025, 3, 1));

        Ok(())
    }

    #[tokio::test]
    async fn test_sweep_rolls_only_expired_users() -> Result<()> {
        let db = setup_test_db().await?;
        let expired = seed_user(&db, "expired@mess.test", 6000.0).await?;
        let active_user = seed_user(&db, "active@mess.test", 6000.0).await?;

        let mut am: user::ActiveModel = expired.clone().into();
        am.start_date = Set(Some(date(2025, 1, 1)));
        am.end_date = Set(Some(date(2025, 2, 1)));
        am.update(&db).await?;

        let mut am: user::ActiveModel = active_user.clone().into();
        am.start_date = Set(Some(date(2025, 2, 20)));
        am.end_date = Set(Some(date(2025, 3, 20)));
        am.update(&db).await?;

        let rolled = roll_all_expired(&db, date(2025, 3, 1)).await?;
        assert_eq!(rolled, 1);

        let untouched = User::find_by_id(active_user.id).one(&db).await?.unwrap();
        assert_eq!(untouched.start_date, Some(date(2025, 2, 20)));

        Ok(())
    }

    #[tokio::test]
    async fn test_current_cycle_requires_start_date() -> Result<()> {
        let db = setup_test_db().await?;
        let user = seed_user(&db, "nostart@mess.test", 6000.0).await?;

        let mut active: user::ActiveModel = user.clone().into();
        active.start_date = Set(None);
        active.end_date = Set(None);
        let user = active.update(&db).await?;

        assert!(matches!(
            current_cycle(&user),
            Err(Error::MissingStartDate { .. })
        ));
        Ok(())
    }
}
