//! User endpoints - registration, profile updates, and mess-data reset.

use crate::{
    core::user::{self, NewUser, ProfileChanges},
    entities::user::Model as UserModel,
    errors::{Error, Result},
    http::{AppState, extract::CurrentUser},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    start_date: Option<NaiveDate>,
    monthly_fee: Option<f64>,
    #[serde(default)]
    paid_in_advance: f64,
    mess_owner_phone: Option<String>,
    lunch_time: Option<String>,
    dinner_time: Option<String>,
}

impl RegisterRequest {
    fn validated(self) -> Result<NewUser> {
        let required = |field: &str| Error::invalid_input(format!("{field} is required"));
        Ok(NewUser {
            name: self.name.ok_or_else(|| required("name"))?,
            email: self.email.ok_or_else(|| required("email"))?,
            start_date: self.start_date.ok_or_else(|| required("startDate"))?,
            monthly_fee: self.monthly_fee.ok_or_else(|| required("monthlyFee"))?,
            paid_in_advance: self.paid_in_advance,
            mess_owner_phone: self
                .mess_owner_phone
                .ok_or_else(|| required("messOwnerPhone"))?,
            lunch_time: self.lunch_time.unwrap_or_else(|| "13:00".to_string()),
            dinner_time: self.dinner_time.unwrap_or_else(|| "20:30".to_string()),
        })
    }
}

/// `POST /api/users/register` - creates a subscriber and returns their token.
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let input = body.validated()?;
    let saved = user::register_user(&state.db, input).await?;

    let token = saved.api_token.clone();
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": saved, "token": token })),
    ))
}

/// `PUT /api/users/profile` - partial profile update for the caller.
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<UserModel>> {
    let updated = user::update_profile(&state.db, caller.id, changes).await?;
    Ok(Json(updated))
}

/// `POST /api/users/reset-mess` - idempotent subscription teardown.
pub(crate) async fn reset_mess(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Value>> {
    user::reset_mess_data(&state.db, caller.id).await?;
    Ok(Json(json!({ "message": "mess data cleared" })))
}
