//! Attendance endpoints.
//!
//! Request bodies are explicit per-operation schemas: required fields are
//! `Option` in the DTO and checked up front, so a missing or malformed field
//! fails with 400 before any business logic runs.

use crate::{
    core::attendance::{self, MealSlot},
    entities::attendance::Model as AttendanceModel,
    errors::{Error, Result},
    http::{AppState, extract::CurrentUser},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkRequest {
    meal_type: Option<String>,
    present: Option<bool>,
}

impl MarkRequest {
    fn validated(self) -> Result<(MealSlot, bool)> {
        let slot = self
            .meal_type
            .ok_or_else(|| Error::invalid_input("mealType is required"))?
            .parse::<MealSlot>()?;
        let present = self
            .present
            .ok_or_else(|| Error::invalid_input("present is required"))?;
        Ok((slot, present))
    }
}

/// `POST /api/attendance/mark` - records today's decision for one slot.
pub(crate) async fn mark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<MarkRequest>,
) -> Result<(StatusCode, Json<AttendanceModel>)> {
    let (slot, present) = body.validated()?;
    let today = Utc::now().date_naive();

    let record =
        attendance::mark_attendance(&state.db, &state.billing, user.id, today, slot, present)
            .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /api/attendance/update/{id}` - overwrites a slot decision.
pub(crate) async fn update(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(record_id): Path<i64>,
    Json(body): Json<MarkRequest>,
) -> Result<Json<AttendanceModel>> {
    let (slot, present) = body.validated()?;

    let record =
        attendance::update_attendance(&state.db, &state.billing, record_id, slot, present).await?;
    Ok(Json(record))
}

/// Per-slot presence in the per-date attendance map.
#[derive(Debug, Serialize)]
pub(crate) struct DaySummary {
    lunch: &'static str,
    dinner: &'static str,
}

fn slot_label(present: Option<bool>) -> &'static str {
    // An undecided slot reads as Absent
    if present == Some(true) { "Present" } else { "Absent" }
}

/// `GET /api/attendance` - the user's full history as a per-date map.
pub(crate) async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<BTreeMap<NaiveDate, DaySummary>>> {
    let records = attendance::list_attendance(&state.db, user.id, None).await?;

    let map = records
        .into_iter()
        .map(|record| {
            (
                record.date,
                DaySummary {
                    lunch: slot_label(record.lunch_present),
                    dinner: slot_label(record.dinner_present),
                },
            )
        })
        .collect();
    Ok(Json(map))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReportRequest {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

/// `POST /api/attendance/report` - records within an inclusive date range.
pub(crate) async fn report(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ReportRequest>,
) -> Result<Json<Vec<AttendanceModel>>> {
    let (Some(start), Some(end)) = (body.start_date, body.end_date) else {
        return Err(Error::invalid_input("startDate and endDate are required"));
    };

    let records = attendance::list_attendance(&state.db, user.id, Some((start, end))).await?;
    Ok(Json(records))
}

/// `GET /api/attendance/count` - slot-level present count across all history.
pub(crate) async fn count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>> {
    let count = attendance::count_present(&state.db, user.id).await?;
    Ok(Json(json!({ "count": count })))
}
