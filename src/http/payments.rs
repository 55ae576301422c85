//! Payment and balance endpoints.

use crate::{
    core::{fees, payment},
    entities::payment::Model as PaymentModel,
    errors::{Error, Result},
    http::{AppState, extract::CurrentUser},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

/// `GET /api/payments/outstanding` - signed balance as of today.
pub(crate) async fn outstanding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>> {
    let today = Utc::now().date_naive();
    let outstanding = fees::outstanding_balance(&state.db, user.id, today).await?;
    Ok(Json(json!({ "outstanding": outstanding })))
}

/// `GET /api/payments/monthly-fees` - fees for the current cycle plus the
/// mess owner's contact for payment coordination.
pub(crate) async fn monthly_fees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>> {
    let report = fees::monthly_fee_report(&state.db, user.id).await?;
    Ok(Json(json!({
        "totalFee": report.total_fee,
        "contactPhone": report.contact_phone,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordPaymentRequest {
    amount: Option<f64>,
    payment_type: Option<String>,
    transaction_ref: Option<String>,
}

/// `POST /api/payments/record` - appends a payment to the user's ledger.
pub(crate) async fn record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentModel>)> {
    let amount = body
        .amount
        .ok_or_else(|| Error::invalid_input("amount is required"))?;
    let channel = body
        .payment_type
        .ok_or_else(|| Error::invalid_input("paymentType is required"))?
        .parse()?;

    let saved =
        payment::record_payment(&state.db, user.id, amount, channel, body.transaction_ref).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryRequest {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

/// `POST /api/payments/history` - payments within an inclusive day range.
pub(crate) async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<HistoryRequest>,
) -> Result<Json<Vec<PaymentModel>>> {
    let (Some(from), Some(to)) = (body.from, body.to) else {
        return Err(Error::invalid_input("from and to dates are required"));
    };

    let payments = payment::payment_history(&state.db, user.id, from, to).await?;
    Ok(Json(payments))
}
