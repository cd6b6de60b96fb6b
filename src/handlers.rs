use crate::dashboard::{
    CHART_MONTHS, PAYMENTS_PENDING_LIMIT, build_chart_data_at, build_dashboard, build_finance_at,
    monthly_payments, parse_month, payment_history_at, pending_payments, try_parse_month,
    upcoming_birthdays_at,
};
use crate::errors::AppError;
use crate::models::{
    Birthday, ChartData, DashboardResponse, FinanceOverview, MonthQuery, PaymentSummary,
    PaymentsResponse,
};
use crate::state::AppState;
use crate::storage::read_records;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::{json, Value};
use tracing::info;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let records = state.records.lock().await;
    Json(build_dashboard(&records))
}

pub async fn get_chart_data(State(state): State<AppState>) -> Json<ChartData> {
    let records = state.records.lock().await;
    Json(build_chart_data_at(today(), &records, CHART_MONTHS))
}

pub async fn get_payments(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<PaymentsResponse>, AppError> {
    let raw = query.month.as_deref().map(str::trim).filter(|raw| !raw.is_empty());
    if let Some(raw) = raw {
        if try_parse_month(raw).is_none() {
            return Err(AppError::bad_request("month must be formatted as YYYY-MM"));
        }
    }

    let month = parse_month(raw, today());
    let records = state.records.lock().await;
    Ok(Json(PaymentsResponse {
        month: monthly_payments(month, &records),
        recent_pending: pending_payments(&records, PAYMENTS_PENDING_LIMIT),
    }))
}

pub async fn get_finance(State(state): State<AppState>) -> Json<FinanceOverview> {
    let records = state.records.lock().await;
    Json(build_finance_at(today(), &records))
}

pub async fn get_payment_history(State(state): State<AppState>) -> Json<Vec<PaymentSummary>> {
    let records = state.records.lock().await;
    Json(payment_history_at(today(), &records, CHART_MONTHS))
}

pub async fn get_birthdays(State(state): State<AppState>) -> Json<Vec<Birthday>> {
    let records = state.records.lock().await;
    Json(upcoming_birthdays_at(today(), &records))
}

/// Re-reads the snapshot from disk. A broken file keeps the current records.
pub async fn reload_records(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let fresh = read_records(&state.records_path).await?;
    let students = fresh.students.len();
    *state.records.lock().await = fresh;
    info!(students, "records snapshot reloaded");
    Ok(Json(json!({ "students": students })))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
