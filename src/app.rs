use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/chart-data", get(handlers::get_chart_data))
        .route("/api/payments", get(handlers::get_payments))
        .route("/api/payments/history", get(handlers::get_payment_history))
        .route("/api/finance", get(handlers::get_finance))
        .route("/api/birthdays", get(handlers::get_birthdays))
        .route("/api/records/reload", post(handlers::reload_records))
        .with_state(state)
}
