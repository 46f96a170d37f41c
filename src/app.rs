use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page))
        .route("/api/login", post(handlers::log_in))
        .route("/api/session", get(handlers::get_session))
        .route("/api/counters", get(handlers::get_counters))
        .route("/api/cart", get(handlers::get_cart).post(handlers::add_to_cart))
        .route("/api/cart/:index", delete(handlers::remove_from_cart))
        .route("/api/donations", get(handlers::get_donations).post(handlers::pay_now))
        .route("/api/donations/select", post(handlers::select_preset))
        .with_state(state)
}
