use axum::http::StatusCode;

pub mod health;
pub mod estimates;
pub mod quotes;
pub mod availability;
pub mod providers;
pub mod extras;
pub mod bookings;

// Common error mapper
pub fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("internal error: {e}"))
}
