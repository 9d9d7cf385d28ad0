// src/routes/estimates.rs

use axum::Json;

use crate::pricing::{self, BookingRequest, Estimate};

/// POST /api/v1/estimates
/// Live price preview for the wizard. Pure computation, nothing stored;
/// the persisted flavor of the same numbers is POST /api/v1/quotes.
pub async fn create_estimate(Json(req): Json<BookingRequest>) -> Json<Estimate> {
    Json(pricing::breakdown(&req))
}
