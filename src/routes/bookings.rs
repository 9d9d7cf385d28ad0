// src/routes/bookings.rs

use axum::http::StatusCode;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{query, query_as};
use uuid::Uuid;

use crate::models::{Booking, BOOKING_STATUSES, BOOKING_STATUS_PENDING};
use crate::pricing::{self, BookingRequest};
use crate::scheduling;
use crate::AppState;

use super::internal_error;

// ─────────────────────────────────────────────────────────────────────────────
// Request models
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBookingBody {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub postal_code: String,
    pub date: NaiveDate,
    pub slot: String, // "HH:MM", must be on the offered grid
    pub quote_id: Option<i64>,
    pub provider_id: Option<i64>,
    pub request: BookingRequest,
}

#[derive(Deserialize)]
pub struct ListQ {
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct PatchBookingBody {
    pub status: Option<String>,
    pub provider_id: Option<i64>,
}

fn check_status(status: &str) -> Result<(), (StatusCode, String)> {
    if BOOKING_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("unknown booking status '{status}'"),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    Json(b): Json<CreateBookingBody>,
) -> Result<Json<Booking>, (StatusCode, String)> {
    let st = b.request.service_type();
    let now = Utc::now().naive_utc();

    // 1) Date inside the bookable window, slot on this service's grid
    if !scheduling::bookable_date(b.date, now.date()) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{} is not a bookable date", b.date),
        ));
    }
    if !scheduling::slot_grid(st).contains(&b.slot.as_str()) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("'{}' is not an offered {} start time", b.slot, st.as_str()),
        ));
    }
    let time = scheduling::parse_slot(&b.slot)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("invalid slot '{}'", b.slot)))?;
    let scheduled_at = b.date.and_time(time);

    // 2) Price server-side from the submitted wizard state; the client
    //    never supplies its own total. Jobs past the online cap never
    //    reach the calendar.
    let est = pricing::breakdown(&b.request);
    if !est.duration.is_finite() || est.duration > scheduling::MAX_BOOKABLE_HOURS {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "estimated {} hours exceeds the online booking limit",
                est.duration
            ),
        ));
    }

    // 3) Re-check against the live calendar; the slot may have been taken
    //    since the client last saw it
    let busy = super::availability::fetch_busy_periods(&state, b.date).await?;
    if !scheduling::slot_available(&b.slot, b.date, now, &busy) {
        return Err((
            StatusCode::CONFLICT,
            format!("slot {} on {} is no longer available", b.slot, b.date),
        ));
    }

    // 4) Persist (booking_ref is the customer-facing reference)
    let row = query_as::<_, Booking>(
        r#"
        INSERT INTO public.bookings
          (booking_ref, quote_id, service_type, customer_name, customer_email,
           customer_phone, postal_code, scheduled_at, duration_hours,
           cleaner_count, total_price, provider_id, status)
        VALUES
          ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
        RETURNING booking_id, booking_ref, quote_id, service_type, customer_name,
                  customer_email, customer_phone, postal_code, scheduled_at,
                  duration_hours, cleaner_count, total_price, provider_id,
                  status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(b.quote_id)
    .bind(st.as_str())
    .bind(b.customer_name)
    .bind(b.customer_email)
    .bind(b.customer_phone)
    .bind(b.postal_code)
    .bind(scheduled_at)
    .bind(est.duration)
    .bind(est.cleaner_count)
    .bind(est.total)
    .bind(b.provider_id)
    .bind(BOOKING_STATUS_PENDING)
    .fetch_one(&state.pool)
    .await
    .map_err(internal_error)?;

    tracing::info!(
        booking_id = row.booking_id,
        booking_ref = %row.booking_ref,
        service = st.as_str(),
        "booking created"
    );
    Ok(Json(row))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<Booking>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(50).clamp(1, 500);
    let offset = q.offset.unwrap_or(0).max(0);
    let rows = match (q.date, q.status) {
        (Some(date), Some(st)) => {
            let (day_start, day_end) = scheduling::day_window(date);
            query_as::<_, Booking>(
                r#"SELECT * FROM public.bookings
                   WHERE scheduled_at BETWEEN $1 AND $2 AND status = $3
                   ORDER BY scheduled_at LIMIT $4 OFFSET $5"#,
            )
            .bind(day_start)
            .bind(day_end)
            .bind(st)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (Some(date), None) => {
            let (day_start, day_end) = scheduling::day_window(date);
            query_as::<_, Booking>(
                r#"SELECT * FROM public.bookings
                   WHERE scheduled_at BETWEEN $1 AND $2
                   ORDER BY scheduled_at LIMIT $3 OFFSET $4"#,
            )
            .bind(day_start)
            .bind(day_end)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (None, Some(st)) => {
            query_as::<_, Booking>(
                r#"SELECT * FROM public.bookings WHERE status = $1
                   ORDER BY booking_id DESC LIMIT $2 OFFSET $3"#,
            )
            .bind(st)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (None, None) => {
            query_as::<_, Booking>(
                r#"SELECT * FROM public.bookings ORDER BY booking_id DESC
                   LIMIT $1 OFFSET $2"#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
    };
    Ok(Json(rows))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, (StatusCode, String)> {
    let row = query_as::<_, Booking>(r#"SELECT * FROM public.bookings WHERE booking_id=$1"#)
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("booking {id} not found")))?;
    Ok(Json(row))
}

/// PATCH /api/v1/bookings/:id  (status transitions, provider dispatch)
pub async fn patch_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(b): Json<PatchBookingBody>,
) -> Result<Json<Booking>, (StatusCode, String)> {
    if let Some(ref st) = b.status {
        check_status(st)?;
    }
    let row = query_as::<_, Booking>(
        r#"
        UPDATE public.bookings SET
          status = COALESCE($2, status),
          provider_id = COALESCE($3, provider_id)
        WHERE booking_id = $1
        RETURNING booking_id, booking_ref, quote_id, service_type, customer_name,
                  customer_email, customer_phone, postal_code, scheduled_at,
                  duration_hours, cleaner_count, total_price, provider_id,
                  status, created_at
        "#,
    )
    .bind(id)
    .bind(b.status)
    .bind(b.provider_id)
    .fetch_optional(&state.pool)
    .await
    .map_err(internal_error)?
    .ok_or_else(|| (StatusCode::NOT_FOUND, format!("booking {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/bookings/:id
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let res = query(r#"DELETE FROM public.bookings WHERE booking_id=$1"#)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(internal_error)?;
    Ok(Json(serde_json::json!({"deleted": res.rows_affected() > 0})))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
