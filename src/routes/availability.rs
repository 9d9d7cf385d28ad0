// src/routes/availability.rs

use axum::http::StatusCode;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::query_as;
use std::collections::HashMap;

use crate::models::{Provider, BOOKING_STATUS_CANCELLED, PROVIDER_STATUS_VERIFIED};
use crate::pricing::ServiceType;
use crate::scheduling::{self, AvailabilityWindow, BusyPeriod, ProviderSchedule, SlotStatus};
use crate::AppState;

use super::internal_error;

// ─────────────────────────────────────────────────────────────────────────────
// Slots
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SlotsQ {
    pub service_type: ServiceType,
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct SlotsResp {
    pub date: NaiveDate,
    pub service_type: ServiceType,
    pub slots: Vec<SlotStatus>,
}

/// GET /api/v1/availability/slots?service_type=home&date=2026-09-01
/// Annotated slot grid for one day. Closed days (Sunday, past the booking
/// horizon) come back with an empty grid.
pub async fn list_slots(
    State(state): State<AppState>,
    Query(q): Query<SlotsQ>,
) -> Result<Json<SlotsResp>, (StatusCode, String)> {
    let busy = fetch_busy_periods(&state, q.date).await?;
    let now = Utc::now().naive_utc();
    let slots = scheduling::day_slots(q.service_type, q.date, now, &busy);
    Ok(Json(SlotsResp {
        date: q.date,
        service_type: q.service_type,
        slots,
    }))
}

/// Busy periods for one calendar day: every non-cancelled booking blocks
/// `[scheduled_at, scheduled_at + duration)`. Re-fetched per request, never
/// cached across dates.
pub(crate) async fn fetch_busy_periods(
    state: &AppState,
    date: NaiveDate,
) -> Result<Vec<BusyPeriod>, (StatusCode, String)> {
    let (day_start, day_end) = scheduling::day_window(date);
    let rows = query_as::<_, (NaiveDateTime, f64)>(
        r#"SELECT scheduled_at, duration_hours FROM public.bookings
           WHERE scheduled_at BETWEEN $1 AND $2 AND status <> $3"#,
    )
    .bind(day_start)
    .bind(day_end)
    .bind(BOOKING_STATUS_CANCELLED)
    .fetch_all(&state.pool)
    .await
    .map_err(internal_error)?;

    Ok(rows
        .into_iter()
        .filter_map(|(start, hours)| {
            let period = BusyPeriod::from_booking(start, hours);
            if period.is_none() {
                tracing::warn!("booking at {start} has unusable duration {hours}h, skipping");
            }
            period
        })
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProvidersQ {
    pub postal_code: String,
    pub at: NaiveDateTime, // e.g. 2026-09-01T09:00:00
}

/// GET /api/v1/availability/providers?postal_code=10115&at=...
/// Verified, active providers that cover the postal code and have a
/// working window containing the requested time. An empty list means
/// "match manually", not an error.
pub async fn list_available_providers(
    State(state): State<AppState>,
    Query(q): Query<ProvidersQ>,
) -> Result<Json<Vec<Provider>>, (StatusCode, String)> {
    let providers = query_as::<_, Provider>(
        r#"SELECT * FROM public.providers WHERE status = $1 AND active
           ORDER BY provider_id"#,
    )
    .bind(PROVIDER_STATUS_VERIFIED)
    .fetch_all(&state.pool)
    .await
    .map_err(internal_error)?;

    // only windows touching that day matter for the match
    let (day_start, day_end) = scheduling::day_window(q.at.date());
    let window_rows = query_as::<_, (i64, NaiveDateTime, NaiveDateTime)>(
        r#"SELECT provider_id, starts_at, ends_at FROM public.provider_windows
           WHERE ends_at >= $1 AND starts_at <= $2"#,
    )
    .bind(day_start)
    .bind(day_end)
    .fetch_all(&state.pool)
    .await
    .map_err(internal_error)?;

    let mut windows_by_provider: HashMap<i64, Vec<AvailabilityWindow>> = HashMap::new();
    for (provider_id, starts_at, ends_at) in window_rows {
        windows_by_provider
            .entry(provider_id)
            .or_default()
            .push(AvailabilityWindow {
                start: starts_at,
                end: ends_at,
            });
    }

    let schedules: Vec<ProviderSchedule> = providers
        .iter()
        .map(|p| ProviderSchedule {
            provider_id: p.provider_id,
            service_area: p.service_area.clone(),
            windows: windows_by_provider.remove(&p.provider_id).unwrap_or_default(),
        })
        .collect();

    let matched: Vec<i64> = scheduling::available_providers(&schedules, &q.postal_code, q.at)
        .into_iter()
        .map(|s| s.provider_id)
        .collect();

    let rows = providers
        .into_iter()
        .filter(|p| matched.contains(&p.provider_id))
        .collect();
    Ok(Json(rows))
}
