// src/routes/quotes.rs

use axum::http::StatusCode;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqlx::query_as;

use crate::pricing::{self, BookingRequest};
use crate::{models::Quote, AppState};

use super::internal_error;

#[derive(Deserialize)]
pub struct ListQ {
    pub service_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/quotes
/// Prices the request and stores the snapshot. Identical payloads collapse
/// onto one row via the canonical hash, so wizard re-submits do not pile up.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Quote>, (StatusCode, String)> {
    // canonical hash of the payload
    let bytes = serde_json::to_vec(&req).map_err(internal_error)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let input_hash = format!("{:x}", hasher.finalize());

    let est = pricing::breakdown(&req);
    let payload = serde_json::to_value(&req).map_err(internal_error)?;

    let row = query_as::<_, Quote>(
        r#"
        INSERT INTO public.quotes
            (service_type, input_hash, payload, duration_hours, cleaner_count,
             complexity_score, hourly_rate, base_price, extras_price,
             discount_percent, total_price)
        VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        ON CONFLICT (input_hash) DO UPDATE
           SET payload = EXCLUDED.payload,
               duration_hours = EXCLUDED.duration_hours,
               cleaner_count = EXCLUDED.cleaner_count,
               complexity_score = EXCLUDED.complexity_score,
               hourly_rate = EXCLUDED.hourly_rate,
               base_price = EXCLUDED.base_price,
               extras_price = EXCLUDED.extras_price,
               discount_percent = EXCLUDED.discount_percent,
               total_price = EXCLUDED.total_price
        RETURNING quote_id, service_type, input_hash, payload, duration_hours,
                  cleaner_count, complexity_score, hourly_rate, base_price,
                  extras_price, discount_percent, total_price, created_at
        "#,
    )
    .bind(req.service_type().as_str())
    .bind(&input_hash)
    .bind(payload)
    .bind(est.duration)
    .bind(est.cleaner_count)
    .bind(est.complexity_score)
    .bind(est.hourly_rate)
    .bind(est.base_price)
    .bind(est.extras_price)
    .bind(est.discount_percent)
    .bind(est.total)
    .fetch_one(&state.pool)
    .await
    .map_err(internal_error)?;
    Ok(Json(row))
}

pub async fn list_quotes(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<Quote>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(50).clamp(1, 500);
    let offset = q.offset.unwrap_or(0).max(0);
    let rows = if let Some(st) = q.service_type {
        query_as::<_, Quote>(
            r#"SELECT * FROM public.quotes WHERE service_type = $1
               ORDER BY created_at DESC LIMIT $2 OFFSET $3"#,
        )
        .bind(st)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await
        .map_err(internal_error)?
    } else {
        query_as::<_, Quote>(
            r#"SELECT * FROM public.quotes ORDER BY created_at DESC LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await
        .map_err(internal_error)?
    };
    Ok(Json(rows))
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Quote>, (StatusCode, String)> {
    let row = query_as::<_, Quote>(r#"SELECT * FROM public.quotes WHERE quote_id=$1"#)
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("quote {id} not found")))?;
    Ok(Json(row))
}
