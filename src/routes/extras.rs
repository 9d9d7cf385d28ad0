// src/routes/extras.rs

use axum::http::StatusCode;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::{query, query_as};

use crate::models::ServiceExtra;
use crate::pricing::ServiceType;
use crate::AppState;

use super::internal_error;

#[derive(Deserialize)]
pub struct ListQ {
    pub service_type: Option<ServiceType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateExtraBody {
    pub service_type: ServiceType,
    pub name: String,
    pub estimated_time: f64,
    pub final_price: f64,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct PatchExtraBody {
    pub service_type: Option<ServiceType>,
    pub name: Option<String>,
    pub estimated_time: Option<f64>,
    pub final_price: Option<f64>,
    pub active: Option<bool>,
}

pub async fn create_extra(
    State(state): State<AppState>,
    Json(b): Json<CreateExtraBody>,
) -> Result<Json<ServiceExtra>, (StatusCode, String)> {
    if b.estimated_time < 0.0 || b.final_price < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "estimated_time and final_price must be non-negative".into(),
        ));
    }
    let row = query_as::<_, ServiceExtra>(
        r#"
        INSERT INTO public.service_extras(service_type, name, estimated_time, final_price, active)
        VALUES ($1,$2,$3,$4, COALESCE($5, TRUE))
        RETURNING extra_id, service_type, name, estimated_time, final_price, active
        "#,
    )
    .bind(b.service_type.as_str())
    .bind(b.name)
    .bind(b.estimated_time)
    .bind(b.final_price)
    .bind(b.active)
    .fetch_one(&state.pool)
    .await
    .map_err(internal_error)?;
    Ok(Json(row))
}

pub async fn list_extras(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<ServiceExtra>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(50).clamp(1, 500);
    let offset = q.offset.unwrap_or(0).max(0);
    let rows = if let Some(st) = q.service_type {
        query_as::<_, ServiceExtra>(
            r#"SELECT * FROM public.service_extras WHERE service_type = $1 AND active
               ORDER BY extra_id LIMIT $2 OFFSET $3"#,
        )
        .bind(st.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await
        .map_err(internal_error)?
    } else {
        query_as::<_, ServiceExtra>(
            r#"SELECT * FROM public.service_extras ORDER BY extra_id LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await
        .map_err(internal_error)?
    };
    Ok(Json(rows))
}

pub async fn patch_extra(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(b): Json<PatchExtraBody>,
) -> Result<Json<ServiceExtra>, (StatusCode, String)> {
    let row = query_as::<_, ServiceExtra>(
        r#"
        UPDATE public.service_extras SET
          service_type = COALESCE($2, service_type),
          name = COALESCE($3, name),
          estimated_time = COALESCE($4, estimated_time),
          final_price = COALESCE($5, final_price),
          active = COALESCE($6, active)
        WHERE extra_id = $1
        RETURNING extra_id, service_type, name, estimated_time, final_price, active
        "#,
    )
    .bind(id)
    .bind(b.service_type.map(|s| s.as_str()))
    .bind(b.name)
    .bind(b.estimated_time)
    .bind(b.final_price)
    .bind(b.active)
    .fetch_optional(&state.pool)
    .await
    .map_err(internal_error)?
    .ok_or_else(|| (StatusCode::NOT_FOUND, format!("extra {id} not found")))?;
    Ok(Json(row))
}

pub async fn delete_extra(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let res = query(r#"DELETE FROM public.service_extras WHERE extra_id=$1"#)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(internal_error)?;
    Ok(Json(serde_json::json!({"deleted": res.rows_affected() > 0})))
}
