// src/routes/providers.rs

use axum::http::StatusCode;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::{query, query_as};

use crate::models::{Provider, ProviderWindow, UpsertCount, PROVIDER_STATUSES, PROVIDER_STATUS_PENDING};
use crate::AppState;

use super::internal_error;

#[derive(Deserialize)]
pub struct ListQ {
    pub postal_code: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateProviderBody {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_area: Vec<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub active: Option<bool>,
}
fn default_status() -> String {
    PROVIDER_STATUS_PENDING.into()
}

#[derive(Deserialize)]
pub struct PatchProviderBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_area: Option<Vec<String>>,
    pub status: Option<String>, // verification decision lands here
    pub active: Option<bool>,
}

fn check_status(status: &str) -> Result<(), (StatusCode, String)> {
    if PROVIDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("unknown provider status '{status}'"),
        ))
    }
}

pub async fn create_provider(
    State(state): State<AppState>,
    Json(b): Json<CreateProviderBody>,
) -> Result<Json<Provider>, (StatusCode, String)> {
    check_status(&b.status)?;
    let row = query_as::<_, Provider>(
        r#"
        INSERT INTO public.providers(name, email, phone, service_area, status, active)
        VALUES ($1,$2,$3,$4,$5, COALESCE($6, TRUE))
        RETURNING provider_id, name, email, phone, service_area, status, active, created_at
        "#,
    )
    .bind(b.name)
    .bind(b.email)
    .bind(b.phone)
    .bind(b.service_area)
    .bind(b.status)
    .bind(b.active)
    .fetch_one(&state.pool)
    .await
    .map_err(internal_error)?;
    Ok(Json(row))
}

pub async fn list_providers(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<Provider>>, (StatusCode, String)> {
    let limit = q.limit.unwrap_or(50).clamp(1, 500);
    let offset = q.offset.unwrap_or(0).max(0);
    let rows = match (q.postal_code, q.status) {
        (Some(zip), Some(st)) => {
            query_as::<_, Provider>(
                r#"SELECT * FROM public.providers
                   WHERE $1 = ANY(service_area) AND status = $2
                   ORDER BY provider_id LIMIT $3 OFFSET $4"#,
            )
            .bind(zip)
            .bind(st)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (Some(zip), None) => {
            query_as::<_, Provider>(
                r#"SELECT * FROM public.providers WHERE $1 = ANY(service_area)
                   ORDER BY provider_id LIMIT $2 OFFSET $3"#,
            )
            .bind(zip)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (None, Some(st)) => {
            query_as::<_, Provider>(
                r#"SELECT * FROM public.providers WHERE status = $1
                   ORDER BY provider_id LIMIT $2 OFFSET $3"#,
            )
            .bind(st)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await
            .map_err(internal_error)?
        }
        (None, None) => {
            query_as::<_, Provider>(
                r#"SELECT * FROM public.providers ORDER BY provider_id LIMIT $1 OFFSET $2"#,
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

pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Provider>, (StatusCode, String)> {
    let row = query_as::<_, Provider>(r#"SELECT * FROM public.providers WHERE provider_id=$1"#)
        .bind(id)
        .fetch_optional(&state.pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("provider {id} not found")))?;
    Ok(Json(row))
}

pub async fn patch_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(b): Json<PatchProviderBody>,
) -> Result<Json<Provider>, (StatusCode, String)> {
    if let Some(ref st) = b.status {
        check_status(st)?;
    }
    let row = query_as::<_, Provider>(
        r#"
        UPDATE public.providers SET
          name = COALESCE($2, name),
          email = COALESCE($3, email),
          phone = COALESCE($4, phone),
          service_area = COALESCE($5, service_area),
          status = COALESCE($6, status),
          active = COALESCE($7, active)
        WHERE provider_id = $1
        RETURNING provider_id, name, email, phone, service_area, status, active, created_at
        "#,
    )
    .bind(id)
    .bind(b.name)
    .bind(b.email)
    .bind(b.phone)
    .bind(b.service_area)
    .bind(b.status)
    .bind(b.active)
    .fetch_optional(&state.pool)
    .await
    .map_err(internal_error)?
    .ok_or_else(|| (StatusCode::NOT_FOUND, format!("provider {id} not found")))?;
    Ok(Json(row))
}

pub async fn delete_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let res = query(r#"DELETE FROM public.providers WHERE provider_id=$1"#)
        .bind(id)
        .execute(&state.pool)
        .await
        .map_err(internal_error)?;
    Ok(Json(serde_json::json!({"deleted": res.rows_affected() > 0})))
}

// ─────────────────────────────────────────────────────────────────────────────
// Working windows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct WindowItem {
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

/// POST /api/v1/providers/:id/windows/bulk
pub async fn bulk_upsert_windows(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
    Json(items): Json<Vec<WindowItem>>,
) -> Result<Json<UpsertCount>, (StatusCode, String)> {
    for it in &items {
        if it.ends_at <= it.starts_at {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("window ends before it starts: {} .. {}", it.starts_at, it.ends_at),
            ));
        }
    }

    let mut tx = state.pool.begin().await.map_err(internal_error)?;

    for it in &items {
        query(
            r#"
            INSERT INTO public.provider_windows(provider_id, starts_at, ends_at)
            VALUES ($1,$2,$3)
            ON CONFLICT (provider_id, starts_at)
            DO UPDATE SET ends_at = EXCLUDED.ends_at
            "#,
        )
        .bind(provider_id)
        .bind(it.starts_at)
        .bind(it.ends_at)
        .execute(&mut *tx)
        .await
        .map_err(internal_error)?;
    }

    tx.commit().await.map_err(internal_error)?;
    Ok(Json(UpsertCount {
        upserted: items.len(),
    }))
}

pub async fn list_windows(
    State(state): State<AppState>,
    Path(provider_id): Path<i64>,
) -> Result<Json<Vec<ProviderWindow>>, (StatusCode, String)> {
    let rows = query_as::<_, ProviderWindow>(
        r#"SELECT * FROM public.provider_windows WHERE provider_id=$1 ORDER BY starts_at"#,
    )
    .bind(provider_id)
    .fetch_all(&state.pool)
    .await
    .map_err(internal_error)?;
    Ok(Json(rows))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_providers_default_to_pending() {
        assert_eq!(default_status(), PROVIDER_STATUS_PENDING);
        assert!(check_status(&default_status()).is_ok());
    }

    #[test]
    fn only_known_provider_statuses_pass_validation() {
        for st in PROVIDER_STATUSES {
            assert!(check_status(st).is_ok());
        }
        let err = check_status("suspended").unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }
}
