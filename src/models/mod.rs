// src/models/mod.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const PROVIDER_STATUS_PENDING: &str = "pending";
pub const PROVIDER_STATUS_VERIFIED: &str = "verified";
pub const PROVIDER_STATUS_REJECTED: &str = "rejected";
pub const PROVIDER_STATUSES: [&str; 3] = [
    PROVIDER_STATUS_PENDING,
    PROVIDER_STATUS_VERIFIED,
    PROVIDER_STATUS_REJECTED,
];

pub const BOOKING_STATUS_PENDING: &str = "pending";
pub const BOOKING_STATUS_CONFIRMED: &str = "confirmed";
pub const BOOKING_STATUS_COMPLETED: &str = "completed";
pub const BOOKING_STATUS_CANCELLED: &str = "cancelled";
pub const BOOKING_STATUSES: [&str; 4] = [
    BOOKING_STATUS_PENDING,
    BOOKING_STATUS_CONFIRMED,
    BOOKING_STATUS_COMPLETED,
    BOOKING_STATUS_CANCELLED,
];

// ───────────────────────────────────────
// Provider registry
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Provider {
    pub provider_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_area: Vec<String>, // text[] of postal codes
    pub status: String,            // pending|verified|rejected
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ProviderWindow {
    pub window_id: i64,
    pub provider_id: i64,
    pub starts_at: NaiveDateTime, // business-local, inclusive
    pub ends_at: NaiveDateTime,   // inclusive
}

// ───────────────────────────────────────
// Reference data: add-on catalog
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ServiceExtra {
    pub extra_id: i64,
    pub service_type: String,
    pub name: String,
    pub estimated_time: f64, // hours
    pub final_price: f64,
    pub active: bool,
}

// ───────────────────────────────────────
// Priced snapshots & bookings
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub quote_id: i64,
    pub service_type: String,
    pub input_hash: String,         // SHA256 hex of the request payload
    pub payload: serde_json::Value, // jsonb snapshot of the wizard state
    pub duration_hours: f64,
    pub cleaner_count: i32,
    pub complexity_score: i32, // 1..10
    pub hourly_rate: f64,
    pub base_price: f64,
    pub extras_price: f64,
    pub discount_percent: f64,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: i64,
    pub booking_ref: Uuid, // public reference shown to the customer
    pub quote_id: Option<i64>,
    pub service_type: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub postal_code: String,
    pub scheduled_at: NaiveDateTime, // business-local start
    pub duration_hours: f64,
    pub cleaner_count: i32,
    pub total_price: i64,
    pub provider_id: Option<i64>, // NULL until dispatched
    pub status: String,           // pending|confirmed|completed|cancelled
    pub created_at: DateTime<Utc>,
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertCount {
    pub upserted: usize,
}
