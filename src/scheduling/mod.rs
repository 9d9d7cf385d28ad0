// src/scheduling/mod.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::pricing::ServiceType;

// Fixed booking horizon; nothing past this many days out is offered.
pub const BOOKING_HORIZON_DAYS: i64 = 31;

// Longest job the online flow will place on the calendar.
pub const MAX_BOOKABLE_HOURS: f64 = 24.0;

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot types handed in by the fetch layer
// ─────────────────────────────────────────────────────────────────────────────

/// Committed time, half-open `[start, end)`. All timestamps are naive in
/// the one business timezone; callers resolve zones before this module
/// sees data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyPeriod {
    /// The period one stored booking occupies,
    /// `[scheduled_at, scheduled_at + duration)`. None when the duration
    /// cannot be represented on the timeline; callers skip such rows.
    pub fn from_booking(scheduled_at: NaiveDateTime, duration_hours: f64) -> Option<Self> {
        let minutes = (duration_hours * 60.0).round();
        if !minutes.is_finite() {
            return None;
        }
        let span = Duration::try_minutes(minutes as i64)?;
        let end = scheduled_at.checked_add_signed(span)?;
        Some(BusyPeriod {
            start: scheduled_at,
            end,
        })
    }
}

/// Provider working window, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Read-only provider snapshot for matching; mutation lives in the CRUD
/// layer, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchedule {
    pub provider_id: i64,
    pub service_area: Vec<String>, // postal codes
    pub windows: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub slot: String, // "HH:MM"
    pub available: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Slot grid
// ─────────────────────────────────────────────────────────────────────────────

/// Offered start times per service. Services with long minimum jobs start
/// earlier and stop offering late starts.
pub fn slot_grid(st: ServiceType) -> &'static [&'static str] {
    match st {
        ServiceType::Home | ServiceType::Office => &[
            "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00",
            "17:00", "18:00",
        ],
        ServiceType::DeepCleaning => &[
            "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00",
        ],
        ServiceType::MoveInOut => &[
            "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00",
        ],
        ServiceType::PostConstruction => &[
            "07:00", "08:00", "09:00", "10:00", "11:00", "12:00", "13:00",
        ],
    }
}

/// "HH:MM" label to wall-clock time. A label that does not parse is
/// treated as never available rather than an error.
pub fn parse_slot(label: &str) -> Option<NaiveTime> {
    match NaiveTime::parse_from_str(label, "%H:%M") {
        Ok(t) => Some(t),
        Err(_) => {
            tracing::warn!("unparseable slot label '{label}'");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Date & slot availability
// ─────────────────────────────────────────────────────────────────────────────

/// Inclusive `[start-of-day, end-of-day]` fetch window for loading the
/// busy periods of one calendar day.
pub fn day_window(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = start + Duration::days(1) - Duration::seconds(1);
    (start, end)
}

/// Hard business rules, independent of any provider or booking data:
/// past dates are gone, Sundays are non-operating, and the booking
/// horizon is fixed.
pub fn bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    if date < today || date.weekday() == Weekday::Sun {
        return false;
    }
    (date - today).num_days() <= BOOKING_HORIZON_DAYS
}

/// A slot is gone once its start time has passed or once it falls inside
/// any committed `[start, end)` period.
pub fn slot_available(
    label: &str,
    date: NaiveDate,
    now: NaiveDateTime,
    busy: &[BusyPeriod],
) -> bool {
    let Some(time) = parse_slot(label) else {
        return false;
    };
    let slot_start = date.and_time(time);
    if slot_start < now {
        return false;
    }
    !busy.iter().any(|p| slot_start >= p.start && slot_start < p.end)
}

/// The full grid for one service and date, annotated per slot. Empty for
/// dates the business does not book at all.
pub fn day_slots(
    st: ServiceType,
    date: NaiveDate,
    now: NaiveDateTime,
    busy: &[BusyPeriod],
) -> Vec<SlotStatus> {
    if !bookable_date(date, now.date()) {
        return Vec::new();
    }
    slot_grid(st)
        .iter()
        .map(|label| SlotStatus {
            slot: (*label).to_string(),
            available: slot_available(label, date, now, busy),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider matching
// ─────────────────────────────────────────────────────────────────────────────

/// Providers that cover the postal code and have a window containing the
/// requested time (inclusive both ends). An empty result means the booking
/// gets matched by hand later; it is not an error.
pub fn available_providers<'a>(
    providers: &'a [ProviderSchedule],
    postal_code: &str,
    at: NaiveDateTime,
) -> Vec<&'a ProviderSchedule> {
    providers
        .iter()
        .filter(|p| p.service_area.iter().any(|z| z == postal_code))
        .filter(|p| p.windows.iter().any(|w| w.start <= at && at <= w.end))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(date: NaiveDate, h: u32, min: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    fn mk_provider(id: i64, zips: &[&str], windows: &[(NaiveDateTime, NaiveDateTime)]) -> ProviderSchedule {
        ProviderSchedule {
            provider_id: id,
            service_area: zips.iter().map(|z| z.to_string()).collect(),
            windows: windows
                .iter()
                .map(|(start, end)| AvailabilityWindow {
                    start: *start,
                    end: *end,
                })
                .collect(),
        }
    }

    #[test]
    fn every_grid_label_parses() {
        for st in [
            ServiceType::Home,
            ServiceType::Office,
            ServiceType::DeepCleaning,
            ServiceType::MoveInOut,
            ServiceType::PostConstruction,
        ] {
            for label in slot_grid(st) {
                assert!(parse_slot(label).is_some(), "bad grid label {label}");
            }
        }
    }

    #[test]
    fn past_slots_are_never_available() {
        let date = d(2026, 9, 1); // Tuesday
        let now = at(date, 12, 30);
        assert!(!slot_available("09:00", date, now, &[]));
        assert!(!slot_available("12:00", date, now, &[]));
        // exactly now is still bookable, later certainly is
        assert!(slot_available("13:00", date, now, &[]));
        // whole day in the past
        assert!(!slot_available("09:00", d(2026, 8, 31), now, &[]));
    }

    #[test]
    fn busy_periods_block_half_open() {
        let date = d(2026, 9, 1);
        let now = at(date, 6, 0);
        let busy = vec![BusyPeriod {
            start: at(date, 9, 0),
            end: at(date, 12, 0),
        }];
        assert!(!slot_available("09:00", date, now, &busy)); // at start
        assert!(!slot_available("10:00", date, now, &busy)); // inside
        assert!(!slot_available("11:00", date, now, &busy)); // inside
        assert!(slot_available("12:00", date, now, &busy)); // end is open
        assert!(slot_available("08:00", date, now, &busy)); // before
    }

    #[test]
    fn sundays_have_no_slots_at_all() {
        let sunday = d(2026, 9, 6);
        assert_eq!(sunday.weekday(), Weekday::Sun);
        let now = at(d(2026, 9, 1), 7, 0);
        // even a completely free Sunday stays closed
        assert!(day_slots(ServiceType::Home, sunday, now, &[]).is_empty());
        assert!(!bookable_date(sunday, now.date()));
    }

    #[test]
    fn past_dates_are_not_bookable() {
        let today = d(2026, 9, 1); // Tuesday
        assert!(!bookable_date(d(2026, 8, 31), today)); // Monday, but gone
        assert!(!bookable_date(d(2026, 1, 1), today));
        assert!(bookable_date(today, today)); // same day still books
        let now = at(today, 7, 0);
        assert!(day_slots(ServiceType::Home, d(2026, 8, 31), now, &[]).is_empty());
    }

    #[test]
    fn bookings_project_onto_half_open_busy_periods() {
        let start = at(d(2026, 9, 2), 9, 0);
        let p = BusyPeriod::from_booking(start, 2.5).unwrap();
        assert_eq!(p.start, start);
        assert_eq!(p.end, at(d(2026, 9, 2), 11, 30));
    }

    #[test]
    fn unrepresentable_durations_produce_no_busy_period() {
        let start = at(d(2026, 9, 2), 9, 0);
        // a 10^15 m² wizard request still prices, but its hours can never
        // land on a calendar day
        let req: crate::pricing::BookingRequest =
            serde_json::from_str(r#"{"serviceType":"home","squareMeters":1e15}"#).unwrap();
        let est = crate::pricing::breakdown(&req);
        assert!(est.total >= 0);
        assert!(est.duration > MAX_BOOKABLE_HOURS);
        assert!(BusyPeriod::from_booking(start, est.duration).is_none());
        assert!(BusyPeriod::from_booking(start, f64::MAX).is_none());
    }

    #[test]
    fn horizon_cuts_off_after_thirty_one_days() {
        let today = d(2026, 9, 1);
        let now = at(today, 7, 0);
        let edge = d(2026, 10, 2); // today + 31, a Friday
        let beyond = d(2026, 10, 3); // today + 32
        assert!(bookable_date(edge, today));
        assert!(!bookable_date(beyond, today));
        assert!(day_slots(ServiceType::Office, beyond, now, &[]).is_empty());
        assert!(!day_slots(ServiceType::Office, edge, now, &[]).is_empty());
    }

    #[test]
    fn day_slots_annotate_the_whole_grid() {
        let date = d(2026, 9, 2); // Wednesday
        let now = at(d(2026, 9, 1), 7, 0);
        let busy = vec![BusyPeriod {
            start: at(date, 10, 0),
            end: at(date, 12, 30),
        }];
        let slots = day_slots(ServiceType::DeepCleaning, date, now, &busy);
        assert_eq!(slots.len(), slot_grid(ServiceType::DeepCleaning).len());
        let by_label = |l: &str| slots.iter().find(|s| s.slot == l).unwrap().available;
        assert!(by_label("09:00"));
        assert!(!by_label("10:00"));
        assert!(!by_label("11:00"));
        assert!(!by_label("12:00")); // 12:00 < 12:30, still inside
        assert!(by_label("13:00"));
    }

    #[test]
    fn providers_must_cover_the_postal_code() {
        let date = d(2026, 9, 2);
        let when = at(date, 9, 0);
        let all_day = (at(date, 7, 0), at(date, 19, 0));
        let providers = vec![
            mk_provider(1, &["10115", "10117"], &[all_day]),
            mk_provider(2, &["20095"], &[all_day]),
        ];
        let hits = available_providers(&providers, "10115", when);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].provider_id, 1);
        // nobody serves this area: empty is a valid outcome
        assert!(available_providers(&providers, "99999", when).is_empty());
    }

    #[test]
    fn provider_windows_are_inclusive_both_ends() {
        let date = d(2026, 9, 2);
        let window = (at(date, 8, 0), at(date, 16, 0));
        let providers = vec![mk_provider(7, &["10115"], &[window])];
        assert_eq!(available_providers(&providers, "10115", at(date, 8, 0)).len(), 1);
        assert_eq!(available_providers(&providers, "10115", at(date, 16, 0)).len(), 1);
        assert!(available_providers(&providers, "10115", at(date, 7, 59)).is_empty());
        assert!(available_providers(&providers, "10115", at(date, 16, 1)).is_empty());
    }

    #[test]
    fn day_window_spans_the_calendar_day() {
        let (start, end) = day_window(d(2026, 9, 2));
        assert_eq!(start, at(d(2026, 9, 2), 0, 0));
        assert_eq!(
            end,
            d(2026, 9, 2).and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap())
        );
    }

    #[test]
    fn unknown_labels_are_never_available() {
        let date = d(2026, 9, 2);
        let now = at(d(2026, 9, 1), 7, 0);
        assert!(!slot_available("25:99", date, now, &[]));
        assert!(!slot_available("morning", date, now, &[]));
    }
}
