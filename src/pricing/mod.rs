// src/pricing/mod.rs

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Booking request model
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Home,
    Office,
    DeepCleaning,
    MoveInOut,
    PostConstruction,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Home => "home",
            ServiceType::Office => "office",
            ServiceType::DeepCleaning => "deep-cleaning",
            ServiceType::MoveInOut => "move-in-out",
            ServiceType::PostConstruction => "post-construction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pets {
    #[default]
    None,
    Cats,
    Dogs,
    Both,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    #[default]
    Standard,
    Quick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitorTraffic {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructionType {
    #[default]
    Renovation,
    NewBuild,
    Demolition,
}

/// Add-on line item as selected in the wizard; time in hours, price in
/// whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraItem {
    pub name: String,
    pub estimated_time: f64,
    pub final_price: f64,
}

/// Per-service fields, tagged by `serviceType` on the wire. One variant per
/// service keeps fields that do not apply unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "serviceType", rename_all = "kebab-case")]
pub enum ServiceDetails {
    #[serde(rename_all = "camelCase")]
    Home {
        #[serde(default)]
        pets: Pets,
        #[serde(default)]
        pace: Pace,
        #[serde(default)]
        own_supplies: bool,
        #[serde(default)]
        frequency: Frequency,
    },
    #[serde(rename_all = "camelCase")]
    Office {
        #[serde(default)]
        employees: u32,
        #[serde(default)]
        visitor_traffic: VisitorTraffic,
        #[serde(default)]
        cleaning_during_work_hours: bool,
        #[serde(default)]
        security_clearance_required: bool,
    },
    #[serde(rename_all = "camelCase")]
    DeepCleaning {
        #[serde(default)]
        include_walls_and_ceilings: bool,
        #[serde(default)]
        mold_or_pest_presence: bool,
        #[serde(default)]
        whole_place: bool,
    },
    #[serde(rename_all = "camelCase")]
    MoveInOut {
        #[serde(default)]
        is_furnished: bool,
        #[serde(default)]
        trash_removal_needed: bool,
        #[serde(default)]
        pre_inspection: bool,
        #[serde(default)]
        disinfection_requested: bool,
    },
    #[serde(rename_all = "camelCase")]
    PostConstruction {
        #[serde(default)]
        construction_type: ConstructionType,
        #[serde(default = "default_ordinal")]
        dust_level: u8,
        #[serde(default)]
        hazardous_materials: bool,
        #[serde(default)]
        special_equipment_needed: bool,
    },
}

impl ServiceDetails {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::Home { .. } => ServiceType::Home,
            ServiceDetails::Office { .. } => ServiceType::Office,
            ServiceDetails::DeepCleaning { .. } => ServiceType::DeepCleaning,
            ServiceDetails::MoveInOut { .. } => ServiceType::MoveInOut,
            ServiceDetails::PostConstruction { .. } => ServiceType::PostConstruction,
        }
    }
}

fn default_ordinal() -> u8 {
    3
}

/// Normalized wizard payload. The flatten keeps the wire shape the clients
/// already send: one flat object carrying `serviceType` plus whichever
/// fields that service uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[serde(default, alias = "propertySize")]
    pub square_meters: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default = "default_ordinal")]
    pub dirtiness_level: u8, // 1..=5
    #[serde(default)]
    pub extras: Vec<ExtraItem>,
    #[serde(flatten)]
    pub details: ServiceDetails,
}

impl BookingRequest {
    pub fn service_type(&self) -> ServiceType {
        self.details.service_type()
    }
}

/// Full price breakdown; the same numbers the wizard shows live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub duration: f64, // hours, half-hour steps
    pub cleaner_count: i32,
    pub complexity_score: i32,
    pub hourly_rate: f64, // after discount + complexity, kept fractional
    pub base_price: f64,
    pub extras_price: f64,
    pub discount_percent: f64,
    pub total: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate & multiplier tables
// ─────────────────────────────────────────────────────────────────────────────

const LONG_JOB_HOURS: f64 = 6.0;
const MAX_CREW: i32 = 4;

fn minimum_hours(st: ServiceType) -> f64 {
    match st {
        ServiceType::Home => 2.0,
        ServiceType::Office => 1.5,
        ServiceType::DeepCleaning => 3.0,
        ServiceType::MoveInOut => 2.5,
        ServiceType::PostConstruction => 4.0,
    }
}

// (free allowance, divisor); harder services scale worse with size
fn size_term(st: ServiceType) -> (f64, f64) {
    match st {
        ServiceType::Home => (50.0, 30.0),
        ServiceType::Office => (0.0, 40.0),
        ServiceType::DeepCleaning => (0.0, 25.0),
        ServiceType::MoveInOut => (0.0, 30.0),
        ServiceType::PostConstruction => (0.0, 20.0),
    }
}

// (per bedroom, per bathroom)
fn room_weights(st: ServiceType) -> (f64, f64) {
    match st {
        ServiceType::Home => (0.5, 0.5),
        ServiceType::Office => (0.5, 0.5),
        ServiceType::DeepCleaning => (0.7, 0.8),
        ServiceType::MoveInOut => (0.6, 0.6),
        ServiceType::PostConstruction => (0.5, 0.6),
    }
}

// levels 1..=5, strictly increasing per table
fn dirtiness_table(st: ServiceType) -> [f64; 5] {
    match st {
        ServiceType::Home => [0.8, 0.9, 1.0, 1.3, 1.6],
        ServiceType::Office => [0.9, 0.95, 1.0, 1.2, 1.4],
        ServiceType::DeepCleaning => [0.9, 1.0, 1.2, 1.5, 1.8],
        ServiceType::MoveInOut => [0.85, 0.95, 1.0, 1.25, 1.5],
        ServiceType::PostConstruction => [0.95, 1.0, 1.05, 1.15, 1.25],
    }
}

const DUST_TABLE: [f64; 5] = [0.9, 1.0, 1.15, 1.35, 1.6];

fn hourly_rate(st: ServiceType) -> f64 {
    match st {
        ServiceType::Home => 35.0,
        ServiceType::Office => 40.0,
        ServiceType::DeepCleaning => 45.0,
        ServiceType::MoveInOut => 50.0,
        ServiceType::PostConstruction => 55.0,
    }
}

// (size for 2 cleaners, size for 3)
fn crew_thresholds(st: ServiceType) -> (f64, f64) {
    match st {
        ServiceType::Home => (150.0, 300.0),
        ServiceType::Office => (200.0, 500.0),
        ServiceType::DeepCleaning => (100.0, 250.0),
        ServiceType::MoveInOut => (120.0, 300.0),
        ServiceType::PostConstruction => (100.0, 250.0),
    }
}

fn base_complexity(st: ServiceType) -> f64 {
    match st {
        ServiceType::Home => 2.0,
        ServiceType::Office => 3.0,
        ServiceType::DeepCleaning => 6.0,
        ServiceType::MoveInOut => 7.0,
        ServiceType::PostConstruction => 9.0,
    }
}

fn pets_factor(pets: Pets) -> f64 {
    match pets {
        Pets::None => 1.0,
        Pets::Cats => 1.1,
        Pets::Dogs => 1.2,
        Pets::Both => 1.3,
        Pets::Other => 1.15,
    }
}

fn visitor_factor(traffic: VisitorTraffic) -> f64 {
    match traffic {
        VisitorTraffic::Low => 1.0,
        VisitorTraffic::Medium => 1.2,
        VisitorTraffic::High => 1.4,
    }
}

fn construction_factor(kind: ConstructionType) -> f64 {
    match kind {
        ConstructionType::Renovation => 1.0,
        ConstructionType::NewBuild => 0.8,
        ConstructionType::Demolition => 1.5,
    }
}

// rate discount for committing to a recurring home slot
fn frequency_discount_percent(freq: Frequency) -> f64 {
    match freq {
        Frequency::OneTime => 0.0,
        Frequency::Weekly => 23.0,
        Frequency::BiWeekly => 14.0,
        Frequency::Monthly => 9.0,
    }
}

// 1..=5 ordinal to table index; out-of-range input is clamped, not rejected
fn ordinal_index(what: &str, level: u8) -> usize {
    if !(1..=5).contains(&level) {
        tracing::warn!("{what} level {level} outside 1..=5, clamping");
    }
    (level.clamp(1, 5) - 1) as usize
}

fn round_half(hours: f64) -> f64 {
    (hours * 2.0).round() / 2.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Duration
// ─────────────────────────────────────────────────────────────────────────────

/// Expected job duration in hours: per-service base + size + rooms, scaled
/// by dirtiness and the service's own factors, extras added last. Never
/// below the service minimum, always on a half-hour step.
pub fn duration(req: &BookingRequest) -> f64 {
    let st = req.service_type();
    let (allowance, divisor) = size_term(st);
    let (per_bedroom, per_bathroom) = room_weights(st);

    let mut hours = minimum_hours(st)
        + (req.square_meters - allowance) / divisor
        + f64::from(req.bedrooms) * per_bedroom
        + f64::from(req.bathrooms) * per_bathroom;

    hours *= dirtiness_table(st)[ordinal_index("dirtiness", req.dirtiness_level)];

    match &req.details {
        ServiceDetails::Home {
            pets,
            pace,
            own_supplies,
            ..
        } => {
            hours *= pets_factor(*pets);
            if *pace == Pace::Quick {
                hours *= 0.8;
            }
            if *own_supplies {
                hours *= 0.95;
            }
        }
        ServiceDetails::Office {
            employees,
            visitor_traffic,
            cleaning_during_work_hours,
            security_clearance_required,
        } => {
            hours *= (1.0 + f64::from(*employees) * 0.01).min(2.0);
            hours *= visitor_factor(*visitor_traffic);
            if *cleaning_during_work_hours {
                hours *= 1.2;
            }
            if *security_clearance_required {
                hours *= 1.1;
            }
        }
        ServiceDetails::DeepCleaning {
            include_walls_and_ceilings,
            mold_or_pest_presence,
            whole_place,
        } => {
            if *include_walls_and_ceilings {
                hours *= 1.4;
            }
            if *mold_or_pest_presence {
                hours *= 1.3;
            }
            if *whole_place {
                hours *= 1.2;
            }
        }
        ServiceDetails::MoveInOut {
            is_furnished,
            trash_removal_needed,
            pre_inspection,
            disinfection_requested,
        } => {
            if *is_furnished {
                hours *= 1.3;
            }
            // flat time adds, on top of the multiplied total
            if *trash_removal_needed {
                hours += 1.0;
            }
            if *pre_inspection {
                hours += 0.5;
            }
            if *disinfection_requested {
                hours += 1.0;
            }
        }
        ServiceDetails::PostConstruction {
            construction_type,
            dust_level,
            hazardous_materials,
            special_equipment_needed,
        } => {
            hours *= construction_factor(*construction_type);
            hours *= DUST_TABLE[ordinal_index("dust", *dust_level)];
            if *hazardous_materials {
                hours *= 1.4;
            }
            if *special_equipment_needed {
                hours *= 1.2;
            }
        }
    }

    hours += req.extras.iter().map(|e| e.estimated_time).sum::<f64>();

    round_half(hours.max(minimum_hours(st)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Crew size
// ─────────────────────────────────────────────────────────────────────────────

/// Recommended cleaner count: size escalation per service, plus one extra
/// pair of hands for jobs past six hours. Dispatch can never source more
/// than four for a single job.
pub fn cleaner_count(req: &BookingRequest) -> i32 {
    crew_for(req.service_type(), req.square_meters, duration(req))
}

fn crew_for(st: ServiceType, size: f64, duration_hours: f64) -> i32 {
    let (two_at, three_at) = crew_thresholds(st);
    let mut crew = 1;
    if size > two_at {
        crew = 2;
    }
    if size > three_at {
        crew = 3;
    }
    if duration_hours > LONG_JOB_HOURS {
        crew += 1;
    }
    crew.clamp(1, MAX_CREW)
}

// ─────────────────────────────────────────────────────────────────────────────
// Complexity score
// ─────────────────────────────────────────────────────────────────────────────

/// 1..=10 difficulty summary: service base, size, dirtiness and hazard
/// flags, plus a small extras contribution. Feeds the price as the one
/// channel for "how hard is this job" beyond raw hours.
pub fn complexity_score(req: &BookingRequest) -> i32 {
    let mut score = base_complexity(req.service_type());

    if req.square_meters > 200.0 {
        score += 1.0;
    }
    if req.square_meters > 400.0 {
        score += 1.0;
    }
    if req.dirtiness_level >= 4 {
        score += 1.0;
    }

    match &req.details {
        ServiceDetails::Home { pets, .. } => {
            if *pets != Pets::None {
                score += 1.0;
            }
        }
        ServiceDetails::Office {
            cleaning_during_work_hours,
            security_clearance_required,
            ..
        } => {
            if *cleaning_during_work_hours {
                score += 1.0;
            }
            if *security_clearance_required {
                score += 1.0;
            }
        }
        ServiceDetails::DeepCleaning {
            include_walls_and_ceilings,
            mold_or_pest_presence,
            ..
        } => {
            if *include_walls_and_ceilings {
                score += 1.0;
            }
            if *mold_or_pest_presence {
                score += 2.0;
            }
        }
        ServiceDetails::MoveInOut {
            is_furnished,
            trash_removal_needed,
            disinfection_requested,
            ..
        } => {
            if *is_furnished {
                score += 1.0;
            }
            if *trash_removal_needed {
                score += 1.0;
            }
            if *disinfection_requested {
                score += 1.0;
            }
        }
        ServiceDetails::PostConstruction {
            dust_level,
            hazardous_materials,
            special_equipment_needed,
            ..
        } => {
            if *hazardous_materials {
                score += 2.0;
            }
            if *special_equipment_needed {
                score += 1.0;
            }
            if *dust_level >= 4 {
                score += 1.0;
            }
        }
    }

    score += (req.extras.len() as f64 * 0.5).min(2.0);

    (score.round() as i32).clamp(1, 10)
}

// ─────────────────────────────────────────────────────────────────────────────
// Price
// ─────────────────────────────────────────────────────────────────────────────

/// One computation behind both price surfaces: rate (discounted, then
/// complexity-adjusted, kept fractional) times hours times crew, extras on
/// top, service adjustments layered on the base price only.
pub fn breakdown(req: &BookingRequest) -> Estimate {
    let st = req.service_type();
    let hours = duration(req);
    let crew = crew_for(st, req.square_meters, hours);
    let score = complexity_score(req);

    let discount_percent = match &req.details {
        ServiceDetails::Home { frequency, .. } => frequency_discount_percent(*frequency),
        _ => 0.0,
    };
    let rate = hourly_rate(st)
        * (1.0 - discount_percent / 100.0)
        * (1.0 + f64::from(score - 1) * 0.1);

    let base_price = hours * rate * f64::from(crew);
    let extras_price = req.extras.iter().map(|e| e.final_price).sum::<f64>();

    let adjustment = match &req.details {
        ServiceDetails::Home { own_supplies, .. } => {
            if *own_supplies {
                -0.05 * base_price
            } else {
                0.0
            }
        }
        ServiceDetails::Office {
            cleaning_during_work_hours,
            security_clearance_required,
            ..
        } => {
            let mut pct = 0.0;
            if *cleaning_during_work_hours {
                pct += 0.15;
            }
            if *security_clearance_required {
                pct += 0.10;
            }
            pct * base_price
        }
        ServiceDetails::DeepCleaning {
            include_walls_and_ceilings,
            mold_or_pest_presence,
            ..
        } => {
            let mut pct = 0.0;
            if *include_walls_and_ceilings {
                pct += 0.25;
            }
            if *mold_or_pest_presence {
                pct += 0.20;
            }
            pct * base_price
        }
        ServiceDetails::MoveInOut {
            trash_removal_needed,
            disinfection_requested,
            ..
        } => {
            let mut adj = 0.0;
            if *trash_removal_needed {
                adj += 50.0; // flat haul-away fee
            }
            if *disinfection_requested {
                adj += 0.15 * base_price;
            }
            adj
        }
        ServiceDetails::PostConstruction {
            hazardous_materials,
            special_equipment_needed,
            ..
        } => {
            let mut pct = 0.0;
            if *hazardous_materials {
                pct += 0.30;
            }
            if *special_equipment_needed {
                pct += 0.20;
            }
            pct * base_price
        }
    };

    let total = (base_price + extras_price + adjustment).round().max(0.0) as i64;

    Estimate {
        duration: hours,
        cleaner_count: crew,
        complexity_score: score,
        hourly_rate: rate,
        base_price,
        extras_price,
        discount_percent,
        total,
    }
}

/// Final integer price only; same arithmetic as [`breakdown`].
pub fn total_price(req: &BookingRequest) -> i64 {
    breakdown(req).total
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_home(square_meters: f64, bedrooms: u32, bathrooms: u32, dirtiness: u8) -> BookingRequest {
        BookingRequest {
            square_meters,
            bedrooms,
            bathrooms,
            dirtiness_level: dirtiness,
            extras: vec![],
            details: ServiceDetails::Home {
                pets: Pets::None,
                pace: Pace::Standard,
                own_supplies: false,
                frequency: Frequency::OneTime,
            },
        }
    }

    fn mk_office(square_meters: f64, employees: u32, work_hours: bool, security: bool) -> BookingRequest {
        BookingRequest {
            square_meters,
            bedrooms: 0,
            bathrooms: 0,
            dirtiness_level: 3,
            extras: vec![],
            details: ServiceDetails::Office {
                employees,
                visitor_traffic: VisitorTraffic::Low,
                cleaning_during_work_hours: work_hours,
                security_clearance_required: security,
            },
        }
    }

    fn mk_with(details: ServiceDetails) -> BookingRequest {
        BookingRequest {
            square_meters: 80.0,
            bedrooms: 2,
            bathrooms: 1,
            dirtiness_level: 3,
            extras: vec![],
            details,
        }
    }

    fn all_service_details() -> Vec<ServiceDetails> {
        vec![
            ServiceDetails::Home {
                pets: Pets::None,
                pace: Pace::Standard,
                own_supplies: false,
                frequency: Frequency::OneTime,
            },
            ServiceDetails::Office {
                employees: 0,
                visitor_traffic: VisitorTraffic::Low,
                cleaning_during_work_hours: false,
                security_clearance_required: false,
            },
            ServiceDetails::DeepCleaning {
                include_walls_and_ceilings: false,
                mold_or_pest_presence: false,
                whole_place: false,
            },
            ServiceDetails::MoveInOut {
                is_furnished: false,
                trash_removal_needed: false,
                pre_inspection: false,
                disinfection_requested: false,
            },
            ServiceDetails::PostConstruction {
                construction_type: ConstructionType::Renovation,
                dust_level: 1,
                hazardous_materials: false,
                special_equipment_needed: false,
            },
        ]
    }

    #[test]
    fn duration_never_below_service_minimum() {
        for details in all_service_details() {
            let req = BookingRequest {
                square_meters: 1.0,
                bedrooms: 0,
                bathrooms: 0,
                dirtiness_level: 1,
                extras: vec![],
                details,
            };
            let st = req.service_type();
            assert!(
                duration(&req) >= minimum_hours(st),
                "{} fell below its floor",
                st.as_str()
            );
        }
    }

    #[test]
    fn duration_snaps_to_half_hours() {
        for details in all_service_details() {
            for size in [37.0, 90.0, 151.0, 333.0] {
                let req = BookingRequest {
                    square_meters: size,
                    bedrooms: 3,
                    bathrooms: 2,
                    dirtiness_level: 4,
                    extras: vec![],
                    details: details.clone(),
                };
                let d = duration(&req);
                assert_eq!((d * 2.0).fract(), 0.0, "{d} is not a half-hour step");
            }
        }
    }

    #[test]
    fn crew_stays_between_one_and_four() {
        // tiny job
        assert_eq!(cleaner_count(&mk_home(10.0, 0, 0, 1)), 1);
        // huge dirty post-construction job would escalate past the cap
        let req = BookingRequest {
            square_meters: 900.0,
            bedrooms: 6,
            bathrooms: 4,
            dirtiness_level: 5,
            extras: vec![],
            details: ServiceDetails::PostConstruction {
                construction_type: ConstructionType::Demolition,
                dust_level: 5,
                hazardous_materials: true,
                special_equipment_needed: true,
            },
        };
        assert_eq!(cleaner_count(&req), 4);
    }

    #[test]
    fn crew_adds_one_for_long_jobs() {
        // 160 m2 home: over the 150 threshold, still a short-enough job
        let small = mk_home(160.0, 0, 0, 1);
        assert!(duration(&small) <= 6.0);
        assert_eq!(cleaner_count(&small), 2);
        // same size, filthy: duration passes six hours
        let long = mk_home(160.0, 3, 2, 5);
        assert!(duration(&long) > 6.0);
        assert_eq!(cleaner_count(&long), 3);
    }

    #[test]
    fn complexity_clamps_to_one_through_ten() {
        for details in all_service_details() {
            let low = BookingRequest {
                square_meters: 10.0,
                bedrooms: 0,
                bathrooms: 0,
                dirtiness_level: 1,
                extras: vec![],
                details: details.clone(),
            };
            let score = complexity_score(&low);
            assert!((1..=10).contains(&score));
        }
        // everything stacked on the hardest service
        let maxed = BookingRequest {
            square_meters: 500.0,
            bedrooms: 5,
            bathrooms: 3,
            dirtiness_level: 5,
            extras: (0..6)
                .map(|i| ExtraItem {
                    name: format!("extra-{i}"),
                    estimated_time: 0.5,
                    final_price: 10.0,
                })
                .collect(),
            details: ServiceDetails::PostConstruction {
                construction_type: ConstructionType::Demolition,
                dust_level: 5,
                hazardous_materials: true,
                special_equipment_needed: true,
            },
        };
        assert_eq!(complexity_score(&maxed), 10);
    }

    #[test]
    fn price_never_negative() {
        // own supplies discount on a minimal quick home job is the cheapest path
        let req = BookingRequest {
            square_meters: 1.0,
            bedrooms: 0,
            bathrooms: 0,
            dirtiness_level: 1,
            extras: vec![],
            details: ServiceDetails::Home {
                pets: Pets::None,
                pace: Pace::Quick,
                own_supplies: true,
                frequency: Frequency::Weekly,
            },
        };
        assert!(total_price(&req) >= 0);
    }

    #[test]
    fn dirtier_never_cheaper_or_faster() {
        for details in all_service_details() {
            let mid = BookingRequest {
                dirtiness_level: 3,
                ..mk_with(details.clone())
            };
            let high = BookingRequest {
                dirtiness_level: 5,
                ..mk_with(details)
            };
            assert!(duration(&high) >= duration(&mid));
            assert!(total_price(&high) >= total_price(&mid));
        }
    }

    #[test]
    fn recurring_home_slots_get_ordered_discounts() {
        let with_freq = |frequency| BookingRequest {
            details: ServiceDetails::Home {
                pets: Pets::None,
                pace: Pace::Standard,
                own_supplies: false,
                frequency,
            },
            ..mk_home(120.0, 3, 2, 3)
        };
        let weekly = total_price(&with_freq(Frequency::Weekly));
        let biweekly = total_price(&with_freq(Frequency::BiWeekly));
        let monthly = total_price(&with_freq(Frequency::Monthly));
        let one_time = total_price(&with_freq(Frequency::OneTime));
        assert!(weekly < biweekly);
        assert!(biweekly < monthly);
        assert!(monthly < one_time);
    }

    #[test]
    fn ninety_sqm_home_walkthrough() {
        // 2.0 base + (90-50)/30 + 2*0.5 + 1*0.5 = 4.8333, dirt 3 is neutral,
        // nearest half hour is 5.0
        let req = mk_home(90.0, 2, 1, 3);
        let est = breakdown(&req);
        assert_eq!(est.duration, 5.0);
        assert_eq!(est.cleaner_count, 1);
        assert_eq!(est.complexity_score, 2);
        // 35 * 1.1 complexity
        assert!((est.hourly_rate - 38.5).abs() < 1e-9);
        assert_eq!(est.discount_percent, 0.0);
        // round(5.0 * 38.5 * 1) = 193
        assert_eq!(est.total, 193);
    }

    #[test]
    fn office_surcharges_stack() {
        // 1.5 + 200/40 = 6.5h, employees 1.1, then 1.2 and 1.1 on top:
        // 6.5 * 1.1 * 1.2 * 1.1 = 9.438 -> 9.5h, crew 2 (long job),
        // score 3+1+1 = 5 -> rate 40*1.4 = 56
        let both = breakdown(&mk_office(200.0, 10, true, true));
        assert_eq!(both.duration, 9.5);
        assert_eq!(both.cleaner_count, 2);
        assert_eq!(both.complexity_score, 5);
        let base = both.base_price;
        assert!((base - 9.5 * 56.0 * 2.0).abs() < 1e-9);
        // +15% and +10% of base together, not either alone
        assert_eq!(both.total, (base + 0.25 * base).round() as i64);

        let work_only = breakdown(&mk_office(200.0, 10, true, false));
        let neither = breakdown(&mk_office(200.0, 10, false, false));
        assert!(both.total > work_only.total);
        assert!(work_only.total > neither.total);
    }

    #[test]
    fn extras_add_time_and_price() {
        let plain = mk_home(90.0, 2, 1, 3);
        let mut with_extra = plain.clone();
        with_extra.extras.push(ExtraItem {
            name: "oven".into(),
            estimated_time: 1.0,
            final_price: 25.0,
        });
        assert_eq!(duration(&with_extra), duration(&plain) + 1.0);
        let est = breakdown(&with_extra);
        assert_eq!(est.extras_price, 25.0);
        assert!(est.total > breakdown(&plain).total);
    }

    #[test]
    fn out_of_range_ordinals_clamp_instead_of_panicking() {
        let wild = mk_home(90.0, 2, 1, 200);
        assert_eq!(duration(&wild), duration(&mk_home(90.0, 2, 1, 5)));
        let zero = mk_home(90.0, 2, 1, 0);
        assert_eq!(duration(&zero), duration(&mk_home(90.0, 2, 1, 1)));
    }

    #[test]
    fn move_out_flat_adds_come_after_multipliers() {
        let bare = mk_with(ServiceDetails::MoveInOut {
            is_furnished: false,
            trash_removal_needed: false,
            pre_inspection: false,
            disinfection_requested: false,
        });
        let loaded = mk_with(ServiceDetails::MoveInOut {
            is_furnished: false,
            trash_removal_needed: true,
            pre_inspection: true,
            disinfection_requested: true,
        });
        // +1.0 +0.5 +1.0 flat hours
        assert_eq!(duration(&loaded), duration(&bare) + 2.5);
        // trash removal also carries the flat 50 fee on the price side
        let est = breakdown(&loaded);
        assert!(est.total > breakdown(&bare).total);
    }

    #[test]
    fn request_json_round_trips_flat_wire_shape() {
        let raw = r#"{
            "serviceType": "home",
            "squareMeters": 90,
            "bedrooms": 2,
            "bathrooms": 1,
            "dirtinessLevel": 3,
            "pets": "none",
            "frequency": "one-time"
        }"#;
        let req: BookingRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.service_type(), ServiceType::Home);
        assert_eq!(req.square_meters, 90.0);
        assert_eq!(total_price(&req), 193);

        // propertySize is the legacy alias for the same field
        let legacy = r#"{"serviceType":"office","propertySize":120,"employees":5}"#;
        let req: BookingRequest = serde_json::from_str(legacy).unwrap();
        assert_eq!(req.square_meters, 120.0);
        assert_eq!(req.service_type(), ServiceType::Office);
    }
}
