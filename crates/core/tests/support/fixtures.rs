//! Request and service fixtures

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use shiftclock_core::{FixedClock, ShiftService, TimezoneResolver};
use shiftclock_domain::{ClockEventType, ClockRequest, CreateShiftRequest, GeofenceInput};

use super::repositories::InMemoryShiftRepository;

pub const EMPLOYEE: &str = "6f1c2d3e-4b5a-4c7d-8e9f-0a1b2c3d4e5f";
pub const OTHER_EMPLOYEE: &str = "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d";
pub const SHIFT_TYPE: &str = "0b7e6a55-2f3c-4d1e-9a8b-7c6d5e4f3a2b";

/// 2025-03-10 at `hour`:00 UTC.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
}

pub fn create_request(geofence: Option<GeofenceInput>) -> CreateShiftRequest {
    CreateShiftRequest {
        shift_type_id: SHIFT_TYPE.to_string(),
        employee_id: EMPLOYEE.to_string(),
        date_start: at(13),
        date_end: at(21),
        total_hours: 8.0,
        geofence,
        weekday_code: Some("MON".into()),
        comments: None,
        replacement_id: None,
        location: Some("Warehouse 4".into()),
        zoom: Some(15),
    }
}

/// Center (40.0, -75.0), radius 100m.
pub fn site() -> GeofenceInput {
    GeofenceInput { latitude: 40.0, longitude: -75.0, radius_meters: 100 }
}

pub fn clock(event_type: ClockEventType, lat: f64, lng: f64) -> ClockRequest {
    ClockRequest { lat, lng, event_type, timezone: "America/New_York".into() }
}

pub struct Harness {
    pub service: Arc<ShiftService>,
    pub repository: InMemoryShiftRepository,
    pub clock: Arc<FixedClock>,
}

pub fn harness(resolver: Arc<dyn TimezoneResolver>) -> Harness {
    let repository = InMemoryShiftRepository::new();
    let clock = Arc::new(FixedClock::new(at(12)));
    let service = ShiftService::new(Arc::new(repository.clone()), resolver)
        .with_clock(clock.clone());
    Harness { service: Arc::new(service), repository, clock }
}
