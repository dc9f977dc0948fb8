//! Shift records, geofences and clock events
//!
//! A shift's `state` is never an independent input: it is a pure function of
//! the clock facts and is re-derived at the end of every successful mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MIN_GEOFENCE_RADIUS_METERS;
use crate::errors::{Result, ShiftClockError};
use crate::utils::geo::distance_meters;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject non-finite or out-of-range degrees.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ShiftClockError::InvalidInput(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ShiftClockError::InvalidInput(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Circular region a clock coordinate must fall within.
///
/// Center and radius travel together; a shift either has a complete
/// geofence or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub center: Coordinate,
    pub radius_meters: u32,
}

impl Geofence {
    pub fn new(center: Coordinate, radius_meters: u32) -> Result<Self> {
        center.validate()?;
        if radius_meters < MIN_GEOFENCE_RADIUS_METERS {
            return Err(ShiftClockError::InvalidInput(format!(
                "radius must be at least {MIN_GEOFENCE_RADIUS_METERS} meter"
            )));
        }
        Ok(Self { center, radius_meters })
    }

    /// Distance from the center to `point`, or a `GeofenceViolation` when the
    /// point lies beyond the radius. The boundary itself is inside.
    pub fn check(&self, point: &Coordinate) -> Result<f64> {
        let distance = self.center.distance_to(point);
        if distance > f64::from(self.radius_meters) {
            return Err(ShiftClockError::GeofenceViolation {
                distance_meters: distance,
                radius_meters: self.radius_meters,
            });
        }
        Ok(distance)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        self.check(point).is_ok()
    }
}

/// Derived lifecycle state of a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftState {
    NotStarted,
    Started,
    Finished,
}

crate::impl_domain_status_conversions!(ShiftState {
    NotStarted => "not_started",
    Started => "started",
    Finished => "finished",
});

impl ShiftState {
    /// The state implied by a pair of clock facts.
    ///
    /// | clock-on | clock-off | state       |
    /// |----------|-----------|-------------|
    /// | any      | set       | FINISHED    |
    /// | set      | unset     | STARTED     |
    /// | unset    | unset     | NOT_STARTED |
    pub fn from_clock_facts(clock_on: Option<&ClockEvent>, clock_off: Option<&ClockEvent>) -> Self {
        match (clock_on, clock_off) {
            (_, Some(_)) => Self::Finished,
            (Some(_), None) => Self::Started,
            (None, None) => Self::NotStarted,
        }
    }
}

/// Kind of clock event requested by an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockEventType {
    ClockOn,
    ClockOff,
}

crate::impl_domain_status_conversions!(ClockEventType {
    ClockOn => "clock_on",
    ClockOff => "clock_off",
});

/// A recorded clock-on or clock-off. Timestamp, coordinate and timezone are
/// always set together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockEvent {
    pub at: DateTime<Utc>,
    pub coordinate: Coordinate,
    pub timezone: String,
}

/// Planned start and end of a shift, each with the zone it was authored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub start_timezone: Option<String>,
    pub end_timezone: Option<String>,
}

impl ScheduleWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let window = Self { start, end, start_timezone: None, end_timezone: None };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(ShiftClockError::InvalidInput(format!(
                "schedule end {} precedes start {}",
                self.end.to_rfc3339(),
                self.start.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Stamp both ends of the window with the same zone.
    pub fn stamp_timezone(&mut self, zone: &str) {
        self.start_timezone = Some(zone.to_string());
        self.end_timezone = Some(zone.to_string());
    }
}

/// Descriptive fields carried alongside a shift
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftDetails {
    pub weekday_code: Option<String>,
    pub comments: Option<String>,
    pub replacement_id: Option<Uuid>,
    pub location: Option<String>,
    pub zoom: Option<u32>,
}

/// One scheduled work period for an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: Uuid,
    pub shift_type_id: Uuid,
    pub employee_id: Uuid,
    pub schedule: ScheduleWindow,
    pub total_hours: f64,
    pub geofence: Option<Geofence>,
    #[serde(default)]
    pub details: ShiftDetails,
    pub clock_on: Option<ClockEvent>,
    pub clock_off: Option<ClockEvent>,
    pub state: ShiftState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// State implied by the current clock facts, regardless of what is
    /// stored in `state`.
    pub fn derived_state(&self) -> ShiftState {
        ShiftState::from_clock_facts(self.clock_on.as_ref(), self.clock_off.as_ref())
    }

    /// Re-assert `state` from the clock facts.
    pub fn refresh_state(&mut self) -> ShiftState {
        self.state = self.derived_state();
        self.state
    }

    pub fn clock_event(&self, kind: ClockEventType) -> Option<&ClockEvent> {
        match kind {
            ClockEventType::ClockOn => self.clock_on.as_ref(),
            ClockEventType::ClockOff => self.clock_off.as_ref(),
        }
    }

    /// Geofence gate for a clock coordinate. Always passes without a geofence.
    pub fn check_geofence(&self, point: &Coordinate) -> Result<()> {
        match &self.geofence {
            Some(geofence) => geofence.check(point).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Ordering gate for a clock event against the current clock facts.
    ///
    /// Clock-on is accepted only before any clock event; clock-off only after
    /// clock-on and before a previous clock-off.
    pub fn check_transition(&self, kind: ClockEventType) -> Result<()> {
        match (kind, self.derived_state()) {
            (ClockEventType::ClockOn, ShiftState::NotStarted)
            | (ClockEventType::ClockOff, ShiftState::Started) => Ok(()),
            (ClockEventType::ClockOn, ShiftState::Started) => {
                Err(ShiftClockError::InvalidTransition("Shift is already clocked on".into()))
            }
            (ClockEventType::ClockOn, ShiftState::Finished) => Err(
                ShiftClockError::InvalidTransition("Cannot clock on after clocking off".into()),
            ),
            (ClockEventType::ClockOff, ShiftState::NotStarted) => Err(
                ShiftClockError::InvalidTransition("Cannot clock off before clocking on".into()),
            ),
            (ClockEventType::ClockOff, ShiftState::Finished) => {
                Err(ShiftClockError::InvalidTransition("Shift is already clocked off".into()))
            }
        }
    }

    /// Validate and record a clock event, then re-derive the state.
    ///
    /// Geofence is checked before ordering. On any error the shift is left
    /// untouched.
    pub fn record_clock(&mut self, kind: ClockEventType, event: ClockEvent) -> Result<ShiftState> {
        self.check_geofence(&event.coordinate)?;
        self.check_transition(kind)?;

        match kind {
            ClockEventType::ClockOn => self.clock_on = Some(event),
            ClockEventType::ClockOff => self.clock_off = Some(event),
        }

        Ok(self.refresh_state())
    }
}
