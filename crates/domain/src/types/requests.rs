//! Request DTOs and their boundary validation
//!
//! Requests arrive loosely typed (string identifiers, signed integers) and are
//! validated into typed values before any store access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_TIMEZONE_ID_LENGTH, MAX_WEEKDAY_CODE_LENGTH};
use crate::errors::{Result, ShiftClockError};
use crate::types::shift::{
    ClockEventType, Coordinate, Geofence, ScheduleWindow, Shift, ShiftDetails,
};

/// Geofence as supplied by a caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceInput {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: i64,
}

impl GeofenceInput {
    pub fn validate(&self) -> Result<Geofence> {
        let radius = u32::try_from(self.radius_meters).map_err(|_| {
            ShiftClockError::InvalidInput(format!(
                "radius must be a positive number of meters, got {}",
                self.radius_meters
            ))
        })?;
        Geofence::new(Coordinate::new(self.latitude, self.longitude), radius)
    }
}

/// Input for creating a shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShiftRequest {
    pub shift_type_id: String,
    pub employee_id: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub total_hours: f64,
    #[serde(default)]
    pub geofence: Option<GeofenceInput>,
    #[serde(default)]
    pub weekday_code: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub replacement_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub zoom: Option<i64>,
}

/// Validated form of [`CreateShiftRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewShift {
    pub shift_type_id: Uuid,
    pub employee_id: Uuid,
    pub schedule: ScheduleWindow,
    pub total_hours: f64,
    pub geofence: Option<Geofence>,
    pub details: ShiftDetails,
}

impl CreateShiftRequest {
    pub fn validate(&self) -> Result<NewShift> {
        Ok(NewShift {
            shift_type_id: parse_id("shift_type_id", &self.shift_type_id)?,
            employee_id: parse_id("employee_id", &self.employee_id)?,
            schedule: ScheduleWindow::new(self.date_start, self.date_end)?,
            total_hours: validate_total_hours(self.total_hours)?,
            geofence: self.geofence.as_ref().map(GeofenceInput::validate).transpose()?,
            details: ShiftDetails {
                weekday_code: self.weekday_code.clone().map(validate_weekday_code).transpose()?,
                comments: self.comments.clone(),
                replacement_id: self
                    .replacement_id
                    .as_deref()
                    .map(|id| parse_id("replacement_id", id))
                    .transpose()?,
                location: self.location.clone(),
                zoom: self.zoom.map(validate_zoom).transpose()?,
            },
        })
    }
}

/// Partial update of a shift
///
/// Nullable fields use a double option: absent leaves the field alone,
/// `null` clears it, a value replaces it. Clock facts cannot be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateShiftRequest {
    #[serde(default)]
    pub shift_type_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub geofence: Option<Option<GeofenceInput>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub weekday_code: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub comments: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub replacement_id: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub zoom: Option<Option<i64>>,
}

/// Validated form of [`UpdateShiftRequest`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftChanges {
    pub shift_type_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub total_hours: Option<f64>,
    pub geofence: Option<Option<Geofence>>,
    pub weekday_code: Option<Option<String>>,
    pub comments: Option<Option<String>>,
    pub replacement_id: Option<Option<Uuid>>,
    pub location: Option<Option<String>>,
    pub zoom: Option<Option<u32>>,
}

impl UpdateShiftRequest {
    pub fn validate(&self) -> Result<ShiftChanges> {
        Ok(ShiftChanges {
            shift_type_id: self
                .shift_type_id
                .as_deref()
                .map(|id| parse_id("shift_type_id", id))
                .transpose()?,
            employee_id: self
                .employee_id
                .as_deref()
                .map(|id| parse_id("employee_id", id))
                .transpose()?,
            date_start: self.date_start,
            date_end: self.date_end,
            total_hours: self.total_hours.map(validate_total_hours).transpose()?,
            geofence: self
                .geofence
                .map(|inner| inner.as_ref().map(GeofenceInput::validate).transpose())
                .transpose()?,
            weekday_code: self
                .weekday_code
                .clone()
                .map(|inner| inner.map(validate_weekday_code).transpose())
                .transpose()?,
            comments: self.comments.clone(),
            replacement_id: self
                .replacement_id
                .as_ref()
                .map(|inner| inner.as_deref().map(|id| parse_id("replacement_id", id)).transpose())
                .transpose()?,
            location: self.location.clone(),
            zoom: self.zoom.map(|inner| inner.map(validate_zoom).transpose()).transpose()?,
        })
    }
}

impl ShiftChanges {
    /// The new geofence, when this update installs one.
    pub fn new_geofence(&self) -> Option<&Geofence> {
        self.geofence.as_ref().and_then(Option::as_ref)
    }

    /// Reject the update if the merged schedule would end before it starts.
    pub fn check_against(&self, shift: &Shift) -> Result<()> {
        self.merged_schedule(&shift.schedule).map(|_| ())
    }

    fn merged_schedule(&self, current: &ScheduleWindow) -> Result<ScheduleWindow> {
        let mut schedule = current.clone();
        if let Some(start) = self.date_start {
            schedule.start = start;
        }
        if let Some(end) = self.date_end {
            schedule.end = end;
        }
        schedule.validate()?;
        Ok(schedule)
    }

    /// Merge into `shift`. Clock facts, derived state and audit fields are
    /// not touched. The merged schedule is validated before anything is
    /// written, so `shift` is unchanged on error.
    pub fn apply_to(self, shift: &mut Shift) -> Result<()> {
        shift.schedule = self.merged_schedule(&shift.schedule)?;

        if let Some(id) = self.shift_type_id {
            shift.shift_type_id = id;
        }
        if let Some(id) = self.employee_id {
            shift.employee_id = id;
        }
        if let Some(hours) = self.total_hours {
            shift.total_hours = hours;
        }
        if let Some(geofence) = self.geofence {
            shift.geofence = geofence;
        }

        let details = &mut shift.details;
        if let Some(code) = self.weekday_code {
            details.weekday_code = code;
        }
        if let Some(comments) = self.comments {
            details.comments = comments;
        }
        if let Some(replacement) = self.replacement_id {
            details.replacement_id = replacement;
        }
        if let Some(location) = self.location {
            details.location = location;
        }
        if let Some(zoom) = self.zoom {
            details.zoom = zoom;
        }

        Ok(())
    }
}

/// Clock-on / clock-off request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub event_type: ClockEventType,
    pub timezone: String,
}

/// Validated form of [`ClockRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClockCommand {
    pub coordinate: Coordinate,
    pub event_type: ClockEventType,
    pub timezone: String,
}

impl ClockRequest {
    pub fn validate(&self) -> Result<ClockCommand> {
        let coordinate = Coordinate::new(self.lat, self.lng);
        coordinate.validate()?;

        let timezone = self.timezone.trim();
        if timezone.is_empty() {
            return Err(ShiftClockError::InvalidInput("timezone must not be empty".into()));
        }
        if timezone.len() > MAX_TIMEZONE_ID_LENGTH {
            return Err(ShiftClockError::InvalidInput(format!(
                "timezone must be at most {MAX_TIMEZONE_ID_LENGTH} characters"
            )));
        }

        Ok(ClockCommand { coordinate, event_type: self.event_type, timezone: timezone.to_string() })
    }
}

/// Parse a caller-supplied identifier, naming `field` in the error.
pub fn parse_id(field: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        ShiftClockError::InvalidInput(format!("{field} must be a UUID, got '{value}'"))
    })
}

fn validate_total_hours(hours: f64) -> Result<f64> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(ShiftClockError::InvalidInput(format!(
            "total_hours must be a non-negative number, got {hours}"
        )));
    }
    Ok(hours)
}

fn validate_weekday_code(code: String) -> Result<String> {
    if code.chars().count() > MAX_WEEKDAY_CODE_LENGTH {
        return Err(ShiftClockError::InvalidInput(format!(
            "weekday_code must be at most {MAX_WEEKDAY_CODE_LENGTH} characters, got '{code}'"
        )));
    }
    Ok(code)
}

fn validate_zoom(zoom: i64) -> Result<u32> {
    u32::try_from(zoom).map_err(|_| {
        ShiftClockError::InvalidInput(format!("zoom must be zero or greater, got {zoom}"))
    })
}
