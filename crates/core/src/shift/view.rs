//! Enriched projection of a shift with local wall-clock fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiftclock_domain::constants::DEFAULT_LOCAL_FORMAT;
use shiftclock_domain::Shift;

use crate::timezone::format_in_timezone;

/// A stored shift plus local-time renderings.
///
/// Each `local_*` field is present only when both the instant and the zone it
/// belongs to are present on the shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftView {
    #[serde(flatten)]
    pub shift: Shift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_clock_on_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_clock_off_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_date_end: Option<String>,
}

impl ShiftView {
    pub fn new(shift: Shift) -> Self {
        let schedule = &shift.schedule;
        let local_date_start = local(schedule.start, schedule.start_timezone.as_deref());
        let local_date_end = local(schedule.end, schedule.end_timezone.as_deref());
        let local_clock_on_time =
            shift.clock_on.as_ref().and_then(|event| local(event.at, Some(&event.timezone)));
        let local_clock_off_time =
            shift.clock_off.as_ref().and_then(|event| local(event.at, Some(&event.timezone)));

        Self { shift, local_clock_on_time, local_clock_off_time, local_date_start, local_date_end }
    }

    pub fn into_shift(self) -> Shift {
        self.shift
    }
}

impl From<Shift> for ShiftView {
    fn from(shift: Shift) -> Self {
        Self::new(shift)
    }
}

fn local(instant: DateTime<Utc>, zone: Option<&str>) -> Option<String> {
    zone.filter(|zone| !zone.trim().is_empty())
        .map(|zone| format_in_timezone(instant, zone, DEFAULT_LOCAL_FORMAT))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use shiftclock_domain::{ClockEvent, Coordinate, ScheduleWindow, ShiftDetails, ShiftState};
    use uuid::Uuid;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, hour, 0, 0).unwrap()
    }

    fn shift() -> Shift {
        Shift {
            id: Uuid::new_v4(),
            shift_type_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            schedule: ScheduleWindow::new(at(13), at(21)).unwrap(),
            total_hours: 8.0,
            geofence: None,
            details: ShiftDetails::default(),
            clock_on: None,
            clock_off: None,
            state: ShiftState::NotStarted,
            created_at: at(8),
            updated_at: at(8),
        }
    }

    #[test]
    fn no_zones_means_no_local_fields() {
        let view = ShiftView::from(shift());
        assert!(view.local_date_start.is_none());
        assert!(view.local_date_end.is_none());
        assert!(view.local_clock_on_time.is_none());
        assert!(view.local_clock_off_time.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("local_date_start").is_none());
        assert!(json.get("employee_id").is_some());
    }

    #[test]
    fn each_field_uses_its_own_zone() {
        let mut shift = shift();
        shift.schedule.start_timezone = Some("America/New_York".into());
        shift.clock_on = Some(ClockEvent {
            at: at(13),
            coordinate: Coordinate::new(40.0, -75.0),
            timezone: "Asia/Kolkata".into(),
        });
        shift.refresh_state();

        let view = ShiftView::new(shift);
        assert_eq!(view.local_date_start.as_deref(), Some("2025-07-01 09:00:00"));
        assert!(view.local_date_end.is_none());
        assert_eq!(view.local_clock_on_time.as_deref(), Some("2025-07-01 18:30:00"));
        assert!(view.local_clock_off_time.is_none());
    }

    #[test]
    fn view_is_deterministic() {
        let mut shift = shift();
        shift.schedule.stamp_timezone("Europe/Berlin");
        assert_eq!(ShiftView::new(shift.clone()), ShiftView::new(shift));
    }
}
