#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use shiftclock_domain::{
    ClockEvent, Coordinate, Geofence, ScheduleWindow, Shift, ShiftDetails, ShiftState,
};
use shiftclock_infra::database::{DbManager, SqliteShiftRepository};
use tempfile::TempDir;
use uuid::Uuid;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a migrated database in a fresh temp directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn repository(&self) -> SqliteShiftRepository {
        SqliteShiftRepository::new(Arc::clone(&self.manager))
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// 2025-03-10 at `hour`:00 UTC.
pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).single().expect("valid fixture time")
}

/// A not-yet-started shift for `employee_id` starting at `start`.
pub fn make_shift(employee_id: Uuid, start: DateTime<Utc>) -> Shift {
    let schedule = ScheduleWindow {
        start,
        end: start + chrono::Duration::hours(8),
        start_timezone: None,
        end_timezone: None,
    };

    Shift {
        id: Uuid::now_v7(),
        shift_type_id: Uuid::now_v7(),
        employee_id,
        schedule,
        total_hours: 8.0,
        geofence: None,
        details: ShiftDetails::default(),
        clock_on: None,
        clock_off: None,
        state: ShiftState::NotStarted,
        created_at: at(0),
        updated_at: at(0),
    }
}

/// A fully populated, finished shift.
pub fn make_finished_shift(employee_id: Uuid) -> Shift {
    let mut shift = make_shift(employee_id, at(13));
    shift.schedule.start_timezone = Some("America/New_York".into());
    shift.schedule.end_timezone = Some("America/New_York".into());
    shift.geofence = Some(
        Geofence::new(Coordinate::new(40.712_776, -74.005_974), 150).expect("valid geofence"),
    );
    shift.details = ShiftDetails {
        weekday_code: Some("MON".into()),
        comments: Some("covering for a colleague".into()),
        replacement_id: Some(Uuid::now_v7()),
        location: Some("Pier 17".into()),
        zoom: Some(16),
    };
    shift.clock_on = Some(ClockEvent {
        at: at(13) + chrono::Duration::nanoseconds(123_456_789),
        coordinate: Coordinate::new(40.712_9, -74.006_1),
        timezone: "America/New_York".into(),
    });
    shift.clock_off = Some(ClockEvent {
        at: at(21),
        coordinate: Coordinate::new(40.712_5, -74.005_8),
        timezone: "America/New_York".into(),
    });
    shift.state = ShiftState::Finished;
    shift
}
