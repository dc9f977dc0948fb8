//! Shift repository implementation using SQLite
//!
//! Every call checks a connection out of the pool inside `spawn_blocking`.
//! Shifts are stored flat, one column per field; derived state is persisted
//! as given by core.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{named_params, params, params_from_iter, OptionalExtension, Row};
use shiftclock_core::ShiftRepository;
use shiftclock_domain::{
    ClockEvent, Coordinate, Geofence, PageRequest, Result as DomainResult, ScheduleWindow, Shift,
    ShiftClockError, ShiftDetails, ShiftFilter, ShiftState,
};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use crate::errors::InfraError;

const SHIFT_COLUMNS: &str = "id, shift_type_id, employee_id, date_start, date_end,
    date_start_timezone, date_end_timezone, total_hours,
    geofence_latitude, geofence_longitude, geofence_radius_meters,
    weekday_code, comments, replacement_id, location, zoom,
    clock_on_time, clock_on_latitude, clock_on_longitude, clock_on_timezone,
    clock_off_time, clock_off_latitude, clock_off_longitude, clock_off_timezone,
    state, created_at, updated_at";

/// SQLite-backed implementation of `ShiftRepository`
pub struct SqliteShiftRepository {
    db: Arc<DbManager>,
}

impl SqliteShiftRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn blocking<T, F>(&self, op: F) -> DomainResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbManager) -> DomainResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || op(&db)).await.map_err(map_join_error)?
    }
}

#[async_trait]
impl ShiftRepository for SqliteShiftRepository {
    async fn get(&self, id: Uuid) -> DomainResult<Option<Shift>> {
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = ?1");
            let raw = conn
                .query_row(&sql, params![id.to_string()], ShiftRow::from_row)
                .optional()
                .map_err(InfraError::from)?;
            raw.map(ShiftRow::into_shift).transpose()
        })
        .await
    }

    async fn save(&self, shift: Shift) -> DomainResult<Shift> {
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            upsert_shift(&conn, &shift)?;
            Ok(shift)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute("DELETE FROM shifts WHERE id = ?1", params![id.to_string()])
                .map_err(InfraError::from)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_employee_and_window(
        &self,
        employee_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Option<Shift>> {
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {SHIFT_COLUMNS} FROM shifts
                 WHERE employee_id = :employee_id AND date_start >= :from AND date_start <= :to
                 ORDER BY date_start ASC, id ASC
                 LIMIT 1"
            );
            let raw = conn
                .query_row(
                    &sql,
                    named_params! {
                        ":employee_id": employee_id.to_string(),
                        ":from": encode_time(&from),
                        ":to": encode_time(&to),
                    },
                    ShiftRow::from_row,
                )
                .optional()
                .map_err(InfraError::from)?;
            raw.map(ShiftRow::into_shift).transpose()
        })
        .await
    }

    async fn query(
        &self,
        filter: &ShiftFilter,
        page: PageRequest,
    ) -> DomainResult<(Vec<Shift>, u64)> {
        let (where_clause, args) = filter_clause(filter);

        self.blocking(move |db| {
            let conn = db.get_connection()?;

            let total: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM shifts{where_clause}"),
                    params_from_iter(args.iter()),
                    |row| row.get(0),
                )
                .map_err(InfraError::from)?;

            let mut page_args = args;
            page_args.push(Value::Integer(i64::from(page.limit)));
            page_args.push(Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
            let sql = format!(
                "SELECT {SHIFT_COLUMNS} FROM shifts{where_clause}
                 ORDER BY date_start DESC, id ASC
                 LIMIT ? OFFSET ?"
            );

            let mut stmt = conn.prepare(&sql).map_err(InfraError::from)?;
            let rows = stmt
                .query_map(params_from_iter(page_args.iter()), ShiftRow::from_row)
                .map_err(InfraError::from)?;

            let mut shifts = Vec::new();
            for row in rows {
                shifts.push(row.map_err(InfraError::from)?.into_shift()?);
            }

            Ok((shifts, u64::try_from(total).unwrap_or_default()))
        })
        .await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn filter_clause(filter: &ShiftFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut args = Vec::new();

    if let Some(id) = filter.employee_id {
        conditions.push("employee_id = ?");
        args.push(Value::Text(id.to_string()));
    }
    if let Some(id) = filter.shift_type_id {
        conditions.push("shift_type_id = ?");
        args.push(Value::Text(id.to_string()));
    }
    if let Some(from) = filter.date_from {
        conditions.push("date_start >= ?");
        args.push(Value::Text(encode_time(&from)));
    }
    if let Some(to) = filter.date_to {
        conditions.push("date_end <= ?");
        args.push(Value::Text(encode_time(&to)));
    }

    if conditions.is_empty() {
        (String::new(), args)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), args)
    }
}

fn upsert_shift(conn: &rusqlite::Connection, shift: &Shift) -> DomainResult<()> {
    let geofence = shift.geofence.as_ref();
    let clock_on = shift.clock_on.as_ref();
    let clock_off = shift.clock_off.as_ref();
    let details = &shift.details;

    conn.execute(
        &format!(
            "INSERT INTO shifts ({SHIFT_COLUMNS}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27)
             ON CONFLICT(id) DO UPDATE SET
                shift_type_id = excluded.shift_type_id,
                employee_id = excluded.employee_id,
                date_start = excluded.date_start,
                date_end = excluded.date_end,
                date_start_timezone = excluded.date_start_timezone,
                date_end_timezone = excluded.date_end_timezone,
                total_hours = excluded.total_hours,
                geofence_latitude = excluded.geofence_latitude,
                geofence_longitude = excluded.geofence_longitude,
                geofence_radius_meters = excluded.geofence_radius_meters,
                weekday_code = excluded.weekday_code,
                comments = excluded.comments,
                replacement_id = excluded.replacement_id,
                location = excluded.location,
                zoom = excluded.zoom,
                clock_on_time = excluded.clock_on_time,
                clock_on_latitude = excluded.clock_on_latitude,
                clock_on_longitude = excluded.clock_on_longitude,
                clock_on_timezone = excluded.clock_on_timezone,
                clock_off_time = excluded.clock_off_time,
                clock_off_latitude = excluded.clock_off_latitude,
                clock_off_longitude = excluded.clock_off_longitude,
                clock_off_timezone = excluded.clock_off_timezone,
                state = excluded.state,
                updated_at = excluded.updated_at"
        ),
        params![
            shift.id.to_string(),
            shift.shift_type_id.to_string(),
            shift.employee_id.to_string(),
            encode_time(&shift.schedule.start),
            encode_time(&shift.schedule.end),
            shift.schedule.start_timezone,
            shift.schedule.end_timezone,
            shift.total_hours,
            geofence.map(|g| g.center.latitude),
            geofence.map(|g| g.center.longitude),
            geofence.map(|g| g.radius_meters),
            details.weekday_code,
            details.comments,
            details.replacement_id.map(|id| id.to_string()),
            details.location,
            details.zoom,
            clock_on.map(|e| encode_time(&e.at)),
            clock_on.map(|e| e.coordinate.latitude),
            clock_on.map(|e| e.coordinate.longitude),
            clock_on.map(|e| e.timezone.as_str()),
            clock_off.map(|e| encode_time(&e.at)),
            clock_off.map(|e| e.coordinate.latitude),
            clock_off.map(|e| e.coordinate.longitude),
            clock_off.map(|e| e.timezone.as_str()),
            shift.state.to_string(),
            encode_time(&shift.created_at),
            encode_time(&shift.updated_at),
        ],
    )
    .map_err(InfraError::from)?;
    Ok(())
}

/// Raw column values, decoded into a [`Shift`] outside the rusqlite row
/// callback so that decoding failures become domain errors.
struct ShiftRow {
    id: String,
    shift_type_id: String,
    employee_id: String,
    date_start: String,
    date_end: String,
    date_start_timezone: Option<String>,
    date_end_timezone: Option<String>,
    total_hours: f64,
    geofence: (Option<f64>, Option<f64>, Option<u32>),
    weekday_code: Option<String>,
    comments: Option<String>,
    replacement_id: Option<String>,
    location: Option<String>,
    zoom: Option<u32>,
    clock_on: RawClockEvent,
    clock_off: RawClockEvent,
    state: String,
    created_at: String,
    updated_at: String,
}

type RawClockEvent = (Option<String>, Option<f64>, Option<f64>, Option<String>);

impl ShiftRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            shift_type_id: row.get(1)?,
            employee_id: row.get(2)?,
            date_start: row.get(3)?,
            date_end: row.get(4)?,
            date_start_timezone: row.get(5)?,
            date_end_timezone: row.get(6)?,
            total_hours: row.get(7)?,
            geofence: (row.get(8)?, row.get(9)?, row.get(10)?),
            weekday_code: row.get(11)?,
            comments: row.get(12)?,
            replacement_id: row.get(13)?,
            location: row.get(14)?,
            zoom: row.get(15)?,
            clock_on: (row.get(16)?, row.get(17)?, row.get(18)?, row.get(19)?),
            clock_off: (row.get(20)?, row.get(21)?, row.get(22)?, row.get(23)?),
            state: row.get(24)?,
            created_at: row.get(25)?,
            updated_at: row.get(26)?,
        })
    }

    fn into_shift(self) -> DomainResult<Shift> {
        let geofence = match self.geofence {
            (Some(latitude), Some(longitude), Some(radius)) => {
                Some(Geofence { center: Coordinate::new(latitude, longitude), radius_meters: radius })
            }
            _ => None,
        };

        let state = self.state.parse::<ShiftState>().map_err(ShiftClockError::Database)?;

        Ok(Shift {
            id: decode_id("id", &self.id)?,
            shift_type_id: decode_id("shift_type_id", &self.shift_type_id)?,
            employee_id: decode_id("employee_id", &self.employee_id)?,
            schedule: ScheduleWindow {
                start: decode_time(&self.date_start)?,
                end: decode_time(&self.date_end)?,
                start_timezone: self.date_start_timezone,
                end_timezone: self.date_end_timezone,
            },
            total_hours: self.total_hours,
            geofence,
            details: ShiftDetails {
                weekday_code: self.weekday_code,
                comments: self.comments,
                replacement_id: self
                    .replacement_id
                    .as_deref()
                    .map(|id| decode_id("replacement_id", id))
                    .transpose()?,
                location: self.location,
                zoom: self.zoom,
            },
            clock_on: decode_clock_event(self.clock_on)?,
            clock_off: decode_clock_event(self.clock_off)?,
            state,
            created_at: decode_time(&self.created_at)?,
            updated_at: decode_time(&self.updated_at)?,
        })
    }
}

fn decode_clock_event(raw: RawClockEvent) -> DomainResult<Option<ClockEvent>> {
    match raw {
        (Some(at), Some(latitude), Some(longitude), Some(timezone)) => Ok(Some(ClockEvent {
            at: decode_time(&at)?,
            coordinate: Coordinate::new(latitude, longitude),
            timezone,
        })),
        _ => Ok(None),
    }
}

fn encode_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_time(value: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)).map_err(|err| {
        ShiftClockError::Database(format!("invalid stored timestamp '{value}': {err}"))
    })
}

fn decode_id(column: &str, value: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| ShiftClockError::Database(format!("invalid stored {column} '{value}': {err}")))
}

fn map_join_error(err: task::JoinError) -> ShiftClockError {
    ShiftClockError::Internal(format!("Task join error: {err}"))
}
