//! Shift lifecycle manager - core business logic
//!
//! Every mutation of an existing shift runs read → validate → write while
//! holding that shift's lock, so concurrent clock events on one shift are
//! serialised and different shifts never contend. Validation always happens
//! before the write; a failed operation leaves the stored shift unchanged.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use dashmap::DashMap;
use shiftclock_domain::constants::DEFAULT_PAGE_SIZE;
use shiftclock_domain::{
    ClockEvent, ClockRequest, Coordinate, CreateShiftRequest, Result, Shift, ShiftClockError,
    ShiftPage, ShiftQuery, ShiftState, UpdateShiftRequest,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ports::ShiftRepository;
use super::view::ShiftView;
use crate::clock_ports::{Clock, SystemClock};
use crate::timezone::ports::{TimezoneResolver, TimezoneSource};

type LockTable = DashMap<Uuid, Arc<Mutex<()>>>;

/// Shift lifecycle manager
pub struct ShiftService {
    repository: Arc<dyn ShiftRepository>,
    timezones: Arc<dyn TimezoneResolver>,
    clock: Arc<dyn Clock>,
    default_page_size: u32,
    locks: LockTable,
}

impl ShiftService {
    /// Create a new shift service on the wall clock
    pub fn new(
        repository: Arc<dyn ShiftRepository>,
        timezones: Arc<dyn TimezoneResolver>,
    ) -> Self {
        Self {
            repository,
            timezones,
            clock: Arc::new(SystemClock),
            default_page_size: DEFAULT_PAGE_SIZE,
            locks: DashMap::new(),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Page size used when a query does not choose one
    pub fn with_default_page_size(mut self, limit: u32) -> Self {
        self.default_page_size = limit.max(1);
        self
    }

    /// Create a shift in the NOT_STARTED state.
    ///
    /// When a geofence is supplied its center is resolved to a timezone once
    /// and both schedule ends are stamped with it. Resolution never fails the
    /// call.
    pub async fn create(&self, request: CreateShiftRequest) -> Result<ShiftView> {
        let new_shift = request.validate()?;
        let now = self.clock.now();

        let mut schedule = new_shift.schedule;
        if let Some(geofence) = &new_shift.geofence {
            let zone = self.resolve_schedule_zone(geofence.center).await;
            schedule.stamp_timezone(&zone);
        }

        let mut shift = Shift {
            id: Uuid::now_v7(),
            shift_type_id: new_shift.shift_type_id,
            employee_id: new_shift.employee_id,
            schedule,
            total_hours: new_shift.total_hours,
            geofence: new_shift.geofence,
            details: new_shift.details,
            clock_on: None,
            clock_off: None,
            state: ShiftState::NotStarted,
            created_at: now,
            updated_at: now,
        };
        shift.refresh_state();

        let saved = self.repository.save(shift).await?;
        info!(
            shift_id = %saved.id,
            employee_id = %saved.employee_id,
            geofenced = saved.geofence.is_some(),
            "shift created"
        );
        Ok(ShiftView::new(saved))
    }

    /// Apply a partial update. Installing a geofence re-resolves the schedule
    /// timezone; clock facts and derived state are never touched.
    ///
    /// The zone is resolved before the shift lock is taken, and only once the
    /// merged schedule has been checked against the current shift.
    pub async fn update(&self, id: Uuid, request: UpdateShiftRequest) -> Result<ShiftView> {
        let changes = request.validate()?;

        let zone = match changes.new_geofence() {
            Some(geofence) => {
                changes.check_against(&self.load(id).await?)?;
                Some(self.resolve_schedule_zone(geofence.center).await)
            }
            None => None,
        };

        let _lock = self.lock_shift(id).await;
        let mut shift = self.load(id).await?;
        let now = self.clock.now();

        changes.apply_to(&mut shift)?;
        if let Some(zone) = zone {
            shift.schedule.stamp_timezone(&zone);
        }
        shift.refresh_state();
        shift.updated_at = now;

        let saved = self.repository.save(shift).await?;
        info!(shift_id = %id, "shift updated");
        Ok(ShiftView::new(saved))
    }

    /// Record a clock-on or clock-off.
    ///
    /// The current instant is read once and stamped into both the clock event
    /// and `updated_at`.
    pub async fn record_clock(&self, id: Uuid, request: ClockRequest) -> Result<ShiftView> {
        let command = request.validate()?;

        let _lock = self.lock_shift(id).await;
        let mut shift = self.load(id).await?;
        let now = self.clock.now();

        let event =
            ClockEvent { at: now, coordinate: command.coordinate, timezone: command.timezone };
        let state = shift.record_clock(command.event_type, event).map_err(|err| {
            warn!(shift_id = %id, kind = %command.event_type, error = %err, "clock event rejected");
            err
        })?;
        shift.updated_at = now;

        let saved = self.repository.save(shift).await?;
        info!(shift_id = %id, kind = %command.event_type, state = %state, "clock event recorded");
        Ok(ShiftView::new(saved))
    }

    /// Delete a shift.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let _lock = self.lock_shift(id).await;
        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        info!(shift_id = %id, "shift removed");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<ShiftView> {
        self.load(id).await.map(ShiftView::new)
    }

    /// Filtered page of shifts, most recent schedule start first.
    pub async fn list(&self, query: ShiftQuery) -> Result<ShiftPage<ShiftView>> {
        let (filter, page) = query.validate(self.default_page_size)?;
        let (shifts, total) = self.repository.query(&filter, page).await?;
        debug!(total, page = page.page, limit = page.limit, "shift query");

        Ok(ShiftPage {
            data: shifts.into_iter().map(ShiftView::new).collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// [`list`](Self::list) pinned to one employee. Any employee filter in
    /// `query` is ignored.
    pub async fn list_for_employee(
        &self,
        employee_id: Uuid,
        query: ShiftQuery,
    ) -> Result<ShiftPage<ShiftView>> {
        let query = ShiftQuery { employee_id: Some(employee_id.to_string()), ..query };
        self.list(query).await
    }

    /// The employee's shift starting within the current UTC day.
    pub async fn today_shift(&self, employee_id: Uuid) -> Result<ShiftView> {
        let (from, to) = utc_day_bounds(self.clock.now());
        self.repository
            .find_by_employee_and_window(employee_id, from, to)
            .await?
            .map(ShiftView::new)
            .ok_or_else(|| {
                ShiftClockError::NotFound(format!("no shift today for employee {employee_id}"))
            })
    }

    async fn load(&self, id: Uuid) -> Result<Shift> {
        self.repository.get(id).await?.ok_or_else(|| not_found(id))
    }

    async fn resolve_schedule_zone(&self, center: Coordinate) -> String {
        let resolved = self.timezones.resolve_timezone(center).await;
        if resolved.source == TimezoneSource::Fallback {
            warn!(zone = %resolved.zone, "schedule timezone fell back");
        } else {
            debug!(zone = %resolved.zone, source = ?resolved.source, "schedule timezone resolved");
        }
        resolved.zone
    }

    async fn lock_shift(&self, id: Uuid) -> ShiftLock<'_> {
        let mutex = self.locks.entry(id).or_default().value().clone();
        let guard = mutex.lock_owned().await;
        ShiftLock { id, locks: &self.locks, guard: Some(guard) }
    }
}

/// Held for the duration of one mutation on a shift. The table entry is
/// dropped once nobody else holds or waits on it.
struct ShiftLock<'a> {
    id: Uuid,
    locks: &'a LockTable,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ShiftLock<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

fn not_found(id: Uuid) -> ShiftClockError {
    ShiftClockError::NotFound(format!("shift {id}"))
}

/// `[00:00:00, 23:59:59]` of the UTC day containing `now`.
fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1) - Duration::seconds(1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn day_bounds_cover_the_utc_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 27, 5).unwrap();
        let (from, to) = utc_day_bounds(now);
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap());
    }
}
