//! Mock repository implementations for testing
//!
//! Provides an in-memory `ShiftRepository` with the same ordering and
//! filtering rules as the SQLite adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftclock_core::ShiftRepository;
use shiftclock_domain::{
    PageRequest, Result as DomainResult, Shift, ShiftClockError, ShiftFilter,
};
use uuid::Uuid;

/// In-memory mock for `ShiftRepository`.
///
/// `get` yields to the scheduler after taking its copy, so an unsynchronised
/// read-modify-write lets a second caller read the same stale shift. Saves can be made to fail to exercise store
/// errors.
#[derive(Default, Clone)]
pub struct InMemoryShiftRepository {
    shifts: Arc<Mutex<HashMap<Uuid, Shift>>>,
    saves: Arc<AtomicUsize>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemoryShiftRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a shift directly, bypassing the service.
    pub fn insert(&self, shift: Shift) {
        self.shifts.lock().unwrap().insert(shift.id, shift);
    }

    pub fn stored(&self, id: Uuid) -> Option<Shift> {
        self.shifts.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.shifts.lock().unwrap().len()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ShiftRepository for InMemoryShiftRepository {
    async fn get(&self, id: Uuid) -> DomainResult<Option<Shift>> {
        let shift = self.stored(id);
        tokio::task::yield_now().await;
        Ok(shift)
    }

    async fn save(&self, shift: Shift) -> DomainResult<Shift> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ShiftClockError::Database("disk I/O error".into()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.shifts.lock().unwrap().insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.shifts.lock().unwrap().remove(&id).is_some())
    }

    async fn find_by_employee_and_window(
        &self,
        employee_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Option<Shift>> {
        Ok(self
            .shifts
            .lock()
            .unwrap()
            .values()
            .filter(|shift| {
                shift.employee_id == employee_id
                    && shift.schedule.start >= from
                    && shift.schedule.start <= to
            })
            .min_by_key(|shift| (shift.schedule.start, shift.id))
            .cloned())
    }

    async fn query(
        &self,
        filter: &ShiftFilter,
        page: PageRequest,
    ) -> DomainResult<(Vec<Shift>, u64)> {
        let mut matches: Vec<Shift> = self
            .shifts
            .lock()
            .unwrap()
            .values()
            .filter(|shift| filter.matches(shift))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.schedule.start.cmp(&a.schedule.start).then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as u64;
        let data = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((data, total))
    }
}
