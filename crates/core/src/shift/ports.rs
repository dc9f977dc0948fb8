//! Port interfaces for shift persistence
//!
//! These traits define the boundary between the lifecycle manager and the
//! storage adapter. Implementations persist shifts exactly as given; state
//! derivation and audit stamping happen in core.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shiftclock_domain::{PageRequest, Result, Shift, ShiftFilter};
use uuid::Uuid;

/// Trait for shift persistence and retrieval
#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Get a shift by ID
    async fn get(&self, id: Uuid) -> Result<Option<Shift>>;

    /// Insert or replace a shift, returning what was stored
    async fn save(&self, shift: Shift) -> Result<Shift>;

    /// Delete a shift by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Earliest-starting shift for `employee_id` whose schedule start falls
    /// within `[from, to]`
    async fn find_by_employee_and_window(
        &self,
        employee_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Shift>>;

    /// One page of shifts matching `filter`, newest schedule start first,
    /// together with the total number of matches
    async fn query(&self, filter: &ShiftFilter, page: PageRequest) -> Result<(Vec<Shift>, u64)>;
}
