//! Shift filtering and pagination types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_PAGE;
use crate::errors::{Result, ShiftClockError};
use crate::types::requests::parse_id;
use crate::types::shift::Shift;

/// Store-level filter over shifts
///
/// `date_from` bounds the schedule start from below, `date_to` bounds the
/// schedule end from above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftFilter {
    pub employee_id: Option<Uuid>,
    pub shift_type_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ShiftFilter {
    pub fn matches(&self, shift: &Shift) -> bool {
        self.employee_id.map_or(true, |id| shift.employee_id == id)
            && self.shift_type_id.map_or(true, |id| shift.shift_type_id == id)
            && self.date_from.map_or(true, |from| shift.schedule.start >= from)
            && self.date_to.map_or(true, |to| shift.schedule.end <= to)
    }
}

/// One-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(ShiftClockError::InvalidInput("page must be 1 or greater".into()));
        }
        if limit == 0 {
            return Err(ShiftClockError::InvalidInput("limit must be 1 or greater".into()));
        }
        Ok(Self { page, limit })
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Caller-facing list query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftQuery {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub shift_type_id: Option<String>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ShiftQuery {
    /// Validate into a store filter and page, using `default_limit` when the
    /// caller did not choose one.
    pub fn validate(&self, default_limit: u32) -> Result<(ShiftFilter, PageRequest)> {
        let filter = ShiftFilter {
            employee_id: self
                .employee_id
                .as_deref()
                .map(|id| parse_id("employee_id", id))
                .transpose()?,
            shift_type_id: self
                .shift_type_id
                .as_deref()
                .map(|id| parse_id("shift_type_id", id))
                .transpose()?,
            date_from: self.date_from,
            date_to: self.date_to,
        };
        let page = PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(default_limit),
        )?;
        Ok((filter, page))
    }
}

/// A page of results with the total count across all pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPage<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
