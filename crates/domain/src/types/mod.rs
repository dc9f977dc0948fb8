//! Domain types and models

pub mod query;
pub mod requests;
pub mod shift;

pub use query::{PageRequest, ShiftFilter, ShiftPage, ShiftQuery};
pub use requests::{
    parse_id, ClockCommand, ClockRequest, CreateShiftRequest, GeofenceInput, NewShift,
    ShiftChanges, UpdateShiftRequest,
};
pub use shift::{
    ClockEvent, ClockEventType, Coordinate, Geofence, ScheduleWindow, Shift, ShiftDetails,
    ShiftState,
};
