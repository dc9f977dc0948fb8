//! Shift lifecycle and queries

pub mod ports;
pub mod service;
pub mod view;

pub use service::ShiftService;
pub use view::ShiftView;
