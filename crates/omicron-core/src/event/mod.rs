//! Event model: the decoded record and its wire-level enumerations.

pub mod data;
pub mod types;

pub use data::{Event, EXTRA_DATA_SIZE};
pub use types::{EventFlags, EventType, ExtraDataType, ServiceType};
