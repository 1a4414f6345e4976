//! Application layer: consumer-side event delivery.

pub mod dispatch_events;
