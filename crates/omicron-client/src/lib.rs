//! omicron-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does omicron-client do?
//!
//! An Omicron input server aggregates input devices (touch overlays, motion
//! capture, wands, speech recognizers) and streams their events to
//! subscribed clients. This crate is such a client:
//!
//! 1. Opens a TCP control connection to the server and announces the local
//!    UDP data port in a one-line handshake.
//! 2. Receives 1088-byte binary event packets on the data port, decodes
//!    them with `omicron-core`, and buffers them in an [`omicron_core::EventQueue`].
//! 3. A consumer drains the queue on its own tick through
//!    [`application::dispatch_events::EventDispatcher`], fanning each event
//!    out to registered listeners.
//!
//! The network path and the consumer never share a thread: the receive loop
//! publishes, the dispatcher drains.

/// Application layer: listener registry and the consumer tick.
pub mod application;

/// Infrastructure layer: network transport and config storage.
pub mod infrastructure;
