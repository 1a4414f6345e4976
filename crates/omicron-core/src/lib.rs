//! # omicron-core
//!
//! Shared library for the Omicron connector containing the wire-protocol
//! codec, the typed event model, and the hand-off queue between the
//! transport and the consuming application.
//!
//! This crate is pure: it has zero dependencies on sockets, OS APIs, or an
//! async runtime. The transport lives in `omicron-client`.
//!
//! # Architecture overview
//!
//! An Omicron input server aggregates devices (touch overlays, motion
//! capture, game controllers, brain interfaces, wands, speech) and streams
//! every reading as a fixed-layout binary packet over UDP. A client opens a
//! TCP control connection, announces its UDP data port with a one-line
//! handshake, and from then on only receives.
//!
//! This crate defines:
//!
//! - **`protocol`** – how bytes travel over the network: the ASCII
//!   handshake message and the 1088-byte little-endian event packet.
//!
//! - **`event`** – the decoded [`Event`] record, the service/action/flag
//!   enumerations, and bounds-checked typed accessors over the variable
//!   extra-data payload.
//!
//! - **`queue`** – the mutex-guarded [`EventQueue`] that buffers decoded
//!   events between the network receive task and a consumer that drains in
//!   batches at its own cadence.

pub mod event;
pub mod protocol;
pub mod queue;

// Re-export the most-used types at the crate root so callers can write
// `omicron_core::Event` instead of `omicron_core::event::data::Event`.
pub use event::data::{Event, EXTRA_DATA_SIZE};
pub use event::types::{EventFlags, EventType, ExtraDataType, ServiceType};
pub use protocol::codec::{
    decode_event_packet, encode_event_packet, ProtocolError, EVENT_PACKET_SIZE,
};
pub use protocol::handshake::{
    encode_handshake, parse_handshake, ProtocolVariant, CONTROL_PORT_DEFAULT, DATA_PORT_DEFAULT,
};
pub use queue::EventQueue;
