//! Binary codec for the fixed-layout event packet.
//!
//! Wire format (one packet per UDP datagram, all multi-byte fields
//! little-endian):
//!
//! ```text
//! [timestamp:4][source_id:4][service_id:4][service_type:4][type:4][flags:4]
//! [posx:4][posy:4][posz:4][orw:4][orx:4][ory:4][orz:4]
//! [extra_type:4][extra_items:4][extra_mask:4][extra_data:1024]
//! ```
//!
//! Total fixed size: 1088 bytes. The orientation quaternion is serialized
//! w-component first; the decoded [`Event`] stores it as `[x, y, z, w]`.
//!
//! Decode is pure: given a datagram it either produces a complete [`Event`]
//! or an error — there is no partial or streaming decode, because the data
//! channel delivers exactly one packet per receive call.

use thiserror::Error;

use crate::event::data::{Event, EXTRA_DATA_SIZE};
use crate::event::types::{EventFlags, ExtraDataType, ServiceType};

/// Fixed size of an event packet on the wire.
pub const EVENT_PACKET_SIZE: usize = 1088;

/// Byte offset of the extra-data payload within a packet.
const EXTRA_DATA_OFFSET: usize = 64;

/// Errors that can occur while decoding an event packet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The datagram is shorter than the fixed packet size.
    #[error("truncated packet: need {EVENT_PACKET_SIZE} bytes, got {0}")]
    TruncatedPacket(usize),

    /// The service-type field carries an ordinal this client does not know.
    #[error("unknown service type ordinal: {0}")]
    UnknownServiceType(u32),

    /// The extra-data-type field carries an unknown ordinal.
    #[error("unknown extra data type ordinal: {0}")]
    UnknownExtraDataType(u32),
}

/// Decodes one event packet from `bytes`.
///
/// Bytes beyond [`EVENT_PACKET_SIZE`] are ignored; a shorter buffer is a
/// [`ProtocolError::TruncatedPacket`]. A failed decode never yields a
/// partially filled event.
///
/// # Examples
///
/// ```rust
/// use omicron_core::protocol::codec::{decode_event_packet, encode_event_packet};
/// # use omicron_core::{Event, EventFlags, ExtraDataType, ServiceType, EXTRA_DATA_SIZE};
/// # let event = Event {
/// #     timestamp: 42, source_id: 1, service_id: 0,
/// #     service_type: ServiceType::Pointer, event_type: 5,
/// #     flags: EventFlags::default(), position: [0.5, 0.25, 0.0],
/// #     orientation: [0.0, 0.0, 0.0, 1.0], extra_data_type: ExtraDataType::Null,
/// #     extra_data_items: 0, extra_data_mask: 0,
/// #     extra_data: Box::new([0u8; EXTRA_DATA_SIZE]),
/// # };
/// let bytes = encode_event_packet(&event);
/// let decoded = decode_event_packet(&bytes[..]).unwrap();
/// assert_eq!(decoded, event);
/// ```
pub fn decode_event_packet(bytes: &[u8]) -> Result<Event, ProtocolError> {
    if bytes.len() < EVENT_PACKET_SIZE {
        return Err(ProtocolError::TruncatedPacket(bytes.len()));
    }

    let timestamp = read_u32(bytes, 0);
    let source_id = read_u32(bytes, 4);
    let service_id = read_u32(bytes, 8) as i32;

    let service_type_raw = read_u32(bytes, 12);
    let service_type = ServiceType::try_from(service_type_raw)
        .map_err(|_| ProtocolError::UnknownServiceType(service_type_raw))?;

    let event_type = read_u32(bytes, 16);
    let flags = EventFlags(read_u32(bytes, 20));

    let position = [read_f32(bytes, 24), read_f32(bytes, 28), read_f32(bytes, 32)];

    // The server writes w before x/y/z.
    let orw = read_f32(bytes, 36);
    let orx = read_f32(bytes, 40);
    let ory = read_f32(bytes, 44);
    let orz = read_f32(bytes, 48);

    let extra_type_raw = read_u32(bytes, 52);
    let extra_data_type = ExtraDataType::try_from(extra_type_raw)
        .map_err(|_| ProtocolError::UnknownExtraDataType(extra_type_raw))?;
    let extra_data_items = read_u32(bytes, 56);
    let extra_data_mask = read_u32(bytes, 60);

    let mut extra_data = Box::new([0u8; EXTRA_DATA_SIZE]);
    extra_data.copy_from_slice(&bytes[EXTRA_DATA_OFFSET..EXTRA_DATA_OFFSET + EXTRA_DATA_SIZE]);

    Ok(Event {
        timestamp,
        source_id,
        service_id,
        service_type,
        event_type,
        flags,
        position,
        orientation: [orx, ory, orz, orw],
        extra_data_type,
        extra_data_items,
        extra_data_mask,
        extra_data,
    })
}

/// Encodes `event` into its fixed 1088-byte wire form.
///
/// The exact inverse of [`decode_event_packet`]. Used by tests, benches,
/// and any in-process server harness; the production client only decodes.
pub fn encode_event_packet(event: &Event) -> Box<[u8; EVENT_PACKET_SIZE]> {
    let mut buf = Box::new([0u8; EVENT_PACKET_SIZE]);

    buf[0..4].copy_from_slice(&event.timestamp.to_le_bytes());
    buf[4..8].copy_from_slice(&event.source_id.to_le_bytes());
    buf[8..12].copy_from_slice(&event.service_id.to_le_bytes());
    buf[12..16].copy_from_slice(&(event.service_type as u32).to_le_bytes());
    buf[16..20].copy_from_slice(&event.event_type.to_le_bytes());
    buf[20..24].copy_from_slice(&event.flags.0.to_le_bytes());

    buf[24..28].copy_from_slice(&event.position[0].to_le_bytes());
    buf[28..32].copy_from_slice(&event.position[1].to_le_bytes());
    buf[32..36].copy_from_slice(&event.position[2].to_le_bytes());

    // w first, then x/y/z.
    buf[36..40].copy_from_slice(&event.orientation[3].to_le_bytes());
    buf[40..44].copy_from_slice(&event.orientation[0].to_le_bytes());
    buf[44..48].copy_from_slice(&event.orientation[1].to_le_bytes());
    buf[48..52].copy_from_slice(&event.orientation[2].to_le_bytes());

    buf[52..56].copy_from_slice(&(event.extra_data_type as u32).to_le_bytes());
    buf[56..60].copy_from_slice(&event.extra_data_items.to_le_bytes());
    buf[60..64].copy_from_slice(&event.extra_data_mask.to_le_bytes());
    buf[EXTRA_DATA_OFFSET..].copy_from_slice(event.extra_data.as_slice());

    buf
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Reads a little-endian u32 at `offset`. Caller guarantees bounds.
fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Reads a little-endian f32 at `offset`. Caller guarantees bounds.
fn read_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
