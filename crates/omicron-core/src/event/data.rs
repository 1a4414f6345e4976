//! The decoded event record and its typed extra-data accessors.
//!
//! An [`Event`] is produced exclusively by
//! [`crate::protocol::codec::decode_event_packet`] and is immutable after
//! construction: it moves through the [`crate::EventQueue`] to a consumer
//! and is discarded after dispatch. Consumers never parse raw payload bytes
//! themselves; they go through the `extra_data_*` accessors, which validate
//! the declared payload type and bounds before every read.

use serde::{Deserialize, Serialize};

use super::types::{EventFlags, EventType, ExtraDataType, ServiceType};

/// Fixed capacity of the trailing extra-data payload in bytes.
///
/// Every event packet carries the full buffer on the wire regardless of how
/// much of it is meaningful; `extra_data_items` declares the used portion.
pub const EXTRA_DATA_SIZE: usize = 1024;

/// One decoded unit of input telemetry from the Omicron server.
///
/// Field semantics depend on [`Event::service_type`]: for `Pointer` events
/// `position[0]`/`position[1]` are normalized screen coordinates and
/// `event_type` is a touch gesture ordinal (see
/// [`EventType`](crate::event::types::EventType)); for `Mocap` the position
/// and orientation describe a tracked joint; `Brain`, `Wand`, and `Speech`
/// events carry their readings in the extra-data payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Server clock at event generation, in milliseconds.
    pub timestamp: u32,
    /// Device, skeleton, or controller identity within the service.
    pub source_id: u32,
    /// Identifier of the service instance that produced the event.
    pub service_id: i32,
    /// Input class of the originating service.
    pub service_type: ServiceType,
    /// Semantic action ordinal; see [`EventType`] for the typed view.
    pub event_type: u32,
    /// Button/modifier bitmask.
    pub flags: EventFlags,
    /// Position x, y, z.
    pub position: [f32; 3],
    /// Orientation quaternion x, y, z, w.
    pub orientation: [f32; 4],
    /// Declared interpretation of `extra_data`.
    pub extra_data_type: ExtraDataType,
    /// Number of items (or bytes, for `String`) used in `extra_data`.
    pub extra_data_items: u32,
    /// Service-specific validity bitmask over the extra-data items.
    pub extra_data_mask: u32,
    /// Raw payload buffer; bytes beyond the declared size are undefined.
    #[serde(with = "serde_bytes_array")]
    pub extra_data: Box<[u8; EXTRA_DATA_SIZE]>,
}

/// Serde helper for the fixed 1024-byte payload array.
///
/// Serializes as a plain byte sequence; rejects any length other than
/// [`EXTRA_DATA_SIZE`] on deserialization.
mod serde_bytes_array {
    use super::EXTRA_DATA_SIZE;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &[u8; EXTRA_DATA_SIZE],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes.as_slice())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Box<[u8; EXTRA_DATA_SIZE]>, D::Error> {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        let len = bytes.len();
        bytes
            .into_boxed_slice()
            .try_into()
            .map_err(|_| D::Error::custom(format!("expected {EXTRA_DATA_SIZE} bytes, got {len}")))
    }
}

impl Event {
    /// Returns the typed view of the raw `event_type` ordinal, or `None`
    /// for actions this client does not know about.
    pub fn action(&self) -> Option<EventType> {
        EventType::try_from(self.event_type).ok()
    }

    /// Returns float array element `index`.
    ///
    /// `None` when the declared extra-data type is not `FloatArray`, or the
    /// index is at or beyond `extra_data_items`, or the 4-byte read would
    /// fall outside the payload buffer.
    pub fn extra_data_float(&self, index: usize) -> Option<f32> {
        if self.extra_data_type != ExtraDataType::FloatArray {
            return None;
        }
        if index >= self.extra_data_items as usize {
            return None;
        }
        let offset = index.checked_mul(4)?;
        let bytes = self.extra_data.get(offset..offset + 4)?;
        Some(f32::from_le_bytes(bytes.try_into().ok()?))
    }

    /// Returns int array element `index`; same bounds rules as
    /// [`Event::extra_data_float`].
    pub fn extra_data_int(&self, index: usize) -> Option<i32> {
        if self.extra_data_type != ExtraDataType::IntArray {
            return None;
        }
        if index >= self.extra_data_items as usize {
            return None;
        }
        let offset = index.checked_mul(4)?;
        let bytes = self.extra_data.get(offset..offset + 4)?;
        Some(i32::from_le_bytes(bytes.try_into().ok()?))
    }

    /// Returns 3-vector element `index` as `[x, y, z]`.
    ///
    /// Each item occupies 12 consecutive payload bytes (three `f32`).
    pub fn extra_data_vector3(&self, index: usize) -> Option<[f32; 3]> {
        if self.extra_data_type != ExtraDataType::Vector3Array {
            return None;
        }
        if index >= self.extra_data_items as usize {
            return None;
        }
        let offset = index.checked_mul(12)?;
        let bytes = self.extra_data.get(offset..offset + 12)?;
        Some([
            f32::from_le_bytes(bytes[0..4].try_into().ok()?),
            f32::from_le_bytes(bytes[4..8].try_into().ok()?),
            f32::from_le_bytes(bytes[8..12].try_into().ok()?),
        ])
    }

    /// Returns the string payload decoded from its 8-bit wire encoding.
    ///
    /// `extra_data_items` is a byte count measured in a two-byte-character
    /// encoding on the sending side, so the effective character count is
    /// `extra_data_items / 2`, and the final character is always dropped as
    /// a terminator artifact of that encoding. This truncation matches the
    /// reference client byte-for-byte and is kept for wire compatibility;
    /// it is a suspected upstream bug (it would eat a legitimate final
    /// character) and must be verified against the server before changing.
    pub fn extra_data_string(&self) -> Option<String> {
        if self.extra_data_type != ExtraDataType::String {
            return None;
        }
        let byte_count = (self.extra_data_items as usize).min(EXTRA_DATA_SIZE);
        let keep = (self.extra_data_items as usize / 2).saturating_sub(1);
        // Latin-1: each payload byte maps directly to the code point.
        let decoded: String = self.extra_data[..byte_count]
            .iter()
            .map(|&b| b as char)
            .take(keep)
            .collect();
        Some(decoded)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
