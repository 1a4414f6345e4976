//! Wire-level enumerations and flag sets shared by every event.
//!
//! The ordinal values are fixed by the Omicron input server and must never
//! be reordered: they travel on the wire as little-endian `u32` fields.

use serde::{Deserialize, Serialize};

// ── Service types ─────────────────────────────────────────────────────────────

/// The device/input class an event originates from.
///
/// Each service class generates events with the same packet structure; the
/// service type tells the consumer how to interpret position, orientation,
/// and extra data. A `Pointer` event carries normalized screen coordinates
/// in `position[0..2]`, a `Mocap` event carries a tracked joint pose, and so
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ServiceType {
    Pointer = 0,
    Mocap = 1,
    Keyboard = 2,
    Controller = 3,
    Ui = 4,
    Generic = 5,
    Brain = 6,
    Wand = 7,
    Speech = 8,
}

impl TryFrom<u32> for ServiceType {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ServiceType::Pointer),
            1 => Ok(ServiceType::Mocap),
            2 => Ok(ServiceType::Keyboard),
            3 => Ok(ServiceType::Controller),
            4 => Ok(ServiceType::Ui),
            5 => Ok(ServiceType::Generic),
            6 => Ok(ServiceType::Brain),
            7 => Ok(ServiceType::Wand),
            8 => Ok(ServiceType::Speech),
            _ => Err(()),
        }
    }
}

// ── Event actions ─────────────────────────────────────────────────────────────

/// Semantic action carried in the `event_type` field.
///
/// The raw field on [`crate::Event`] stays a `u32` so that new server-side
/// actions never break decoding on older clients; this enum is the typed
/// view over the ordinals the server emits today. `Trace`/`Untrace` double
/// as connect/disconnect notifications for tracked objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum EventType {
    /// The event source was selected or activated (UI controls).
    Select = 0,
    /// A boolean state in the source changed (switches, checkboxes).
    Toggle = 1,
    /// The source changed its internal value outside a regular update cycle.
    ChangeValue = 2,
    /// Periodic update from the source; sent at a constant rate.
    Update = 3,
    /// The source moved.
    Move = 4,
    /// Logical 'down' state: touch on a surface, button press.
    Down = 5,
    /// Logical 'up' state: touch release, button release.
    Up = 6,
    /// A new object was identified by the device (head tracking, rigid body).
    Trace = 7,
    /// A traced object was lost by the device.
    Untrace = 8,
    /// Down followed by an immediate up.
    Click = 9,
    /// Quick down/up/down/up sequence.
    DoubleClick = 10,
    MoveLeft = 11,
    MoveRight = 12,
    MoveUp = 13,
    MoveDown = 14,
    Zoom = 15,
    SplitStart = 16,
    SplitEnd = 17,
    /// Two-finger split/zoom gesture; value[0] is delta distance, value[1]
    /// delta ratio.
    Split = 18,
    RotateStart = 19,
    RotateEnd = 20,
    /// One source stationary while a second rotates around it; rotation[0]
    /// is degrees.
    Rotate = 21,
    /// Generic null action.
    Null = 22,
}

impl TryFrom<u32> for EventType {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventType::Select),
            1 => Ok(EventType::Toggle),
            2 => Ok(EventType::ChangeValue),
            3 => Ok(EventType::Update),
            4 => Ok(EventType::Move),
            5 => Ok(EventType::Down),
            6 => Ok(EventType::Up),
            7 => Ok(EventType::Trace),
            8 => Ok(EventType::Untrace),
            9 => Ok(EventType::Click),
            10 => Ok(EventType::DoubleClick),
            11 => Ok(EventType::MoveLeft),
            12 => Ok(EventType::MoveRight),
            13 => Ok(EventType::MoveUp),
            14 => Ok(EventType::MoveDown),
            15 => Ok(EventType::Zoom),
            16 => Ok(EventType::SplitStart),
            17 => Ok(EventType::SplitEnd),
            18 => Ok(EventType::Split),
            19 => Ok(EventType::RotateStart),
            20 => Ok(EventType::RotateEnd),
            21 => Ok(EventType::Rotate),
            22 => Ok(EventType::Null),
            _ => Err(()),
        }
    }
}

// ── Event flags ───────────────────────────────────────────────────────────────

/// Button and modifier bitmask carried in the `flags` field.
///
/// Bit layout (from the Omicron event model):
/// - Bit 0: Button1 / Left
/// - Bit 1: Button2 / Right
/// - Bit 2: Button3 / Middle
/// - Bit 3: Ctrl
/// - Bit 4: Alt
/// - Bit 5: Shift
/// - Bits 6–9: Button4–Button7
/// - Bits 10–13: digital pad Up/Down/Left/Right
/// - Bit 14: Processed (internal marker)
/// - Bit 15+: user flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventFlags(pub u32);

impl EventFlags {
    pub const BUTTON1: u32 = 1 << 0;
    pub const BUTTON2: u32 = 1 << 1;
    pub const BUTTON3: u32 = 1 << 2;
    pub const CTRL: u32 = 1 << 3;
    pub const ALT: u32 = 1 << 4;
    pub const SHIFT: u32 = 1 << 5;
    pub const BUTTON4: u32 = 1 << 6;
    pub const BUTTON5: u32 = 1 << 7;
    pub const BUTTON6: u32 = 1 << 8;
    pub const BUTTON7: u32 = 1 << 9;
    pub const BUTTON_UP: u32 = 1 << 10;
    pub const BUTTON_DOWN: u32 = 1 << 11;
    pub const BUTTON_LEFT: u32 = 1 << 12;
    pub const BUTTON_RIGHT: u32 = 1 << 13;
    pub const PROCESSED: u32 = 1 << 14;
    /// User flags offset this value; 16 user bits are available.
    pub const USER: u32 = 1 << 15;

    /// Returns `true` if every bit in `mask` is set.
    pub fn is_set(&self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Returns `true` if the main (left) button bit is set.
    pub fn button1(&self) -> bool {
        self.is_set(Self::BUTTON1)
    }

    /// Returns `true` if the secondary (right) button bit is set.
    pub fn button2(&self) -> bool {
        self.is_set(Self::BUTTON2)
    }

    /// Returns `true` if any of the Ctrl/Alt/Shift modifier bits are set.
    pub fn any_modifier(&self) -> bool {
        self.0 & (Self::CTRL | Self::ALT | Self::SHIFT) != 0
    }
}

// ── Extra data types ──────────────────────────────────────────────────────────

/// Declared interpretation of an event's trailing extra-data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ExtraDataType {
    /// No extra data attached.
    Null = 0,
    /// Packed little-endian `f32` values.
    FloatArray = 1,
    /// Packed little-endian `i32` values.
    IntArray = 2,
    /// Packed triples of little-endian `f32` (12 bytes per item).
    Vector3Array = 3,
    /// Latin-1 byte string; item count is a byte count.
    String = 4,
}

impl TryFrom<u32> for ExtraDataType {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExtraDataType::Null),
            1 => Ok(ExtraDataType::FloatArray),
            2 => Ok(ExtraDataType::IntArray),
            3 => Ok(ExtraDataType::Vector3Array),
            4 => Ok(ExtraDataType::String),
            _ => Err(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_ordinals_match_wire_values() {
        // The server encodes these as u32 ordinals; they are frozen.
        assert_eq!(ServiceType::Pointer as u32, 0);
        assert_eq!(ServiceType::Mocap as u32, 1);
        assert_eq!(ServiceType::Brain as u32, 6);
        assert_eq!(ServiceType::Speech as u32, 8);
    }

    #[test]
    fn test_service_type_try_from_round_trips_all_variants() {
        for ordinal in 0..=8u32 {
            let st = ServiceType::try_from(ordinal).expect("known ordinal");
            assert_eq!(st as u32, ordinal);
        }
    }

    #[test]
    fn test_service_type_try_from_rejects_unknown_ordinal() {
        assert!(ServiceType::try_from(9).is_err());
        assert!(ServiceType::try_from(u32::MAX).is_err());
    }

    #[test]
    fn test_event_type_down_and_up_ordinals() {
        // Touch gesture consumers depend on these exact values.
        assert_eq!(EventType::Down as u32, 5);
        assert_eq!(EventType::Move as u32, 4);
        assert_eq!(EventType::Up as u32, 6);
    }

    #[test]
    fn test_event_type_try_from_rejects_unknown_ordinal() {
        assert!(EventType::try_from(23).is_err());
    }

    #[test]
    fn test_extra_data_type_try_from_round_trips_all_variants() {
        for ordinal in 0..=4u32 {
            let dt = ExtraDataType::try_from(ordinal).expect("known ordinal");
            assert_eq!(dt as u32, ordinal);
        }
        assert!(ExtraDataType::try_from(5).is_err());
    }

    #[test]
    fn test_event_flags_is_set_requires_all_bits() {
        let flags = EventFlags(EventFlags::BUTTON1 | EventFlags::CTRL);
        assert!(flags.is_set(EventFlags::BUTTON1));
        assert!(flags.is_set(EventFlags::BUTTON1 | EventFlags::CTRL));
        assert!(!flags.is_set(EventFlags::BUTTON1 | EventFlags::SHIFT));
    }

    #[test]
    fn test_event_flags_modifier_predicates() {
        assert!(EventFlags(EventFlags::ALT).any_modifier());
        assert!(!EventFlags(EventFlags::BUTTON4).any_modifier());
        assert!(EventFlags(EventFlags::BUTTON2).button2());
    }

    #[test]
    fn test_event_flags_default_is_empty() {
        let flags = EventFlags::default();
        assert_eq!(flags.0, 0);
        assert!(!flags.button1());
    }
}
