//! The control-channel handshake message.
//!
//! After opening the TCP control connection the client sends one ASCII
//! message, `"<keyword>,<dataPort>"`, telling the server which protocol
//! variant it speaks and which local UDP port it has bound for the event
//! stream. There is no length prefix and no terminator; the single write is
//! the frame. The server never replies on the control channel in the steady
//! state.

use thiserror::Error;

/// Default UDP port the client binds for the event stream.
pub const DATA_PORT_DEFAULT: u16 = 7000;

/// Default TCP port of the server's control channel.
pub const CONTROL_PORT_DEFAULT: u16 = 27000;

/// Protocol variant announced in the handshake keyword.
///
/// The input server picks the outbound packet format per client based on
/// this keyword; only [`ProtocolVariant::Omicron`] selects the binary event
/// packet this crate decodes. The other keywords are retained so a caller
/// can talk to servers that still serve legacy text streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolVariant {
    /// Binary 1088-byte event packets.
    #[default]
    Omicron,
    /// Legacy omicron text stream.
    OmicronLegacy,
    /// TacTile touch-frame text stream.
    #[serde(rename = "tactile")]
    TacTile,
    /// Pre-omicron handshake accepted by old servers.
    Plain,
}

impl ProtocolVariant {
    /// The keyword literal sent on the wire for this variant.
    pub fn keyword(&self) -> &'static str {
        match self {
            ProtocolVariant::Omicron => "omicron_data_on",
            ProtocolVariant::OmicronLegacy => "omicron_legacy_data_on",
            ProtocolVariant::TacTile => "tactile_data_on",
            ProtocolVariant::Plain => "data_on",
        }
    }
}

/// Errors from parsing an inbound handshake (server side / test harness).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    /// The message is not valid ASCII text.
    #[error("handshake is not ASCII text")]
    NotAscii,

    /// The message has no `","` separating keyword and port.
    #[error("handshake missing ',' separator: {0:?}")]
    MissingSeparator(String),

    /// The keyword is not one of the known protocol variants.
    #[error("unknown handshake keyword: {0:?}")]
    UnknownKeyword(String),

    /// The port field is not a decimal u16.
    #[error("invalid data port: {0:?}")]
    InvalidPort(String),
}

/// Encodes the handshake message for `variant` and `data_port`.
///
/// # Examples
///
/// ```rust
/// use omicron_core::protocol::handshake::{encode_handshake, ProtocolVariant};
///
/// let bytes = encode_handshake(ProtocolVariant::Omicron, 7000);
/// assert_eq!(bytes, b"omicron_data_on,7000");
/// ```
pub fn encode_handshake(variant: ProtocolVariant, data_port: u16) -> Vec<u8> {
    format!("{},{}", variant.keyword(), data_port).into_bytes()
}

/// Parses a handshake message into its variant and data port.
///
/// This is the server's half of the exchange; the client only encodes. It
/// lives here so integration harnesses can validate exactly what a real
/// server would accept.
///
/// # Errors
///
/// Returns [`HandshakeError`] when the message is not ASCII, lacks the
/// separator, names an unknown keyword, or carries a non-numeric port.
pub fn parse_handshake(bytes: &[u8]) -> Result<(ProtocolVariant, u16), HandshakeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| HandshakeError::NotAscii)?;
    if !text.is_ascii() {
        return Err(HandshakeError::NotAscii);
    }

    let (keyword, port_text) = text
        .split_once(',')
        .ok_or_else(|| HandshakeError::MissingSeparator(text.to_string()))?;

    let variant = match keyword {
        "omicron_data_on" => ProtocolVariant::Omicron,
        "omicron_legacy_data_on" => ProtocolVariant::OmicronLegacy,
        "tactile_data_on" => ProtocolVariant::TacTile,
        "data_on" => ProtocolVariant::Plain,
        other => return Err(HandshakeError::UnknownKeyword(other.to_string())),
    };

    let port = port_text
        .parse::<u16>()
        .map_err(|_| HandshakeError::InvalidPort(port_text.to_string()))?;

    Ok((variant, port))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
