//! Protocol module containing the handshake and the event-packet codec.

pub mod codec;
pub mod handshake;

pub use codec::{decode_event_packet, encode_event_packet, ProtocolError, EVENT_PACKET_SIZE};
pub use handshake::{
    encode_handshake, parse_handshake, HandshakeError, ProtocolVariant, CONTROL_PORT_DEFAULT,
    DATA_PORT_DEFAULT,
};
