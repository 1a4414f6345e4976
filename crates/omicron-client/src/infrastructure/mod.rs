//! Infrastructure layer: network transport and configuration storage.

pub mod network;
pub mod storage;
