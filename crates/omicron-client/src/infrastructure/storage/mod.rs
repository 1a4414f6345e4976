//! Configuration persistence.

pub mod config;
