//! HTTP surface of the relay

pub mod endpoints;
pub mod error;
