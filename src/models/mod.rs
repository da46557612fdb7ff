//! API data models
//!
//! This module contains the relay's own JSON bodies and the Gemini wire format.

pub mod gemini;
pub mod relay;
