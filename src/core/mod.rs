//! Core application modules
//!
//! This module contains configuration, constants, logging, the topic
//! catalogue, and the provider layer.

pub mod config;
pub mod constants;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod topics;
