//! Homedic bridge firmware library.
//!
//! Keeps a push-button diffuser fan and mood light in step with a home
//! automation hub over MQTT. Exposes the pure-logic modules for
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod events;
pub mod pins;
pub mod topics;

pub mod adapters;
pub mod drivers;
