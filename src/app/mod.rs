//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the bridge: cyclic mode
//! counters, convergence by button pulses, command routing, and the
//! service that ties them together. All interaction with hardware and the
//! broker happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod actuator;
pub mod commands;
pub mod controller;
pub mod events;
pub mod mode;
pub mod ports;
pub mod router;
pub mod service;
