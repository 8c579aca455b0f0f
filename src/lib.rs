//! # Solar Bridge Library
//!
//! Poll and decode telemetry from serial solar charge controllers.
//!
//! This library provides the core functionality for reading the data and info
//! register blocks of a charge controller over a serial register protocol and
//! decoding them into live-measurement and identity snapshots.

pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod serial;
