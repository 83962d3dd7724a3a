//! Background Tasks Module
//!
//! Contains background tasks that run alongside the caches.
//!
//! # Tasks
//! - Pressure Monitor: Polls a probe and signals memory pressure when it fires

mod monitor;

pub use monitor::spawn_pressure_monitor;
