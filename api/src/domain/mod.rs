//! Domain layer
//!
//! Shows, timeslots, metadata, podcasts and charts as plain Rust types, plus
//! the port traits through which the services reach storage and upstream
//! HTTP services.

pub mod entities;
pub mod ports;
