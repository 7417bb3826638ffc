//! Test utilities
//!
//! In-memory port implementations and fixtures for the schedule, show
//! database, podcasts, charts and website services. Upstream HTTP clients
//! are mocked with canned responses.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
