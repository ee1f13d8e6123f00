//! Geosync Localize - Localization state machine
//!
//! This crate implements the per-tick localization lifecycle:
//! - Feature support negotiation and geospatial mode enablement
//! - Earth readiness and pose accuracy evaluation
//! - Phase transitions with timer resets and visibility directives
//! - Idempotent fatal handling with a single reason-setting path

pub mod machine;
pub mod signals;

pub use machine::*;
pub use signals::*;
