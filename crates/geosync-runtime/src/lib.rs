//! Geosync Runtime - Per-tick orchestration
//!
//! This crate couples the two engines into one cooperative tick loop:
//! 1. Sample collaborator signals (session, earth, location, support)
//! 2. Evaluate the localization machine
//! 3. Act on its directives (mode enablement, visibility, fatal sequence)
//! 4. If localized and visualization is on, consume the geometry delta
//!    and reconcile render entities
//!
//! The only suspension point is the background location-service startup
//! task; everything else runs to completion on the tick thread.

pub mod config;
pub mod controller;
pub mod providers;

pub use config::*;
pub use controller::*;
pub use providers::*;
