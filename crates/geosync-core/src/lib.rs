//! Geosync Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout geosync:
//! - Identifiers (TrackableId, EntityId)
//! - Tick time primitives (Seconds)
//! - Geospatial and scene pose types
//! - External signal enums (session, tracking, earth, feature support)
//! - Error taxonomy and fatal reasons

pub mod error;
pub mod id;
pub mod pose;
pub mod signals;
pub mod time;

pub use error::*;
pub use id::*;
pub use pose::*;
pub use signals::*;
pub use time::*;
