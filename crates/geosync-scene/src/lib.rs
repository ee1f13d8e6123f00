//! Geosync Scene - Geometry reconciliation engine
//!
//! This crate keeps a managed collection of render entities consistent with
//! the added/updated/removed geometry deltas pushed by an external provider:
//! - Identifier-keyed render entity registry
//! - Create / update-in-place / teardown reconciliation passes
//! - Category materials with round-robin variation for buildings
//! - Full clear and manual material refresh paths

pub mod geometry;
pub mod reconcile;
pub mod registry;
pub mod render;

pub use geometry::*;
pub use reconcile::*;
pub use registry::*;
pub use render::*;
