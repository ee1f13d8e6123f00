//! Identity types for geosync
//!
//! All identifiers are 64-bit. Trackable identifiers are assigned by the
//! geometry provider and are stable for the lifetime of one physical
//! geometry instance; entity identifiers name live render entities.

use std::fmt;

/// Trackable identity - stable opaque key for one physical geometry
/// instance across its add/update/remove lifecycle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TrackableId(pub u64);

impl TrackableId {
    pub const ZERO: TrackableId = TrackableId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        TrackableId(id)
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        TrackableId(u64::from_le_bytes(bytes))
    }
}

impl fmt::Debug for TrackableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trackable({:016x})", self.0)
    }
}

impl fmt::Display for TrackableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Render entity identity - handle to a live entity in the host scene.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EntityId(pub u64);

impl EntityId {
    pub const ZERO: EntityId = EntityId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({:016x})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackable_id_roundtrip() {
        let id = TrackableId::new(0xDEADBEEF_CAFEBABE);
        let bytes = id.to_bytes();
        let recovered = TrackableId::from_bytes(bytes);
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_id_debug_format() {
        let id = TrackableId::new(0xFF);
        assert_eq!(format!("{:?}", id), "Trackable(00000000000000ff)");
    }
}
