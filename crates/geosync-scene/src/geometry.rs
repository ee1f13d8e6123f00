//! Geometry records and per-tick deltas
//!
//! Records are created, mutated and destroyed by the external geometry
//! provider; this crate only ever reads them. The render entity keyed by
//! the record's trackable identifier is the one thing geosync owns.

use geosync_core::{ScenePose, TrackableId};

/// Category of a streetscape geometry instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryCategory {
    Building,
    Terrain,
}

/// Opaque reference to an externally-owned mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshRef(pub u64);

impl MeshRef {
    #[inline]
    pub fn new(id: u64) -> Self {
        MeshRef(id)
    }
}

/// One geometry record as delivered by the provider.
///
/// The identifier is stable across updates; the mesh and pose may change in
/// place. A record can arrive without a mesh, in which case no entity is
/// created for it.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRecord {
    pub id: TrackableId,
    pub category: GeometryCategory,
    pub mesh: Option<MeshRef>,
    pub pose: ScenePose,
}

impl GeometryRecord {
    pub fn new(id: TrackableId, category: GeometryCategory) -> Self {
        Self {
            id,
            category,
            mesh: None,
            pose: ScenePose::default(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshRef) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_pose(mut self, pose: ScenePose) -> Self {
        self.pose = pose;
        self
    }
}

/// One tick's worth of provider changes.
#[derive(Debug, Clone, Default)]
pub struct GeometryDelta {
    pub added: Vec<GeometryRecord>,
    pub updated: Vec<GeometryRecord>,
    pub removed: Vec<GeometryRecord>,
}

impl GeometryDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Fold another delta into this one, preserving arrival order.
    pub fn merge(&mut self, other: GeometryDelta) {
        self.added.extend(other.added);
        self.updated.extend(other.updated);
        self.removed.extend(other.removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_merge_preserves_order() {
        let mut a = GeometryDelta::default();
        a.added.push(GeometryRecord::new(TrackableId::new(1), GeometryCategory::Building));

        let mut b = GeometryDelta::default();
        b.added.push(GeometryRecord::new(TrackableId::new(2), GeometryCategory::Terrain));

        a.merge(b);
        assert_eq!(a.added.len(), 2);
        assert_eq!(a.added[0].id, TrackableId::new(1));
        assert_eq!(a.added[1].id, TrackableId::new(2));
    }

    #[test]
    fn test_record_builder() {
        let rec = GeometryRecord::new(TrackableId::new(7), GeometryCategory::Building)
            .with_mesh(MeshRef::new(42));
        assert_eq!(rec.mesh, Some(MeshRef::new(42)));
        assert!(GeometryDelta::default().is_empty());
    }
}
