//! Render factory boundary
//!
//! The host render engine sits behind `RenderFactory`; geosync never talks
//! to a scene graph directly. `RecordingFactory` is an in-memory
//! implementation used by tests and the scripted demo.

use std::collections::HashSet;

use geosync_core::{EntityId, ScenePose};

use crate::MeshRef;

/// Material handle owned by the host render engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

impl MaterialId {
    #[inline]
    pub fn new(id: u32) -> Self {
        MaterialId(id)
    }
}

/// Materials available to the reconciler, by geometry category.
#[derive(Debug, Clone)]
pub struct MaterialPalette {
    /// Building materials, cycled round-robin across successive building
    /// entities. Must not be empty.
    pub building: Vec<MaterialId>,
    /// The single terrain material.
    pub terrain: MaterialId,
}

/// Boundary to the host render engine.
pub trait RenderFactory {
    /// Create an entity for `mesh` with `material` at `pose`.
    fn create(&mut self, mesh: MeshRef, material: MaterialId, pose: ScenePose) -> EntityId;
    fn set_pose(&mut self, entity: EntityId, pose: ScenePose);
    fn set_material(&mut self, entity: EntityId, material: MaterialId);
    fn destroy(&mut self, entity: EntityId);
}

/// One recorded factory call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Create {
        entity: EntityId,
        mesh: MeshRef,
        material: MaterialId,
        pose: ScenePose,
    },
    SetPose {
        entity: EntityId,
        pose: ScenePose,
    },
    SetMaterial {
        entity: EntityId,
        material: MaterialId,
    },
    Destroy {
        entity: EntityId,
    },
}

/// In-memory factory recording every call; backs tests and the demo.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    next_id: u64,
    /// Entities created and not yet destroyed.
    pub live: HashSet<EntityId>,
    pub ops: Vec<RenderOp>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        RecordingFactory::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Materials assigned at creation, in creation order.
    pub fn created_materials(&self) -> Vec<MaterialId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Create { material, .. } => Some(*material),
                _ => None,
            })
            .collect()
    }
}

impl RenderFactory for RecordingFactory {
    fn create(&mut self, mesh: MeshRef, material: MaterialId, pose: ScenePose) -> EntityId {
        self.next_id += 1;
        let entity = EntityId::new(self.next_id);
        self.live.insert(entity);
        self.ops.push(RenderOp::Create {
            entity,
            mesh,
            material,
            pose,
        });
        entity
    }

    fn set_pose(&mut self, entity: EntityId, pose: ScenePose) {
        debug_assert!(self.live.contains(&entity));
        self.ops.push(RenderOp::SetPose { entity, pose });
    }

    fn set_material(&mut self, entity: EntityId, material: MaterialId) {
        debug_assert!(self.live.contains(&entity));
        self.ops.push(RenderOp::SetMaterial { entity, material });
    }

    fn destroy(&mut self, entity: EntityId) {
        self.live.remove(&entity);
        self.ops.push(RenderOp::Destroy { entity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_factory_lifecycle() {
        let mut factory = RecordingFactory::new();
        let entity = factory.create(MeshRef::new(1), MaterialId::new(0), ScenePose::default());
        assert_eq!(factory.live_count(), 1);

        factory.destroy(entity);
        assert_eq!(factory.live_count(), 0);
        assert_eq!(factory.ops.len(), 2);
    }
}
