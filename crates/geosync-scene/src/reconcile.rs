//! Geometry reconciliation pipeline
//!
//! Each tick the reconciler consumes one `GeometryDelta` and drives the
//! registry and render factory to match it: Added creates, Updated moves in
//! place, Removed tears down. Added runs before Updated so a record that
//! appears in both within one tick composes (existence first, then pose).

use geosync_core::{GeosyncError, GeosyncResult};
use tracing::{debug, trace};

use crate::{
    EntityRegistry, GeometryCategory, GeometryDelta, GeometryRecord, MaterialId, MaterialPalette,
    RenderFactory,
};

/// Counters for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created: u32,
    pub updated: u32,
    pub removed: u32,
    /// Added records skipped because they carried no mesh.
    pub skipped_no_mesh: u32,
    /// Added records skipped because an entity already existed.
    pub skipped_duplicate: u32,
}

/// Keeps the live render entity set consistent with provider deltas.
pub struct SceneReconciler {
    registry: EntityRegistry,
    palette: MaterialPalette,
    /// Monotonic counter driving round-robin building materials.
    building_cursor: usize,
}

impl SceneReconciler {
    /// Fails once, up front, if the building material list is empty.
    pub fn new(palette: MaterialPalette) -> GeosyncResult<Self> {
        if palette.building.is_empty() {
            return Err(GeosyncError::EmptyMaterialList);
        }
        Ok(Self {
            registry: EntityRegistry::new(),
            palette,
            building_cursor: 0,
        })
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Apply one tick's delta against the registry.
    pub fn reconcile(
        &mut self,
        delta: &GeometryDelta,
        factory: &mut dyn RenderFactory,
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for record in &delta.added {
            self.apply_added(record, factory, &mut outcome);
        }

        for record in &delta.updated {
            // Not created implicitly: an Updated record with no entity
            // (e.g. its Added was skipped for lacking a mesh) is a no-op
            // until a fresh Added delivery arrives for that id.
            if let Some(entity) = self.registry.get(record.id) {
                factory.set_pose(entity, record.pose);
                outcome.updated += 1;
            }
        }

        for record in &delta.removed {
            // Removing an unknown key is a no-op; the eager erase also
            // makes destroy idempotent within the tick.
            if let Some(entity) = self.registry.remove(record.id) {
                factory.destroy(entity);
                outcome.removed += 1;
                trace!(id = %record.id, "destroyed geometry entity");
            }
        }

        if outcome != ReconcileOutcome::default() {
            debug!(?outcome, live = self.registry.len(), "reconciled geometry delta");
        }
        outcome
    }

    fn apply_added(
        &mut self,
        record: &GeometryRecord,
        factory: &mut dyn RenderFactory,
        outcome: &mut ReconcileOutcome,
    ) {
        // Guard against duplicate delivery of the same trackable.
        if self.registry.contains(record.id) {
            outcome.skipped_duplicate += 1;
            return;
        }

        let Some(mesh) = record.mesh else {
            outcome.skipped_no_mesh += 1;
            trace!(id = %record.id, "added record has no mesh, skipping");
            return;
        };

        let material = self.material_for(record.category);
        let entity = factory.create(mesh, material, record.pose);
        self.registry.insert(record.id, entity);
        outcome.created += 1;
    }

    /// Pick the material for a new entity of `category`, advancing the
    /// building round-robin cursor.
    fn material_for(&mut self, category: GeometryCategory) -> MaterialId {
        match category {
            GeometryCategory::Terrain => self.palette.terrain,
            GeometryCategory::Building => {
                let material = self.palette.building[self.building_cursor % self.palette.building.len()];
                self.building_cursor += 1;
                material
            }
        }
    }

    /// Destroy every registered entity and empty the registry. Idempotent.
    pub fn clear_all(&mut self, factory: &mut dyn RenderFactory) -> u32 {
        let mut destroyed = 0;
        for (_, entity) in self.registry.drain() {
            factory.destroy(entity);
            destroyed += 1;
        }
        if destroyed > 0 {
            debug!(destroyed, "cleared all geometry entities");
        }
        destroyed
    }

    /// Manual override: reassign the first building material to every
    /// Updated building record still tracked in the registry.
    pub fn refresh_materials(
        &mut self,
        updated: &[GeometryRecord],
        factory: &mut dyn RenderFactory,
    ) -> u32 {
        let override_material = self.palette.building[0];
        let mut refreshed = 0;
        for record in updated {
            if record.category != GeometryCategory::Building {
                continue;
            }
            if let Some(entity) = self.registry.get(record.id) {
                factory.set_material(entity, override_material);
                refreshed += 1;
            }
        }
        refreshed
    }
}
