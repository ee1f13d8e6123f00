//! Geospatial controller - the per-tick driver
//!
//! Owns the localization machine, the scene reconciler and the collaborator
//! boundaries. Each tick the machine is evaluated first; only when it
//! reports `Localized` (and visualization is on, and not suspended) does
//! the reconciler consume the pending geometry delta. The geometry
//! subscription is registered exactly once, on first activation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use geosync_core::{
    EarthTrackingState, FatalReason, GeosyncResult, GeospatialMode, LocationServiceStatus, Seconds,
};
use geosync_localize::{LocalizationMachine, LocalizationPhase, TickSignals};
use geosync_scene::{GeometryRecord, MaterialPalette, RenderFactory, SceneReconciler};

use crate::{
    GeometryProvider, LocationService, RuntimeConfig, RuntimeStats, SharedDeltaBuffer, TextSink,
    ToggleControl, TrackingProvider,
};

/// Couples localization gating with geometry reconciliation.
pub struct GeospatialController {
    config: RuntimeConfig,
    machine: LocalizationMachine,
    reconciler: SceneReconciler,

    tracking: Box<dyn TrackingProvider>,
    geometry: Box<dyn GeometryProvider>,
    location: Arc<dyn LocationService>,
    factory: Box<dyn RenderFactory>,

    status_sink: Option<Box<dyn TextSink>>,
    help_sink: Option<Box<dyn TextSink>>,
    debug_sink: Option<Box<dyn TextSink>>,
    toggle: Option<Box<dyn ToggleControl>>,

    /// User's visualization toggle, re-asserted when localization completes.
    visualization_enabled: bool,
    /// Machine-driven suspension, independent of the user toggle.
    visibility_suspended: bool,
    /// Consumed once to trigger a full teardown, then reset.
    pending_clear: bool,

    /// Geometry subscription, registered at most once.
    delta_buffer: Option<SharedDeltaBuffer>,
    /// Updated records from the most recently consumed delta, kept for the
    /// manual material refresh path.
    last_updated: Vec<GeometryRecord>,

    /// Cleared by the background startup task once the location service
    /// has settled; until then a `Running` report is not trusted.
    startup_settled: Arc<AtomicBool>,
    startup_task: Option<JoinHandle<()>>,

    exit_requested: Arc<AtomicBool>,
    exit_scheduled: bool,

    stats: RuntimeStats,
}

impl GeospatialController {
    pub fn new(
        tracking: Box<dyn TrackingProvider>,
        geometry: Box<dyn GeometryProvider>,
        location: Arc<dyn LocationService>,
        factory: Box<dyn RenderFactory>,
        palette: MaterialPalette,
        config: RuntimeConfig,
    ) -> GeosyncResult<Self> {
        let reconciler = SceneReconciler::new(palette)?;
        Ok(Self {
            machine: LocalizationMachine::new(config.localize.clone()),
            reconciler,
            config,
            tracking,
            geometry,
            location,
            factory,
            status_sink: None,
            help_sink: None,
            debug_sink: None,
            toggle: None,
            visualization_enabled: true,
            visibility_suspended: false,
            pending_clear: false,
            delta_buffer: None,
            last_updated: Vec::new(),
            startup_settled: Arc::new(AtomicBool::new(false)),
            startup_task: None,
            exit_requested: Arc::new(AtomicBool::new(false)),
            exit_scheduled: false,
            stats: RuntimeStats::default(),
        })
    }

    pub fn with_status_sink(mut self, sink: Box<dyn TextSink>) -> Self {
        self.status_sink = Some(sink);
        self
    }

    pub fn with_help_sink(mut self, sink: Box<dyn TextSink>) -> Self {
        self.help_sink = Some(sink);
        self
    }

    pub fn with_debug_sink(mut self, sink: Box<dyn TextSink>) -> Self {
        self.debug_sink = Some(sink);
        self
    }

    pub fn with_toggle(mut self, toggle: Box<dyn ToggleControl>) -> Self {
        self.toggle = Some(toggle);
        self
    }

    pub fn phase(&self) -> LocalizationPhase {
        self.machine.phase()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn live_entities(&self) -> usize {
        self.reconciler.registry().len()
    }

    /// Whether the deferred application exit has fired.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::SeqCst)
    }

    /// Whether the background startup settled and the service is running.
    pub fn location_ready(&self) -> bool {
        self.startup_settled.load(Ordering::SeqCst)
            && self.location.status() == LocationServiceStatus::Running
    }

    /// Start the background location startup task. The tick loop will not
    /// trust a `Running` status until this task settles.
    pub fn enable(&mut self) {
        if self.startup_task.is_some() {
            return;
        }
        let service = Arc::clone(&self.location);
        let settled = Arc::clone(&self.startup_settled);
        let poll = self.config.location_poll_interval;
        self.startup_task = Some(tokio::spawn(async move {
            service.start();
            // Yield until permission grant and startup settle.
            while service.status() == LocationServiceStatus::Initializing {
                tokio::time::sleep(poll).await;
            }
            info!(status = ?service.status(), "location service settled");
            settled.store(true, Ordering::SeqCst);
        }));
    }

    /// Cancel the startup task (if still running) and release the service.
    pub fn disable(&mut self) {
        if let Some(task) = self.startup_task.take() {
            task.abort();
        }
        self.location.stop();
        self.startup_settled.store(false, Ordering::SeqCst);
    }

    /// User toggle change event. Turning visualization off requests a full
    /// teardown on the next tick.
    pub fn set_visualization_enabled(&mut self, enabled: bool) {
        if self.visualization_enabled && !enabled {
            self.pending_clear = true;
        }
        self.visualization_enabled = enabled;
        if let Some(toggle) = &mut self.toggle {
            toggle.set_checked(enabled);
        }
    }

    /// Manual override: force the first building material onto every
    /// entity from the last consumed Updated list.
    pub fn update_materials(&mut self) -> u32 {
        self.reconciler
            .refresh_materials(&self.last_updated, self.factory.as_mut())
    }

    /// Run one tick: evaluate localization, act on directives, reconcile.
    pub fn tick(&mut self, dt: Seconds) {
        self.stats.ticks += 1;

        let signals = self.sample_signals(dt);
        let eval = self.machine.evaluate(&signals);

        if eval.request_enable_mode {
            self.tracking.request_geospatial_mode(GeospatialMode::Enabled);
        }

        if eval.suspend_visibility {
            self.visibility_suspended = true;
            if let Some(toggle) = &mut self.toggle {
                toggle.set_interactable(false);
            }
        }
        if eval.restore_visibility {
            self.visibility_suspended = false;
            if let Some(toggle) = &mut self.toggle {
                toggle.set_interactable(true);
                toggle.set_checked(self.visualization_enabled);
            }
        }

        if let Some(sink) = &mut self.status_sink {
            sink.set_text(&eval.status);
        }
        if let Some(sink) = &mut self.help_sink {
            match eval.phase {
                LocalizationPhase::Localizing => {
                    sink.set_text("Point the camera at nearby buildings and try to stay still.")
                }
                _ => sink.set_text(""),
            }
        }

        if let Some(reason) = eval.fatal {
            self.run_fatal_sequence(reason);
            return;
        }

        if self.pending_clear {
            let destroyed = self.reconciler.clear_all(self.factory.as_mut());
            self.stats.entities_destroyed += destroyed as u64;
            self.stats.clears += 1;
            self.pending_clear = false;
            self.last_updated.clear();
        }

        if eval.phase == LocalizationPhase::Localized
            && self.visualization_enabled
            && !self.visibility_suspended
        {
            self.drive_reconciler();
        }

        if let Some(sink) = &mut self.debug_sink {
            sink.set_text(&format!(
                "phase: {:?} | live entities: {}",
                eval.phase,
                self.reconciler.registry().len()
            ));
        }
    }

    /// Sample every collaborator signal once, at the top of the tick.
    fn sample_signals(&self, dt: Seconds) -> TickSignals {
        // Defensive read: the service can fail asynchronously, and a
        // Running report before the startup task settles is not trusted.
        let mut location_status = self.location.status();
        if location_status == LocationServiceStatus::Running
            && !self.startup_settled.load(Ordering::SeqCst)
        {
            location_status = LocationServiceStatus::Initializing;
        }

        let earth_tracking = self.tracking.earth_tracking();
        let pose = if earth_tracking == EarthTrackingState::Tracking {
            self.tracking.pose()
        } else {
            None
        };

        TickSignals {
            dt,
            session_state: self.tracking.session_state(),
            collaborators_present: self.tracking.collaborators_present(),
            feature_support: self.tracking.feature_support(GeospatialMode::Enabled),
            geospatial_mode: self.tracking.geospatial_mode(),
            location_status,
            earth_state: self.tracking.earth_state(),
            earth_tracking,
            pose,
        }
    }

    /// Consume the pending delta and reconcile render entities against it.
    fn drive_reconciler(&mut self) {
        let buffer = match &self.delta_buffer {
            Some(buffer) => Arc::clone(buffer),
            None => {
                // First activation: register the change listener exactly
                // once, then reuse the buffer for the rest of the run.
                let buffer = self.geometry.subscribe();
                self.delta_buffer = Some(Arc::clone(&buffer));
                buffer
            }
        };

        let delta = std::mem::take(&mut *buffer.lock());
        if delta.is_empty() {
            return;
        }

        self.stats.deltas_consumed += 1;
        let outcome = self.reconciler.reconcile(&delta, self.factory.as_mut());
        self.stats.entities_created += outcome.created as u64;
        self.stats.entities_updated += outcome.updated as u64;
        self.stats.entities_destroyed += outcome.removed as u64;
        self.last_updated = delta.updated;

        debug!(?outcome, "tick reconciled");
    }

    /// The user-visible fatal sequence: disable geometry, log, leave the
    /// reason on screen, schedule the exit. Runs at most once.
    fn run_fatal_sequence(&mut self, reason: FatalReason) {
        if self.exit_scheduled {
            return;
        }
        error!(?reason, "geospatial run fatally suspended");

        let destroyed = self.reconciler.clear_all(self.factory.as_mut());
        self.stats.entities_destroyed += destroyed as u64;
        self.stats.clears += 1;
        self.visibility_suspended = true;
        self.last_updated.clear();

        if let Some(toggle) = &mut self.toggle {
            toggle.set_interactable(false);
            toggle.set_checked(false);
        }

        // Status sink already carries the reason text from the evaluation;
        // what remains is the deferred exit, not cancellable once scheduled.
        self.exit_scheduled = true;
        let flag = Arc::clone(&self.exit_requested);
        let delay = Duration::from_secs_f64(self.config.exit_display_delay.as_f64());
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
        });
    }
}
