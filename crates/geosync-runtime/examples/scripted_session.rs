//! Scripted Session Example
//!
//! Walks a simulated device from boot through feature negotiation,
//! localization and streetscape geometry sync, printing the phase and
//! entity counts at each step.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use geosync_core::{
    EarthState, EarthTrackingState, FeatureSupport, GeoPose, GeospatialMode,
    LocationServiceStatus, Seconds, SessionState, TrackableId,
};
use geosync_runtime::{
    GeometryProvider, GeospatialController, LocationService, RuntimeConfig, SharedDeltaBuffer,
    TextSink, TrackingProvider,
};
use geosync_core::{Position3, ScenePose};
use geosync_scene::{
    GeometryCategory, GeometryDelta, GeometryRecord, MaterialId, MaterialPalette, MeshRef,
    RecordingFactory, RenderFactory,
};

/// Simulated AR session whose signals the script mutates between ticks.
struct SimTrackingState {
    session_state: SessionState,
    earth_state: EarthState,
    earth_tracking: EarthTrackingState,
    pose: Option<GeoPose>,
    feature_support: FeatureSupport,
    mode: GeospatialMode,
}

impl Default for SimTrackingState {
    fn default() -> Self {
        Self {
            session_state: SessionState::Tracking,
            earth_state: EarthState::NotReady,
            earth_tracking: EarthTrackingState::NotTracking,
            pose: None,
            feature_support: FeatureSupport::Unknown,
            mode: GeospatialMode::Enabled,
        }
    }
}

#[derive(Clone, Default)]
struct SimTracking(Arc<Mutex<SimTrackingState>>);

impl TrackingProvider for SimTracking {
    fn session_state(&self) -> SessionState {
        self.0.lock().session_state
    }
    fn earth_state(&self) -> EarthState {
        self.0.lock().earth_state
    }
    fn earth_tracking(&self) -> EarthTrackingState {
        self.0.lock().earth_tracking
    }
    fn pose(&self) -> Option<GeoPose> {
        self.0.lock().pose
    }
    fn feature_support(&self, _mode: GeospatialMode) -> FeatureSupport {
        self.0.lock().feature_support
    }
    fn geospatial_mode(&self) -> GeospatialMode {
        self.0.lock().mode
    }
    fn request_geospatial_mode(&mut self, mode: GeospatialMode) {
        println!("   [session] geospatial mode requested: {mode:?}");
        self.0.lock().mode = mode;
    }
}

#[derive(Clone)]
struct SimGeometry(SharedDeltaBuffer);

impl GeometryProvider for SimGeometry {
    fn subscribe(&mut self) -> SharedDeltaBuffer {
        println!("   [geometry] change listener registered");
        Arc::clone(&self.0)
    }
}

/// Location service that settles after a couple of polls.
struct SimLocation(AtomicU8);

impl LocationService for SimLocation {
    fn enabled_by_user(&self) -> bool {
        true
    }
    fn status(&self) -> LocationServiceStatus {
        match self.0.load(Ordering::SeqCst) {
            0 => LocationServiceStatus::Stopped,
            1 => LocationServiceStatus::Initializing,
            _ => LocationServiceStatus::Running,
        }
    }
    fn start(&self) {
        self.0.store(1, Ordering::SeqCst);
        // Pretend startup completes immediately after one poll.
        self.0.store(2, Ordering::SeqCst);
    }
    fn stop(&self) {
        self.0.store(0, Ordering::SeqCst);
    }
}

struct PrintSink(&'static str);

impl TextSink for PrintSink {
    fn set_text(&mut self, text: &str) {
        if !text.is_empty() {
            println!("   [{}] {text}", self.0);
        }
    }
}

fn building(id: u64, x: f32) -> GeometryRecord {
    GeometryRecord::new(TrackableId::new(id), GeometryCategory::Building)
        .with_mesh(MeshRef::new(id))
        .with_pose(ScenePose {
            position: Position3::new(x, 0.0, 0.0),
            ..Default::default()
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Geosync Scripted Session ===\n");

    let tracking = SimTracking::default();
    let buffer: SharedDeltaBuffer = Arc::new(Mutex::new(GeometryDelta::default()));
    let location = Arc::new(SimLocation(AtomicU8::new(0)));
    let factory = RecordingFactory::new();

    let mut controller = GeospatialController::new(
        Box::new(tracking.clone()),
        Box::new(SimGeometry(Arc::clone(&buffer))),
        Arc::clone(&location) as Arc<dyn LocationService>,
        Box::new(factory) as Box<dyn RenderFactory>,
        MaterialPalette {
            building: vec![MaterialId::new(0), MaterialId::new(1), MaterialId::new(2)],
            terrain: MaterialId::new(10),
        },
        RuntimeConfig::default(),
    )
    .expect("material palette is valid")
    .with_status_sink(Box::new(PrintSink("status")))
    .with_help_sink(Box::new(PrintSink("help")));

    println!("1. Starting location service...");
    controller.enable();
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    println!("   location ready: {}\n", controller.location_ready());

    println!("2. Boot: feature support still unknown");
    controller.tick(Seconds::new(1.0));
    println!("   phase: {:?}\n", controller.phase());

    println!("3. Support resolves; geospatial mode gets enabled");
    {
        let mut state = tracking.0.lock();
        state.feature_support = FeatureSupport::Supported;
        state.mode = GeospatialMode::Disabled;
    }
    controller.tick(Seconds::new(1.0));
    for _ in 0..3 {
        controller.tick(Seconds::new(1.0)); // cooldown
    }
    println!("   phase: {:?}\n", controller.phase());

    println!("4. Earth enabled, accuracy still poor: localizing");
    {
        let mut state = tracking.0.lock();
        state.earth_state = EarthState::Enabled;
        state.earth_tracking = EarthTrackingState::Tracking;
        state.pose = Some(GeoPose::new(59.3326, 18.0649, 28.0).with_accuracy(45.0, 20.0, 40.0));
    }
    controller.tick(Seconds::new(1.0));
    println!("   phase: {:?}\n", controller.phase());

    println!("5. Accuracy converges: localized, geometry flows");
    tracking.0.lock().pose =
        Some(GeoPose::new(59.3326, 18.0649, 28.0).with_accuracy(8.0, 4.0, 12.0));
    {
        let mut delta = buffer.lock();
        for id in 1..=5 {
            delta.added.push(building(id, id as f32 * 10.0));
        }
    }
    controller.tick(Seconds::new(1.0));
    println!(
        "   phase: {:?}, live entities: {}\n",
        controller.phase(),
        controller.live_entities()
    );

    println!("6. Visualization toggled off: full teardown");
    controller.set_visualization_enabled(false);
    controller.tick(Seconds::new(1.0));
    println!("   live entities: {}\n", controller.live_entities());

    println!("7. Toggled back on: geometry returns on the next delta");
    controller.set_visualization_enabled(true);
    {
        let mut delta = buffer.lock();
        for id in 1..=5 {
            delta.added.push(building(id, id as f32 * 10.0));
        }
    }
    controller.tick(Seconds::new(1.0));
    println!("   live entities: {}\n", controller.live_entities());

    let stats = controller.stats();
    println!("=== Stats ===");
    println!("   ticks:              {}", stats.ticks);
    println!("   deltas consumed:    {}", stats.deltas_consumed);
    println!("   entities created:   {}", stats.entities_created);
    println!("   entities destroyed: {}", stats.entities_destroyed);
    println!("   clears:             {}", stats.clears);

    controller.disable();
}
