//! Collaborator boundaries
//!
//! The runtime consumes the AR session, the geometry provider, the device
//! location service and optional UI sinks through these traits. Providers
//! live in the host application; geosync only reads signals and issues the
//! few control calls it owns (mode request, location start/stop).

use std::sync::Arc;

use parking_lot::Mutex;

use geosync_core::{
    EarthState, EarthTrackingState, FeatureSupport, GeoPose, GeospatialMode,
    LocationServiceStatus, SessionState,
};
use geosync_scene::GeometryDelta;

/// AR session and earth tracking signals.
pub trait TrackingProvider {
    fn session_state(&self) -> SessionState;
    fn earth_state(&self) -> EarthState;
    fn earth_tracking(&self) -> EarthTrackingState;
    /// Latest pose sample. Callers must only ask while earth tracking is
    /// `Tracking`; a provider may return stale data otherwise.
    fn pose(&self) -> Option<GeoPose>;
    /// Feature-support query for the given mode.
    fn feature_support(&self, mode: GeospatialMode) -> FeatureSupport;
    /// Mode currently set on the session configuration.
    fn geospatial_mode(&self) -> GeospatialMode;
    /// Ask the host to reconfigure the session with `mode`.
    fn request_geospatial_mode(&mut self, mode: GeospatialMode);
    /// Whether session origin, session and extensions are all present.
    fn collaborators_present(&self) -> bool {
        true
    }
}

/// Shared buffer the geometry provider fills with added/updated/removed
/// records; the controller drains it once per tick.
pub type SharedDeltaBuffer = Arc<Mutex<GeometryDelta>>;

/// Source of streetscape geometry change notifications.
pub trait GeometryProvider {
    /// Register the change listener and hand back the delta buffer.
    ///
    /// Called at most once per controller; the controller re-uses the
    /// buffer across activations rather than re-subscribing.
    fn subscribe(&mut self) -> SharedDeltaBuffer;
}

/// Device location service.
pub trait LocationService: Send + Sync {
    /// Whether the user has granted/enabled location at the OS level.
    fn enabled_by_user(&self) -> bool;
    /// Current status. May flip to `Failed` asynchronously.
    fn status(&self) -> LocationServiceStatus;
    fn start(&self);
    fn stop(&self);
}

/// Optional UI text sink (status / help / debug strings).
pub trait TextSink {
    fn set_text(&mut self, text: &str);
}

/// Optional UI toggle whose interactable/checked state the runtime drives.
pub trait ToggleControl {
    /// Grey the control out (no interaction) or re-enable it.
    fn set_interactable(&mut self, interactable: bool);
    /// Programmatically reflect the effective visualization state.
    fn set_checked(&mut self, checked: bool);
}
