//! Per-tick signal snapshot consumed by the localization machine

use geosync_core::{
    EarthState, EarthTrackingState, FeatureSupport, GeoPose, GeospatialMode,
    LocationServiceStatus, Seconds, SessionState,
};

/// Everything the machine reads in one `evaluate` call.
///
/// The caller samples all of these at the top of the tick; the machine never
/// reaches out to providers itself. `pose` must only be populated when
/// `earth_tracking` is `Tracking` - a lost-tracking tick carries `None`,
/// never a zeroed sample.
#[derive(Debug, Clone)]
pub struct TickSignals {
    /// Wall time elapsed since the previous tick.
    pub dt: Seconds,
    /// Host AR session lifecycle state.
    pub session_state: SessionState,
    /// Whether the required scene collaborators (session origin, session,
    /// extensions) are all present.
    pub collaborators_present: bool,
    /// Latest feature-support query result.
    pub feature_support: FeatureSupport,
    /// Geospatial mode currently set on the session configuration.
    pub geospatial_mode: GeospatialMode,
    /// Device location service status.
    pub location_status: LocationServiceStatus,
    /// Earth subsystem readiness.
    pub earth_state: EarthState,
    /// Per-frame earth tracking quality.
    pub earth_tracking: EarthTrackingState,
    /// Latest pose sample, absent unless tracking.
    pub pose: Option<GeoPose>,
}

impl TickSignals {
    /// A quiet boot-time tick: nothing resolved yet.
    pub fn at_boot(dt: Seconds) -> Self {
        Self {
            dt,
            session_state: SessionState::default(),
            collaborators_present: true,
            feature_support: FeatureSupport::Unknown,
            geospatial_mode: GeospatialMode::Disabled,
            location_status: LocationServiceStatus::Initializing,
            earth_state: EarthState::NotReady,
            earth_tracking: EarthTrackingState::NotTracking,
            pose: None,
        }
    }

    /// Session tracking and location service running.
    pub fn session_ready(&self) -> bool {
        self.session_state == SessionState::Tracking
            && self.location_status == LocationServiceStatus::Running
    }
}
