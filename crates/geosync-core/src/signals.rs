//! External signal enums
//!
//! These mirror the states reported by the host AR session, the earth
//! tracking subsystem and the device location service. Geosync consumes
//! them read-only; it never drives these lifecycles itself.

/// Lifecycle state of the host AR session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Availability of AR support is still being determined.
    CheckingAvailability,
    /// Device supports AR but the session has not started.
    Ready,
    /// Session is starting up.
    Initializing,
    /// Session is running and tracking.
    Tracking,
    /// Device cannot run AR at all.
    Unsupported,
    /// Required AR services need an update the user declined or that failed.
    NeedsInstall,
    /// Session hit an unrecoverable error.
    Error,
}

impl SessionState {
    /// Terminal states: the session will never start tracking this run.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Unsupported | SessionState::NeedsInstall | SessionState::Error)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::CheckingAvailability
    }
}

/// Per-frame earth tracking quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarthTrackingState {
    #[default]
    NotTracking,
    Tracking,
}

/// Readiness of the earth subsystem as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarthState {
    /// Subsystem exists but has not finished initializing.
    #[default]
    NotReady,
    /// Initialized and usable.
    Enabled,
    /// Initialized but reporting an error; the code is surfaced verbatim
    /// in status text.
    ErrorCode(i32),
}

/// Result of asking the device whether it can run geospatial tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSupport {
    /// Query still in flight; wait.
    #[default]
    Unknown,
    /// Device cannot run the feature. Terminal.
    Unsupported,
    Supported,
}

/// Geospatial mode requested on the session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeospatialMode {
    #[default]
    Disabled,
    Enabled,
}

/// Device location service status. May flip to `Failed` asynchronously;
/// readers treat it as a fatal input at the top of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationServiceStatus {
    #[default]
    Stopped,
    Initializing,
    Running,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_terminal_states() {
        assert!(SessionState::Error.is_terminal());
        assert!(SessionState::Unsupported.is_terminal());
        assert!(SessionState::NeedsInstall.is_terminal());
        assert!(!SessionState::Tracking.is_terminal());
        assert!(!SessionState::CheckingAvailability.is_terminal());
    }

    #[test]
    fn test_signal_defaults() {
        assert_eq!(FeatureSupport::default(), FeatureSupport::Unknown);
        assert_eq!(EarthState::default(), EarthState::NotReady);
        assert_eq!(LocationServiceStatus::default(), LocationServiceStatus::Stopped);
    }
}
