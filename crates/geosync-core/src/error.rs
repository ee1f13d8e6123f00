//! Error types for geosync

use thiserror::Error;

use crate::TrackableId;

/// Core geosync errors
#[derive(Error, Debug)]
pub enum GeosyncError {
    // Configuration errors
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Building material list is empty")]
    EmptyMaterialList,

    // Signal errors
    #[error("Session entered terminal state")]
    SessionTerminal,

    #[error("Geospatial feature unsupported on this device")]
    FeatureUnsupported,

    #[error("Location service failed")]
    LocationServiceFailed,

    // Timeout
    #[error("Localization exceeded time budget")]
    LocalizationTimeout,

    // Registry errors
    #[error("No render entity registered for {0:?}")]
    EntityNotFound(TrackableId),
}

/// Result type for geosync operations
pub type GeosyncResult<T> = Result<T, GeosyncError>;

/// Why a run was fatally suspended. First reason wins; later fatal signals
/// in the same run are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalReason {
    /// Session origin, session, or required extensions absent.
    MissingCollaborator,
    /// Session reported a terminal lifecycle state.
    SessionTerminal,
    /// Device cannot run geospatial tracking.
    FeatureUnsupported,
    /// Device location service reported `Failed`.
    LocationServiceFailed,
    /// Localization did not complete within its time budget.
    LocalizationTimeout,
}

impl FatalReason {
    /// User-facing text displayed before the scheduled exit.
    pub fn display_text(self) -> &'static str {
        match self {
            FatalReason::MissingCollaborator => {
                "Geospatial components are missing from the scene."
            }
            FatalReason::SessionTerminal => "The AR session ended unexpectedly.",
            FatalReason::FeatureUnsupported => {
                "This device does not support geospatial tracking."
            }
            FatalReason::LocationServiceFailed => "Location services are unavailable.",
            FatalReason::LocalizationTimeout => {
                "Localization not possible.\nRestart the app to try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GeosyncError::MissingCollaborator("session origin");
        assert_eq!(err.to_string(), "Missing required collaborator: session origin");
    }

    #[test]
    fn test_fatal_reason_text_nonempty() {
        for reason in [
            FatalReason::MissingCollaborator,
            FatalReason::SessionTerminal,
            FatalReason::FeatureUnsupported,
            FatalReason::LocationServiceFailed,
            FatalReason::LocalizationTimeout,
        ] {
            assert!(!reason.display_text().is_empty());
        }
    }
}
