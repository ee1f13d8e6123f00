//! Localization state machine
//!
//! Evaluated once per tick. The machine folds session, feature-support,
//! earth and location signals into a single `LocalizationPhase` plus
//! user-facing status text, and emits directives (enable geospatial mode,
//! suspend/restore geometry visibility) for the tick driver to act on.
//!
//! Fatal conditions funnel through one reason-setting path: the first
//! reason wins, `Suspended` is terminal for the run, and repeated fatal
//! signals afterwards are no-ops.

use geosync_core::{
    EarthState, EarthTrackingState, FatalReason, FeatureSupport, GeospatialMode,
    LocationServiceStatus, Seconds,
};
use tracing::{debug, info, warn};

use crate::TickSignals;

/// Phase of the localization lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizationPhase {
    /// Terminal: session not usable this run (fatal reason recorded).
    Suspended,
    /// Geospatial mode enablement requested, cooldown running.
    ConfiguringFeature,
    /// Tracking but accuracy outside thresholds, or pose absent.
    Localizing,
    /// Tracking with both accuracy thresholds satisfied.
    Localized,
}

impl Default for LocalizationPhase {
    fn default() -> Self {
        Self::ConfiguringFeature
    }
}

/// Accuracy thresholds and timer budgets.
#[derive(Debug, Clone)]
pub struct LocalizeConfig {
    /// Maximum acceptable yaw accuracy error, degrees.
    pub yaw_accuracy_threshold: f64,
    /// Maximum acceptable horizontal accuracy error, meters.
    pub horizontal_accuracy_threshold: f64,
    /// Cooldown after requesting geospatial mode enablement.
    pub configure_cooldown: Seconds,
    /// Budget for completing localization before giving up.
    pub localization_timeout: Seconds,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            yaw_accuracy_threshold: 25.0,
            horizontal_accuracy_threshold: 20.0,
            configure_cooldown: Seconds::new(3.0),
            localization_timeout: Seconds::new(180.0),
        }
    }
}

/// Output of one `evaluate` call.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub phase: LocalizationPhase,
    /// User-facing status text for this tick.
    pub status: String,
    /// Ask the host to set `GeospatialMode::Enabled` on the session config.
    pub request_enable_mode: bool,
    /// Hide geometry until localization completes (independent of the
    /// user's visualization toggle).
    pub suspend_visibility: bool,
    /// Localization completed: re-assert the user's last toggle request.
    pub restore_visibility: bool,
    /// Set on the single tick a fatal condition is first recognized.
    pub fatal: Option<FatalReason>,
}

impl Default for Evaluation {
    fn default() -> Self {
        Self {
            phase: LocalizationPhase::Suspended,
            status: String::new(),
            request_enable_mode: false,
            suspend_visibility: false,
            restore_visibility: false,
            fatal: None,
        }
    }
}

/// Localization state machine. One instance per session run.
#[derive(Debug)]
pub struct LocalizationMachine {
    config: LocalizeConfig,
    phase: LocalizationPhase,
    /// First fatal reason; never overwritten.
    fatal: Option<FatalReason>,
    /// Remaining enablement cooldown while `ConfiguringFeature`.
    cooldown: Seconds,
    /// Whether the enable request was already issued.
    enable_requested: bool,
    /// Time accumulated in `Localizing` since the last phase entry.
    localizing_elapsed: Seconds,
}

impl LocalizationMachine {
    pub fn new(config: LocalizeConfig) -> Self {
        Self {
            config,
            phase: LocalizationPhase::ConfiguringFeature,
            fatal: None,
            cooldown: Seconds::ZERO,
            enable_requested: false,
            localizing_elapsed: Seconds::ZERO,
        }
    }

    pub fn phase(&self) -> LocalizationPhase {
        self.phase
    }

    pub fn fatal_reason(&self) -> Option<FatalReason> {
        self.fatal
    }

    /// Time spent in `Localizing` since last entering it.
    pub fn localizing_elapsed(&self) -> Seconds {
        self.localizing_elapsed
    }

    /// Evaluate one tick of signals.
    pub fn evaluate(&mut self, signals: &TickSignals) -> Evaluation {
        // Already fatally suspended: report, change nothing.
        if let Some(reason) = self.fatal {
            return Evaluation {
                phase: LocalizationPhase::Suspended,
                status: reason.display_text().to_string(),
                ..Default::default()
            };
        }

        // Stage 1: terminal inputs.
        if signals.session_state.is_terminal() {
            return self.enter_fatal(FatalReason::SessionTerminal);
        }
        if !signals.collaborators_present {
            return self.enter_fatal(FatalReason::MissingCollaborator);
        }
        if signals.location_status == LocationServiceStatus::Failed {
            return self.enter_fatal(FatalReason::LocationServiceFailed);
        }

        // Stage 2: feature support negotiation.
        match signals.feature_support {
            FeatureSupport::Unknown => {
                return Evaluation {
                    phase: self.phase,
                    status: "Determining geospatial support...".to_string(),
                    ..Default::default()
                };
            }
            FeatureSupport::Unsupported => {
                return self.enter_fatal(FatalReason::FeatureUnsupported);
            }
            FeatureSupport::Supported => {}
        }

        // Stage 3: geospatial mode enablement with cooldown.
        if self.phase == LocalizationPhase::ConfiguringFeature && self.enable_requested {
            if !self.cooldown.is_zero() {
                self.cooldown = self.cooldown.saturating_sub(signals.dt);
                return Evaluation {
                    phase: self.phase,
                    status: "Enabling geospatial tracking...".to_string(),
                    ..Default::default()
                };
            }
            // Cooldown exhausted: fall through to the earth-state check.
        } else if signals.geospatial_mode == GeospatialMode::Disabled {
            self.phase = LocalizationPhase::ConfiguringFeature;
            self.enable_requested = true;
            self.cooldown = self.config.configure_cooldown;
            info!(cooldown = ?self.cooldown, "requesting geospatial mode enablement");
            return Evaluation {
                phase: self.phase,
                status: "Enabling geospatial tracking...".to_string(),
                request_enable_mode: true,
                ..Default::default()
            };
        }

        // Stage 4: earth subsystem readiness.
        match signals.earth_state {
            EarthState::NotReady => {
                return Evaluation {
                    phase: self.phase,
                    status: "Initializing geospatial tracking...".to_string(),
                    ..Default::default()
                };
            }
            EarthState::ErrorCode(code) => {
                warn!(code, "earth subsystem reported error");
                return Evaluation {
                    phase: self.phase,
                    status: format!("Geospatial error: {code}"),
                    ..Default::default()
                };
            }
            EarthState::Enabled => {}
        }

        // Stage 5: readiness and accuracy decision.
        let tracking = signals.earth_tracking == EarthTrackingState::Tracking;
        let pose_ok = match signals.pose {
            Some(pose) if tracking => {
                pose.yaw_accuracy <= self.config.yaw_accuracy_threshold
                    && pose.horizontal_accuracy <= self.config.horizontal_accuracy_threshold
            }
            _ => false,
        };

        if !signals.session_ready() || !tracking || !pose_ok {
            self.tick_localizing(signals.dt)
        } else {
            self.tick_localized()
        }
    }

    /// Stay in (or enter) `Localizing`; accumulate time against the budget.
    fn tick_localizing(&mut self, dt: Seconds) -> Evaluation {
        let entering = self.phase != LocalizationPhase::Localizing;
        if entering {
            debug!(from = ?self.phase, "entering Localizing");
            self.phase = LocalizationPhase::Localizing;
            self.localizing_elapsed = Seconds::ZERO;
        }
        self.localizing_elapsed += dt;

        if self.localizing_elapsed > self.config.localization_timeout {
            return self.enter_fatal(FatalReason::LocalizationTimeout);
        }

        Evaluation {
            phase: self.phase,
            status: "Localizing your device...".to_string(),
            suspend_visibility: entering,
            ..Default::default()
        }
    }

    /// Enter or remain in `Localized`.
    fn tick_localized(&mut self) -> Evaluation {
        let entering = self.phase != LocalizationPhase::Localized;
        if entering {
            info!("localization complete");
            self.phase = LocalizationPhase::Localized;
            self.localizing_elapsed = Seconds::ZERO;
        }

        Evaluation {
            phase: self.phase,
            status: "Localization complete.".to_string(),
            restore_visibility: entering,
            ..Default::default()
        }
    }

    /// The single fatal path. First reason wins; `Suspended` is terminal.
    fn enter_fatal(&mut self, reason: FatalReason) -> Evaluation {
        debug_assert!(self.fatal.is_none());
        warn!(?reason, "localization fatally suspended");
        self.fatal = Some(reason);
        self.phase = LocalizationPhase::Suspended;

        Evaluation {
            phase: LocalizationPhase::Suspended,
            status: reason.display_text().to_string(),
            suspend_visibility: true,
            fatal: Some(reason),
            ..Default::default()
        }
    }
}

impl Default for LocalizationMachine {
    fn default() -> Self {
        Self::new(LocalizeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosync_core::{GeoPose, SessionState};

    fn ready_signals(dt: f64) -> TickSignals {
        TickSignals {
            dt: Seconds::new(dt),
            session_state: SessionState::Tracking,
            collaborators_present: true,
            feature_support: FeatureSupport::Supported,
            geospatial_mode: GeospatialMode::Enabled,
            location_status: LocationServiceStatus::Running,
            earth_state: EarthState::Enabled,
            earth_tracking: EarthTrackingState::Tracking,
            pose: Some(GeoPose::new(59.33, 18.06, 28.0).with_accuracy(5.0, 3.0, 10.0)),
        }
    }

    #[test]
    fn test_accurate_pose_localizes() {
        let mut machine = LocalizationMachine::default();
        let eval = machine.evaluate(&ready_signals(1.0));
        assert_eq!(eval.phase, LocalizationPhase::Localized);
        assert!(eval.restore_visibility);

        // Staying localized does not re-assert visibility.
        let eval = machine.evaluate(&ready_signals(1.0));
        assert_eq!(eval.phase, LocalizationPhase::Localized);
        assert!(!eval.restore_visibility);
    }

    #[test]
    fn test_poor_accuracy_keeps_localizing() {
        let mut machine = LocalizationMachine::default();

        let mut signals = ready_signals(1.0);
        signals.pose = Some(GeoPose::new(0.0, 0.0, 0.0).with_accuracy(30.0, 3.0, 10.0));
        let eval = machine.evaluate(&signals);
        assert_eq!(eval.phase, LocalizationPhase::Localizing);
        assert!(eval.suspend_visibility);

        // Yaw over threshold also blocks.
        signals.pose = Some(GeoPose::new(0.0, 0.0, 0.0).with_accuracy(5.0, 3.0, 26.0));
        let eval = machine.evaluate(&signals);
        assert_eq!(eval.phase, LocalizationPhase::Localizing);
        assert!(!eval.suspend_visibility); // only on entry

        // Exactly at the thresholds passes.
        signals.pose = Some(GeoPose::new(0.0, 0.0, 0.0).with_accuracy(20.0, 3.0, 25.0));
        let eval = machine.evaluate(&signals);
        assert_eq!(eval.phase, LocalizationPhase::Localized);
        assert!(eval.restore_visibility);
    }

    #[test]
    fn test_absent_pose_never_localizes() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.earth_tracking = EarthTrackingState::NotTracking;
        signals.pose = None;

        let eval = machine.evaluate(&signals);
        assert_eq!(eval.phase, LocalizationPhase::Localizing);
    }

    #[test]
    fn test_unsupported_is_terminal() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.feature_support = FeatureSupport::Unsupported;

        let eval = machine.evaluate(&signals);
        assert_eq!(eval.phase, LocalizationPhase::Suspended);
        assert_eq!(eval.fatal, Some(FatalReason::FeatureUnsupported));
        assert!(eval.suspend_visibility);

        // Monotonic terminality: even perfect signals never recover, and
        // the fatal flag is only reported on the first tick.
        for _ in 0..10 {
            let eval = machine.evaluate(&ready_signals(1.0));
            assert_eq!(eval.phase, LocalizationPhase::Suspended);
            assert!(eval.fatal.is_none());
        }
        assert_eq!(machine.fatal_reason(), Some(FatalReason::FeatureUnsupported));
    }

    #[test]
    fn test_first_fatal_reason_wins() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.location_status = LocationServiceStatus::Failed;
        machine.evaluate(&signals);
        assert_eq!(machine.fatal_reason(), Some(FatalReason::LocationServiceFailed));

        // A later terminal session state does not replace the reason.
        let mut signals = ready_signals(1.0);
        signals.session_state = SessionState::Error;
        machine.evaluate(&signals);
        assert_eq!(machine.fatal_reason(), Some(FatalReason::LocationServiceFailed));
    }

    #[test]
    fn test_unknown_support_waits() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.feature_support = FeatureSupport::Unknown;

        for _ in 0..5 {
            let eval = machine.evaluate(&signals);
            assert_eq!(eval.phase, LocalizationPhase::ConfiguringFeature);
            assert!(eval.fatal.is_none());
            assert!(!eval.request_enable_mode);
        }
    }

    #[test]
    fn test_mode_enable_request_and_cooldown() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.geospatial_mode = GeospatialMode::Disabled;
        signals.earth_state = EarthState::NotReady;

        // First supported tick issues the enable request exactly once.
        let eval = machine.evaluate(&signals);
        assert!(eval.request_enable_mode);
        assert_eq!(eval.phase, LocalizationPhase::ConfiguringFeature);

        // Cooldown ticks down without re-requesting.
        signals.geospatial_mode = GeospatialMode::Enabled;
        for _ in 0..3 {
            let eval = machine.evaluate(&signals);
            assert!(!eval.request_enable_mode);
            assert_eq!(eval.phase, LocalizationPhase::ConfiguringFeature);
        }

        // Cooldown exhausted: falls through to the earth-state check.
        let eval = machine.evaluate(&signals);
        assert_eq!(eval.status, "Initializing geospatial tracking...");
    }

    #[test]
    fn test_earth_error_code_surfaces() {
        let mut machine = LocalizationMachine::default();
        let mut signals = ready_signals(1.0);
        signals.earth_state = EarthState::ErrorCode(-17);

        let eval = machine.evaluate(&signals);
        assert!(eval.status.contains("-17"));
        assert!(eval.fatal.is_none());
    }

    #[test]
    fn test_localization_timeout_scenario() {
        // Full scripted run from the boot sequence through timeout.
        let mut machine = LocalizationMachine::default();

        // Tick 1: support unknown.
        let mut signals = ready_signals(1.0);
        signals.feature_support = FeatureSupport::Unknown;
        machine.evaluate(&signals);

        // Tick 2: supported, mode disabled -> enable request.
        let mut signals = ready_signals(1.0);
        signals.geospatial_mode = GeospatialMode::Disabled;
        let eval = machine.evaluate(&signals);
        assert!(eval.request_enable_mode);

        // Cooldown: 3 ticks of 1.0.
        let signals = ready_signals(1.0);
        for _ in 0..3 {
            let eval = machine.evaluate(&signals);
            assert_eq!(eval.phase, LocalizationPhase::ConfiguringFeature);
        }

        // Earth not ready for a tick.
        let mut signals = ready_signals(1.0);
        signals.earth_state = EarthState::NotReady;
        machine.evaluate(&signals);

        // Pose accuracy 30 m / 25 deg: localizing, never localized.
        let mut signals = ready_signals(1.0);
        signals.pose = Some(GeoPose::new(0.0, 0.0, 0.0).with_accuracy(30.0, 10.0, 25.0));

        let mut fatal_at = None;
        for tick in 1..=181 {
            let eval = machine.evaluate(&signals);
            if eval.fatal.is_some() {
                fatal_at = Some((tick, eval.clone()));
                break;
            }
            assert_eq!(eval.phase, LocalizationPhase::Localizing);
        }

        let (tick, eval) = fatal_at.expect("timeout must fire");
        assert_eq!(tick, 181);
        assert_eq!(eval.fatal, Some(FatalReason::LocalizationTimeout));
        assert!(eval.suspend_visibility);

        // No further phase changes afterwards.
        for _ in 0..5 {
            let eval = machine.evaluate(&ready_signals(1.0));
            assert_eq!(eval.phase, LocalizationPhase::Suspended);
        }
    }

    #[test]
    fn test_timer_resets_on_localized_roundtrip() {
        let mut machine = LocalizationMachine::default();

        // Spend time localizing, then succeed.
        let mut poor = ready_signals(1.0);
        poor.pose = Some(GeoPose::new(0.0, 0.0, 0.0).with_accuracy(30.0, 10.0, 30.0));
        for _ in 0..100 {
            machine.evaluate(&poor);
        }
        machine.evaluate(&ready_signals(1.0));
        assert_eq!(machine.phase(), LocalizationPhase::Localized);
        assert_eq!(machine.localizing_elapsed(), Seconds::ZERO);

        // Losing accuracy re-enters Localizing with a fresh budget.
        for _ in 0..100 {
            let eval = machine.evaluate(&poor);
            assert!(eval.fatal.is_none());
        }
        assert!(machine.localizing_elapsed() <= Seconds::new(100.0));
    }
}
