//! Pose types - geospatial pose samples and scene poses
//!
//! A `GeoPose` is a single earth-relative pose sample with its accuracy
//! estimates; it only exists while the earth subsystem is tracking. A lost
//! tracking tick yields no sample at all (`Option<GeoPose>` at the call
//! sites), never a zero-filled one - zero accuracy would read as a perfect
//! fix and falsely complete localization.

/// 3D position in scene coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Distance to another position.
    pub fn distance(&self, other: &Position3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Rotation (quaternion representation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation3 {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Rotation3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation3 {
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn from_yaw(yaw: f32) -> Self {
        Self {
            w: (yaw * 0.5).cos(),
            x: 0.0,
            y: (yaw * 0.5).sin(),
            z: 0.0,
        }
    }
}

/// Position + rotation pair used for render entities and geometry records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScenePose {
    pub position: Position3,
    pub rotation: Rotation3,
}

impl ScenePose {
    pub fn new(position: Position3, rotation: Rotation3) -> Self {
        Self { position, rotation }
    }
}

/// One earth-relative pose sample from the tracking subsystem.
///
/// Accuracy fields are error estimates: lower is better. The localization
/// machine trusts a sample once yaw and horizontal accuracy are both under
/// their configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPose {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in meters above the WGS84 ellipsoid.
    pub altitude: f64,
    /// Estimated horizontal position error, meters.
    pub horizontal_accuracy: f64,
    /// Estimated vertical position error, meters.
    pub vertical_accuracy: f64,
    /// Estimated heading/yaw error, degrees.
    pub yaw_accuracy: f64,
    /// Device heading as a rotation about the up axis.
    pub heading: Rotation3,
}

impl GeoPose {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            horizontal_accuracy: f64::MAX,
            vertical_accuracy: f64::MAX,
            yaw_accuracy: f64::MAX,
            heading: Rotation3::identity(),
        }
    }

    pub fn with_accuracy(mut self, horizontal: f64, vertical: f64, yaw: f64) -> Self {
        self.horizontal_accuracy = horizontal;
        self.vertical_accuracy = vertical;
        self.yaw_accuracy = yaw;
        self
    }

    pub fn with_heading(mut self, heading: Rotation3) -> Self {
        self.heading = heading;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let a = Position3::new(0.0, 0.0, 0.0);
        let b = Position3::new(3.0, 4.0, 0.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_geo_pose_defaults_untrusted() {
        // A fresh sample without accuracy set must never pass a threshold.
        let pose = GeoPose::new(59.33, 18.06, 28.0);
        assert!(pose.horizontal_accuracy > 20.0);
        assert!(pose.yaw_accuracy > 25.0);
    }

    #[test]
    fn test_geo_pose_builder() {
        let pose = GeoPose::new(0.0, 0.0, 0.0).with_accuracy(5.0, 3.0, 10.0);
        assert_eq!(pose.horizontal_accuracy, 5.0);
        assert_eq!(pose.vertical_accuracy, 3.0);
        assert_eq!(pose.yaw_accuracy, 10.0);
    }
}
