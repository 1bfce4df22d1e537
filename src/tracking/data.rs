//! Per-frame tracking data consumed by the recognizers.

use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Vec3};
use crate::tracking::joint::{BODY_JOINT_COUNT, HAND_JOINT_COUNT, Joint};

/// Position of one joint with its tracking confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPosition {
    pub position: Vec3,
    /// Provider confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Default for JointPosition {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            confidence: 0.0,
        }
    }
}

/// Orientation of one joint with its tracking confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointOrientation {
    /// Rotation matrix.
    pub orientation: Mat3,
    /// Provider confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Default for JointOrientation {
    fn default() -> Self {
        Self {
            orientation: Mat3::identity(),
            confidence: 0.0,
        }
    }
}

/// One frame of skeleton data for a body or a hand.
///
/// The `local_*` arrays hold parent-relative transforms. Body and hand frames
/// differ only in joint count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingData {
    /// Frame time in seconds.
    pub timestamp: f64,
    pub joint_positions: Vec<JointPosition>,
    pub joint_orientations: Vec<JointOrientation>,
    pub local_joint_positions: Vec<JointPosition>,
    pub local_joint_orientations: Vec<JointOrientation>,
}

impl TrackingData {
    /// Create an empty frame with `joint_count` untracked joints.
    pub fn with_joint_count(joint_count: usize, timestamp: f64) -> Self {
        Self {
            timestamp,
            joint_positions: vec![JointPosition::default(); joint_count],
            joint_orientations: vec![JointOrientation::default(); joint_count],
            local_joint_positions: vec![JointPosition::default(); joint_count],
            local_joint_orientations: vec![JointOrientation::default(); joint_count],
        }
    }

    /// Create an empty full-body frame.
    pub fn body(timestamp: f64) -> Self {
        Self::with_joint_count(BODY_JOINT_COUNT, timestamp)
    }

    /// Create an empty hand frame.
    pub fn hand(timestamp: f64) -> Self {
        Self::with_joint_count(HAND_JOINT_COUNT, timestamp)
    }

    #[inline]
    pub fn position(&self, joint: usize, local: bool) -> Option<&JointPosition> {
        if local {
            self.local_joint_positions.get(joint)
        } else {
            self.joint_positions.get(joint)
        }
    }

    #[inline]
    pub fn orientation(&self, joint: usize, local: bool) -> Option<&JointOrientation> {
        if local {
            self.local_joint_orientations.get(joint)
        } else {
            self.joint_orientations.get(joint)
        }
    }

    /// Set the global position of a joint. Out-of-range joints are ignored.
    pub fn set_position(&mut self, joint: impl Into<Joint>, position: Vec3, confidence: f32) {
        if let Some(slot) = self.joint_positions.get_mut(joint.into().index()) {
            *slot = JointPosition {
                position,
                confidence,
            };
        }
    }

    /// Set the parent-relative position of a joint.
    pub fn set_local_position(&mut self, joint: impl Into<Joint>, position: Vec3, confidence: f32) {
        if let Some(slot) = self.local_joint_positions.get_mut(joint.into().index()) {
            *slot = JointPosition {
                position,
                confidence,
            };
        }
    }

    /// Set the global orientation of a joint.
    pub fn set_orientation(&mut self, joint: impl Into<Joint>, orientation: Mat3, confidence: f32) {
        if let Some(slot) = self.joint_orientations.get_mut(joint.into().index()) {
            *slot = JointOrientation {
                orientation,
                confidence,
            };
        }
    }

    /// Set the parent-relative orientation of a joint.
    pub fn set_local_orientation(
        &mut self,
        joint: impl Into<Joint>,
        orientation: Mat3,
        confidence: f32,
    ) {
        if let Some(slot) = self.local_joint_orientations.get_mut(joint.into().index()) {
            *slot = JointOrientation {
                orientation,
                confidence,
            };
        }
    }
}

/// Named body-length references used to express distances in body units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMeasurement {
    BodyHeight,
    TorsoHeight,
    ShoulderWidth,
    HipWidth,
    ArmLength,
    UpperArmLength,
    LowerArmLength,
    LegLength,
    UpperLegLength,
    LowerLegLength,
}

pub const BODY_MEASUREMENT_COUNT: usize = 10;

impl BodyMeasurement {
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Measured length of a body reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyMeasurementDistance {
    pub distance: f32,
    pub confidence: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::joint::{BodyJoint, HandJoint};

    #[test]
    fn test_frame_sizes() {
        assert_eq!(TrackingData::body(0.0).joint_positions.len(), BODY_JOINT_COUNT);
        assert_eq!(TrackingData::hand(0.0).local_joint_orientations.len(), HAND_JOINT_COUNT);
    }

    #[test]
    fn test_set_and_read_position() {
        let mut frame = TrackingData::body(1.5);
        frame.set_position(BodyJoint::RightHand, Vec3::new(1.0, 2.0, 3.0), 0.9);
        let p = frame.position(BodyJoint::RightHand.index(), false).unwrap();
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.confidence, 0.9);
        assert_eq!(frame.position(BodyJoint::RightHand.index(), true).unwrap().confidence, 0.0);
    }

    #[test]
    fn test_out_of_range_joint_is_ignored() {
        let mut frame = TrackingData::hand(0.0);
        frame.set_position(BodyJoint::FaceChin, Vec3::x(), 1.0);
        assert!(frame.position(BodyJoint::FaceChin.index(), false).is_none());
        frame.set_position(HandJoint::Thumb, Vec3::x(), 1.0);
        assert_eq!(frame.position(HandJoint::Thumb.index(), false).unwrap().position, Vec3::x());
    }
}
