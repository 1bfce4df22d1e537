//! Recognition outcomes and correction hints.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::tracking::{BodyMeasurement, Joint, SkeletonKind};

/// Outcome of one recognition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionResult {
    Recognized,
    NotRecognized,
    /// Joint confidence was too low to evaluate the rule.
    TrackingError,
    /// A history recognizer has started but not yet reached its goal.
    WaitingForLastStateToFinish,
}

impl RecognitionResult {
    #[inline]
    pub fn is_recognized(&self) -> bool {
        *self == Self::Recognized
    }
}

/// What the user should change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Speed,
    Direction,
    #[default]
    Pose,
    Form,
    Fingers,
}

/// In which sense the quantity should change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    More,
    Less,
    #[default]
    Different,
}

/// Structured feedback describing how to satisfy a recognizer.
///
/// Adding `direction` to the observed quantity moves it to the nearest
/// boundary of the accepted range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionHint {
    pub joint: Option<Joint>,
    pub is_angle: bool,
    pub change_type: ChangeType,
    pub change_direction: ChangeDirection,
    pub direction: Vec3,
    pub distance: f32,
    pub measuring_unit: Option<BodyMeasurement>,
    pub skeleton: SkeletonKind,
}

impl Default for CorrectionHint {
    fn default() -> Self {
        Self {
            joint: None,
            is_angle: false,
            change_type: ChangeType::default(),
            change_direction: ChangeDirection::default(),
            direction: Vec3::zeros(),
            distance: 0.0,
            measuring_unit: None,
            skeleton: SkeletonKind::default(),
        }
    }
}

impl CorrectionHint {
    pub fn new(change_type: ChangeType, change_direction: ChangeDirection) -> Self {
        Self {
            change_type,
            change_direction,
            ..Self::default()
        }
    }

    pub fn for_joint(mut self, joint: Joint) -> Self {
        self.joint = Some(joint);
        self
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn angular(mut self) -> Self {
        self.is_angle = true;
        self
    }

    pub fn measured_in(mut self, unit: Option<BodyMeasurement>) -> Self {
        self.measuring_unit = unit;
        self
    }

    pub fn on_skeleton(mut self, skeleton: SkeletonKind) -> Self {
        self.skeleton = skeleton;
        self
    }
}

/// Sign of a scalar correction as a change direction.
pub(crate) fn direction_of(correction: f32) -> ChangeDirection {
    if correction > 0.0 {
        ChangeDirection::More
    } else if correction < 0.0 {
        ChangeDirection::Less
    } else {
        ChangeDirection::Different
    }
}

/// Fill the caller's hint, if one was requested.
#[inline]
pub(crate) fn fill_hint(hint: Option<&mut CorrectionHint>, make: impl FnOnce() -> CorrectionHint) {
    if let Some(slot) = hint {
        *slot = make();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::BodyJoint;

    #[test]
    fn test_hint_builder() {
        let hint = CorrectionHint::new(ChangeType::Speed, ChangeDirection::More)
            .for_joint(BodyJoint::RightHand.into())
            .with_distance(12.5)
            .on_skeleton(SkeletonKind::Body);
        assert_eq!(hint.joint, Some(Joint::Body(BodyJoint::RightHand)));
        assert_eq!(hint.distance, 12.5);
        assert!(!hint.is_angle);
    }

    #[test]
    fn test_fill_hint_only_when_requested() {
        let mut hint = CorrectionHint::default();
        fill_hint(Some(&mut hint), || {
            CorrectionHint::new(ChangeType::Fingers, ChangeDirection::Less)
        });
        assert_eq!(hint.change_type, ChangeType::Fingers);

        let mut called = false;
        fill_hint(None, || {
            called = true;
            CorrectionHint::default()
        });
        assert!(!called);
    }

    #[test]
    fn test_direction_of() {
        assert_eq!(direction_of(2.0), ChangeDirection::More);
        assert_eq!(direction_of(-0.5), ChangeDirection::Less);
        assert_eq!(direction_of(0.0), ChangeDirection::Different);
    }
}
