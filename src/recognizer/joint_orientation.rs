//! Static orientation of a single joint.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::math::{
    Mat3, Vec3, euler_degrees, normalize_angle_deg, rotation_difference_deg,
    rotation_from_euler_degrees,
};
use crate::recognizer::{
    ChangeDirection, ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult,
    RecognizerConfig, confident_orientation, fill_hint, tracking_error,
};
use crate::tracking::{Hand, Joint, SkeletonKind, Target, User};

/// How an orientation is judged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum OrientationCriterion {
    /// Euler angles (degrees) per axis. `min > max` on an axis accepts the
    /// segment wrapping through ±180°.
    EulerRange { min: Vec3, max: Vec3 },
    /// Maximum angle (degrees) between the joint and a target orientation
    /// given as Euler angles.
    Target { orientation: Vec3, max_angle_diff: f32 },
}

impl Default for OrientationCriterion {
    fn default() -> Self {
        Self::EulerRange {
            min: Vec3::repeat(-180.0),
            max: Vec3::repeat(180.0),
        }
    }
}

/// Recognizes a joint orientation.
#[derive(Debug, Clone)]
pub struct JointOrientationRecognizer {
    joint: Joint,
    criterion: OrientationCriterion,
    target_rotation: Mat3,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl JointOrientationRecognizer {
    pub fn new(
        joint: impl Into<Joint>,
        criterion: OrientationCriterion,
        config: RecognizerConfig,
    ) -> Result<Self> {
        let joint = joint.into();
        let target_rotation = match criterion {
            OrientationCriterion::Target {
                orientation,
                max_angle_diff,
            } => {
                if max_angle_diff < 0.0 {
                    return Err(RecognizerError::InvalidRange {
                        what: "orientation angle difference",
                        min: 0.0,
                        max: max_angle_diff,
                    });
                }
                rotation_from_euler_degrees(&orientation)
            }
            OrientationCriterion::EulerRange { .. } => Mat3::identity(),
        };
        Ok(Self {
            joint,
            criterion,
            target_rotation,
            config,
            target: SkeletonKind::for_joints(&[joint])?,
        })
    }

    fn evaluate(&self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }
        let frame = target.current(self.config.use_filtered_data);
        let Some(orientation) = confident_orientation(frame, self.joint, &self.config) else {
            return tracking_error("joint_orientation", &target);
        };

        match self.criterion {
            OrientationCriterion::EulerRange { min, max } => {
                let angles = euler_degrees(&orientation);
                let mut correction = Vec3::zeros();
                let mut recognized = true;
                for i in 0..3 {
                    if !axis_in_range(angles[i], min[i], max[i]) {
                        recognized = false;
                        correction[i] = smallest_correction(angles[i], min[i], max[i]);
                    }
                }
                if recognized {
                    return RecognitionResult::Recognized;
                }
                fill_hint(hint, || {
                    self.hint(ChangeDirection::Different, correction, correction.norm())
                });
            }
            OrientationCriterion::Target { max_angle_diff, .. } => {
                let diff = rotation_difference_deg(&self.target_rotation, &orientation);
                if diff <= max_angle_diff {
                    return RecognitionResult::Recognized;
                }
                // Per-axis Euler change that lands on the target.
                let remaining = (euler_degrees(&self.target_rotation) - euler_degrees(&orientation))
                    .map(normalize_angle_deg);
                fill_hint(hint, || {
                    self.hint(ChangeDirection::Less, remaining, max_angle_diff - diff)
                });
            }
        }
        RecognitionResult::NotRecognized
    }

    fn hint(&self, change_direction: ChangeDirection, direction: Vec3, distance: f32) -> CorrectionHint {
        CorrectionHint::new(ChangeType::Pose, change_direction)
            .for_joint(self.joint)
            .with_direction(direction)
            .with_distance(distance)
            .angular()
            .on_skeleton(self.target)
    }
}

/// Inclusive angle test; `min > max` denotes the segment through ±180°.
fn axis_in_range(angle: f32, min: f32, max: f32) -> bool {
    if min <= max {
        angle >= min && angle <= max
    } else {
        angle >= min || angle <= max
    }
}

/// Smaller signed rotation reaching either bound, wrapped to ±180°.
fn smallest_correction(angle: f32, min: f32, max: f32) -> f32 {
    let to_min = normalize_angle_deg(min - angle);
    let to_max = normalize_angle_deg(max - angle);
    if to_min.abs() < to_max.abs() {
        to_min
    } else {
        to_max
    }
}

impl GestureRecognizer for JointOrientationRecognizer {
    fn recognize_on_user(&mut self, user: &dyn User, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.evaluate(Target::User(user), hint)
    }

    fn recognize_on_hand(&mut self, hand: &dyn Hand, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.evaluate(Target::Hand(hand), hint)
    }

    fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    fn target_skeleton(&self) -> SkeletonKind {
        self.target
    }

    fn clone_box(&self) -> Box<dyn GestureRecognizer> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{BodyJoint, SubjectBuffer, TrackingData};
    use approx::assert_abs_diff_eq;

    fn user_rotated(euler: Vec3) -> SubjectBuffer {
        let mut frame = TrackingData::body(0.0);
        frame.set_orientation(BodyJoint::Torso, rotation_from_euler_degrees(&euler), 0.9);
        let mut user = SubjectBuffer::user(1, 4);
        user.push_frame(frame);
        user
    }

    fn wrap_recognizer() -> JointOrientationRecognizer {
        JointOrientationRecognizer::new(
            BodyJoint::Torso,
            OrientationCriterion::EulerRange {
                min: Vec3::new(170.0, -90.0, -180.0),
                max: Vec3::new(-170.0, 90.0, 180.0),
            },
            RecognizerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_wrap_segment_accepts_both_sides() {
        let mut rec = wrap_recognizer();
        for x in [179.0, -179.0] {
            let user = user_rotated(Vec3::new(x, 0.0, 0.0));
            assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::Recognized, "x = {x}");
        }
        let user = user_rotated(Vec3::zeros());
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::NotRecognized);
    }

    #[test]
    fn test_wrap_hint_takes_shorter_way() {
        let mut rec = wrap_recognizer();
        let user = user_rotated(Vec3::new(150.0, 0.0, 0.0));
        let mut hint = CorrectionHint::default();
        assert_eq!(
            rec.recognize_on_user(&user, Some(&mut hint)),
            RecognitionResult::NotRecognized
        );
        assert!(hint.is_angle);
        // 20° up to 170 is shorter than 40° down to -170.
        assert_abs_diff_eq!(hint.direction.x, 20.0, epsilon = 1e-2);
        assert_abs_diff_eq!(hint.direction.y, 0.0);

        let user = user_rotated(Vec3::new(-150.0, 0.0, 0.0));
        rec.recognize_on_user(&user, Some(&mut hint));
        assert_abs_diff_eq!(hint.direction.x, -20.0, epsilon = 1e-2);
    }

    #[test]
    fn test_hint_crosses_the_wrap() {
        assert_abs_diff_eq!(smallest_correction(-175.0, 10.0, 170.0), -15.0, epsilon = 1e-4);
        assert!(axis_in_range(-175.0, 170.0, -170.0));
        assert!(!axis_in_range(-165.0, 170.0, -170.0));
    }

    #[test]
    fn test_target_orientation() {
        let mut rec = JointOrientationRecognizer::new(
            BodyJoint::Torso,
            OrientationCriterion::Target {
                orientation: Vec3::new(0.0, 0.0, 90.0),
                max_angle_diff: 20.0,
            },
            RecognizerConfig::default(),
        )
        .unwrap();

        let close = user_rotated(Vec3::new(0.0, 0.0, 80.0));
        assert_eq!(rec.recognize_on_user(&close, None), RecognitionResult::Recognized);

        let far = user_rotated(Vec3::new(0.0, 0.0, 40.0));
        let mut hint = CorrectionHint::default();
        assert_eq!(
            rec.recognize_on_user(&far, Some(&mut hint)),
            RecognitionResult::NotRecognized
        );
        assert_abs_diff_eq!(hint.distance, -30.0, epsilon = 1e-2);
        assert_abs_diff_eq!(hint.direction.z, 50.0, epsilon = 1e-2);
    }

    #[test]
    fn test_target_hint_reaches_target_on_several_axes() {
        let goal = Vec3::new(30.0, 20.0, 90.0);
        let mut rec = JointOrientationRecognizer::new(
            BodyJoint::Torso,
            OrientationCriterion::Target {
                orientation: goal,
                max_angle_diff: 5.0,
            },
            RecognizerConfig::default(),
        )
        .unwrap();

        for observed in [Vec3::zeros(), Vec3::new(-10.0, -15.0, 170.0)] {
            let mut hint = CorrectionHint::default();
            assert_eq!(
                rec.recognize_on_user(&user_rotated(observed), Some(&mut hint)),
                RecognitionResult::NotRecognized
            );
            let corrected = rotation_from_euler_degrees(&(observed + hint.direction));
            let goal = rotation_from_euler_degrees(&goal);
            assert!(rotation_difference_deg(&corrected, &goal) < 0.5, "from {observed:?}");
        }
    }

    #[test]
    fn test_low_confidence() {
        let mut frame = TrackingData::body(0.0);
        frame.set_orientation(BodyJoint::Torso, Mat3::identity(), 0.2);
        let mut user = SubjectBuffer::user(1, 4);
        user.push_frame(frame);
        let mut rec = wrap_recognizer();
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::TrackingError);
    }
}
