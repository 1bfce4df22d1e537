//! Angular velocity of a joint around each axis.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::math::{MIN_TIME_STEP, Vec3, in_range, rotation_vector_deg};
use crate::recognizer::{
    ChangeDirection, ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult,
    RecognizerConfig, confident_orientation, fill_hint, tracking_error,
};
use crate::tracking::{Hand, Joint, SkeletonKind, Target, User};

/// Per-axis angular velocity window in degrees per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngularVelocityBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for AngularVelocityBounds {
    fn default() -> Self {
        Self {
            min: Vec3::repeat(f32::NEG_INFINITY),
            max: Vec3::repeat(f32::INFINITY),
        }
    }
}

impl AngularVelocityBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<()> {
        for i in 0..3 {
            if self.min[i] > self.max[i] {
                return Err(RecognizerError::InvalidRange {
                    what: "angular velocity",
                    min: self.min[i],
                    max: self.max[i],
                });
            }
        }
        Ok(())
    }
}

/// Recognizes joint rotations by their angular velocity.
///
/// The velocity is the rotation vector of the frame-to-frame rotation,
/// taken in the same frame as the joint orientations.
#[derive(Debug, Clone)]
pub struct AngularMovementRecognizer {
    joint: Joint,
    bounds: AngularVelocityBounds,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl AngularMovementRecognizer {
    pub fn new(
        joint: impl Into<Joint>,
        bounds: AngularVelocityBounds,
        config: RecognizerConfig,
    ) -> Result<Self> {
        let joint = joint.into();
        bounds.validate()?;
        Ok(Self {
            joint,
            bounds,
            config,
            target: SkeletonKind::for_joints(&[joint])?,
        })
    }

    fn evaluate(&self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }
        let filtered = self.config.use_filtered_data;
        let last = target.last(filtered);
        let current = target.current(filtered);
        let (Some(from), Some(to)) = (
            confident_orientation(last, self.joint, &self.config),
            confident_orientation(current, self.joint, &self.config),
        ) else {
            return tracking_error("angular_movement", &target);
        };

        let time_diff = (current.timestamp - last.timestamp).max(MIN_TIME_STEP) as f32;
        let delta = rotation_vector_deg(&(to * from.transpose()));
        let velocity = delta / time_diff;

        if in_range(&velocity, &self.bounds.min, &self.bounds.max) {
            return RecognitionResult::Recognized;
        }

        let correction = Vec3::from_fn(|i, _| {
            if velocity[i] < self.bounds.min[i] {
                self.bounds.min[i] - velocity[i]
            } else if velocity[i] > self.bounds.max[i] {
                self.bounds.max[i] - velocity[i]
            } else {
                0.0
            }
        });
        fill_hint(hint, || {
            let direction = match (correction.max() > 0.0, correction.min() < 0.0) {
                (true, false) => ChangeDirection::More,
                (false, true) => ChangeDirection::Less,
                _ => ChangeDirection::Different,
            };
            CorrectionHint::new(ChangeType::Speed, direction)
                .for_joint(self.joint)
                .with_direction(correction)
                .with_distance(correction.norm())
                .angular()
                .on_skeleton(self.target)
        });
        RecognitionResult::NotRecognized
    }
}

impl GestureRecognizer for AngularMovementRecognizer {
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
    use crate::math::{Mat3, rotation_from_euler_degrees};
    use crate::tracking::{BodyJoint, SubjectBuffer, TrackingData};
    use approx::assert_abs_diff_eq;
    use nalgebra::{Rotation3, Vector3};

    fn turning_between(from: Mat3, to: Mat3, dt: f64) -> SubjectBuffer {
        let mut user = SubjectBuffer::user(1, 4);
        for (time, orientation) in [(0.0, from), (dt, to)] {
            let mut frame = TrackingData::body(time);
            frame.set_orientation(BodyJoint::Head, orientation, 0.9);
            user.push_frame(frame);
        }
        user
    }

    fn turning(from: Vec3, to: Vec3, dt: f64) -> SubjectBuffer {
        turning_between(
            rotation_from_euler_degrees(&from),
            rotation_from_euler_degrees(&to),
            dt,
        )
    }

    fn head_turn(min_yaw_velocity: f32) -> AngularMovementRecognizer {
        let mut bounds = AngularVelocityBounds::default();
        bounds.min.z = min_yaw_velocity;
        AngularMovementRecognizer::new(BodyJoint::Head, bounds, RecognizerConfig::default()).unwrap()
    }

    #[test]
    fn test_turn_fast_enough() {
        let mut rec = head_turn(90.0);
        let user = turning(Vec3::zeros(), Vec3::new(0.0, 0.0, 20.0), 0.2);
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::Recognized);
    }

    #[test]
    fn test_turn_too_slow() {
        let mut rec = head_turn(90.0);
        let user = turning(Vec3::zeros(), Vec3::new(0.0, 0.0, 10.0), 0.2);
        let mut hint = CorrectionHint::default();
        assert_eq!(
            rec.recognize_on_user(&user, Some(&mut hint)),
            RecognitionResult::NotRecognized
        );
        assert_eq!(hint.change_type, ChangeType::Speed);
        assert_eq!(hint.change_direction, ChangeDirection::More);
        assert!(hint.is_angle);
        assert_abs_diff_eq!(hint.direction.z, 40.0, epsilon = 1e-2);
        assert_abs_diff_eq!(hint.direction.x, 0.0);
    }

    #[test]
    fn test_turn_across_the_wrap() {
        // 170° to -170° is a 20° turn, not -340°.
        let mut rec = head_turn(90.0);
        let user = turning(Vec3::new(0.0, 0.0, 170.0), Vec3::new(0.0, 0.0, -170.0), 0.2);
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::Recognized);
    }

    #[test]
    fn test_slow_turn_near_vertical_pitch() {
        // 1° about x from a nearly vertical pitch, where Euler angles jump.
        let from = rotation_from_euler_degrees(&Vec3::new(0.0, 89.5, 0.0));
        let nudge = Rotation3::from_axis_angle(&Vector3::x_axis(), 1.0f32.to_radians()).into_inner();
        let user = turning_between(from, nudge * from, 0.1);

        let bounds = AngularVelocityBounds::new(Vec3::repeat(-50.0), Vec3::repeat(50.0));
        let mut rec =
            AngularMovementRecognizer::new(BodyJoint::Head, bounds, RecognizerConfig::default()).unwrap();
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::Recognized);

        let mut fast = AngularVelocityBounds::default();
        fast.min.x = 15.0;
        let mut rec =
            AngularMovementRecognizer::new(BodyJoint::Head, fast, RecognizerConfig::default()).unwrap();
        let mut hint = CorrectionHint::default();
        assert_eq!(
            rec.recognize_on_user(&user, Some(&mut hint)),
            RecognitionResult::NotRecognized
        );
        // Measured 10°/s about x.
        assert_abs_diff_eq!(hint.direction, Vec3::new(5.0, 0.0, 0.0), epsilon = 0.05);
    }

    #[test]
    fn test_low_confidence_and_bounds() {
        let mut user = SubjectBuffer::user(1, 4);
        user.push_frame(TrackingData::body(0.0));
        user.push_frame(TrackingData::body(0.1));
        let mut rec = head_turn(0.0);
        assert_eq!(rec.recognize_on_user(&user, None), RecognitionResult::TrackingError);

        let inverted = AngularVelocityBounds::new(Vec3::repeat(1.0), Vec3::zeros());
        assert!(
            AngularMovementRecognizer::new(BodyJoint::Head, inverted, RecognizerConfig::default())
                .is_err()
        );
    }
}
