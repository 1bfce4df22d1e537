//! Linear movement of a joint, optionally relative to another joint.
//!
//! The plain form checks the instantaneous velocity between the last and
//! the current frame. The length form additionally accumulates the path
//! from a start frame kept by the caller and uses the history protocol.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::math::{MIN_TIME_STEP, Vec3, angle_between_deg, in_range_scalar};
use crate::recognizer::{
    ChangeDirection, ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult,
    RecognizerConfig, confident_position, direction_of, fill_hint, measurement_scale,
    tracking_error,
};
use crate::tracking::{BodyMeasurement, Hand, Joint, SkeletonKind, Target, TrackingData, User};

/// Velocity window and direction of a linear movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearMovementParams {
    /// Expected movement direction; any direction when `None`.
    pub direction: Option<Vec3>,
    pub min_velocity: f32,
    pub max_velocity: f32,
    /// Maximum deviation (degrees) from `direction`.
    pub max_angle_diff: f32,
    /// Measure only the displacement component along `direction`.
    pub use_only_correct_direction_component: bool,
    pub measuring_unit: Option<BodyMeasurement>,
}

impl Default for LinearMovementParams {
    fn default() -> Self {
        Self {
            direction: None,
            min_velocity: 0.0,
            max_velocity: f32::INFINITY,
            max_angle_diff: 45.0,
            use_only_correct_direction_component: true,
            measuring_unit: None,
        }
    }
}

impl LinearMovementParams {
    pub fn velocity(min_velocity: f32, max_velocity: f32) -> Self {
        Self {
            min_velocity,
            max_velocity,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_max_angle_diff(mut self, max_angle_diff: f32) -> Self {
        self.max_angle_diff = max_angle_diff;
        self
    }

    pub fn with_full_vector(mut self) -> Self {
        self.use_only_correct_direction_component = false;
        self
    }

    pub fn with_measuring_unit(mut self, unit: BodyMeasurement) -> Self {
        self.measuring_unit = Some(unit);
        self
    }
}

/// Path length window for the history form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthBounds {
    pub min_length: f32,
    pub max_length: f32,
    pub measuring_unit: Option<BodyMeasurement>,
}

impl Default for LengthBounds {
    fn default() -> Self {
        Self {
            min_length: 0.0,
            max_length: f32::INFINITY,
            measuring_unit: None,
        }
    }
}

impl LengthBounds {
    pub fn new(min_length: f32, max_length: f32) -> Self {
        Self {
            min_length,
            max_length,
            measuring_unit: None,
        }
    }

    pub fn with_measuring_unit(mut self, unit: BodyMeasurement) -> Self {
        self.measuring_unit = Some(unit);
        self
    }
}

/// Movement length along the configured direction and deviation from it.
#[derive(Debug, Clone, Copy)]
struct Motion {
    length: f32,
    angle_diff: f32,
}

/// Recognizes linear joint movements.
#[derive(Debug, Clone)]
pub struct LinearMovementRecognizer {
    joint: Joint,
    rel_joint: Option<Joint>,
    params: LinearMovementParams,
    direction: Option<Vec3>,
    length: Option<LengthBounds>,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl LinearMovementRecognizer {
    pub fn new(
        joint: impl Into<Joint>,
        rel_joint: Option<Joint>,
        params: LinearMovementParams,
        config: RecognizerConfig,
    ) -> Result<Self> {
        let joint = joint.into();
        if params.min_velocity > params.max_velocity {
            return Err(RecognizerError::InvalidRange {
                what: "linear velocity",
                min: params.min_velocity,
                max: params.max_velocity,
            });
        }
        let direction = match params.direction {
            Some(d) => Some(d.try_normalize(f32::EPSILON).ok_or(RecognizerError::ZeroDirection)?),
            None => None,
        };
        let joints: Vec<Joint> = std::iter::once(joint).chain(rel_joint).collect();
        Ok(Self {
            joint,
            rel_joint,
            params,
            direction,
            length: None,
            config,
            target: SkeletonKind::for_joints(&joints)?,
        })
    }

    /// Require a total path length; switches the recognizer to the history protocol.
    pub fn with_length(mut self, length: LengthBounds) -> Result<Self> {
        if length.min_length > length.max_length {
            return Err(RecognizerError::InvalidRange {
                what: "movement length",
                min: length.min_length,
                max: length.max_length,
            });
        }
        self.length = Some(length);
        Ok(self)
    }

    /// Joint displacement from `start` to `end`, `None` on low confidence.
    fn displacement(&self, start: &TrackingData, end: &TrackingData) -> Option<Vec3> {
        let mut vector = confident_position(end, self.joint, &self.config)?
            - confident_position(start, self.joint, &self.config)?;
        if let Some(rel) = self.rel_joint {
            vector -= confident_position(end, rel, &self.config)?
                - confident_position(start, rel, &self.config)?;
        }
        Some(vector)
    }

    fn motion(&self, vector: &Vec3) -> Motion {
        match self.direction {
            Some(direction) => Motion {
                length: if self.params.use_only_correct_direction_component {
                    vector.dot(&direction)
                } else {
                    vector.norm()
                },
                angle_diff: angle_between_deg(vector, &direction),
            },
            None => Motion {
                length: vector.norm(),
                angle_diff: 0.0,
            },
        }
    }

    /// Instantaneous velocity and direction test between the last and current frame.
    fn check_velocity(&self, target: &Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        let filtered = self.config.use_filtered_data;
        let last = target.last(filtered);
        let current = target.current(filtered);
        let Some(vector) = self.displacement(last, current) else {
            return tracking_error("linear_movement", target);
        };
        let Some(scale) = measurement_scale(target, self.params.measuring_unit, &self.config) else {
            return tracking_error("linear_movement", target);
        };

        let time_diff = (current.timestamp - last.timestamp).max(MIN_TIME_STEP) as f32;
        let vector = vector / scale;
        let motion = self.motion(&vector);
        let velocity = motion.length / time_diff;

        if !in_range_scalar(velocity, self.params.min_velocity, self.params.max_velocity) {
            let correction = if velocity < self.params.min_velocity {
                self.params.min_velocity - velocity
            } else {
                self.params.max_velocity - velocity
            };
            let axis = self
                .direction
                .or_else(|| vector.try_normalize(f32::EPSILON))
                .unwrap_or_else(Vec3::zeros);
            fill_hint(hint, || {
                self.hint(ChangeType::Speed, direction_of(correction), axis * correction, correction)
                    .measured_in(self.params.measuring_unit)
            });
            return RecognitionResult::NotRecognized;
        }

        if let Some(direction) = self.direction {
            if motion.angle_diff > self.params.max_angle_diff {
                // Velocity vector change that would point the movement along `direction`.
                let observed = vector / time_diff;
                let wanted = direction * observed.norm();
                fill_hint(hint, || {
                    self.hint(
                        ChangeType::Direction,
                        ChangeDirection::Different,
                        wanted - observed,
                        self.params.max_angle_diff - motion.angle_diff,
                    )
                });
                return RecognitionResult::NotRecognized;
            }
        }

        RecognitionResult::Recognized
    }

    fn evaluate(&self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }
        let result = self.check_velocity(&target, hint);
        if self.length.is_some() && result == RecognitionResult::Recognized {
            RecognitionResult::WaitingForLastStateToFinish
        } else {
            result
        }
    }

    fn evaluate_with_history(
        &self,
        target: Target<'_>,
        initial_data: &TrackingData,
        initial_filtered_data: &TrackingData,
        mut hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        let Some(length) = self.length else {
            return self.evaluate(target, hint);
        };
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }

        let result = self.check_velocity(&target, hint.as_deref_mut());
        if result != RecognitionResult::Recognized {
            return result;
        }

        let filtered = self.config.use_filtered_data;
        let start = if filtered {
            initial_filtered_data
        } else {
            initial_data
        };
        let Some(vector) = self.displacement(start, target.current(filtered)) else {
            return tracking_error("linear_movement", &target);
        };
        let Some(scale) = measurement_scale(&target, length.measuring_unit, &self.config) else {
            return tracking_error("linear_movement", &target);
        };
        let path = self.motion(&(vector / scale)).length;

        if path < length.min_length {
            RecognitionResult::WaitingForLastStateToFinish
        } else if path > length.max_length {
            let correction = length.max_length - path;
            fill_hint(hint, || {
                self.hint(ChangeType::Form, ChangeDirection::Less, Vec3::zeros(), correction)
                    .measured_in(length.measuring_unit)
            });
            RecognitionResult::NotRecognized
        } else {
            RecognitionResult::Recognized
        }
    }

    fn hint(
        &self,
        change_type: ChangeType,
        change_direction: ChangeDirection,
        direction: Vec3,
        distance: f32,
    ) -> CorrectionHint {
        CorrectionHint::new(change_type, change_direction)
            .for_joint(self.joint)
            .with_direction(direction)
            .with_distance(distance)
            .on_skeleton(self.target)
    }
}

impl GestureRecognizer for LinearMovementRecognizer {
    fn recognize_on_user(&mut self, user: &dyn User, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.evaluate(Target::User(user), hint)
    }

    fn recognize_on_hand(&mut self, hand: &dyn Hand, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        self.evaluate(Target::Hand(hand), hint)
    }

    fn recognize_with_history(
        &mut self,
        target: Target<'_>,
        initial_data: &TrackingData,
        initial_filtered_data: &TrackingData,
        hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        self.evaluate_with_history(target, initial_data, initial_filtered_data, hint)
    }

    fn use_history(&self) -> bool {
        self.length.is_some()
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
