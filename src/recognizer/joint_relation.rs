//! Static relation between two joints.
//!
//! Tests the vector `joint - rel_joint` (or the joint position alone)
//! against a box and a length interval. An optional mid joint adds a second
//! test on its perpendicular offset from the `rel_joint -> joint` segment,
//! e.g. the elbow relative to the shoulder-wrist line.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::math::{Vec3, in_range, perpendicular_offset};
use crate::recognizer::{
    ChangeDirection, ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult,
    RecognizerConfig, confident_position, direction_of, fill_hint, measurement_scale,
    tracking_error,
};
use crate::tracking::{BodyMeasurement, Hand, Joint, SkeletonKind, Target, User};

/// Accepted region for a relation vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Express the vector in this body measurement instead of raw units.
    pub measuring_unit: Option<BodyMeasurement>,
}

impl Default for RelationBounds {
    fn default() -> Self {
        Self {
            min: Vec3::repeat(f32::NEG_INFINITY),
            max: Vec3::repeat(f32::INFINITY),
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            measuring_unit: None,
        }
    }
}

impl RelationBounds {
    /// Bounds on the vector length only.
    pub fn distance(min_distance: f32, max_distance: f32) -> Self {
        Self {
            min_distance,
            max_distance,
            ..Self::default()
        }
    }

    /// Bounds on the vector components only.
    pub fn boxed(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    pub fn with_distance(mut self, min_distance: f32, max_distance: f32) -> Self {
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self
    }

    pub fn with_measuring_unit(mut self, unit: BodyMeasurement) -> Self {
        self.measuring_unit = Some(unit);
        self
    }

    fn validate(&self) -> Result<()> {
        for i in 0..3 {
            if self.min[i] > self.max[i] {
                return Err(RecognizerError::InvalidRange {
                    what: "relation box",
                    min: self.min[i],
                    max: self.max[i],
                });
            }
        }
        if self.min_distance > self.max_distance {
            return Err(RecognizerError::InvalidRange {
                what: "relation distance",
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        Ok(())
    }

    /// Correction toward the accepted region, `None` when `vector` is inside.
    fn violation(&self, vector: &Vec3) -> Option<(Vec3, f32)> {
        let mut correction = Vec3::zeros();
        for i in 0..3 {
            if vector[i] < self.min[i] {
                correction[i] = self.min[i] - vector[i];
            } else if vector[i] > self.max[i] {
                correction[i] = self.max[i] - vector[i];
            }
        }

        let length = vector.norm();
        let distance = if length < self.min_distance {
            self.min_distance - length
        } else if length > self.max_distance {
            self.max_distance - length
        } else {
            0.0
        };

        let inside = in_range(vector, &self.min, &self.max) && distance == 0.0;
        (!inside).then_some((correction, distance))
    }
}

/// Recognizes a static relation between joints.
#[derive(Debug, Clone)]
pub struct JointRelationRecognizer {
    joint: Joint,
    rel_joint: Option<Joint>,
    bounds: RelationBounds,
    mid: Option<(Joint, RelationBounds)>,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl JointRelationRecognizer {
    pub fn new(
        joint: impl Into<Joint>,
        rel_joint: Option<Joint>,
        bounds: RelationBounds,
        config: RecognizerConfig,
    ) -> Result<Self> {
        let joint = joint.into();
        bounds.validate()?;
        let joints: Vec<Joint> = std::iter::once(joint).chain(rel_joint).collect();
        let target = SkeletonKind::for_joints(&joints)?;
        Ok(Self {
            joint,
            rel_joint,
            bounds,
            mid: None,
            config,
            target,
        })
    }

    /// Add a test on the perpendicular offset of `mid_joint` from the
    /// `rel_joint -> joint` segment.
    pub fn with_mid_joint(mut self, mid_joint: impl Into<Joint>, bounds: RelationBounds) -> Result<Self> {
        let mid_joint = mid_joint.into();
        bounds.validate()?;
        let joints: Vec<Joint> = [self.joint, mid_joint]
            .into_iter()
            .chain(self.rel_joint)
            .collect();
        self.target = SkeletonKind::for_joints(&joints)?;
        self.mid = Some((mid_joint, bounds));
        Ok(self)
    }

    fn evaluate(&self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }

        let frame = target.current(self.config.use_filtered_data);
        let Some(joint_pos) = confident_position(frame, self.joint, &self.config) else {
            return tracking_error("joint_relation", &target);
        };
        let rel_pos = match self.rel_joint {
            Some(rel) => match confident_position(frame, rel, &self.config) {
                Some(p) => p,
                None => return tracking_error("joint_relation", &target),
            },
            None => Vec3::zeros(),
        };
        let Some(scale) = measurement_scale(&target, self.bounds.measuring_unit, &self.config) else {
            return tracking_error("joint_relation", &target);
        };

        let vector = (joint_pos - rel_pos) / scale;
        if let Some((correction, distance)) = self.bounds.violation(&vector) {
            fill_hint(hint, || {
                self.hint(self.joint, correction, distance, self.bounds.measuring_unit)
            });
            return RecognitionResult::NotRecognized;
        }

        if let Some((mid_joint, mid_bounds)) = &self.mid {
            let Some(mid_pos) = confident_position(frame, *mid_joint, &self.config) else {
                return tracking_error("joint_relation", &target);
            };
            let Some(mid_scale) = measurement_scale(&target, mid_bounds.measuring_unit, &self.config)
            else {
                return tracking_error("joint_relation", &target);
            };
            let offset = perpendicular_offset(&mid_pos, &rel_pos, &joint_pos) / mid_scale;
            if let Some((correction, distance)) = mid_bounds.violation(&offset) {
                fill_hint(hint, || {
                    self.hint(*mid_joint, correction, distance, mid_bounds.measuring_unit)
                });
                return RecognitionResult::NotRecognized;
            }
        }

        RecognitionResult::Recognized
    }

    fn hint(
        &self,
        joint: Joint,
        correction: Vec3,
        distance: f32,
        unit: Option<BodyMeasurement>,
    ) -> CorrectionHint {
        let change_direction = if distance != 0.0 {
            direction_of(distance)
        } else {
            ChangeDirection::Different
        };
        CorrectionHint::new(ChangeType::Pose, change_direction)
            .for_joint(joint)
            .with_direction(correction)
            .with_distance(distance)
            .measured_in(unit)
            .on_skeleton(self.target)
    }
}

impl GestureRecognizer for JointRelationRecognizer {
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
