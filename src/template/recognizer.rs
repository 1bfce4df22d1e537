//! Trajectory matching against recorded examples.

use nalgebra::{Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{RecognizerError, Result};
use crate::math::{Vec3, rotation_vector_deg};
use crate::recognizer::{
    ChangeDirection, ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult,
    RecognizerConfig, confident_orientation, confident_position, fill_hint, tracking_error,
};
use crate::template::dtw::{DistanceMeasure, Dtw};
use crate::template::normalize::{
    AxisMask, TemplateData, apply_mask, center, indicative_orientation, scale_to_unit_cube,
};
use crate::tracking::{Hand, HandJoint, Joint, SkeletonKind, Target, TrackingData, User};

/// A joint whose trajectory is matched, optionally relative to another joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateJoint {
    pub joint: Joint,
    pub rel_joint: Option<Joint>,
}

impl TemplateJoint {
    pub fn new(joint: impl Into<Joint>) -> Self {
        Self {
            joint: joint.into(),
            rel_joint: None,
        }
    }

    pub fn relative_to(mut self, rel_joint: impl Into<Joint>) -> Self {
        self.rel_joint = Some(rel_joint.into());
        self
    }

    fn joints(&self) -> impl Iterator<Item = Joint> {
        std::iter::once(self.joint).chain(self.rel_joint)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateParams {
    /// Match rotation vector trajectories instead of positions.
    pub use_orientations: bool,
    pub ignored_axes: AxisMask,
    pub aspect_invariant: bool,
    /// Averaged DTW distance below which the gesture is recognized.
    pub max_distance: f32,
    pub distance_measure: DistanceMeasure,
    /// Largest rotation (degrees) removed from a live trajectory before matching.
    pub max_rotation: f32,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            use_orientations: false,
            ignored_axes: AxisMask::NONE,
            aspect_invariant: false,
            max_distance: 0.1,
            distance_measure: DistanceMeasure::Euclidean,
            max_rotation: 45.0,
        }
    }
}

impl TemplateParams {
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_max_rotation(mut self, max_rotation: f32) -> Self {
        self.max_rotation = max_rotation;
        self
    }

    pub fn with_ignored_axes(mut self, ignored: AxisMask) -> Self {
        self.ignored_axes = ignored;
        self
    }

    pub fn with_orientations(mut self) -> Self {
        self.use_orientations = true;
        self
    }

    pub fn with_aspect_invariance(mut self) -> Self {
        self.aspect_invariant = true;
        self
    }

    pub fn with_distance_measure(mut self, measure: DistanceMeasure) -> Self {
        self.distance_measure = measure;
        self
    }
}

/// Recognizes a gesture by its DTW distance to a recorded trajectory.
///
/// One template per joint is kept. With several training examples the one
/// closest to all others is used.
#[derive(Debug, Clone)]
pub struct TemplateRecognizer {
    joints: Vec<TemplateJoint>,
    templates: Vec<TemplateData>,
    params: TemplateParams,
    config: RecognizerConfig,
    target: SkeletonKind,
    dtw: Dtw,
}

impl TemplateRecognizer {
    /// Build from example trajectories, oldest frame first.
    pub fn new(
        joints: &[TemplateJoint],
        training: &[Vec<TrackingData>],
        params: TemplateParams,
        config: RecognizerConfig,
    ) -> Result<Self> {
        if joints.is_empty() {
            return Err(RecognizerError::NoJoints);
        }
        if training.is_empty() {
            return Err(RecognizerError::EmptyTrainingData);
        }
        let all: Vec<Joint> = joints.iter().flat_map(TemplateJoint::joints).collect();
        let target = SkeletonKind::for_joints(&all)?;

        let mut examples = Vec::with_capacity(training.len());
        for (index, frames) in training.iter().enumerate() {
            if frames.len() < 2 {
                return Err(RecognizerError::TrainingTooShort {
                    index,
                    frames: frames.len(),
                });
            }
            let mut per_joint = Vec::with_capacity(joints.len());
            for tracked in joints {
                let raw = extract(frames, tracked, &params, &config).ok_or(
                    RecognizerError::MissingTrainingJoint {
                        index,
                        joint: tracked.joint.index(),
                    },
                )?;
                per_joint.push(TemplateData::new(
                    raw,
                    params.ignored_axes,
                    params.aspect_invariant,
                    !params.use_orientations,
                ));
            }
            examples.push(per_joint);
        }

        let chosen = medoid(&examples, params.distance_measure);
        let templates = examples.swap_remove(chosen);
        let dtw = Dtw::new(templates[0].len());
        debug!(
            joints = joints.len(),
            examples = training.len(),
            chosen,
            template_len = templates[0].len(),
            warp = dtw.warp(),
            "template recognizer built"
        );

        Ok(Self {
            joints: joints.to_vec(),
            templates,
            params,
            config,
            target,
            dtw,
        })
    }

    /// Build from hand joint trajectories.
    pub fn for_hand(
        joints: &[HandJoint],
        training: &[Vec<TrackingData>],
        params: TemplateParams,
        config: RecognizerConfig,
    ) -> Result<Self> {
        let joints: Vec<TemplateJoint> = joints.iter().map(|&j| TemplateJoint::new(j)).collect();
        Self::new(&joints, training, params, config)
    }

    /// Number of frames of the stored template.
    pub fn template_len(&self) -> usize {
        self.templates[0].len()
    }

    /// Normalized live trajectory of one joint, `None` if a rotation
    /// larger than `max_rotation` would be needed.
    fn live_sequence(
        &self,
        window: &[TrackingData],
        tracked: &TemplateJoint,
        template: &TemplateData,
    ) -> Option<Vec<Vec3>> {
        let mut live = extract(window, tracked, &self.params, &self.config)?;
        apply_mask(&mut live, self.params.ignored_axes);
        if !self.params.use_orientations {
            center(&mut live);
            let from = indicative_orientation(&live);
            if let (Some(from), Some(to)) = (from, template.indicative_orientation) {
                let rotation = rotation_between(&from, &to);
                let angle = rotation.angle().to_degrees();
                if angle > self.params.max_rotation {
                    trace!(angle, max = self.params.max_rotation, "template rotation rejected");
                    return None;
                }
                live.iter_mut().for_each(|v| *v = rotation * *v);
            }
        }
        scale_to_unit_cube(&mut live, self.params.aspect_invariant);
        Some(live)
    }

    fn endpoints_confident(&self, window: &[TrackingData]) -> bool {
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return false;
        };
        self.joints.iter().flat_map(TemplateJoint::joints).all(|joint| {
            [first, last].iter().all(|frame| {
                if self.params.use_orientations {
                    confident_orientation(frame, joint, &self.config).is_some()
                } else {
                    confident_position(frame, joint, &self.config).is_some()
                }
            })
        })
    }

    fn evaluate(&mut self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if !self.target.accepts(target.kind()) {
            return RecognitionResult::NotRecognized;
        }
        let history = target.history(self.config.use_filtered_data);
        if history.len() < 2 {
            return RecognitionResult::NotRecognized;
        }
        let window_len = history.len().min(self.template_len() + self.dtw.warp());
        let window = &history[history.len() - window_len..];
        if !self.endpoints_confident(window) {
            return tracking_error("template", &target);
        }

        let mut total = 0.0;
        for (tracked, template) in self.joints.iter().zip(&self.templates) {
            let distance = match self.live_sequence(window, tracked, template) {
                Some(live) => self.dtw.distance(&template.sequence, &live, self.params.distance_measure),
                None => f32::INFINITY,
            };
            total += distance;
        }
        let distance = total / self.joints.len() as f32;

        if distance < self.params.max_distance {
            return RecognitionResult::Recognized;
        }
        fill_hint(hint, || {
            let mut hint = CorrectionHint::new(ChangeType::Form, ChangeDirection::Different)
                .for_joint(self.joints[0].joint)
                .with_distance(distance)
                .on_skeleton(self.target);
            hint.is_angle = self.params.use_orientations;
            hint
        });
        RecognitionResult::NotRecognized
    }
}

/// Raw trajectory of one joint. Orientations are rotation vectors in degrees.
fn extract(
    frames: &[TrackingData],
    tracked: &TemplateJoint,
    params: &TemplateParams,
    config: &RecognizerConfig,
) -> Option<Vec<Vec3>> {
    let local = config.use_local_transformations;
    frames
        .iter()
        .map(|frame| {
            if params.use_orientations {
                let orientation = frame.orientation(tracked.joint.index(), local)?.orientation;
                let relative = match tracked.rel_joint {
                    Some(rel) => frame.orientation(rel.index(), local)?.orientation.transpose() * orientation,
                    None => orientation,
                };
                Some(rotation_vector_deg(&relative))
            } else {
                let position = frame.position(tracked.joint.index(), local)?.position;
                match tracked.rel_joint {
                    Some(rel) => Some(position - frame.position(rel.index(), local)?.position),
                    None => Some(position),
                }
            }
        })
        .collect()
}

/// Shortest rotation taking `from` onto `to`; half a turn for opposite vectors.
fn rotation_between(from: &Vec3, to: &Vec3) -> UnitQuaternion<f32> {
    UnitQuaternion::rotation_between(from, to).unwrap_or_else(|| {
        let helper = if from.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        let axis = Unit::new_normalize(from.cross(&helper));
        UnitQuaternion::from_axis_angle(&axis, std::f32::consts::PI)
    })
}

/// Index of the example with the smallest summed distance to all others.
fn medoid(examples: &[Vec<TemplateData>], measure: DistanceMeasure) -> usize {
    if examples.len() < 2 {
        return 0;
    }
    let cost = |a: &[TemplateData], b: &[TemplateData]| -> f32 {
        a.iter()
            .zip(b)
            .map(|(ta, tb)| Dtw::new(ta.len()).distance(&ta.sequence, &tb.sequence, measure))
            .sum()
    };
    (0..examples.len())
        .map(|i| {
            let total: f32 = (0..examples.len())
                .filter(|&j| j != i)
                .map(|j| cost(&examples[i][..], &examples[j][..]))
                .sum();
            (i, total)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}

impl GestureRecognizer for TemplateRecognizer {
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
