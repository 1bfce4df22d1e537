//! Construction-time errors.
//!
//! Recognition itself never fails: every outcome, including low tracking
//! confidence, is a [`RecognitionResult`](crate::RecognitionResult) value.
//! Only malformed recognizer definitions are reported here.

use thiserror::Error;

use crate::tracking::{Joint, SkeletonKind};

/// Error raised while building a recognizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecognizerError {
    /// A recognizer mixed body joints and hand joints.
    #[error("recognizer mixes body joints and hand joints")]
    MixedSkeletonKinds,

    /// The joint cannot be used for the skeleton kind the recognizer targets.
    #[error("joint {joint:?} cannot be used on a {kind:?} skeleton")]
    InvalidJoint { joint: Joint, kind: SkeletonKind },

    /// A lower bound exceeds its upper bound.
    #[error("invalid range for {what}: min {min} > max {max}")]
    InvalidRange {
        what: &'static str,
        min: f32,
        max: f32,
    },

    /// The movement direction has zero length.
    #[error("movement direction must not be the zero vector")]
    ZeroDirection,

    /// The median window for finger counting is empty.
    #[error("median window size must be at least 1")]
    EmptyMedianWindow,

    /// No joints were given to a template recognizer.
    #[error("template recognizer needs at least one joint")]
    NoJoints,

    /// No training trajectories were given to a template recognizer.
    #[error("template recognizer needs at least one training trajectory")]
    EmptyTrainingData,

    /// A training trajectory is too short to be normalized.
    #[error("training trajectory {index} has {frames} frames, at least 2 are required")]
    TrainingTooShort { index: usize, frames: usize },

    /// A training frame does not contain the requested joint.
    #[error("training trajectory {index} is missing joint index {joint}")]
    MissingTrainingJoint { index: usize, joint: usize },
}

/// Result alias for recognizer construction.
pub type Result<T> = std::result::Result<T, RecognizerError>;
