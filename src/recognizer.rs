//! The recognizer contract and the single-frame geometric recognizers.
//!
//! Every recognizer implements [`GestureRecognizer`]. A recognizer that does
//! not apply to a skeleton kind keeps the default `NotRecognized` for it.

mod angular_movement;
mod config;
mod finger_count;
mod history;
mod joint_orientation;
mod joint_relation;
mod linear_movement;
mod result;

use std::fmt;

use tracing::trace;

use crate::math::{Mat3, Vec3};
use crate::tracking::{BodyMeasurement, Hand, Joint, SkeletonKind, Target, TrackingData, User};

pub use angular_movement::{AngularMovementRecognizer, AngularVelocityBounds};
pub use config::RecognizerConfig;
pub use finger_count::{FingerCountParams, FingerCountRecognizer};
pub use history::{FrameSnapshot, HistoryAnchor};
pub use joint_orientation::{JointOrientationRecognizer, OrientationCriterion};
pub use joint_relation::{JointRelationRecognizer, RelationBounds};
pub use linear_movement::{LengthBounds, LinearMovementParams, LinearMovementRecognizer};
pub use result::{ChangeDirection, ChangeType, CorrectionHint, RecognitionResult};

pub(crate) use result::{direction_of, fill_hint};

/// Common interface of all posture and gesture recognizers.
///
/// Recognition takes `&mut self` so recognizers may reuse scratch buffers;
/// use [`clone_box`](Self::clone_box) to get one instance per subject.
pub trait GestureRecognizer: fmt::Debug + Send {
    /// Evaluate the current frame of a full-body user.
    fn recognize_on_user(
        &mut self,
        user: &dyn User,
        hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        let _ = (user, hint);
        RecognitionResult::NotRecognized
    }

    /// Evaluate the current frame of a hand.
    fn recognize_on_hand(
        &mut self,
        hand: &dyn Hand,
        hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        let _ = (hand, hint);
        RecognitionResult::NotRecognized
    }

    /// Dispatch to the user or hand overload.
    fn recognize(&mut self, target: Target<'_>, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        match target {
            Target::User(user) => self.recognize_on_user(user, hint),
            Target::Hand(hand) => self.recognize_on_hand(hand, hint),
        }
    }

    /// Evaluate against a start frame kept by the caller.
    ///
    /// Only called when [`use_history`](Self::use_history) is true.
    fn recognize_with_history(
        &mut self,
        target: Target<'_>,
        initial_data: &TrackingData,
        initial_filtered_data: &TrackingData,
        hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        let _ = (target, initial_data, initial_filtered_data, hint);
        RecognitionResult::NotRecognized
    }

    /// Whether the caller has to drive the two-phase history protocol.
    fn use_history(&self) -> bool {
        false
    }

    fn config(&self) -> &RecognizerConfig;

    /// Skeleton kinds this recognizer applies to.
    fn target_skeleton(&self) -> SkeletonKind;

    fn clone_box(&self) -> Box<dyn GestureRecognizer>;
}

impl Clone for Box<dyn GestureRecognizer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Position of `joint` if it is tracked with enough confidence.
pub(crate) fn confident_position(
    frame: &TrackingData,
    joint: Joint,
    config: &RecognizerConfig,
) -> Option<Vec3> {
    frame
        .position(joint.index(), config.use_local_transformations)
        .filter(|p| p.confidence >= config.min_confidence)
        .map(|p| p.position)
}

/// Orientation of `joint` if it is tracked with enough confidence.
pub(crate) fn confident_orientation(
    frame: &TrackingData,
    joint: Joint,
    config: &RecognizerConfig,
) -> Option<Mat3> {
    frame
        .orientation(joint.index(), config.use_local_transformations)
        .filter(|o| o.confidence >= config.min_confidence)
        .map(|o| o.orientation)
}

/// Divisor that expresses lengths in `unit`.
///
/// `None` when the measurement is unreliable. Hands have no body
/// measurements and always use raw units.
pub(crate) fn measurement_scale(
    target: &Target<'_>,
    unit: Option<BodyMeasurement>,
    config: &RecognizerConfig,
) -> Option<f32> {
    let Some(unit) = unit else {
        return Some(1.0);
    };
    match target.body_measurement(unit) {
        None => Some(1.0),
        Some(m) if m.confidence >= config.min_confidence && m.distance > 0.0 => Some(m.distance),
        Some(_) => None,
    }
}

#[inline]
pub(crate) fn tracking_error(recognizer: &'static str, target: &Target<'_>) -> RecognitionResult {
    trace!(recognizer, subject = target.id(), "tracking confidence too low");
    RecognitionResult::TrackingError
}
