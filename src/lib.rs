//! Posture and gesture recognition on skeletal tracking streams.
//!
//! A tracking middleware fills a [`SubjectBuffer`] (or implements [`User`] /
//! [`Hand`] itself) once per frame. Recognizers read the current frame and
//! history of a subject and return a [`RecognitionResult`], optionally with a
//! [`CorrectionHint`] telling the user what to change.

pub mod combination;
pub mod error;
pub mod math;
pub mod recognizer;
pub mod template;
pub mod tracking;

pub use combination::CombinationRecognizer;
pub use error::{RecognizerError, Result};
pub use math::{Mat3, Vec3};
pub use recognizer::{
    AngularMovementRecognizer, AngularVelocityBounds, ChangeDirection, ChangeType,
    CorrectionHint, FingerCountParams, FingerCountRecognizer, FrameSnapshot, GestureRecognizer,
    HistoryAnchor, JointOrientationRecognizer, JointRelationRecognizer, LengthBounds,
    LinearMovementParams, LinearMovementRecognizer, OrientationCriterion, RecognitionResult,
    RecognizerConfig, RelationBounds,
};
pub use template::{
    AxisMask, DistanceMeasure, TemplateJoint, TemplateParams, TemplateRecognizer,
};
pub use tracking::{
    BodyJoint, BodyMeasurement, BodyMeasurementDistance, Hand, HandJoint, HandSide, Joint,
    SkeletonKind, SubjectBuffer, Target, TrackedSubject, TrackingData, User,
};
