//! Skeleton tracking data model and the provider contract.

mod buffer;
mod data;
mod joint;
mod provider;

pub use buffer::{DEFAULT_HISTORY_CAPACITY, SubjectBuffer};
pub use data::{
    BODY_MEASUREMENT_COUNT, BodyMeasurement, BodyMeasurementDistance, JointOrientation,
    JointPosition, TrackingData,
};
pub use joint::{
    BODY_JOINT_COUNT, BodyJoint, HAND_JOINT_COUNT, HandJoint, HandSide, Joint, SkeletonKind,
};
pub use provider::{Hand, Target, TrackedSubject, User};
