//! Contract with the tracking provider.
//!
//! The provider owns the frame history of every tracked user and hand. The
//! recognizers only read from it.

use crate::tracking::data::{BodyMeasurement, BodyMeasurementDistance, TrackingData};
use crate::tracking::joint::{HandSide, SkeletonKind};

/// Frame accessors shared by users and hands.
pub trait TrackedSubject {
    fn id(&self) -> u32;

    /// Whether the provider currently tracks this subject.
    fn is_tracked(&self) -> bool;

    fn current_tracking_data(&self) -> &TrackingData;
    fn last_tracking_data(&self) -> &TrackingData;
    fn current_filtered_tracking_data(&self) -> &TrackingData;
    fn last_filtered_tracking_data(&self) -> &TrackingData;

    /// Recent raw frames, oldest first, ending with the current frame.
    fn tracking_history(&self) -> &[TrackingData];

    /// Recent filtered frames, oldest first, ending with the current frame.
    fn filtered_tracking_history(&self) -> &[TrackingData];
}

/// A tracked full-body user.
pub trait User: TrackedSubject {
    fn body_measurement(&self, measurement: BodyMeasurement) -> BodyMeasurementDistance;

    /// Recent finger count samples of one hand, oldest first. `-1` means unknown.
    fn finger_counts(&self, side: HandSide) -> &[i32];
}

/// A tracked hand.
pub trait Hand: TrackedSubject {
    /// Recent finger count samples, oldest first. `-1` means unknown.
    fn finger_counts(&self) -> &[i32];
}

/// The subject a recognizer is evaluated on.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    User(&'a dyn User),
    Hand(&'a dyn Hand),
}

impl<'a> Target<'a> {
    pub fn kind(&self) -> SkeletonKind {
        match self {
            Self::User(_) => SkeletonKind::Body,
            Self::Hand(_) => SkeletonKind::Hand,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::User(u) => u.id(),
            Self::Hand(h) => h.id(),
        }
    }

    pub fn is_tracked(&self) -> bool {
        match self {
            Self::User(u) => u.is_tracked(),
            Self::Hand(h) => h.is_tracked(),
        }
    }

    /// Current frame, filtered or raw.
    pub fn current(&self, filtered: bool) -> &'a TrackingData {
        match (self, filtered) {
            (Self::User(u), false) => u.current_tracking_data(),
            (Self::User(u), true) => u.current_filtered_tracking_data(),
            (Self::Hand(h), false) => h.current_tracking_data(),
            (Self::Hand(h), true) => h.current_filtered_tracking_data(),
        }
    }

    /// Previous frame, filtered or raw.
    pub fn last(&self, filtered: bool) -> &'a TrackingData {
        match (self, filtered) {
            (Self::User(u), false) => u.last_tracking_data(),
            (Self::User(u), true) => u.last_filtered_tracking_data(),
            (Self::Hand(h), false) => h.last_tracking_data(),
            (Self::Hand(h), true) => h.last_filtered_tracking_data(),
        }
    }

    /// Frame history, filtered or raw, oldest first.
    pub fn history(&self, filtered: bool) -> &'a [TrackingData] {
        match (self, filtered) {
            (Self::User(u), false) => u.tracking_history(),
            (Self::User(u), true) => u.filtered_tracking_history(),
            (Self::Hand(h), false) => h.tracking_history(),
            (Self::Hand(h), true) => h.filtered_tracking_history(),
        }
    }

    /// Body measurement of a user. Hands carry none.
    pub fn body_measurement(&self, measurement: BodyMeasurement) -> Option<BodyMeasurementDistance> {
        match self {
            Self::User(u) => Some(u.body_measurement(measurement)),
            Self::Hand(_) => None,
        }
    }
}
