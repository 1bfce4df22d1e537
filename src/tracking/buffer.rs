//! In-memory frame history implementing the provider traits.
//!
//! A tracking middleware binding pushes one frame per update; recognizers
//! read the buffer through [`User`] or [`Hand`].

use crate::tracking::data::{
    BODY_MEASUREMENT_COUNT, BodyMeasurement, BodyMeasurementDistance, TrackingData,
};
use crate::tracking::joint::{HandSide, SkeletonKind};
use crate::tracking::provider::{Hand, Target, TrackedSubject, User};

/// Default number of frames kept per subject.
pub const DEFAULT_HISTORY_CAPACITY: usize = 300;

/// Finger count samples kept per hand.
const FINGER_HISTORY_CAPACITY: usize = 64;

/// Bounded frame history of one user or hand.
#[derive(Debug, Clone)]
pub struct SubjectBuffer {
    id: u32,
    kind: SkeletonKind,
    side: HandSide,
    tracked: bool,
    capacity: usize,
    frames: Vec<TrackingData>,
    filtered_frames: Vec<TrackingData>,
    empty: TrackingData,
    measurements: [BodyMeasurementDistance; BODY_MEASUREMENT_COUNT],
    finger_counts: [Vec<i32>; 2],
}

impl SubjectBuffer {
    /// Create a buffer for a full-body user.
    pub fn user(id: u32, capacity: usize) -> Self {
        Self::new(id, SkeletonKind::Body, HandSide::Right, capacity)
    }

    /// Create a buffer for a single hand.
    pub fn hand(id: u32, side: HandSide, capacity: usize) -> Self {
        Self::new(id, SkeletonKind::Hand, side, capacity)
    }

    fn new(id: u32, kind: SkeletonKind, side: HandSide, capacity: usize) -> Self {
        let empty = match kind {
            SkeletonKind::Hand => TrackingData::hand(0.0),
            _ => TrackingData::body(0.0),
        };
        Self {
            id,
            kind,
            side,
            tracked: true,
            capacity: capacity.max(2),
            frames: Vec::new(),
            filtered_frames: Vec::new(),
            empty,
            measurements: [BodyMeasurementDistance::default(); BODY_MEASUREMENT_COUNT],
            finger_counts: [Vec::new(), Vec::new()],
        }
    }

    pub fn kind(&self) -> SkeletonKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append a frame, using it as its own filtered counterpart.
    pub fn push_frame(&mut self, frame: TrackingData) {
        let filtered = frame.clone();
        self.push_frames(frame, filtered);
    }

    /// Append a raw frame together with its filtered counterpart.
    pub fn push_frames(&mut self, raw: TrackingData, filtered: TrackingData) {
        self.frames.push(raw);
        self.filtered_frames.push(filtered);
        if self.frames.len() > self.capacity {
            let excess = self.frames.len() - self.capacity;
            self.frames.drain(..excess);
            self.filtered_frames.drain(..excess);
        }
    }

    pub fn set_tracked(&mut self, tracked: bool) {
        self.tracked = tracked;
    }

    pub fn set_body_measurement(&mut self, measurement: BodyMeasurement, distance: f32, confidence: f32) {
        self.measurements[measurement.index()] = BodyMeasurementDistance {
            distance,
            confidence,
        };
    }

    /// Record a finger count sample. Hand buffers ignore `side` and use their own.
    pub fn push_finger_count(&mut self, side: HandSide, count: i32) {
        let side = match self.kind {
            SkeletonKind::Hand => self.side,
            _ => side,
        };
        let samples = &mut self.finger_counts[side_slot(side)];
        samples.push(count);
        if samples.len() > FINGER_HISTORY_CAPACITY {
            samples.remove(0);
        }
    }

    /// Drop all frames and finger samples.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.filtered_frames.clear();
        self.finger_counts.iter_mut().for_each(Vec::clear);
    }

    /// View this buffer as a recognition target of its own kind.
    pub fn target(&self) -> Target<'_> {
        match self.kind {
            SkeletonKind::Hand => Target::Hand(self),
            _ => Target::User(self),
        }
    }

    fn newest(frames: &[TrackingData], back: usize) -> Option<&TrackingData> {
        frames.len().checked_sub(back + 1).map(|i| &frames[i])
    }
}

fn side_slot(side: HandSide) -> usize {
    match side {
        HandSide::Left => 0,
        HandSide::Right => 1,
    }
}

impl TrackedSubject for SubjectBuffer {
    fn id(&self) -> u32 {
        self.id
    }

    fn is_tracked(&self) -> bool {
        self.tracked && !self.frames.is_empty()
    }

    fn current_tracking_data(&self) -> &TrackingData {
        Self::newest(&self.frames, 0).unwrap_or(&self.empty)
    }

    fn last_tracking_data(&self) -> &TrackingData {
        Self::newest(&self.frames, 1).unwrap_or_else(|| self.current_tracking_data())
    }

    fn current_filtered_tracking_data(&self) -> &TrackingData {
        Self::newest(&self.filtered_frames, 0).unwrap_or(&self.empty)
    }

    fn last_filtered_tracking_data(&self) -> &TrackingData {
        Self::newest(&self.filtered_frames, 1)
            .unwrap_or_else(|| self.current_filtered_tracking_data())
    }

    fn tracking_history(&self) -> &[TrackingData] {
        &self.frames
    }

    fn filtered_tracking_history(&self) -> &[TrackingData] {
        &self.filtered_frames
    }
}

impl User for SubjectBuffer {
    fn body_measurement(&self, measurement: BodyMeasurement) -> BodyMeasurementDistance {
        self.measurements[measurement.index()]
    }

    fn finger_counts(&self, side: HandSide) -> &[i32] {
        &self.finger_counts[side_slot(side)]
    }
}

impl Hand for SubjectBuffer {
    fn finger_counts(&self) -> &[i32] {
        &self.finger_counts[side_slot(self.side)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_and_last() {
        let mut buffer = SubjectBuffer::user(1, 10);
        assert!(!buffer.is_tracked());
        buffer.push_frame(TrackingData::body(0.0));
        assert_eq!(buffer.last_tracking_data().timestamp, 0.0);
        buffer.push_frame(TrackingData::body(0.1));
        buffer.push_frame(TrackingData::body(0.2));
        assert!(buffer.is_tracked());
        assert_eq!(buffer.current_tracking_data().timestamp, 0.2);
        assert_eq!(buffer.last_tracking_data().timestamp, 0.1);
        assert_eq!(buffer.last_filtered_tracking_data().timestamp, 0.1);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut buffer = SubjectBuffer::user(1, 3);
        for i in 0..10 {
            buffer.push_frame(TrackingData::body(i as f64));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.tracking_history()[0].timestamp, 7.0);
        assert_eq!(buffer.filtered_tracking_history().len(), 3);
    }

    #[test]
    fn test_hand_finger_counts_use_own_side() {
        let mut hand = SubjectBuffer::hand(4, HandSide::Left, 10);
        hand.push_finger_count(HandSide::Right, 3);
        assert_eq!(Hand::finger_counts(&hand), &[3]);
        assert!(User::finger_counts(&hand, HandSide::Right).is_empty());
    }

    #[test]
    fn test_target_kind() {
        let user = SubjectBuffer::user(1, 10);
        let hand = SubjectBuffer::hand(2, HandSide::Right, 10);
        assert_eq!(user.target().kind(), SkeletonKind::Body);
        assert_eq!(hand.target().kind(), SkeletonKind::Hand);
    }
}
