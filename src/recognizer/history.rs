//! Caller-owned state for two-phase (history) recognizers.
//!
//! A history recognizer is first probed frame by frame. Once it reports
//! [`RecognitionResult::WaitingForLastStateToFinish`] the caller keeps a
//! snapshot of the frame where the movement started and passes it back on
//! every following call until the recognizer resolves.

use tracing::trace;

use crate::recognizer::{CorrectionHint, GestureRecognizer, RecognitionResult};
use crate::tracking::{Target, TrackingData};

/// Raw and filtered frames captured at the start of a movement.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub data: TrackingData,
    pub filtered_data: TrackingData,
}

/// Progress of one history recognizer for one subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HistoryAnchor {
    #[default]
    NoStart,
    Started(Box<FrameSnapshot>),
}

impl HistoryAnchor {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    pub fn reset(&mut self) {
        *self = Self::NoStart;
    }

    /// Evaluate `recognizer` for the current frame of `target`.
    ///
    /// Recognizers without history are evaluated directly and leave the
    /// anchor untouched.
    pub fn recognize(
        &mut self,
        recognizer: &mut dyn GestureRecognizer,
        target: Target<'_>,
        hint: Option<&mut CorrectionHint>,
    ) -> RecognitionResult {
        if !recognizer.use_history() {
            return recognizer.recognize(target, hint);
        }

        match self {
            Self::NoStart => {
                let result = recognizer.recognize(target, hint);
                if result == RecognitionResult::WaitingForLastStateToFinish {
                    // The movement was detected between the last and the current frame.
                    trace!(subject = target.id(), "history recognizer started");
                    *self = Self::Started(Box::new(FrameSnapshot {
                        data: target.last(false).clone(),
                        filtered_data: target.last(true).clone(),
                    }));
                }
                result
            }
            Self::Started(snapshot) => {
                let result = recognizer.recognize_with_history(
                    target,
                    &snapshot.data,
                    &snapshot.filtered_data,
                    hint,
                );
                if result != RecognitionResult::WaitingForLastStateToFinish {
                    *self = Self::NoStart;
                }
                result
            }
        }
    }
}
