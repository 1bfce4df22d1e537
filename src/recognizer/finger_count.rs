//! Number of extended fingers reported by the tracking provider.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};
use crate::math::median;
use crate::recognizer::{
    ChangeType, CorrectionHint, GestureRecognizer, RecognitionResult, RecognizerConfig,
    confident_position, direction_of, fill_hint, tracking_error,
};
use crate::tracking::{BodyJoint, Hand, HandSide, Joint, SkeletonKind, Target, User};

/// Accepted finger range and optional median smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerCountParams {
    pub min_fingers: i32,
    pub max_fingers: i32,
    pub use_median: bool,
    /// Number of most recent samples the median is taken over.
    pub median_window: usize,
}

impl Default for FingerCountParams {
    fn default() -> Self {
        Self {
            min_fingers: 0,
            max_fingers: 5,
            use_median: false,
            median_window: 10,
        }
    }
}

impl FingerCountParams {
    pub fn new(min_fingers: i32, max_fingers: i32) -> Self {
        Self {
            min_fingers,
            max_fingers,
            ..Self::default()
        }
    }

    pub fn with_median(mut self, window: usize) -> Self {
        self.use_median = true;
        self.median_window = window;
        self
    }
}

/// Recognizes a finger count on one hand of a user, or on a tracked hand.
#[derive(Debug, Clone)]
pub struct FingerCountRecognizer {
    /// Hand joint of the user whose confidence gates the count; `None` for hand targets.
    hand_joint: Option<BodyJoint>,
    params: FingerCountParams,
    config: RecognizerConfig,
    target: SkeletonKind,
}

impl FingerCountRecognizer {
    /// Count fingers of a user's hand; `hand_joint` is `LeftHand` or `RightHand`.
    pub fn for_user(hand_joint: BodyJoint, params: FingerCountParams, config: RecognizerConfig) -> Result<Self> {
        if !matches!(hand_joint, BodyJoint::LeftHand | BodyJoint::RightHand) {
            return Err(RecognizerError::InvalidJoint {
                joint: Joint::Body(hand_joint),
                kind: SkeletonKind::Body,
            });
        }
        Self::validate(&params)?;
        Ok(Self {
            hand_joint: Some(hand_joint),
            params,
            config,
            target: SkeletonKind::Body,
        })
    }

    /// Count fingers of a tracked hand.
    pub fn for_hand(params: FingerCountParams, config: RecognizerConfig) -> Result<Self> {
        Self::validate(&params)?;
        Ok(Self {
            hand_joint: None,
            params,
            config,
            target: SkeletonKind::Hand,
        })
    }

    fn validate(params: &FingerCountParams) -> Result<()> {
        if params.min_fingers > params.max_fingers {
            return Err(RecognizerError::InvalidRange {
                what: "finger count",
                min: params.min_fingers as f32,
                max: params.max_fingers as f32,
            });
        }
        if params.use_median && params.median_window == 0 {
            return Err(RecognizerError::EmptyMedianWindow);
        }
        Ok(())
    }

    /// Latest or median-smoothed count, `-1` if none was reported.
    fn count(&self, samples: &[i32]) -> i32 {
        let latest = samples.last().copied().unwrap_or(-1);
        if !self.params.use_median {
            return latest;
        }
        let start = samples.len().saturating_sub(self.params.median_window);
        median(&samples[start..]).unwrap_or(latest)
    }

    fn check(&self, count: i32, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        let correction = if count < 0 {
            // Unknown: always ask for more fingers.
            (self.params.min_fingers - count).max(1)
        } else if count < self.params.min_fingers {
            self.params.min_fingers - count
        } else if count > self.params.max_fingers {
            self.params.max_fingers - count
        } else {
            return RecognitionResult::Recognized;
        };
        fill_hint(hint, || {
            let mut hint = CorrectionHint::new(ChangeType::Fingers, direction_of(correction as f32))
                .with_distance(correction as f32)
                .on_skeleton(self.target);
            if let Some(joint) = self.hand_joint {
                hint = hint.for_joint(joint.into());
            }
            hint
        });
        RecognitionResult::NotRecognized
    }
}

impl GestureRecognizer for FingerCountRecognizer {
    fn recognize_on_user(&mut self, user: &dyn User, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        let Some(hand_joint) = self.hand_joint else {
            return RecognitionResult::NotRecognized;
        };
        let target = Target::User(user);
        let frame = target.current(self.config.use_filtered_data);
        if confident_position(frame, hand_joint.into(), &self.config).is_none() {
            return tracking_error("finger_count", &target);
        }
        let side = match hand_joint {
            BodyJoint::LeftHand => HandSide::Left,
            _ => HandSide::Right,
        };
        self.check(self.count(user.finger_counts(side)), hint)
    }

    fn recognize_on_hand(&mut self, hand: &dyn Hand, hint: Option<&mut CorrectionHint>) -> RecognitionResult {
        if self.hand_joint.is_some() {
            return RecognitionResult::NotRecognized;
        }
        if !hand.is_tracked() {
            return tracking_error("finger_count", &Target::Hand(hand));
        }
        self.check(self.count(hand.finger_counts()), hint)
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
