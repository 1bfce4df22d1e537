//! Joint identifiers for body and hand skeletons.
//!
//! Body and hand joints share one index space: a recognizer whose joints all
//! fall within the hand range can run on both skeleton kinds.

use serde::{Deserialize, Serialize};

use crate::error::{RecognizerError, Result};

/// Full-body skeleton joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyJoint {
    Head,
    Neck,
    Torso,
    Waist,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
    FaceNose,
    FaceLeftEar,
    FaceRightEar,
    FaceForehead,
    FaceChin,
}

/// Number of body joints per frame.
pub const BODY_JOINT_COUNT: usize = 25;

impl BodyJoint {
    /// Array index of this joint in a body frame.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Hand skeleton joints: the palm and the five fingertips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandJoint {
    Palm,
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Number of hand joints per frame.
pub const HAND_JOINT_COUNT: usize = 6;

impl HandJoint {
    /// Array index of this joint in a hand frame.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn fingertips() -> [HandJoint; 5] {
        [
            Self::Thumb,
            Self::Index,
            Self::Middle,
            Self::Ring,
            Self::Pinky,
        ]
    }
}

/// Left or right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandSide {
    Left,
    Right,
}

/// A joint of either skeleton kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Body(BodyJoint),
    Hand(HandJoint),
}

impl Joint {
    /// Index in the shared joint index space.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Self::Body(j) => j.index(),
            Self::Hand(j) => j.index(),
        }
    }

    /// Whether this joint can be read from a frame of the given kind.
    pub fn usable_on(&self, kind: SkeletonKind) -> bool {
        match kind {
            SkeletonKind::Body => matches!(self, Self::Body(_)),
            SkeletonKind::Hand | SkeletonKind::Both => self.index() < HAND_JOINT_COUNT,
        }
    }
}

impl From<BodyJoint> for Joint {
    fn from(joint: BodyJoint) -> Self {
        Self::Body(joint)
    }
}

impl From<HandJoint> for Joint {
    fn from(joint: HandJoint) -> Self {
        Self::Hand(joint)
    }
}

/// Skeleton kinds a recognizer can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkeletonKind {
    #[default]
    Body,
    Hand,
    Both,
}

impl SkeletonKind {
    /// Whether a recognizer targeting `self` applies to a subject of `subject` kind.
    #[inline]
    pub fn accepts(&self, subject: SkeletonKind) -> bool {
        *self == SkeletonKind::Both || *self == subject
    }

    /// Derive the target kind from the joints a recognizer reads.
    ///
    /// Hand joints target hands only. Body joints target bodies, or both
    /// kinds when every index falls within the hand range.
    pub fn for_joints(joints: &[Joint]) -> Result<SkeletonKind> {
        let hand = joints.iter().filter(|j| matches!(j, Joint::Hand(_))).count();
        if hand == joints.len() && hand > 0 {
            return Ok(SkeletonKind::Hand);
        }
        if hand > 0 {
            return Err(RecognizerError::MixedSkeletonKinds);
        }
        if joints.iter().all(|j| j.index() < HAND_JOINT_COUNT) {
            Ok(SkeletonKind::Both)
        } else {
            Ok(SkeletonKind::Body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_indices() {
        assert_eq!(BodyJoint::Head.index(), 0);
        assert_eq!(BodyJoint::FaceChin.index(), BODY_JOINT_COUNT - 1);
        assert_eq!(HandJoint::Pinky.index(), HAND_JOINT_COUNT - 1);
        assert_eq!(Joint::from(HandJoint::Index).index(), 2);
    }

    #[test]
    fn test_target_kind_derivation() {
        let body = [Joint::from(BodyJoint::RightHand), BodyJoint::RightShoulder.into()];
        assert_eq!(SkeletonKind::for_joints(&body), Ok(SkeletonKind::Body));

        let low = [Joint::from(BodyJoint::Head), BodyJoint::Torso.into()];
        assert_eq!(SkeletonKind::for_joints(&low), Ok(SkeletonKind::Both));

        let hand = [Joint::from(HandJoint::Thumb), HandJoint::Index.into()];
        assert_eq!(SkeletonKind::for_joints(&hand), Ok(SkeletonKind::Hand));

        let mixed = [Joint::from(HandJoint::Thumb), BodyJoint::Head.into()];
        assert_eq!(
            SkeletonKind::for_joints(&mixed),
            Err(RecognizerError::MixedSkeletonKinds)
        );
    }

    #[test]
    fn test_accepts() {
        assert!(SkeletonKind::Both.accepts(SkeletonKind::Hand));
        assert!(SkeletonKind::Body.accepts(SkeletonKind::Body));
        assert!(!SkeletonKind::Body.accepts(SkeletonKind::Hand));
    }
}
