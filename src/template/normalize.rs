//! Geometric normalization of joint trajectories.
//!
//! Template and live sequences go through the same steps: axis masking,
//! centroid translation (positions only), and unit-cube scaling. Rotation
//! correction sits between centering and scaling and is done by the
//! recognizer, which needs both sequences.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Bitmask of coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisMask(u8);

impl AxisMask {
    pub const NONE: Self = Self(0);
    pub const X: Self = Self(1);
    pub const Y: Self = Self(2);
    pub const Z: Self = Self(4);

    #[inline]
    pub fn contains(&self, axis: usize) -> bool {
        axis < 3 && self.0 & (1 << axis) != 0
    }
}

impl BitOr for AxisMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Zero out the masked axes.
pub fn apply_mask(sequence: &mut [Vec3], ignored: AxisMask) {
    for axis in (0..3).filter(|&a| ignored.contains(a)) {
        sequence.iter_mut().for_each(|v| v[axis] = 0.0);
    }
}

/// Translate the sequence so that its centroid is the origin.
pub fn center(sequence: &mut [Vec3]) {
    if sequence.is_empty() {
        return;
    }
    let centroid = sequence.iter().sum::<Vec3>() / sequence.len() as f32;
    sequence.iter_mut().for_each(|v| *v -= centroid);
}

/// Direction of the first sample of a centered sequence.
pub fn indicative_orientation(sequence: &[Vec3]) -> Option<Vec3> {
    sequence.first()?.try_normalize(f32::EPSILON)
}

/// Scale into a unit cube.
///
/// Uniform scaling maps the largest bounding box side to 1. With
/// `aspect_invariant` every axis is scaled to 1 on its own. Flat axes are
/// left untouched.
pub fn scale_to_unit_cube(sequence: &mut [Vec3], aspect_invariant: bool) {
    let Some(first) = sequence.first() else {
        return;
    };
    let (mut lo, mut hi) = (*first, *first);
    for v in sequence.iter() {
        lo = lo.inf(v);
        hi = hi.sup(v);
    }
    let sides = hi - lo;

    let factors = if aspect_invariant {
        sides.map(|s| if s > f32::EPSILON { 1.0 / s } else { 1.0 })
    } else {
        let largest = sides.max();
        if largest <= f32::EPSILON {
            return;
        }
        Vec3::repeat(1.0 / largest)
    };
    sequence.iter_mut().for_each(|v| v.component_mul_assign(&factors));
}

/// A normalized trajectory of one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateData {
    pub sequence: Vec<Vec3>,
    /// Direction of the first centered sample, captured before scaling.
    /// `None` for orientation trajectories.
    pub indicative_orientation: Option<Vec3>,
}

impl TemplateData {
    /// Normalize a raw trajectory.
    pub fn new(mut sequence: Vec<Vec3>, ignored: AxisMask, aspect_invariant: bool, positions: bool) -> Self {
        apply_mask(&mut sequence, ignored);
        let indicative_orientation = if positions {
            center(&mut sequence);
            indicative_orientation(&sequence)
        } else {
            None
        };
        scale_to_unit_cube(&mut sequence, aspect_invariant);
        Self {
            sequence,
            indicative_orientation,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mask_and_center() {
        let mut seq = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 4.0, 5.0)];
        apply_mask(&mut seq, AxisMask::Y | AxisMask::Z);
        center(&mut seq);
        assert_abs_diff_eq!(seq[0], Vec3::new(-1.0, 0.0, 0.0));
        assert_abs_diff_eq!(seq[1], Vec3::new(1.0, 0.0, 0.0));
        assert!(!AxisMask::NONE.contains(0));
    }

    #[test]
    fn test_uniform_scaling_keeps_aspect() {
        let mut seq = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 0.0)];
        scale_to_unit_cube(&mut seq, false);
        assert_abs_diff_eq!(seq[1], Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_aspect_invariant_scaling() {
        let mut seq = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 0.0)];
        scale_to_unit_cube(&mut seq, true);
        assert_abs_diff_eq!(seq[1], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_template_indicative_orientation() {
        let raw = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)];
        let data = TemplateData::new(raw.clone(), AxisMask::NONE, false, true);
        assert_abs_diff_eq!(data.indicative_orientation.unwrap(), Vec3::new(-1.0, 0.0, 0.0));
        assert_abs_diff_eq!(data.sequence[1], Vec3::new(0.5, 0.0, 0.0));

        let orientations = TemplateData::new(raw, AxisMask::NONE, false, false);
        assert!(orientations.indicative_orientation.is_none());
        assert_abs_diff_eq!(orientations.sequence[1], Vec3::new(1.0, 0.0, 0.0));
    }
}
