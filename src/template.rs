//! Template matching of joint trajectories with dynamic time warping.
//!
//! Trajectories are normalized for translation, scale and (within a limit)
//! rotation before the warping distance to the stored template is taken.

mod dtw;
mod normalize;
mod recognizer;

pub use dtw::{DistanceMeasure, Dtw};
pub use normalize::{
    AxisMask, TemplateData, apply_mask, center, indicative_orientation, scale_to_unit_cube,
};
pub use recognizer::{TemplateJoint, TemplateParams, TemplateRecognizer};
