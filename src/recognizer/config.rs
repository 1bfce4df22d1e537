//! Configuration shared by every recognizer.

use serde::{Deserialize, Serialize};

/// Generic recognizer settings, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Joints below this confidence yield a tracking error.
    pub min_confidence: f32,
    /// Read filtered instead of raw tracking data.
    pub use_filtered_data: bool,
    /// Let a combination treat this recognizer's tracking errors as satisfied.
    pub ignore_on_tracking_error: bool,
    /// Read parent-relative instead of global joint transforms.
    pub use_local_transformations: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            min_confidence: Self::DEFAULT_MIN_CONFIDENCE,
            use_filtered_data: false,
            ignore_on_tracking_error: false,
            use_local_transformations: false,
        }
    }
}

impl RecognizerConfig {
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.51;

    /// Create a config; `None` selects the default confidence of 0.51.
    pub fn new(min_confidence: Option<f32>) -> Self {
        Self {
            min_confidence: min_confidence.unwrap_or(Self::DEFAULT_MIN_CONFIDENCE),
            ..Self::default()
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_filtered_data(mut self, use_filtered_data: bool) -> Self {
        self.use_filtered_data = use_filtered_data;
        self
    }

    pub fn with_ignore_on_tracking_error(mut self, ignore: bool) -> Self {
        self.ignore_on_tracking_error = ignore;
        self
    }

    pub fn with_local_transformations(mut self, local: bool) -> Self {
        self.use_local_transformations = local;
        self
    }
}
