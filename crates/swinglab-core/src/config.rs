//! # Analyzer Configuration
//!
//! Tunable thresholds for one [`SwingAnalyzer`](crate::SwingAnalyzer).
//!
//! The configuration is deserializable so the application layer can load it
//! from a file, but the core never reads files itself.

use crate::types::{Handedness, SwingError};
use serde::{Deserialize, Serialize};

/// Default visibility threshold; a landmark must be strictly above it to be used.
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.3;

/// Default `threshold_high` of the power rule, in normalized units per second.
///
/// A wrist travelling four frame-widths per second through the downswing.
pub const DEFAULT_DOWNSWING_SPEED_THRESHOLD: f64 = 4.0;

/// Settings shared by every analysis run through one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Landmarks at or below this visibility make a metric undefined.
    pub min_visibility: f64,
    /// Selects the dominant wrist and shoulder.
    pub handedness: Handedness,
    /// Downswing speed above which the power bonus applies.
    pub downswing_speed_threshold: f64,
    /// Optional factor converting normalized units to metres.
    pub calibration_factor: Option<f64>,
    /// Target shoulder-line angle at address, degrees from horizontal.
    pub target_shoulder_angle: f64,
    /// Abort on the first missing landmark instead of leaving the metric undefined.
    pub strict_visibility: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            handedness: Handedness::Right,
            downswing_speed_threshold: DEFAULT_DOWNSWING_SPEED_THRESHOLD,
            calibration_factor: None,
            target_shoulder_angle: 0.0,
            strict_visibility: false,
        }
    }
}

impl AnalyzerConfig {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), SwingError> {
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(SwingError::InvalidConfig(format!(
                "min_visibility must be within [0, 1], got {}",
                self.min_visibility
            )));
        }

        if !self.downswing_speed_threshold.is_finite() || self.downswing_speed_threshold <= 0.0 {
            return Err(SwingError::InvalidConfig(format!(
                "downswing_speed_threshold must be a positive number, got {}",
                self.downswing_speed_threshold
            )));
        }

        if let Some(factor) = self.calibration_factor
            && (!factor.is_finite() || factor <= 0.0)
        {
            return Err(SwingError::InvalidConfig(format!(
                "calibration_factor must be a positive number, got {}",
                factor
            )));
        }

        if !(0.0..=90.0).contains(&self.target_shoulder_angle) {
            return Err(SwingError::InvalidConfig(format!(
                "target_shoulder_angle must be within [0, 90] degrees, got {}",
                self.target_shoulder_angle
            )));
        }

        Ok(())
    }
}
