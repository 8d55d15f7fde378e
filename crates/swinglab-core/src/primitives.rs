//! # Innate Primitives
//!
//! Hardcoded constants for the swinglab pipeline.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Tunable thresholds live in [`crate::AnalyzerConfig`] instead.
//!
//! ## Primitives
//!
//! 1. **Body Model**: 33 MediaPipe-style landmarks per frame.
//! 2. **Sampling Floor**: a swing needs at least [`MIN_FRAMES`] frames.
//! 3. **Contract Bounds**: every metric and score is clamped to a documented range.

// =============================================================================
// BODY MODEL
// =============================================================================

/// Number of landmarks in every pose frame.
pub const LANDMARK_COUNT: usize = 33;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// =============================================================================
// SAMPLING
// =============================================================================

/// Minimum viable swing sample.
///
/// Sequences (and video pre-checks) below this are rejected with
/// `SwingError::InsufficientFrames`.
pub const MIN_FRAMES: usize = 10;

/// Fraction of the sequence trimmed from each end before searching for impact.
///
/// 0.2 on both sides leaves the middle 60%.
pub const IMPACT_SEARCH_MARGIN: f64 = 0.2;

/// Wrist speed spread below which the speed signal has no detectable peak.
pub const SPEED_EPSILON: f64 = 1e-6;

/// Length floor below which a projected body-line vector has no direction.
pub const DIRECTION_EPSILON: f64 = 1e-9;

// =============================================================================
// CONTRACT BOUNDS
// =============================================================================

pub const ANGLE_MIN: f64 = 0.0;
pub const ANGLE_MAX: f64 = 180.0;

pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;

pub const TEMPO_RATIO_MIN: f64 = 0.5;
pub const TEMPO_RATIO_MAX: f64 = 5.0;

/// Upper clamp for downswing speed (relative or calibrated units per second).
///
/// Far above any physical wrist speed; only reached by corrupt timestamps.
pub const SPEED_MAX: f64 = 1000.0;

/// Starting value of every rule-based category score.
pub const BASE_SCORE: f64 = 70.0;

/// Version tag reported with every analysis.
pub const MODEL_VERSION: &str = "1.0.0";

/// Clamp into `[min, max]`, mapping NaN to `min`.
#[must_use]
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_window_is_middle_sixty_percent() {
        let window = 1.0 - 2.0 * IMPACT_SEARCH_MARGIN;
        assert!((window - 0.6).abs() < 1e-12);
    }

    #[test]
    fn clamp_finite_maps_nan_to_floor() {
        assert_eq!(clamp_finite(f64::NAN, 0.5, 5.0), 0.5);
        assert_eq!(clamp_finite(6.0, 0.5, 5.0), 5.0);
        assert_eq!(clamp_finite(f64::NEG_INFINITY, 0.0, 100.0), 0.0);
    }
}
