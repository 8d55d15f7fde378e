//! # Confidence Module
//!
//! Tracking confidence for one analysis.
//!
//! - Mean landmark visibility over every landmark of every frame, scaled to [0, 100]
//! - Measures tracking quality, not swing quality
//! - Reduced proportionally for each metric lost to low visibility

use crate::primitives::{PERCENT_MAX, PERCENT_MIN, clamp_finite};
use crate::types::{MetricKind, PoseFrame, PoseSequence, SwingMetrics};

/// Aggregates landmark visibility into a confidence value.
pub struct ConfidenceEstimator;

impl ConfidenceEstimator {
    /// Confidence of a validated sequence.
    #[must_use]
    pub fn estimate(sequence: &PoseSequence) -> f64 {
        Self::estimate_frames(sequence.frames())
    }

    /// Confidence of raw frames.
    ///
    /// Returns exactly 0.0 when there is no landmark at all. Never fails.
    #[must_use]
    pub fn estimate_frames(frames: &[PoseFrame]) -> f64 {
        let (sum, count) = frames
            .iter()
            .flat_map(|frame| frame.landmarks.iter())
            .fold((0.0, 0usize), |(sum, count), lm| {
                (sum + lm.visibility, count + 1)
            });

        if count == 0 {
            return 0.0;
        }

        clamp_finite(sum / count as f64 * 100.0, PERCENT_MIN, PERCENT_MAX)
    }

    /// Scale confidence by the share of metrics that were not lost to low visibility.
    ///
    /// Degenerate geometry does not count against tracking confidence.
    #[must_use]
    pub fn penalize(confidence: f64, metrics: &SwingMetrics) -> f64 {
        let total = MetricKind::ALL.len() as f64;
        let lost = metrics.low_visibility_count() as f64;
        clamp_finite(confidence * (1.0 - lost / total), PERCENT_MIN, PERCENT_MAX)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, UndefinedCause, UndefinedMetric};

    fn frames(count: usize, visibility: f64) -> Vec<PoseFrame> {
        (0..count)
            .map(|i| PoseFrame::uniform(i as f64 / 30.0, Landmark::new(0.5, 0.5, 0.0, visibility)))
            .collect()
    }

    #[test]
    fn full_visibility_is_full_confidence() {
        assert_eq!(ConfidenceEstimator::estimate_frames(&frames(12, 1.0)), 100.0);
    }

    #[test]
    fn zero_visibility_is_zero_confidence() {
        assert_eq!(ConfidenceEstimator::estimate_frames(&frames(12, 0.0)), 0.0);
    }

    #[test]
    fn uniform_visibility_scales_linearly() {
        let confidence = ConfidenceEstimator::estimate_frames(&frames(12, 0.8));
        assert!((confidence - 80.0).abs() < 1e-9, "got {}", confidence);
    }

    #[test]
    fn no_frames_is_zero() {
        assert_eq!(ConfidenceEstimator::estimate_frames(&[]), 0.0);
    }

    #[test]
    fn frames_without_landmarks_are_zero() {
        let empty = vec![PoseFrame::new(0.0, Vec::new()); 3];
        assert_eq!(ConfidenceEstimator::estimate_frames(&empty), 0.0);
    }

    #[test]
    fn penalty_counts_only_low_visibility() {
        let mut metrics = SwingMetrics::default();
        metrics.undefined.push(UndefinedMetric {
            metric: MetricKind::HipRotation,
            cause: UndefinedCause::LowVisibility {
                landmark: 23,
                frame: 4,
            },
        });
        metrics.undefined.push(UndefinedMetric {
            metric: MetricKind::WeightTransfer,
            cause: UndefinedCause::Degenerate,
        });

        let penalized = ConfidenceEstimator::penalize(70.0, &metrics);
        assert!((penalized - 60.0).abs() < 1e-9, "got {}", penalized);
    }

    #[test]
    fn no_undefined_metrics_leaves_confidence() {
        let penalized = ConfidenceEstimator::penalize(85.0, &SwingMetrics::default());
        assert_eq!(penalized, 85.0);
    }
}
