//! # Phase Segmenter
//!
//! Partitions a pose sequence into the five swing phases.
//!
//! ## Algorithm
//!
//! 1. Dominant-wrist speed per frame: 3D displacement over the timestamp delta.
//! 2. Impact candidate = fastest frame inside the middle 60% of the sequence
//!    (earliest index wins ties).
//! 3. With impact frame `i` and `N` frames, cuts are placed at
//!    `i/4`, `0.9·i`, `i`, `i + max(1, N/20)`.
//! 4. With no detectable peak, cuts fall back to 25% / 50% / 75% / 80%.
//! 5. Cuts are nudged by the smallest amount that leaves every phase non-empty.
//!
//! The result always partitions `[0, N)` exactly.

use crate::primitives::{IMPACT_SEARCH_MARGIN, MIN_FRAMES, SPEED_EPSILON};
use crate::types::{PhaseDetection, PoseSequence, SwingError, SwingPhases};

/// Locates phase boundaries from the dominant wrist's speed profile.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSegmenter {
    wrist: usize,
    min_visibility: f64,
}

impl PhaseSegmenter {
    /// Create a segmenter tracking the given wrist landmark.
    ///
    /// Frame pairs where the wrist is not above `min_visibility` contribute zero speed.
    #[must_use]
    pub fn new(wrist: usize, min_visibility: f64) -> Self {
        Self {
            wrist,
            min_visibility,
        }
    }

    /// Segment a validated sequence.
    ///
    /// # Errors
    /// Returns `SwingError::InsufficientFrames` if the sequence has fewer than
    /// `MIN_FRAMES` frames.
    pub fn segment(&self, sequence: &PoseSequence) -> Result<SwingPhases, SwingError> {
        let n = sequence.len();
        if n < MIN_FRAMES {
            return Err(SwingError::InsufficientFrames {
                found: n,
                required: MIN_FRAMES,
            });
        }

        let speeds = self.wrist_speeds(sequence);

        let phases = match Self::impact_candidate(&speeds) {
            Some(impact) => {
                let cuts = impact_cuts(impact, n);
                tracing::debug!(
                    impact_frame = impact,
                    ?cuts,
                    "Located impact from wrist speed peak"
                );
                SwingPhases::from_cuts(
                    normalize_cuts(cuts, n),
                    n,
                    PhaseDetection::ImpactPeak { frame: impact },
                )
            }
            None => {
                tracing::warn!(
                    frames = n,
                    "No wrist speed peak detected, using proportional phase split"
                );
                SwingPhases::from_cuts(
                    normalize_cuts(proportional_cuts(n), n),
                    n,
                    PhaseDetection::ProportionalFallback,
                )
            }
        };

        Ok(phases)
    }

    /// Speed of the tracked wrist at every frame; frame 0 has no predecessor and reads 0.
    #[must_use]
    pub fn wrist_speeds(&self, sequence: &PoseSequence) -> Vec<f64> {
        let frames = sequence.frames();
        let mut speeds = Vec::with_capacity(frames.len());
        speeds.push(0.0);

        for pair in frames.windows(2) {
            let speed = match (pair[0].landmark(self.wrist), pair[1].landmark(self.wrist)) {
                (Some(a), Some(b))
                    if a.visibility > self.min_visibility
                        && b.visibility > self.min_visibility =>
                {
                    let dt = pair[1].timestamp - pair[0].timestamp;
                    let (dx, dy, dz) = (b.x - a.x, b.y - a.y, b.z - a.z);
                    (dx * dx + dy * dy + dz * dz).sqrt() / dt
                }
                _ => 0.0,
            };
            speeds.push(if speed.is_finite() { speed } else { 0.0 });
        }

        speeds
    }

    /// Index of the fastest frame inside the search window, or `None` when the
    /// window holds no peak.
    fn impact_candidate(speeds: &[f64]) -> Option<usize> {
        let n = speeds.len();
        let lo = (n as f64 * IMPACT_SEARCH_MARGIN).floor() as usize;
        let hi = n.saturating_sub(lo);
        let window = speeds.get(lo..hi)?;

        let mut best: Option<(usize, f64)> = None;
        let mut floor = f64::INFINITY;
        for (offset, &speed) in window.iter().enumerate() {
            floor = floor.min(speed);
            // Strict comparison keeps the earliest index on ties.
            if best.is_none_or(|(_, top)| speed > top) {
                best = Some((lo + offset, speed));
            }
        }

        let (index, peak) = best?;
        (peak - floor > SPEED_EPSILON).then_some(index)
    }
}

/// Interior cut points derived from an impact frame.
fn impact_cuts(impact: usize, n: usize) -> [usize; 4] {
    let i = impact as f64;
    let impact_len = (n / 20).max(1);
    [
        (i / 4.0).round() as usize,
        (i * 0.9).round() as usize,
        impact,
        impact.saturating_add(impact_len),
    ]
}

/// Interior cut points of the fixed 25/50/75/80 split.
fn proportional_cuts(n: usize) -> [usize; 4] {
    [n / 4, n / 2, 3 * n / 4, 4 * n / 5]
}

/// Smallest adjustment making `0 < c0 < c1 < c2 < c3 < n`.
///
/// A forward pass pushes each cut past its predecessor, a backward pass pulls
/// each cut below its successor. Requires `n >= 5`.
fn normalize_cuts(mut cuts: [usize; 4], n: usize) -> [usize; 4] {
    let mut prev = 0;
    for cut in &mut cuts {
        *cut = (*cut).max(prev + 1);
        prev = *cut;
    }

    let mut next = n;
    for cut in cuts.iter_mut().rev() {
        *cut = (*cut).min(next - 1);
        next = *cut;
    }

    cuts
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ingestor;
    use crate::primitives::RIGHT_WRIST;
    use crate::testing::{still, swing};

    fn segmenter() -> PhaseSegmenter {
        PhaseSegmenter::new(RIGHT_WRIST, 0.3)
    }

    fn assert_partition(phases: &SwingPhases, n: usize) {
        let ranges = phases.ranges();
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[4].end, n);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for range in ranges {
            assert!(!range.is_empty(), "empty range in {:?}", phases);
        }
    }

    #[test]
    fn detects_impact_at_speed_peak() {
        let sequence = Ingestor::build(swing(40, 1.0)).expect("build");
        let phases = segmenter().segment(&sequence).expect("segment");

        assert_eq!(phases.detection, PhaseDetection::ImpactPeak { frame: 28 });
        assert_eq!(phases.address.end, 7);
        assert_eq!(phases.backswing.end, 25);
        assert_eq!(phases.downswing.end, 28);
        assert_eq!(phases.impact.end, 30);
        assert_partition(&phases, 40);
    }

    #[test]
    fn still_capture_falls_back_to_proportional_split() {
        let sequence = Ingestor::build(still(20, 1.0)).expect("build");
        let phases = segmenter().segment(&sequence).expect("segment");

        assert_eq!(phases.detection, PhaseDetection::ProportionalFallback);
        assert_eq!(phases.address.end, 5);
        assert_eq!(phases.backswing.end, 10);
        assert_eq!(phases.downswing.end, 15);
        assert_eq!(phases.impact.end, 16);
        assert_partition(&phases, 20);
    }

    #[test]
    fn invisible_wrist_falls_back() {
        let sequence = Ingestor::build(swing(30, 0.1)).expect("build");
        let phases = segmenter().segment(&sequence).expect("segment");
        assert_eq!(phases.detection, PhaseDetection::ProportionalFallback);
    }

    #[test]
    fn wrist_at_threshold_visibility_is_ignored() {
        let sequence = Ingestor::build(swing(40, 0.3)).expect("build");

        assert!(segmenter().wrist_speeds(&sequence).iter().all(|s| *s == 0.0));
        let phases = segmenter().segment(&sequence).expect("segment");
        assert_eq!(phases.detection, PhaseDetection::ProportionalFallback);
    }

    #[test]
    fn ten_frame_fallback_has_no_empty_phase() {
        let sequence = Ingestor::build(still(10, 1.0)).expect("build");
        let phases = segmenter().segment(&sequence).expect("segment");
        assert_partition(&phases, 10);
    }

    #[test]
    fn early_impact_shifts_neighbouring_cuts() {
        // Impact at 2 of 10: raw cuts [1, 2, 2, 3] collide.
        let cuts = normalize_cuts(impact_cuts(2, 10), 10);
        assert_eq!(cuts, [1, 2, 3, 4]);
    }

    #[test]
    fn late_impact_pulls_cuts_back() {
        let cuts = normalize_cuts([9, 10, 11, 12], 10);
        assert_eq!(cuts, [6, 7, 8, 9]);
    }

    #[test]
    fn tie_resolves_to_earliest_index() {
        let speeds = [0.0, 0.0, 1.0, 3.0, 3.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(PhaseSegmenter::impact_candidate(&speeds), Some(3));
    }

    #[test]
    fn flat_window_has_no_candidate() {
        let speeds = [0.0, 9.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0];
        assert_eq!(PhaseSegmenter::impact_candidate(&speeds), None);
    }

    #[test]
    fn wrist_speed_uses_timestamp_delta() {
        let sequence = Ingestor::build(swing(20, 1.0)).expect("build");
        let speeds = segmenter().wrist_speeds(&sequence);
        assert_eq!(speeds.len(), 20);
        assert_eq!(speeds[0], 0.0);
        assert!(speeds.iter().all(|s| s.is_finite() && *s >= 0.0));
    }
}
