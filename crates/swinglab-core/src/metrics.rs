//! # Metric Extractor
//!
//! Seven kinematic measurements computed from a phased pose sequence.
//!
//! | Metric | Landmarks | Frames | Plane |
//! |--------|-----------|--------|-------|
//! | backswing_angle | shoulders | backswing start, top | transverse (x-z) |
//! | downswing_speed | dominant wrist | downswing span | 3D |
//! | follow_through_angle | dominant shoulder + wrist | follow-through span | frontal (x-y) |
//! | hip_rotation | hips | downswing start, impact | transverse (x-z) |
//! | shoulder_alignment | shoulders | address (mean) | frontal (x-y) |
//! | weight_transfer | hips, ankles | address (mean), impact | frontal (x-y) |
//! | tempo_ratio | none (timestamps) | backswing, downswing spans | - |
//!
//! A phase "span" includes the boundary frame into the next phase, so the
//! backswing ends at the top and the downswing ends at impact.
//!
//! A metric whose landmarks fall below the visibility threshold is reported as
//! undefined, never as a default value.

use crate::config::AnalyzerConfig;
use crate::primitives::{
    ANGLE_MAX, ANGLE_MIN, DIRECTION_EPSILON, LEFT_ANKLE, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST,
    PERCENT_MAX, PERCENT_MIN, RIGHT_ANKLE, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_WRIST, SPEED_MAX,
    TEMPO_RATIO_MAX, TEMPO_RATIO_MIN, clamp_finite,
};
use crate::types::{
    Handedness, Landmark, MetricKind, PoseSequence, SwingError, SwingMetrics, SwingPhases,
    UndefinedCause, UndefinedMetric,
};

// =============================================================================
// GEOMETRY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Vec3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Vec3 {
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    fn scale(self, factor: f64) -> Vec3 {
        Vec3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn midpoint(self, other: Vec3) -> Vec3 {
        self.add(other).scale(0.5)
    }
}

impl From<&Landmark> for Vec3 {
    fn from(lm: &Landmark) -> Self {
        Vec3 {
            x: lm.x,
            y: lm.y,
            z: lm.z,
        }
    }
}

/// Anatomical plane a vector is projected onto before measuring angles.
#[derive(Debug, Clone, Copy)]
enum Plane {
    /// Horizontal plane (x-z): body rotation about the spine.
    Transverse,
    /// Camera plane (x-y): arm sweep and tilt.
    Frontal,
}

impl Plane {
    fn project(self, v: Vec3) -> (f64, f64) {
        match self {
            Plane::Transverse => (v.x, v.z),
            Plane::Frontal => (v.x, v.y),
        }
    }
}

/// Signed angle in degrees from `u` to `v` after projection, via atan2(cross, dot).
fn signed_angle(u: Vec3, v: Vec3, plane: Plane) -> Result<f64, UndefinedCause> {
    let (ux, uy) = plane.project(u);
    let (vx, vy) = plane.project(v);

    if ux.hypot(uy) < DIRECTION_EPSILON || vx.hypot(vy) < DIRECTION_EPSILON {
        return Err(UndefinedCause::Degenerate);
    }

    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    Ok(cross.atan2(dot).to_degrees())
}

/// Unsigned angle in degrees, within [0, 180].
fn angle_between(u: Vec3, v: Vec3, plane: Plane) -> Result<f64, UndefinedCause> {
    signed_angle(u, v, plane).map(f64::abs)
}

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Computes [`SwingMetrics`] from a sequence and its phases.
#[derive(Debug, Clone, Copy)]
pub struct MetricExtractor {
    shoulder: usize,
    wrist: usize,
    min_visibility: f64,
    calibration_factor: Option<f64>,
    target_shoulder_angle: f64,
    strict: bool,
}

impl MetricExtractor {
    #[must_use]
    pub fn new(config: &AnalyzerConfig) -> Self {
        let (shoulder, wrist) = match config.handedness {
            Handedness::Right => (RIGHT_SHOULDER, RIGHT_WRIST),
            Handedness::Left => (LEFT_SHOULDER, LEFT_WRIST),
        };

        Self {
            shoulder,
            wrist,
            min_visibility: config.min_visibility,
            calibration_factor: config.calibration_factor,
            target_shoulder_angle: config.target_shoulder_angle,
            strict: config.strict_visibility,
        }
    }

    /// Dominant-hand wrist landmark index.
    #[must_use]
    pub fn wrist(&self) -> usize {
        self.wrist
    }

    /// Compute all seven metrics.
    ///
    /// Undefined metrics are recorded in `SwingMetrics::undefined`.
    ///
    /// # Errors
    /// Only in strict mode: `SwingError::MissingLandmarks` for the first metric
    /// whose landmarks are not visible enough.
    pub fn extract(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<SwingMetrics, SwingError> {
        let mut metrics = SwingMetrics::default();

        for kind in MetricKind::ALL {
            match self.measure(kind, sequence, phases) {
                Ok(value) => {
                    tracing::debug!(metric = %kind, value, "Measured metric");
                    metrics.set(kind, Some(value));
                }
                Err(UndefinedCause::LowVisibility { landmark, frame }) if self.strict => {
                    return Err(SwingError::MissingLandmarks {
                        metric: kind,
                        landmark,
                        frame,
                    });
                }
                Err(cause) => {
                    tracing::warn!(metric = %kind, ?cause, "Metric undefined");
                    metrics.undefined.push(UndefinedMetric { metric: kind, cause });
                }
            }
        }

        Ok(metrics)
    }

    /// Compute one metric, clamped to its contract range.
    pub fn measure(
        &self,
        kind: MetricKind,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let angle = |v: f64| clamp_finite(v, ANGLE_MIN, ANGLE_MAX);
        let percent = |v: f64| clamp_finite(v, PERCENT_MIN, PERCENT_MAX);

        match kind {
            MetricKind::BackswingAngle => self.backswing_angle(sequence, phases).map(angle),
            MetricKind::DownswingSpeed => self
                .downswing_speed(sequence, phases)
                .map(|v| clamp_finite(v, 0.0, SPEED_MAX)),
            MetricKind::FollowThroughAngle => {
                self.follow_through_angle(sequence, phases).map(angle)
            }
            MetricKind::HipRotation => self.hip_rotation(sequence, phases).map(angle),
            MetricKind::ShoulderAlignment => {
                self.shoulder_alignment(sequence, phases).map(percent)
            }
            MetricKind::WeightTransfer => self.weight_transfer(sequence, phases).map(percent),
            MetricKind::TempoRatio => Self::tempo_ratio(sequence, phases)
                .map(|v| clamp_finite(v, TEMPO_RATIO_MIN, TEMPO_RATIO_MAX)),
        }
    }

    // -------------------------------------------------------------------------
    // Landmark access
    // -------------------------------------------------------------------------

    /// Position of a landmark that meets the visibility threshold.
    fn point(
        &self,
        sequence: &PoseSequence,
        frame: usize,
        landmark: usize,
    ) -> Result<Vec3, UndefinedCause> {
        let lm = sequence
            .frame(frame)
            .and_then(|f| f.landmark(landmark))
            .ok_or(UndefinedCause::Degenerate)?;

        if lm.visibility <= self.min_visibility {
            return Err(UndefinedCause::LowVisibility { landmark, frame });
        }

        Ok(Vec3::from(lm))
    }

    /// Vector from landmark `from` to landmark `to` in one frame.
    fn segment(
        &self,
        sequence: &PoseSequence,
        frame: usize,
        from: usize,
        to: usize,
    ) -> Result<Vec3, UndefinedCause> {
        Ok(self
            .point(sequence, frame, to)?
            .sub(self.point(sequence, frame, from)?))
    }

    /// Mean landmark positions over address frames where all of them are visible.
    fn address_mean<const K: usize>(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
        landmarks: [usize; K],
    ) -> Result<[Vec3; K], UndefinedCause> {
        let mut sums = [Vec3::default(); K];
        let mut count = 0usize;
        let mut first_miss = None;

        for frame in phases.address.start..phases.address.end {
            let points: Result<Vec<Vec3>, UndefinedCause> = landmarks
                .iter()
                .map(|&lm| self.point(sequence, frame, lm))
                .collect();

            match points {
                Ok(points) => {
                    for (sum, p) in sums.iter_mut().zip(points) {
                        *sum = sum.add(p);
                    }
                    count += 1;
                }
                Err(cause) => {
                    first_miss.get_or_insert(cause);
                }
            }
        }

        if count == 0 {
            return Err(first_miss.unwrap_or(UndefinedCause::Degenerate));
        }

        let inv = 1.0 / count as f64;
        Ok(sums.map(|s| s.scale(inv)))
    }

    // -------------------------------------------------------------------------
    // Metrics
    // -------------------------------------------------------------------------

    /// Shoulder turn between backswing start and the top of the backswing.
    pub fn backswing_angle(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let span = phases.backswing.span(sequence.len());
        let (start, top) = (*span.start(), *span.end());
        if start == top {
            return Err(UndefinedCause::Degenerate);
        }

        let before = self.segment(sequence, start, LEFT_SHOULDER, RIGHT_SHOULDER)?;
        let after = self.segment(sequence, top, LEFT_SHOULDER, RIGHT_SHOULDER)?;
        angle_between(before, after, Plane::Transverse)
    }

    /// Dominant-wrist path length over the downswing divided by its duration.
    ///
    /// Relative units (normalized coordinates per second) unless a calibration
    /// factor is configured.
    pub fn downswing_speed(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let span = phases.downswing.span(sequence.len());
        let (start, end) = (*span.start(), *span.end());
        if start == end {
            return Err(UndefinedCause::Degenerate);
        }

        let mut path = 0.0;
        let mut previous = self.point(sequence, start, self.wrist)?;
        for frame in start + 1..=end {
            let current = self.point(sequence, frame, self.wrist)?;
            path += current.sub(previous).norm();
            previous = current;
        }

        let elapsed = phase_duration(sequence, start, end)?;
        Ok(path / elapsed * self.calibration_factor.unwrap_or(1.0))
    }

    /// Net angle swept by the shoulder-to-wrist vector through the follow-through.
    pub fn follow_through_angle(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let span = phases.follow_through.span(sequence.len());
        let (start, end) = (*span.start(), *span.end());
        if start == end {
            return Err(UndefinedCause::Degenerate);
        }

        let mut swept = 0.0;
        let mut previous = self.segment(sequence, start, self.shoulder, self.wrist)?;
        for frame in start + 1..=end {
            let current = self.segment(sequence, frame, self.shoulder, self.wrist)?;
            swept += signed_angle(previous, current, Plane::Frontal)?;
            previous = current;
        }

        Ok(swept.abs())
    }

    /// Hip turn between the start of the downswing and impact.
    pub fn hip_rotation(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let start = phases.downswing.start;
        let impact = phases.impact.start;

        let before = self.segment(sequence, start, LEFT_HIP, RIGHT_HIP)?;
        let after = self.segment(sequence, impact, LEFT_HIP, RIGHT_HIP)?;
        angle_between(before, after, Plane::Transverse)
    }

    /// `100 - |tilt - target|`, where tilt is the address shoulder line's angle
    /// from horizontal in degrees.
    pub fn shoulder_alignment(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let [left, right] = self.address_mean(sequence, phases, [LEFT_SHOULDER, RIGHT_SHOULDER])?;
        let line = right.sub(left);

        let (dx, dy) = Plane::Frontal.project(line);
        if dx.hypot(dy) < DIRECTION_EPSILON {
            return Err(UndefinedCause::Degenerate);
        }

        // A line has no direction, so fold the tilt into [0, 90].
        let tilt = dy.abs().atan2(dx.abs()).to_degrees();
        Ok(100.0 - (tilt - self.target_shoulder_angle).abs())
    }

    /// Lateral hip-centre shift from address to impact, as a percentage of half
    /// the address stance width.
    ///
    /// 100 means the hip centre travelled all the way over the lead ankle.
    pub fn weight_transfer(
        &self,
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let [left_hip, right_hip, left_ankle, right_ankle] = self.address_mean(
            sequence,
            phases,
            [LEFT_HIP, RIGHT_HIP, LEFT_ANKLE, RIGHT_ANKLE],
        )?;

        let (sx, sy) = Plane::Frontal.project(right_ankle.sub(left_ankle));
        let stance = sx.hypot(sy);
        if stance < DIRECTION_EPSILON {
            return Err(UndefinedCause::Degenerate);
        }

        let impact = phases.impact.start;
        let impact_centre = self
            .point(sequence, impact, LEFT_HIP)?
            .midpoint(self.point(sequence, impact, RIGHT_HIP)?);
        let address_centre = left_hip.midpoint(right_hip);

        let shift = (impact_centre.x - address_centre.x).abs();
        Ok(shift / (stance / 2.0) * 100.0)
    }

    /// Backswing duration over downswing duration.
    pub fn tempo_ratio(
        sequence: &PoseSequence,
        phases: &SwingPhases,
    ) -> Result<f64, UndefinedCause> {
        let n = sequence.len();
        let back = phases.backswing.span(n);
        let down = phases.downswing.span(n);

        let backswing = phase_duration(sequence, *back.start(), *back.end())?;
        let downswing = phase_duration(sequence, *down.start(), *down.end())?;
        Ok(backswing / downswing)
    }
}

/// Seconds between two frames; must be positive.
fn phase_duration(
    sequence: &PoseSequence,
    start: usize,
    end: usize,
) -> Result<f64, UndefinedCause> {
    match (sequence.timestamp(start), sequence.timestamp(end)) {
        (Some(t0), Some(t1)) if t1 > t0 => Ok(t1 - t0),
        _ => Err(UndefinedCause::Degenerate),
    }
}

// =============================================================================
// TESTS
// =============================================================================
