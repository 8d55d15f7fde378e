//! # Core Type Definitions
//!
//! This module contains the fixed-shape records that flow through the pipeline:
//! - Pose input (`Landmark`, `PoseFrame`, `PoseSequence`, `VideoInfo`)
//! - Segmentation output (`SwingPhase`, `PhaseRange`, `SwingPhases`)
//! - Measurements (`MetricKind`, `SwingMetrics`, `UndefinedMetric`)
//! - Assessment (`Category`, `SwingScores`, `Recommendations`, `SwingAnalysis`)
//! - Error types (`SwingError`)
//!
//! ## Lifecycle
//!
//! Every value here is built fresh per analysis and never mutated after
//! construction. `PoseSequence` can only be produced by the
//! [`Ingestor`](crate::Ingestor), so holding one proves the sequence is valid.

use crate::primitives::{LANDMARK_COUNT, PERCENT_MAX, PERCENT_MIN, clamp_finite};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// POSE INPUT
// =============================================================================

/// A single tracked body point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Tracking confidence in [0, 1].
    pub visibility: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }
}

/// One frame of pose-estimator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Seconds since the start of the capture.
    pub timestamp: f64,
    /// Exactly [`LANDMARK_COUNT`] landmarks once validated.
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    #[must_use]
    pub fn new(timestamp: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp,
            landmarks,
        }
    }

    /// A frame where every landmark sits at the same point with the same visibility.
    #[must_use]
    pub fn uniform(timestamp: f64, point: Landmark) -> Self {
        Self::new(timestamp, vec![point; LANDMARK_COUNT])
    }

    /// Landmark by index. Validated frames always hold [`LANDMARK_COUNT`] entries.
    #[must_use]
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// A validated, chronologically ordered pose sequence.
///
/// Invariants (enforced by the Ingestor):
/// - at least `MIN_FRAMES` frames
/// - strictly increasing timestamps
/// - every frame holds exactly `LANDMARK_COUNT` finite landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSequence {
    frames: Vec<PoseFrame>,
}

impl PoseSequence {
    /// Wrap frames that have already passed validation.
    pub(crate) fn from_validated(frames: Vec<PoseFrame>) -> Self {
        Self { frames }
    }

    #[must_use]
    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&PoseFrame> {
        self.frames.get(index)
    }

    #[must_use]
    pub fn timestamp(&self, index: usize) -> Option<f64> {
        self.frames.get(index).map(|f| f.timestamp)
    }

    /// Seconds between the first and last frame.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }
}

/// Container metadata reported by the video collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub frame_count: usize,
    pub fps: f64,
    /// Seconds.
    pub duration: f64,
}

/// Which side of the body leads the swing measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

// =============================================================================
// SWING PHASES
// =============================================================================

/// The five phases of a golf swing, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Address,
    Backswing,
    Downswing,
    Impact,
    FollowThrough,
}

impl SwingPhase {
    pub const ALL: [SwingPhase; 5] = [
        SwingPhase::Address,
        SwingPhase::Backswing,
        SwingPhase::Downswing,
        SwingPhase::Impact,
        SwingPhase::FollowThrough,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SwingPhase::Address => "address",
            SwingPhase::Backswing => "backswing",
            SwingPhase::Downswing => "downswing",
            SwingPhase::Impact => "impact",
            SwingPhase::FollowThrough => "follow_through",
        }
    }
}

/// Half-open frame index range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRange {
    pub start: usize,
    pub end: usize,
}

impl PhaseRange {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Frame indices covering the phase plus the boundary frame into the next
    /// phase, capped at the last frame of an `n`-frame sequence.
    ///
    /// Durations and displacements are measured over this span so a one-frame
    /// phase still has a start and an end.
    #[must_use]
    pub fn span(&self, n: usize) -> std::ops::RangeInclusive<usize> {
        let last = self.end.min(n.saturating_sub(1));
        self.start..=last.max(self.start)
    }
}

/// How the phase boundaries were located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum PhaseDetection {
    /// Boundaries derived from the peak dominant-wrist speed.
    ImpactPeak { frame: usize },
    /// No usable speed peak; fixed proportional split.
    ProportionalFallback,
}

/// Five contiguous ranges that exactly partition `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingPhases {
    pub address: PhaseRange,
    pub backswing: PhaseRange,
    pub downswing: PhaseRange,
    pub impact: PhaseRange,
    pub follow_through: PhaseRange,
    pub detection: PhaseDetection,
}

impl SwingPhases {
    /// Build from four interior cut points over an `n`-frame sequence.
    #[must_use]
    pub fn from_cuts(cuts: [usize; 4], n: usize, detection: PhaseDetection) -> Self {
        Self {
            address: PhaseRange::new(0, cuts[0]),
            backswing: PhaseRange::new(cuts[0], cuts[1]),
            downswing: PhaseRange::new(cuts[1], cuts[2]),
            impact: PhaseRange::new(cuts[2], cuts[3]),
            follow_through: PhaseRange::new(cuts[3], n),
            detection,
        }
    }

    #[must_use]
    pub fn range(&self, phase: SwingPhase) -> PhaseRange {
        match phase {
            SwingPhase::Address => self.address,
            SwingPhase::Backswing => self.backswing,
            SwingPhase::Downswing => self.downswing,
            SwingPhase::Impact => self.impact,
            SwingPhase::FollowThrough => self.follow_through,
        }
    }

    /// All ranges in chronological order.
    #[must_use]
    pub fn ranges(&self) -> [PhaseRange; 5] {
        SwingPhase::ALL.map(|p| self.range(p))
    }

    /// Total frames covered.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.follow_through.end
    }

    /// Phase that owns a frame index.
    #[must_use]
    pub fn phase_of(&self, index: usize) -> Option<SwingPhase> {
        SwingPhase::ALL
            .into_iter()
            .find(|p| self.range(*p).contains(index))
    }
}

// =============================================================================
// METRICS
// =============================================================================

/// The seven kinematic measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    BackswingAngle,
    DownswingSpeed,
    FollowThroughAngle,
    HipRotation,
    ShoulderAlignment,
    WeightTransfer,
    TempoRatio,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::BackswingAngle,
        MetricKind::DownswingSpeed,
        MetricKind::FollowThroughAngle,
        MetricKind::HipRotation,
        MetricKind::ShoulderAlignment,
        MetricKind::WeightTransfer,
        MetricKind::TempoRatio,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::BackswingAngle => "backswing_angle",
            MetricKind::DownswingSpeed => "downswing_speed",
            MetricKind::FollowThroughAngle => "follow_through_angle",
            MetricKind::HipRotation => "hip_rotation",
            MetricKind::ShoulderAlignment => "shoulder_alignment",
            MetricKind::WeightTransfer => "weight_transfer",
            MetricKind::TempoRatio => "tempo_ratio",
        }
    }

    /// Inverse of [`MetricKind::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        MetricKind::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a metric could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "cause")]
pub enum UndefinedCause {
    /// A required landmark was not above the visibility threshold.
    LowVisibility { landmark: usize, frame: usize },
    /// The geometry had no direction (coincident points, zero stance width,
    /// single-frame span).
    Degenerate,
}

/// A metric reported as undefined, with its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefinedMetric {
    pub metric: MetricKind,
    #[serde(flatten)]
    pub cause: UndefinedCause,
}

/// Kinematic measurements of one swing.
///
/// `None` means the metric is undefined; see `undefined` for the cause.
/// Defined values are already clamped:
/// angles to [0, 180], alignment and weight transfer to [0, 100],
/// tempo ratio to [0.5, 5.0], speed to [0, `SPEED_MAX`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SwingMetrics {
    pub backswing_angle: Option<f64>,
    pub downswing_speed: Option<f64>,
    pub follow_through_angle: Option<f64>,
    pub hip_rotation: Option<f64>,
    pub shoulder_alignment: Option<f64>,
    pub weight_transfer: Option<f64>,
    pub tempo_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undefined: Vec<UndefinedMetric>,
}

impl SwingMetrics {
    #[must_use]
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::BackswingAngle => self.backswing_angle,
            MetricKind::DownswingSpeed => self.downswing_speed,
            MetricKind::FollowThroughAngle => self.follow_through_angle,
            MetricKind::HipRotation => self.hip_rotation,
            MetricKind::ShoulderAlignment => self.shoulder_alignment,
            MetricKind::WeightTransfer => self.weight_transfer,
            MetricKind::TempoRatio => self.tempo_ratio,
        }
    }

    pub(crate) fn set(&mut self, kind: MetricKind, value: Option<f64>) {
        let slot = match kind {
            MetricKind::BackswingAngle => &mut self.backswing_angle,
            MetricKind::DownswingSpeed => &mut self.downswing_speed,
            MetricKind::FollowThroughAngle => &mut self.follow_through_angle,
            MetricKind::HipRotation => &mut self.hip_rotation,
            MetricKind::ShoulderAlignment => &mut self.shoulder_alignment,
            MetricKind::WeightTransfer => &mut self.weight_transfer,
            MetricKind::TempoRatio => &mut self.tempo_ratio,
        };
        *slot = value;
    }

    #[must_use]
    pub fn defined_count(&self) -> usize {
        MetricKind::ALL
            .iter()
            .filter(|k| self.get(**k).is_some())
            .count()
    }

    /// Metrics left undefined because landmarks were not visible enough.
    #[must_use]
    pub fn low_visibility_count(&self) -> usize {
        self.undefined
            .iter()
            .filter(|u| matches!(u.cause, UndefinedCause::LowVisibility { .. }))
            .count()
    }
}

// =============================================================================
// SCORES
// =============================================================================

/// The four assessment axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Form,
    Tempo,
    Power,
    Accuracy,
}

impl Category {
    /// Fixed iteration order used by scoring and recommendations.
    pub const ALL: [Category; 4] = [
        Category::Form,
        Category::Tempo,
        Category::Power,
        Category::Accuracy,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Category::Form => "form",
            Category::Tempo => "tempo",
            Category::Power => "power",
            Category::Accuracy => "accuracy",
        }
    }

    /// Parse a lowercase category name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a category score came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum ScoreSource {
    RuleTable,
    Model { name: String },
}

/// Category scores in [0, 100] plus their arithmetic mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingScores {
    pub form: f64,
    pub tempo: f64,
    pub power: f64,
    pub accuracy: f64,
    pub overall: f64,
}

impl SwingScores {
    /// Build from category scores; clamps each and derives `overall`.
    #[must_use]
    pub fn new(form: f64, tempo: f64, power: f64, accuracy: f64) -> Self {
        let clamp = |v: f64| clamp_finite(v, PERCENT_MIN, PERCENT_MAX);
        let (form, tempo, power, accuracy) =
            (clamp(form), clamp(tempo), clamp(power), clamp(accuracy));
        let overall = clamp((form + tempo + power + accuracy) / 4.0);
        Self {
            form,
            tempo,
            power,
            accuracy,
            overall,
        }
    }

    #[must_use]
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Form => self.form,
            Category::Tempo => self.tempo,
            Category::Power => self.power,
            Category::Accuracy => self.accuracy,
        }
    }

    /// Lowest of the four category scores.
    #[must_use]
    pub fn min_category(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|c| self.get(*c))
            .fold(f64::INFINITY, f64::min)
    }

    /// Letter grade for the overall score.
    #[must_use]
    pub fn grade(&self) -> &'static str {
        const GRADES: [(f64, &str); 9] = [
            (90.0, "A+"),
            (85.0, "A"),
            (80.0, "A-"),
            (75.0, "B+"),
            (70.0, "B"),
            (65.0, "B-"),
            (60.0, "C+"),
            (55.0, "C"),
            (50.0, "C-"),
        ];
        GRADES
            .iter()
            .find(|(floor, _)| self.overall >= *floor)
            .map_or("F", |(_, grade)| grade)
    }
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
        }
    }
}

/// Coaching output derived from scores and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub specific_recommendations: Vec<String>,
    pub practice_drills: Vec<String>,
    pub key_insights: Vec<String>,
    pub priority_level: PriorityLevel,
}

// =============================================================================
// ANALYSIS RESULT
// =============================================================================

/// Everything one analysis returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingAnalysis {
    pub metrics: SwingMetrics,
    pub scores: SwingScores,
    pub score_sources: BTreeMap<Category, ScoreSource>,
    pub phases: SwingPhases,
    /// Tracking confidence in [0, 100].
    pub confidence: f64,
    pub recommendations: Recommendations,
    pub frame_count: usize,
    pub duration_secs: f64,
    /// Wall time spent inside the pipeline.
    pub processing_time_secs: f64,
    pub model_version: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the swinglab pipeline.
///
/// - No silent failures
/// - `MissingLandmarks` is soft unless strict visibility is configured
/// - The pipeline never panics; every error is scoped to one analysis
#[derive(Debug, Error)]
pub enum SwingError {
    /// Too few frames for a swing.
    #[error("Insufficient frames for swing analysis: {found} (need at least {required})")]
    InsufficientFrames { found: usize, required: usize },

    /// A frame failed ingestion validation.
    #[error("Invalid frame {index}: {reason}")]
    InvalidFrame { index: usize, reason: String },

    /// Video metadata cannot describe a real capture.
    #[error("Invalid video metadata: {0}")]
    InvalidVideo(String),

    /// A metric's landmarks were not above the visibility threshold.
    #[error("Missing landmarks for {metric}: landmark {landmark} not visible in frame {frame}")]
    MissingLandmarks {
        metric: MetricKind,
        landmark: usize,
        frame: usize,
    },

    /// Pose estimation or video acquisition failed upstream.
    #[error("Upstream acquisition failed: {0}")]
    UpstreamAcquisition(String),

    /// Analyzer configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================
