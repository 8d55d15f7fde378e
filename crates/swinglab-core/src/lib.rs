//! # swinglab-core
//!
//! The golf swing analysis engine for swinglab - THE LOGIC.
//!
//! This crate turns a time-ordered sequence of body-pose landmark frames into a
//! biomechanical assessment: swing phases, kinematic metrics, category scores,
//! a tracking confidence and coaching recommendations.
//!
//! ## Pipeline
//!
//! ```text
//! Ingestor → PhaseSegmenter → MetricExtractor → ScoringEngine → RecommendationGenerator
//!                                            ↘ ConfidenceEstimator
//! ```
//!
//! Data flows strictly forward. [`SwingAnalyzer`] wires the stages together.
//!
//! ## Architectural Constraints
//!
//! - Pure computation: NO async, NO network, NO file formats
//! - Every value is built fresh per analysis and never mutated afterwards
//! - Score models are read-only capabilities shared across threads
//! - Every numeric output is clamped to its documented range

// =============================================================================
// MODULES
// =============================================================================

pub mod analyzer;
pub mod confidence;
pub mod config;
pub mod ingestor;
pub mod metrics;
pub mod primitives;
pub mod recommendations;
pub mod scoring;
pub mod segmenter;
pub mod types;

// Lets the shared test generators name this crate the way integration tests do.
#[cfg(test)]
extern crate self as swinglab_core;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod testing;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Category, Handedness, Landmark, MetricKind, PhaseDetection, PhaseRange, PoseFrame,
    PoseSequence, PriorityLevel, Recommendations, ScoreSource, SwingAnalysis, SwingError,
    SwingMetrics, SwingPhase, SwingPhases, SwingScores, UndefinedCause, UndefinedMetric,
    VideoInfo,
};

// =============================================================================
// RE-EXPORTS: Pipeline Stages
// =============================================================================

pub use analyzer::{BatchReport, ModelInfo, SwingAnalyzer};
pub use confidence::ConfidenceEstimator;
pub use config::AnalyzerConfig;
pub use ingestor::Ingestor;
pub use metrics::MetricExtractor;
pub use recommendations::RecommendationGenerator;
pub use scoring::{
    Condition, LinearScoreModel, RuleTable, RuleTier, ScoreCard, ScoreModel, ScoreRule,
    ScoringEngine,
};
pub use segmenter::PhaseSegmenter;
