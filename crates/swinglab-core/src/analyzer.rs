//! # Swing Analyzer
//!
//! The explicit pipeline context: built once from an [`AnalyzerConfig`] and
//! optional score models, then shared by reference across analyses.
//!
//! ```text
//! frames ─► Ingestor ─► PhaseSegmenter ─► MetricExtractor ─┬─► ScoringEngine
//!                                                          │     └─► RecommendationGenerator
//!                                                          └─► ConfidenceEstimator
//! ```
//!
//! The analyzer holds no mutable state, so `&SwingAnalyzer` can be used from
//! many threads at once.

use crate::confidence::ConfidenceEstimator;
use crate::config::AnalyzerConfig;
use crate::ingestor::Ingestor;
use crate::metrics::MetricExtractor;
use crate::primitives::MODEL_VERSION;
use crate::recommendations::RecommendationGenerator;
use crate::scoring::{RuleTable, ScoreModel, ScoringEngine};
use crate::segmenter::PhaseSegmenter;
use crate::types::{Category, PoseFrame, SwingAnalysis, SwingError, VideoInfo};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Which categories are scored by an external model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub model_version: String,
    /// Model name per category; `None` means the rule table is used.
    pub models: BTreeMap<Category, Option<String>>,
}

impl ModelInfo {
    #[must_use]
    pub fn is_model_loaded(&self, category: Category) -> bool {
        self.models.get(&category).is_some_and(Option::is_some)
    }
}

/// Per-item outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    results: Vec<Result<SwingAnalysis, SwingError>>,
}

impl BatchReport {
    #[must_use]
    pub fn from_results(results: Vec<Result<SwingAnalysis, SwingError>>) -> Self {
        Self { results }
    }

    #[must_use]
    pub fn results(&self) -> &[Result<SwingAnalysis, SwingError>] {
        &self.results
    }

    #[must_use]
    pub fn total_processed(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn successful(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// Failed slots with their input index.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &SwingError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(index, r)| r.as_ref().err().map(|e| (index, e)))
    }
}

/// Golf swing analysis pipeline.
#[derive(Debug, Clone)]
pub struct SwingAnalyzer {
    config: AnalyzerConfig,
    segmenter: PhaseSegmenter,
    extractor: MetricExtractor,
    scoring: ScoringEngine,
}

impl SwingAnalyzer {
    /// Build an analyzer using the standard rule table.
    ///
    /// # Errors
    /// Returns `SwingError::InvalidConfig` if the configuration is out of range.
    pub fn new(config: AnalyzerConfig) -> Result<Self, SwingError> {
        config.validate()?;

        let extractor = MetricExtractor::new(&config);
        let segmenter = PhaseSegmenter::new(extractor.wrist(), config.min_visibility);
        let scoring = ScoringEngine::new(RuleTable::standard(config.downswing_speed_threshold));

        Ok(Self {
            config,
            segmenter,
            extractor,
            scoring,
        })
    }

    /// Replace the rule-based score of `category` with `model`.
    #[must_use]
    pub fn with_model(mut self, category: Category, model: Arc<dyn ScoreModel>) -> Self {
        tracing::info!(%category, model = model.name(), "Attached score model");
        self.scoring = self.scoring.with_model(category, model);
        self
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    #[must_use]
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_version: MODEL_VERSION.to_string(),
            models: Category::ALL
                .into_iter()
                .map(|c| (c, self.scoring.model(c).map(|m| m.name().to_string())))
                .collect(),
        }
    }

    /// Run the full pipeline on one capture.
    ///
    /// # Errors
    /// - `SwingError::InsufficientFrames` / `SwingError::InvalidFrame` from ingestion
    /// - `SwingError::MissingLandmarks` in strict visibility mode
    pub fn analyze(&self, frames: Vec<PoseFrame>) -> Result<SwingAnalysis, SwingError> {
        let started = Instant::now();
        let _span = tracing::debug_span!("analyze", frames = frames.len()).entered();

        let sequence = Ingestor::build(frames)?;
        let phases = self.segmenter.segment(&sequence)?;
        tracing::debug!(?phases, "Segmented swing");

        let metrics = self.extractor.extract(&sequence, &phases)?;
        let card = self.scoring.score(&metrics);
        let confidence =
            ConfidenceEstimator::penalize(ConfidenceEstimator::estimate(&sequence), &metrics);
        let recommendations = RecommendationGenerator::generate(&card.scores, &metrics);

        let processing_time_secs = started.elapsed().as_secs_f64();
        tracing::debug!(
            overall = card.scores.overall,
            confidence,
            processing_time_secs,
            "Analysis complete"
        );

        Ok(SwingAnalysis {
            frame_count: sequence.len(),
            duration_secs: sequence.duration_secs(),
            metrics,
            scores: card.scores,
            score_sources: card.sources,
            phases,
            confidence,
            recommendations,
            processing_time_secs,
            model_version: MODEL_VERSION.to_string(),
        })
    }

    /// Reject unusable video metadata, then analyze.
    pub fn analyze_video(
        &self,
        info: &VideoInfo,
        frames: Vec<PoseFrame>,
    ) -> Result<SwingAnalysis, SwingError> {
        Ingestor::precheck_video(info)?;
        self.analyze(frames)
    }

    /// Analyze items one after another.
    ///
    /// Upstream failures occupy their slot unchanged; one failure never stops
    /// the rest of the batch.
    pub fn analyze_batch<I>(&self, items: I) -> BatchReport
    where
        I: IntoIterator<Item = Result<Vec<PoseFrame>, SwingError>>,
    {
        let results = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let outcome = item.and_then(|frames| self.analyze(frames));
                if let Err(e) = &outcome {
                    tracing::warn!(index, error = %e, "Batch item failed");
                }
                outcome
            })
            .collect();

        BatchReport::from_results(results)
    }
}

// =============================================================================
// TESTS
// =============================================================================
