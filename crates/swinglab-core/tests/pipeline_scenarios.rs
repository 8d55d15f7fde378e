//! # Pipeline Scenario Tests
//!
//! End-to-end behaviour of the analyzer on known captures.
//!
//! ## Groups
//! - Confidence: visibility aggregation
//! - Metrics: clamping on a known swing
//! - Errors: short captures and strict visibility
//! - Batch: per-item isolation and ordering
//! - Scoring: rule table and model overrides

mod common;

use std::sync::Arc;
use swinglab_core::{
    AnalyzerConfig, Category, ConfidenceEstimator, Handedness, LinearScoreModel, MetricKind,
    PhaseDetection, RuleTable, ScoreSource, ScoringEngine, SwingAnalyzer, SwingError,
    SwingMetrics,
};

fn analyzer() -> SwingAnalyzer {
    SwingAnalyzer::new(AnalyzerConfig::default()).expect("analyzer")
}

// =============================================================================
// CONFIDENCE
// =============================================================================

mod confidence {
    use super::*;

    /// Full visibility everywhere gives full confidence.
    #[test]
    fn all_visible_is_one_hundred() {
        let frames = common::still(12, 1.0);
        assert_eq!(ConfidenceEstimator::estimate_frames(&frames), 100.0);
    }

    /// Zero visibility everywhere gives zero confidence.
    #[test]
    fn all_hidden_is_zero() {
        let frames = common::still(12, 0.0);
        assert_eq!(ConfidenceEstimator::estimate_frames(&frames), 0.0);
    }

    /// Uniform 0.8 visibility over 12 frames gives 80.
    #[test]
    fn uniform_point_eight_is_eighty() {
        let frames = common::still(12, 0.8);
        let confidence = ConfidenceEstimator::estimate_frames(&frames);
        assert!((confidence - 80.0).abs() < 1e-9, "got {}", confidence);
    }

    /// A fully tracked swing keeps full confidence through the pipeline.
    #[test]
    fn clean_swing_keeps_full_confidence() {
        let analysis = analyzer().analyze(common::swing(40, 1.0)).expect("analyze");
        assert_eq!(analysis.confidence, 100.0);
    }
}

// =============================================================================
// METRICS
// =============================================================================

mod metrics {
    use super::*;

    /// A raw tempo ratio of 6.0 is reported clamped to 5.0.
    #[test]
    fn tempo_ratio_clamped_to_five() {
        let analysis = analyzer().analyze(common::swing(40, 1.0)).expect("analyze");

        assert_eq!(
            analysis.phases.detection,
            PhaseDetection::ImpactPeak { frame: 28 }
        );
        assert_eq!(analysis.metrics.tempo_ratio, Some(5.0));
    }

    /// Every metric is measured on a fully visible swing.
    #[test]
    fn clean_swing_defines_all_metrics() {
        let analysis = analyzer().analyze(common::swing(40, 1.0)).expect("analyze");

        assert_eq!(analysis.metrics.defined_count(), 7);
        assert!((analysis.duration_secs - 39.0 / 30.0).abs() < 1e-9);
    }

    /// Hidden landmarks leave metrics undefined instead of defaulting them.
    #[test]
    fn hidden_landmarks_are_undefined_not_zero() {
        let analysis = analyzer().analyze(common::swing(40, 0.2)).expect("analyze");

        assert_eq!(analysis.metrics.backswing_angle, None);
        assert_eq!(analysis.metrics.shoulder_alignment, None);
        assert_eq!(analysis.metrics.low_visibility_count(), 6);
        // Bonuses for undefined metrics are skipped.
        assert_eq!(analysis.scores.form, 70.0);
    }

    /// Visibility exactly at the 0.3 threshold does not count as visible.
    #[test]
    fn threshold_visibility_is_undefined() {
        let analysis = analyzer().analyze(common::swing(40, 0.3)).expect("analyze");

        assert_eq!(analysis.metrics.defined_count(), 1);
        assert_eq!(analysis.metrics.low_visibility_count(), 6);
        assert_eq!(analysis.phases.detection, PhaseDetection::ProportionalFallback);
    }

    /// A left-handed analyzer follows the left wrist.
    #[test]
    fn left_handed_tracks_left_wrist() {
        let config = AnalyzerConfig {
            handedness: Handedness::Left,
            ..AnalyzerConfig::default()
        };
        let analysis = SwingAnalyzer::new(config)
            .expect("analyzer")
            .analyze(common::swing(40, 1.0))
            .expect("analyze");

        assert_eq!(
            analysis.phases.detection,
            PhaseDetection::ImpactPeak { frame: 28 }
        );
        assert!(analysis.metrics.downswing_speed.is_some());
    }
}

// =============================================================================
// ERRORS
// =============================================================================

mod errors {
    use super::*;

    /// Nine frames fail with InsufficientFrames and no partial result.
    #[test]
    fn nine_frames_rejected() {
        let result = analyzer().analyze(common::swing(9, 1.0));

        assert!(matches!(
            result,
            Err(SwingError::InsufficientFrames {
                found: 9,
                required: 10
            })
        ));
    }

    /// Strict visibility turns a hidden landmark into a hard error.
    #[test]
    fn strict_visibility_aborts() {
        let config = AnalyzerConfig {
            strict_visibility: true,
            ..AnalyzerConfig::default()
        };
        let result = SwingAnalyzer::new(config)
            .expect("analyzer")
            .analyze(common::swing(40, 0.2));

        assert!(matches!(result, Err(SwingError::MissingLandmarks { .. })));
    }

    /// Error messages name the problem.
    #[test]
    fn error_messages_are_descriptive() {
        let err = analyzer()
            .analyze(common::still(5, 1.0))
            .expect_err("too short");
        assert_eq!(
            err.to_string(),
            "Insufficient frames for swing analysis: 5 (need at least 10)"
        );
    }
}

// =============================================================================
// BATCH
// =============================================================================

mod batch {
    use super::*;

    /// A short item fails alone; its siblings still get full results.
    #[test]
    fn short_item_fails_alone() {
        let items = vec![
            Ok(common::swing(40, 1.0)),
            Ok(common::still(5, 1.0)),
            Ok(common::swing(40, 1.0)),
        ];

        let report = analyzer().analyze_batch(items);

        assert_eq!(report.total_processed(), 3);
        assert_eq!(report.successful(), 2);
        assert_eq!(report.failed(), 1);

        let results = report.results();
        let first = results[0].as_ref().expect("item 1");
        let third = results[2].as_ref().expect("item 3");
        assert_eq!(first.metrics.defined_count(), 7);
        assert_eq!(first.scores, third.scores);

        let err = results[1].as_ref().expect_err("item 2");
        assert!(err.to_string().contains("Insufficient frames"));
    }

    /// Upstream failures pass through unchanged.
    #[test]
    fn upstream_error_preserved() {
        let items = vec![
            Err(SwingError::UpstreamAcquisition("decoder crashed".to_string())),
            Ok(common::swing(30, 1.0)),
        ];

        let report = analyzer().analyze_batch(items);
        let errors: Vec<String> = report.errors().map(|(_, e)| e.to_string()).collect();

        assert_eq!(errors, vec!["Upstream acquisition failed: decoder crashed"]);
        assert_eq!(report.successful(), 1);
    }

    /// An empty batch reports zero of everything.
    #[test]
    fn empty_batch() {
        let report = analyzer().analyze_batch(Vec::new());
        assert_eq!(report.total_processed(), 0);
        assert_eq!(report.successful(), 0);
    }
}

// =============================================================================
// SCORING
// =============================================================================

mod scoring {
    use super::*;

    /// Alignment 90, hip rotation 75, weight transfer 85 cap form at 100.
    #[test]
    fn form_capped_at_one_hundred() {
        let metrics = SwingMetrics {
            shoulder_alignment: Some(90.0),
            hip_rotation: Some(75.0),
            weight_transfer: Some(85.0),
            ..SwingMetrics::default()
        };

        let engine = ScoringEngine::new(RuleTable::standard(4.0));
        assert_eq!(engine.score(&metrics).scores.form, 100.0);
    }

    /// A model fully replaces its category and leaves the others alone.
    #[test]
    fn model_override_without_blending() {
        let model = LinearScoreModel::new("tempo-linear", 100.0)
            .with_weight(MetricKind::TempoRatio, -10.0);
        let analyzer = analyzer().with_model(Category::Tempo, Arc::new(model));

        let analysis = analyzer.analyze(common::swing(40, 1.0)).expect("analyze");

        // 100 - 10 * 5.0
        assert_eq!(analysis.scores.tempo, 50.0);
        assert_eq!(
            analysis.score_sources[&Category::Tempo],
            ScoreSource::Model {
                name: "tempo-linear".to_string()
            }
        );
        assert_eq!(analysis.score_sources[&Category::Form], ScoreSource::RuleTable);
    }
}
