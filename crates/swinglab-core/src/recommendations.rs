//! # Recommendation Generator
//!
//! Deterministic coaching output from scores and metrics.
//!
//! Categories are visited in the fixed order form, tempo, power, accuracy:
//! - score > 85 adds the category's strength
//! - score < 80 adds its improvement area, tip and drill
//!
//! Priority is driven by the weakest category.

use crate::types::{Category, PriorityLevel, Recommendations, SwingMetrics, SwingScores};

/// Scores above this are strengths.
pub const STRENGTH_THRESHOLD: f64 = 85.0;

/// Scores below this need improvement.
pub const IMPROVEMENT_THRESHOLD: f64 = 80.0;

/// Weakest score below this makes the priority high.
pub const HIGH_PRIORITY_THRESHOLD: f64 = 70.0;

/// Upper bound on key insights per analysis.
pub const MAX_KEY_INSIGHTS: usize = 5;

const FALLBACK_STRENGTH: &str = "Good overall technique";

struct Coaching {
    strength: &'static str,
    improvement: &'static str,
    tip: &'static str,
    drill: &'static str,
}

fn coaching(category: Category) -> &'static Coaching {
    const FORM: Coaching = Coaching {
        strength: "Excellent form fundamentals",
        improvement: "Form consistency",
        tip: "Focus on maintaining proper posture throughout swing",
        drill: "Mirror work for posture awareness",
    };
    const TEMPO: Coaching = Coaching {
        strength: "Good tempo control",
        improvement: "Tempo control",
        tip: "Work on 3:1 backswing to downswing ratio",
        drill: "Metronome practice with slow motion swings",
    };
    const POWER: Coaching = Coaching {
        strength: "Strong power generation",
        improvement: "Power generation",
        tip: "Improve hip rotation and weight transfer",
        drill: "Medicine ball throws for power development",
    };
    const ACCURACY: Coaching = Coaching {
        strength: "Consistent accuracy",
        improvement: "Accuracy and consistency",
        tip: "Focus on shoulder alignment and target awareness",
        drill: "Alignment stick drills",
    };

    match category {
        Category::Form => &FORM,
        Category::Tempo => &TEMPO,
        Category::Power => &POWER,
        Category::Accuracy => &ACCURACY,
    }
}

/// Maps an assessment to coaching advice.
pub struct RecommendationGenerator;

impl RecommendationGenerator {
    #[must_use]
    pub fn generate(scores: &SwingScores, metrics: &SwingMetrics) -> Recommendations {
        let mut strengths = Vec::new();
        let mut areas_for_improvement = Vec::new();
        let mut specific_recommendations = Vec::new();
        let mut practice_drills = Vec::new();

        for category in Category::ALL {
            let score = scores.get(category);
            let advice = coaching(category);

            if score > STRENGTH_THRESHOLD {
                strengths.push(advice.strength.to_string());
            }
            if score < IMPROVEMENT_THRESHOLD {
                areas_for_improvement.push(advice.improvement.to_string());
                specific_recommendations.push(advice.tip.to_string());
                practice_drills.push(advice.drill.to_string());
            }
        }

        if strengths.is_empty() {
            strengths.push(FALLBACK_STRENGTH.to_string());
        }

        Recommendations {
            strengths,
            areas_for_improvement,
            specific_recommendations,
            practice_drills,
            key_insights: Self::key_insights(metrics),
            priority_level: Self::priority(scores),
        }
    }

    /// high below 70, medium below 80, low otherwise; judged on the weakest category.
    #[must_use]
    pub fn priority(scores: &SwingScores) -> PriorityLevel {
        let weakest = scores.min_category();
        if weakest < HIGH_PRIORITY_THRESHOLD {
            PriorityLevel::High
        } else if weakest < IMPROVEMENT_THRESHOLD {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    /// Short observations read directly off the metrics.
    #[must_use]
    pub fn key_insights(metrics: &SwingMetrics) -> Vec<String> {
        let mut insights = Vec::new();

        if let Some(ratio) = metrics.tempo_ratio {
            if ratio < 1.0 {
                insights.push("Backswing is faster than downswing - aim for 3:1 ratio");
            } else if !(2.5..=3.5).contains(&ratio) {
                insights.push("Tempo is off the ideal 3:1 rhythm - focus on timing");
            }
        }

        if metrics.follow_through_angle.is_some_and(|angle| angle < 80.0) {
            insights.push("Follow-through could be more complete");
        }

        if metrics.shoulder_alignment.is_some_and(|score| score < 80.0) {
            insights.push("Alignment could be more precise");
        }

        if !metrics.undefined.is_empty() {
            insights.push("Some metrics could not be measured - check camera angle and lighting");
        }

        if insights.is_empty() {
            insights.push("Analysis completed successfully");
        }

        insights
            .into_iter()
            .take(MAX_KEY_INSIGHTS)
            .map(String::from)
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricKind, UndefinedCause, UndefinedMetric};

    #[test]
    fn strong_scores_give_strengths_only() {
        let scores = SwingScores::new(90.0, 95.0, 88.0, 86.0);
        let recs = RecommendationGenerator::generate(&scores, &SwingMetrics::default());

        assert_eq!(recs.strengths.len(), 4);
        assert_eq!(recs.strengths[0], "Excellent form fundamentals");
        assert!(recs.areas_for_improvement.is_empty());
        assert!(recs.practice_drills.is_empty());
        assert_eq!(recs.priority_level, PriorityLevel::Low);
    }

    #[test]
    fn weak_category_gets_full_advice() {
        let scores = SwingScores::new(82.0, 70.0, 82.0, 82.0);
        let recs = RecommendationGenerator::generate(&scores, &SwingMetrics::default());

        assert_eq!(recs.areas_for_improvement, vec!["Tempo control"]);
        assert_eq!(
            recs.specific_recommendations,
            vec!["Work on 3:1 backswing to downswing ratio"]
        );
        assert_eq!(
            recs.practice_drills,
            vec!["Metronome practice with slow motion swings"]
        );
        assert_eq!(recs.priority_level, PriorityLevel::Medium);
    }

    #[test]
    fn no_strength_uses_fallback() {
        let scores = SwingScores::new(70.0, 70.0, 70.0, 70.0);
        let recs = RecommendationGenerator::generate(&scores, &SwingMetrics::default());

        assert_eq!(recs.strengths, vec!["Good overall technique"]);
        assert_eq!(recs.areas_for_improvement.len(), 4);
    }

    #[test]
    fn advice_follows_category_order() {
        let scores = SwingScores::new(60.0, 90.0, 60.0, 60.0);
        let recs = RecommendationGenerator::generate(&scores, &SwingMetrics::default());

        assert_eq!(
            recs.areas_for_improvement,
            vec!["Form consistency", "Power generation", "Accuracy and consistency"]
        );
        assert_eq!(recs.priority_level, PriorityLevel::High);
    }

    #[test]
    fn priority_boundaries() {
        let priority =
            |s: f64| RecommendationGenerator::priority(&SwingScores::new(s, 95.0, 95.0, 95.0));

        assert_eq!(priority(69.9), PriorityLevel::High);
        assert_eq!(priority(70.0), PriorityLevel::Medium);
        assert_eq!(priority(79.9), PriorityLevel::Medium);
        assert_eq!(priority(80.0), PriorityLevel::Low);
    }

    #[test]
    fn insights_from_metrics() {
        let metrics = SwingMetrics {
            tempo_ratio: Some(0.8),
            follow_through_angle: Some(45.0),
            shoulder_alignment: Some(70.0),
            ..SwingMetrics::default()
        };

        let insights = RecommendationGenerator::key_insights(&metrics);
        assert_eq!(
            insights,
            vec![
                "Backswing is faster than downswing - aim for 3:1 ratio",
                "Follow-through could be more complete",
                "Alignment could be more precise",
            ]
        );
    }

    #[test]
    fn undefined_metric_adds_tracking_insight() {
        let mut metrics = SwingMetrics {
            tempo_ratio: Some(3.0),
            ..SwingMetrics::default()
        };
        metrics.undefined.push(UndefinedMetric {
            metric: MetricKind::HipRotation,
            cause: UndefinedCause::Degenerate,
        });

        let insights = RecommendationGenerator::key_insights(&metrics);
        assert_eq!(insights.len(), 1);
        assert!(insights[0].starts_with("Some metrics could not be measured"));
    }

    #[test]
    fn clean_swing_reports_success() {
        let metrics = SwingMetrics {
            tempo_ratio: Some(3.0),
            follow_through_angle: Some(120.0),
            shoulder_alignment: Some(95.0),
            ..SwingMetrics::default()
        };

        assert_eq!(
            RecommendationGenerator::key_insights(&metrics),
            vec!["Analysis completed successfully"]
        );
    }
}
