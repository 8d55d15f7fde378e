//! # Scoring Engine
//!
//! Turns [`SwingMetrics`] into four category scores and their mean.
//!
//! ## Rule table
//!
//! Every category starts at `BASE_SCORE` and collects additive bonuses,
//! capped at 100. A rule holds ordered tiers; the first tier whose condition
//! matches awards its bonus. An undefined metric matches nothing.
//!
//! ## Score models
//!
//! A [`ScoreModel`] attached to a category replaces the rule-based score for
//! that category entirely. Models are shared read-only across analyses.

use crate::primitives::{BASE_SCORE, PERCENT_MAX, PERCENT_MIN, clamp_finite};
use crate::types::{Category, MetricKind, ScoreSource, SwingMetrics, SwingScores};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// SCORE MODELS
// =============================================================================

/// External scoring capability for one category.
///
/// Implementations must be pure: the same metrics always give the same score,
/// and scoring never mutates the model.
pub trait ScoreModel: Send + Sync {
    /// Score in [0, 100]. Out-of-range output is clamped by the engine;
    /// non-finite output falls back to the rule table.
    fn score(&self, metrics: &SwingMetrics) -> f64;

    /// Name reported alongside scores this model produced.
    fn name(&self) -> &str;
}

/// `intercept + sum(weight * metric)`; undefined metrics contribute nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScoreModel {
    name: String,
    intercept: f64,
    weights: BTreeMap<MetricKind, f64>,
}

impl LinearScoreModel {
    #[must_use]
    pub fn new(name: impl Into<String>, intercept: f64) -> Self {
        Self {
            name: name.into(),
            intercept,
            weights: BTreeMap::new(),
        }
    }

    /// Set the weight of one metric.
    #[must_use]
    pub fn with_weight(mut self, metric: MetricKind, weight: f64) -> Self {
        self.weights.insert(metric, weight);
        self
    }
}

impl ScoreModel for LinearScoreModel {
    fn score(&self, metrics: &SwingMetrics) -> f64 {
        self.weights
            .iter()
            .filter_map(|(metric, weight)| metrics.get(*metric).map(|value| value * weight))
            .fold(self.intercept, |acc, term| acc + term)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// RULE TABLE
// =============================================================================

/// Test applied to one metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Condition {
    /// `value > threshold`
    Above { threshold: f64 },
    /// `min <= value <= max`
    Within { min: f64, max: f64 },
    /// `min <= value < max`
    HalfOpen { min: f64, max: f64 },
}

impl Condition {
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Condition::Above { threshold } => value > threshold,
            Condition::Within { min, max } => value >= min && value <= max,
            Condition::HalfOpen { min, max } => value >= min && value < max,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Above { threshold } => write!(f, "> {}", threshold),
            Condition::Within { min, max } => write!(f, "in [{}, {}]", min, max),
            Condition::HalfOpen { min, max } => write!(f, "in [{}, {})", min, max),
        }
    }
}

/// One bonus level of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RuleTier {
    pub condition: Condition,
    pub bonus: f64,
}

/// A bonus rule: the first matching tier pays out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRule {
    pub category: Category,
    pub metric: MetricKind,
    pub tiers: Vec<RuleTier>,
}

impl ScoreRule {
    /// Single-tier `metric > threshold` rule.
    #[must_use]
    pub fn above(category: Category, metric: MetricKind, threshold: f64, bonus: f64) -> Self {
        Self {
            category,
            metric,
            tiers: vec![RuleTier {
                condition: Condition::Above { threshold },
                bonus,
            }],
        }
    }

    /// Bonus earned from `metrics`; 0 if the metric is undefined or no tier matches.
    #[must_use]
    pub fn bonus(&self, metrics: &SwingMetrics) -> f64 {
        metrics
            .get(self.metric)
            .and_then(|value| self.tiers.iter().find(|t| t.condition.matches(value)))
            .map_or(0.0, |tier| tier.bonus)
    }
}

/// Deterministic rule-based scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTable {
    base: f64,
    rules: Vec<ScoreRule>,
}

impl RuleTable {
    /// The standard table, with the power rule keyed on `downswing_speed_threshold`.
    #[must_use]
    pub fn standard(downswing_speed_threshold: f64) -> Self {
        use Category::{Accuracy, Form, Power, Tempo};
        use MetricKind::{
            DownswingSpeed, HipRotation, ShoulderAlignment, TempoRatio, WeightTransfer,
        };

        let tempo = ScoreRule {
            category: Tempo,
            metric: TempoRatio,
            tiers: vec![
                RuleTier {
                    condition: Condition::Within { min: 2.5, max: 3.5 },
                    bonus: 20.0,
                },
                RuleTier {
                    condition: Condition::HalfOpen { min: 2.0, max: 4.0 },
                    bonus: 10.0,
                },
            ],
        };

        Self {
            base: BASE_SCORE,
            rules: vec![
                ScoreRule::above(Form, ShoulderAlignment, 80.0, 10.0),
                ScoreRule::above(Form, HipRotation, 70.0, 10.0),
                ScoreRule::above(Form, WeightTransfer, 80.0, 10.0),
                tempo,
                ScoreRule::above(Power, DownswingSpeed, downswing_speed_threshold, 15.0),
                ScoreRule::above(Power, HipRotation, 80.0, 15.0),
                ScoreRule::above(Accuracy, ShoulderAlignment, 85.0, 15.0),
                ScoreRule::above(Accuracy, WeightTransfer, 85.0, 15.0),
            ],
        }
    }

    #[must_use]
    pub fn base(&self) -> f64 {
        self.base
    }

    #[must_use]
    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    pub fn rules_for(&self, category: Category) -> impl Iterator<Item = &ScoreRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }

    /// Base plus every earned bonus for `category`, clamped to [0, 100].
    #[must_use]
    pub fn score(&self, category: Category, metrics: &SwingMetrics) -> f64 {
        let bonus: f64 = self.rules_for(category).map(|r| r.bonus(metrics)).sum();
        clamp_finite(self.base + bonus, PERCENT_MIN, PERCENT_MAX)
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Scores plus where each category score came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub scores: SwingScores,
    pub sources: BTreeMap<Category, ScoreSource>,
}

/// Rule table plus optional per-category model overrides.
#[derive(Clone)]
pub struct ScoringEngine {
    rules: RuleTable,
    models: BTreeMap<Category, Arc<dyn ScoreModel>>,
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let models: BTreeMap<Category, &str> =
            self.models.iter().map(|(c, m)| (*c, m.name())).collect();
        f.debug_struct("ScoringEngine")
            .field("rules", &self.rules)
            .field("models", &models)
            .finish()
    }
}

impl ScoringEngine {
    #[must_use]
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            models: BTreeMap::new(),
        }
    }

    /// Attach a model that replaces the rule-based score for `category`.
    #[must_use]
    pub fn with_model(mut self, category: Category, model: Arc<dyn ScoreModel>) -> Self {
        self.models.insert(category, model);
        self
    }

    #[must_use]
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Model attached to `category`, if any.
    #[must_use]
    pub fn model(&self, category: Category) -> Option<&dyn ScoreModel> {
        self.models.get(&category).map(|m| &**m)
    }

    /// Score every category. Never fails.
    #[must_use]
    pub fn score(&self, metrics: &SwingMetrics) -> ScoreCard {
        let results =
            Category::ALL.map(|category| (category, self.score_category(category, metrics)));
        let [form, tempo, power, accuracy] = results.each_ref().map(|(_, (score, _))| *score);

        let sources = results
            .into_iter()
            .map(|(category, (_, source))| (category, source))
            .collect();

        ScoreCard {
            scores: SwingScores::new(form, tempo, power, accuracy),
            sources,
        }
    }

    fn score_category(&self, category: Category, metrics: &SwingMetrics) -> (f64, ScoreSource) {
        let rule_score = self.rules.score(category, metrics);

        let Some(model) = self.models.get(&category) else {
            return (rule_score, ScoreSource::RuleTable);
        };

        let raw = model.score(metrics);
        if !raw.is_finite() {
            tracing::warn!(
                %category,
                model = model.name(),
                raw,
                "Score model returned a non-finite value, using rule table"
            );
            return (rule_score, ScoreSource::RuleTable);
        }

        tracing::debug!(%category, model = model.name(), raw, "Scored with model");
        (
            clamp_finite(raw, PERCENT_MIN, PERCENT_MAX),
            ScoreSource::Model {
                name: model.name().to_string(),
            },
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
