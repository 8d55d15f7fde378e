//! # Application Configuration
//!
//! Optional TOML file passed with `--config`:
//!
//! ```toml
//! [analyzer]
//! min_visibility = 0.4
//! handedness = "left"
//! downswing_speed_threshold = 3.5
//!
//! [models.power]
//! name = "power-linear-v2"
//! intercept = 40.0
//! weights = { downswing_speed = 6.0, hip_rotation = 0.2 }
//! ```
//!
//! Every `[models.<category>]` table becomes a [`LinearScoreModel`] that
//! replaces the rule table for that category.

use crate::capture::{MAX_CONFIG_FILE_SIZE, read_validated};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use swinglab_core::{
    AnalyzerConfig, Category, LinearScoreModel, MetricKind, SwingAnalyzer, SwingError,
};

/// One linear score model as written in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Reported model name; defaults to `linear-<category>`.
    pub name: Option<String>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl ModelConfig {
    fn build(&self, category: Category) -> Result<LinearScoreModel, SwingError> {
        if !self.intercept.is_finite() {
            return Err(SwingError::InvalidConfig(format!(
                "models.{}: intercept must be finite",
                category
            )));
        }

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("linear-{}", category));

        self.weights
            .iter()
            .try_fold(LinearScoreModel::new(name, self.intercept), |model, (metric, weight)| {
                let kind = MetricKind::from_name(metric).ok_or_else(|| {
                    SwingError::InvalidConfig(format!(
                        "models.{}: unknown metric '{}'",
                        category, metric
                    ))
                })?;
                if !weight.is_finite() {
                    return Err(SwingError::InvalidConfig(format!(
                        "models.{}: weight for '{}' must be finite",
                        category, metric
                    )));
                }
                Ok(model.with_weight(kind, *weight))
            })
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub analyzer: AnalyzerConfig,
    /// Keyed by category name (`form`, `tempo`, `power`, `accuracy`).
    pub models: BTreeMap<String, ModelConfig>,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SwingError> {
        toml::from_str(text).map_err(|e| SwingError::InvalidConfig(e.to_string()))
    }

    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, SwingError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        tracing::info!("Loading configuration from {:?}", path);
        let contents = read_validated(path, MAX_CONFIG_FILE_SIZE)?;
        let text = String::from_utf8(contents)
            .map_err(|e| SwingError::InvalidConfig(format!("Config is not UTF-8: {}", e)))?;
        Self::from_toml_str(&text)
    }

    /// Build the analyzer with every configured model attached.
    pub fn build_analyzer(&self) -> Result<SwingAnalyzer, SwingError> {
        let mut analyzer = SwingAnalyzer::new(self.analyzer.clone())?;

        for (key, model) in &self.models {
            let category = Category::from_name(key).ok_or_else(|| {
                SwingError::InvalidConfig(format!("unknown score category '{}'", key))
            })?;
            analyzer = analyzer.with_model(category, Arc::new(model.build(category)?));
        }

        Ok(analyzer)
    }
}
