use serde::{Deserialize, Serialize};

use super::rules::Rule;
use super::scoring::WeightConfig;
use super::screening::ScreeningQuestion;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Criteria a drive publishes. Each list is optional; an empty list passes vacuously.
///
/// Unknown keys are rejected so a misspelled list never silently evaluates as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub weights: Vec<WeightConfig>,
    #[serde(default)]
    pub questions: Vec<ScreeningQuestion>,
}

impl EvaluationConfig {
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|config| config.weight).sum()
    }

    /// Whether the weights sum to 1, the only configuration that keeps the
    /// composite score within 0-100. No weights counts as balanced.
    pub fn weights_balanced(&self) -> bool {
        self.weights.is_empty() || (self.total_weight() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}
