use serde::{Deserialize, Serialize};

use super::value::{AttributeValue, CandidateRecord};

/// Weight applied to one attribute's normalized sub-score.
///
/// Drives conventionally configure weights in `[0, 1]` summing to `1.0`;
/// nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub attribute: String,
    pub weight: f64,
}

impl WeightConfig {
    pub fn new(attribute: impl Into<String>, weight: f64) -> Self {
        Self {
            attribute: attribute.into(),
            weight,
        }
    }
}

/// Contribution of one weighted attribute to the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub attribute: String,
    pub raw_value: f64,
    pub normalized_score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub explanation: String,
}

/// Composite score plus its breakdown in weight-declaration order.
///
/// **The composite is not clamped.** It only lands in `[0, 100]` when the
/// weights sum to `1.0` and every sub-score is already within `[0, 100]`.
/// Misconfigured weights, negative weights, or pass-through attributes can
/// push it above 100 or below 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub composite_score: f64,
    pub breakdown: Vec<ScoreBreakdown>,
}

/// Extracts the numeric input for normalization.
///
/// Numbers pass through, lists reduce to their length, and anything else
/// (including a missing attribute) counts as zero.
pub fn raw_value(record: &CandidateRecord, attribute: &str) -> f64 {
    match record.get(attribute) {
        Some(AttributeValue::Number(value)) => *value,
        Some(AttributeValue::List(items)) => items.len() as f64,
        Some(AttributeValue::Text(_)) | Some(AttributeValue::Boolean(_)) | None => 0.0,
    }
}

/// Maps a raw value onto the 0–100 scale for the attributes with a known scale.
pub fn normalize(attribute: &str, raw: f64) -> f64 {
    match attribute {
        // cgpa is reported on a 10 point scale
        "cgpa" => raw / 10.0 * 100.0,
        "skills" => (raw / 5.0 * 100.0).min(100.0),
        "backlog_count" => (100.0 - raw * 25.0).max(0.0),
        _ => raw,
    }
}

/// Computes the weighted composite score. See [`ScoringOutcome`] for bounds.
pub fn score(record: &CandidateRecord, weights: &[WeightConfig]) -> ScoringOutcome {
    let mut composite_score = 0.0;
    let mut breakdown = Vec::with_capacity(weights.len());

    for config in weights {
        let raw = raw_value(record, &config.attribute);
        let normalized_score = normalize(&config.attribute, raw);
        let weighted_score = normalized_score * config.weight;
        composite_score += weighted_score;

        breakdown.push(ScoreBreakdown {
            attribute: config.attribute.clone(),
            raw_value: raw,
            normalized_score,
            weight: config.weight,
            weighted_score,
            explanation: format!(
                "Value \"{raw}\" for {} contributed {weighted_score:.2} to the total.",
                config.attribute
            ),
        });
    }

    ScoringOutcome {
        composite_score,
        breakdown,
    }
}
