//! Rule, scoring, and screening evaluation for placement drives.
//!
//! Every function here is a pure function of its arguments. Outcomes carry
//! the explanation strings shown to candidates, so their wording is part of
//! the contract.

mod config;
mod policy;
mod predicate;
mod rules;
mod scoring;
mod screening;
mod value;

pub use config::EvaluationConfig;
pub use policy::{decide, Decision};
pub use predicate::{check, compare, explain, Operator, PredicateError};
pub use rules::{evaluate_eligibility, evaluate_rule, EligibilityOutcome, EvaluationResult, Rule};
pub use scoring::{normalize, raw_value, score, ScoreBreakdown, ScoringOutcome, WeightConfig};
pub use screening::{
    evaluate_screening, QuestionKind, ScreeningOutcome, ScreeningQuestion, ScreeningResponses,
};
pub use value::{AttributeValue, CandidateRecord};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless evaluator that applies a drive's criteria to a candidate.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    /// Wraps the criteria as-is. Weight balance is checked where criteria are
    /// published; see [`EvaluationConfig::weights_balanced`].
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        record: &CandidateRecord,
        responses: &ScreeningResponses,
    ) -> EvaluationOutcome {
        let eligibility = evaluate_eligibility(record, &self.config.rules);
        let screening = evaluate_screening(&self.config.questions, responses);
        let scoring = score(record, &self.config.weights);
        let decision = decide(&eligibility, &screening);

        debug!(
            decision = decision.label(),
            composite_score = scoring.composite_score,
            failed_rules = eligibility.failures().count(),
            failed_questions = screening.failed_questions.len(),
            "candidate evaluated"
        );

        EvaluationOutcome {
            decision,
            eligibility,
            scoring,
            screening,
        }
    }
}

/// Decision plus the explanation bundle from each evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub decision: Decision,
    pub eligibility: EligibilityOutcome,
    pub scoring: ScoringOutcome,
    pub screening: ScreeningOutcome,
}

impl EvaluationOutcome {
    pub fn composite_score(&self) -> f64 {
        self.scoring.composite_score
    }

    /// One-line reason for the decision, citing the failing rules or questions.
    pub fn rationale(&self) -> String {
        match self.decision {
            Decision::Eligible => self.decision.summary().to_string(),
            Decision::NotEligible => {
                let reasons: Vec<&str> = self
                    .eligibility
                    .failures()
                    .map(|result| result.explanation.as_str())
                    .collect();
                format!("{}: {}", self.decision.summary(), reasons.join("; "))
            }
            Decision::Rejected => format!(
                "{}: failed question(s) {}",
                self.decision.summary(),
                self.screening.failed_questions.join(", ")
            ),
        }
    }
}
