use serde::{Deserialize, Serialize};

use super::predicate::{compare, explain, Operator};
use super::value::{AttributeValue, CandidateRecord};

/// Declarative eligibility predicate over one candidate attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub field: String,
    pub operator: Operator,
    pub value: AttributeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            operator,
            value: value.into(),
            label: None,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name shown to candidates; falls back to the attribute name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }
}

/// Verdict for a single rule, kept so candidates can see why they passed or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rule_id: String,
    pub field: String,
    pub operator: Operator,
    pub expected_value: AttributeValue,
    pub actual_value: Option<AttributeValue>,
    pub passed: bool,
    pub explanation: String,
}

/// Aggregate eligibility verdict with the per-rule trail in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub is_eligible: bool,
    pub evaluations: Vec<EvaluationResult>,
}

impl EligibilityOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.evaluations.iter().filter(|result| !result.passed)
    }
}

pub fn evaluate_rule(record: &CandidateRecord, rule: &Rule) -> EvaluationResult {
    let actual = record.get(&rule.field);
    let passed = compare(actual, &rule.operator, &rule.value);

    EvaluationResult {
        rule_id: rule.id.clone(),
        field: rule.field.clone(),
        operator: rule.operator.clone(),
        expected_value: rule.value.clone(),
        actual_value: actual.cloned(),
        passed,
        explanation: explain(
            rule.display_label(),
            actual,
            &rule.operator,
            &rule.value,
            passed,
        ),
    }
}

/// Runs every rule against the record; an empty rule set is vacuously eligible.
///
/// Rules are never short-circuited so the explanation trail stays complete
/// even after an early failure.
pub fn evaluate_eligibility(record: &CandidateRecord, rules: &[Rule]) -> EligibilityOutcome {
    let evaluations: Vec<EvaluationResult> = rules
        .iter()
        .map(|rule| evaluate_rule(record, rule))
        .collect();
    let is_eligible = evaluations.iter().all(|result| result.passed);

    EligibilityOutcome {
        is_eligible,
        evaluations,
    }
}
