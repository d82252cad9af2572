use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::value::{describe, AttributeValue};

/// Answers submitted by a candidate, keyed by question id.
pub type ScreeningResponses = BTreeMap<String, AttributeValue>;

/// Presentation hint for how a question is asked. Matching ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    Mcq,
    Bool,
    Numeric,
}

/// Gating question with a single accepted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningQuestion {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub expected_value: AttributeValue,
}

impl ScreeningQuestion {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        expected_value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: None,
            options: Vec::new(),
            expected_value: expected_value.into(),
        }
    }
}

/// Screening verdict with one explanation per question, in question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub passed: bool,
    pub explanations: Vec<String>,
    #[serde(default)]
    pub failed_questions: Vec<String>,
}

/// Checks each answer for exact equality with the expected value.
///
/// A missing answer fails the question with the same explanation shape as a
/// wrong answer. No questions means the screen passes.
pub fn evaluate_screening(
    questions: &[ScreeningQuestion],
    responses: &ScreeningResponses,
) -> ScreeningOutcome {
    let mut explanations = Vec::with_capacity(questions.len());
    let mut failed_questions = Vec::new();

    for question in questions {
        let answer = responses.get(&question.id);
        if answer == Some(&question.expected_value) {
            explanations.push(format!("Met requirements for \"{}\".", question.text));
        } else {
            explanations.push(format!(
                "Failed on question \"{}\". Expected \"{}\" but got \"{}\".",
                question.text,
                question.expected_value,
                describe(answer)
            ));
            failed_questions.push(question.id.clone());
        }
    }

    ScreeningOutcome {
        passed: failed_questions.is_empty(),
        explanations,
        failed_questions,
    }
}
