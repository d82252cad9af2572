use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::value::{describe, AttributeValue};

/// Comparison operators a rule may use.
///
/// Operator names outside the supported set deserialize into `Unknown` so a
/// misconfigured drive still evaluates; such rules never pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Gte,
    Lte,
    Eq,
    Neq,
    In,
    ContainsAll,
    ContainsAny,
    Unknown(String),
}

impl Operator {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "gte" => Operator::Gte,
            "lte" => Operator::Lte,
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "in" => Operator::In,
            "contains_all" => Operator::ContainsAll,
            "contains_any" => Operator::ContainsAny,
            other => Operator::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::In => "in",
            Operator::ContainsAll => "contains_all",
            Operator::ContainsAny => "contains_any",
            Operator::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Operator {
    fn from(value: String) -> Self {
        Operator::parse(&value)
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Reason a comparison could not be carried out. Every variant resolves to a failed predicate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredicateError {
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
    #[error("operator `{operator}` cannot compare a {actual} against a {expected}")]
    TypeMismatch {
        operator: Operator,
        actual: &'static str,
        expected: &'static str,
    },
    #[error("operator `{0}` requires the attribute to be present")]
    MissingAttribute(Operator),
}

/// Evaluates one predicate, reporting why it could not be evaluated.
///
/// `eq`/`neq` are strict equality checks and treat an absent attribute as a
/// value that equals nothing. Every other operator needs the attribute present.
pub fn check(
    actual: Option<&AttributeValue>,
    operator: &Operator,
    expected: &AttributeValue,
) -> Result<bool, PredicateError> {
    match operator {
        Operator::Unknown(name) => Err(PredicateError::UnknownOperator(name.clone())),
        Operator::Eq => Ok(actual == Some(expected)),
        Operator::Neq => Ok(actual != Some(expected)),
        Operator::Gte => {
            let ordering = order(operator, present(operator, actual)?, expected)?;
            Ok(matches!(ordering, Some(Ordering::Greater | Ordering::Equal)))
        }
        Operator::Lte => {
            let ordering = order(operator, present(operator, actual)?, expected)?;
            Ok(matches!(ordering, Some(Ordering::Less | Ordering::Equal)))
        }
        Operator::In => match (present(operator, actual)?, expected) {
            (AttributeValue::Text(value), AttributeValue::List(allowed)) => {
                Ok(allowed.contains(value))
            }
            (actual, expected) => Err(mismatch(operator, actual, expected)),
        },
        Operator::ContainsAll => {
            let (held, wanted) = lists(operator, present(operator, actual)?, expected)?;
            Ok(wanted.iter().all(|item| held.contains(item)))
        }
        Operator::ContainsAny => {
            let (held, wanted) = lists(operator, present(operator, actual)?, expected)?;
            Ok(wanted.iter().any(|item| held.contains(item)))
        }
    }
}

/// Fail-closed predicate verdict.
///
/// Unknown operators are reported at `warn`, comparisons that do not type-check
/// at `debug`; both yield `false`.
pub fn compare(
    actual: Option<&AttributeValue>,
    operator: &Operator,
    expected: &AttributeValue,
) -> bool {
    match check(actual, operator, expected) {
        Ok(passed) => passed,
        Err(err @ PredicateError::UnknownOperator(_)) => {
            warn!(error = %err, "rule operator not recognised; predicate fails closed");
            false
        }
        Err(err) => {
            debug!(error = %err, "predicate could not be evaluated; treated as not met");
            false
        }
    }
}

/// User-facing sentence describing a predicate verdict.
pub fn explain(
    label: &str,
    actual: Option<&AttributeValue>,
    operator: &Operator,
    expected: &AttributeValue,
    passed: bool,
) -> String {
    let actual = describe(actual);
    if passed {
        format!("{label} is {actual}, which meets the requirement ({operator} {expected})")
    } else {
        format!("{label} is {actual}, but the requirement is {operator} {expected}")
    }
}

fn present<'a>(
    operator: &Operator,
    actual: Option<&'a AttributeValue>,
) -> Result<&'a AttributeValue, PredicateError> {
    actual.ok_or_else(|| PredicateError::MissingAttribute(operator.clone()))
}

fn order(
    operator: &Operator,
    actual: &AttributeValue,
    expected: &AttributeValue,
) -> Result<Option<Ordering>, PredicateError> {
    match (actual, expected) {
        (AttributeValue::Number(left), AttributeValue::Number(right)) => {
            Ok(left.partial_cmp(right))
        }
        (AttributeValue::Text(left), AttributeValue::Text(right)) => Ok(Some(left.cmp(right))),
        (actual, expected) => Err(mismatch(operator, actual, expected)),
    }
}

fn lists<'a>(
    operator: &Operator,
    actual: &'a AttributeValue,
    expected: &'a AttributeValue,
) -> Result<(&'a [String], &'a [String]), PredicateError> {
    match (actual, expected) {
        (AttributeValue::List(held), AttributeValue::List(wanted)) => Ok((held, wanted)),
        (actual, expected) => Err(mismatch(operator, actual, expected)),
    }
}

fn mismatch(
    operator: &Operator,
    actual: &AttributeValue,
    expected: &AttributeValue,
) -> PredicateError {
    PredicateError::TypeMismatch {
        operator: operator.clone(),
        actual: actual.kind(),
        expected: expected.kind(),
    }
}
