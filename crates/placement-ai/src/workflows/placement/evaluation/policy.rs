use serde::{Deserialize, Serialize};

use super::rules::EligibilityOutcome;
use super::screening::ScreeningOutcome;

/// Outcome of evaluating a candidate before any human-driven round progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Eligible,
    NotEligible,
    Rejected,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Eligible => "ELIGIBLE",
            Decision::NotEligible => "NOT_ELIGIBLE",
            Decision::Rejected => "REJECTED",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Decision::Eligible => "eligible for the drive",
            Decision::NotEligible => "does not meet the eligibility criteria",
            Decision::Rejected => "rejected at pre-screening",
        }
    }
}

/// Applies the fixed precedence: eligibility gate, then screening, then eligible.
///
/// Eligibility is checked first so its explanation is never masked by a
/// screening failure.
pub fn decide(eligibility: &EligibilityOutcome, screening: &ScreeningOutcome) -> Decision {
    if !eligibility.is_eligible {
        return Decision::NotEligible;
    }

    if !screening.passed {
        return Decision::Rejected;
    }

    Decision::Eligible
}
