use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::evaluation::{
    AttributeValue, CandidateRecord, Decision, EvaluationConfig, EvaluationOutcome,
    ScreeningResponses,
};

/// Identifier wrapper for published drives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriveId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Student profile as held by the placement office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub cgpa: f64,
    pub branch: String,
    pub graduation_year: u32,
    pub backlog_count: u32,
    pub skills: Vec<String>,
    pub resume_url: String,
    /// Additional attributes a drive may reference (certifications, test scores, ...).
    #[serde(default, flatten)]
    pub extra_attributes: BTreeMap<String, AttributeValue>,
}

impl StudentProfile {
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.extra_attributes.insert(name.into(), value.into());
        self
    }

    /// Flattens the profile into the attribute mapping rules are evaluated against.
    ///
    /// Profile fields take precedence over extra attributes with the same name.
    pub fn to_candidate_record(&self) -> CandidateRecord {
        let mut record = CandidateRecord::from(self.extra_attributes.clone());
        record.insert("id", self.id.0.as_str());
        record.insert("name", self.name.as_str());
        record.insert("email", self.email.as_str());
        record.insert("cgpa", self.cgpa);
        record.insert("branch", self.branch.as_str());
        record.insert("graduation_year", self.graduation_year);
        record.insert("backlog_count", self.backlog_count);
        record.insert("skills", self.skills.clone());
        record.insert("resume_url", self.resume_url.as_str());
        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveStatus {
    Open,
    Closed,
}

/// One stage of a drive's selection pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRound {
    pub id: String,
    pub name: String,
    pub order: u32,
}

/// A published hiring opportunity and the criteria candidates are evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDrive {
    pub id: DriveId,
    pub company_id: String,
    pub company_name: String,
    pub role_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub criteria: EvaluationConfig,
    #[serde(default)]
    pub selection_rounds: Vec<SelectionRound>,
    pub status: DriveStatus,
    #[serde(default = "initial_version")]
    pub version: u32,
    #[serde(default)]
    pub is_frozen: bool,
}

fn initial_version() -> u32 {
    1
}

impl PlacementDrive {
    pub fn can_modify(&self) -> bool {
        !self.is_frozen
    }

    /// Rounds sorted by their configured order.
    pub fn ordered_rounds(&self) -> Vec<&SelectionRound> {
        let mut rounds: Vec<&SelectionRound> = self.selection_rounds.iter().collect();
        rounds.sort_by_key(|round| round.order);
        rounds
    }
}

/// Lifecycle status of an application. The evaluator sets the initial status;
/// shortlisting and round updates move it on from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Eligible,
    NotEligible,
    Shortlisted,
    Rejected,
    Selected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Eligible => "ELIGIBLE",
            ApplicationStatus::NotEligible => "NOT_ELIGIBLE",
            ApplicationStatus::Shortlisted => "SHORTLISTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Selected => "SELECTED",
        }
    }

    /// Whether selection rounds may still be recorded for the application.
    pub const fn in_selection(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Eligible | ApplicationStatus::Shortlisted
        )
    }
}

impl From<Decision> for ApplicationStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Eligible => ApplicationStatus::Eligible,
            Decision::NotEligible => ApplicationStatus::NotEligible,
            Decision::Rejected => ApplicationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundOutcome {
    Pending,
    Passed,
    Failed,
}

impl RoundOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            RoundOutcome::Pending => "PENDING",
            RoundOutcome::Passed => "PASSED",
            RoundOutcome::Failed => "FAILED",
        }
    }
}

/// Verdict a recruiter records for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundVerdict {
    Passed,
    Failed,
}

impl From<RoundVerdict> for RoundOutcome {
    fn from(verdict: RoundVerdict) -> Self {
        match verdict {
            RoundVerdict::Passed => RoundOutcome::Passed,
            RoundVerdict::Failed => RoundOutcome::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundProgress {
    pub round_id: String,
    pub status: RoundOutcome,
    pub feedback: String,
}

/// A student's application to a drive, bound to the drive version it was evaluated under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub drive_id: DriveId,
    pub current_status: ApplicationStatus,
    pub evaluation: EvaluationOutcome,
    pub round_progress: Vec<RoundProgress>,
    #[serde(default)]
    pub screening_responses: ScreeningResponses,
    pub version_applied_to: u32,
}

impl Application {
    pub fn decision_rationale(&self) -> String {
        match self.current_status {
            ApplicationStatus::Shortlisted => "shortlisted for selection rounds".to_string(),
            ApplicationStatus::Selected => "selected after all rounds".to_string(),
            ApplicationStatus::Rejected if self.evaluation.decision == Decision::Eligible => self
                .failed_round()
                .map(|round| format!("rejected in round {}: {}", round.round_id, round.feedback))
                .unwrap_or_else(|| "rejected".to_string()),
            _ => self.evaluation.rationale(),
        }
    }

    pub fn next_pending_round(&self) -> Option<&RoundProgress> {
        self.round_progress
            .iter()
            .find(|round| round.status == RoundOutcome::Pending)
    }

    pub fn failed_round(&self) -> Option<&RoundProgress> {
        self.round_progress
            .iter()
            .find(|round| round.status == RoundOutcome::Failed)
    }

    pub fn rounds_passed(&self) -> usize {
        self.round_progress
            .iter()
            .filter(|round| round.status == RoundOutcome::Passed)
            .count()
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            drive_id: self.drive_id.clone(),
            status: self.current_status.label(),
            decision_rationale: self.decision_rationale(),
            composite_score: self.evaluation.composite_score(),
            rounds_passed: self.rounds_passed(),
            rounds_total: self.round_progress.len(),
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub drive_id: DriveId,
    pub status: &'static str,
    pub decision_rationale: String,
    pub composite_score: f64,
    pub rounds_passed: usize,
    pub rounds_total: usize,
}
