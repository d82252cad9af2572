//! Placement drives: criteria evaluation, application tracking, and reporting.
//!
//! `evaluation` holds the pure rule, scoring, and screening evaluators. The
//! service layers drive publication, applications, and selection rounds on top
//! of them through injected repositories and an audit sink.

pub mod domain;
pub mod evaluation;
pub mod report;
pub mod repository;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationStatusView, DriveId, DriveStatus,
    PlacementDrive, RoundOutcome, RoundProgress, RoundVerdict, SelectionRound, StudentId,
    StudentProfile,
};
pub use evaluation::{
    AttributeValue, CandidateRecord, Decision, EligibilityOutcome, EvaluationConfig,
    EvaluationEngine, EvaluationOutcome, EvaluationResult, Operator, Rule, ScoreBreakdown,
    ScoringOutcome, ScreeningOutcome, ScreeningQuestion, ScreeningResponses, WeightConfig,
};
pub use report::{
    detect_bias, funnel, recommend, write_csv, BiasAttribute, BiasReport, Recommendation,
};
pub use repository::{
    ApplicationRepository, AuditAction, AuditEntry, AuditError, AuditSink, DriveRepository,
    RepositoryError,
};
pub use service::{PlacementService, PlacementServiceError};
