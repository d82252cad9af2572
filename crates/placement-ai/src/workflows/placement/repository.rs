use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, DriveId, PlacementDrive};

/// Storage abstraction for published drives.
pub trait DriveRepository: Send + Sync {
    fn insert(&self, drive: PlacementDrive) -> Result<PlacementDrive, RepositoryError>;
    fn update(&self, drive: PlacementDrive) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError>;
}

/// Storage abstraction for applications so the service can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Governance actions recorded against drives and applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    DriveCreated,
    DriveRevised,
    DriveFrozen,
    ApplicationEvaluated,
    ApplicationShortlisted,
    RoundUpdated,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            AuditAction::DriveCreated => "DRIVE_CREATED",
            AuditAction::DriveRevised => "DRIVE_REVISED",
            AuditAction::DriveFrozen => "DRIVE_FROZEN",
            AuditAction::ApplicationEvaluated => "APPLICATION_EVALUATED",
            AuditAction::ApplicationShortlisted => "APPLICATION_SHORTLISTED",
            AuditAction::RoundUpdated => "ROUND_UPDATED",
        }
    }
}

/// Who did what to which drive or application, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    pub target_id: String,
    pub metadata: BTreeMap<String, String>,
}

/// Outbound hook for the audit log store.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
    fn entries_for(&self, target_id: &str) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit log unavailable: {0}")]
    Transport(String),
}
