use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, DriveId, DriveStatus, PlacementDrive,
    RoundOutcome, RoundProgress, RoundVerdict, StudentId, StudentProfile,
};
use super::evaluation::{EvaluationConfig, EvaluationEngine, ScreeningResponses};
use super::repository::{
    ApplicationRepository, AuditAction, AuditEntry, AuditError, AuditSink, DriveRepository,
    RepositoryError,
};

/// Service composing drive storage, application storage, the evaluator, and the audit log.
pub struct PlacementService<D, R, S> {
    drives: Arc<D>,
    applications: Arc<R>,
    audit: Arc<S>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static AUDIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_audit_id() -> String {
    let id = AUDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("log-{id:06}")
}

impl<D, R, S> PlacementService<D, R, S>
where
    D: DriveRepository + 'static,
    R: ApplicationRepository + 'static,
    S: AuditSink + 'static,
{
    pub fn new(drives: Arc<D>, applications: Arc<R>, audit: Arc<S>) -> Self {
        Self {
            drives,
            applications,
            audit,
        }
    }

    /// Publish a new drive.
    ///
    /// The drive is stored before the audit entry is written. An
    /// [`PlacementServiceError::Audit`] therefore means the drive exists but
    /// its `DRIVE_CREATED` entry was lost; retrying with the same id yields a
    /// repository conflict.
    pub fn create_drive(
        &self,
        drive: PlacementDrive,
        actor: &str,
    ) -> Result<PlacementDrive, PlacementServiceError> {
        warn_if_unbalanced(&drive.id, &drive.criteria);
        let stored = self.drives.insert(drive)?;

        let mut metadata = BTreeMap::new();
        metadata.insert("role_title".to_string(), stored.role_title.clone());
        metadata.insert("version".to_string(), stored.version.to_string());
        self.log(actor, AuditAction::DriveCreated, &stored.id.0, metadata)?;

        info!(drive_id = %stored.id, company = %stored.company_name, "drive published");
        Ok(stored)
    }

    /// Replace a drive's criteria, bumping its version. Frozen drives cannot be revised.
    pub fn revise_criteria(
        &self,
        drive_id: &DriveId,
        criteria: EvaluationConfig,
        actor: &str,
    ) -> Result<PlacementDrive, PlacementServiceError> {
        let mut drive = self.require_drive(drive_id)?;
        if !drive.can_modify() {
            return Err(PlacementServiceError::DriveFrozen(drive_id.clone()));
        }

        warn_if_unbalanced(drive_id, &criteria);
        drive.criteria = criteria;
        drive.version += 1;
        self.drives.update(drive.clone())?;

        let mut metadata = BTreeMap::new();
        metadata.insert("version".to_string(), drive.version.to_string());
        self.log(actor, AuditAction::DriveRevised, &drive.id.0, metadata)?;

        info!(drive_id = %drive.id, version = drive.version, "drive criteria revised");
        Ok(drive)
    }

    /// Lock a drive's criteria so applications stay comparable.
    pub fn freeze_drive(
        &self,
        drive_id: &DriveId,
        actor: &str,
    ) -> Result<PlacementDrive, PlacementServiceError> {
        let mut drive = self.require_drive(drive_id)?;
        drive.is_frozen = true;
        self.drives.update(drive.clone())?;

        self.log(actor, AuditAction::DriveFrozen, &drive.id.0, BTreeMap::new())?;
        Ok(drive)
    }

    /// Evaluate a student against a drive and persist the resulting application.
    ///
    /// As with [`Self::create_drive`], an `Audit` error is returned after the
    /// application has been stored; fetch it by drive rather than re-applying.
    pub fn apply(
        &self,
        student: &StudentProfile,
        drive_id: &DriveId,
        responses: ScreeningResponses,
    ) -> Result<Application, PlacementServiceError> {
        let drive = self.require_drive(drive_id)?;
        if drive.status == DriveStatus::Closed {
            return Err(PlacementServiceError::DriveClosed(drive_id.clone()));
        }

        let engine = EvaluationEngine::new(drive.criteria.clone());
        let evaluation = engine.evaluate(&student.to_candidate_record(), &responses);

        let round_progress = drive
            .ordered_rounds()
            .into_iter()
            .map(|round| RoundProgress {
                round_id: round.id.clone(),
                status: RoundOutcome::Pending,
                feedback: String::new(),
            })
            .collect();

        let application = Application {
            id: next_application_id(),
            student_id: student.id.clone(),
            drive_id: drive.id.clone(),
            current_status: ApplicationStatus::from(evaluation.decision),
            evaluation,
            round_progress,
            screening_responses: responses,
            version_applied_to: drive.version,
        };

        let stored = self.applications.insert(application)?;

        let mut metadata = BTreeMap::new();
        metadata.insert("drive_id".to_string(), stored.drive_id.0.clone());
        metadata.insert(
            "decision".to_string(),
            stored.evaluation.decision.label().to_string(),
        );
        metadata.insert(
            "composite_score".to_string(),
            format!("{:.2}", stored.evaluation.composite_score()),
        );
        self.log(
            &student.id.0,
            AuditAction::ApplicationEvaluated,
            &stored.id.0,
            metadata,
        )?;

        info!(
            application_id = %stored.id,
            drive_id = %stored.drive_id,
            status = stored.current_status.label(),
            "application evaluated"
        );
        Ok(stored)
    }

    /// Applications currently eligible for a drive.
    pub fn eligible_applications(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<Application>, PlacementServiceError> {
        Ok(self
            .applications
            .for_drive(drive_id)?
            .into_iter()
            .filter(|application| application.current_status == ApplicationStatus::Eligible)
            .collect())
    }

    /// Move eligible applications of the listed students to the shortlist.
    pub fn shortlist(
        &self,
        drive_id: &DriveId,
        student_ids: &[StudentId],
        actor: &str,
    ) -> Result<usize, PlacementServiceError> {
        self.require_drive(drive_id)?;

        let mut shortlisted = 0;
        for mut application in self.eligible_applications(drive_id)? {
            if !student_ids.contains(&application.student_id) {
                continue;
            }

            application.current_status = ApplicationStatus::Shortlisted;
            self.applications.update(application.clone())?;

            let mut metadata = BTreeMap::new();
            metadata.insert("drive_id".to_string(), drive_id.0.clone());
            self.log(
                actor,
                AuditAction::ApplicationShortlisted,
                &application.id.0,
                metadata,
            )?;
            shortlisted += 1;
        }

        info!(drive_id = %drive_id, shortlisted, "candidates shortlisted");
        Ok(shortlisted)
    }

    /// Record a round verdict. A failed round rejects the application; passing every
    /// round selects it.
    pub fn update_round_status(
        &self,
        application_id: &ApplicationId,
        round_id: &str,
        verdict: RoundVerdict,
        feedback: &str,
        actor: &str,
    ) -> Result<Application, PlacementServiceError> {
        let mut application = self.require_application(application_id)?;
        if !application.current_status.in_selection() {
            return Err(PlacementServiceError::NotInSelection {
                application_id: application_id.clone(),
                status: application.current_status.label(),
            });
        }

        let round = application
            .round_progress
            .iter_mut()
            .find(|round| round.round_id == round_id)
            .ok_or_else(|| PlacementServiceError::RoundNotFound {
                application_id: application_id.clone(),
                round_id: round_id.to_string(),
            })?;
        round.status = RoundOutcome::from(verdict);
        round.feedback = feedback.to_string();

        match verdict {
            RoundVerdict::Failed => application.current_status = ApplicationStatus::Rejected,
            RoundVerdict::Passed => {
                if application
                    .round_progress
                    .iter()
                    .all(|round| round.status == RoundOutcome::Passed)
                {
                    application.current_status = ApplicationStatus::Selected;
                }
            }
        }

        self.applications.update(application.clone())?;

        let mut metadata = BTreeMap::new();
        metadata.insert("round_id".to_string(), round_id.to_string());
        metadata.insert(
            "verdict".to_string(),
            RoundOutcome::from(verdict).label().to_string(),
        );
        metadata.insert("feedback".to_string(), feedback.to_string());
        self.log(actor, AuditAction::RoundUpdated, &application.id.0, metadata)?;

        info!(
            application_id = %application.id,
            round_id,
            status = application.current_status.label(),
            "round status updated"
        );
        Ok(application)
    }

    /// Pass the application's next pending round.
    pub fn advance(
        &self,
        application_id: &ApplicationId,
        feedback: &str,
        actor: &str,
    ) -> Result<Application, PlacementServiceError> {
        let application = self.require_application(application_id)?;
        let round_id = application
            .next_pending_round()
            .map(|round| round.round_id.clone())
            .ok_or_else(|| PlacementServiceError::NoPendingRound(application_id.clone()))?;

        self.update_round_status(application_id, &round_id, RoundVerdict::Passed, feedback, actor)
    }

    pub fn application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementServiceError> {
        self.require_application(application_id)
    }

    pub fn drive(&self, drive_id: &DriveId) -> Result<PlacementDrive, PlacementServiceError> {
        self.require_drive(drive_id)
    }

    pub fn applications_for(
        &self,
        drive_id: &DriveId,
    ) -> Result<Vec<Application>, PlacementServiceError> {
        Ok(self.applications.for_drive(drive_id)?)
    }

    pub fn audit_trail(&self, target_id: &str) -> Result<Vec<AuditEntry>, PlacementServiceError> {
        Ok(self.audit.entries_for(target_id)?)
    }

    fn require_drive(&self, drive_id: &DriveId) -> Result<PlacementDrive, PlacementServiceError> {
        self.drives
            .fetch(drive_id)?
            .ok_or_else(|| PlacementServiceError::DriveNotFound(drive_id.clone()))
    }

    fn require_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementServiceError> {
        self.applications
            .fetch(application_id)?
            .ok_or_else(|| PlacementServiceError::ApplicationNotFound(application_id.clone()))
    }

    fn log(
        &self,
        actor: &str,
        action: AuditAction,
        target_id: &str,
        metadata: BTreeMap<String, String>,
    ) -> Result<(), AuditError> {
        self.audit.record(AuditEntry {
            id: next_audit_id(),
            timestamp: Utc::now(),
            actor: actor.to_string(),
            action,
            target_id: target_id.to_string(),
            metadata,
        })
    }
}

fn warn_if_unbalanced(drive_id: &DriveId, criteria: &EvaluationConfig) {
    if !criteria.weights_balanced() {
        warn!(
            drive_id = %drive_id,
            total_weight = criteria.total_weight(),
            "scoring weights do not sum to 1; composite score is not bounded to 0-100"
        );
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("drive {0} not found")]
    DriveNotFound(DriveId),
    #[error("drive {0} is closed to applications")]
    DriveClosed(DriveId),
    #[error("drive {0} is frozen and cannot be modified")]
    DriveFrozen(DriveId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("round {round_id} not found in application {application_id}")]
    RoundNotFound {
        application_id: ApplicationId,
        round_id: String,
    },
    #[error("application {0} has no pending rounds")]
    NoPendingRound(ApplicationId),
    #[error("application {application_id} is {status} and no longer in selection")]
    NotInSelection {
        application_id: ApplicationId,
        status: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
