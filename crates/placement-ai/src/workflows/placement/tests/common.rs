use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::workflows::placement::domain::{
    Application, ApplicationId, DriveId, DriveStatus, PlacementDrive, SelectionRound, StudentId,
    StudentProfile,
};
use crate::workflows::placement::evaluation::{
    AttributeValue, EvaluationConfig, Operator, Rule, ScreeningQuestion, ScreeningResponses,
    WeightConfig,
};
use crate::workflows::placement::repository::{
    ApplicationRepository, AuditEntry, AuditError, AuditSink, DriveRepository, RepositoryError,
};
use crate::workflows::placement::service::PlacementService;

pub(super) fn student(id: &str, cgpa: f64, backlog_count: u32) -> StudentProfile {
    StudentProfile {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        email: format!("{}@campus.example", id.to_lowercase()),
        cgpa,
        branch: "CSE".to_string(),
        graduation_year: 2025,
        backlog_count,
        skills: vec![
            "React".to_string(),
            "TypeScript".to_string(),
            "Node.js".to_string(),
        ],
        resume_url: format!("https://campus.example/resumes/{id}.pdf"),
        extra_attributes: BTreeMap::new(),
    }
}

pub(super) fn criteria() -> EvaluationConfig {
    EvaluationConfig {
        rules: vec![
            Rule::new("R1", "cgpa", Operator::Gte, 8.0).labelled("Min CGPA"),
            Rule::new("R2", "backlog_count", Operator::Eq, 0.0).labelled("Zero Backlogs"),
        ],
        weights: vec![
            WeightConfig::new("cgpa", 0.6),
            WeightConfig::new("skills", 0.4),
        ],
        questions: vec![ScreeningQuestion::new(
            "Q1",
            "Willing to relocate to Bengaluru?",
            "Yes",
        )],
    }
}

pub(super) fn drive(id: &str) -> PlacementDrive {
    PlacementDrive {
        id: DriveId(id.to_string()),
        company_id: "TECH_CORP".to_string(),
        company_name: "Tech Corp".to_string(),
        role_title: "Software Engineer Intern".to_string(),
        description: "Join the infrastructure team building scalable cloud solutions."
            .to_string(),
        required_skills: vec!["React".to_string()],
        criteria: criteria(),
        selection_rounds: vec![
            SelectionRound {
                id: "RD2".to_string(),
                name: "Technical Interview".to_string(),
                order: 2,
            },
            SelectionRound {
                id: "RD1".to_string(),
                name: "Aptitude Test".to_string(),
                order: 1,
            },
        ],
        status: DriveStatus::Open,
        version: 1,
        is_frozen: false,
    }
}

pub(super) fn relocate(answer: &str) -> ScreeningResponses {
    let mut responses = ScreeningResponses::new();
    responses.insert("Q1".to_string(), AttributeValue::from(answer));
    responses
}

pub(super) type TestService = PlacementService<MemoryDrives, MemoryApplications, MemoryAudit>;

pub(super) fn build_service() -> (TestService, Arc<MemoryApplications>, Arc<MemoryAudit>) {
    let drives = Arc::new(MemoryDrives::default());
    let applications = Arc::new(MemoryApplications::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = PlacementService::new(drives, applications.clone(), audit.clone());
    (service, applications, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryDrives {
    drives: Arc<Mutex<HashMap<DriveId, PlacementDrive>>>,
}

impl DriveRepository for MemoryDrives {
    fn insert(&self, drive: PlacementDrive) -> Result<PlacementDrive, RepositoryError> {
        let mut guard = self.drives.lock().expect("drive mutex poisoned");
        if guard.contains_key(&drive.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.id.clone(), drive.clone());
        Ok(drive)
    }

    fn update(&self, drive: PlacementDrive) -> Result<(), RepositoryError> {
        let mut guard = self.drives.lock().expect("drive mutex poisoned");
        guard.insert(drive.id.clone(), drive);
        Ok(())
    }

    fn fetch(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError> {
        let guard = self.drives.lock().expect("drive mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl MemoryApplications {
    pub(super) fn stored(&self, id: &ApplicationId) -> Option<Application> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_drive(&self, drive_id: &DriveId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| &application.drive_id == drive_id)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(applications)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries.lock().expect("audit mutex poisoned").push(entry);
        Ok(())
    }

    fn entries_for(&self, target_id: &str) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self
            .entries()
            .into_iter()
            .filter(|entry| entry.target_id == target_id)
            .collect())
    }
}

pub(super) struct OfflineAudit;

impl AuditSink for OfflineAudit {
    fn record(&self, _entry: AuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit store offline".to_string()))
    }

    fn entries_for(&self, _target_id: &str) -> Result<Vec<AuditEntry>, AuditError> {
        Err(AuditError::Transport("audit store offline".to_string()))
    }
}
