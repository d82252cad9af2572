use placement_ai::workflows::placement::{
    Application, ApplicationId, ApplicationRepository, AuditEntry, AuditError, AuditSink, DriveId,
    DriveRepository, PlacementDrive, RepositoryError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
pub(crate) struct InMemoryDriveRepository {
    drives: Arc<Mutex<HashMap<DriveId, PlacementDrive>>>,
}

impl DriveRepository for InMemoryDriveRepository {
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
        if guard.contains_key(&drive.id) {
            guard.insert(drive.id.clone(), drive);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &DriveId) -> Result<Option<PlacementDrive>, RepositoryError> {
        let guard = self.drives.lock().expect("drive mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(crate) struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut guard = self.entries.lock().expect("audit mutex poisoned");
        guard.push(entry);
        Ok(())
    }

    fn entries_for(&self, target_id: &str) -> Result<Vec<AuditEntry>, AuditError> {
        let guard = self.entries.lock().expect("audit mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| entry.target_id == target_id)
            .cloned()
            .collect())
    }
}
