use std::sync::Arc;

use super::common::*;
use crate::workflows::placement::domain::{
    ApplicationId, ApplicationStatus, DriveId, DriveStatus, RoundOutcome, RoundVerdict, StudentId,
};
use crate::workflows::placement::evaluation::{
    Decision, EvaluationConfig, Operator, Rule, ScreeningResponses,
};
use crate::workflows::placement::repository::AuditAction;
use crate::workflows::placement::service::{PlacementService, PlacementServiceError};

fn published(service: &TestService, id: &str) -> DriveId {
    service
        .create_drive(drive(id), "placement-office")
        .expect("drive published")
        .id
}

#[test]
fn apply_sets_status_from_evaluation() {
    let (service, applications, _) = build_service();
    let drive_id = published(&service, "D001");

    let eligible = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    let not_eligible = service
        .apply(&student("S102", 7.4, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    let rejected = service
        .apply(&student("S103", 9.0, 0), &drive_id, relocate("No"))
        .expect("apply succeeds");

    assert_eq!(eligible.current_status, ApplicationStatus::Eligible);
    assert_eq!(not_eligible.current_status, ApplicationStatus::NotEligible);
    assert_eq!(rejected.current_status, ApplicationStatus::Rejected);
    assert_eq!(rejected.evaluation.decision, Decision::Rejected);

    let stored = applications.stored(&eligible.id).expect("application stored");
    assert_eq!(stored, eligible);
    assert_eq!(stored.version_applied_to, 1);
    assert_eq!(stored.screening_responses, relocate("Yes"));
}

#[test]
fn apply_creates_pending_rounds_in_configured_order() {
    let (service, _, _) = build_service();
    let drive_id = published(&service, "D001");

    let application = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    let rounds: Vec<&str> = application
        .round_progress
        .iter()
        .map(|round| round.round_id.as_str())
        .collect();
    assert_eq!(rounds, vec!["RD1", "RD2"]);
    assert!(application
        .round_progress
        .iter()
        .all(|round| round.status == RoundOutcome::Pending));
}

#[test]
fn apply_rejects_unknown_and_closed_drives() {
    let (service, _, _) = build_service();

    let missing = service.apply(
        &student("S101", 8.5, 0),
        &DriveId("D404".to_string()),
        relocate("Yes"),
    );
    assert!(matches!(missing, Err(PlacementServiceError::DriveNotFound(id)) if id.0 == "D404"));

    let mut closed = drive("D002");
    closed.status = DriveStatus::Closed;
    service
        .create_drive(closed, "placement-office")
        .expect("drive published");
    let result = service.apply(
        &student("S101", 8.5, 0),
        &DriveId("D002".to_string()),
        relocate("Yes"),
    );
    assert!(matches!(result, Err(PlacementServiceError::DriveClosed(_))));
}

#[test]
fn passing_every_round_selects_the_candidate() {
    let (service, _, audit) = build_service();
    let drive_id = published(&service, "D001");
    let application = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    let after_first = service
        .advance(&application.id, "Strong aptitude", "recruiter")
        .expect("first round passes");
    assert_eq!(after_first.current_status, ApplicationStatus::Eligible);
    assert_eq!(after_first.rounds_passed(), 1);
    assert_eq!(
        after_first.next_pending_round().map(|round| round.round_id.as_str()),
        Some("RD2")
    );

    let selected = service
        .advance(&application.id, "Hire", "recruiter")
        .expect("second round passes");
    assert_eq!(selected.current_status, ApplicationStatus::Selected);
    assert_eq!(selected.decision_rationale(), "selected after all rounds");

    let no_more = service.advance(&application.id, "again", "recruiter");
    assert!(matches!(
        no_more,
        Err(PlacementServiceError::NotInSelection { status: "SELECTED", .. })
    ));

    let rounds_logged = audit
        .entries()
        .into_iter()
        .filter(|entry| entry.action == AuditAction::RoundUpdated)
        .count();
    assert_eq!(rounds_logged, 2);
}

#[test]
fn failed_round_rejects_and_explains() {
    let (service, applications, _) = build_service();
    let drive_id = published(&service, "D001");
    let application = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    let updated = service
        .update_round_status(
            &application.id,
            "RD1",
            RoundVerdict::Failed,
            "Below aptitude cutoff",
            "recruiter",
        )
        .expect("round recorded");

    assert_eq!(updated.current_status, ApplicationStatus::Rejected);
    assert_eq!(
        updated.decision_rationale(),
        "rejected in round RD1: Below aptitude cutoff"
    );
    let stored = applications.stored(&application.id).expect("stored");
    assert_eq!(stored.round_progress[0].status, RoundOutcome::Failed);
    assert_eq!(stored.round_progress[1].status, RoundOutcome::Pending);
}

#[test]
fn round_updates_validate_their_target() {
    let (service, _, _) = build_service();
    let drive_id = published(&service, "D001");
    let eligible = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    let not_eligible = service
        .apply(&student("S102", 6.0, 2), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    let unknown_round = service.update_round_status(
        &eligible.id,
        "RD9",
        RoundVerdict::Passed,
        "",
        "recruiter",
    );
    assert!(matches!(
        unknown_round,
        Err(PlacementServiceError::RoundNotFound { ref round_id, .. }) if round_id == "RD9"
    ));

    let out_of_selection = service.update_round_status(
        &not_eligible.id,
        "RD1",
        RoundVerdict::Passed,
        "",
        "recruiter",
    );
    assert!(matches!(
        out_of_selection,
        Err(PlacementServiceError::NotInSelection { status: "NOT_ELIGIBLE", .. })
    ));

    let missing = service.application(&ApplicationId("app-missing".to_string()));
    assert!(matches!(
        missing,
        Err(PlacementServiceError::ApplicationNotFound(_))
    ));
}

#[test]
fn advance_without_rounds_reports_no_pending_round() {
    let (service, _, _) = build_service();
    let mut roundless = drive("D003");
    roundless.selection_rounds.clear();
    service
        .create_drive(roundless, "placement-office")
        .expect("drive published");

    let application = service
        .apply(
            &student("S101", 8.5, 0),
            &DriveId("D003".to_string()),
            relocate("Yes"),
        )
        .expect("apply succeeds");

    let result = service.advance(&application.id, "", "recruiter");
    assert!(matches!(result, Err(PlacementServiceError::NoPendingRound(_))));
}

#[test]
fn shortlist_only_promotes_listed_eligible_candidates() {
    let (service, applications, _) = build_service();
    let drive_id = published(&service, "D001");
    let first = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    let second = service
        .apply(&student("S102", 9.2, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    let ineligible = service
        .apply(&student("S103", 7.0, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    assert_eq!(
        service
            .eligible_applications(&drive_id)
            .expect("listing succeeds")
            .len(),
        2
    );

    let count = service
        .shortlist(
            &drive_id,
            &[StudentId("S101".to_string()), StudentId("S103".to_string())],
            "placement-office",
        )
        .expect("shortlist succeeds");

    assert_eq!(count, 1);
    let status = |id: &ApplicationId| applications.stored(id).map(|app| app.current_status);
    assert_eq!(status(&first.id), Some(ApplicationStatus::Shortlisted));
    assert_eq!(status(&second.id), Some(ApplicationStatus::Eligible));
    assert_eq!(status(&ineligible.id), Some(ApplicationStatus::NotEligible));

    let progressed = service
        .advance(&first.id, "Cleared aptitude", "recruiter")
        .expect("shortlisted candidates continue through rounds");
    assert_eq!(progressed.current_status, ApplicationStatus::Shortlisted);
}

#[test]
fn revising_criteria_bumps_version_for_new_applications() {
    let (service, _, _) = build_service();
    let drive_id = published(&service, "D001");
    let before = service
        .apply(&student("S101", 7.6, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");
    assert_eq!(before.current_status, ApplicationStatus::NotEligible);

    let relaxed = EvaluationConfig {
        rules: vec![Rule::new("R1", "cgpa", Operator::Gte, 7.5)],
        ..EvaluationConfig::default()
    };
    let revised = service
        .revise_criteria(&drive_id, relaxed, "placement-office")
        .expect("revision succeeds");
    assert_eq!(revised.version, 2);

    let after = service
        .apply(&student("S102", 7.6, 0), &drive_id, ScreeningResponses::new())
        .expect("apply succeeds");
    assert_eq!(after.current_status, ApplicationStatus::Eligible);
    assert_eq!(after.version_applied_to, 2);

    let earlier = service.application(&before.id).expect("still stored");
    assert_eq!(earlier.version_applied_to, 1);
    assert_eq!(earlier.current_status, ApplicationStatus::NotEligible);
}

#[test]
fn frozen_drive_rejects_revision() {
    let (service, _, _) = build_service();
    let drive_id = published(&service, "D001");

    let frozen = service
        .freeze_drive(&drive_id, "placement-office")
        .expect("freeze succeeds");
    assert!(!frozen.can_modify());

    let result = service.revise_criteria(&drive_id, EvaluationConfig::default(), "placement-office");
    assert!(matches!(result, Err(PlacementServiceError::DriveFrozen(_))));
    assert_eq!(service.drive(&drive_id).expect("drive stored").version, 1);
}

#[test]
fn audit_trail_records_governance_actions() {
    let (service, _, _) = build_service();
    let drive_id = published(&service, "D001");
    service
        .revise_criteria(&drive_id, criteria(), "placement-office")
        .expect("revision succeeds");
    service
        .freeze_drive(&drive_id, "placement-office")
        .expect("freeze succeeds");
    let application = service
        .apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"))
        .expect("apply succeeds");

    let drive_trail = service.audit_trail(&drive_id.0).expect("trail available");
    let actions: Vec<AuditAction> = drive_trail.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::DriveCreated,
            AuditAction::DriveRevised,
            AuditAction::DriveFrozen
        ]
    );
    assert!(drive_trail
        .iter()
        .all(|entry| entry.actor == "placement-office"));
    assert_eq!(
        drive_trail[1].metadata.get("version").map(String::as_str),
        Some("2")
    );

    let application_trail = service
        .audit_trail(&application.id.0)
        .expect("trail available");
    assert_eq!(application_trail.len(), 1);
    assert_eq!(application_trail[0].actor, "S101");
    assert_eq!(
        application_trail[0].metadata.get("decision").map(String::as_str),
        Some("ELIGIBLE")
    );
}

#[test]
fn audit_failures_surface_after_the_write_is_committed() {
    let drives = Arc::new(MemoryDrives::default());
    let applications = Arc::new(MemoryApplications::default());
    let service = PlacementService::new(drives, applications.clone(), Arc::new(OfflineAudit));

    let result = service.create_drive(drive("D001"), "placement-office");
    assert!(matches!(result, Err(PlacementServiceError::Audit(_))));

    let drive_id = DriveId("D001".to_string());
    assert_eq!(service.drive(&drive_id).expect("drive stored").version, 1);
    let retry = service.create_drive(drive("D001"), "placement-office");
    assert!(matches!(retry, Err(PlacementServiceError::Repository(_))));

    let applied = service.apply(&student("S101", 8.5, 0), &drive_id, relocate("Yes"));
    assert!(matches!(applied, Err(PlacementServiceError::Audit(_))));
    let stored = service
        .applications_for(&drive_id)
        .expect("listing succeeds");
    assert_eq!(stored.len(), 1);
    assert!(applications.stored(&stored[0].id).is_some());
}

#[test]
fn duplicate_drive_ids_conflict() {
    let (service, _, _) = build_service();
    published(&service, "D001");

    let result = service.create_drive(drive("D001"), "placement-office");

    assert!(matches!(result, Err(PlacementServiceError::Repository(_))));
}
