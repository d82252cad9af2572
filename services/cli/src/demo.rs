use crate::infra::{InMemoryApplicationRepository, InMemoryAuditLog, InMemoryDriveRepository};
use chrono::SecondsFormat;
use clap::Args;
use placement_ai::config::AppConfig;
use placement_ai::error::AppError;
use placement_ai::workflows::placement::{
    funnel, recommend, write_csv, Application, AttributeValue, DriveId, DriveStatus,
    EvaluationConfig, Operator, PlacementDrive, PlacementService, Rule, ScreeningQuestion,
    ScreeningResponses, SelectionRound, StudentId, StudentProfile, WeightConfig,
};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the resulting applications as CSV instead of the narrative summary.
    #[arg(long)]
    pub(crate) csv: bool,
}

type DemoService =
    PlacementService<InMemoryDriveRepository, InMemoryApplicationRepository, InMemoryAuditLog>;

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let actor = config.audit.actor.as_str();
    let service: DemoService = PlacementService::new(
        Arc::new(InMemoryDriveRepository::default()),
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryAuditLog::default()),
    );

    let drives = vec![
        service.create_drive(infrastructure_drive(), actor)?,
        service.create_drive(research_drive(), actor)?,
    ];
    let student = sample_student();

    let mut applications = Vec::with_capacity(drives.len());
    for drive in &drives {
        applications.push(service.apply(&student, &drive.id, sample_responses())?);
    }

    for drive in &drives {
        let shortlisted = service.shortlist(&drive.id, &[student.id.clone()], actor)?;
        tracing::info!(drive_id = %drive.id, shortlisted, "demo shortlist complete");
    }

    let mut finished = Vec::with_capacity(applications.len());
    for application in applications {
        finished.push(run_rounds(&service, application, actor)?);
    }

    if args.csv {
        write_csv(&finished, std::io::stdout().lock())?;
        return Ok(());
    }

    println!("Placement drive demo");
    println!(
        "Student {} ({}) | CGPA {} | {} | skills: {}",
        student.name,
        student.id,
        student.cgpa,
        student.branch,
        student.skills.join(", ")
    );

    println!("\nRecommended drives");
    for recommendation in recommend(&student, &drives) {
        println!("- {}: {}", recommendation.drive_id, recommendation.explanation);
    }

    for (drive, application) in drives.iter().zip(&finished) {
        render_application(&service, drive, application)?;
    }

    println!("\nPipeline funnel");
    for (status, count) in funnel(&finished) {
        println!("- {}: {}", status.label(), count);
    }

    Ok(())
}

fn run_rounds(
    service: &DemoService,
    application: Application,
    actor: &str,
) -> Result<Application, AppError> {
    let mut current = application;
    while current.current_status.in_selection() && current.next_pending_round().is_some() {
        current = service.advance(&current.id, "Cleared in demo run", actor)?;
    }
    Ok(current)
}

fn render_application(
    service: &DemoService,
    drive: &PlacementDrive,
    application: &Application,
) -> Result<(), AppError> {
    let view = application.status_view();
    println!(
        "\n{} at {} (drive {}, version {})",
        drive.role_title, drive.company_name, drive.id, application.version_applied_to
    );
    println!(
        "- Application {} -> {} | composite score {:.2}",
        view.application_id, view.status, view.composite_score
    );
    println!("  Decision rationale: {}", view.decision_rationale);

    println!("  Eligibility checks:");
    for result in &application.evaluation.eligibility.evaluations {
        let mark = if result.passed { "pass" } else { "fail" };
        println!("    - [{}] {}", mark, result.explanation);
    }

    if !application.evaluation.scoring.breakdown.is_empty() {
        println!("  Score breakdown:");
        for entry in &application.evaluation.scoring.breakdown {
            println!("    - {}", entry.explanation);
        }
    }

    for explanation in &application.evaluation.screening.explanations {
        println!("  Screening: {}", explanation);
    }

    println!(
        "  Rounds: {}/{} passed",
        view.rounds_passed, view.rounds_total
    );

    println!("  Audit trail:");
    for entry in service.audit_trail(&application.id.0)? {
        println!(
            "    - {} {} by {}",
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.action.label(),
            entry.actor
        );
    }

    Ok(())
}

fn sample_student() -> StudentProfile {
    StudentProfile {
        id: StudentId("S101".to_string()),
        name: "Alice Smith".to_string(),
        email: "alice@example.com".to_string(),
        cgpa: 8.5,
        branch: "CSE".to_string(),
        graduation_year: 2025,
        backlog_count: 0,
        skills: vec![
            "React".to_string(),
            "TypeScript".to_string(),
            "Node.js".to_string(),
        ],
        resume_url: "http://example.com/alice_cv.pdf".to_string(),
        extra_attributes: BTreeMap::new(),
    }
}

fn sample_responses() -> ScreeningResponses {
    let mut responses = ScreeningResponses::new();
    responses.insert("Q1".to_string(), AttributeValue::from("Yes"));
    responses
}

fn round(id: &str, name: &str, order: u32) -> SelectionRound {
    SelectionRound {
        id: id.to_string(),
        name: name.to_string(),
        order,
    }
}

fn infrastructure_drive() -> PlacementDrive {
    PlacementDrive {
        id: DriveId("D001".to_string()),
        company_id: "TECH_CORP".to_string(),
        company_name: "Tech Corp".to_string(),
        role_title: "Software Engineer Intern".to_string(),
        description: "Join the infrastructure team building scalable cloud solutions."
            .to_string(),
        required_skills: vec!["React".to_string(), "Node.js".to_string()],
        criteria: EvaluationConfig {
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
        },
        selection_rounds: vec![
            round("RD1", "Aptitude Test", 1),
            round("RD2", "Technical Interview", 2),
        ],
        status: DriveStatus::Open,
        version: 1,
        is_frozen: false,
    }
}

fn research_drive() -> PlacementDrive {
    PlacementDrive {
        id: DriveId("D002".to_string()),
        company_id: "NEBULA_AI".to_string(),
        company_name: "Nebula AI".to_string(),
        role_title: "AI Research Assistant".to_string(),
        description: "Work on cutting-edge generative models and neural networks.".to_string(),
        required_skills: vec!["Python".to_string(), "PyTorch".to_string()],
        criteria: EvaluationConfig {
            rules: vec![
                Rule::new("R3", "cgpa", Operator::Gte, 8.5).labelled("Min CGPA"),
                Rule::new("R4", "skills", Operator::ContainsAny, vec!["Python", "PyTorch"])
                    .labelled("AI Skills"),
            ],
            weights: vec![
                WeightConfig::new("cgpa", 0.7),
                WeightConfig::new("skills", 0.3),
            ],
            questions: Vec::new(),
        },
        selection_rounds: vec![
            round("RD3", "Math Quiz", 1),
            round("RD4", "Research Discussion", 2),
        ],
        status: DriveStatus::Open,
        version: 1,
        is_frozen: false,
    }
}
