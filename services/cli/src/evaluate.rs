use clap::Args;
use placement_ai::error::AppError;
use placement_ai::workflows::placement::{
    CandidateRecord, EvaluationConfig, EvaluationEngine, EvaluationOutcome, PlacementDrive,
    ScreeningResponses, StudentProfile,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Drive definition or bare criteria (rules, weights, questions) as JSON
    #[arg(long)]
    pub(crate) drive: PathBuf,
    /// Student profile or flat attribute map as JSON
    #[arg(long)]
    pub(crate) candidate: PathBuf,
    /// Screening answers keyed by question id
    #[arg(long)]
    pub(crate) responses: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidateSource {
    Profile(Box<StudentProfile>),
    Attributes(CandidateRecord),
}

impl CandidateSource {
    fn into_record(self) -> CandidateRecord {
        match self {
            CandidateSource::Profile(profile) => profile.to_candidate_record(),
            CandidateSource::Attributes(record) => record,
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let criteria = parse_criteria(&fs::read_to_string(&args.drive)?)?;
    let record = parse_candidate(&fs::read_to_string(&args.candidate)?)?;
    let responses = match args.responses {
        Some(path) => read_json::<ScreeningResponses>(&path)?,
        None => ScreeningResponses::new(),
    };

    let outcome = evaluate(criteria, &record, &responses);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Reads drive criteria. An object carrying an `id` or `criteria` key must be a
/// complete drive; anything else must be bare criteria with no unknown keys.
fn parse_criteria(raw: &str) -> Result<EvaluationConfig, AppError> {
    let value: Value = serde_json::from_str(raw)?;
    let is_drive = value
        .as_object()
        .map_or(false, |object| object.contains_key("id") || object.contains_key("criteria"));

    if is_drive {
        let drive: PlacementDrive = serde_json::from_value(value)?;
        Ok(drive.criteria)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn parse_candidate(raw: &str) -> Result<CandidateRecord, AppError> {
    Ok(serde_json::from_str::<CandidateSource>(raw)?.into_record())
}

fn evaluate(
    criteria: EvaluationConfig,
    record: &CandidateRecord,
    responses: &ScreeningResponses,
) -> EvaluationOutcome {
    if !criteria.weights_balanced() {
        tracing::warn!(
            total_weight = criteria.total_weight(),
            "scoring weights do not sum to 1; composite score is not bounded to 0-100"
        );
    }
    tracing::debug!(
        rules = criteria.rules.len(),
        weights = criteria.weights.len(),
        questions = criteria.questions.len(),
        attributes = record.len(),
        "evaluating candidate"
    );

    EvaluationEngine::new(criteria).evaluate(record, responses)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
