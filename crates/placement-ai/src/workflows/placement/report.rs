use std::collections::{BTreeMap, HashMap};
use std::io;

use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationStatus, DriveId, PlacementDrive, StudentId, StudentProfile,
};

const BIAS_MIN_GROUP_SIZE: usize = 5;
const BIAS_REJECTION_RATE: f64 = 0.8;

/// Application counts per status across the pipeline.
pub fn funnel(applications: &[Application]) -> BTreeMap<ApplicationStatus, usize> {
    let mut stats = BTreeMap::new();
    for application in applications {
        *stats.entry(application.current_status).or_insert(0) += 1;
    }
    stats
}

/// Student attribute used to group outcomes when checking for skewed rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasAttribute {
    Branch,
    GraduationYear,
}

impl BiasAttribute {
    pub const fn label(self) -> &'static str {
        match self {
            BiasAttribute::Branch => "branch",
            BiasAttribute::GraduationYear => "graduation_year",
        }
    }

    fn value_of(self, student: &StudentProfile) -> String {
        match self {
            BiasAttribute::Branch => student.branch.clone(),
            BiasAttribute::GraduationYear => student.graduation_year.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    pub attribute: BiasAttribute,
    pub distribution: BTreeMap<String, usize>,
    pub rejections: BTreeMap<String, usize>,
    pub is_disproportionate: bool,
    pub recommendation: String,
}

/// Flags groups of more than five applicants whose rejection rate exceeds 80%.
///
/// Applications whose student is not in `students` are skipped.
pub fn detect_bias(
    applications: &[Application],
    students: &[StudentProfile],
    attribute: BiasAttribute,
) -> BiasReport {
    let by_id: HashMap<&StudentId, &StudentProfile> =
        students.iter().map(|student| (&student.id, student)).collect();

    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut rejections: BTreeMap<String, usize> = BTreeMap::new();

    for application in applications {
        let Some(student) = by_id.get(&application.student_id) else {
            continue;
        };
        let group = attribute.value_of(student);
        *distribution.entry(group.clone()).or_insert(0) += 1;

        if matches!(
            application.current_status,
            ApplicationStatus::Rejected | ApplicationStatus::NotEligible
        ) {
            *rejections.entry(group).or_insert(0) += 1;
        }
    }

    let is_disproportionate = rejections.iter().any(|(group, rejected)| {
        let total = distribution.get(group).copied().unwrap_or(0);
        total > BIAS_MIN_GROUP_SIZE && (*rejected as f64 / total as f64) > BIAS_REJECTION_RATE
    });

    let recommendation = if is_disproportionate {
        format!(
            "High rejection rate detected for {}. Review eligibility rules for hidden biases.",
            attribute.label()
        )
    } else {
        format!("Distribution for {} appears fair.", attribute.label())
    };

    BiasReport {
        attribute,
        distribution,
        rejections,
        is_disproportionate,
        recommendation,
    }
}

/// Drive suggestion for a student, ranked by how often their skills appear in the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub drive_id: DriveId,
    /// Rounded percentage. Repeated mentions count again, so it can exceed 100.
    pub match_score: u32,
    pub explanation: String,
}

/// Ranks drives by skill mentions in their descriptions, highest first.
///
/// Mentions are counted case-insensitively and without overlap; at each
/// position the first listed skill that matches wins. The count is divided by
/// the number of skills (at least one). Ties keep the input order.
pub fn recommend(student: &StudentProfile, drives: &[PlacementDrive]) -> Vec<Recommendation> {
    let skills: Vec<String> = student
        .skills
        .iter()
        .filter(|skill| !skill.is_empty())
        .map(|skill| skill.to_lowercase())
        .collect();
    let skill_list = student.skills.join(", ");

    let mut recommendations: Vec<Recommendation> = drives
        .iter()
        .map(|drive| {
            let mentions = count_mentions(&drive.description.to_lowercase(), &skills);
            let score = mentions as f64 / student.skills.len().max(1) as f64 * 100.0;
            let match_score = score.round() as u32;
            Recommendation {
                drive_id: drive.id.clone(),
                match_score,
                explanation: format!(
                    "Match score of {match_score}% based on your skills in {skill_list} \
                     overlapping with the job description."
                ),
            }
        })
        .collect();

    recommendations.sort_by(|left, right| right.match_score.cmp(&left.match_score));
    recommendations
}

fn count_mentions(text: &str, skills: &[String]) -> usize {
    let mut mentions = 0;
    let mut position = 0;
    while position < text.len() {
        let rest = &text[position..];
        match skills.iter().find(|skill| rest.starts_with(skill.as_str())) {
            Some(skill) => {
                mentions += 1;
                position += skill.len();
            }
            None => {
                position += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    mentions
}

#[derive(Debug, Serialize)]
struct ApplicationRow<'a> {
    application_id: &'a str,
    student_id: &'a str,
    drive_id: &'a str,
    status: &'static str,
    composite_score: String,
    rounds_passed: usize,
    rationale: String,
}

/// Writes a header plus one CSV row per application. An empty slice writes nothing.
pub fn write_csv<W: io::Write>(applications: &[Application], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for application in applications {
        csv_writer.serialize(ApplicationRow {
            application_id: &application.id.0,
            student_id: &application.student_id.0,
            drive_id: &application.drive_id.0,
            status: application.current_status.label(),
            composite_score: format!("{:.2}", application.evaluation.composite_score()),
            rounds_passed: application.rounds_passed(),
            rationale: application.decision_rationale(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
