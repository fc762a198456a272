//! Case payload wire models and translation helpers.
//!
//! A case arrives as one JSON array of five step payloads in fixed order:
//! case presentation, orderable tests, diagnosis options, treatment plan,
//! review narrative. The presentation step carries display-only content the
//! engine never reads; the other four are parsed strictly and translated
//! into the tagged domain model.
//!
//! Responsibilities:
//! - Enforce the five-step positional contract at the boundary
//! - Parse each step payload with a path to any failing field
//! - Validate identifier strings into the domain id newtypes
//!
//! Notes:
//! - Step objects tolerate unknown keys; backend payloads carry presentation
//!   fields (titles, media references) the engine ignores.
//! - Review arrays and core-insight fields all default to empty. Missing
//!   narrative is never fatal.

use crate::{WireError, WireResult};
use casedx_core::case::{
    CaseDefinition, CaseReview, CoreInsight, DiagnosisOption, RejectedDifferential, TestOption,
    TreatmentOption, TreatmentPlan,
};
use casedx_types::{DiagnosisId, TestId, TreatmentId};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Number of step payloads a case array must carry.
const EXPECTED_STEPS: usize = 5;

// Fixed positions in the step array. Position 0 is the case presentation.
const STEP_TESTS: usize = 1;
const STEP_DIAGNOSES: usize = 2;
const STEP_TREATMENTS: usize = 3;
const STEP_REVIEW: usize = 4;

// ============================================================================
// Public parse operations
// ============================================================================

/// Parses a case payload from JSON text.
///
/// The root must be an array of at least five step payloads; extra trailing
/// steps are tolerated and ignored with a warning. Schema mismatches inside a
/// step are reported with the step position and a best-effort path to the
/// failing field (for example `[1].availableTests[0].isRelevant`).
///
/// # Arguments
///
/// * `json_text` - JSON text expected to hold the positional step array.
///
/// # Errors
///
/// Returns [`WireError::InvalidJson`] when the text is not a JSON array, and
/// [`WireError::Translation`] when the array is too short, a step does not
/// match its wire schema, or an identifier fails validation.
pub fn parse_case(json_text: &str) -> WireResult<CaseDefinition> {
    let steps: Vec<Value> = serde_json::from_str(json_text)?;

    if steps.len() < EXPECTED_STEPS {
        return Err(WireError::Translation(format!(
            "case payload has {} steps, expected {EXPECTED_STEPS}",
            steps.len()
        )));
    }
    if steps.len() > EXPECTED_STEPS {
        tracing::warn!(
            steps = steps.len(),
            "case payload has steps beyond the known five, ignoring them"
        );
    }

    let tests: TestsStepWire = parse_step(&steps, STEP_TESTS)?;
    let diagnoses: DiagnosesStepWire = parse_step(&steps, STEP_DIAGNOSES)?;
    let treatments: TreatmentsStepWire = parse_step(&steps, STEP_TREATMENTS)?;
    let review: ReviewStepWire = parse_step(&steps, STEP_REVIEW)?;

    wire_to_domain(tests, diagnoses, treatments, review)
}

/// Reads and parses a case payload from a file.
///
/// # Errors
///
/// Returns [`WireError::Io`] when the file cannot be read, otherwise as
/// [`parse_case`].
pub fn read_case_file(path: &Path) -> WireResult<CaseDefinition> {
    let json_text = std::fs::read_to_string(path)?;
    parse_case(&json_text)
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestsStepWire {
    available_tests: Vec<TestOptionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestOptionWire {
    test_id: String,
    test_name: String,
    is_relevant: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosesStepWire {
    diagnosis_options: Vec<DiagnosisOptionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosisOptionWire {
    diagnosis_id: String,
    diagnosis_name: String,
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreatmentsStepWire {
    treatment_options: TreatmentBucketsWire,
}

/// Four named treatment buckets; a bucket the author left empty may be
/// omitted from the payload entirely.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreatmentBucketsWire {
    #[serde(default)]
    medications: Vec<TreatmentOptionWire>,
    #[serde(default)]
    surgical_interventional: Vec<TreatmentOptionWire>,
    #[serde(default)]
    non_surgical: Vec<TreatmentOptionWire>,
    #[serde(default)]
    psychiatric: Vec<TreatmentOptionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreatmentOptionWire {
    treatment_id: String,
    treatment_name: String,
    is_correct: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStepWire {
    #[serde(default)]
    diagnosis_landing: Vec<String>,
    #[serde(default)]
    test_rationale: Vec<String>,
    #[serde(default)]
    treatment_sequencing: Vec<String>,
    #[serde(default)]
    differential_rejection: Vec<RejectedDifferentialWire>,
    #[serde(default)]
    core_insight: CoreInsightWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectedDifferentialWire {
    #[serde(default)]
    diagnosis_name: String,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoreInsightWire {
    #[serde(default)]
    clinical_reasoning: String,
    #[serde(default)]
    key_takeaway: String,
    #[serde(default)]
    traps_to_avoid: Vec<String>,
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

/// Parses one step payload into its typed wire struct.
///
/// This uses `serde_path_to_error` to surface a best-effort path to the
/// failing field, prefixed with the step position.
fn parse_step<T>(steps: &[Value], position: usize) -> WireResult<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_path_to_error::deserialize::<_, T>(steps[position].clone()) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let at = if path.is_empty() {
                format!("[{position}]")
            } else {
                format!("[{position}].{path}")
            };
            Err(WireError::Translation(format!(
                "case schema mismatch at {at}: {source}"
            )))
        }
    }
}

/// Converts the parsed step payloads into the tagged domain model.
///
/// This validates every identifier string through the domain id constructors.
fn wire_to_domain(
    tests: TestsStepWire,
    diagnoses: DiagnosesStepWire,
    treatments: TreatmentsStepWire,
    review: ReviewStepWire,
) -> WireResult<CaseDefinition> {
    let tests = tests
        .available_tests
        .into_iter()
        .map(test_to_domain)
        .collect::<WireResult<Vec<_>>>()?;

    let diagnoses = diagnoses
        .diagnosis_options
        .into_iter()
        .map(diagnosis_to_domain)
        .collect::<WireResult<Vec<_>>>()?;

    let correct_diagnoses = diagnoses.iter().filter(|d| d.correct).count();
    if correct_diagnoses > 1 {
        tracing::warn!(
            count = correct_diagnoses,
            "case defines multiple correct diagnoses, scoring uses the first"
        );
    }

    let buckets = treatments.treatment_options;
    let treatments = TreatmentPlan {
        medications: treatment_bucket_to_domain(buckets.medications)?,
        surgical_interventional: treatment_bucket_to_domain(buckets.surgical_interventional)?,
        non_surgical: treatment_bucket_to_domain(buckets.non_surgical)?,
        psychiatric: treatment_bucket_to_domain(buckets.psychiatric)?,
    };

    Ok(CaseDefinition {
        tests,
        diagnoses,
        treatments,
        review: review_to_domain(review),
    })
}

fn test_to_domain(wire: TestOptionWire) -> WireResult<TestOption> {
    let id = TestId::new(&wire.test_id).map_err(|e| {
        WireError::Translation(format!("invalid testId {:?}: {e}", wire.test_id))
    })?;
    Ok(TestOption {
        id,
        name: wire.test_name,
        relevant: wire.is_relevant,
    })
}

fn diagnosis_to_domain(wire: DiagnosisOptionWire) -> WireResult<DiagnosisOption> {
    let id = DiagnosisId::new(&wire.diagnosis_id).map_err(|e| {
        WireError::Translation(format!("invalid diagnosisId {:?}: {e}", wire.diagnosis_id))
    })?;
    Ok(DiagnosisOption {
        id,
        name: wire.diagnosis_name,
        correct: wire.is_correct,
    })
}

fn treatment_bucket_to_domain(bucket: Vec<TreatmentOptionWire>) -> WireResult<Vec<TreatmentOption>> {
    bucket
        .into_iter()
        .map(|wire| {
            let id = TreatmentId::new(&wire.treatment_id).map_err(|e| {
                WireError::Translation(format!(
                    "invalid treatmentId {:?}: {e}",
                    wire.treatment_id
                ))
            })?;
            Ok(TreatmentOption {
                id,
                name: wire.treatment_name,
                correct: wire.is_correct,
            })
        })
        .collect()
}

fn review_to_domain(wire: ReviewStepWire) -> CaseReview {
    CaseReview {
        diagnosis_landing: wire.diagnosis_landing,
        test_rationale: wire.test_rationale,
        treatment_sequencing: wire.treatment_sequencing,
        differential_rejection: wire
            .differential_rejection
            .into_iter()
            .map(|rejected| RejectedDifferential {
                diagnosis_name: rejected.diagnosis_name,
                reasoning: rejected.reasoning,
            })
            .collect(),
        core_insight: CoreInsight {
            clinical_reasoning: wire.core_insight.clinical_reasoning,
            key_takeaway: wire.core_insight.key_takeaway,
            traps_to_avoid: wire.core_insight.traps_to_avoid,
        },
    }
}
