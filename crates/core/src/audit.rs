//! Authoring-time case audits.
//!
//! Checks a [`CaseDefinition`] for content defects that the play-path
//! components tolerate silently: duplicate option identifiers, more than one
//! correct diagnosis, empty display names. Scoring and feedback never call
//! these checks; they exist for authoring pipelines and the command-line
//! validator, where a defect should be reported rather than papered over.

use crate::case::CaseDefinition;
use casedx_types::{DiagnosisId, TestId, TreatmentId};
use std::collections::BTreeSet;
use thiserror::Error;

/// One content defect found in a case definition.
///
/// Defects are reportable findings, not failures; a case with defects still
/// scores and classifies, with the documented first-wins and silent-skip
/// behaviours applying.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaseDefect {
    /// A test id appears more than once in the test list.
    #[error("duplicate test id: {id}")]
    DuplicateTestId { id: TestId },

    /// A diagnosis id appears more than once in the diagnosis list.
    #[error("duplicate diagnosis id: {id}")]
    DuplicateDiagnosisId { id: DiagnosisId },

    /// A treatment id appears more than once across the flattened plan.
    #[error("duplicate treatment id: {id}")]
    DuplicateTreatmentId { id: TreatmentId },

    /// More than one diagnosis is marked correct; scoring uses the first.
    #[error("case defines {count} correct diagnoses, scoring uses the first")]
    MultipleCorrectDiagnoses { count: usize },

    /// An option's display name is empty or whitespace.
    #[error("option {id} has an empty display name")]
    EmptyOptionName { id: String },
}

/// Audits a case definition and returns every defect found.
///
/// An empty vector means the case is clean. Defects are reported in list
/// order per category: tests, diagnoses, treatments, then the correct-count
/// check.
pub fn audit_case(case: &CaseDefinition) -> Vec<CaseDefect> {
    let mut defects = Vec::new();

    let mut seen_tests = BTreeSet::new();
    for test in &case.tests {
        if !seen_tests.insert(&test.id) {
            defects.push(CaseDefect::DuplicateTestId {
                id: test.id.clone(),
            });
        }
        if test.name.trim().is_empty() {
            defects.push(CaseDefect::EmptyOptionName {
                id: test.id.to_string(),
            });
        }
    }

    let mut seen_diagnoses = BTreeSet::new();
    for diagnosis in &case.diagnoses {
        if !seen_diagnoses.insert(&diagnosis.id) {
            defects.push(CaseDefect::DuplicateDiagnosisId {
                id: diagnosis.id.clone(),
            });
        }
        if diagnosis.name.trim().is_empty() {
            defects.push(CaseDefect::EmptyOptionName {
                id: diagnosis.id.to_string(),
            });
        }
    }

    let mut seen_treatments = BTreeSet::new();
    for treatment in case.treatments.flattened() {
        if !seen_treatments.insert(&treatment.id) {
            defects.push(CaseDefect::DuplicateTreatmentId {
                id: treatment.id.clone(),
            });
        }
        if treatment.name.trim().is_empty() {
            defects.push(CaseDefect::EmptyOptionName {
                id: treatment.id.to_string(),
            });
        }
    }

    let correct_diagnoses = case.diagnoses.iter().filter(|d| d.correct).count();
    if correct_diagnoses > 1 {
        defects.push(CaseDefect::MultipleCorrectDiagnoses {
            count: correct_diagnoses,
        });
    }

    defects
}
