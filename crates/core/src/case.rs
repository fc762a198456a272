//! Case definition domain model.
//!
//! This module defines the tagged, named-field representation of one playable
//! clinical case and of a learner's selections against it.
//!
//! Responsibilities:
//! - Model the four engine-relevant case steps (tests, diagnoses, treatments,
//!   review narrative) as explicit fields rather than positional payload slots
//! - Provide the ground-truth accessors shared by the score normalizer and the
//!   feedback classifier
//! - Model the per-attempt selection set
//!
//! Notes:
//! - Positional payload handling lives in the `casedx-wire` crate; nothing in
//!   this crate addresses a step by array index.
//! - Authoring invariants (unique ids, at most one correct diagnosis) are not
//!   enforced here. The accessors tolerate degenerate data: the first correct
//!   diagnosis wins. `audit::audit_case` reports such defects to authors.

use casedx_types::{DiagnosisId, TestId, TreatmentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Case definition
// ============================================================================

/// One playable clinical case, as the engine sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefinition {
    /// Orderable tests, in authored order.
    pub tests: Vec<TestOption>,

    /// Diagnosis options, in authored order. At most one should be correct.
    pub diagnoses: Vec<DiagnosisOption>,

    /// Treatment options, grouped into the four authored buckets.
    pub treatments: TreatmentPlan,

    /// Review-screen narrative payload for this case.
    pub review: CaseReview,
}

/// One orderable test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOption {
    /// Identifier, unique within this case's test list.
    pub id: TestId,

    /// Display name shown to the learner.
    pub name: String,

    /// Whether ordering this test is part of the case's ground truth.
    pub relevant: bool,
}

/// One diagnosis option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisOption {
    /// Identifier, unique within this case's diagnosis list.
    pub id: DiagnosisId,

    /// Display name shown to the learner.
    pub name: String,

    /// Whether this is the case's correct diagnosis.
    pub correct: bool,
}

/// One treatment option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentOption {
    /// Identifier, unique across all four treatment buckets of this case.
    pub id: TreatmentId,

    /// Display name shown to the learner.
    pub name: String,

    /// Whether this treatment is part of the case's ground truth.
    pub correct: bool,
}

/// Treatment options grouped into the four authored buckets.
///
/// The engine treats the concatenation of the buckets, in field order, as one
/// flat option list. That order is part of the scoring and feedback contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub medications: Vec<TreatmentOption>,
    pub surgical_interventional: Vec<TreatmentOption>,
    pub non_surgical: Vec<TreatmentOption>,
    pub psychiatric: Vec<TreatmentOption>,
}

impl TreatmentPlan {
    /// Iterates over all treatment options in the fixed bucket order.
    pub fn flattened(&self) -> impl Iterator<Item = &TreatmentOption> {
        self.medications
            .iter()
            .chain(self.surgical_interventional.iter())
            .chain(self.non_surgical.iter())
            .chain(self.psychiatric.iter())
    }

    /// Iterates over the ground-truth treatments, in flattened order.
    pub fn correct(&self) -> impl Iterator<Item = &TreatmentOption> {
        self.flattened().filter(|option| option.correct)
    }
}

impl CaseDefinition {
    /// Iterates over the ground-truth tests, in authored order.
    pub fn relevant_tests(&self) -> impl Iterator<Item = &TestOption> {
        self.tests.iter().filter(|option| option.relevant)
    }

    /// Returns the case's correct diagnosis, if one was authored.
    ///
    /// When more than one option is flagged correct the first wins; the extra
    /// flags are an authoring defect reported by [`crate::audit::audit_case`].
    pub fn correct_diagnosis(&self) -> Option<&DiagnosisOption> {
        self.diagnoses.iter().find(|option| option.correct)
    }
}

// ============================================================================
// Review narrative payload
// ============================================================================

/// Semi-structured review narrative for one case.
///
/// The string arrays hold annotated lines in the `**head** description`
/// convention; `review::parse_review` turns them into display records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReview {
    /// Why the case lands on its diagnosis.
    pub diagnosis_landing: Vec<String>,

    /// Why each relevant test mattered.
    pub test_rationale: Vec<String>,

    /// The intended treatment sequence.
    pub treatment_sequencing: Vec<String>,

    /// Differentials that were considered and rejected.
    pub differential_rejection: Vec<RejectedDifferential>,

    /// Free-text takeaway block.
    pub core_insight: CoreInsight,
}

/// One rejected differential, already structured at the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedDifferential {
    /// Name of the rejected diagnosis.
    pub diagnosis_name: String,

    /// Why it was rejected. Opaque prose, not parsed.
    pub reasoning: String,
}

/// Free-text "core insight" block of the review payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreInsight {
    /// The reasoning thread the case is meant to teach.
    pub clinical_reasoning: String,

    /// One-line takeaway.
    pub key_takeaway: String,

    /// Pitfalls the learner should remember to avoid.
    pub traps_to_avoid: Vec<String>,
}

// ============================================================================
// Selection set
// ============================================================================

/// A learner's choices for one case attempt.
///
/// Immutable for the duration of scoring: callers build a fresh value per
/// recomputation and discard results for superseded selections. Identifiers
/// that do not appear in the case's option lists are tolerated and never
/// match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    /// Tests the learner ordered.
    pub tests: BTreeSet<TestId>,

    /// The diagnosis the learner committed to, if any.
    pub diagnosis: Option<DiagnosisId>,

    /// Treatments the learner chose.
    pub treatments: BTreeSet<TreatmentId>,
}
