//! # Case Review Core
//!
//! Pure review-engine logic for clinical case play: scoring a learner's
//! selections against the case's ground truth, classifying feedback sections,
//! parsing semi-structured review narrative, and gating premium asset
//! previews.
//!
//! Every component here is a synchronous, deterministic function (or a small
//! explicit state machine) of its inputs. Recomputation with identical inputs
//! yields identical outputs, so callers are free to re-run any of them on
//! every selection change or progress event.
//!
//! **No I/O concerns**: loading case JSON from disk or network belongs in
//! `casedx-wire`; command-line entry points belong in `casedx-cli`.

pub mod audit;
pub mod case;
pub mod feedback;
pub mod preview;
pub mod review;
pub mod score;

// Re-export the case model
pub use case::{
    CaseDefinition, CaseReview, CoreInsight, DiagnosisOption, RejectedDifferential, SelectionSet,
    TestOption, TreatmentOption, TreatmentPlan,
};

// Re-export component entry points and their result types
pub use audit::{audit_case, CaseDefect};
pub use feedback::{classify_feedback, CaseFeedback, FeedbackKind, FeedbackSection};
pub use preview::{
    DocumentGate, DocumentGateUpdate, PageIndicator, PreviewDecision, PreviewLimits, VideoDirective,
    VideoGate, VideoGateUpdate, Viewer,
};
pub use review::{
    parse_review, DiagnosisInsight, RejectedDiagnosis, ReviewContent, TestRationale, TreatmentStep,
};
pub use score::{compute_score, ScoreBreakdown};

// Re-export the id newtypes from casedx-types
pub use casedx_types::{DiagnosisId, IdError, TestId, TreatmentId};
