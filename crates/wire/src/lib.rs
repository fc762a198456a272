//! JSON wire boundary for the case review engine.
//!
//! The backend delivers each case as an ordered array of five step payloads,
//! addressed by position rather than by name. This crate owns that positional
//! contract: it parses the array into the tagged [`casedx_core::CaseDefinition`]
//! model and parses learner selection payloads into
//! [`casedx_core::SelectionSet`], so that nothing downstream ever indexes a
//! step by number.
//!
//! This crate focuses on:
//! - strict typed wire models for the step payloads
//! - schema mismatch reporting with a best-effort path to the failing field
//! - translation from wire strings into validated domain identifiers
//!
//! The engine itself performs no I/O; the file helpers here exist for hosts
//! and tooling that load cases from disk.

pub mod case;
pub mod selection;

pub use case::{parse_case, read_case_file};
pub use selection::{parse_selection, read_selection_file};

/// Errors returned by the `casedx-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;
