//! Selection payload wire model and translation.
//!
//! The gameplay UI submits one selection payload per case attempt:
//! `{selectedTests, selectedDiagnosis, selectedTreatments}`. Every field is
//! optional; an absent field means nothing was selected in that category.
//! Identifier strings are validated into the domain id newtypes, and
//! duplicate ids collapse into the set they were always meant to be.

use crate::{WireError, WireResult};
use casedx_core::case::SelectionSet;
use casedx_types::{DiagnosisId, TestId, TreatmentId};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionWire {
    #[serde(default)]
    selected_tests: Vec<String>,
    #[serde(default)]
    selected_diagnosis: Option<String>,
    #[serde(default)]
    selected_treatments: Vec<String>,
}

/// Parses a selection payload from JSON text.
///
/// # Errors
///
/// Returns [`WireError::Translation`] when the payload does not match the
/// selection schema or an identifier fails validation.
pub fn parse_selection(json_text: &str) -> WireResult<SelectionSet> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    let wire = match serde_path_to_error::deserialize::<_, SelectionWire>(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(WireError::Translation(format!(
                "selection schema mismatch at {path}: {source}"
            )));
        }
    };

    let mut tests = BTreeSet::new();
    for raw in &wire.selected_tests {
        let id = TestId::new(raw)
            .map_err(|e| WireError::Translation(format!("invalid selected test {raw:?}: {e}")))?;
        tests.insert(id);
    }

    let diagnosis = wire
        .selected_diagnosis
        .as_deref()
        .map(|raw| {
            DiagnosisId::new(raw).map_err(|e| {
                WireError::Translation(format!("invalid selected diagnosis {raw:?}: {e}"))
            })
        })
        .transpose()?;

    let mut treatments = BTreeSet::new();
    for raw in &wire.selected_treatments {
        let id = TreatmentId::new(raw).map_err(|e| {
            WireError::Translation(format!("invalid selected treatment {raw:?}: {e}"))
        })?;
        treatments.insert(id);
    }

    Ok(SelectionSet {
        tests,
        diagnosis,
        treatments,
    })
}

/// Reads and parses a selection payload from a file.
///
/// # Errors
///
/// Returns [`WireError::Io`] when the file cannot be read, otherwise as
/// [`parse_selection`].
pub fn read_selection_file(path: &Path) -> WireResult<SelectionSet> {
    let json_text = std::fs::read_to_string(path)?;
    parse_selection(&json_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn full_selection_translates() {
        let json = r#"{
            "selectedTests": ["echo", "ecg"],
            "selectedDiagnosis": "dx-as",
            "selectedTreatments": ["tx-avr"]
        }"#;

        let selection = parse_selection(json).expect("parse selection");
        assert_eq!(selection.tests.len(), 2);
        assert_eq!(
            selection.diagnosis.as_ref().map(|d| d.as_str()),
            Some("dx-as")
        );
        assert_eq!(selection.treatments.len(), 1);
    }

    #[test]
    fn empty_object_is_an_empty_selection() {
        let selection = parse_selection("{}").expect("parse empty selection");
        assert!(selection.tests.is_empty());
        assert!(selection.diagnosis.is_none());
        assert!(selection.treatments.is_empty());
    }

    #[test]
    fn null_diagnosis_means_none() {
        let json = r#"{"selectedTests": [], "selectedDiagnosis": null}"#;
        let selection = parse_selection(json).expect("parse null diagnosis");
        assert!(selection.diagnosis.is_none());
    }

    #[test]
    fn duplicate_ids_collapse_into_the_set() {
        let json = r#"{"selectedTests": ["echo", "echo", "ecg"]}"#;
        let selection = parse_selection(json).expect("parse duplicates");
        assert_eq!(selection.tests.len(), 2);
    }

    #[test]
    fn schema_mismatch_reports_the_failing_field() {
        let json = r#"{"selectedTests": "echo"}"#;
        let err = parse_selection(json).expect_err("should reject wrong type");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.contains("selectedTests"), "message was: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_selected_id_is_rejected() {
        let json = r#"{"selectedDiagnosis": ""}"#;
        let err = parse_selection(json).expect_err("should reject empty id");
        match err {
            WireError::Translation(msg) => {
                assert!(msg.contains("selected diagnosis"), "message was: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn reads_a_selection_from_disk() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("selection.json");
        fs::write(&path, r#"{"selectedTests": ["echo"]}"#).expect("write fixture");

        let selection = read_selection_file(&path).expect("read selection file");
        assert_eq!(selection.tests.len(), 1);
    }
}
