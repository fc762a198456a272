//! Feedback section classifier.
//!
//! Derives the titled, colour-coded item lists shown under each category of
//! the results screen: what the learner got right, what they ordered
//! unnecessarily, and what they missed. Works from the same ground truth as
//! the score normalizer but never consults it — both recompute independently
//! whenever the selection changes.

use crate::case::{CaseDefinition, SelectionSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const CORRECT_SELECTIONS_TITLE: &str = "Correct selections";
const UNNECESSARY_SELECTIONS_TITLE: &str = "Unnecessary selections";
const MISSED_TITLE: &str = "Missed";
const YOUR_SELECTION_TITLE: &str = "Your selection";
const CORRECT_ANSWER_TITLE: &str = "Correct answer";

/// Visual register of one feedback section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    /// The learner matched the ground truth.
    Success,
    /// The learner selected outside the ground truth.
    Error,
    /// Neutral information (missed items, the correct answer).
    Info,
}

/// One titled item list for the results screen.
///
/// Sections are only ever produced with a non-empty item list; an empty
/// classification bucket is omitted rather than emitted as a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSection {
    /// Visual register of the section.
    pub kind: FeedbackKind,

    /// Section heading.
    pub title: String,

    /// Display names, in case-definition order.
    pub items: Vec<String>,
}

/// Feedback sections grouped per category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaseFeedback {
    pub tests: Vec<FeedbackSection>,
    pub diagnosis: Vec<FeedbackSection>,
    pub treatment: Vec<FeedbackSection>,
}

/// Classifies a set category into up to three sections, in fixed order:
/// correct selections, unnecessary selections, missed.
///
/// `options` yields `(id, display name, in ground truth)` per authored
/// option; items keep that order. Selected ids that match no option are
/// dangling and classify nothing.
fn classify_set_category<'a, Id>(
    options: impl Iterator<Item = (&'a Id, &'a str, bool)>,
    selected: &BTreeSet<Id>,
) -> Vec<FeedbackSection>
where
    Id: Ord + 'a,
{
    let mut correct = Vec::new();
    let mut unnecessary = Vec::new();
    let mut missed = Vec::new();

    for (id, name, in_truth) in options {
        let picked = selected.contains(id);
        match (in_truth, picked) {
            (true, true) => correct.push(name.to_owned()),
            (true, false) => missed.push(name.to_owned()),
            (false, true) => unnecessary.push(name.to_owned()),
            (false, false) => {}
        }
    }

    let mut sections = Vec::new();
    if !correct.is_empty() {
        sections.push(FeedbackSection {
            kind: FeedbackKind::Success,
            title: CORRECT_SELECTIONS_TITLE.to_owned(),
            items: correct,
        });
    }
    if !unnecessary.is_empty() {
        sections.push(FeedbackSection {
            kind: FeedbackKind::Error,
            title: UNNECESSARY_SELECTIONS_TITLE.to_owned(),
            items: unnecessary,
        });
    }
    if !missed.is_empty() {
        sections.push(FeedbackSection {
            kind: FeedbackKind::Info,
            title: MISSED_TITLE.to_owned(),
            items: missed,
        });
    }
    sections
}

/// Classifies the diagnosis category.
///
/// When the learner committed to a diagnosis the case knows about, one
/// single-item section grades that choice. Whenever the case has a correct
/// diagnosis at all, an informational section names it — including when the
/// learner already picked it.
fn classify_diagnosis(case: &CaseDefinition, selection: &SelectionSet) -> Vec<FeedbackSection> {
    let mut sections = Vec::new();
    let correct = case.correct_diagnosis();

    if let Some(selected_id) = &selection.diagnosis {
        if let Some(option) = case.diagnoses.iter().find(|d| &d.id == selected_id) {
            let kind = match correct {
                Some(correct) if correct.id == option.id => FeedbackKind::Success,
                _ => FeedbackKind::Error,
            };
            sections.push(FeedbackSection {
                kind,
                title: YOUR_SELECTION_TITLE.to_owned(),
                items: vec![option.name.clone()],
            });
        }
    }

    if let Some(correct) = correct {
        sections.push(FeedbackSection {
            kind: FeedbackKind::Info,
            title: CORRECT_ANSWER_TITLE.to_owned(),
            items: vec![correct.name.clone()],
        });
    }

    sections
}

/// Classifies a selection set into per-category feedback sections.
pub fn classify_feedback(case: &CaseDefinition, selection: &SelectionSet) -> CaseFeedback {
    CaseFeedback {
        tests: classify_set_category(
            case.tests
                .iter()
                .map(|t| (&t.id, t.name.as_str(), t.relevant)),
            &selection.tests,
        ),
        diagnosis: classify_diagnosis(case, selection),
        treatment: classify_set_category(
            case.treatments
                .flattened()
                .map(|t| (&t.id, t.name.as_str(), t.correct)),
            &selection.treatments,
        ),
    }
}
