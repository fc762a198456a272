//! Narrative parsing for the case review screen.
//!
//! Review content is authored as semi-structured prose: each line sets off a
//! head segment with a `**` bold marker, and the head itself may carry a step
//! number, a priority in parentheses, or an inline colon. This module turns
//! those strings into display records through a fallback ladder — marker
//! split, then colon split, then pass-through — so that any input, however
//! malformed, still yields a usable record. Parsing never fails.
//!
//! Responsibilities:
//! - Extract head/description pairs from bold-marker narrative lines.
//! - Derive the kind-specific fields (step number, priority, title).
//! - Map a whole [`CaseReview`] into a [`ReviewContent`] once per case load.
//!
//! Notes:
//! - Rejected differentials are structured at the source and pass through
//!   without any string parsing.
//! - Parsed output is display-only; nothing downstream branches on it.

use crate::case::{CaseReview, CoreInsight};
use serde::Serialize;

/// Bold-emphasis delimiter setting off the head of a narrative line.
const BOLD_MARKER: &str = "**";

// ============================================================================
// Parsed records
// ============================================================================

/// One "why this diagnosis" talking point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosisInsight {
    pub title: String,
    pub description: String,
}

/// Rationale for one orderable test.
///
/// `priority` is the parenthesised tag from the head (for example
/// `"High Priority"`) and is empty when the head carries none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestRationale {
    pub name: String,
    pub priority: String,
    pub description: String,
}

/// One step of the treatment sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreatmentStep {
    /// 1-based step number, from the head or from array position.
    pub step: u32,
    pub title: String,
    pub description: String,
}

/// A differential the case rejects, with the author's reasoning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedDiagnosis {
    pub diagnosis_name: String,
    pub reasoning: String,
}

/// All parsed review content for one case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReviewContent {
    pub diagnosis_landing: Vec<DiagnosisInsight>,
    pub test_rationale: Vec<TestRationale>,
    pub treatment_sequencing: Vec<TreatmentStep>,
    pub differential_rejection: Vec<RejectedDiagnosis>,
    pub core_insight: CoreInsight,
}

// ============================================================================
// Extraction ladder
// ============================================================================

/// Which rung of the fallback ladder produced a head/description pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitStrategy {
    /// `**head** description` — the marker closed and text followed it.
    MarkerSplit,
    /// The marker yielded no description; it was taken from everything after
    /// the first `:` of the input instead.
    ColonSplit,
    /// No leading marker; the whole input is the head.
    PassThrough,
}

struct SplitOutcome {
    head: String,
    description: String,
    #[allow(dead_code)]
    strategy: SplitStrategy,
}

/// Splits a narrative line into head and description.
///
/// Inputs without a leading marker pass through whole. Marker-split heads
/// have residual `*` characters stripped; a colon-split description keeps
/// whatever residual markers trail it, matching how the authored content has
/// always rendered.
fn split_narrative(raw: &str) -> SplitOutcome {
    let trimmed = raw.trim();
    if !trimmed.starts_with(BOLD_MARKER) {
        return SplitOutcome {
            head: trimmed.to_owned(),
            description: String::new(),
            strategy: SplitStrategy::PassThrough,
        };
    }

    let segments: Vec<&str> = trimmed.split(BOLD_MARKER).collect();
    let head = segments
        .get(1)
        .copied()
        .unwrap_or_default()
        .replace('*', "")
        .trim()
        .to_owned();
    let mut description = if segments.len() > 2 {
        segments[2..].join(BOLD_MARKER).trim().to_owned()
    } else {
        String::new()
    };

    let mut strategy = SplitStrategy::MarkerSplit;
    if description.is_empty() {
        if let Some((_, after)) = trimmed.split_once(':') {
            let after = after.trim();
            if !after.is_empty() {
                description = after.to_owned();
                strategy = SplitStrategy::ColonSplit;
            }
        }
    }

    SplitOutcome {
        head,
        description,
        strategy,
    }
}

/// Matches a leading `<digits>. ` prefix, returning the step number and the
/// rest of the head.
fn leading_step(head: &str) -> Option<(u32, &str)> {
    let (digits, rest) = head.split_once(". ")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let step = digits.parse().ok()?;
    Some((step, rest))
}

/// Matches a trailing `(<text>)` suffix, returning the head without it and
/// the text inside the parentheses.
fn trailing_parenthetical(head: &str) -> Option<(&str, &str)> {
    let rest = head.strip_suffix(')')?;
    let open = rest.rfind('(')?;
    Some((&head[..open], &rest[open + 1..]))
}

// ============================================================================
// Kind-specific parsers
// ============================================================================

/// Parses one diagnosis-landing line.
///
/// The head splits on its first `:`; the part before becomes the title, and
/// a non-empty part after overrides the description from the ladder.
pub fn parse_diagnosis_insight(raw: &str) -> DiagnosisInsight {
    let outcome = split_narrative(raw);
    match outcome.head.split_once(':') {
        Some((title, after)) if !after.trim().is_empty() => DiagnosisInsight {
            title: title.trim_end().to_owned(),
            description: after.trim().to_owned(),
        },
        Some((title, _)) => DiagnosisInsight {
            title: title.trim_end().to_owned(),
            description: outcome.description,
        },
        None => DiagnosisInsight {
            title: outcome.head,
            description: outcome.description,
        },
    }
}

/// Parses one test-rationale line.
///
/// The head drops a trailing `:`, then a trailing `(<text>)` becomes the
/// priority. Unmatched parentheses leave the priority empty and the head
/// intact.
pub fn parse_test_rationale(raw: &str) -> TestRationale {
    let outcome = split_narrative(raw);
    let head = outcome.head.trim_end_matches(':').trim_end();
    match trailing_parenthetical(head) {
        Some((name, priority)) => TestRationale {
            name: name.trim_end().to_owned(),
            priority: priority.trim().to_owned(),
            description: outcome.description,
        },
        None => TestRationale {
            name: head.to_owned(),
            priority: String::new(),
            description: outcome.description,
        },
    }
}

/// Parses one treatment-sequencing line.
///
/// A leading `<digits>. ` in the head becomes the step number; without one
/// the 1-based array position stands in, which is worth flagging because the
/// rendered ordering then depends on authoring order alone.
///
/// # Arguments
///
/// * `position` - 0-based index of the line in the sequencing array
/// * `raw` - The authored narrative line
pub fn parse_treatment_step(position: usize, raw: &str) -> TreatmentStep {
    let outcome = split_narrative(raw);
    match leading_step(&outcome.head) {
        Some((step, rest)) => TreatmentStep {
            step,
            title: rest.trim_end_matches(':').trim_end().to_owned(),
            description: outcome.description,
        },
        None => {
            tracing::warn!(
                position,
                line = raw,
                "treatment step has no leading number, falling back to array position"
            );
            TreatmentStep {
                step: position as u32 + 1,
                title: outcome.head.trim_end_matches(':').trim_end().to_owned(),
                description: outcome.description,
            }
        }
    }
}

/// Parses a whole case review into display records.
///
/// Treatment step numbers fall back to 1-based array positions when the
/// authored lines carry none. Rejected differentials and the core insight
/// pass through unparsed.
pub fn parse_review(review: &CaseReview) -> ReviewContent {
    ReviewContent {
        diagnosis_landing: review
            .diagnosis_landing
            .iter()
            .map(|line| parse_diagnosis_insight(line))
            .collect(),
        test_rationale: review
            .test_rationale
            .iter()
            .map(|line| parse_test_rationale(line))
            .collect(),
        treatment_sequencing: review
            .treatment_sequencing
            .iter()
            .enumerate()
            .map(|(position, line)| parse_treatment_step(position, line))
            .collect(),
        differential_rejection: review
            .differential_rejection
            .iter()
            .map(|rejected| RejectedDiagnosis {
                diagnosis_name: rejected.diagnosis_name.clone(),
                reasoning: rejected.reasoning.clone(),
            })
            .collect(),
        core_insight: review.core_insight.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::RejectedDifferential;

    #[test]
    fn marker_split_extracts_head_and_description() {
        let outcome = split_narrative("**Why it fits:** The murmur pattern matches");
        assert_eq!(outcome.strategy, SplitStrategy::MarkerSplit);
        assert_eq!(outcome.head, "Why it fits:");
        assert_eq!(outcome.description, "The murmur pattern matches");
    }

    #[test]
    fn unmarked_input_passes_through_whole() {
        let outcome = split_narrative("Plain sentence with no markers");
        assert_eq!(outcome.strategy, SplitStrategy::PassThrough);
        assert_eq!(outcome.head, "Plain sentence with no markers");
        assert_eq!(outcome.description, "");
    }

    #[test]
    fn colon_split_keeps_residual_trailing_marker() {
        // The closing marker swallows the description, so the colon fallback
        // recovers it with the stray marker still attached.
        let outcome = split_narrative("**Head: tail**");
        assert_eq!(outcome.strategy, SplitStrategy::ColonSplit);
        assert_eq!(outcome.head, "Head: tail");
        assert_eq!(outcome.description, "tail**");
    }

    #[test]
    fn description_rejoins_interior_markers() {
        let outcome = split_narrative("**Head:** before **bold** after");
        assert_eq!(outcome.strategy, SplitStrategy::MarkerSplit);
        assert_eq!(outcome.description, "before **bold** after");
    }

    #[test]
    fn lone_marker_degrades_to_empty_record() {
        let outcome = split_narrative("**");
        assert_eq!(outcome.head, "");
        assert_eq!(outcome.description, "");

        let outcome = split_narrative("");
        assert_eq!(outcome.strategy, SplitStrategy::PassThrough);
        assert_eq!(outcome.head, "");
        assert_eq!(outcome.description, "");
    }

    #[test]
    fn test_rationale_extracts_name_priority_and_description() {
        let record = parse_test_rationale("**Echocardiogram (High Priority):** Confirms valve pathology");
        assert_eq!(record.name, "Echocardiogram");
        assert_eq!(record.priority, "High Priority");
        assert_eq!(record.description, "Confirms valve pathology");
    }

    #[test]
    fn test_rationale_without_priority_keeps_whole_name() {
        let record = parse_test_rationale("**Chest X-ray:** Rules out pulmonary causes");
        assert_eq!(record.name, "Chest X-ray");
        assert_eq!(record.priority, "");
        assert_eq!(record.description, "Rules out pulmonary causes");
    }

    #[test]
    fn test_rationale_unmatched_parenthesis_degrades() {
        let record = parse_test_rationale("**BNP (elevated:** Supports heart failure");
        assert_eq!(record.name, "BNP (elevated");
        assert_eq!(record.priority, "");
        assert_eq!(record.description, "Supports heart failure");
    }

    #[test]
    fn test_rationale_on_plain_text_is_name_only() {
        let record = parse_test_rationale("Plain sentence with no markers");
        assert_eq!(record.name, "Plain sentence with no markers");
        assert_eq!(record.priority, "");
        assert_eq!(record.description, "");
    }

    #[test]
    fn treatment_step_takes_leading_number() {
        let record = parse_treatment_step(4, "**1. Stabilize airway:** Secure patent airway first");
        assert_eq!(record.step, 1);
        assert_eq!(record.title, "Stabilize airway");
        assert_eq!(record.description, "Secure patent airway first");
    }

    #[test]
    fn treatment_step_falls_back_to_array_position() {
        let record = parse_treatment_step(2, "**Titrate diuretics:** Reassess volume status daily");
        assert_eq!(record.step, 3);
        assert_eq!(record.title, "Titrate diuretics");
        assert_eq!(record.description, "Reassess volume status daily");
    }

    #[test]
    fn treatment_step_ignores_non_numeric_prefix() {
        let record = parse_treatment_step(0, "**Dr. Evans advises:** Monitor overnight");
        assert_eq!(record.step, 1);
        assert_eq!(record.title, "Dr. Evans advises");
    }

    #[test]
    fn diagnosis_insight_splits_head_on_colon() {
        let record = parse_diagnosis_insight("**Pathophysiology: pressure overload**");
        assert_eq!(record.title, "Pathophysiology");
        assert_eq!(record.description, "pressure overload");
    }

    #[test]
    fn diagnosis_insight_empty_colon_remainder_keeps_ladder_description() {
        let record = parse_diagnosis_insight("**Why this diagnosis:** The murmur radiates to the carotids");
        assert_eq!(record.title, "Why this diagnosis");
        assert_eq!(record.description, "The murmur radiates to the carotids");
    }

    #[test]
    fn diagnosis_insight_without_colon_uses_whole_head() {
        let record = parse_diagnosis_insight("**Classic triad** Syncope, angina, dyspnoea");
        assert_eq!(record.title, "Classic triad");
        assert_eq!(record.description, "Syncope, angina, dyspnoea");
    }

    #[test]
    fn parse_review_maps_every_section() {
        let review = CaseReview {
            diagnosis_landing: vec!["**Why it fits:** Murmur and syncope".into()],
            test_rationale: vec!["**Echocardiogram (High Priority):** Confirms valve pathology".into()],
            treatment_sequencing: vec![
                "**1. Stabilize airway:** Secure patent airway first".into(),
                "**Titrate diuretics:** Reassess volume status".into(),
            ],
            differential_rejection: vec![RejectedDifferential {
                diagnosis_name: "Mitral regurgitation".into(),
                reasoning: "Murmur location does not fit".into(),
            }],
            core_insight: CoreInsight {
                clinical_reasoning: "Pressure overload physiology".into(),
                key_takeaway: "Syncope plus murmur demands an echo".into(),
                traps_to_avoid: vec!["Do not vasodilate aggressively".into()],
            },
        };

        let content = parse_review(&review);
        assert_eq!(content.diagnosis_landing[0].title, "Why it fits");
        assert_eq!(content.test_rationale[0].priority, "High Priority");
        assert_eq!(content.treatment_sequencing[0].step, 1);
        assert_eq!(content.treatment_sequencing[1].step, 2);
        assert_eq!(
            content.differential_rejection[0].diagnosis_name,
            "Mitral regurgitation"
        );
        assert_eq!(
            content.core_insight.key_takeaway,
            "Syncope plus murmur demands an echo"
        );
    }

    #[test]
    fn parsing_is_total_on_degenerate_inputs() {
        for raw in ["", "   ", "**", "****", "***a***", ":", "**:**"] {
            let _ = parse_diagnosis_insight(raw);
            let _ = parse_test_rationale(raw);
            let _ = parse_treatment_step(0, raw);
        }
    }
}
