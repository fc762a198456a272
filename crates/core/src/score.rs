//! Score normalizer.
//!
//! Turns a case definition plus a selection set into the three weighted
//! category scores shown on the results screen. Pure and deterministic:
//! identical inputs always produce identical breakdowns, and set membership is
//! all that matters — selection order never influences a score.

use crate::case::{CaseDefinition, SelectionSet};
use serde::Serialize;
use std::collections::BTreeSet;

/// Points awarded per correctly selected set item.
const CORRECT_POINTS: i64 = 3;
/// Points deducted per ground-truth item the learner missed.
const MISSED_PENALTY: i64 = 2;
/// Points deducted per selected item outside the ground truth.
const UNNECESSARY_PENALTY: i64 = 1;

/// Weight of the tests category in the total.
const TESTS_WEIGHT: f64 = 30.0;
/// Weight of the diagnosis category in the total.
const DIAGNOSIS_WEIGHT: f64 = 40.0;
/// Weight of the treatment category in the total.
const TREATMENT_WEIGHT: f64 = 30.0;

/// The scored case attempt, broken into weighted categories.
///
/// `diagnosis` is either `0` or the full category weight. `tests` and
/// `treatment` are normalized against a perfect raw score but **not clamped**:
/// when penalty terms dominate, a category falls below zero, and `total` (the
/// plain sum of the three) falls with it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Sum of the three category scores.
    pub total: f64,

    /// Tests category, nominally 0–30.
    pub tests: f64,

    /// Diagnosis category, 0 or 40.
    pub diagnosis: f64,

    /// Treatment category, nominally 0–30.
    pub treatment: f64,
}

/// Counts from comparing one selection category against its ground truth.
struct CategoryCounts {
    truth: usize,
    correct: usize,
    missed: usize,
    unnecessary: usize,
}

impl CategoryCounts {
    /// Raw category score: `3·correct − 2·missed − 1·unnecessary`.
    fn raw(&self) -> i64 {
        CORRECT_POINTS * self.correct as i64
            - MISSED_PENALTY * self.missed as i64
            - UNNECESSARY_PENALTY * self.unnecessary as i64
    }

    /// Normalizes the raw score against a perfect raw score, scaled to
    /// `weight`. An empty ground truth contributes exactly zero no matter
    /// what was selected.
    fn normalized(&self, weight: f64) -> f64 {
        if self.truth == 0 {
            return 0.0;
        }
        self.raw() as f64 * weight / (CORRECT_POINTS * self.truth as i64) as f64
    }
}

/// Walks a category's option list and classifies each option against the
/// selection.
///
/// Selected identifiers that never appear in `options` are dangling (stale or
/// foreign ids) and are deliberately left out of every count.
fn count_category<'a, Id>(
    options: impl Iterator<Item = (&'a Id, bool)>,
    selected: &BTreeSet<Id>,
) -> CategoryCounts
where
    Id: Ord + 'a,
{
    let mut counts = CategoryCounts {
        truth: 0,
        correct: 0,
        missed: 0,
        unnecessary: 0,
    };

    for (id, in_truth) in options {
        let picked = selected.contains(id);
        if in_truth {
            counts.truth += 1;
            if picked {
                counts.correct += 1;
            }
        } else if picked {
            counts.unnecessary += 1;
        }
    }

    counts.missed = counts.truth - counts.correct;
    counts
}

/// Scores a selection set against a case definition.
///
/// Category scores follow the fixed formula: per set category (tests,
/// treatments) the raw score is `3·correct − 2·missed − 1·unnecessary`,
/// normalized by the perfect raw score (`3 × ground-truth count`) and scaled
/// to the category weight (30 each). Diagnosis scores the full 40 when the
/// selected id equals the correct diagnosis id, otherwise 0. The total is the
/// unclamped sum.
pub fn compute_score(case: &CaseDefinition, selection: &SelectionSet) -> ScoreBreakdown {
    let test_counts = count_category(
        case.tests.iter().map(|t| (&t.id, t.relevant)),
        &selection.tests,
    );
    let treatment_counts = count_category(
        case.treatments.flattened().map(|t| (&t.id, t.correct)),
        &selection.treatments,
    );

    let diagnosis = match (&selection.diagnosis, case.correct_diagnosis()) {
        (Some(selected), Some(correct)) if *selected == correct.id => DIAGNOSIS_WEIGHT,
        _ => 0.0,
    };

    let tests = test_counts.normalized(TESTS_WEIGHT);
    let treatment = treatment_counts.normalized(TREATMENT_WEIGHT);

    let breakdown = ScoreBreakdown {
        total: tests + diagnosis + treatment,
        tests,
        diagnosis,
        treatment,
    };

    tracing::debug!(
        total = breakdown.total,
        tests = breakdown.tests,
        diagnosis = breakdown.diagnosis,
        treatment = breakdown.treatment,
        "scored case attempt"
    );

    breakdown
}
