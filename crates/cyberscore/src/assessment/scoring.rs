//! Score calculator: reduces an answer set against the questionnaire to one
//! normalized 0-100 score plus the per-question detail breakdown that gets
//! persisted alongside it. Pure and order-independent.

use crate::questionnaire::{composite_key, Questionnaire, MAX_POINTS_PER_QUESTION};

use super::domain::{AnswerSet, DetailEntry, EvaluationDetail};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Normalized score in [0, 100], two-decimal precision.
    pub score: f64,
    /// One entry per answered question; unanswered questions are omitted.
    pub details: EvaluationDetail,
}

/// Compute the evaluation score for a (possibly partial) answer set.
///
/// Every answered question contributes its option's point value (0 for an
/// unrecognized option) against a fixed 10-point maximum. Unanswered
/// questions neither appear in the details nor raise the maximum, so a
/// partial submission is scored over the questions it actually answers.
pub fn compute(answers: &AnswerSet, questionnaire: &Questionnaire) -> ScoreResult {
    let mut total_points: u32 = 0;
    let mut max_points: u32 = 0;
    let mut details = EvaluationDetail::new();

    for category in &questionnaire.categories {
        for question in &category.questions {
            let key = composite_key(&category.id, &question.id);
            let Some(option) = answers.get(&key).filter(|option| !option.is_empty()) else {
                continue;
            };

            // One unknown option must not poison the whole computation.
            let points = question.points.get(option).copied().unwrap_or(0);
            let suggestion = question.suggestion.get(option).cloned();

            details.insert(key, DetailEntry { points, suggestion });
            total_points += u32::from(points);
            max_points += u32::from(MAX_POINTS_PER_QUESTION);
        }
    }

    let score = if max_points > 0 {
        round2(f64::from(total_points) / f64::from(max_points) * 100.0)
    } else {
        0.0
    };

    ScoreResult { score, details }
}

/// Round to two decimals, mapping any non-finite intermediate to 0.
pub(crate) fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Round to one decimal, mapping any non-finite intermediate to 0.
pub(crate) fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}
