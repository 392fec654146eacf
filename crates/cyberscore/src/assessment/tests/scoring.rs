use std::collections::BTreeMap;

use super::common::uniform_answers;
use crate::assessment::scoring::compute;
use crate::questionnaire::{builtin_questionnaire, Category, Question, Questionnaire};

fn two_question_questionnaire() -> Questionnaire {
    let mut points = BTreeMap::new();
    points.insert("Oui".to_string(), 10);
    points.insert("Partiellement".to_string(), 5);
    points.insert("Non".to_string(), 0);

    let question = |id: &str| Question {
        id: id.to_string(),
        text: format!("Question {id}"),
        options: vec![
            "Oui".to_string(),
            "Partiellement".to_string(),
            "Non".to_string(),
        ],
        points: points.clone(),
        suggestion: BTreeMap::new(),
    };

    Questionnaire {
        categories: vec![Category {
            id: "gestion_risques".to_string(),
            name: "Gestion des Risques".to_string(),
            questions: vec![question("q1"), question("q2")],
        }],
    }
}

#[test]
fn mixed_answers_give_two_decimal_score() {
    let questionnaire = two_question_questionnaire();
    let mut answers = BTreeMap::new();
    answers.insert("gestion_risques_q1".to_string(), "Oui".to_string());
    answers.insert("gestion_risques_q2".to_string(), "Partiellement".to_string());

    let result = compute(&answers, &questionnaire);

    assert_eq!(result.score, 75.00);
    assert_eq!(result.details.len(), 2);
    assert_eq!(result.details["gestion_risques_q1"].points, 10);
    assert_eq!(result.details["gestion_risques_q2"].points, 5);
}

#[test]
fn all_maximum_answers_score_one_hundred() {
    let questionnaire = builtin_questionnaire();
    let answers = uniform_answers(&questionnaire, "Oui");

    let result = compute(&answers, &questionnaire);

    assert_eq!(result.score, 100.0);
    assert_eq!(result.details.len(), questionnaire.question_count());
}

#[test]
fn all_minimum_answers_score_zero() {
    let questionnaire = builtin_questionnaire();
    let answers = uniform_answers(&questionnaire, "Non");

    let result = compute(&answers, &questionnaire);

    assert_eq!(result.score, 0.0);
}

#[test]
fn score_stays_within_bounds_for_any_valid_answer_set() {
    let questionnaire = builtin_questionnaire();
    for option in ["Oui", "Partiellement", "Non"] {
        let result = compute(&uniform_answers(&questionnaire, option), &questionnaire);
        assert!(result.score >= 0.0 && result.score <= 100.0, "option {option}");
        assert!(result.score.is_finite());
    }
}

#[test]
fn unanswered_question_is_omitted_and_shrinks_the_denominator() {
    let questionnaire = two_question_questionnaire();
    let mut answers = BTreeMap::new();
    answers.insert("gestion_risques_q1".to_string(), "Oui".to_string());

    let result = compute(&answers, &questionnaire);

    // Only one question contributes: 10/10 instead of 15/20.
    assert_eq!(result.score, 100.0);
    assert_eq!(result.details.len(), 1);
    assert!(result.details.contains_key("gestion_risques_q1"));
    assert!(!result.details.contains_key("gestion_risques_q2"));
}

#[test]
fn blank_answer_counts_as_unanswered() {
    let questionnaire = two_question_questionnaire();
    let mut answers = BTreeMap::new();
    answers.insert("gestion_risques_q1".to_string(), "Oui".to_string());
    answers.insert("gestion_risques_q2".to_string(), String::new());

    let result = compute(&answers, &questionnaire);

    assert_eq!(result.score, 100.0);
    assert_eq!(result.details.len(), 1);
}

#[test]
fn unrecognized_option_defaults_to_zero_points_without_failing() {
    let questionnaire = two_question_questionnaire();
    let mut answers = BTreeMap::new();
    answers.insert("gestion_risques_q1".to_string(), "Oui".to_string());
    answers.insert("gestion_risques_q2".to_string(), "Peut-être".to_string());

    let result = compute(&answers, &questionnaire);

    // The bad answer contributes 0 points but still raises the maximum.
    assert_eq!(result.score, 50.0);
    assert_eq!(result.details["gestion_risques_q2"].points, 0);
}

#[test]
fn empty_answer_set_scores_zero_not_nan() {
    let questionnaire = two_question_questionnaire();
    let result = compute(&BTreeMap::new(), &questionnaire);

    assert_eq!(result.score, 0.0);
    assert!(result.details.is_empty());
}

#[test]
fn suggestions_follow_the_chosen_option() {
    let questionnaire = builtin_questionnaire();
    let answers = uniform_answers(&questionnaire, "Partiellement");

    let result = compute(&answers, &questionnaire);

    assert!(result
        .details
        .values()
        .all(|entry| entry.suggestion.is_some()));

    let best = compute(&uniform_answers(&questionnaire, "Oui"), &questionnaire);
    assert!(best.details.values().all(|entry| entry.suggestion.is_none()));
}
