//! Questionnaire definition: an ordered sequence of categories, each holding
//! an ordered sequence of questions with a fixed 0-10 point scale per answer
//! option. Loaded once at startup and treated as immutable for the process
//! lifetime.

mod catalog;

pub use catalog::builtin_questionnaire;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Upper bound for a single question's contribution.
pub const MAX_POINTS_PER_QUESTION: u8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub points: BTreeMap<String, u8>,
    #[serde(default)]
    pub suggestion: BTreeMap<String, String>,
}

impl Questionnaire {
    /// Load and validate a questionnaire from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, QuestionnaireError> {
        let raw = std::fs::read_to_string(path).map_err(|source| QuestionnaireError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let questionnaire: Questionnaire = serde_json::from_str(&raw)?;
        questionnaire.validate()?;
        Ok(questionnaire)
    }

    /// Checks the scale invariant: every option carries a point value and no
    /// point value exceeds the per-question maximum.
    pub fn validate(&self) -> Result<(), QuestionnaireError> {
        for category in &self.categories {
            for question in &category.questions {
                for option in &question.options {
                    match question.points.get(option) {
                        None => {
                            return Err(QuestionnaireError::MissingPoints {
                                key: composite_key(&category.id, &question.id),
                                option: option.clone(),
                            });
                        }
                        Some(points) if *points > MAX_POINTS_PER_QUESTION => {
                            return Err(QuestionnaireError::PointsOutOfRange {
                                key: composite_key(&category.id, &question.id),
                                option: option.clone(),
                                points: *points,
                            });
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        Ok(())
    }

    pub fn question_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.questions.len())
            .sum()
    }

    /// Composite keys of questions that lack a non-empty answer, in
    /// questionnaire order. Empty means the submission is complete.
    pub fn missing_answers(&self, answers: &BTreeMap<String, String>) -> Vec<String> {
        let mut missing = Vec::new();
        for category in &self.categories {
            for question in &category.questions {
                let key = composite_key(&category.id, &question.id);
                let answered = answers
                    .get(&key)
                    .map(|option| !option.is_empty())
                    .unwrap_or(false);
                if !answered {
                    missing.push(key);
                }
            }
        }
        missing
    }
}

/// Key under which a question's answer and detail entry are stored.
pub fn composite_key(category_id: &str, question_id: &str) -> String {
    format!("{category_id}_{question_id}")
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("failed to read questionnaire at {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("questionnaire is not valid JSON")]
    Decode(#[from] serde_json::Error),
    #[error("question {key}: option '{option}' has no point value")]
    MissingPoints { key: String, option: String },
    #[error("question {key}: option '{option}' is worth {points} points, above the 10-point scale")]
    PointsOutOfRange {
        key: String,
        option: String,
        points: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_question(points: &[(&str, u8)]) -> Questionnaire {
        Questionnaire {
            categories: vec![Category {
                id: "gestion_risques".to_string(),
                name: "Gestion des Risques".to_string(),
                questions: vec![Question {
                    id: "q1".to_string(),
                    text: "Disposez-vous d'une cartographie des risques ?".to_string(),
                    options: points.iter().map(|(option, _)| option.to_string()).collect(),
                    points: points
                        .iter()
                        .map(|(option, value)| (option.to_string(), *value))
                        .collect(),
                    suggestion: BTreeMap::new(),
                }],
            }],
        }
    }

    #[test]
    fn validate_accepts_full_point_mapping() {
        let questionnaire = single_question(&[("Oui", 10), ("Partiellement", 5), ("Non", 0)]);
        questionnaire.validate().expect("valid questionnaire");
        assert_eq!(questionnaire.question_count(), 1);
    }

    #[test]
    fn validate_rejects_option_without_points() {
        let mut questionnaire = single_question(&[("Oui", 10)]);
        questionnaire.categories[0].questions[0]
            .options
            .push("Non".to_string());
        let err = questionnaire.validate().expect_err("missing points");
        assert!(matches!(err, QuestionnaireError::MissingPoints { .. }));
    }

    #[test]
    fn validate_rejects_points_above_scale() {
        let questionnaire = single_question(&[("Oui", 11)]);
        let err = questionnaire.validate().expect_err("out of range");
        assert!(matches!(err, QuestionnaireError::PointsOutOfRange { points: 11, .. }));
    }

    #[test]
    fn missing_answers_reports_unanswered_and_blank_keys() {
        let questionnaire = single_question(&[("Oui", 10), ("Non", 0)]);
        let mut answers = BTreeMap::new();
        assert_eq!(questionnaire.missing_answers(&answers), vec!["gestion_risques_q1"]);

        answers.insert("gestion_risques_q1".to_string(), String::new());
        assert_eq!(questionnaire.missing_answers(&answers), vec!["gestion_risques_q1"]);

        answers.insert("gestion_risques_q1".to_string(), "Oui".to_string());
        assert!(questionnaire.missing_answers(&answers).is_empty());
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let questionnaire = builtin_questionnaire();
        questionnaire.validate().expect("catalog is internally consistent");
        assert!(questionnaire.question_count() >= 12);
    }
}
