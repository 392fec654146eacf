use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier of an assessed organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntiteId(pub String);

impl std::fmt::Display for EntiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An organization being assessed; owns zero or more evaluations and belongs
/// to a sector used for peer-group averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entite {
    pub entite_id: EntiteId,
    pub nom: String,
    pub secteur: String,
}

/// Respondent answers keyed by `{category_id}_{question_id}`.
pub type AnswerSet = BTreeMap<String, String>;

/// Scored result for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub points: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Per-question breakdown of one evaluation, keyed like [`AnswerSet`].
pub type EvaluationDetail = BTreeMap<String, DetailEntry>;

/// A stored questionnaire submission. Immutable once written; `details`
/// carries the JSON-encoded [`EvaluationDetail`] exactly as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_id: u64,
    pub entite_id: EntiteId,
    pub evaluateur: String,
    pub date_evaluation: DateTime<Utc>,
    pub score: f64,
    pub details: String,
}

impl Evaluation {
    /// Decode the stored detail payload, falling back to an empty map on
    /// malformed rows.
    pub fn decoded_details(&self) -> EvaluationDetail {
        decode_details(&self.details)
    }
}

/// Fields of an evaluation prior to the repository assigning its id.
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub entite_id: EntiteId,
    pub evaluateur: String,
    pub date_evaluation: DateTime<Utc>,
    pub score: f64,
    pub details: String,
}

/// Strict decode of a JSON-encoded detail map that fails closed: a row that
/// does not parse yields an empty map and a data-quality warning instead of
/// poisoning the read path.
pub fn decode_details(raw: &str) -> EvaluationDetail {
    match serde_json::from_str(raw) {
        Ok(details) => details,
        Err(err) => {
            warn!(error = %err, "malformed evaluation details, substituting empty map");
            EvaluationDetail::new()
        }
    }
}

pub fn encode_details(details: &EvaluationDetail) -> String {
    serde_json::to_string(details).unwrap_or_else(|_| "{}".to_string())
}
