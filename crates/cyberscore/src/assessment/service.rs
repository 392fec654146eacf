use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::questionnaire::Questionnaire;

use super::cache::{history_cache_key, EvaluationCache, DEFAULT_CACHE_TTL};
use super::domain::{
    encode_details, AnswerSet, Entite, EntiteId, Evaluation, EvaluationDetail, NewEvaluation,
};
use super::domains::{aggregate_by_domain, canonical_domains, DomainScore};
use super::repository::{EntiteRepository, EvaluationRepository, RepositoryError};
use super::scoring::{compute, round2};
use super::sector::{aggregate_sector, SectorEvaluation};

/// Number of recent history points returned alongside a direct comparison.
const COMPARISON_HISTORY_LIMIT: usize = 6;

/// Service composing the scoring engine with the repository and cache
/// abstractions. All state lives behind the injected traits.
pub struct EvaluationService<E, V, C> {
    entites: Arc<E>,
    evaluations: Arc<V>,
    cache: Arc<C>,
    questionnaire: Arc<Questionnaire>,
    cache_ttl: Duration,
}

impl<E, V, C> EvaluationService<E, V, C>
where
    E: EntiteRepository + 'static,
    V: EvaluationRepository + 'static,
    C: EvaluationCache + 'static,
{
    pub fn new(
        entites: Arc<E>,
        evaluations: Arc<V>,
        cache: Arc<C>,
        questionnaire: Arc<Questionnaire>,
    ) -> Self {
        Self {
            entites,
            evaluations,
            cache,
            questionnaire,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// Score and persist a complete submission.
    ///
    /// The score is recomputed server-side from the raw answers; a
    /// client-supplied score is never trusted. Incomplete submissions are
    /// rejected with the list of unanswered question keys.
    pub fn submit(
        &self,
        entite_id: &EntiteId,
        evaluateur: &str,
        answers: &AnswerSet,
    ) -> Result<SubmissionReceipt, EvaluationServiceError> {
        self.entites
            .fetch(entite_id)?
            .ok_or(EvaluationServiceError::EntityNotFound)?;

        let missing = self.questionnaire.missing_answers(answers);
        if !missing.is_empty() {
            return Err(EvaluationServiceError::IncompleteSubmission { missing });
        }

        let result = compute(answers, &self.questionnaire);
        let stored = self.evaluations.insert(NewEvaluation {
            entite_id: entite_id.clone(),
            evaluateur: evaluateur.to_string(),
            date_evaluation: Utc::now(),
            score: result.score,
            details: encode_details(&result.details),
        })?;

        self.cache.invalidate(&history_cache_key(entite_id));

        info!(entite = %entite_id, score = stored.score, "evaluation recorded");

        Ok(SubmissionReceipt {
            evaluation_id: stored.evaluation_id,
            score: stored.score,
        })
    }

    /// Most recent evaluation with its decoded details.
    pub fn latest(&self, entite_id: &EntiteId) -> Result<EvaluationView, EvaluationServiceError> {
        let evaluation = self
            .evaluations
            .latest(entite_id)?
            .ok_or(EvaluationServiceError::NoEvaluation)?;
        Ok(EvaluationView::from_evaluation(&evaluation))
    }

    /// Newest-first page of the evaluation history.
    pub fn history(
        &self,
        entite_id: &EntiteId,
        page: usize,
        limit: usize,
    ) -> Result<HistoryPage, EvaluationServiceError> {
        let evaluations = self.cached_history(entite_id)?;
        let limit = limit.max(1);
        let page = page.max(1);
        let total = evaluations.len();
        let total_pages = total.div_ceil(limit);

        let data = evaluations
            .iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(HistoryEntry::from_evaluation)
            .collect();

        Ok(HistoryPage {
            data,
            pagination: Pagination {
                total,
                page,
                limit,
                total_pages,
            },
        })
    }

    /// Full history with decoded details, newest first.
    pub fn history_details(
        &self,
        entite_id: &EntiteId,
    ) -> Result<Vec<EvaluationView>, EvaluationServiceError> {
        let evaluations = self.cached_history(entite_id)?;
        Ok(evaluations
            .iter()
            .map(EvaluationView::from_evaluation)
            .collect())
    }

    /// Aggregate statistics over an entity's evaluations.
    pub fn stats(&self, entite_id: &EntiteId) -> Result<StatsView, EvaluationServiceError> {
        let evaluations = self.cached_history(entite_id)?;
        let nombre = evaluations.len();
        if nombre == 0 {
            return Ok(StatsView::default());
        }

        let total: f64 = evaluations.iter().map(|evaluation| evaluation.score).sum();
        let minimum = evaluations
            .iter()
            .map(|evaluation| evaluation.score)
            .fold(f64::INFINITY, f64::min);
        let maximum = evaluations
            .iter()
            .map(|evaluation| evaluation.score)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(StatsView {
            nombre,
            moyenne: round2(total / nombre as f64),
            minimum,
            maximum,
            premiere_evaluation: evaluations
                .iter()
                .map(|evaluation| evaluation.date_evaluation)
                .min(),
            derniere_evaluation: evaluations
                .iter()
                .map(|evaluation| evaluation.date_evaluation)
                .max(),
        })
    }

    /// Latest evaluation reduced to per-domain percentages for the radar
    /// view.
    pub fn domain_breakdown(
        &self,
        entite_id: &EntiteId,
    ) -> Result<Vec<DomainScore>, EvaluationServiceError> {
        let evaluation = self
            .evaluations
            .latest(entite_id)?
            .ok_or(EvaluationServiceError::NoEvaluation)?;
        Ok(aggregate_by_domain(
            &evaluation.decoded_details(),
            canonical_domains(),
        ))
    }

    /// Direct comparison between two entities' latest evaluations.
    ///
    /// Self-comparison is invalid input and is rejected before any data is
    /// fetched.
    pub fn compare(
        &self,
        entite_id: &EntiteId,
        other_id: &EntiteId,
    ) -> Result<DirectComparisonView, EvaluationServiceError> {
        if entite_id == other_id {
            return Err(EvaluationServiceError::SameEntity);
        }

        let current = self
            .entites
            .fetch(entite_id)?
            .ok_or(EvaluationServiceError::EntityNotFound)?;
        let other = self
            .entites
            .fetch(other_id)?
            .ok_or(EvaluationServiceError::EntityNotFound)?;

        let current_eval = self.evaluations.latest(entite_id)?;
        let other_eval = self.evaluations.latest(other_id)?;
        let (Some(current_eval), Some(other_eval)) = (current_eval, other_eval) else {
            return Err(EvaluationServiceError::MissingEvaluations);
        };

        let current_history = self.recent_history(entite_id)?;
        let compared_history = self.recent_history(other_id)?;

        Ok(DirectComparisonView {
            current_entite: ComparisonSide::build(&current, &current_eval),
            compared_entite: ComparisonSide::build(&other, &other_eval),
            current_history,
            compared_history,
        })
    }

    /// Compare an entity's latest evaluation against its sector's averages.
    ///
    /// The sector pool excludes the requesting entity's own evaluations; an
    /// entity without any evaluation cannot request a comparison.
    pub fn compare_sector(
        &self,
        entite_id: &EntiteId,
        secteur: &str,
    ) -> Result<SectorComparisonView, EvaluationServiceError> {
        let entite = self
            .entites
            .fetch(entite_id)?
            .ok_or(EvaluationServiceError::EntityNotFound)?;

        let latest = self
            .evaluations
            .latest(entite_id)?
            .ok_or(EvaluationServiceError::NoEntityData)?;

        let pool: Vec<SectorEvaluation> = self
            .evaluations
            .for_sector(secteur, entite_id)?
            .iter()
            .map(|evaluation| SectorEvaluation {
                score: Some(evaluation.score).filter(|score| score.is_finite()),
                details: evaluation.decoded_details(),
            })
            .collect();

        let aggregate = aggregate_sector(&pool, canonical_domains());

        let current_data = aggregate_by_domain(&latest.decoded_details(), canonical_domains())
            .into_iter()
            .map(|score| (score.domain_id, score.percentage))
            .collect();

        Ok(SectorComparisonView {
            current_entite: CurrentEntiteView {
                id: entite.entite_id.clone(),
                name: entite.nom.clone(),
                latest_score: latest.score,
                latest_date: latest.date_evaluation,
                data: current_data,
            },
            compared_sector: ComparedSectorView {
                name: secteur.to_string(),
                evaluation_count: aggregate.evaluation_count,
                average_score: aggregate.average_score,
                data: aggregate.domains,
            },
        })
    }

    /// All entities ordered by name, minus the requester.
    pub fn entites(
        &self,
        excluding: Option<&EntiteId>,
    ) -> Result<Vec<Entite>, EvaluationServiceError> {
        Ok(self.entites.list(excluding)?)
    }

    pub fn entite(&self, entite_id: &EntiteId) -> Result<Entite, EvaluationServiceError> {
        self.entites
            .fetch(entite_id)?
            .ok_or(EvaluationServiceError::EntityNotFound)
    }

    fn cached_history(
        &self,
        entite_id: &EntiteId,
    ) -> Result<Vec<Evaluation>, EvaluationServiceError> {
        let key = history_cache_key(entite_id);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let evaluations = self.evaluations.history(entite_id)?;
        self.cache.set(&key, evaluations.clone(), self.cache_ttl);
        Ok(evaluations)
    }

    fn recent_history(
        &self,
        entite_id: &EntiteId,
    ) -> Result<Vec<HistoryEntry>, EvaluationServiceError> {
        Ok(self
            .evaluations
            .history(entite_id)?
            .iter()
            .take(COMPARISON_HISTORY_LIMIT)
            .map(HistoryEntry::from_evaluation)
            .collect())
    }
}

/// Error raised by the evaluation service, carrying the stable error code
/// exposed on the wire.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("submission is missing answers for {} question(s)", missing.len())]
    IncompleteSubmission { missing: Vec<String> },
    #[error("an entity cannot be compared with itself")]
    SameEntity,
    #[error("entity not found")]
    EntityNotFound,
    #[error("no evaluation found for this entity")]
    NoEvaluation,
    #[error("no evaluation data found for the requesting entity")]
    NoEntityData,
    #[error("both entities must have at least one evaluation")]
    MissingEvaluations,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl EvaluationServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::IncompleteSubmission { .. } => "INVALID_INPUT",
            Self::SameEntity => "SAME_ENTITY",
            Self::EntityNotFound => "ENTITY_NOT_FOUND",
            Self::NoEvaluation => "NO_EVALUATION",
            Self::NoEntityData => "NO_ENTITY_DATA",
            Self::MissingEvaluations => "MISSING_EVALUATIONS",
            Self::Repository(_) => "SERVER_ERROR",
        }
    }
}

/// Acknowledgement returned for a stored submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub evaluation_id: u64,
    pub score: f64,
}

/// An evaluation with its decoded detail map, as served on read paths.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub evaluation_id: u64,
    pub entite_id: EntiteId,
    pub evaluateur: String,
    pub date_evaluation: DateTime<Utc>,
    pub score: f64,
    pub details: EvaluationDetail,
}

impl EvaluationView {
    fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self {
            evaluation_id: evaluation.evaluation_id,
            entite_id: evaluation.entite_id.clone(),
            evaluateur: evaluation.evaluateur.clone(),
            date_evaluation: evaluation.date_evaluation,
            score: evaluation.score,
            details: evaluation.decoded_details(),
        }
    }
}

/// Summary row for history listings; details stay out of the page payload.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub evaluation_id: u64,
    pub date_evaluation: DateTime<Utc>,
    pub score: f64,
    pub evaluateur: String,
}

impl HistoryEntry {
    fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self {
            evaluation_id: evaluation.evaluation_id,
            date_evaluation: evaluation.date_evaluation,
            score: evaluation.score,
            evaluateur: evaluation.evaluateur.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub data: Vec<HistoryEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsView {
    pub nombre: usize,
    pub moyenne: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub premiere_evaluation: Option<DateTime<Utc>>,
    pub derniere_evaluation: Option<DateTime<Utc>>,
}

/// One side of a direct entity-to-entity comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSide {
    pub id: EntiteId,
    pub name: String,
    pub data: EvaluationDetail,
    #[serde(rename = "latestScore")]
    pub latest_score: f64,
    #[serde(rename = "latestDate")]
    pub latest_date: DateTime<Utc>,
}

impl ComparisonSide {
    fn build(entite: &Entite, evaluation: &Evaluation) -> Self {
        Self {
            id: entite.entite_id.clone(),
            name: entite.nom.clone(),
            data: evaluation.decoded_details(),
            latest_score: evaluation.score,
            latest_date: evaluation.date_evaluation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectComparisonView {
    #[serde(rename = "currentEntite")]
    pub current_entite: ComparisonSide,
    #[serde(rename = "comparedEntite")]
    pub compared_entite: ComparisonSide,
    #[serde(rename = "currentHistory")]
    pub current_history: Vec<HistoryEntry>,
    #[serde(rename = "comparedHistory")]
    pub compared_history: Vec<HistoryEntry>,
}

/// Requesting entity's side of a sector comparison: latest score plus its
/// per-domain percentages.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentEntiteView {
    pub id: EntiteId,
    pub name: String,
    #[serde(rename = "latestScore")]
    pub latest_score: f64,
    #[serde(rename = "latestDate")]
    pub latest_date: DateTime<Utc>,
    pub data: std::collections::BTreeMap<&'static str, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparedSectorView {
    pub name: String,
    #[serde(rename = "evaluationCount")]
    pub evaluation_count: usize,
    #[serde(rename = "averageScore")]
    pub average_score: f64,
    pub data: std::collections::BTreeMap<&'static str, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorComparisonView {
    #[serde(rename = "currentEntite")]
    pub current_entite: CurrentEntiteView,
    #[serde(rename = "comparedSector")]
    pub compared_sector: ComparedSectorView,
}
