use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use crate::assessment::cache::{EvaluationCache, NoopCache};
use crate::assessment::domain::{
    encode_details, AnswerSet, DetailEntry, Entite, EntiteId, Evaluation, EvaluationDetail,
    NewEvaluation,
};
use crate::assessment::repository::{EntiteRepository, EvaluationRepository, RepositoryError};
use crate::assessment::service::EvaluationService;
use crate::questionnaire::{builtin_questionnaire, composite_key, Questionnaire};

pub(super) fn entite_id(raw: &str) -> EntiteId {
    EntiteId(raw.to_string())
}

/// Answer every question of the questionnaire with the same option.
pub(super) fn uniform_answers(questionnaire: &Questionnaire, option: &str) -> AnswerSet {
    let mut answers = AnswerSet::new();
    for category in &questionnaire.categories {
        for question in &category.questions {
            answers.insert(
                composite_key(&category.id, &question.id),
                option.to_string(),
            );
        }
    }
    answers
}

pub(super) fn entry(points: u8, suggestion: Option<&str>) -> DetailEntry {
    DetailEntry {
        points,
        suggestion: suggestion.map(str::to_string),
    }
}

pub(super) fn details(entries: &[(&str, u8, Option<&str>)]) -> EvaluationDetail {
    entries
        .iter()
        .map(|(key, points, suggestion)| (key.to_string(), entry(*points, *suggestion)))
        .collect()
}

/// In-memory backing store implementing both repository traits, mirroring
/// the adapters the API service ships.
#[derive(Default)]
pub(super) struct InMemoryStore {
    entites: Mutex<Vec<Entite>>,
    evaluations: Mutex<Vec<Evaluation>>,
    sequence: AtomicU64,
}

impl InMemoryStore {
    pub(super) fn with_entites(entites: &[(&str, &str, &str)]) -> Arc<Self> {
        let store = Self::default();
        {
            let mut guard = store.entites.lock().expect("entites mutex poisoned");
            for (id, nom, secteur) in entites {
                guard.push(Entite {
                    entite_id: entite_id(id),
                    nom: nom.to_string(),
                    secteur: secteur.to_string(),
                });
            }
        }
        Arc::new(store)
    }

    /// Insert a pre-built evaluation row, bypassing the service.
    pub(super) fn seed_evaluation(
        &self,
        entite: &str,
        score: f64,
        details: &EvaluationDetail,
    ) -> Evaluation {
        self.seed_raw(entite, score, &encode_details(details))
    }

    /// Insert a row with an arbitrary (possibly malformed) detail payload.
    pub(super) fn seed_raw(&self, entite: &str, score: f64, details: &str) -> Evaluation {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let evaluation = Evaluation {
            evaluation_id: id,
            entite_id: entite_id(entite),
            evaluateur: "Testeur".to_string(),
            date_evaluation: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single().expect("valid date")
                + chrono::Duration::hours(id as i64),
            score,
            details: details.to_string(),
        };
        self.evaluations
            .lock()
            .expect("evaluations mutex poisoned")
            .push(evaluation.clone());
        evaluation
    }
}

impl EntiteRepository for InMemoryStore {
    fn fetch(&self, id: &EntiteId) -> Result<Option<Entite>, RepositoryError> {
        let guard = self.entites.lock().expect("entites mutex poisoned");
        Ok(guard.iter().find(|entite| &entite.entite_id == id).cloned())
    }

    fn list(&self, excluding: Option<&EntiteId>) -> Result<Vec<Entite>, RepositoryError> {
        let guard = self.entites.lock().expect("entites mutex poisoned");
        let mut entites: Vec<Entite> = guard
            .iter()
            .filter(|entite| excluding != Some(&entite.entite_id))
            .cloned()
            .collect();
        entites.sort_by(|a, b| a.nom.cmp(&b.nom));
        Ok(entites)
    }
}

impl EvaluationRepository for InMemoryStore {
    fn insert(&self, evaluation: NewEvaluation) -> Result<Evaluation, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let stored = Evaluation {
            evaluation_id: id,
            entite_id: evaluation.entite_id,
            evaluateur: evaluation.evaluateur,
            date_evaluation: evaluation.date_evaluation,
            score: evaluation.score,
            details: evaluation.details,
        };
        self.evaluations
            .lock()
            .expect("evaluations mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn latest(&self, entite_id: &EntiteId) -> Result<Option<Evaluation>, RepositoryError> {
        Ok(self.history(entite_id)?.into_iter().next())
    }

    fn history(&self, entite_id: &EntiteId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.evaluations.lock().expect("evaluations mutex poisoned");
        let mut rows: Vec<Evaluation> = guard
            .iter()
            .filter(|evaluation| &evaluation.entite_id == entite_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date_evaluation.cmp(&a.date_evaluation));
        Ok(rows)
    }

    fn for_sector(
        &self,
        secteur: &str,
        excluding: &EntiteId,
    ) -> Result<Vec<Evaluation>, RepositoryError> {
        let sector_members: Vec<EntiteId> = {
            let guard = self.entites.lock().expect("entites mutex poisoned");
            guard
                .iter()
                .filter(|entite| entite.secteur == secteur && &entite.entite_id != excluding)
                .map(|entite| entite.entite_id.clone())
                .collect()
        };

        let guard = self.evaluations.lock().expect("evaluations mutex poisoned");
        Ok(guard
            .iter()
            .filter(|evaluation| sector_members.contains(&evaluation.entite_id))
            .cloned()
            .collect())
    }
}

/// Cache wrapper counting interactions so tests can assert read-through and
/// invalidation behavior.
#[derive(Default)]
pub(super) struct RecordingCache {
    inner: Mutex<BTreeMap<String, Vec<Evaluation>>>,
    pub(super) hits: AtomicUsize,
    pub(super) misses: AtomicUsize,
    pub(super) invalidations: AtomicUsize,
}

impl EvaluationCache for RecordingCache {
    fn get(&self, key: &str) -> Option<Vec<Evaluation>> {
        let guard = self.inner.lock().expect("cache mutex poisoned");
        match guard.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn set(&self, key: &str, value: Vec<Evaluation>, _ttl: Duration) {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.insert(key.to_string(), value);
    }

    fn invalidate(&self, key: &str) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.remove(key);
    }
}

pub(super) type TestService<C> = EvaluationService<InMemoryStore, InMemoryStore, C>;

pub(super) fn seeded_store() -> Arc<InMemoryStore> {
    InMemoryStore::with_entites(&[
        ("ent-1", "Alpha Conseil", "finance"),
        ("ent-2", "Banque Beta", "finance"),
        ("ent-3", "Clinique Gamma", "sante"),
    ])
}

pub(super) fn service_with_store(store: Arc<InMemoryStore>) -> Arc<TestService<NoopCache>> {
    Arc::new(EvaluationService::new(
        store.clone(),
        store,
        Arc::new(NoopCache),
        Arc::new(builtin_questionnaire()),
    ))
}

pub(super) fn service_with_cache(
    store: Arc<InMemoryStore>,
    cache: Arc<RecordingCache>,
) -> Arc<TestService<RecordingCache>> {
    Arc::new(EvaluationService::new(
        store.clone(),
        store,
        cache,
        Arc::new(builtin_questionnaire()),
    ))
}
