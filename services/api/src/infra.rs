use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;

use cyberscore::assessment::{
    Entite, EntiteId, EntiteRepository, Evaluation, EvaluationRepository, NewEvaluation,
    RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory adapter backing both repository traits. Registration is out of
/// scope, so the store ships with a seeded entity directory.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    entites: Mutex<Vec<Entite>>,
    evaluations: Mutex<Vec<Evaluation>>,
    sequence: AtomicU64,
}

impl InMemoryStore {
    pub(crate) fn with_directory() -> Arc<Self> {
        let store = Self::default();
        {
            let mut guard = store.entites.lock().expect("entites mutex poisoned");
            for (id, nom, secteur) in [
                ("alpha", "Alpha Conseil", "finance"),
                ("beta", "Banque Beta", "finance"),
                ("gamma", "Clinique Gamma", "sante"),
                ("delta", "Delta Industries", "industrie"),
                ("epsilon", "Epsilon Retail", "commerce"),
            ] {
                guard.push(Entite {
                    entite_id: EntiteId(id.to_string()),
                    nom: nom.to_string(),
                    secteur: secteur.to_string(),
                });
            }
        }
        Arc::new(store)
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
        let members: Vec<EntiteId> = {
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
            .filter(|evaluation| members.contains(&evaluation.entite_id))
            .cloned()
            .collect())
    }
}
