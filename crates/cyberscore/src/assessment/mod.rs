//! Evaluation submission, scoring, and sector comparison.
//!
//! The scoring engine itself (`scoring`, `domains`, `sector`) is pure and
//! stateless; `service` composes it with the repository and cache
//! abstractions and `router` exposes the HTTP surface.

pub mod cache;
pub mod domain;
pub mod domains;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod sector;
pub mod service;

#[cfg(test)]
mod tests;

pub use cache::{EvaluationCache, NoopCache, TtlCache, DEFAULT_CACHE_TTL};
pub use domain::{
    decode_details, encode_details, AnswerSet, DetailEntry, Entite, EntiteId, Evaluation,
    EvaluationDetail, NewEvaluation,
};
pub use domains::{
    aggregate_by_domain, canonical_domains, Domain, DomainScore, Severity, Suggestion,
};
pub use repository::{EntiteRepository, EvaluationRepository, RepositoryError};
pub use router::evaluation_router;
pub use scoring::{compute, ScoreResult};
pub use sector::{aggregate_sector, SectorAggregate, SectorEvaluation};
pub use service::{EvaluationService, EvaluationServiceError, SubmissionReceipt};
