//! Sector aggregator: cross-entity averaging of domain percentages and
//! overall scores. Ephemeral, computed per request, never persisted.

use std::collections::BTreeMap;

use super::domain::EvaluationDetail;
use super::domains::{domain_percentage, Domain};
use super::scoring::round1;

/// One qualifying evaluation in the sector pool.
#[derive(Debug, Clone)]
pub struct SectorEvaluation {
    /// Top-level stored score; historical rows may lack one.
    pub score: Option<f64>,
    pub details: EvaluationDetail,
}

/// Sector-wide averages over the qualifying pool.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorAggregate {
    /// Number of evaluations that contributed to the overall average.
    pub evaluation_count: usize,
    /// Mean of top-level scores, one decimal; 0 when no evaluation has one.
    pub average_score: f64,
    /// Per-domain mean of per-evaluation domain percentages, one decimal;
    /// 0 for a domain no evaluation matched.
    pub domains: BTreeMap<&'static str, f64>,
}

/// Average the sector pool per domain and overall.
///
/// An evaluation with zero matched questions for a domain contributes
/// nothing to that domain's mean: it is excluded from the denominator, not
/// counted as zero. All outputs are finite.
pub fn aggregate_sector(evaluations: &[SectorEvaluation], domains: &[Domain]) -> SectorAggregate {
    let mut domain_totals: BTreeMap<&'static str, (f64, u32)> = BTreeMap::new();
    let mut total_score = 0.0;
    let mut score_count = 0usize;

    for evaluation in evaluations {
        for domain in domains {
            if let Some(percentage) = domain_percentage(&evaluation.details, domain) {
                let slot = domain_totals.entry(domain.id).or_insert((0.0, 0));
                slot.0 += percentage;
                slot.1 += 1;
            }
        }

        if let Some(score) = evaluation.score.filter(|score| score.is_finite()) {
            total_score += score;
            score_count += 1;
        }
    }

    let domains = domains
        .iter()
        .map(|domain| {
            let average = match domain_totals.get(domain.id) {
                Some((total, count)) if *count > 0 => round1(total / f64::from(*count)),
                _ => 0.0,
            };
            (domain.id, average)
        })
        .collect();

    let average_score = if score_count > 0 {
        round1(total_score / score_count as f64)
    } else {
        0.0
    };

    SectorAggregate {
        evaluation_count: score_count,
        average_score,
        domains,
    }
}
