//! Domain aggregator: buckets per-question results into named security
//! domains by composite-key prefix and reduces each bucket to a percentage
//! plus its improvement suggestions.

use serde::Serialize;

use super::domain::EvaluationDetail;
use super::scoring::round1;
use crate::questionnaire::MAX_POINTS_PER_QUESTION;

/// A named grouping of questions, matched by the `{id}_q*` key prefix.
///
/// This prefix rule over the six-domain taxonomy is the canonical matching
/// convention; the historical substring matching against a wider label set
/// is deprecated and intentionally not supported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub id: &'static str,
    pub label: &'static str,
}

impl Domain {
    fn matches(&self, key: &str) -> bool {
        key.strip_prefix(self.id)
            .is_some_and(|rest| rest.starts_with("_q"))
    }
}

const CANONICAL_DOMAINS: [Domain; 6] = [
    Domain { id: "leadership_gouvernance", label: "Leadership & Gouvernance" },
    Domain { id: "organisation_securite", label: "Organisation Sécurité" },
    Domain { id: "gestion_risques", label: "Gestion des Risques" },
    Domain { id: "securite_rh", label: "Sécurité RH" },
    Domain { id: "gestion_actifs", label: "Gestion des actifs" },
    Domain { id: "gestion_acces", label: "Gestion des Accès" },
];

/// The canonical six-domain taxonomy used for radar views and sector
/// comparison.
pub fn canonical_domains() -> &'static [Domain] {
    &CANONICAL_DOMAINS
}

/// Urgency of an improvement suggestion, derived from the question's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    fn for_points(points: u8) -> Self {
        if points < 5 {
            Severity::High
        } else if points < 8 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub severity: Severity,
}

/// Aggregate result for one domain. A domain with no matched question still
/// produces a slot (`percentage` 0, `has_data` false) so radar charts stay
/// complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScore {
    pub domain_id: &'static str,
    pub label: &'static str,
    pub percentage: f64,
    pub has_data: bool,
    pub suggestions: Vec<Suggestion>,
}

/// Reduce one evaluation's details to per-domain percentages and
/// suggestions. Suggestion order follows the iteration order of `details`.
pub fn aggregate_by_domain(details: &EvaluationDetail, domains: &[Domain]) -> Vec<DomainScore> {
    domains
        .iter()
        .map(|domain| {
            let mut total_points: u32 = 0;
            let mut count: u32 = 0;
            let mut suggestions = Vec::new();

            for (key, entry) in details {
                if !domain.matches(key) {
                    continue;
                }
                total_points += u32::from(entry.points);
                count += 1;

                if let Some(text) = entry
                    .suggestion
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                {
                    suggestions.push(Suggestion {
                        text: text.to_string(),
                        severity: Severity::for_points(entry.points),
                    });
                }
            }

            let percentage = domain_percentage_from(total_points, count).unwrap_or(0.0);

            DomainScore {
                domain_id: domain.id,
                label: domain.label,
                percentage,
                has_data: count > 0,
                suggestions,
            }
        })
        .collect()
}

/// Percentage for one domain within one evaluation, or `None` when the
/// domain has no matched question (the caller decides whether that means
/// zero or exclusion from an average).
pub(crate) fn domain_percentage(details: &EvaluationDetail, domain: &Domain) -> Option<f64> {
    let mut total_points: u32 = 0;
    let mut count: u32 = 0;
    for (key, entry) in details {
        if domain.matches(key) {
            total_points += u32::from(entry.points);
            count += 1;
        }
    }
    domain_percentage_from(total_points, count)
}

fn domain_percentage_from(total_points: u32, count: u32) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let max = count * u32::from(MAX_POINTS_PER_QUESTION);
    Some(round1(f64::from(total_points) / f64::from(max) * 100.0))
}
