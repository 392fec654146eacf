use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;

use crate::cli::ScoreArgs;
use crate::infra::InMemoryStore;
use cyberscore::assessment::{
    aggregate_by_domain, canonical_domains, compute, AnswerSet, EntiteId, EvaluationService,
    NoopCache,
};
use cyberscore::error::AppError;
use cyberscore::questionnaire::{builtin_questionnaire, composite_key, Questionnaire};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Entity requesting the sector comparison
    #[arg(long, default_value = "alpha")]
    pub(crate) entite: String,
    /// Sector to compare against
    #[arg(long, default_value = "finance")]
    pub(crate) secteur: String,
}

fn load_questionnaire(path: Option<&std::path::Path>) -> Result<Questionnaire, AppError> {
    match path {
        Some(path) => Ok(Questionnaire::from_path(path)?),
        None => Ok(builtin_questionnaire()),
    }
}

/// Score an answer file and print the per-domain breakdown without touching
/// any store.
pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let questionnaire = load_questionnaire(args.questionnaire.as_deref())?;

    let raw = std::fs::read_to_string(&args.answers)?;
    let answers: AnswerSet = serde_json::from_str(&raw).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("answers file is not a JSON object of strings: {err}"),
        )
    })?;

    let missing = questionnaire.missing_answers(&answers);
    if !missing.is_empty() {
        println!(
            "Attention: {} question(s) sans réponse (score partiel)",
            missing.len()
        );
    }

    let result = compute(&answers, &questionnaire);
    println!("Score global: {:.2}/100", result.score);
    println!();

    for domain in aggregate_by_domain(&result.details, canonical_domains()) {
        if domain.has_data {
            println!("  {:<32} {:>5.1}%", domain.label, domain.percentage);
        } else {
            println!("  {:<32}   sans données", domain.label);
        }
        for suggestion in &domain.suggestions {
            println!("      [{:?}] {}", suggestion.severity, suggestion.text);
        }
    }

    Ok(())
}

fn answers_with(questionnaire: &Questionnaire, option: &str) -> AnswerSet {
    let mut answers = BTreeMap::new();
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

/// Seed the in-memory directory, submit a few evaluations, and print the
/// radar breakdown plus a sector comparison.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let questionnaire = builtin_questionnaire();
    let store = InMemoryStore::with_directory();
    let service = EvaluationService::new(
        store.clone(),
        store,
        Arc::new(NoopCache),
        Arc::new(questionnaire.clone()),
    );

    for (entite, option) in [
        ("alpha", "Partiellement"),
        ("beta", "Oui"),
        ("gamma", "Non"),
        ("delta", "Partiellement"),
    ] {
        let receipt = service.submit(
            &EntiteId(entite.to_string()),
            "Démo",
            &answers_with(&questionnaire, option),
        )?;
        println!("{entite}: évaluation enregistrée, score {:.2}", receipt.score);
    }
    println!();

    let requester = EntiteId(args.entite.clone());
    let breakdown = service.domain_breakdown(&requester)?;
    println!("Radar de {}:", args.entite);
    for domain in &breakdown {
        println!("  {:<32} {:>5.1}%", domain.label, domain.percentage);
    }
    println!();

    let comparison = service.compare_sector(&requester, &args.secteur)?;
    println!(
        "Secteur {} ({} évaluation(s)), score moyen {:.1}:",
        comparison.compared_sector.name,
        comparison.compared_sector.evaluation_count,
        comparison.compared_sector.average_score,
    );
    for (domain_id, percentage) in &comparison.compared_sector.data {
        println!("  {:<32} {:>5.1}%", domain_id, percentage);
    }

    Ok(())
}
