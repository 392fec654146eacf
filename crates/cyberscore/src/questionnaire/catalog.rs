//! Built-in questionnaire catalog, used when no external definition is
//! configured. Category ids line up with the canonical domain taxonomy so
//! composite keys match the `{domain_id}_q*` prefix rule.

use std::collections::BTreeMap;

use super::{Category, Question, Questionnaire};

struct QuestionSpec {
    id: &'static str,
    text: &'static str,
    partial_hint: &'static str,
    missing_hint: &'static str,
}

fn question(spec: QuestionSpec) -> Question {
    let options = vec![
        "Oui".to_string(),
        "Partiellement".to_string(),
        "Non".to_string(),
    ];

    let mut points = BTreeMap::new();
    points.insert("Oui".to_string(), 10);
    points.insert("Partiellement".to_string(), 5);
    points.insert("Non".to_string(), 0);

    let mut suggestion = BTreeMap::new();
    suggestion.insert("Partiellement".to_string(), spec.partial_hint.to_string());
    suggestion.insert("Non".to_string(), spec.missing_hint.to_string());

    Question {
        id: spec.id.to_string(),
        text: spec.text.to_string(),
        options,
        points,
        suggestion,
    }
}

fn category(id: &str, name: &str, questions: Vec<QuestionSpec>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        questions: questions.into_iter().map(question).collect(),
    }
}

/// Default questionnaire: two questions per canonical security domain on the
/// shared Oui/Partiellement/Non scale.
pub fn builtin_questionnaire() -> Questionnaire {
    Questionnaire {
        categories: vec![
            category(
                "leadership_gouvernance",
                "Leadership & Gouvernance",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "La direction a-t-elle formalisé une politique de sécurité de l'information ?",
                        partial_hint: "Faire valider et diffuser la politique de sécurité par la direction.",
                        missing_hint: "Rédiger une politique de sécurité de l'information et la faire approuver par la direction.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Un budget dédié à la sécurité est-il revu chaque année ?",
                        partial_hint: "Inscrire la revue du budget sécurité au cycle budgétaire annuel.",
                        missing_hint: "Allouer un budget dédié à la sécurité et le revoir annuellement.",
                    },
                ],
            ),
            category(
                "organisation_securite",
                "Organisation Sécurité",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "Les rôles et responsabilités en matière de sécurité sont-ils définis ?",
                        partial_hint: "Compléter la matrice des responsabilités sécurité pour toutes les équipes.",
                        missing_hint: "Définir et documenter les rôles et responsabilités sécurité.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Un responsable de la sécurité des systèmes d'information est-il désigné ?",
                        partial_hint: "Formaliser la lettre de mission du responsable sécurité.",
                        missing_hint: "Désigner un responsable de la sécurité des systèmes d'information.",
                    },
                ],
            ),
            category(
                "gestion_risques",
                "Gestion des Risques",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "Disposez-vous d'une cartographie des risques à jour ?",
                        partial_hint: "Mettre à jour la cartographie des risques au moins une fois par an.",
                        missing_hint: "Établir une cartographie des risques couvrant les actifs critiques.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Les risques identifiés font-ils l'objet d'un plan de traitement suivi ?",
                        partial_hint: "Suivre l'avancement du plan de traitement des risques en comité.",
                        missing_hint: "Définir un plan de traitement pour chaque risque majeur identifié.",
                    },
                ],
            ),
            category(
                "securite_rh",
                "Sécurité RH",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "Les collaborateurs suivent-ils une sensibilisation à la sécurité ?",
                        partial_hint: "Étendre la sensibilisation sécurité à l'ensemble des collaborateurs.",
                        missing_hint: "Mettre en place un programme de sensibilisation à la sécurité.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Les départs de collaborateurs déclenchent-ils une revocation des accès ?",
                        partial_hint: "Automatiser la révocation des accès lors des départs.",
                        missing_hint: "Intégrer la révocation des accès au processus de départ.",
                    },
                ],
            ),
            category(
                "gestion_actifs",
                "Gestion des actifs",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "Tenez-vous un inventaire des actifs informationnels ?",
                        partial_hint: "Compléter l'inventaire des actifs et le maintenir à jour.",
                        missing_hint: "Constituer un inventaire des actifs informationnels.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Les actifs sont-ils classifiés selon leur sensibilité ?",
                        partial_hint: "Appliquer la classification à l'ensemble des actifs inventoriés.",
                        missing_hint: "Définir un schéma de classification des actifs par sensibilité.",
                    },
                ],
            ),
            category(
                "gestion_acces",
                "Gestion des Accès",
                vec![
                    QuestionSpec {
                        id: "q1",
                        text: "Les droits d'accès sont-ils attribués selon le principe du moindre privilège ?",
                        partial_hint: "Revoir les droits existants pour les aligner sur le moindre privilège.",
                        missing_hint: "Mettre en place une attribution des droits fondée sur le moindre privilège.",
                    },
                    QuestionSpec {
                        id: "q2",
                        text: "Les comptes à privilèges font-ils l'objet d'une revue périodique ?",
                        partial_hint: "Planifier une revue trimestrielle des comptes à privilèges.",
                        missing_hint: "Recenser les comptes à privilèges et instaurer leur revue périodique.",
                    },
                ],
            ),
        ],
    }
}
