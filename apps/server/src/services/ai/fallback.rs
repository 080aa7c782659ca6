//! Deterministic answers built without the generative model.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{
    FinancialSummary, GeneratedTemplate, NarrativeSummary, ReportKind, ReportSummary,
    TemplateSection, UnreadableSummary,
};

use super::truncate_chars;

pub const UNEXPECTED_FORMAT_RISK: &str = "Format de réponse inattendu de l'IA";
pub const RETRY_RECOMMENDATION: &str = "Réessayer l'analyse";
pub const UNSPECIFIED_BUDGET: &str = "Non spécifié dans le texte";

const MAX_ITEMS: usize = 5;
const MAX_ITEM_CHARS: usize = 150;
const SUMMARY_SENTENCES: usize = 5;
const SUMMARY_CHARS: usize = 500;
const MIN_SENTENCE_CHARS: usize = 20;

const ACHIEVEMENT_KEYWORDS: &[&str] = &[
    "réalisé", "accompli", "succès", "atteint", "formation", "construit", "installé", "livré",
    "completed", "achieved",
];

const RISK_KEYWORDS: &[&str] = &[
    "risque",
    "problème",
    "défi",
    "retard",
    "difficulté",
    "obstacle",
    "manque",
    "insuffisant",
    "risk",
    "challenge",
    "delay",
];

const WATER_TERMS: &[&str] = &["eau", "water", "assainissement", "sanitation", "hydraulique"];
const HEALTH_TERMS: &[&str] = &["santé", "sante", "health", "médical", "medical", "sanitaire"];
const BUDGET_PREFIXES: &[&str] = &["budget", "financ"];

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\d+[,.]?\d*\s*(EUR|€|euro)").expect("valid amount regex"))
}

/// Fixed answer for documents without extractable text.
pub fn unreadable() -> UnreadableSummary {
    UnreadableSummary {
        summary: "Le document semble vide ou illisible (scan sans texte). L'IA ne peut pas extraire d'informations précises.".to_string(),
        risks: vec!["Document peut-être non-OCRisé".to_string()],
        recommendations: vec![
            "Veuillez soumettre un fichier contenant du texte sélectionnable.".to_string(),
        ],
    }
}

fn words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn section(name: &str, details: &str) -> TemplateSection {
    TemplateSection {
        section: name.to_string(),
        details: details.to_string(),
    }
}

/// Rule-based template derived from keywords in the description.
pub fn template_for(prompt: &str) -> GeneratedTemplate {
    let words = words(prompt);
    let water = WATER_TERMS.iter().any(|t| words.contains(*t));
    let health = HEALTH_TERMS.iter().any(|t| words.contains(*t));
    let budget = words
        .iter()
        .any(|w| BUDGET_PREFIXES.iter().any(|p| w.starts_with(p)));

    let title = if water {
        "Rapport d'avancement - Accès à l'eau et assainissement"
    } else if health {
        "Rapport d'avancement - Santé"
    } else {
        "Rapport d'avancement du projet"
    };

    let mut structure = vec![
        section(
            "Résumé exécutif",
            "Synthèse de la période en quelques phrases",
        ),
        section(
            "Activités réalisées",
            "Activités menées depuis le dernier rapport, avec leurs dates et lieux",
        ),
    ];
    if water {
        structure.push(section(
            "Accès à l'eau et assainissement",
            "Points d'eau construits ou réhabilités, population desservie, qualité de l'eau",
        ));
    }
    if health {
        structure.push(section(
            "Indicateurs sanitaires",
            "Consultations, couverture vaccinale et évolution des indicateurs de santé",
        ));
    }
    if budget {
        structure.push(section(
            "Exécution budgétaire",
            "Dépenses de la période par ligne budgétaire et écarts par rapport au prévisionnel",
        ));
    }
    structure.push(section(
        "Résultats et indicateurs",
        "Valeurs atteintes pour les indicateurs du cadre logique",
    ));
    structure.push(section(
        "Difficultés et risques",
        "Problèmes rencontrés et mesures prises",
    ));
    structure.push(section(
        "Perspectives",
        "Activités prévues pour la prochaine période",
    ));

    let mut instructions =
        "Complétez chaque section de manière factuelle et joignez les pièces justificatives."
            .to_string();
    if water {
        instructions.push_str(" Ajoutez une courte vidéo des ouvrages réalisés.");
    }
    if health {
        instructions.push_str(" Ajoutez un message audio résumant la situation sanitaire.");
    }

    GeneratedTemplate {
        title: title.to_string(),
        instructions,
        structure,
        requires_video: water,
        requires_audio: health,
        requires_text: true,
        text_formats: "PDF, Word".to_string(),
    }
}

fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

fn matching(sentences: &[&str], keywords: &[&str]) -> Vec<String> {
    sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            keywords.iter().any(|k| lower.contains(k))
        })
        .take(MAX_ITEMS)
        .map(|s| truncate_chars(s, MAX_ITEM_CHARS).to_string())
        .collect()
}

fn lead(sentences: &[&str]) -> String {
    let joined = sentences
        .iter()
        .take(SUMMARY_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join(". ");
    format!("{}...", truncate_chars(&joined, SUMMARY_CHARS))
}

/// Keyword-based local analysis of a report.
pub fn analyze(text: &str, kind: ReportKind) -> ReportSummary {
    let sentences = sentences(text);
    let achievements = matching(&sentences, ACHIEVEMENT_KEYWORDS);
    let risks = matching(&sentences, RISK_KEYWORDS);
    let lead = lead(&sentences);

    match kind {
        ReportKind::Financial => {
            let amounts: Vec<&str> = amount_re().find_iter(text).map(|m| m.as_str()).collect();
            let key_figures = if amounts.is_empty() {
                vec!["Aucun montant explicite détecté".to_string()]
            } else {
                amounts
                    .iter()
                    .take(MAX_ITEMS)
                    .map(|a| format!("Montant identifié: {}", a))
                    .collect()
            };

            ReportSummary::Financial(FinancialSummary {
                summary: format!("Analyse locale du rapport financier. {}", lead),
                budget_total_used: amounts
                    .first()
                    .map(|a| (*a).to_string())
                    .unwrap_or_else(|| UNSPECIFIED_BUDGET.to_string()),
                key_figures,
                anomalies: risks,
                recommendations: vec![
                    "Vérifier les montants avec le partenaire".to_string(),
                    "Demander des clarifications si nécessaire".to_string(),
                ],
            })
        }
        ReportKind::Narrative => ReportSummary::Narrative(NarrativeSummary {
            summary: format!("Analyse locale du rapport narratif. {}", lead),
            achievements: if achievements.is_empty() {
                vec!["Informations à extraire manuellement du document".to_string()]
            } else {
                achievements
            },
            risks: if risks.is_empty() {
                vec!["Aucun risque explicite détecté dans le texte".to_string()]
            } else {
                risks
            },
            recommendations: vec![
                "Contacter le partenaire pour plus de détails".to_string(),
                "Vérifier la cohérence avec les rapports précédents".to_string(),
            ],
        }),
    }
}
