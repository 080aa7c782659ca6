//! Prompt texts sent to the generative model.

use crate::models::ReportKind;

pub fn template(description: &str) -> String {
    format!(
        r#"Tu es expert en gestion de projets de coopération au développement.
Propose un modèle de rapport que les partenaires terrain devront remplir, à partir de la description suivante : "{description}"

Réponds uniquement avec un objet JSON de la forme :
{{
  "title": "titre court et professionnel",
  "instructions": "consignes claires pour le partenaire",
  "structure": [{{"section": "nom de la section", "details": "contenu attendu"}}],
  "requires_video": false,
  "requires_audio": false,
  "requires_text": true,
  "text_formats": "PDF, Word"
}}

Les textes doivent être rédigés en français."#
    )
}

fn narrative_instructions() -> &'static str {
    r#"Il s'agit d'un rapport NARRATIF.
Repère les activités, les résultats et les difficultés décrits dans le texte, sans rien inventer.
Réponds uniquement avec un objet JSON de la forme :
{
  "summary": "résumé en 3 à 5 phrases",
  "achievements": ["au plus 5 réalisations citées dans le texte"],
  "risks": ["au plus 5 difficultés ou risques cités dans le texte"],
  "recommendations": ["au plus 3 recommandations"]
}"#
}

fn financial_instructions() -> &'static str {
    r#"Il s'agit d'un rapport FINANCIER.
Relève les montants, lignes budgétaires et écarts mentionnés. N'invente aucun chiffre : écris "Non spécifié" si une valeur manque.
Réponds uniquement avec un objet JSON de la forme :
{
  "summary": "résumé de l'exécution budgétaire",
  "budget_total_used": "montant ou pourcentage utilisé",
  "key_figures": ["au plus 5 chiffres clés avec leur montant exact"],
  "anomalies": ["écarts ou anomalies mentionnés, ou liste vide"],
  "recommendations": ["au plus 3 recommandations"]
}"#
}

/// Summarization prompt; `excerpt` is already truncated, `full_len` is the
/// original text length in bytes.
pub fn summary(excerpt: &str, kind: ReportKind, full_len: usize) -> String {
    let instructions = match kind {
        ReportKind::Narrative => narrative_instructions(),
        ReportKind::Financial => financial_instructions(),
    };

    format!(
        "Tu analyses les rapports périodiques que les partenaires de LuxDev soumettent pour leurs projets.\n\
         Reste strictement fidèle au contenu du document.\n\n\
         {instructions}\n\n\
         --- DOCUMENT ({full_len} octets) ---\n\
         {excerpt}\n\
         --- FIN DU DOCUMENT ---"
    )
}
