//! AI gateway: template generation and report summarization.
//!
//! Calls go to a [`GenerativeModel`] under a bounded timeout. Whenever the
//! model is missing, slow, failing or answers something unusable, the
//! gateway answers from the deterministic local rules in [`fallback`]
//! instead, so callers never see a provider error.

pub mod fallback;
mod gemini;
mod prompts;
mod reply;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::AiSettings;
use crate::error::{AppError, AppResult};
use crate::models::{
    FinancialSummary, GeneratedTemplate, NarrativeSummary, ReportKind, ReportSummary,
    SummaryResponse, SummarySource,
};

pub use gemini::GeminiClient;
use reply::ExtractedJson;

/// Texts shorter than this (in characters, after trimming) are treated as
/// unreadable documents.
pub const MIN_TEXT_CHARS: usize = 50;

/// Longest text excerpt forwarded to the model.
pub const MAX_INPUT_CHARS: usize = 25_000;

/// Longest raw reply kept when the model ignores the JSON format.
const RAW_REPLY_CHARS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("No generative model configured")]
    NotConfigured,

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Unusable reply: {0}")]
    InvalidReply(String),
}

/// A text-in, text-out generative model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, for logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Entry point used by the HTTP layer.
#[derive(Clone)]
pub struct AiGateway {
    model: Option<Arc<dyn GenerativeModel>>,
    timeout: Duration,
}

impl AiGateway {
    /// Build the gateway from configuration. Without a credential, or if the
    /// HTTP client cannot be built, the gateway runs offline.
    pub fn from_settings(settings: &AiSettings) -> Self {
        let model = settings.api_key.as_ref().and_then(|key| {
            match GeminiClient::new(key.clone(), &settings.model, settings.timeout) {
                Ok(client) => Some(Arc::new(client) as Arc<dyn GenerativeModel>),
                Err(e) => {
                    warn!("Generative model disabled: {}", e);
                    None
                }
            }
        });

        match &model {
            Some(m) => info!("AI gateway using model {}", m.name()),
            None => info!("AI gateway running offline (local analysis only)"),
        }

        Self {
            model,
            timeout: settings.timeout,
        }
    }

    /// Gateway that only uses the local rules.
    pub fn offline() -> Self {
        Self {
            model: None,
            timeout: Duration::from_secs(1),
        }
    }

    pub fn with_model(model: Arc<dyn GenerativeModel>, timeout: Duration) -> Self {
        Self {
            model: Some(model),
            timeout,
        }
    }

    pub fn is_online(&self) -> bool {
        self.model.is_some()
    }

    async fn call(&self, prompt: &str) -> Result<String, AiError> {
        let model = self.model.as_ref().ok_or(AiError::NotConfigured)?;
        tokio::time::timeout(self.timeout, model.generate(prompt))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))?
    }

    /// Turn a free-text description into a report template.
    pub async fn generate_template(&self, prompt: &str) -> AppResult<GeneratedTemplate> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::InvalidInput("prompt is required".to_string()));
        }

        let generated = match self.call(&prompts::template(prompt)).await {
            Ok(text) => reply::template_from_reply(&text),
            Err(e) => Err(e),
        };

        match generated {
            Ok(template) => Ok(template),
            Err(AiError::NotConfigured) => Ok(fallback::template_for(prompt)),
            Err(e) => {
                warn!("Template generation fell back to local rules: {}", e);
                Ok(fallback::template_for(prompt))
            }
        }
    }

    /// Summarize extracted report text.
    pub async fn summarize(&self, text: &str, kind: ReportKind) -> SummaryResponse {
        let text = text.trim();
        if text.chars().count() < MIN_TEXT_CHARS {
            info!(
                "Report text too short for analysis ({} chars)",
                text.chars().count()
            );
            return SummaryResponse {
                kind,
                source: SummarySource::Fixed,
                body: ReportSummary::Unreadable(fallback::unreadable()),
            };
        }

        let excerpt = truncate_chars(text, MAX_INPUT_CHARS);
        let reply = match self.call(&prompts::summary(excerpt, kind, text.len())).await {
            Ok(reply) => reply,
            Err(AiError::NotConfigured) => return local(text, kind),
            Err(e) => {
                warn!("Summarization fell back to local analysis: {}", e);
                return local(text, kind);
            }
        };

        let body = match kind {
            ReportKind::Narrative => match reply::extract_json::<NarrativeSummary>(&reply) {
                ExtractedJson::Parsed(summary) => ReportSummary::Narrative(summary),
                ExtractedJson::Missing => ReportSummary::Narrative(NarrativeSummary {
                    summary: truncate_chars(&reply, RAW_REPLY_CHARS).to_string(),
                    achievements: Vec::new(),
                    risks: vec![fallback::UNEXPECTED_FORMAT_RISK.to_string()],
                    recommendations: vec![fallback::RETRY_RECOMMENDATION.to_string()],
                }),
                ExtractedJson::Invalid(e) => {
                    warn!("Model reply was not a valid narrative summary: {}", e);
                    return local(text, kind);
                }
            },
            ReportKind::Financial => match reply::extract_json::<FinancialSummary>(&reply) {
                ExtractedJson::Parsed(summary) => ReportSummary::Financial(summary),
                ExtractedJson::Missing => ReportSummary::Financial(FinancialSummary {
                    summary: truncate_chars(&reply, RAW_REPLY_CHARS).to_string(),
                    budget_total_used: fallback::UNSPECIFIED_BUDGET.to_string(),
                    key_figures: Vec::new(),
                    anomalies: vec![fallback::UNEXPECTED_FORMAT_RISK.to_string()],
                    recommendations: vec![fallback::RETRY_RECOMMENDATION.to_string()],
                }),
                ExtractedJson::Invalid(e) => {
                    warn!("Model reply was not a valid financial summary: {}", e);
                    return local(text, kind);
                }
            },
        };

        SummaryResponse {
            kind,
            source: SummarySource::Model,
            body,
        }
    }
}

fn local(text: &str, kind: ReportKind) -> SummaryResponse {
    SummaryResponse {
        kind,
        source: SummarySource::Local,
        body: fallback::analyze(text, kind),
    }
}

/// Prefix of `s` holding at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
