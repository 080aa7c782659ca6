//! Pulling structured data out of free-form model replies.

use serde::de::DeserializeOwned;

use crate::models::GeneratedTemplate;

use super::AiError;

/// Outcome of looking for a JSON object in a reply.
#[derive(Debug)]
pub enum ExtractedJson<T> {
    Parsed(T),
    /// The reply contains no `{ ... }` span at all.
    Missing,
    /// A span was found but did not decode.
    Invalid(String),
}

/// Decode the span from the first `{` to the last `}`.
///
/// Models tend to wrap their JSON in prose or code fences; this ignores both.
pub fn extract_json<T: DeserializeOwned>(reply: &str) -> ExtractedJson<T> {
    let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}')) else {
        return ExtractedJson::Missing;
    };
    if end < start {
        return ExtractedJson::Missing;
    }

    match serde_json::from_str(&reply[start..=end]) {
        Ok(value) => ExtractedJson::Parsed(value),
        Err(e) => ExtractedJson::Invalid(e.to_string()),
    }
}

/// Decode a generated template, rejecting replies without a usable title.
pub fn template_from_reply(reply: &str) -> Result<GeneratedTemplate, AiError> {
    match extract_json::<GeneratedTemplate>(reply) {
        ExtractedJson::Parsed(template) if !template.title.trim().is_empty() => Ok(template),
        ExtractedJson::Parsed(_) => Err(AiError::InvalidReply("template has no title".to_string())),
        ExtractedJson::Missing => Err(AiError::InvalidReply("no JSON object in reply".to_string())),
        ExtractedJson::Invalid(e) => Err(AiError::InvalidReply(e)),
    }
}
