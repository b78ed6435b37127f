//! Caption extraction from `generateContent` responses.

use crate::payload::GenerateContentResponse;

/// Return the first text part of the first candidate, trimmed.
///
/// Only the first candidate is considered. Parts without a `text` field
/// (inline media, function calls) are skipped. Returns `None` when there is
/// no candidate, no content, or no text part.
pub fn extract_caption(response: &GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .as_deref()?
        .first()?
        .content
        .as_ref()?
        .parts
        .as_deref()?
        .iter()
        .find_map(|part| part.text.as_deref())
        .map(|text| text.trim().to_string())
}

/// Parse a raw response body and extract the caption.
///
/// Returns `Err` only when the body is not a valid response document.
pub fn parse_caption(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    Ok(extract_caption(&response))
}
