use crate::encode::{self, EncodeError};
use crate::parser;
use crate::payload::GenerateContentRequest;
use crate::tone::Tone;
use crate::types::GeminiCaptionConfig;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Shown in place of a caption when no API key is configured.
pub const MISSING_API_KEY_MESSAGE: &str =
    "⚠️ Please set your GEMINI_API_KEY in the environment, a .env file, or the secrets file.";

/// Shown when the model answered without any text part.
pub const NO_CAPTION_MESSAGE: &str = "No caption found.";

/// Generate a caption for an image file.
///
/// The file must be a JPEG or PNG. It is re-encoded as RGB JPEG before upload.
///
/// # Errors
///
/// Returns an error if:
/// - No API key is configured (no request is sent)
/// - The image file cannot be read or is not a valid JPEG/PNG
/// - Gemini is unreachable, times out, or returns a non-200 status
/// - The response has no text part
pub async fn caption_image(
    client: &Client,
    config: &GeminiCaptionConfig,
    image_path: &Path,
    tone: Tone,
) -> Result<String, CaptionError> {
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|e| CaptionError::ImageRead(format!("{}: {}", image_path.display(), e)))?;
    caption_image_bytes(client, config, &bytes, tone).await
}

/// Caption an in-memory JPEG or PNG (no file I/O).
pub async fn caption_image_bytes(
    client: &Client,
    config: &GeminiCaptionConfig,
    image: &[u8],
    tone: Tone,
) -> Result<String, CaptionError> {
    // Check the key before spending time on encoding.
    if config.usable_api_key().is_none() {
        return Err(CaptionError::MissingApiKey);
    }
    let image_b64 = encode_off_runtime(image).await?;
    caption_image_base64(client, config, &image_b64, tone).await
}

/// Caption an image that is already base64-encoded JPEG.
pub async fn caption_image_base64(
    client: &Client,
    config: &GeminiCaptionConfig,
    image_b64: &str,
    tone: Tone,
) -> Result<String, CaptionError> {
    let api_key = config.usable_api_key().ok_or(CaptionError::MissingApiKey)?;

    let body = GenerateContentRequest::new(tone.prompt(), image_b64, config.generation.clone());

    let url = config.generate_url();
    tracing::debug!(%url, %tone, image_b64_len = image_b64.len(), "Requesting caption");

    let resp = client
        .post(&url)
        .timeout(config.timeout)
        .header(API_KEY_HEADER, api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| transport_error(config, e))?;

    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        let text = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Gemini returned an error status");
        return Err(CaptionError::Http(status.as_u16(), text));
    }

    let text = resp.text().await.map_err(|e| transport_error(config, e))?;
    let caption = parser::parse_caption(&text)
        .map_err(|e| CaptionError::InvalidResponse(e.to_string()))?
        .ok_or(CaptionError::NoCaption)?;

    tracing::info!(%tone, chars = caption.chars().count(), "Caption generated");
    Ok(caption)
}

/// Like [`caption_image_base64`], but gives up as soon as `cancel` fires.
pub async fn caption_image_base64_cancellable(
    client: &Client,
    config: &GeminiCaptionConfig,
    image_b64: &str,
    tone: Tone,
    cancel: &CancellationToken,
) -> Result<String, CaptionError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("Caption request cancelled");
            Err(CaptionError::Cancelled)
        }
        result = caption_image_base64(client, config, image_b64, tone) => result,
    }
}

/// Like [`caption_image_bytes`], but gives up as soon as `cancel` fires.
pub async fn caption_image_bytes_cancellable(
    client: &Client,
    config: &GeminiCaptionConfig,
    image: &[u8],
    tone: Tone,
    cancel: &CancellationToken,
) -> Result<String, CaptionError> {
    if config.usable_api_key().is_none() {
        return Err(CaptionError::MissingApiKey);
    }
    let image_b64 = encode_off_runtime(image).await?;
    caption_image_base64_cancellable(client, config, &image_b64, tone, cancel).await
}

/// Caption in-memory bytes and collapse the outcome into display text.
///
/// Success yields the caption; failure yields
/// [`CaptionError::display_message`]. Prefer [`caption_image_bytes`] when the
/// caller needs to branch on the outcome.
pub async fn caption_text(
    client: &Client,
    config: &GeminiCaptionConfig,
    image: &[u8],
    tone: Tone,
) -> String {
    match caption_image_bytes(client, config, image, tone).await {
        Ok(caption) => caption,
        Err(e) => e.display_message(),
    }
}

/// Errors that can occur during image captioning.
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    #[error("Cannot connect to Gemini at {0}: {1}")]
    Connection(String, String),

    #[error("Gemini did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Gemini returned HTTP {0}: {1}")]
    Http(u16, String),

    #[error("Invalid response from Gemini: {0}")]
    InvalidResponse(String),

    #[error("{}", NO_CAPTION_MESSAGE)]
    NoCaption,

    #[error("Failed to read image: {0}")]
    ImageRead(String),

    #[error("{0}")]
    Image(#[from] EncodeError),

    #[error("Image encoding task failed: {0}")]
    EncodeTask(String),

    #[error("Caption request was cancelled")]
    Cancelled,
}

/// Coarse classification of a [`CaptionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unusable configuration (API key).
    Configuration,
    /// Network failure, timeout, or non-200 status.
    Transport,
    /// Response body was not a valid `generateContent` document.
    Parse,
    /// Well-formed response without any text part.
    Empty,
    /// Local failure such as an unreadable or undecodable image.
    Unexpected,
    /// Request abandoned through its cancellation token.
    Cancelled,
}

impl CaptionError {
    /// The [`ErrorKind`] this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptionError::MissingApiKey => ErrorKind::Configuration,
            CaptionError::Connection(..) | CaptionError::Timeout(_) | CaptionError::Http(..) => {
                ErrorKind::Transport
            }
            CaptionError::InvalidResponse(_) => ErrorKind::Parse,
            CaptionError::NoCaption => ErrorKind::Empty,
            CaptionError::ImageRead(_)
            | CaptionError::Image(_)
            | CaptionError::EncodeTask(_) => ErrorKind::Unexpected,
            CaptionError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Text shown to the user in place of a caption.
    ///
    /// The configuration warning and the empty-result sentinel are shown as is;
    /// everything else is prefixed with `Error: `.
    pub fn display_message(&self) -> String {
        match self {
            CaptionError::MissingApiKey | CaptionError::NoCaption => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}

/// Decode and re-encode `image` as base64 JPEG on the blocking pool.
pub async fn encode_off_runtime(image: &[u8]) -> Result<String, CaptionError> {
    let owned = image.to_vec();
    tokio::task::spawn_blocking(move || encode::encode_jpeg_base64(&owned))
        .await
        .map_err(|e| CaptionError::EncodeTask(e.to_string()))?
        .map_err(CaptionError::from)
}

fn transport_error(config: &GeminiCaptionConfig, err: reqwest::Error) -> CaptionError {
    if err.is_timeout() {
        tracing::warn!(timeout = ?config.timeout, "Gemini request timed out");
        CaptionError::Timeout(config.timeout)
    } else {
        tracing::warn!(error = %err, "Gemini request failed");
        CaptionError::Connection(config.endpoint.clone(), error_chain(&err))
    }
}

// reqwest's top-level message omits the cause ("connection refused" etc.).
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
