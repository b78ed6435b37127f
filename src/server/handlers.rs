//! HTTP request handlers for the web server.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::templates::{CaptionView, IndexTemplate, ToneOption};
use super::AppState;
use crate::captioner::{self, CaptionError, ErrorKind};
use crate::encode;
use crate::tone::Tone;

/// Fields submitted by the upload form.
#[derive(Debug, Default)]
pub struct CaptionForm {
    pub image: Option<Vec<u8>>,
    pub tone: Tone,
}

/// Read the `image` and `tone` fields. Unknown fields are ignored.
pub async fn read_form(mut multipart: Multipart) -> Result<CaptionForm, String> {
    let mut form = CaptionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let data = field.bytes().await.map_err(|e| e.to_string())?;
                if !data.is_empty() {
                    form.image = Some(data.to_vec());
                }
            }
            "tone" => {
                let label = field.text().await.map_err(|e| e.to_string())?;
                form.tone = Tone::from_label(label.trim());
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Upload form with nothing submitted yet.
pub async fn index() -> impl IntoResponse {
    render(IndexTemplate::empty())
}

/// Caption the uploaded image and render it with the result.
pub async fn caption_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Malformed upload: {}", e);
            let template = IndexTemplate {
                caption: Some(CaptionView {
                    text: format!("Error: {}", e),
                    is_error: true,
                }),
                ..IndexTemplate::empty()
            };
            return (StatusCode::BAD_REQUEST, render(template)).into_response();
        }
    };

    let Some(image) = form.image else {
        let template = IndexTemplate {
            tones: ToneOption::all(form.tone),
            ..IndexTemplate::empty()
        };
        return render(template).into_response();
    };

    let preview = encode::detect_format(&image)
        .ok()
        .map(|format| encode::data_url(&image, format));

    let result =
        captioner::caption_image_bytes(&state.client, &state.config, &image, form.tone).await;
    let caption = match result {
        Ok(text) => CaptionView {
            text,
            is_error: false,
        },
        Err(e) => CaptionView {
            text: e.display_message(),
            is_error: true,
        },
    };

    let template = IndexTemplate {
        tones: ToneOption::all(form.tone),
        preview,
        caption: Some(caption),
    };
    render(template).into_response()
}

/// JSON body returned by `/api/caption`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Caption { caption: String, tone: Tone },
    Error { error: String, kind: ErrorKind },
}

/// Caption the uploaded image and return JSON.
pub async fn api_caption(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let body = ApiResponse::Error {
                error: e,
                kind: ErrorKind::Unexpected,
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let image = form.image.unwrap_or_default();
    let result =
        captioner::caption_image_bytes(&state.client, &state.config, &image, form.tone).await;
    match result {
        Ok(caption) => Json(ApiResponse::Caption {
            caption,
            tone: form.tone,
        })
        .into_response(),
        Err(e) => {
            let body = ApiResponse::Error {
                error: e.display_message(),
                kind: e.kind(),
            };
            (status_for(&e), Json(body)).into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    "ok"
}

/// HTTP status used by the JSON API for each failure.
pub fn status_for(err: &CaptionError) -> StatusCode {
    match err {
        CaptionError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => match err.kind() {
            ErrorKind::Configuration | ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Transport | ErrorKind::Parse | ErrorKind::Empty => StatusCode::BAD_GATEWAY,
            ErrorKind::Unexpected => StatusCode::BAD_REQUEST,
        },
    }
}

fn render(template: IndexTemplate) -> Html<String> {
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}
