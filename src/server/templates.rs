//! Askama template structs for the web interface.

use askama::Template;

use crate::tone::Tone;

/// One entry of the tone selector.
pub struct ToneOption {
    pub key: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl ToneOption {
    pub fn all(selected: Tone) -> Vec<ToneOption> {
        Tone::ALL
            .into_iter()
            .map(|tone| ToneOption {
                key: tone.key(),
                label: tone.label(),
                selected: tone == selected,
            })
            .collect()
    }
}

/// Caption box contents.
pub struct CaptionView {
    pub text: String,
    pub is_error: bool,
}

/// The single upload / caption page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub tones: Vec<ToneOption>,
    /// `data:` URL of the uploaded image
    pub preview: Option<String>,
    pub caption: Option<CaptionView>,
}

impl IndexTemplate {
    pub fn empty() -> Self {
        Self {
            tones: ToneOption::all(Tone::Default),
            preview: None,
            caption: None,
        }
    }
}
